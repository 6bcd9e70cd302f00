mod health;
mod pages;
mod result;
mod upload;

pub use health::health_handler;
pub use pages::{index_handler, login_form_handler, login_handler, logout_handler, render_login};
pub use result::{TaskRecordResponse, result_handler};
pub use upload::{UploadResponse, upload_handler};
