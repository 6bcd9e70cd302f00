use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::application::services::TaskService;
use crate::presentation::auth::AccessGate;

#[derive(Clone)]
pub struct AppState {
    pub task_service: Arc<TaskService>,
    pub access: AccessGate,
    pub cookie_key: Key,
    pub upload_limit_bytes: usize,
}

impl AppState {
    pub fn new(
        task_service: Arc<TaskService>,
        access: AccessGate,
        cookie_key: Key,
        upload_limit_bytes: usize,
    ) -> Self {
        Self {
            task_service,
            access,
            cookie_key,
            upload_limit_bytes,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
