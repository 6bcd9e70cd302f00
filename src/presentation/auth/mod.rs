mod access_gate;

pub use access_gate::{
    AccessGate, SESSION_COOKIE, expired_session_cookie, require_access, session_cookie,
    session_key,
};
