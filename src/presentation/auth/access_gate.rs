use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, Key, SameSite};
use sha2::{Digest, Sha256, Sha512};

use crate::presentation::state::AppState;

pub const SESSION_COOKIE: &str = "audiogist_session";
const AUTHENTICATED: &str = "authenticated";

/// Optional shared-secret gate. Without a secret every request passes.
#[derive(Clone, Default)]
pub struct AccessGate {
    secret: Option<Arc<str>>,
}

impl AccessGate {
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            secret: secret.filter(|s| !s.trim().is_empty()).map(Arc::from),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Compares digests so the check does not short-circuit on the first
    /// differing byte of the secret.
    pub fn verify(&self, candidate: &str) -> bool {
        let Some(secret) = &self.secret else {
            return true;
        };
        let expected = Sha256::digest(secret.as_bytes());
        let actual = Sha256::digest(candidate.as_bytes());
        expected
            .iter()
            .zip(actual.iter())
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
    }

    pub fn is_authenticated(&self, jar: &SignedCookieJar) -> bool {
        !self.is_enabled()
            || jar
                .get(SESSION_COOKIE)
                .is_some_and(|cookie| cookie.value() == AUTHENTICATED)
    }
}

/// The cookie marking a browser session as past the gate.
pub fn session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, AUTHENTICATED))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Signing key for session cookies. Without a configured secret a random
/// key is used, so sessions do not survive a restart.
pub fn session_key(secret: Option<&str>) -> Key {
    match secret.filter(|s| !s.is_empty()) {
        Some(secret) => Key::from(Sha512::digest(secret.as_bytes()).as_slice()),
        None => Key::generate(),
    }
}

/// Sends unauthenticated browsers to the login form.
pub async fn require_access(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    request: Request,
    next: Next,
) -> Response {
    if state.access.is_authenticated(&jar) {
        return next.run(request).await;
    }

    tracing::debug!(path = %request.uri().path(), "Unauthenticated request redirected to login");
    Redirect::to("/login").into_response()
}
