use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use crate::presentation::auth::{expired_session_cookie, session_cookie};
use crate::presentation::state::AppState;

const UPLOAD_PAGE: &str = include_str!("../../../templates/upload.html");
const LOGIN_PAGE: &str = include_str!("../../../templates/login.html");
const ERROR_PLACEHOLDER: &str = "{{error}}";
const INVALID_SECRET_MESSAGE: &str = "Invalid access key";

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub apikey: String,
}

pub fn render_login(error: Option<&str>) -> String {
    let notice = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, e))
        .unwrap_or_default();
    LOGIN_PAGE.replace(ERROR_PLACEHOLDER, &notice)
}

pub async fn index_handler() -> Html<&'static str> {
    Html(UPLOAD_PAGE)
}

pub async fn login_form_handler(State(state): State<AppState>) -> impl IntoResponse {
    if !state.access.is_enabled() {
        return Redirect::to("/").into_response();
    }
    Html(render_login(None)).into_response()
}

pub async fn login_handler(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    if !state.access.is_enabled() {
        return Redirect::to("/").into_response();
    }

    if state.access.verify(&form.apikey) {
        tracing::info!("Login succeeded");
        return (jar.add(session_cookie()), Redirect::to("/")).into_response();
    }

    tracing::warn!("Login rejected: invalid access key");
    (
        StatusCode::UNAUTHORIZED,
        Html(render_login(Some(INVALID_SECRET_MESSAGE))),
    )
        .into_response()
}

pub async fn logout_handler(jar: SignedCookieJar) -> impl IntoResponse {
    (jar.remove(expired_session_cookie()), Redirect::to("/login"))
}
