use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::guard::LOGIN_PATH;
use crate::auth::signup::{self, SignupForm, SignupOutcome};
use crate::auth::strength::{classify, PasswordStrength};
use crate::state::AppState;
use crate::storage::{BrowserId, KeyValueStore, TOKEN_KEY};
use crate::views::auth::{login_page, signup_page};
use crate::views::Notice;

pub const LOGIN_FALLBACK: &str = "Failed to login. Please try again.";
pub const REGISTERED_MESSAGE: &str = "Registration successful. Please log in.";

/// GET /signup
pub async fn handle_signup_page() -> Html<String> {
    signup_page("", "", PasswordStrength::Weak, None)
}

/// POST /signup
pub async fn handle_signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Response {
    let notice = match signup::submit(&form, state.backend.as_ref()).await {
        SignupOutcome::Registered => {
            return Redirect::to(&format!("{LOGIN_PATH}?registered=1")).into_response();
        }
        SignupOutcome::Rejected(rejection) => Notice::error(rejection.to_string()),
        SignupOutcome::Failed(message) => Notice::error(message),
    };

    signup_page(
        &form.email,
        &form.username,
        classify(&form.password),
        Some(&notice),
    )
    .into_response()
}

#[derive(Debug, Deserialize)]
pub struct StrengthRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct StrengthResponse {
    pub strength: PasswordStrength,
}

/// POST /signup/strength
pub async fn handle_password_strength(Json(request): Json<StrengthRequest>) -> Json<StrengthResponse> {
    Json(StrengthResponse {
        strength: classify(&request.password),
    })
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub registered: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// GET / and GET /login
pub async fn handle_login_page(Query(query): Query<LoginQuery>) -> Html<String> {
    let notice = query
        .registered
        .map(|_| Notice::success(REGISTERED_MESSAGE));
    login_page("", notice.as_ref())
}

/// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    Extension(browser): Extension<BrowserId>,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.trim();

    let notice = match state.backend.login(email, &form.password).await {
        Ok(token) => {
            let store = state.storage.scope(browser);
            match store.set(TOKEN_KEY, token) {
                Ok(()) => {
                    info!(browser = %browser.0, "logged in");
                    return Redirect::to("/dashboard").into_response();
                }
                Err(e) => {
                    warn!("could not store token: {e}");
                    Notice::error(LOGIN_FALLBACK)
                }
            }
        }
        Err(e) => {
            warn!(browser = %browser.0, "login failed: {e}");
            Notice::error(e.server_error().unwrap_or(LOGIN_FALLBACK))
        }
    };

    login_page(email, Some(&notice)).into_response()
}

/// GET /logout
pub async fn handle_logout(
    State(state): State<AppState>,
    Extension(browser): Extension<BrowserId>,
) -> Redirect {
    state.storage.scope(browser).remove(TOKEN_KEY);
    Redirect::to(LOGIN_PATH)
}
