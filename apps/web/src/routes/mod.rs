pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::guard::require_session;
use crate::auth::handlers as auth;
use crate::dashboard::handlers as dashboard;
use crate::input::handlers as input;
use crate::input::validation::MAX_RESUME_BYTES;
use crate::state::AppState;
use crate::storage::assign_browser_id;

/// Leaves room for oversized files to reach the local size check.
const MAX_UPLOAD_BODY_BYTES: usize = 2 * MAX_RESUME_BYTES;

pub fn build_router(state: AppState) -> Router {
    // Screens behind the session token guard
    let protected = Router::new()
        .route("/input", get(input::handle_input_page))
        .route(
            "/input/resume",
            post(input::handle_resume_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES)),
        )
        .route("/input/job-description", post(input::handle_job_description))
        .route("/dashboard", get(dashboard::handle_dashboard))
        .route("/dashboard/resume", get(dashboard::handle_resume_preview))
        .route("/dashboard/report", get(dashboard::handle_report_download))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(auth::handle_login_page))
        .route(
            "/signup",
            get(auth::handle_signup_page).post(auth::handle_signup),
        )
        .route("/signup/strength", post(auth::handle_password_strength))
        .route("/login", get(auth::handle_login_page).post(auth::handle_login))
        .route("/logout", get(auth::handle_logout))
        .merge(protected)
        .layer(middleware::from_fn(assign_browser_id))
        .with_state(state)
}
