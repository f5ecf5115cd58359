use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Extension,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::dashboard::feedback::FeedbackFilter;
use crate::dashboard::orchestrator::{load_snapshot, Dashboard, MISSING_INPUT_MESSAGE};
use crate::errors::AppError;
use crate::input::data_url;
use crate::report::REPORT_FILENAME;
use crate::state::AppState;
use crate::storage::{BrowserId, KeyValueStore, RESUME_KEY};
use crate::views::dashboard::{dashboard_page, NO_RESUME_MESSAGE};

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub filter: Option<String>,
}

fn parse_filter(raw: Option<&str>) -> Result<FeedbackFilter, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(FeedbackFilter::All),
        Some(value) => value
            .parse::<FeedbackFilter>()
            .map_err(|e| AppError::Validation(e.to_string())),
    }
}

/// GET /dashboard?filter=<all|skills|experience|formatting|general>
///
/// One fit-score fetch per visit; changing the filter is a new visit.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Extension(browser): Extension<BrowserId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, AppError> {
    let filter = parse_filter(query.filter.as_deref())?;
    let store = state.storage.scope(browser);

    let mut dashboard = Dashboard::new();
    dashboard.load(state.backend.as_ref(), &store).await;

    let has_resume = store.get(RESUME_KEY).is_some();
    Ok(dashboard_page(dashboard.state(), filter, has_resume))
}

/// GET /dashboard/resume
/// Serves the stored resume with its own MIME type.
pub async fn handle_resume_preview(
    State(state): State<AppState>,
    Extension(browser): Extension<BrowserId>,
) -> Result<Response, AppError> {
    let stored = state
        .storage
        .scope(browser)
        .get(RESUME_KEY)
        .ok_or_else(|| AppError::NotFound(NO_RESUME_MESSAGE.to_string()))?;

    let Some((mime, bytes)) = data_url::decode(&stored) else {
        warn!("stored resume is not a readable data URL");
        return Err(AppError::NotFound(NO_RESUME_MESSAGE.to_string()));
    };

    Ok((
        [
            (header::CONTENT_TYPE, mime),
            (header::CONTENT_DISPOSITION, "inline".to_string()),
        ],
        bytes,
    )
        .into_response())
}

/// GET /dashboard/report
/// PDF built from the last mirrored fit-score snapshot.
pub async fn handle_report_download(
    State(state): State<AppState>,
    Extension(browser): Extension<BrowserId>,
) -> Result<Response, AppError> {
    let store = state.storage.scope(browser);
    let result = load_snapshot(&store)
        .ok_or_else(|| AppError::NotFound(MISSING_INPUT_MESSAGE.to_string()))?;

    let pdf = state.report.export(&result, Utc::now());
    info!("serving report ({} bytes)", pdf.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        pdf,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::FeedbackCategory;

    #[test]
    fn test_missing_or_blank_filter_is_all() {
        assert_eq!(parse_filter(None).unwrap(), FeedbackFilter::All);
        assert_eq!(parse_filter(Some("  ")).unwrap(), FeedbackFilter::All);
    }

    #[test]
    fn test_known_filter_parses() {
        assert_eq!(
            parse_filter(Some("experience")).unwrap(),
            FeedbackFilter::Category(FeedbackCategory::Experience)
        );
    }

    #[test]
    fn test_unknown_filter_is_validation_error() {
        assert!(matches!(
            parse_filter(Some("skill")),
            Err(AppError::Validation(_))
        ));
    }
}
