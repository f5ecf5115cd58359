use axum::{
    extract::{Multipart, State},
    response::Html,
    Extension, Form,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::backend::payload::ResumeUpload;
use crate::errors::AppError;
use crate::input::data_url;
use crate::input::validation::{validate_job_description, validate_resume, InputRejection};
use crate::state::AppState;
use crate::storage::{BrowserId, KeyValueStore, RESUME_KEY};
use crate::views::input::input_page;
use crate::views::Notice;

pub const UPLOAD_FAILURE: &str = "Failed to upload the resume. Please try again.";
pub const JOB_DESCRIPTION_FAILURE: &str =
    "Failed to submit the job description. Please try again.";

const UPLOAD_SUCCESS_FALLBACK: &str = "Resume uploaded successfully.";
const JOB_DESCRIPTION_SUCCESS_FALLBACK: &str = "Job description submitted successfully.";

/// GET /input
pub async fn handle_input_page() -> Html<String> {
    input_page("", None)
}

/// Pulls the `file` field out of the form; other fields are skipped.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<ResumeUpload>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?;
        return Ok(Some(ResumeUpload {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

/// POST /input/resume
///
/// After local checks, storing the file and forwarding it to the backend run
/// concurrently; neither waits on the other.
pub async fn handle_resume_upload(
    State(state): State<AppState>,
    Extension(browser): Extension<BrowserId>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let Some(mut upload) = read_file_field(&mut multipart).await? else {
        return Ok(input_page(
            "",
            Some(&Notice::error(InputRejection::MissingFile.to_string())),
        ));
    };

    let kind = match validate_resume(&upload) {
        Ok(kind) => kind,
        Err(rejection) => {
            info!("rejected resume '{}': {rejection}", upload.file_name);
            return Ok(input_page("", Some(&Notice::error(rejection.to_string()))));
        }
    };
    upload.content_type = kind.mime().to_string();

    let store = state.storage.scope(browser);
    let encoded = data_url::encode(kind.mime(), &upload.bytes);
    let file_name = upload.file_name.clone();

    let persist = async move { store.set(RESUME_KEY, encoded) };
    let (persisted, uploaded) = tokio::join!(persist, state.backend.upload_resume(upload));

    if let Err(e) = persisted {
        warn!("could not keep a local copy of '{file_name}': {e}");
    }

    let notice = match uploaded {
        Ok(response) => {
            info!(
                characters = response.character_count,
                "resume '{file_name}' uploaded"
            );
            Notice::success(
                response
                    .message
                    .unwrap_or_else(|| UPLOAD_SUCCESS_FALLBACK.to_string()),
            )
        }
        Err(e) => {
            warn!("resume upload failed: {e}");
            Notice::error(UPLOAD_FAILURE)
        }
    };

    Ok(input_page("", Some(&notice)))
}

#[derive(Debug, Deserialize)]
pub struct JobDescriptionForm {
    #[serde(default)]
    pub job_description: String,
}

/// POST /input/job-description
pub async fn handle_job_description(
    State(state): State<AppState>,
    Form(form): Form<JobDescriptionForm>,
) -> Html<String> {
    let text = match validate_job_description(&form.job_description) {
        Ok(text) => text,
        Err(rejection) => {
            return input_page(
                &form.job_description,
                Some(&Notice::error(rejection.to_string())),
            );
        }
    };

    let notice = match state.backend.submit_job_description(text).await {
        Ok(response) => {
            info!("job description submitted ({} chars)", text.chars().count());
            Notice::success(
                response
                    .message
                    .unwrap_or_else(|| JOB_DESCRIPTION_SUCCESS_FALLBACK.to_string()),
            )
        }
        Err(e) => {
            warn!("job description submission failed: {e}");
            Notice::error(JOB_DESCRIPTION_FAILURE)
        }
    };

    input_page(&form.job_description, Some(&notice))
}
