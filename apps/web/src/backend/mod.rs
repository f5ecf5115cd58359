//! Backend client: the single point of entry for all calls to the analysis backend.
//!
//! No other module talks to the backend over HTTP. Handlers depend on the
//! [`Backend`] trait so tests can substitute a scripted fake.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::analysis::FitScoreResult;

pub mod payload;

use payload::{
    ErrorBody, FitScorePayload, JobDescriptionRequest, LoginRequest, LoginResponse,
    MessageResponse, RegisterRequest, ResumeUpload, ResumeUploadResponse,
};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer. `error` / `message` hold the string fields of the body, if any.
    #[error("backend returned status {status}")]
    Api {
        status: u16,
        error: Option<String>,
        message: Option<String>,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's `error` field, when it sent a displayable one.
    pub fn server_error(&self) -> Option<&str> {
        match self {
            BackendError::Api { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    /// The backend's `message` field, falling back to `error`.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            BackendError::Api { error, message, .. } => message.as_deref().or(error.as_deref()),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, BackendError>;

    /// Returns the bearer token issued by the backend.
    async fn login(&self, email: &str, password: &str) -> Result<String, BackendError>;

    async fn upload_resume(
        &self,
        upload: ResumeUpload,
    ) -> Result<ResumeUploadResponse, BackendError>;

    async fn submit_job_description(
        &self,
        job_description: &str,
    ) -> Result<MessageResponse, BackendError>;

    /// Relies on server-side session state populated by the two calls above.
    async fn fit_score(&self) -> Result<FitScoreResult, BackendError>;

    /// Test-only cleanup hook (`DELETE /api/delete?email=`).
    async fn delete_account(&self, email: &str) -> Result<(), BackendError>;
}

#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a non-2xx response into `BackendError::Api` and decodes 2xx bodies.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let parsed = ErrorBody::parse(&body);
        warn!("backend returned {}: {}", status, body);
        return Err(BackendError::Api {
            status: status.as_u16(),
            error: parsed.error(),
            message: parsed.message(),
        });
    }

    // Some acknowledgements come back with an empty body.
    let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl Backend for BackendClient {
    async fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, BackendError> {
        let response = self
            .client
            .post(self.url("/api/register"))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .post(self.url("/api/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let login: LoginResponse = read_json(response).await?;
        debug!("login succeeded");
        Ok(login.token)
    }

    async fn upload_resume(
        &self,
        upload: ResumeUpload,
    ) -> Result<ResumeUploadResponse, BackendError> {
        let size = upload.bytes.len();
        let part = multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/api/resume-upload"))
            .multipart(form)
            .send()
            .await?;
        let uploaded: ResumeUploadResponse = read_json(response).await?;
        debug!(
            "resume uploaded: {} bytes, character_count={:?}",
            size, uploaded.character_count
        );
        Ok(uploaded)
    }

    async fn submit_job_description(
        &self,
        job_description: &str,
    ) -> Result<MessageResponse, BackendError> {
        let response = self
            .client
            .post(self.url("/api/job-description"))
            .json(&JobDescriptionRequest { job_description })
            .send()
            .await?;
        read_json(response).await
    }

    async fn fit_score(&self) -> Result<FitScoreResult, BackendError> {
        let response = self.client.post(self.url("/api/fit-score")).send().await?;
        let payload: FitScorePayload = read_json(response).await?;
        let result = payload.into_result();
        debug!(
            "fit score fetched: score={}, skills={}, feedback={}",
            result.fit_score,
            result.matched_skills.len(),
            result.feedback.len()
        );
        Ok(result)
    }

    async fn delete_account(&self, email: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.url("/api/delete"))
            .query(&[("email", email)])
            .send()
            .await?;
        let _: serde_json::Value = read_json(response).await?;
        Ok(())
    }
}
