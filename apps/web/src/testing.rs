//! Shared fixtures for unit and router tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

use crate::backend::payload::{
    MessageResponse, RegisterRequest, ResumeUpload, ResumeUploadResponse,
};
use crate::backend::{Backend, BackendError};
use crate::config::Config;
use crate::models::analysis::FitScoreResult;
use crate::report::ReportExporter;
use crate::state::AppState;
use crate::storage::BrowserStorage;
use crate::auth::guard::SessionTokenGuard;

/// Builds an unsigned JWT-shaped token around the given claims JSON.
pub fn make_token(claims: &str) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims)
    )
}

/// A token that stays valid well past any test run.
pub fn valid_token() -> String {
    make_token(r#"{"email":"user@example.com","exp":4102444800}"#)
}

/// Scripted backend. Each configured error is returned once; afterwards the
/// operation falls back to its default success answer.
#[derive(Default)]
pub struct FakeBackend {
    calls: AtomicUsize,
    fit_score_calls: AtomicUsize,
    register_error: Mutex<Option<BackendError>>,
    login_error: Mutex<Option<BackendError>>,
    upload_error: Mutex<Option<BackendError>>,
    job_error: Mutex<Option<BackendError>>,
    fit_score: Mutex<Option<Result<FitScoreResult, BackendError>>>,
    uploads: Mutex<Vec<ResumeUpload>>,
    job_descriptions: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn with_register_error(self, error: BackendError) -> Self {
        *self.register_error.lock().unwrap() = Some(error);
        self
    }

    pub fn with_login_error(self, error: BackendError) -> Self {
        *self.login_error.lock().unwrap() = Some(error);
        self
    }

    pub fn with_upload_error(self, error: BackendError) -> Self {
        *self.upload_error.lock().unwrap() = Some(error);
        self
    }

    pub fn with_job_error(self, error: BackendError) -> Self {
        *self.job_error.lock().unwrap() = Some(error);
        self
    }

    pub fn with_fit_score(self, result: Result<FitScoreResult, BackendError>) -> Self {
        *self.fit_score.lock().unwrap() = Some(result);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fit_score_calls(&self) -> usize {
        self.fit_score_calls.load(Ordering::SeqCst)
    }

    pub fn uploads(&self) -> Vec<ResumeUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn job_descriptions(&self) -> Vec<String> {
        self.job_descriptions.lock().unwrap().clone()
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn api_error(status: u16, error: Option<&str>) -> BackendError {
    BackendError::Api {
        status,
        error: error.map(str::to_string),
        message: None,
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn register(&self, _request: &RegisterRequest) -> Result<MessageResponse, BackendError> {
        self.record();
        match self.register_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(MessageResponse {
                message: Some("User registered".to_string()),
                status: None,
            }),
        }
    }

    async fn login(&self, _email: &str, _password: &str) -> Result<String, BackendError> {
        self.record();
        match self.login_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(valid_token()),
        }
    }

    async fn upload_resume(
        &self,
        upload: ResumeUpload,
    ) -> Result<ResumeUploadResponse, BackendError> {
        self.record();
        self.uploads.lock().unwrap().push(upload);
        match self.upload_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(ResumeUploadResponse {
                message: Some("Resume uploaded successfully.".to_string()),
                status: Some("success".to_string()),
                character_count: Some(1234),
                session_id: Some("session-1".to_string()),
            }),
        }
    }

    async fn submit_job_description(
        &self,
        job_description: &str,
    ) -> Result<MessageResponse, BackendError> {
        self.record();
        self.job_descriptions
            .lock()
            .unwrap()
            .push(job_description.to_string());
        match self.job_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(MessageResponse {
                message: Some("Job description submitted successfully.".to_string()),
                status: Some("success".to_string()),
            }),
        }
    }

    async fn fit_score(&self) -> Result<FitScoreResult, BackendError> {
        self.record();
        self.fit_score_calls.fetch_add(1, Ordering::SeqCst);
        self.fit_score
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(api_error(422, None)))
    }

    async fn delete_account(&self, _email: &str) -> Result<(), BackendError> {
        self.record();
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        backend_url: "http://backend.test".to_string(),
        backend_timeout_secs: 5,
        port: 0,
        rust_log: "debug".to_string(),
        skip_token_check: false,
    }
}

pub fn test_state(backend: Arc<FakeBackend>) -> AppState {
    let config = test_config();
    AppState {
        backend,
        storage: Arc::new(BrowserStorage::default()),
        guard: SessionTokenGuard::new(!config.skip_token_check),
        report: ReportExporter::default(),
        config,
    }
}
