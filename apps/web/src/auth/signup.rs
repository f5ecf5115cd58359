use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::strength::{classify, PasswordStrength};
use crate::backend::payload::RegisterRequest;
use crate::backend::Backend;

pub const REGISTRATION_FALLBACK: &str = "Registration failed. Please try again.";

/// Sign-up form as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "confirmPassword")]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignupRejection {
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Password is too weak.")]
    WeakPassword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    /// Blocked locally; no request was sent.
    Rejected(SignupRejection),
    Registered,
    /// The backend refused; carries the message to show.
    Failed(String),
}

/// Local checks, in order, stopping at the first failure.
pub fn validate(form: &SignupForm) -> Result<(), SignupRejection> {
    if form.password != form.confirm_password {
        return Err(SignupRejection::PasswordMismatch);
    }
    if classify(&form.password) == PasswordStrength::Weak {
        return Err(SignupRejection::WeakPassword);
    }
    Ok(())
}

/// Validates, then registers. The backend is only called when validation passes.
pub async fn submit(form: &SignupForm, backend: &dyn Backend) -> SignupOutcome {
    if let Err(rejection) = validate(form) {
        return SignupOutcome::Rejected(rejection);
    }

    let request = RegisterRequest {
        email: form.email.trim().to_string(),
        username: form.username.trim().to_string(),
        password: form.password.clone(),
    };

    match backend.register(&request).await {
        Ok(_) => {
            info!("registered a new account");
            SignupOutcome::Registered
        }
        Err(e) => {
            warn!("registration failed: {e}");
            SignupOutcome::Failed(
                e.server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| REGISTRATION_FALLBACK.to_string()),
            )
        }
    }
}
