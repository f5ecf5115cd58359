use thiserror::Error;

use crate::backend::payload::ResumeUpload;

pub const MAX_RESUME_BYTES: usize = 2 * 1024 * 1024;
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 5000;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputRejection {
    #[error("Please select a resume file to upload.")]
    MissingFile,
    #[error("Only PDF and DOCX files are supported.")]
    UnsupportedType,
    #[error("The resume file must be 2 MB or smaller.")]
    TooLarge,
    #[error("Please enter a job description.")]
    EmptyJobDescription,
    #[error("Job description exceeds the 5000 character limit.")]
    JobDescriptionTooLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeKind {
    Pdf,
    Docx,
}

impl ResumeKind {
    pub fn mime(&self) -> &'static str {
        match self {
            ResumeKind::Pdf => PDF_MIME,
            ResumeKind::Docx => DOCX_MIME,
        }
    }

    /// Recognises the file by content type first, then by extension.
    /// Browsers often send `application/octet-stream` for DOCX.
    pub fn detect(file_name: &str, content_type: &str) -> Option<Self> {
        let content_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match content_type.as_str() {
            PDF_MIME => return Some(ResumeKind::Pdf),
            DOCX_MIME => return Some(ResumeKind::Docx),
            _ => {}
        }

        let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(ResumeKind::Pdf),
            "docx" => Some(ResumeKind::Docx),
            _ => None,
        }
    }
}

/// Local checks run before anything is stored or sent. An empty file counts
/// as no file.
pub fn validate_resume(upload: &ResumeUpload) -> Result<ResumeKind, InputRejection> {
    if upload.bytes.is_empty() {
        return Err(InputRejection::MissingFile);
    }
    let kind = ResumeKind::detect(&upload.file_name, &upload.content_type)
        .ok_or(InputRejection::UnsupportedType)?;
    if upload.bytes.len() > MAX_RESUME_BYTES {
        return Err(InputRejection::TooLarge);
    }
    Ok(kind)
}

/// Length is counted in characters, before trimming.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Returns the trimmed text to forward.
pub fn validate_job_description(text: &str) -> Result<&str, InputRejection> {
    if char_count(text) > MAX_JOB_DESCRIPTION_CHARS {
        return Err(InputRejection::JobDescriptionTooLong);
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputRejection::EmptyJobDescription);
    }
    Ok(trimmed)
}
