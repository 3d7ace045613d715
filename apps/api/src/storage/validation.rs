//! Resume upload validation. Everything here runs before the store is touched.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::models::StoredResume;

/// 10 MiB, the options page's limit.
pub const MAX_RESUME_BYTES: u64 = 10 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Error, PartialEq)]
pub enum UploadError {
    #[error("Please enter a resume name")]
    MissingName,

    #[error("Please select a file")]
    MissingFile,

    #[error("Please select a PDF, DOC, or DOCX file")]
    UnsupportedType(String),

    #[error("File too large. Please select a file smaller than 10MB")]
    TooLarge(u64),

    #[error("File is not a valid base64 data URI: {0}")]
    MalformedDataUri(String),

    #[error("File content type {actual} does not match declared type {declared}")]
    MimeMismatch { declared: String, actual: String },

    #[error("Declared size {declared} does not match file size {actual}")]
    SizeMismatch { declared: u64, actual: u64 },
}

/// Upload body posted by the options page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUpload {
    pub name: String,
    pub file: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: Option<u64>,
}

/// A decoded `data:` URI.
#[derive(Debug, PartialEq)]
pub struct DataUri {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Parses `data:<mime>[;params];base64,<payload>`.
pub fn parse_data_uri(uri: &str) -> Result<DataUri, UploadError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| UploadError::MalformedDataUri("missing 'data:' prefix".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| UploadError::MalformedDataUri("missing ',' separator".to_string()))?;

    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default().trim().to_lowercase();
    if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
        return Err(UploadError::MalformedDataUri(
            "payload is not base64-encoded".to_string(),
        ));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| UploadError::MalformedDataUri(e.to_string()))?;

    Ok(DataUri { mime_type, bytes })
}

/// Validates an upload and turns it into the record that gets stored.
pub fn validate_upload(
    upload: &ResumeUpload,
    now: DateTime<Utc>,
) -> Result<StoredResume, UploadError> {
    let name = upload.name.trim();
    if name.is_empty() {
        return Err(UploadError::MissingName);
    }
    if upload.file.trim().is_empty() {
        return Err(UploadError::MissingFile);
    }

    if let Some(declared) = upload.size {
        if declared > MAX_RESUME_BYTES {
            return Err(UploadError::TooLarge(declared));
        }
    }

    let mime_type = upload.mime_type.trim().to_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
        return Err(UploadError::UnsupportedType(upload.mime_type.clone()));
    }

    // Cheap pre-check: base64 inflates by 4/3, so reject before decoding a huge payload.
    let encoded_len = upload.file.len() as u64;
    if encoded_len / 4 * 3 > MAX_RESUME_BYTES + 3 * 1024 {
        return Err(UploadError::TooLarge(encoded_len / 4 * 3));
    }

    let decoded = parse_data_uri(&upload.file)?;
    if decoded.mime_type != mime_type {
        return Err(UploadError::MimeMismatch {
            declared: mime_type,
            actual: decoded.mime_type,
        });
    }
    let actual = decoded.bytes.len() as u64;
    if actual == 0 {
        return Err(UploadError::MissingFile);
    }
    if actual > MAX_RESUME_BYTES {
        return Err(UploadError::TooLarge(actual));
    }
    if let Some(declared) = upload.size {
        if declared != actual {
            return Err(UploadError::SizeMismatch { declared, actual });
        }
    }

    Ok(StoredResume {
        name: name.to_string(),
        file: upload.file.trim().to_string(),
        mime_type,
        size: actual,
        upload_date: now,
    })
}

/// Replaces the resume with the same name in place, or appends.
/// Returns `true` when an existing entry was replaced.
pub fn upsert_resume(resumes: &mut Vec<StoredResume>, resume: StoredResume) -> bool {
    match resumes.iter_mut().find(|r| r.name == resume.name) {
        Some(existing) => {
            *existing = resume;
            true
        }
        None => {
            resumes.push(resume);
            false
        }
    }
}

/// Removes the resume named `name`. Returns `false` if there was none.
pub fn remove_resume(resumes: &mut Vec<StoredResume>, name: &str) -> bool {
    let before = resumes.len();
    resumes.retain(|r| r.name != name);
    resumes.len() != before
}
