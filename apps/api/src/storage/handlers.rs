//! Axum route handlers backing the popup and options screens.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::{Profile, ResumeSummary};
use crate::state::AppState;
use crate::storage::validation::{remove_resume, upsert_resume, validate_upload, ResumeUpload};
use crate::storage::{
    load_api_key, load_profile, load_resumes, save_api_key, save_profile, save_resumes,
};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ResumeListResponse {
    pub resumes: Vec<ResumeSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub resume: ResumeSummary,
    pub replaced: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequest {
    pub gpt_api_key: String,
}

#[derive(Debug, Serialize)]
pub struct ApiKeyStatus {
    pub configured: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestKeyRequest {
    /// Key typed into the popup but not saved yet. Falls back to the stored key.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
}

fn storage_error(e: anyhow::Error) -> AppError {
    AppError::Storage(format!("{e:#}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/profile
pub async fn handle_get_profile(State(state): State<AppState>) -> Result<Json<Profile>, AppError> {
    let profile = load_profile(state.store.as_ref())
        .await
        .map_err(storage_error)?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile
///
/// Replaces the whole profile, mirroring the popup's form submit.
pub async fn handle_put_profile(
    State(state): State<AppState>,
    Json(profile): Json<Profile>,
) -> Result<Json<Profile>, AppError> {
    save_profile(state.store.as_ref(), &profile)
        .await
        .map_err(storage_error)?;
    info!("Profile saved");
    Ok(Json(profile))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<ResumeListResponse>, AppError> {
    let resumes = load_resumes(state.store.as_ref())
        .await
        .map_err(storage_error)?;
    let summaries: Vec<ResumeSummary> = resumes.iter().map(ResumeSummary::from).collect();
    Ok(Json(ResumeListResponse {
        count: summaries.len(),
        resumes: summaries,
    }))
}

/// POST /api/v1/resumes
///
/// Validates before reading storage; a rejected upload never touches the store.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Json(upload): Json<ResumeUpload>,
) -> Result<(StatusCode, Json<ResumeUploadResponse>), AppError> {
    let resume = validate_upload(&upload, Utc::now()).map_err(|e| {
        warn!("Rejected resume upload '{}': {e}", upload.name);
        AppError::Validation(e.to_string())
    })?;
    let summary = ResumeSummary::from(&resume);

    let _guard = state.resume_writes.lock().await;
    let mut resumes = load_resumes(state.store.as_ref())
        .await
        .map_err(storage_error)?;
    let replaced = upsert_resume(&mut resumes, resume);
    save_resumes(state.store.as_ref(), &resumes)
        .await
        .map_err(storage_error)?;

    info!(
        "{} resume '{}' ({} bytes)",
        if replaced { "Updated" } else { "Added" },
        summary.name,
        summary.size
    );

    let status = if replaced {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(ResumeUploadResponse {
            resume: summary,
            replaced,
        }),
    ))
}

/// DELETE /api/v1/resumes/:name
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    let _guard = state.resume_writes.lock().await;
    let mut resumes = load_resumes(state.store.as_ref())
        .await
        .map_err(storage_error)?;
    if !remove_resume(&mut resumes, &name) {
        return Err(AppError::NotFound(format!("Resume '{name}' not found")));
    }
    save_resumes(state.store.as_ref(), &resumes)
        .await
        .map_err(storage_error)?;
    info!("Deleted resume '{name}'");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/api-key
pub async fn handle_get_api_key(
    State(state): State<AppState>,
) -> Result<Json<ApiKeyStatus>, AppError> {
    let key = load_api_key(state.store.as_ref())
        .await
        .map_err(storage_error)?;
    Ok(Json(ApiKeyStatus {
        configured: key.is_some(),
    }))
}

/// PUT /api/v1/api-key
pub async fn handle_put_api_key(
    State(state): State<AppState>,
    Json(request): Json<ApiKeyRequest>,
) -> Result<Json<ApiKeyStatus>, AppError> {
    save_api_key(state.store.as_ref(), &request.gpt_api_key)
        .await
        .map_err(storage_error)?;
    Ok(Json(ApiKeyStatus {
        configured: !request.gpt_api_key.trim().is_empty(),
    }))
}

/// POST /api/v1/api-key/test
///
/// Sends a one-line probe to the LLM. Any failure reads as "not connected".
pub async fn handle_test_api_key(
    State(state): State<AppState>,
    Json(request): Json<TestKeyRequest>,
) -> Result<Json<ConnectionStatus>, AppError> {
    let supplied = request
        .api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    let api_key = match supplied {
        Some(key) => Some(key),
        None => load_api_key(state.store.as_ref())
            .await
            .map_err(storage_error)?,
    };

    let Some(api_key) = api_key else {
        return Ok(Json(ConnectionStatus { connected: false }));
    };

    let llm = LlmClient::new(state.http.clone(), api_key);
    let connected = llm.test_connection().await;
    info!("LLM connection test: connected={connected}");
    Ok(Json(ConnectionStatus { connected }))
}
