//! Axum route handlers for the controller ↔ page-script messages.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::autofill::engine::{probe_llm, AutoApplicator, EngineSettings};
use crate::autofill::plan::FillPlan;
use crate::autofill::platform::{detect_platform, is_job_application_page, Platform};
use crate::errors::AppError;
use crate::llm_client::{AnswerGenerator, LlmClient};
use crate::page::FormDocument;
use crate::state::AppState;
use crate::storage::load_user_data;

pub const START_AUTO_APPLY: &str = "startAutoApply";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AutoApplyRequest {
    pub action: String,
    pub url: String,
    pub html: String,
    /// Pages already processed for this application.
    #[serde(default)]
    pub step: u32,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AutoApplyResponse {
    Started { platform: Platform, plan: FillPlan },
    Error { message: String },
}

#[derive(Debug, Deserialize)]
pub struct PlatformQuery {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct PlatformResponse {
    pub platform: Platform,
    pub is_job_page: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auto-apply
///
/// Runs one pass over the posted page and returns the fill plan for the host to replay.
/// Run failures come back as `{status: "error"}`; only malformed requests are HTTP errors.
pub async fn handle_auto_apply(
    State(state): State<AppState>,
    Json(request): Json<AutoApplyRequest>,
) -> Result<Json<AutoApplyResponse>, AppError> {
    if request.action != START_AUTO_APPLY {
        return Err(AppError::Validation(format!(
            "Unknown action '{}'",
            request.action
        )));
    }

    let run_id = Uuid::new_v4();
    let span = info_span!("auto_apply", %run_id, url = %request.url);
    let response = run_auto_apply(&state, request).instrument(span).await;
    Ok(Json(response))
}

async fn run_auto_apply(state: &AppState, request: AutoApplyRequest) -> AutoApplyResponse {
    let user_data = match load_user_data(state.store.as_ref()).await {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to initialize auto applicator: {e:#}");
            return AutoApplyResponse::Error {
                message: "Failed to initialize".to_string(),
            };
        }
    };

    let platform = detect_platform(&request.url);
    if !is_job_application_page(&request.url) {
        info!("Page does not look like a job application");
    }
    info!("Auto applicator initialized for platform: {platform}");
    if user_data.profile.is_empty() {
        warn!("Profile is empty; only hardcoded and LLM answers are available");
    }

    let llm = user_data
        .api_key
        .clone()
        .map(|key| LlmClient::new(state.http.clone(), key));
    let llm_ref = llm.as_ref().map(|c| c as &dyn AnswerGenerator);

    if state.config.probe_llm_on_start {
        if let Some(llm) = llm_ref {
            probe_llm(llm).await;
        }
    }

    let doc = FormDocument::parse(&request.url, &request.html);
    let applicator = AutoApplicator::new(
        &user_data.profile,
        &user_data.resumes,
        llm_ref,
        EngineSettings::from(&state.config),
    );

    match applicator.run(doc, request.step).await {
        Ok(plan) => {
            info!(
                "Plan ready: {} actions, {} answers, navigation {:?}",
                plan.actions.len(),
                plan.answers.len(),
                plan.navigation
            );
            AutoApplyResponse::Started { platform, plan }
        }
        Err(e) => {
            error!("Error in auto apply process: {e}");
            AutoApplyResponse::Error {
                message: e.to_string(),
            }
        }
    }
}

/// GET /api/v1/platform?url=...
pub async fn handle_platform(Query(query): Query<PlatformQuery>) -> Json<PlatformResponse> {
    Json(PlatformResponse {
        platform: detect_platform(&query.url),
        is_job_page: is_job_application_page(&query.url),
    })
}
