pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::autofill::handlers as autofill;
use crate::state::AppState;
use crate::storage::handlers as storage;

/// Room for a 10 MiB resume after base64 inflation, plus page snapshots.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Storage API (popup / options screens)
        .route(
            "/api/v1/profile",
            get(storage::handle_get_profile).put(storage::handle_put_profile),
        )
        .route(
            "/api/v1/resumes",
            get(storage::handle_list_resumes).post(storage::handle_upload_resume),
        )
        .route("/api/v1/resumes/:name", delete(storage::handle_delete_resume))
        .route(
            "/api/v1/api-key",
            get(storage::handle_get_api_key).put(storage::handle_put_api_key),
        )
        .route("/api/v1/api-key/test", post(storage::handle_test_api_key))
        // Auto-apply API (page script)
        .route("/api/v1/auto-apply", post(autofill::handle_auto_apply))
        .route("/api/v1/platform", get(autofill::handle_platform))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
