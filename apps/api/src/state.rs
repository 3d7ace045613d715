use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::storage::KvStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Profile, resumes and API key. Postgres or in-memory, per STORAGE_BACKEND.
    pub store: Arc<dyn KvStore>,
    /// Shared HTTP client for LLM calls; the per-request timeout is set at build time.
    pub http: reqwest::Client,
    pub config: Config,
    /// Held across load/modify/save of the resume list.
    pub resume_writes: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>, http: reqwest::Client, config: Config) -> Self {
        Self {
            store,
            http,
            config,
            resume_writes: Arc::new(Mutex::new(())),
        }
    }
}
