use anyhow::{bail, Context, Result};

/// Which key-value backend holds the profile, resumes and API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    /// Required only for the Postgres backend.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on page passes for one application (multi-page forms).
    pub max_steps: u32,
    /// Click submit/next once every required field is answered.
    pub auto_submit: bool,
    /// Delay the host waits after a resume upload before navigating.
    pub upload_settle_ms: u64,
    /// Bound on the host's page-load wait.
    pub page_load_timeout_ms: u64,
    pub llm_timeout_secs: u64,
    /// Ask the LLM a throwaway question at the start of every run and log the reply.
    pub probe_llm_on_start: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let storage_backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => bail!("STORAGE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        };

        let database_url = match storage_backend {
            StorageBackend::Postgres => Some(require_env("DATABASE_URL")?),
            StorageBackend::Memory => std::env::var("DATABASE_URL").ok(),
        };

        Ok(Config {
            storage_backend,
            database_url,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_steps: parse_env("MAX_STEPS", 10)?,
            auto_submit: parse_env("AUTO_SUBMIT", true)?,
            upload_settle_ms: parse_env("UPLOAD_SETTLE_MS", 3000)?,
            page_load_timeout_ms: parse_env("PAGE_LOAD_TIMEOUT_MS", 5000)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 30)?,
            probe_llm_on_start: parse_env("PROBE_LLM_ON_START", false)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::Memory,
            database_url: None,
            port: 8080,
            rust_log: "info".to_string(),
            max_steps: 10,
            auto_submit: true,
            upload_settle_ms: 3000,
            page_load_timeout_ms: 5000,
            llm_timeout_secs: 30,
            probe_llm_on_start: false,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}
