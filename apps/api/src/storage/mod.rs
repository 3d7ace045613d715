//! Key-value persistence for the three opaque records the extension keeps:
//! `profile`, `resumes` and `gptApiKey`.

pub mod handlers;
pub mod validation;

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{Profile, StoredResume};

pub const PROFILE_KEY: &str = "profile";
pub const RESUMES_KEY: &str = "resumes";
pub const API_KEY_KEY: &str = "gptApiKey";

/// Storage seam. Values are opaque JSON blobs; there is no versioning.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// Postgres-backed store over the `storage_entries` table.
pub struct PgKvStore {
    pool: PgPool,
}

impl PgKvStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KvStore for PgKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let value: Option<Value> =
            sqlx::query_scalar("SELECT value FROM storage_entries WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO storage_entries (key, value, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(&value)
        .execute(&self.pool)
        .await?;
        debug!("Stored key '{key}'");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM storage_entries WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// In-process store, used by tests and `STORAGE_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryKvStore {
    data: RwLock<HashMap<String, Value>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.data.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.data.write().await.remove(key).is_some())
    }
}

/// Everything a run needs from storage, loaded in one go.
#[derive(Debug, Clone, Default)]
pub struct UserData {
    pub profile: Profile,
    pub resumes: Vec<StoredResume>,
    pub api_key: Option<String>,
}

pub async fn load_profile(store: &dyn KvStore) -> Result<Profile> {
    match store.get(PROFILE_KEY).await? {
        Some(value) => serde_json::from_value(value).context("stored profile is not a string map"),
        None => Ok(Profile::default()),
    }
}

pub async fn save_profile(store: &dyn KvStore, profile: &Profile) -> Result<()> {
    store.set(PROFILE_KEY, serde_json::to_value(profile)?).await
}

pub async fn load_resumes(store: &dyn KvStore) -> Result<Vec<StoredResume>> {
    match store.get(RESUMES_KEY).await? {
        Some(value) => serde_json::from_value(value).context("stored resumes are malformed"),
        None => Ok(Vec::new()),
    }
}

pub async fn save_resumes(store: &dyn KvStore, resumes: &[StoredResume]) -> Result<()> {
    store.set(RESUMES_KEY, serde_json::to_value(resumes)?).await
}

/// Returns the stored key, treating a blank string as "not configured".
pub async fn load_api_key(store: &dyn KvStore) -> Result<Option<String>> {
    let key = match store.get(API_KEY_KEY).await? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => anyhow::bail!("stored API key is not a string: {other}"),
    };
    Ok(key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()))
}

pub async fn save_api_key(store: &dyn KvStore, api_key: &str) -> Result<()> {
    store
        .set(API_KEY_KEY, Value::String(api_key.trim().to_string()))
        .await
}

pub async fn load_user_data(store: &dyn KvStore) -> Result<UserData> {
    Ok(UserData {
        profile: load_profile(store).await?,
        resumes: load_resumes(store).await?,
        api_key: load_api_key(store).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_keys_load_as_defaults() {
        let store = MemoryKvStore::new();
        let data = load_user_data(&store).await.unwrap();
        assert!(data.profile.is_empty());
        assert!(data.resumes.is_empty());
        assert!(data.api_key.is_none());
    }

    #[tokio::test]
    async fn test_profile_persists_through_store() {
        let store = MemoryKvStore::new();
        let profile: Profile = [("firstName", "Ada"), ("city", "London")].into_iter().collect();
        save_profile(&store, &profile).await.unwrap();

        let loaded = load_profile(&store).await.unwrap();
        assert_eq!(loaded, profile);
        assert_eq!(store.get(PROFILE_KEY).await.unwrap(), Some(json!({"city": "London", "firstName": "Ada"})));
    }

    #[tokio::test]
    async fn test_blank_api_key_is_not_configured() {
        let store = MemoryKvStore::new();
        save_api_key(&store, "   ").await.unwrap();
        assert!(load_api_key(&store).await.unwrap().is_none());

        save_api_key(&store, " sk-123 ").await.unwrap();
        assert_eq!(load_api_key(&store).await.unwrap().as_deref(), Some("sk-123"));
    }

    #[tokio::test]
    async fn test_malformed_profile_is_an_error() {
        let store = MemoryKvStore::new();
        store.set(PROFILE_KEY, json!(["not", "a", "map"])).await.unwrap();
        assert!(load_profile(&store).await.is_err());
    }

    #[tokio::test]
    async fn test_remove_reports_presence() {
        let store = MemoryKvStore::new();
        assert!(!store.remove(API_KEY_KEY).await.unwrap());
        save_api_key(&store, "k").await.unwrap();
        assert!(store.remove(API_KEY_KEY).await.unwrap());
    }
}
