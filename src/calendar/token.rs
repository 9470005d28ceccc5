use crate::config::Config;
use crate::error::{auth_error, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Storage for the opaque serialized token blob
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored token blob, if any
    async fn load(&self) -> AppResult<Option<Value>>;
    /// Persist the token blob
    async fn save(&self, token: &Value) -> AppResult<()>;
}

/// Token store backed by a local JSON file
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> AppResult<Option<Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let token: Value = serde_json::from_str(&content)
                    .map_err(|e| auth_error(&format!("Failed to parse token file: {}", e)))?;
                Ok(Some(token))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, token: &Value) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.path, token.to_string()).await?;
        Ok(())
    }
}

/// Credential cache with explicit load, validity check, refresh and
/// persist steps. A valid access token returned from here is usable
/// immediately against the calendar API.
#[derive(Clone)]
pub struct TokenManager {
    config: Arc<RwLock<Config>>,
    store: Arc<dyn TokenStore>,
    client: Client,
}

impl TokenManager {
    pub fn new(config: Arc<RwLock<Config>>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            config,
            store,
            client: Client::new(),
        }
    }

    /// Get a valid OAuth access token, refreshing the stored one if it
    /// has expired
    pub async fn get_access_token(&self) -> AppResult<String> {
        let token = self
            .store
            .load()
            .await?
            .ok_or_else(|| auth_error("No stored credential. Run get_calendar_token first."))?;

        // Check if the stored token is still valid
        if let Some(expiry) = token.get("expires_at").and_then(|v| v.as_i64()) {
            let now = Utc::now().timestamp();
            if expiry > now {
                return token
                    .get("access_token")
                    .and_then(|t| t.as_str())
                    .map(|t| t.to_string())
                    .ok_or_else(|| auth_error("Stored credential has no access token"));
            }
            // Token is expired, refresh it
            let refreshed = self.refresh_token(&token).await?;
            return refreshed
                .get("access_token")
                .and_then(|t| t.as_str())
                .map(|t| t.to_string())
                .ok_or_else(|| auth_error("Refreshed credential has no access token"));
        }

        Err(auth_error(
            "Stored credential has no expiry. Run get_calendar_token again.",
        ))
    }

    /// Refresh an expired token and persist the result
    async fn refresh_token(&self, token: &Value) -> AppResult<Value> {
        let refresh_token = token
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| auth_error("No refresh token in stored credential"))?;

        let client_id = {
            let config_read = self.config.read().await;
            config_read.google_client_id.clone()
        };

        let client_secret = {
            let config_read = self.config.read().await;
            config_read.google_client_secret.clone()
        };

        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token.to_string()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self
            .client
            .post("https://oauth2.googleapis.com/token")
            .form(&params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: Value = response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = new_token
            .get("access_token")
            .cloned()
            .ok_or_else(|| auth_error("Token response missing 'access_token' field"))?;

        // Combine the new access token with the existing refresh token
        let mut token_data = serde_json::Map::new();
        token_data.insert("access_token".to_string(), access_token);
        token_data.insert("refresh_token".to_string(), json!(refresh_token));

        // Calculate expiry
        let expires_in = new_token
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(3600);
        let expires_at = Utc::now().timestamp() + expires_in;
        token_data.insert("expires_at".to_string(), json!(expires_at));

        let token_json = json!(token_data);
        self.store.save(&token_json).await?;
        info!("Refreshed and persisted calendar credential");

        Ok(token_json)
    }

    /// Store a freshly obtained token (called from the consent flow)
    pub async fn set_token(&self, token_json: Value) -> AppResult<()> {
        self.store.save(&token_json).await
    }
}
