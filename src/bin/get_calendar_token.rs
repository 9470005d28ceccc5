use audit_scheduler::calendar::{FileTokenStore, TokenManager};
use audit_scheduler::config::Config;
use audit_scheduler::error::{other_error, AppResult};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Extract a query parameter value from the raw callback URL
fn callback_param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    url.split(&format!("{}=", key))
        .nth(1)
        .and_then(|s| s.split('&').next())
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load()?;
    let token_path = config.token_path.clone();
    let config = Arc::new(RwLock::new(config));

    // Create token manager with a file-backed store
    let store = Arc::new(FileTokenStore::new(token_path));
    let token_manager = TokenManager::new(Arc::clone(&config), store);

    // Get client ID and secret
    let client_id = config.read().await.google_client_id.clone();
    let client_secret = config.read().await.google_client_secret.clone();

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    // Construct authorization URL; write scope since the app creates events
    let auth_url = format!(
        "https://accounts.google.com/o/oauth2/v2/auth?\
        client_id={}&\
        redirect_uri=http://localhost:8080&\
        response_type=code&\
        access_type=offline&\
        prompt=consent&\
        scope=https://www.googleapis.com/auth/calendar&\
        state={}",
        client_id, state
    );

    // Open browser for authorization
    println!("Opening browser for Google Calendar authorization...");
    webbrowser::open(&auth_url)?;

    // Start local server to receive the callback
    let server = tiny_http::Server::http("0.0.0.0:8080")
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    // Handle the callback
    let request = server
        .recv()
        .map_err(|e| other_error(&format!("Callback server error: {}", e)))?;
    let url = request.url().to_string();

    // The returned state must match the one sent on the consent URL
    let returned_state = callback_param(&url, "state")
        .ok_or_else(|| other_error("No state parameter found in callback"))?;
    if returned_state != state {
        return Err(other_error("State mismatch in authorization callback"));
    }

    // Parse the authorization code from the URL
    let code = callback_param(&url, "code")
        .ok_or_else(|| other_error("No authorization code found in callback"))?;

    // Exchange code for tokens
    let token_url = "https://oauth2.googleapis.com/token";
    let client = reqwest::Client::new();

    let response = client
        .post(token_url)
        .form(&[
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code.to_string()),
            ("redirect_uri", "http://localhost:8080".to_string()),
            ("grant_type", "authorization_code".to_string()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        return Err(other_error(&format!("Failed to get token: {}", error_text)));
    }

    let mut token_data: serde_json::Value = response.json().await?;

    // Add expiry timestamp
    let expires_in = token_data
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .unwrap_or(3600);
    let expires_at = chrono::Utc::now().timestamp() + expires_in;

    let token_data = if let Some(obj) = token_data.as_object_mut() {
        obj.insert("expires_at".to_string(), json!(expires_at));
        token_data
    } else {
        return Err(other_error("Token data is not an object"));
    };

    // Save token using TokenManager
    token_manager.set_token(token_data).await?;

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request
        .respond(response)
        .map_err(|e| other_error(&format!("Failed to respond to callback: {}", e)))?;

    println!("Token successfully saved. You can now run the scheduler.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::callback_param;

    #[test]
    fn test_callback_param_extraction() {
        let url = "/?state=abc-123&code=4%2FxyZ&scope=calendar";
        assert_eq!(callback_param(url, "state"), Some("abc-123"));
        assert_eq!(callback_param(url, "code"), Some("4%2FxyZ"));
        assert_eq!(callback_param(url, "missing"), None);
    }

    #[test]
    fn test_callback_state_comparison() {
        let sent = "expected-state";
        let url = format!("/?code=4%2FxyZ&state={}", sent);
        assert_eq!(callback_param(&url, "state"), Some(sent));

        let tampered = "/?code=4%2FxyZ&state=forged-state";
        assert_ne!(callback_param(tampered, "state"), Some(sent));
    }
}
