//! Authentication service HTTP client.

use crate::error::{AppError, Result};
use reqwest::{Client, cookie::Jar};
use std::sync::Arc;

/// Client for the account/session HTTP service.
///
/// Uses session-based authentication with cookies, so the jar carries
/// whatever session the service last established (including the one it
/// opens itself right after creating an account).
pub struct AuthClient {
    client: Client,
    base_url: String,
    signed_in: bool,
}

impl AuthClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The service URL (e.g., "http://localhost:9099")
    /// * `timeout_secs` - Per-request timeout
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(jar)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            signed_in: false,
        }
    }

    /// Create an account with the given credentials.
    ///
    /// The service signs the new account in as a side effect, so a
    /// successful call leaves this client with an active session.
    pub async fn create_account(&mut self, email: &str, password: &str) -> Result<()> {
        let url = format!("{base}/api/accounts", base = self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AccountCreation(extract_error_message(status.as_u16(), &body)));
        }

        self.signed_in = true;
        Ok(())
    }

    /// Sign in with the given credentials.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<()> {
        let url = format!("{base}/api/session", base = self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Session(extract_error_message(status.as_u16(), &body)));
        }

        self.signed_in = true;
        Ok(())
    }

    /// End the current session.
    pub async fn sign_out(&mut self) -> Result<()> {
        let url = format!("{base}/api/session", base = self.base_url);

        let response = self.client.delete(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Session(extract_error_message(status.as_u16(), &body)));
        }

        self.signed_in = false;
        Ok(())
    }

    /// Check if this client currently holds a session.
    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    /// Test connection to the service.
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!("{base}/", base = self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}

/// Pull a human-readable message out of an error response body.
///
/// The service answers errors with a JSON `{"error": "..."}` (some
/// deployments use `"message"`); anything else falls back to the raw body
/// or the status code.
fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str())
                && !msg.is_empty()
            {
                return msg.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {status}")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_field() {
        let msg = extract_error_message(400, r#"{"error": "email already in use"}"#);
        assert_eq!(msg, "email already in use");
    }

    #[test]
    fn test_extract_message_field() {
        let msg = extract_error_message(400, r#"{"message": "weak password"}"#);
        assert_eq!(msg, "weak password");
    }

    #[test]
    fn test_extract_plain_body() {
        let msg = extract_error_message(500, "internal failure\n");
        assert_eq!(msg, "internal failure");
    }

    #[test]
    fn test_extract_empty_body_uses_status() {
        let msg = extract_error_message(503, "");
        assert_eq!(msg, "HTTP 503");
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = AuthClient::new("http://localhost:9099/", 30);
        assert_eq!(client.base_url, "http://localhost:9099");
        assert!(!client.is_signed_in());
    }
}
