//! Transactional email delivery.

use async_trait::async_trait;
use conduct_core::errors::{ConductError, ConductResult};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::config::NotifierConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> ConductResult<()>;
}

/// Posts one message per request to a Resend-compatible endpoint.
pub struct ResendMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(config: &NotifierConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            from: config.from.clone(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: Email) -> ConductResult<()> {
        let mut payload = json!({
            "from": self.from,
            "to": email.to,
            "subject": email.subject,
            "html": email.html,
        });
        if !email.cc.is_empty() {
            payload["cc"] = json!(email.cc);
        }

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ConductError::Notification(format!("Email request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ConductError::Notification(format!(
                "Email API returned {}: {}",
                status, error_text
            )));
        }

        debug!(subject = %email.subject, recipients = email.to.len(), "email accepted");
        Ok(())
    }
}
