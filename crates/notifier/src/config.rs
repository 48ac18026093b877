use eyre::{Result, eyre};
use std::env;

pub const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";
pub const DEFAULT_EMAIL_FROM: &str = "Conduct <noreply@conduct.school>";
pub const DEFAULT_PORTAL_URL: &str = "http://localhost:5173/parent";
pub const DEFAULT_DETENTION_TIME: &str = "3:45 PM";

/// Configuration for outbound email.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Bearer token for the email API (required)
    pub api_key: String,
    /// Endpoint that accepts one message per POST
    pub api_url: String,
    /// Sender shown on every message
    pub from: String,
    /// Where parents redeem their access code
    pub portal_url: String,
    /// Wall-clock start of detention, quoted in notices
    pub detention_time: String,
}

impl NotifierConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("RESEND_API_KEY")
            .map_err(|_| eyre!("RESEND_API_KEY environment variable not set"))?;

        let api_url =
            env::var("EMAIL_API_URL").unwrap_or_else(|_| DEFAULT_EMAIL_API_URL.to_string());
        let from = env::var("EMAIL_FROM").unwrap_or_else(|_| DEFAULT_EMAIL_FROM.to_string());
        let portal_url =
            env::var("PORTAL_URL").unwrap_or_else(|_| DEFAULT_PORTAL_URL.to_string());
        let detention_time =
            env::var("DETENTION_TIME").unwrap_or_else(|_| DEFAULT_DETENTION_TIME.to_string());

        Ok(Self {
            api_key,
            api_url,
            from,
            portal_url,
            detention_time,
        })
    }
}
