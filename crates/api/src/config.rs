//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, with defaults
//! where a value is optional.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `SCHOOL_TIMEZONE`: IANA zone that decides what "today" is (default: "America/Denver")
//! - `WARNING_THRESHOLD`: Warnings of one type before detention (default: 2)
//! - `SLOT_LOOKAHEAD_DAYS`: How far ahead bookable slots are offered (default: 14)

use chrono_tz::Tz;
use conduct_core::policy::{DEFAULT_LOOKAHEAD_DAYS, DEFAULT_WARNING_THRESHOLD, Policy};
use eyre::{Result, WrapErr, eyre};
use std::env;
use tracing::Level;

pub const DEFAULT_TIMEZONE: &str = "America/Denver";

/// Configuration for the Conduct API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use conduct_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// The school's timezone
    pub timezone: Tz,

    pub policy: Policy,
}

pub fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - SCHOOL_TIMEZONE is not a known IANA zone
    /// - WARNING_THRESHOLD or SLOT_LOOKAHEAD_DAYS is not a number
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        let log_level =
            parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        // School settings
        let timezone = parse_timezone(
            &env::var("SCHOOL_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string()),
        )?;
        let warning_threshold = match env::var("WARNING_THRESHOLD") {
            Ok(value) => value.parse().wrap_err("Invalid WARNING_THRESHOLD value")?,
            Err(_) => DEFAULT_WARNING_THRESHOLD,
        };
        let lookahead_days = match env::var("SLOT_LOOKAHEAD_DAYS") {
            Ok(value) => value.parse().wrap_err("Invalid SLOT_LOOKAHEAD_DAYS value")?,
            Err(_) => DEFAULT_LOOKAHEAD_DAYS,
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            timezone,
            policy: Policy {
                warning_threshold,
                lookahead_days,
            },
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| eyre!("Invalid SCHOOL_TIMEZONE '{}': {}", name, e))
}
