//! Runtime settings, read from the environment (and `.env`) once at startup.

use anyhow::{Context, anyhow};
use secrecy::SecretString;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:chat.db?mode=rwc";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TRANSCRIPT_MAX_MESSAGES: usize = 50;
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub gemini_api_key: SecretString,
    pub gemini_base_url: String,
    pub gemini_model: String,
    /// `None` leaves the outbound call without a timeout.
    pub gemini_timeout: Option<Duration>,
    /// Upper bound on prior messages replayed into a prompt. `None` replays everything.
    pub transcript_max_messages: Option<usize>,
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Settings with defaults for everything except the API key.
    pub fn new(gemini_api_key: impl Into<String>) -> Settings {
        Settings {
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            bind_address: DEFAULT_BIND_ADDRESS.to_owned(),
            gemini_api_key: SecretString::from(gemini_api_key.into()),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_owned(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_owned(),
            gemini_timeout: None,
            transcript_max_messages: Some(DEFAULT_TRANSCRIPT_MAX_MESSAGES),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }

    pub fn from_env() -> anyhow::Result<Settings> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GEMINI_API_KEY").map_err(|_| anyhow!("GEMINI_API_KEY must be set"))?;
        let mut settings = Settings::new(api_key);

        if let Ok(url) = env::var("DATABASE_URL") {
            settings.database_url = url;
        }
        if let Ok(address) = env::var("BIND_ADDRESS") {
            settings.bind_address = address;
        }
        if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
            settings.gemini_base_url = base_url.trim_end_matches('/').to_owned();
        }
        if let Ok(model) = env::var("GEMINI_MODEL") {
            settings.gemini_model = model;
        }
        if let Some(secs) = parse_var::<u64>("GEMINI_TIMEOUT_SECS")? {
            settings.gemini_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(max) = parse_var::<usize>("TRANSCRIPT_MAX_MESSAGES")? {
            settings.transcript_max_messages = (max > 0).then_some(max);
        }
        if let Ok(origins) = env::var("CORS_ALLOWED_ORIGINS") {
            settings.allowed_origins = split_origins(&origins);
        }

        Ok(settings)
    }
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{name} has an invalid value: {value:?}")),
        Err(_) => Ok(None),
    }
}

fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_owned)
        .collect()
}
