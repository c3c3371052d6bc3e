use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind host (e.g., 0.0.0.0)
    pub app_host: String,
    /// HTTP bind port (e.g., 8000)
    pub app_port: u16,

    /// Force the deterministic mock decider even when a key is present.
    pub ai_mock: bool,
    /// OpenAI credential. Absence forces mock mode (with a warning), never a
    /// startup failure.
    pub openai_api_key: Option<String>,
    /// Model id sent to the completions endpoint.
    pub openai_model: String,
    /// OpenAI API base URL. Overridable so tests can point at a local server.
    pub openai_base_url: Url,
    /// Attempt budget for one analyze call (transport + parse failures).
    pub ai_max_retries: u32,

    /// Jaccard similarity below this means "the screen changed".
    pub screen_change_threshold: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL for {name}: {value}")]
    InvalidUrl { name: &'static str, value: String },
    #[error("Invalid number for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("General error: {0}")]
    Other(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env if present
        let _ = dotenv();

        let app_host = env_or_default("APP_HOST", "0.0.0.0");
        let app_port = parse_or_default::<u16>("APP_PORT", 8000)?;

        let ai_mock = parse_bool_or_default("AI_SERVER_MOCK", false)?;
        let openai_api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        let openai_model = env_or_default("OPENAI_MODEL", "gpt-5.1");
        let openai_base_url = parse_url_or_default("OPENAI_BASE_URL", "https://api.openai.com")?;
        let ai_max_retries = parse_or_default::<u32>("AI_MAX_RETRIES", 2)?;

        let screen_change_threshold = parse_or_default::<f64>("SCREEN_CHANGE_THRESHOLD", 0.6)?;

        Ok(Self {
            app_host,
            app_port,
            ai_mock,
            openai_api_key,
            openai_model,
            openai_base_url,
            ai_max_retries,
            screen_change_threshold,
        })
    }
}

/* --------------------------- helpers --------------------------- */

fn env_or_default(key: &'static str, default: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or_default<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(v) => v.parse::<T>().map_err(|_| ConfigError::InvalidNumber {
            name: key,
            value: v,
        }),
        Err(_) => Ok(default),
    }
}

fn parse_bool_or_default(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Ok(v) => {
            let vv = v.to_lowercase();
            match vv.as_str() {
                "1" | "true" | "yes" | "y" => Ok(true),
                "0" | "false" | "no" | "n" => Ok(false),
                _ => Err(ConfigError::Other(format!("Invalid bool for {key}: {v}"))),
            }
        }
        Err(_) => Ok(default),
    }
}

fn parse_url_or_default(key: &'static str, default: &'static str) -> Result<Url, ConfigError> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|_| ConfigError::InvalidUrl {
        name: key,
        value: raw,
    })
}
