use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://sonnylabs-service.onrender.com";
pub const DEFAULT_ANALYSIS_ID: u64 = 12;
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 5000;
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 30;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Remote analysis service settings.
#[derive(Clone)]
pub struct AnalysisConfig {
    pub api_token: String,
    pub base_url: String,
    pub analysis_id: u64,
    pub tag_prefix: String,
    pub timeout: Duration,
}

// Token stays out of logs.
impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_token", &"***")
            .field("base_url", &self.base_url)
            .field("analysis_id", &self.analysis_id)
            .field("tag_prefix", &self.tag_prefix)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub static_dir: String,
    pub max_text_length: usize,
    pub rate_limit_per_minute: u32,
    pub analysis: AnalysisConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_token = lookup("SONNYLABS_API_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::Missing("SONNYLABS_API_TOKEN"))?;

        let analysis = AnalysisConfig {
            api_token,
            base_url: lookup("SONNYLABS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            analysis_id: parse_or(&lookup, "SONNYLABS_ANALYSIS_ID", DEFAULT_ANALYSIS_ID)?,
            tag_prefix: lookup("SONNYLABS_TAG_PREFIX").unwrap_or_else(|| "pii-lens".to_string()),
            timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
        };

        Ok(Config {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8000)?,
            workers: parse_or(&lookup, "WORKERS", num_cpus::get())?,
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "./static".to_string()),
            max_text_length: parse_or(&lookup, "MAX_TEXT_LENGTH", DEFAULT_MAX_TEXT_LENGTH)?,
            rate_limit_per_minute: parse_or(
                &lookup,
                "RATE_LIMIT_PER_MINUTE",
                DEFAULT_RATE_LIMIT_PER_MINUTE,
            )?,
            analysis,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
