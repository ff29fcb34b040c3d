// src/config.rs
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_HF_BASE_URL: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_CHAT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is not valid: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub skin_analysis_api_url: String,
    pub huggingface_api_key: String,
    pub huggingface_base_url: String,
    pub chat_model: String,
    pub chat_max_tokens: u32,
    pub chat_temperature: f64,
    pub upstream_timeout_secs: u64,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; real deployments set the environment.
        let _ = dotenvy::dotenv();
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads configuration through `get` so tests never touch the process
    /// environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let skin_analysis_api_url = get("SKIN_ANALYSIS_API_URL")
            .ok_or(ConfigError::Missing("SKIN_ANALYSIS_API_URL"))?;
        let huggingface_api_key =
            get("HUGGINGFACE_API_KEY").ok_or(ConfigError::Missing("HUGGINGFACE_API_KEY"))?;

        Ok(Self {
            skin_analysis_api_url,
            huggingface_api_key,
            huggingface_base_url: get("HUGGINGFACE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_HF_BASE_URL.to_string()),
            chat_model: get("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            chat_max_tokens: parse_or(&mut get, "CHAT_MAX_TOKENS", 1000)?,
            chat_temperature: parse_or(&mut get, "CHAT_TEMPERATURE", 0.7)?,
            upstream_timeout_secs: parse_or(&mut get, "UPSTREAM_TIMEOUT_SECS", 30)?,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
        })
    }
}

fn parse_or<F, T>(get: &mut F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: FnMut(&str) -> Option<String>,
    T: FromStr,
{
    match get(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_missing_skin_url() {
        let get = |k: &str| match k {
            "HUGGINGFACE_API_KEY" => Some("hf_x".into()),
            _ => None,
        };
        let err = Config::from_env_with(get).unwrap_err();
        assert_eq!(err.to_string(), "SKIN_ANALYSIS_API_URL must be set");
    }

    #[test]
    fn from_env_applies_defaults() {
        let get = |k: &str| match k {
            "SKIN_ANALYSIS_API_URL" => Some("http://skin.local".into()),
            "HUGGINGFACE_API_KEY" => Some("hf_x".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.huggingface_base_url, DEFAULT_HF_BASE_URL);
        assert_eq!(cfg.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(cfg.chat_max_tokens, 1000);
        assert_eq!(cfg.chat_temperature, 0.7);
        assert_eq!(cfg.upstream_timeout_secs, 30);
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn from_env_rejects_bad_numbers() {
        let get = |k: &str| match k {
            "SKIN_ANALYSIS_API_URL" => Some("http://skin.local".into()),
            "HUGGINGFACE_API_KEY" => Some("hf_x".into()),
            "CHAT_MAX_TOKENS" => Some("lots".into()),
            _ => None,
        };
        let err = Config::from_env_with(get).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "CHAT_MAX_TOKENS", .. }));
    }
}
