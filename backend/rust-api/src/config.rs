use config::ConfigError;
use serde::Deserialize;
use std::env;

use crate::services::flag_store::FlagCdnResolver;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_FLAGS_PATH: &str = "data/flags.json";
pub const DEFAULT_SAMPLE_SIZE: usize = 10;
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Server settings
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub flags_path: String,
    pub image_base_url: String,
    pub default_sample_size: usize,
}

/// Settings for the quiz client
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = load_settings()?;

        let port = match settings.get_int("server.port") {
            Ok(port) => port,
            Err(_) => match env::var("PORT") {
                Ok(raw) => raw.trim().parse::<i64>().map_err(|e| {
                    ConfigError::Message(format!("PORT must be a number, got {:?}: {}", raw, e))
                })?,
                Err(_) => i64::from(DEFAULT_PORT),
            },
        };
        let port = u16::try_from(port)
            .map_err(|_| ConfigError::Message(format!("Port out of range: {}", port)))?;

        let flags_path = settings
            .get_string("data.flags_path")
            .or_else(|_| env::var("FLAGS_PATH"))
            .unwrap_or_else(|_| DEFAULT_FLAGS_PATH.to_string());

        let image_base_url = settings
            .get_string("images.base_url")
            .or_else(|_| env::var("IMAGE_BASE_URL"))
            .unwrap_or_else(|_| FlagCdnResolver::DEFAULT_BASE_URL.to_string());
        validate_url("image base URL", &image_base_url)?;

        Ok(Config {
            port,
            flags_path,
            image_base_url,
            default_sample_size: DEFAULT_SAMPLE_SIZE,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            flags_path: DEFAULT_FLAGS_PATH.to_string(),
            image_base_url: FlagCdnResolver::DEFAULT_BASE_URL.to_string(),
            default_sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = load_settings()?;

        let api_base_url = settings
            .get_string("client.api_base_url")
            .or_else(|_| env::var("API_BASE_URL"))
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        validate_url("API base URL", &api_base_url)?;

        Ok(ClientConfig {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// `.env`, then `config/{APP_ENV}.toml`, then `APP__SECTION__KEY` variables
fn load_settings() -> Result<config::Config, ConfigError> {
    dotenvy::dotenv().ok();

    let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

    config::Config::builder()
        .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .build()
}

fn validate_url(label: &str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::Message(format!("Invalid {} {:?}: {}", label, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "PORT",
        "FLAGS_PATH",
        "IMAGE_BASE_URL",
        "API_BASE_URL",
        "APP__SERVER__PORT",
    ];

    fn clean_env() {
        // No config/test.toml exists, so only env vars are in play.
        env::set_var("APP_ENV", "test");
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clean_env();
        let config = Config::load().unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.flags_path, "data/flags.json");
        assert_eq!(config.image_base_url, "https://flagcdn.com/w320");
        assert_eq!(config.default_sample_size, 10);
    }

    #[test]
    #[serial]
    fn test_port_from_env() {
        clean_env();
        env::set_var("PORT", "8088");
        assert_eq!(Config::load().unwrap().port, 8088);
        clean_env();
    }

    #[test]
    #[serial]
    fn test_prefixed_env_wins_over_plain() {
        clean_env();
        env::set_var("PORT", "8088");
        env::set_var("APP__SERVER__PORT", "9099");
        assert_eq!(Config::load().unwrap().port, 9099);
        clean_env();
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_an_error() {
        clean_env();
        env::set_var("PORT", "not-a-port");
        assert!(Config::load().is_err());
        env::set_var("PORT", "70000");
        assert!(Config::load().is_err());
        clean_env();
    }

    #[test]
    #[serial]
    fn test_client_base_url() {
        clean_env();
        assert_eq!(
            ClientConfig::load().unwrap().api_base_url,
            "http://localhost:5000"
        );
        env::set_var("API_BASE_URL", "https://quiz.example.org/");
        assert_eq!(
            ClientConfig::load().unwrap().api_base_url,
            "https://quiz.example.org"
        );
        env::set_var("API_BASE_URL", "not a url");
        assert!(ClientConfig::load().is_err());
        clean_env();
    }
}
