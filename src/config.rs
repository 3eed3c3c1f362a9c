use alloy_primitives::Address;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub events_path: String,
    pub primary_reward_token: Address,
    pub halt_on_error: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let events_path = env_map
            .get("EVENTS_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("EVENTS_PATH".to_string()))?;

        let primary_reward_token = env_map
            .get("PRIMARY_REWARD_TOKEN")
            .ok_or_else(|| ConfigError::MissingEnv("PRIMARY_REWARD_TOKEN".to_string()))
            .and_then(|s| {
                Address::from_str(s).map_err(|_| {
                    ConfigError::InvalidValue(
                        "PRIMARY_REWARD_TOKEN".to_string(),
                        "must be a 20-byte hex address".to_string(),
                    )
                })
            })?;

        let halt_on_error = match env_map
            .get("HALT_ON_ERROR")
            .map(|s| s.as_str())
            .unwrap_or("true")
        {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "HALT_ON_ERROR".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(Config {
            database_path,
            events_path,
            primary_reward_token,
            halt_on_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/test.db".to_string());
        map.insert("EVENTS_PATH".to_string(), "/tmp/events.ndjson".to_string());
        map.insert(
            "PRIMARY_REWARD_TOKEN".to_string(),
            "0x6b3595068778dd592e39a122f4f5a5cf09c90fe2".to_string(),
        );
        map
    }

    #[test]
    fn test_missing_database_path() {
        let mut env_map = setup_required_env();
        env_map.remove("DATABASE_PATH");
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_missing_events_path() {
        let mut env_map = setup_required_env();
        env_map.remove("EVENTS_PATH");
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "EVENTS_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_primary_reward_token() {
        let mut env_map = setup_required_env();
        env_map.insert("PRIMARY_REWARD_TOKEN".to_string(), "not_hex".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PRIMARY_REWARD_TOKEN"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_halt_on_error_defaults_true() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert!(config.halt_on_error);
    }

    #[test]
    fn test_invalid_halt_on_error() {
        let mut env_map = setup_required_env();
        env_map.insert("HALT_ON_ERROR".to_string(), "maybe".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "HALT_ON_ERROR"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
