//! Session configuration: CLI flags, defaults, and the bearer token lookup.
//!
//! Parsed by hand; there is no argument-parsing crate in the ambient stack.

use crate::errors::ConfigError;

const DEFAULT_HOST: &str = "localhost:8080";
const DEFAULT_PATH: &str = "/echo";
const DEFAULT_RETRY_INTERVAL_SECONDS: u64 = 15;

/// Constructor input for a `Session`. Defaults are applied once here;
/// mutating a `SessionConfig` after `Run` has begun has no effect on the
/// session already in flight, since `Session::run` takes it by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub host: String,
    pub path: String,
    pub retry_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            host: DEFAULT_HOST.to_string(),
            path: DEFAULT_PATH.to_string(),
            retry_interval_seconds: DEFAULT_RETRY_INTERVAL_SECONDS,
        }
    }
}

impl SessionConfig {
    pub fn url(&self) -> String {
        format!("ws://{}{}", self.host, self.path)
    }

    /// Parses `--host`, `--path`, `--retry-interval-seconds` out of the
    /// remaining CLI args, leaving every unset flag at its default.
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let mut config = SessionConfig::default();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--host" => {
                    config.host = require_value(args, &mut i, "--host")?;
                }
                "--path" => {
                    config.path = require_value(args, &mut i, "--path")?;
                }
                "--retry-interval-seconds" => {
                    let raw = require_value(args, &mut i, "--retry-interval-seconds")?;
                    let parsed: u64 = raw.parse().map_err(|_| ConfigError::InvalidFlagValue {
                        flag: "--retry-interval-seconds",
                        value: raw.clone(),
                    })?;
                    if parsed < 1 {
                        return Err(ConfigError::InvalidFlagValue { flag: "--retry-interval-seconds", value: raw });
                    }
                    config.retry_interval_seconds = parsed;
                }
                _ => {
                    i += 1;
                }
            }
        }
        Ok(config)
    }
}

fn require_value(args: &[String], i: &mut usize, flag: &'static str) -> Result<String, ConfigError> {
    let value = args
        .get(*i + 1)
        .cloned()
        .ok_or(ConfigError::InvalidFlagValue { flag, value: String::new() })?;
    *i += 2;
    Ok(value)
}

/// Reads the bearer token from `INFLUX_TOKEN`. Its absence is the fatal
/// configuration error surfaced before any dial attempt.
pub fn bearer_token() -> Result<String, ConfigError> {
    std::env::var("INFLUX_TOKEN").map_err(|_| ConfigError::MissingBearerToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_wire_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.host, "localhost:8080");
        assert_eq!(config.path, "/echo");
        assert_eq!(config.retry_interval_seconds, 15);
        assert_eq!(config.url(), "ws://localhost:8080/echo");
    }

    #[test]
    fn from_args_overrides_only_given_flags() {
        let args = vec!["--host".to_string(), "example.com:9000".to_string()];
        let config = SessionConfig::from_args(&args).unwrap();
        assert_eq!(config.host, "example.com:9000");
        assert_eq!(config.path, "/echo");
    }

    #[test]
    fn from_args_rejects_non_numeric_retry_interval() {
        let args = vec!["--retry-interval-seconds".to_string(), "soon".to_string()];
        let err = SessionConfig::from_args(&args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlagValue { flag: "--retry-interval-seconds", .. }));
    }

    #[test]
    fn from_args_rejects_retry_interval_below_one() {
        let args = vec!["--retry-interval-seconds".to_string(), "0".to_string()];
        let err = SessionConfig::from_args(&args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFlagValue { flag: "--retry-interval-seconds", .. }));
    }

    #[test]
    fn bearer_token_is_missing_without_the_env_var() {
        std::env::remove_var("INFLUX_TOKEN");
        assert!(matches!(bearer_token(), Err(ConfigError::MissingBearerToken)));
    }
}
