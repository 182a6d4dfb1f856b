use crate::utils::error::{CoachError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use clap::Parser;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Clone, Parser)]
#[command(name = "dialect-coach")]
#[command(about = "HTTP service that grades English text against a target dialect using Gemini")]
pub struct ServerConfig {
    /// Gemini API key. Without it the analysis endpoint answers with a configuration error.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Upper bound for a single call to the generation backend.
    #[arg(long, env = "GEMINI_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Directory with the web frontend, served for unmatched GET requests.
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Reject model replies that are not a well-formed analysis object.
    #[arg(long, env = "VALIDATE_OUTPUT")]
    pub validate_output: bool,

    #[arg(long, env = "JSON_LOGS", help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Everything the Gemini adapter needs to talk to the API.
#[derive(Clone)]
pub struct BackendSettings {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

impl ServerConfig {
    /// The API key, treating a blank value as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.host.parse().map_err(|e| CoachError::InvalidValueError {
            field: "host".to_string(),
            value: self.host.clone(),
            reason: format!("Invalid IP address: {}", e),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn backend_settings(&self) -> Option<BackendSettings> {
        self.api_key().map(|api_key| BackendSettings {
            api_key: api_key.to_string(),
            api_base: self.api_base.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        validate_url("api_base", &self.api_base)?;
        validate_non_empty_string("model", &self.model)?;
        validate_positive_number("timeout_secs", self.timeout_secs, 1)?;

        if let Some(dir) = &self.static_dir {
            let dir_str = dir.to_string_lossy();
            validate_path("static_dir", &dir_str)?;
            if !dir.is_dir() {
                return Err(CoachError::ConfigError {
                    message: format!("static_dir '{}' is not a directory", dir_str),
                });
            }
        }

        Ok(())
    }
}

// The key is left out so configs can be logged.
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("static_dir", &self.static_dir)
            .field("validate_output", &self.validate_output)
            .field("json_logs", &self.json_logs)
            .field("verbose", &self.verbose)
            .finish()
    }
}

/// Parses arguments with every `env` fallback switched off.
#[cfg(test)]
pub(crate) fn parse_args_only(args: &[&str]) -> ServerConfig {
    use clap::{CommandFactory, FromArgMatches};

    let argv = std::iter::once("dialect-coach").chain(args.iter().copied());
    let matches = ServerConfig::command()
        .mut_args(|arg| arg.env(None::<&'static str>))
        .try_get_matches_from(argv)
        .unwrap();
    ServerConfig::from_arg_matches(&matches).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServerConfig {
        parse_args_only(args)
    }

    fn parse_with_key(args: &[&str]) -> ServerConfig {
        let mut argv = vec!["--api-key", "test-key"];
        argv.extend_from_slice(args);
        parse(&argv)
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = parse(&[]);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_api_key_means_unconfigured() {
        let config = parse(&["--api-key", "   "]);
        assert!(config.api_key().is_none());
        assert!(config.backend_settings().is_none());
    }

    #[test]
    fn test_backend_settings_carry_timeout() {
        let config = parse_with_key(&["--timeout-secs", "12", "--model", "gemini-test"]);
        let settings = config.backend_settings().unwrap();
        assert_eq!(settings.api_key, "test-key");
        assert_eq!(settings.model, "gemini-test");
        assert_eq!(settings.timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_rejects_zero_timeout() {
        assert!(parse(&["--timeout-secs", "0"]).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_api_base() {
        assert!(parse(&["--api-base", "not a url"]).validate().is_err());
    }

    #[test]
    fn test_rejects_empty_model() {
        assert!(parse(&["--model", " "]).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_host() {
        assert!(parse(&["--host", "localhost:80"]).validate().is_err());
    }

    #[test]
    fn test_rejects_missing_static_dir() {
        assert!(parse(&["--static-dir", "/definitely/not/here"])
            .validate()
            .is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", parse_with_key(&[]));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("test-key"));
    }

    #[test]
    fn test_parse_ignores_process_env() {
        std::env::set_var("GEMINI_TIMEOUT_SECS", "0");
        let config = parse(&[]);
        std::env::remove_var("GEMINI_TIMEOUT_SECS");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_socket_addr() {
        let config = parse(&["--host", "127.0.0.1", "--port", "9090"]);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:9090");
    }
}
