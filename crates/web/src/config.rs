//! Web configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `NAQLAH_HOST` - Bind address (default: 127.0.0.1)
//! - `NAQLAH_PORT` - Listen port (default: 3000)
//! - `NAQLAH_BASE_URL` - Public URL of the site (default: <http://localhost:3000>)
//! - `NAQLAH_STATIC_DIR` - Directory served under `/static` (default: crates/web/static)
//! - `NAQLAH_OTP_MODE` - `fixed` or `any` (default: fixed)
//! - `NAQLAH_OTP_CODES` - Comma separated codes accepted in `fixed` mode
//!   (default: 123456,000000)
//! - `NAQLAH_RATE_LIMIT` - Rate limit the login endpoints (default: true)
//! - `NAQLAH_LOG_FORMAT` - `text` or `json` log lines on stdout (default: text)
//! - `GEOCODER_BASE_URL` - Nominatim instance (default: <https://nominatim.openstreetmap.org>)
//! - `ROUTER_BASE_URL` - OSRM instance (default: <https://router.project-osrm.org>)
//! - `GEO_USER_AGENT` - User agent sent to both (default: Naqlah-Moving-App/1.0)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use naqlah_core::OtpCode;
use naqlah_core::auth::OtpPolicy;
use thiserror::Error;
use url::Url;

/// Timeout for calls to the geocoding and routing services.
pub const GEO_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL; `https` turns on secure cookies
    pub base_url: Url,
    /// Directory with CSS, JS and images
    pub static_dir: PathBuf,
    /// Which OTP codes the mock verifier accepts
    pub otp_policy: OtpPolicy,
    /// Whether login endpoints are rate limited per client IP
    pub rate_limit: bool,
    /// Emit JSON log lines instead of human readable text
    pub json_logs: bool,
    /// Geocoding and routing services
    pub geo: GeoConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Third-party map services.
#[derive(Debug, Clone)]
pub struct GeoConfig {
    pub geocoder_base_url: Url,
    pub router_base_url: Url,
    pub user_agent: String,
    pub timeout: Duration,
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let host = env.parse_or("NAQLAH_HOST", "127.0.0.1")?;
        let port = env.parse_or("NAQLAH_PORT", "3000")?;
        let base_url = env.url_or("NAQLAH_BASE_URL", "http://localhost:3000")?;
        let static_dir = PathBuf::from(env.get_or("NAQLAH_STATIC_DIR", "crates/web/static"));
        let otp_policy = parse_otp_policy(
            &env.get_or("NAQLAH_OTP_MODE", "fixed"),
            &env.get_or("NAQLAH_OTP_CODES", "123456,000000"),
        )?;
        let rate_limit = parse_bool("NAQLAH_RATE_LIMIT", &env.get_or("NAQLAH_RATE_LIMIT", "true"))?;
        let json_logs = parse_log_format(&env.get_or("NAQLAH_LOG_FORMAT", "text"))?;

        let geo = GeoConfig {
            geocoder_base_url: env
                .url_or("GEOCODER_BASE_URL", "https://nominatim.openstreetmap.org")?,
            router_base_url: env.url_or("ROUTER_BASE_URL", "https://router.project-osrm.org")?,
            user_agent: env.get_or("GEO_USER_AGENT", "Naqlah-Moving-App/1.0"),
            timeout: GEO_TIMEOUT,
        };

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            otp_policy,
            rate_limit,
            json_logs,
            geo,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.parse_or("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over TLS.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable, treating an empty value as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get_or(key, default)
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    fn url_or(&self, key: &str, default: &str) -> Result<Url, ConfigError> {
        let url = self.parse_or::<Url>(key, default)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme '{other}'"),
            )),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// `true` for JSON output.
fn parse_log_format(value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(true),
        "text" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            "NAQLAH_LOG_FORMAT".to_string(),
            format!("expected 'text' or 'json', got '{other}'"),
        )),
    }
}

fn parse_otp_policy(mode: &str, codes: &str) -> Result<OtpPolicy, ConfigError> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "any" => Ok(OtpPolicy::AnyCode),
        "fixed" => {
            let codes = codes
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(|c| {
                    OtpCode::parse(c)
                        .map(|code| code.as_str().to_owned())
                        .map_err(|e| {
                            ConfigError::InvalidEnvVar("NAQLAH_OTP_CODES".to_string(), e.to_string())
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if codes.is_empty() {
                return Err(ConfigError::MissingEnvVar("NAQLAH_OTP_CODES".to_string()));
            }
            Ok(OtpPolicy::FixedCodes(codes))
        }
        other => Err(ConfigError::InvalidEnvVar(
            "NAQLAH_OTP_MODE".to_string(),
            format!("expected 'fixed' or 'any', got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<WebConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        WebConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.otp_policy, OtpPolicy::default());
        assert!(config.rate_limit);
        assert!(!config.json_logs);
        assert!(!config.is_https());
        assert_eq!(config.geo.user_agent, "Naqlah-Moving-App/1.0");
        assert_eq!(config.geo.timeout, GEO_TIMEOUT);
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("NAQLAH_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "NAQLAH_PORT"));
    }

    #[test]
    fn test_https_base_url() {
        let config = load(&[("NAQLAH_BASE_URL", "https://naqlah.sa")]).unwrap();
        assert!(config.is_https());
    }

    #[test]
    fn test_rejects_non_http_urls() {
        assert!(load(&[("GEOCODER_BASE_URL", "ftp://example.com")]).is_err());
        assert!(load(&[("ROUTER_BASE_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_otp_mode_any() {
        let config = load(&[("NAQLAH_OTP_MODE", "any")]).unwrap();
        assert_eq!(config.otp_policy, OtpPolicy::AnyCode);
    }

    #[test]
    fn test_otp_codes_are_validated() {
        let config = load(&[("NAQLAH_OTP_CODES", "111111, 222222")]).unwrap();
        assert_eq!(
            config.otp_policy,
            OtpPolicy::FixedCodes(vec!["111111".to_owned(), "222222".to_owned()])
        );
        assert!(load(&[("NAQLAH_OTP_CODES", "12345")]).is_err());
        assert!(load(&[("NAQLAH_OTP_MODE", "sometimes")]).is_err());
    }

    #[test]
    fn test_rate_limit_flag() {
        assert!(!load(&[("NAQLAH_RATE_LIMIT", "false")]).unwrap().rate_limit);
        assert!(load(&[("NAQLAH_RATE_LIMIT", "maybe")]).is_err());
    }

    #[test]
    fn test_log_format() {
        assert!(load(&[("NAQLAH_LOG_FORMAT", "json")]).unwrap().json_logs);
        assert!(!load(&[("NAQLAH_LOG_FORMAT", "Text")]).unwrap().json_logs);
        assert!(load(&[("NAQLAH_LOG_FORMAT", "xml")]).is_err());
    }

    #[test]
    fn test_empty_value_uses_default() {
        let config = load(&[("NAQLAH_HOST", "")]).unwrap();
        assert_eq!(config.host.to_string(), "127.0.0.1");
    }
}
