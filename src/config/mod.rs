use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use crate::error::{PanelError, Result};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub poll: PollConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend control service, without trailing slash
    pub url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Creates configuration from environment variables, loading `.env` first
    ///
    /// - `PANEL_HOST` (default `0.0.0.0`)
    /// - `PANEL_PORT` (default `3000`)
    /// - `BACKEND_URL` (default `http://localhost:5000`)
    /// - `BACKEND_TIMEOUT_SECS` (default `10`)
    /// - `POLL_INTERVAL_SECS` (default `5`)
    /// - `LOG_FORMAT`: `pretty` or `json`
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let port = parse_var("PANEL_PORT", DEFAULT_PORT)?;
        let timeout_secs = parse_var("BACKEND_TIMEOUT_SECS", DEFAULT_BACKEND_TIMEOUT_SECS)?;
        let interval_secs = parse_var("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;

        if interval_secs == 0 {
            return Err(PanelError::InvalidConfiguration(
                "POLL_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }

        let backend = BackendConfig {
            url: normalize_url(
                &env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
            ),
            timeout_secs,
        };
        backend.validate()?;

        let log_format = match env::var("LOG_FORMAT") {
            Ok(v) => v.parse()?,
            Err(_) => LogFormat::Pretty,
        };

        Ok(Self {
            server: ServerConfig {
                host: env::var("PANEL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port,
            },
            backend,
            poll: PollConfig { interval_secs },
            log_format,
        })
    }

    pub fn bind_address(&self) -> ([u8; 4], u16) {
        let ip_addr = self.parse_host_to_ipv4();
        (ip_addr.octets(), self.server.port)
    }

    fn parse_host_to_ipv4(&self) -> Ipv4Addr {
        if let Ok(addr) = self.server.host.parse::<IpAddr>() {
            match addr {
                IpAddr::V4(ipv4) => return ipv4,
                IpAddr::V6(_) => {
                    tracing::warn!(
                        host = %self.server.host,
                        "IPv6 address provided but only IPv4 supported, using 0.0.0.0"
                    );
                    return Ipv4Addr::new(0, 0, 0, 0);
                }
            }
        }

        match self.server.host.as_str() {
            "localhost" => Ipv4Addr::new(127, 0, 0, 1),
            "" | "0.0.0.0" => Ipv4Addr::new(0, 0, 0, 0),
            _ => {
                tracing::warn!(
                    host = %self.server.host,
                    "Unable to parse host as IPv4, using 0.0.0.0"
                );
                Ipv4Addr::new(0, 0, 0, 0)
            }
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// A zero timeout would fail every backend request
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(PanelError::InvalidConfiguration(
                "BACKEND_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: DEFAULT_BACKEND_TIMEOUT_SECS,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(PanelError::ConfigurationParseFailed(format!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            PanelError::ConfigurationParseFailed(format!("Invalid {}: '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

/// Strips trailing slashes and adds a scheme when none is given
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_host(host: &str, port: u16) -> Config {
        Config {
            server: ServerConfig {
                host: host.to_string(),
                port,
            },
            backend: BackendConfig::default(),
            poll: PollConfig::default(),
            log_format: LogFormat::Pretty,
        }
    }

    #[test]
    fn test_parse_localhost() {
        let config = config_with_host("localhost", 3000);
        assert_eq!(config.bind_address(), ([127, 0, 0, 1], 3000));
    }

    #[test]
    fn test_parse_ipv4_address() {
        let config = config_with_host("192.168.1.1", 8080);
        assert_eq!(config.bind_address(), ([192, 168, 1, 1], 8080));
    }

    #[test]
    fn test_parse_empty_host() {
        let config = config_with_host("", 3000);
        assert_eq!(config.bind_address(), ([0, 0, 0, 0], 3000));
    }

    #[test]
    fn test_parse_invalid_hostname_defaults_to_all() {
        let config = config_with_host("invalid-hostname", 9000);
        assert_eq!(config.bind_address(), ([0, 0, 0, 0], 9000));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(DEFAULT_PORT, 3000);
        assert_eq!(DEFAULT_BACKEND_URL, "http://localhost:5000");
        assert_eq!(PollConfig::default().interval(), Duration::from_secs(5));
        assert_eq!(BackendConfig::default().timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("http://localhost:5000/"), "http://localhost:5000");
        assert_eq!(normalize_url("127.0.0.1:5000"), "http://127.0.0.1:5000");
        assert_eq!(normalize_url(" https://pi.local// "), "https://pi.local");
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_zero_backend_timeout_rejected() {
        let config = BackendConfig {
            timeout_secs: 0,
            ..BackendConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PanelError::InvalidConfiguration(_))
        ));
        assert!(BackendConfig::default().validate().is_ok());
    }
}
