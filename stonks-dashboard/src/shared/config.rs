//! Dashboard configuration, resolved once at startup
//!
//! Values come from environment variables. The WebSocket endpoint is either
//! given verbatim (`WS_URL`) or derived from the origin the dashboard is
//! served from (`DASHBOARD_ORIGIN`).

use std::time::Duration;

use url::Url;

use crate::shared::error::ConfigError;
use crate::shared::websocket::WebSocketConfig;

/// Port the backend listens on when the dashboard runs from a loopback host
pub const LOCAL_BACKEND_PORT: u16 = 8080;

/// Path of the backend event stream
pub const WEBSOCKET_PATH: &str = "/ws";

pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(10);
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_FEED_LIMIT: usize = 12;
pub const DEFAULT_TAX_RATE: f64 = 0.3168;
pub const DEFAULT_LOG_FILE: &str = "stonks-dashboard.log";

/// The location the dashboard is served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// Full URL
    pub href: String,
    /// Hostname plus port, when the port is not the scheme default
    pub host: String,
    /// Hostname only
    pub hostname: String,
}

impl PageLocation {
    pub fn parse(origin: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(origin).map_err(|e| ConfigError::InvalidUrl {
            value: origin.to_string(),
            reason: e.to_string(),
        })?;

        let hostname = url
            .host_str()
            .ok_or_else(|| ConfigError::MissingHost(origin.to_string()))?
            .to_string();

        let host = match url.port() {
            Some(port) => format!("{hostname}:{port}"),
            None => hostname.clone(),
        };

        Ok(Self {
            href: url.to_string(),
            host,
            hostname,
        })
    }

    /// Loopback hosts talk to the backend on [`LOCAL_BACKEND_PORT`], everything
    /// else goes through the host the page came from.
    pub fn websocket_endpoint(&self) -> String {
        let local = self.host.starts_with("localhost") || self.host.starts_with("127.0.0.1");
        let host = if local {
            format!("{}:{}", self.hostname, LOCAL_BACKEND_PORT)
        } else {
            self.host.clone()
        };
        let scheme = if self.href.starts_with("https") { "wss" } else { "ws" };

        format!("{scheme}://{host}{WEBSOCKET_PATH}")
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Explicit endpoint override
    pub ws_url: Option<String>,
    pub origin: PageLocation,
    pub reconnect_delay: Duration,
    pub ping_interval: Duration,
    /// Number of rows kept by the ticker feed
    pub feed_limit: usize,
    /// Rate applied to the unrealized return for the after-tax figure
    pub tax_rate: f64,
    pub log_file: String,
}

impl DashboardConfig {
    /// Resolve from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from any key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let origin = lookup("DASHBOARD_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_string());

        let ws_url = match lookup("WS_URL") {
            Some(raw) => {
                Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl {
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                Some(raw)
            }
            None => None,
        };

        Ok(Self {
            ws_url,
            origin: PageLocation::parse(&origin)?,
            reconnect_delay: parse_number(&lookup, "RECONNECT_DELAY_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RECONNECT_DELAY),
            ping_interval: parse_number(&lookup, "PING_INTERVAL_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_PING_INTERVAL),
            feed_limit: parse_number(&lookup, "FEED_LIMIT")?.unwrap_or(DEFAULT_FEED_LIMIT),
            tax_rate: parse_number(&lookup, "TAX_RATE")?.unwrap_or(DEFAULT_TAX_RATE),
            log_file: lookup("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        })
    }

    /// Endpoint the connection manager dials
    pub fn endpoint(&self) -> String {
        self.ws_url
            .clone()
            .unwrap_or_else(|| self.origin.websocket_endpoint())
    }

    pub fn websocket_config(&self) -> WebSocketConfig {
        WebSocketConfig::new(self.endpoint())
            .with_reconnect_delay(self.reconnect_delay)
            .with_ping_interval(self.ping_interval)
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            ws_url: None,
            origin: PageLocation {
                href: format!("{DEFAULT_ORIGIN}/"),
                host: "localhost:3000".to_string(),
                hostname: "localhost".to_string(),
            },
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            ping_interval: DEFAULT_PING_INTERVAL,
            feed_limit: DEFAULT_FEED_LIMIT,
            tax_rate: DEFAULT_TAX_RATE,
            log_file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

fn parse_number<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_websocket_endpoint() {
        struct TestCase {
            input: &'static str,
            expected: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: localhost dev server is redirected to the backend port
                input: "http://localhost:3000",
                expected: "ws://localhost:8080/ws",
            },
            TestCase {
                // TC1: loopback ip, path on the page is irrelevant
                input: "http://127.0.0.1:5000/dashboard",
                expected: "ws://127.0.0.1:8080/ws",
            },
            TestCase {
                // TC2: https page on loopback uses wss
                input: "https://localhost:3000",
                expected: "wss://localhost:8080/ws",
            },
            TestCase {
                // TC3: localhost without a port still gets the backend port
                input: "http://localhost",
                expected: "ws://localhost:8080/ws",
            },
            TestCase {
                // TC4: production host is used as is
                input: "https://stonks.example.com",
                expected: "wss://stonks.example.com/ws",
            },
            TestCase {
                // TC5: production host keeps its explicit port
                input: "http://stonks.example.com:9000/app",
                expected: "ws://stonks.example.com:9000/ws",
            },
            TestCase {
                // TC6: prefix match on the host, not an exact match
                input: "http://localhost.lan:3000",
                expected: "ws://localhost.lan:8080/ws",
            },
            TestCase {
                // TC7: other loopback addresses are not substituted
                input: "http://127.0.1.1:3000",
                expected: "ws://127.0.1.1:3000/ws",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = PageLocation::parse(test.input).unwrap().websocket_endpoint();
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_page_location_rejects_bad_origin() {
        assert!(matches!(
            PageLocation::parse("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            PageLocation::parse("data:text/plain,hello"),
            Err(ConfigError::MissingHost(_))
        ));
    }

    #[test]
    fn test_config_defaults() {
        let config = DashboardConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.endpoint(), "ws://localhost:8080/ws");
        assert_eq!(config.reconnect_delay, Duration::from_secs(10));
        assert_eq!(config.feed_limit, 12);
        assert_eq!(config.tax_rate, 0.3168);
    }

    #[test]
    fn test_config_overrides() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("DASHBOARD_ORIGIN", "https://stonks.example.com"),
            ("RECONNECT_DELAY_SECS", "3"),
            ("FEED_LIMIT", "20"),
            ("TAX_RATE", "0.352"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint(), "wss://stonks.example.com/ws");
        assert_eq!(config.reconnect_delay, Duration::from_secs(3));
        assert_eq!(config.feed_limit, 20);
        assert_eq!(config.tax_rate, 0.352);

        let ws = config.websocket_config();
        assert_eq!(ws.url, "wss://stonks.example.com/ws");
        assert_eq!(ws.reconnect_delay, Duration::from_secs(3));
    }

    #[test]
    fn test_ws_url_overrides_origin() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("DASHBOARD_ORIGIN", "http://localhost:3000"),
            ("WS_URL", "ws://10.0.0.5:9000/ws"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint(), "ws://10.0.0.5:9000/ws");
    }

    #[test]
    fn test_config_rejects_invalid_numbers() {
        let result = DashboardConfig::from_lookup(lookup_from(&[("FEED_LIMIT", "twelve")]));

        assert_eq!(
            result,
            Err(ConfigError::InvalidNumber {
                var: "FEED_LIMIT",
                value: "twelve".to_string(),
            })
        );
    }
}
