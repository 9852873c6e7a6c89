use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{DisclosureError, Result};

pub const KAP_ROOT_URL: &str = "https://www.kap.org.tr";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Client-level options, fixed for the lifetime of a `DisclosureClient`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Minimum spacing between two outbound requests, in seconds
    #[serde(default = "default_request_delay")]
    pub request_delay_secs: f64,
    /// Per-request timeout, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_request_delay() -> f64 {
    1.0
}

fn default_timeout() -> u64 {
    30
}

fn default_base_url() -> String {
    KAP_ROOT_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_delay_secs: default_request_delay(),
            timeout_secs: default_timeout(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientSettings {
    /// Negative or non-finite delays collapse to zero; a delay too large for
    /// `Duration` is rejected.
    pub fn request_delay(&self) -> Result<Duration> {
        if !self.request_delay_secs.is_finite() || self.request_delay_secs <= 0.0 {
            return Ok(Duration::ZERO);
        }
        Duration::try_from_secs_f64(self.request_delay_secs).map_err(|e| {
            DisclosureError::InvalidSetting(format!(
                "request_delay_secs = {}: {}",
                self.request_delay_secs, e
            ))
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without the trailing slash, used to build endpoint paths.
    pub fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_kap_crawler() {
        let s = ClientSettings::default();
        assert_eq!(s.request_delay().unwrap(), Duration::from_secs(1));
        assert_eq!(s.timeout(), Duration::from_secs(30));
        assert_eq!(s.root(), "https://www.kap.org.tr");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: ClientSettings = serde_json::from_str(r#"{"request_delay_secs": 0.25}"#).unwrap();
        assert_eq!(s.request_delay().unwrap(), Duration::from_millis(250));
        assert_eq!(s.timeout_secs, 30);
        assert_eq!(s.base_url, KAP_ROOT_URL);
    }

    #[test]
    fn test_negative_delay_is_zero() {
        let s = ClientSettings {
            request_delay_secs: -3.0,
            ..ClientSettings::default()
        };
        assert_eq!(s.request_delay().unwrap(), Duration::ZERO);

        let s = ClientSettings {
            request_delay_secs: f64::NAN,
            ..ClientSettings::default()
        };
        assert_eq!(s.request_delay().unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_huge_delay_is_an_error() {
        let s = ClientSettings {
            request_delay_secs: 1e20,
            ..ClientSettings::default()
        };
        assert!(matches!(
            s.request_delay(),
            Err(DisclosureError::InvalidSetting(_))
        ));
    }

    #[test]
    fn test_root_trims_trailing_slash() {
        let s = ClientSettings {
            base_url: "http://127.0.0.1:8080/".to_string(),
            ..ClientSettings::default()
        };
        assert_eq!(s.root(), "http://127.0.0.1:8080");
    }
}
