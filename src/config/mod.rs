use std::env;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

/// Longest link token window, in hours. Tokens carry a 32-bit expiry, and
/// a year keeps `now + window` well inside it.
pub const MAX_LINK_TOKEN_VALIDITY_HOURS: u64 = 365 * 24;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {0} must not be empty")]
    Empty(&'static str),
    #[error("TZ_OFFSET_MINUTES {0} is outside +/-24h")]
    InvalidOffset(i32),
    #[error("LINK_TOKEN_VALIDITY {0}h must be between 1h and {max}h", max = MAX_LINK_TOKEN_VALIDITY_HOURS)]
    InvalidValidity(u64),
}

#[derive(Clone)]
pub struct Config {
    pub link_token_secret: String,
    pub url_signing_secret: String,
    pub link_token_validity_secs: u64,
    pub signed_url_validity_mins: u64,
    pub tz_offset_minutes: i32,
    pub redis_url: Option<String>,
    pub rate_limit_window_secs: u64,
    pub rate_limit_requests: u32,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("link_token_secret", &"<redacted>")
            .field("url_signing_secret", &"<redacted>")
            .field("link_token_validity_secs", &self.link_token_validity_secs)
            .field("signed_url_validity_mins", &self.signed_url_validity_mins)
            .field("tz_offset_minutes", &self.tz_offset_minutes)
            .field("redis_url", &self.redis_url)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("rate_limit_requests", &self.rate_limit_requests)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("api_base_uri", &self.api_base_uri)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Optional values that are
    /// absent or unparsable fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let link_token_secret =
            lookup("LINK_TOKEN_SECRET").ok_or(ConfigError::Missing("LINK_TOKEN_SECRET"))?;
        if link_token_secret.is_empty() {
            return Err(ConfigError::Empty("LINK_TOKEN_SECRET"));
        }
        let url_signing_secret = match lookup("URL_SIGNING_SECRET") {
            Some(secret) if secret.is_empty() => {
                return Err(ConfigError::Empty("URL_SIGNING_SECRET"));
            }
            Some(secret) => secret,
            None => link_token_secret.clone(),
        };

        // 24h, same hour notation the deploy files use
        let link_token_validity = lookup("LINK_TOKEN_VALIDITY")
            .and_then(|v| v.trim_end_matches('h').parse::<u64>().ok())
            .unwrap_or(24);
        if !(1..=MAX_LINK_TOKEN_VALIDITY_HOURS).contains(&link_token_validity) {
            return Err(ConfigError::InvalidValidity(link_token_validity));
        }
        let link_token_validity_secs = link_token_validity
            .checked_mul(3600)
            .ok_or(ConfigError::InvalidValidity(link_token_validity))?;

        let tz_offset_minutes = parse_or(&lookup, "TZ_OFFSET_MINUTES", 0i32);
        if tz_offset_minutes.abs() >= 24 * 60 {
            return Err(ConfigError::InvalidOffset(tz_offset_minutes));
        }

        Ok(Config {
            link_token_secret,
            url_signing_secret,
            link_token_validity_secs,
            signed_url_validity_mins: parse_or(&lookup, "SIGNED_URL_VALIDITY_MINUTES", 60),
            tz_offset_minutes,
            redis_url: lookup("REDIS_URL").filter(|url| !url.is_empty()),
            rate_limit_window_secs: parse_or(&lookup, "RATE_LIMIT_WINDOW", 60),
            rate_limit_requests: parse_or(&lookup, "RATE_LIMIT_REQUESTS", 100),
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "::".into()),
            server_port: parse_or(&lookup, "SERVER_PORT", 3000),
            api_base_uri: lookup("API_BASE_URI")
                .map(|uri| normalize_base_uri(&uri))
                .unwrap_or_default(),
        })
    }

    pub fn link_token_validity(&self) -> Duration {
        Duration::from_secs(self.link_token_validity_secs)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn timezone(&self) -> FixedOffset {
        // bounds checked when loading
        FixedOffset::east_opt(self.tz_offset_minutes * 60).unwrap_or(Utc.fix())
    }
}

/// `api/v1/` becomes `/api/v1`; `/` and empty mean no prefix.
fn normalize_base_uri(uri: &str) -> String {
    let trimmed = uri.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("LINK_TOKEN_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.link_token_validity_secs, 24 * 3600);
        assert_eq!(config.url_signing_secret, "s3cret");
        assert_eq!(config.signed_url_validity_mins, 60);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.rate_limit_requests, 100);
        assert!(config.redis_url.is_none());
        assert_eq!(config.api_base_uri, "");
        assert_eq!(config.timezone().local_minus_utc(), 0);
    }

    #[test]
    fn secret_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing("LINK_TOKEN_SECRET"))));
        assert!(matches!(
            load(&[("LINK_TOKEN_SECRET", "")]),
            Err(ConfigError::Empty("LINK_TOKEN_SECRET"))
        ));
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("LINK_TOKEN_SECRET", "a"),
            ("URL_SIGNING_SECRET", "b"),
            ("LINK_TOKEN_VALIDITY", "2h"),
            ("TZ_OFFSET_MINUTES", "540"),
            ("REDIS_URL", "redis://127.0.0.1/"),
            ("API_BASE_URI", "/api/"),
            ("SERVER_PORT", "not-a-port"),
        ])
        .unwrap();
        assert_eq!(config.url_signing_secret, "b");
        assert_eq!(config.link_token_validity(), Duration::from_secs(7200));
        assert_eq!(config.timezone().local_minus_utc(), 9 * 3600);
        assert_eq!(config.redis_url.as_deref(), Some("redis://127.0.0.1/"));
        assert_eq!(config.api_base_uri, "/api");
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn base_uri_is_normalized() {
        assert_eq!(normalize_base_uri("api/v1/"), "/api/v1");
        assert_eq!(normalize_base_uri("/"), "");
        assert_eq!(normalize_base_uri(""), "");
    }

    #[test]
    fn offset_out_of_range_rejected() {
        assert!(matches!(
            load(&[("LINK_TOKEN_SECRET", "a"), ("TZ_OFFSET_MINUTES", "1440")]),
            Err(ConfigError::InvalidOffset(1440))
        ));
    }

    #[test]
    fn validity_out_of_range_rejected() {
        for hours in ["6000000000000000h", "1000000h", "0h"] {
            assert!(
                matches!(
                    load(&[("LINK_TOKEN_SECRET", "a"), ("LINK_TOKEN_VALIDITY", hours)]),
                    Err(ConfigError::InvalidValidity(_))
                ),
                "{hours}"
            );
        }

        let longest = format!("{MAX_LINK_TOKEN_VALIDITY_HOURS}h");
        let config = load(&[("LINK_TOKEN_SECRET", "a"), ("LINK_TOKEN_VALIDITY", &longest)]).unwrap();
        assert_eq!(
            config.link_token_validity_secs,
            MAX_LINK_TOKEN_VALIDITY_HOURS * 3600
        );
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = load(&[("LINK_TOKEN_SECRET", "hunter2")]).unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
