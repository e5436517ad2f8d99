use std::{net::SocketAddr, str::FromStr, time::Duration};

use tracing::Level;
use url::Url;

use crate::{engine::SessionSettings, error::ConfigError};

#[derive(Debug, Clone)]
pub struct Webhook {
    pub url: Url,
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub teloxide_token: String,
    pub log_level: Level,
    pub database_url: Option<String>,
    pub webhook: Option<Webhook>,
    pub session: SessionSettings,
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let teloxide_token = lookup("TELOXIDE_TOKEN").ok_or(ConfigError::Missing("TELOXIDE_TOKEN"))?;
        let log_level = parse_or("LOG_LEVEL", lookup("LOG_LEVEL"), Level::INFO)?;
        let database_url = lookup("DATABASE_URL");

        let webhook = match (lookup("NGROK_URL"), lookup("NGROK_ADDR")) {
            (Some(url), Some(addr)) => Some(Webhook {
                url: parse("NGROK_URL", url)?,
                addr: parse("NGROK_ADDR", addr)?,
            }),
            _ => None,
        };

        let defaults = SessionSettings::default();
        let length = parse_or("QUIZ_LENGTH", lookup("QUIZ_LENGTH"), defaults.length)?;
        if length == 0 {
            return Err(ConfigError::Malformed {
                name: "QUIZ_LENGTH",
                value: "0".into(),
            });
        }
        let feedback_delay = parse_or(
            "FEEDBACK_DELAY_MS",
            lookup("FEEDBACK_DELAY_MS"),
            defaults.feedback_delay.as_millis() as u64,
        )?;
        let explanation_delay = parse_or(
            "EXPLANATION_DELAY_MS",
            lookup("EXPLANATION_DELAY_MS"),
            defaults.explanation_delay.as_millis() as u64,
        )?;

        Ok(Self {
            teloxide_token,
            log_level,
            database_url,
            webhook,
            session: SessionSettings {
                length,
                feedback_delay: Duration::from_millis(feedback_delay),
                explanation_delay: Duration::from_millis(explanation_delay),
            },
        })
    }
}

fn parse<T: FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Malformed { name, value })
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    value.map_or(Ok(default), |value| parse(name, value))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn token_is_required() {
        assert_matches!(
            config_from(&[]),
            Err(ConfigError::Missing("TELOXIDE_TOKEN"))
        );
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = config_from(&[("TELOXIDE_TOKEN", "123:abc")]).unwrap();

        assert_eq!(config.teloxide_token, "123:abc");
        assert_eq!(config.log_level, Level::INFO);
        assert!(config.database_url.is_none());
        assert!(config.webhook.is_none());
        assert_eq!(config.session.length, 10);
        assert_eq!(config.session.feedback_delay, Duration::from_secs(1));
    }

    #[test]
    fn webhook_needs_both_url_and_addr() {
        let config = config_from(&[
            ("TELOXIDE_TOKEN", "t"),
            ("NGROK_URL", "https://example.ngrok.app/"),
        ])
        .unwrap();
        assert!(config.webhook.is_none());

        let config = config_from(&[
            ("TELOXIDE_TOKEN", "t"),
            ("NGROK_URL", "https://example.ngrok.app/"),
            ("NGROK_ADDR", "127.0.0.1:8443"),
        ])
        .unwrap();
        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.addr.port(), 8443);
        assert_eq!(webhook.url.host_str(), Some("example.ngrok.app"));
    }

    #[test]
    fn malformed_values_are_reported() {
        assert_matches!(
            config_from(&[("TELOXIDE_TOKEN", "t"), ("QUIZ_LENGTH", "ten")]),
            Err(ConfigError::Malformed { name: "QUIZ_LENGTH", .. })
        );
        assert_matches!(
            config_from(&[("TELOXIDE_TOKEN", "t"), ("QUIZ_LENGTH", "0")]),
            Err(ConfigError::Malformed { name: "QUIZ_LENGTH", .. })
        );
        assert_matches!(
            config_from(&[("TELOXIDE_TOKEN", "t"), ("LOG_LEVEL", "loud")]),
            Err(ConfigError::Malformed { name: "LOG_LEVEL", .. })
        );
    }

    #[test]
    fn session_settings_are_overridable() {
        let config = config_from(&[
            ("TELOXIDE_TOKEN", "t"),
            ("LOG_LEVEL", "debug"),
            ("QUIZ_LENGTH", "5"),
            ("FEEDBACK_DELAY_MS", "250"),
            ("EXPLANATION_DELAY_MS", "0"),
        ])
        .unwrap();

        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.session.length, 5);
        assert_eq!(config.session.feedback_delay, Duration::from_millis(250));
        assert_eq!(config.session.explanation_delay, Duration::ZERO);
    }
}
