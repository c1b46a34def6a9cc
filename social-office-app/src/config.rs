use crate::infrastructure::security::RateLimits;
use social_office_errors::AppError;
use std::fmt::Display;
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::str::FromStr;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SESSION_IDLE_HOURS: i64 = 12;
const SESSION_IDLE_HOURS_RANGE: RangeInclusive<i64> = 1..=8760;
const LIMIT_RANGE: RangeInclusive<u32> = 1..=100_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// When unset the ledger lives in process memory.
    pub database_url: Option<String>,
    pub seed_demo_data: bool,
    pub vote_limits: RateLimits,
    /// Voter sessions minted per client address.
    pub new_voter_limits: RateLimits,
    pub session_idle_hours: i64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        Ok(Self {
            bind_addr: parse_value("BIND_ADDR", &bind_addr)?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            seed_demo_data: lookup("SEED_DEMO_DATA")
                .map(|raw| parse_flag("SEED_DEMO_DATA", &raw))
                .transpose()?
                .unwrap_or(false),
            vote_limits: parse_limits(
                &lookup,
                ("VOTES_PER_MINUTE", "VOTES_PER_HOUR"),
                RateLimits::VOTES,
            )?,
            new_voter_limits: parse_limits(
                &lookup,
                ("NEW_VOTERS_PER_MINUTE", "NEW_VOTERS_PER_HOUR"),
                RateLimits::NEW_VOTERS,
            )?,
            session_idle_hours: parse_in_range(
                &lookup,
                "SESSION_IDLE_HOURS",
                SESSION_IDLE_HOURS_RANGE,
            )?
            .unwrap_or(DEFAULT_SESSION_IDLE_HOURS),
        })
    }

    /// Session idle timeout, held to the accepted range even when the
    /// struct was built by hand.
    pub fn session_idle_hours_clamped(&self) -> i64 {
        self.session_idle_hours.clamp(
            *SESSION_IDLE_HOURS_RANGE.start(),
            *SESSION_IDLE_HOURS_RANGE.end(),
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            database_url: None,
            seed_demo_data: false,
            vote_limits: RateLimits::VOTES,
            new_voter_limits: RateLimits::NEW_VOTERS,
            session_idle_hours: DEFAULT_SESSION_IDLE_HOURS,
        }
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{key} has an invalid value: {raw:?}")))
}

fn parse_in_range<T: FromStr + PartialOrd + Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    range: RangeInclusive<T>,
) -> Result<Option<T>, AppError> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let value: T = parse_value(key, &raw)?;
    if !range.contains(&value) {
        return Err(AppError::Config(format!(
            "{key} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        )));
    }
    Ok(Some(value))
}

fn parse_limits(
    lookup: &impl Fn(&str) -> Option<String>,
    (minute_key, hour_key): (&str, &str),
    defaults: RateLimits,
) -> Result<RateLimits, AppError> {
    Ok(RateLimits {
        per_minute: parse_in_range(lookup, minute_key, LIMIT_RANGE)?
            .unwrap_or(defaults.per_minute),
        per_hour: parse_in_range(lookup, hour_key, LIMIT_RANGE)?.unwrap_or(defaults.per_hour),
    })
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(AppError::Config(format!("{key} must be a boolean, got {raw:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config_from(&[]).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("DATABASE_URL", "postgres://office@localhost/office"),
            ("SEED_DEMO_DATA", "Yes"),
            ("VOTES_PER_MINUTE", "5"),
            ("VOTES_PER_HOUR", "50"),
            ("SESSION_IDLE_HOURS", "1"),
            ("NEW_VOTERS_PER_HOUR", "20"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://office@localhost/office")
        );
        assert!(config.seed_demo_data);
        assert_eq!(
            config.vote_limits,
            RateLimits {
                per_minute: 5,
                per_hour: 50
            }
        );
        assert_eq!(config.new_voter_limits.per_hour, 20);
        assert_eq!(
            config.new_voter_limits.per_minute,
            RateLimits::NEW_VOTERS.per_minute
        );
        assert_eq!(config.session_idle_hours, 1);
    }

    #[test]
    fn test_blank_database_url_means_memory() {
        let config = config_from(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("VOTES_PER_MINUTE", "lots")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("BIND_ADDR", "nowhere")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("SEED_DEMO_DATA", "maybe")]),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_out_of_range_values() {
        let huge = (i64::MAX / 100).to_string();
        for (key, raw) in [
            ("SESSION_IDLE_HOURS", "0"),
            ("SESSION_IDLE_HOURS", "-3"),
            ("SESSION_IDLE_HOURS", "8761"),
            ("SESSION_IDLE_HOURS", huge.as_str()),
            ("VOTES_PER_MINUTE", "0"),
            ("VOTES_PER_HOUR", "0"),
            ("NEW_VOTERS_PER_MINUTE", "0"),
        ] {
            assert!(
                matches!(config_from(&[(key, raw)]), Err(AppError::Config(_))),
                "{key}={raw} should be rejected"
            );
        }

        let config = config_from(&[("SESSION_IDLE_HOURS", "8760")]).unwrap();
        assert_eq!(config.session_idle_hours, 8760);
    }

    #[test]
    fn test_session_idle_hours_clamped() {
        let config = AppConfig {
            session_idle_hours: i64::MAX / 100,
            ..AppConfig::default()
        };
        assert_eq!(config.session_idle_hours_clamped(), 8760);

        let config = AppConfig {
            session_idle_hours: -5,
            ..AppConfig::default()
        };
        assert_eq!(config.session_idle_hours_clamped(), 1);
    }
}
