use dashmap::DashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(3600);
const CLEANUP_INTERVAL_SECS: u64 = 300;

/// Both limits are at least 1; `AppConfig` rejects zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimits {
    pub per_minute: u32,
    pub per_hour: u32,
}

impl RateLimits {
    pub const VOTES: Self = Self {
        per_minute: 30,
        per_hour: 300,
    };

    pub const NEW_VOTERS: Self = Self {
        per_minute: 10,
        per_hour: 60,
    };
}

#[derive(Clone)]
struct Window {
    minute_count: u32,
    hour_count: u32,
    minute_start: Instant,
    hour_start: Instant,
}

impl Window {
    fn starting_at(now: Instant) -> Self {
        Self {
            minute_count: 0,
            hour_count: 0,
            minute_start: now,
            hour_start: now,
        }
    }
}

/// Throttle with a minute and an hour window per key.
///
/// Keyed by voter id for votes, and by client address for minting new
/// voter sessions.
#[derive(Clone)]
pub struct RateLimiter<K = Uuid> {
    limits: RateLimits,
    windows: Arc<DashMap<K, Window>>,
    last_cleanup: Arc<Mutex<Instant>>,
}

impl<K: Eq + Hash + Copy> RateLimiter<K> {
    pub fn new(limits: RateLimits) -> Self {
        Self {
            limits,
            windows: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn check(&self, key: K) -> Result<(), RateLimitError> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: K, now: Instant) -> Result<(), RateLimitError> {
        self.maybe_cleanup(now);

        let mut window = self
            .windows
            .entry(key)
            .or_insert_with(|| Window::starting_at(now));

        if now.duration_since(window.minute_start) >= MINUTE {
            window.minute_count = 0;
            window.minute_start = now;
        }

        if now.duration_since(window.hour_start) >= HOUR {
            window.hour_count = 0;
            window.hour_start = now;
        }

        if window.minute_count >= self.limits.per_minute {
            let wait = MINUTE.saturating_sub(now.duration_since(window.minute_start));
            return Err(RateLimitError::PerMinute(wait.as_secs().max(1)));
        }

        if window.hour_count >= self.limits.per_hour {
            let wait = HOUR.saturating_sub(now.duration_since(window.hour_start));
            return Err(RateLimitError::PerHour(wait.as_secs().max(1)));
        }

        window.minute_count += 1;
        window.hour_count += 1;

        Ok(())
    }

    fn maybe_cleanup(&self, now: Instant) {
        let Ok(mut last_cleanup) = self.last_cleanup.lock() else {
            return;
        };
        if now.duration_since(*last_cleanup) > Duration::from_secs(CLEANUP_INTERVAL_SECS) {
            self.windows
                .retain(|_, w| now.duration_since(w.hour_start) < HOUR);
            *last_cleanup = now;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    #[error("Too many requests, wait {0} seconds.")]
    PerMinute(u64),
    #[error("Hourly limit reached, wait {} minutes.", .0.div_ceil(60))]
    PerHour(u64),
}

impl From<RateLimitError> for social_office_errors::AppError {
    fn from(err: RateLimitError) -> Self {
        Self::RateLimited(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn limiter(per_minute: u32, per_hour: u32) -> RateLimiter {
        RateLimiter::new(RateLimits {
            per_minute,
            per_hour,
        })
    }

    #[test]
    fn test_minute_window() {
        let limiter = limiter(3, 100);
        let voter = Uuid::new_v4();
        let start = Instant::now();

        for _ in 0..3 {
            assert!(limiter.check_at(voter, start).is_ok());
        }
        assert!(matches!(
            limiter.check_at(voter, start + Duration::from_secs(10)),
            Err(RateLimitError::PerMinute(50))
        ));
        assert!(limiter.check_at(voter, start + Duration::from_secs(61)).is_ok());
    }

    #[test]
    fn test_hour_window() {
        let limiter = limiter(100, 2);
        let voter = Uuid::new_v4();
        let start = Instant::now();

        assert!(limiter.check_at(voter, start).is_ok());
        assert!(limiter.check_at(voter, start).is_ok());
        assert!(matches!(
            limiter.check_at(voter, start),
            Err(RateLimitError::PerHour(_))
        ));
    }

    #[test]
    fn test_voters_are_independent() {
        let limiter = limiter(1, 10);
        let start = Instant::now();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(limiter.check_at(a, start).is_ok());
        assert!(limiter.check_at(a, start).is_err());
        assert!(limiter.check_at(b, start).is_ok());
    }

    #[test]
    fn test_keyed_by_address() {
        let limiter: RateLimiter<IpAddr> = RateLimiter::new(RateLimits {
            per_minute: 1,
            per_hour: 10,
        });
        let start = Instant::now();
        let office = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7));
        let home = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));

        assert!(limiter.check_at(office, start).is_ok());
        assert!(limiter.check_at(office, start).is_err());
        assert!(limiter.check_at(home, start).is_ok());
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            RateLimitError::PerHour(90).to_string(),
            "Hourly limit reached, wait 2 minutes."
        );
    }
}
