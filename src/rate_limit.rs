use rocket::request::{FromRequest, Outcome, Request};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Above this many tracked keys, every check also sweeps out idle ones.
const SWEEP_THRESHOLD: usize = 4096;

/// Sliding-window limiter keyed by `"<bucket>:<client>"`.
pub struct RateLimiter {
    entries: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        RateLimiter {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Instant>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record an attempt and return true if it is still under `max_attempts`
    /// within `window`. Refused attempts are not recorded.
    pub fn check_and_record(&self, key: &str, max_attempts: u64, window: Duration) -> bool {
        let mut map = self.lock();
        let now = Instant::now();

        if map.len() > SWEEP_THRESHOLD {
            map.retain(|_, attempts| {
                attempts.retain(|t| now.duration_since(*t) < window);
                !attempts.is_empty()
            });
        }

        let attempts = map.entry(key.to_string()).or_default();
        attempts.retain(|t| now.duration_since(*t) < window);

        if (attempts.len() as u64) < max_attempts {
            attempts.push(now);
            true
        } else {
            false
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort client address: proxy headers first, then the socket peer.
pub struct ClientIp(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientIp {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let headers = request.headers();

        let forwarded = headers
            .get_one("CF-Connecting-IP")
            .or_else(|| headers.get_one("X-Real-IP"))
            .or_else(|| {
                // client, proxy1, proxy2: the leftmost is the client
                headers
                    .get_one("X-Forwarded-For")
                    .and_then(|v| v.split(',').next())
            })
            .map(str::trim)
            .filter(|ip| !ip.is_empty());
        if let Some(ip) = forwarded {
            return Outcome::Success(ClientIp(ip.to_string()));
        }

        let ip = request
            .client_ip()
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Outcome::Success(ClientIp(ip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_after_limit() {
        let rl = RateLimiter::new();
        let window = Duration::from_secs(60);
        assert!(rl.check_and_record("track:1.2.3.4", 3, window));
        assert!(rl.check_and_record("track:1.2.3.4", 3, window));
        assert!(rl.check_and_record("track:1.2.3.4", 3, window));
        // 4th attempt blocked
        assert!(!rl.check_and_record("track:1.2.3.4", 3, window));
        // Different client is independent
        assert!(rl.check_and_record("track:5.6.7.8", 3, window));
    }

    #[test]
    fn zero_window_never_blocks() {
        let rl = RateLimiter::new();
        for _ in 0..5 {
            assert!(rl.check_and_record("k", 1, Duration::ZERO));
        }
    }
}
