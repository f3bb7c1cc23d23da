/// Rate-limit quota reported by the registry for one scrape.
///
/// `Default` is the 0/0 snapshot reported when a fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    /// Maximum number of pulls allowed in the current window.
    pub limit: u64,
    /// Pulls left in the current window.
    pub remaining: u64,
}

/// The three `RateLimit-*` headers after parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitHeaders {
    pub limit: u64,
    pub remaining: u64,
    /// Parsed so a malformed value still aborts the fetch; not exported.
    pub reset: u64,
}

impl From<RateLimitHeaders> for RateLimitSnapshot {
    fn from(headers: RateLimitHeaders) -> Self {
        RateLimitSnapshot {
            limit: headers.limit,
            remaining: headers.remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_is_dropped_from_snapshot() {
        let headers = RateLimitHeaders {
            limit: 100,
            remaining: 42,
            reset: 3600,
        };
        assert_eq!(
            RateLimitSnapshot::from(headers),
            RateLimitSnapshot {
                limit: 100,
                remaining: 42
            }
        );
    }
}
