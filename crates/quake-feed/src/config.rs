//! Configuration for the feed client.

use std::env;
use std::time::Duration;

use hazard_core::FeedType;

/// Default base URL of the civil-alert aggregator API.
pub const DEFAULT_BASE_URL: &str = "https://api.p2pquake.net/v2";

/// Default per-request timeout. A hung request must not stall a poller task
/// past this.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for connecting to the civil-alert feeds.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL of the aggregator API.
    pub base_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// How many history entries to request. Only entry 0 is used either way.
    pub limit: u32,
}

impl FeedConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `HAZARD_FEED_URL` - base URL (default: https://api.p2pquake.net/v2)
    /// - `HAZARD_FEED_TIMEOUT_SECS` - request timeout in seconds (default: 5)
    /// - `HAZARD_FEED_LIMIT` - history entries to request (default: 1)
    pub fn from_env() -> Self {
        let base_url =
            env::var("HAZARD_FEED_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let request_timeout = env::var("HAZARD_FEED_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let limit = env::var("HAZARD_FEED_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);

        Self {
            base_url,
            request_timeout,
            limit,
        }
    }

    /// Aggregator history code for a feed type.
    pub fn feed_code(feed: FeedType) -> u32 {
        match feed {
            FeedType::Quake => 551,
            FeedType::Tsunami => 552,
            FeedType::Eew => 556,
        }
    }

    /// History endpoint URL for a feed type.
    pub fn endpoint(&self, feed: FeedType) -> String {
        format!(
            "{}/history?codes={}&limit={}",
            self.base_url,
            Self::feed_code(feed),
            self.limit
        )
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            limit: 1,
        }
    }
}
