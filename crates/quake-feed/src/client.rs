//! Feed polling client.

use reqwest::Client;
use tracing::{debug, warn};

use hazard_core::{FeedType, RawEventRecord};

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::wire;

/// Client for polling the civil-alert feeds.
///
/// Cheap to clone; the underlying HTTP client is shared.
#[derive(Clone)]
pub struct FeedClient {
    http: Client,
    config: FeedConfig,
}

impl FeedClient {
    /// Create a feed client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(FeedError::Http)?;

        Ok(Self { http, config })
    }

    /// Create a feed client from environment variables.
    pub fn from_env() -> Result<Self, FeedError> {
        Self::new(FeedConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Poll one feed for its most recent record.
    ///
    /// Never fails: a transport, parse, or shape error (and an empty
    /// history) is "no update this cycle". Callers must not treat `None`
    /// as a state change.
    pub async fn poll(&self, feed: FeedType) -> Option<RawEventRecord> {
        match self.fetch_latest(feed).await {
            Ok(record) => {
                debug!(feed = %feed, occurred_at = %record.occurred_at(), "feed poll hit");
                Some(record)
            }
            Err(FeedError::Empty) => {
                debug!(feed = %feed, "feed poll: no entries");
                None
            }
            Err(e) => {
                warn!(feed = %feed, "feed poll failed: {}", e);
                None
            }
        }
    }

    /// Fetch and decode the most recent record for a feed.
    async fn fetch_latest(&self, feed: FeedType) -> Result<RawEventRecord, FeedError> {
        let url = self.config.endpoint(feed);
        debug!(feed = %feed, "GET {}", url);

        let response = self.http.get(&url).send().await.map_err(FeedError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.text().await.map_err(FeedError::Http)?;

        match feed {
            FeedType::Quake => wire::parse_quake(&body),
            FeedType::Tsunami => wire::parse_tsunami(&body),
            FeedType::Eew => wire::parse_eew(&body),
        }
    }
}

impl std::fmt::Debug for FeedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedClient")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let client = FeedClient::new(FeedConfig::default()).unwrap();
        assert_eq!(client.config().limit, 1);
    }

    #[tokio::test]
    async fn test_poll_unreachable_host_is_none() {
        // Nothing listens here; the poll must swallow the transport error.
        let config = FeedConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout: std::time::Duration::from_millis(200),
            limit: 1,
        };
        let client = FeedClient::new(config).unwrap();
        assert!(client.poll(FeedType::Quake).await.is_none());
        assert!(client.poll(FeedType::Eew).await.is_none());
    }
}
