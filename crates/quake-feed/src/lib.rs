//! HTTP client for the public civil-alert feeds.
//!
//! Each feed type (quake, tsunami, EEW) is a fixed public endpoint returning
//! the most recent N records as a JSON array; only entry 0 is used. A poll
//! never fails from the caller's point of view: every transport, parse, or
//! shape error is logged and reported as "no update this cycle".
//!
//! # Example
//!
//! ```no_run
//! use hazard_core::FeedType;
//! use quake_feed::{FeedClient, FeedConfig};
//!
//! # async fn example() -> Result<(), quake_feed::FeedError> {
//! let client = FeedClient::new(FeedConfig::default())?;
//!
//! if let Some(record) = client.poll(FeedType::Quake).await {
//!     println!("latest quake at {}", record.occurred_at());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod wire;

pub use client::FeedClient;
pub use config::FeedConfig;
pub use error::FeedError;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
