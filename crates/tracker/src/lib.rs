//! Client behavior tracker for Sweet Home pages.
//!
//! Observes scrolling, clicks, form submissions and searches on one page,
//! forwards each captured interaction as it happens, and sends a session
//! aggregate whenever the page becomes hidden.
//!
//! ```rust,ignore
//! let config = TrackerConfig::from_env()?;
//! let sink = Arc::new(HttpSink::new(&config, None)?);
//! let tracker = sweet_home_tracker::spawn(&document, sink, config.tick_interval);
//!
//! tracker.send(PageEvent::VisibilityChange { state: Visibility::Hidden }).await?;
//! tracker.shutdown().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod page;
pub mod sink;
pub mod tracker;

pub use config::{ConfigError, TrackerConfig};
pub use page::{Document, NodeKey, PageEvent, ScrollMetrics, StaticDocument, Visibility};
pub use sink::{HttpSink, InteractionSink, SinkError};
pub use tracker::{Dispatch, Tracker, TrackerError, TrackerHandle, run, spawn};
