//! Replay a scripted page session through the tracker.
//!
//! # Usage
//!
//! ```bash
//! sh-cli replay sessions/checkout.yaml
//! ```
//!
//! # Script Format
//!
//! ```yaml
//! inputs: [1]
//! steps:
//!   - { kind: scroll, scroll_y: 600, viewport_height: 800, document_height: 2800 }
//!   - { kind: input_change, node: 1, target: { tag: INPUT, id: search, name: q }, value: sofa }
//!   - { wait_ms: 2500 }
//!   - { kind: click, target: { tag: BUTTON, id: buy, class: btn }, text: Buy Now }
//!   - { kind: visibility_change, state: hidden }
//! ```
//!
//! # Environment Variables
//!
//! - `SWEET_HOME_ANALYTICS_URL` - Collector base URL
//! - `SWEET_HOME_TRACKER_TOKEN` - Optional bearer token to attribute events

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use sweet_home_tracker::{
    ConfigError, HttpSink, NodeKey, PageEvent, SinkError, StaticDocument, TrackerConfig,
    TrackerError,
};
use thiserror::Error;

/// Errors that can occur during a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid script: {0}")]
    Script(#[from] serde_yaml::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// A page session to replay.
#[derive(Debug, Deserialize)]
pub struct ReplayScript {
    /// Nodes of the text and search inputs present when the page loads.
    #[serde(default)]
    pub inputs: Vec<NodeKey>,
    pub steps: Vec<ReplayStep>,
}

/// One step of a script: a page event or a pause.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReplayStep {
    Wait { wait_ms: u64 },
    Event(PageEvent),
}

impl ReplayScript {
    /// Parse a script from YAML.
    ///
    /// # Errors
    ///
    /// Returns the YAML error if the script is malformed.
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }
}

/// Run the script at `path` against the configured collector.
///
/// # Errors
///
/// Returns `ReplayError` if the script cannot be read or parsed, or the
/// tracker cannot be set up. Delivery failures are only logged.
pub async fn run(path: &Path) -> Result<(), ReplayError> {
    let script = ReplayScript::from_yaml(&tokio::fs::read_to_string(path).await?)?;
    let config = TrackerConfig::from_env()?;
    let token = std::env::var("SWEET_HOME_TRACKER_TOKEN")
        .ok()
        .map(SecretString::from);

    let sink = Arc::new(HttpSink::new(&config, token.as_ref())?);
    let document = StaticDocument::new(script.inputs);
    let tracker = sweet_home_tracker::spawn(&document, sink, config.tick_interval);

    tracing::info!(
        steps = script.steps.len(),
        collector = %config.endpoint,
        "Replaying page session"
    );

    for step in script.steps {
        match step {
            ReplayStep::Wait { wait_ms } => {
                tokio::time::sleep(Duration::from_millis(wait_ms)).await;
            }
            ReplayStep::Event(event) => tracker.send(event).await?,
        }
    }

    tracker.shutdown().await?;
    tracing::info!("Replay complete");
    Ok(())
}
