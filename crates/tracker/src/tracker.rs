//! Tracker state machine and its event loop.
//!
//! [`Tracker`] holds per-page state and turns [`PageEvent`]s into records.
//! [`spawn`] runs one tracker on its own task: events and ticks are handled
//! one at a time, and network sends are spawned so the loop never waits on
//! them.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sweet_home_core::{
    ClickDetails, ElementDescriptor, FormSubmitDetails, InteractionRecord, SearchDetails,
    SessionRecord,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::page::{Document, NodeKey, PageEvent, ScrollMetrics, Visibility};
use crate::sink::InteractionSink;

/// Longest click text kept, in characters.
pub const MAX_CLICK_TEXT_CHARS: usize = 100;

const EVENT_BUFFER: usize = 256;

/// Something the tracker wants sent to the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Interaction(InteractionRecord),
    Session(SessionRecord),
}

impl Dispatch {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Interaction(_) => "interaction",
            Self::Session(_) => "session",
        }
    }
}

/// Per-page behavior state.
#[derive(Debug)]
pub struct Tracker {
    observed_inputs: HashSet<NodeKey>,
    max_scroll_depth: u8,
    time_on_page: u64,
    origin: Instant,
    interactions: Vec<InteractionRecord>,
}

impl Tracker {
    /// Attach to a page. Only inputs present now are watched for searches.
    pub fn new(document: &impl Document, now: Instant) -> Self {
        Self {
            observed_inputs: document.text_inputs().into_iter().collect(),
            max_scroll_depth: 0,
            time_on_page: 0,
            origin: now,
            interactions: Vec::new(),
        }
    }

    #[must_use]
    pub const fn max_scroll_depth(&self) -> u8 {
        self.max_scroll_depth
    }

    #[must_use]
    pub const fn time_on_page(&self) -> u64 {
        self.time_on_page
    }

    /// Interactions captured since the last flush.
    #[must_use]
    pub fn interactions(&self) -> &[InteractionRecord] {
        &self.interactions
    }

    /// Instant time on page is measured from.
    #[must_use]
    pub const fn origin(&self) -> Instant {
        self.origin
    }

    /// Raise the maximum scroll depth if this position is deeper.
    pub fn on_scroll(&mut self, metrics: &ScrollMetrics) {
        self.max_scroll_depth = self.max_scroll_depth.max(metrics.depth_percent());
    }

    /// Capture a click and return the record to forward.
    pub fn on_click(
        &mut self,
        target: ElementDescriptor,
        text: &str,
        href: Option<String>,
        at: DateTime<Utc>,
    ) -> InteractionRecord {
        let details = ClickDetails {
            text: text.trim().chars().take(MAX_CLICK_TEXT_CHARS).collect(),
            href,
            class_name: target.class_name.clone(),
        };
        self.capture(InteractionRecord::Click {
            element: target,
            timestamp: at,
            details,
        })
    }

    /// Capture a form submission and return the record to forward.
    pub fn on_form_submit(
        &mut self,
        target: ElementDescriptor,
        action: String,
        method: String,
        at: DateTime<Utc>,
    ) -> InteractionRecord {
        let details = FormSubmitDetails {
            form_id: target.id.clone(),
            action,
            method,
        };
        self.capture(InteractionRecord::FormSubmit {
            element: target,
            timestamp: at,
            details,
        })
    }

    /// Capture a search if `node` was present at construction and the value
    /// is not blank.
    pub fn on_input_change(
        &mut self,
        node: NodeKey,
        target: ElementDescriptor,
        value: &str,
        at: DateTime<Utc>,
    ) -> Option<InteractionRecord> {
        if !self.observed_inputs.contains(&node) {
            return None;
        }
        let query = value.trim();
        if query.is_empty() {
            return None;
        }

        Some(self.capture(InteractionRecord::Search {
            element: target,
            timestamp: at,
            details: SearchDetails {
                query: query.to_owned(),
            },
        }))
    }

    /// Set time on page to whole seconds since the origin.
    pub fn tick(&mut self, now: Instant) {
        self.time_on_page = now.saturating_duration_since(self.origin).as_secs();
    }

    /// On hide, build the session aggregate and start a fresh session.
    ///
    /// The reset does not depend on whether the aggregate is delivered.
    pub fn on_visibility_change(
        &mut self,
        state: Visibility,
        now: Instant,
    ) -> Option<SessionRecord> {
        if state != Visibility::Hidden {
            return None;
        }

        let session = SessionRecord {
            scroll_depth: self.max_scroll_depth,
            time_on_page: self.time_on_page,
            interactions: std::mem::take(&mut self.interactions),
        };
        self.max_scroll_depth = 0;
        self.time_on_page = 0;
        self.origin = now;

        Some(session)
    }

    /// Apply one page event.
    pub fn handle(&mut self, event: PageEvent, now: Instant) -> Option<Dispatch> {
        match event {
            PageEvent::Scroll(metrics) => {
                self.on_scroll(&metrics);
                None
            }
            PageEvent::Click { target, text, href } => Some(Dispatch::Interaction(
                self.on_click(target, &text, href, Utc::now()),
            )),
            PageEvent::FormSubmit {
                target,
                action,
                method,
            } => Some(Dispatch::Interaction(self.on_form_submit(
                target,
                action,
                method,
                Utc::now(),
            ))),
            PageEvent::InputChange {
                node,
                target,
                value,
            } => self
                .on_input_change(node, target, &value, Utc::now())
                .map(Dispatch::Interaction),
            PageEvent::VisibilityChange { state } => self
                .on_visibility_change(state, now)
                .map(Dispatch::Session),
        }
    }

    fn capture(&mut self, record: InteractionRecord) -> InteractionRecord {
        self.interactions.push(record.clone());
        record
    }
}

/// Errors from a running tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The tracker task has already stopped.
    #[error("Tracker is closed")]
    Closed,

    /// The tracker task panicked.
    #[error("Tracker task failed: {0}")]
    Task(#[from] JoinError),
}

/// Handle to a tracker running on its own task.
#[derive(Debug)]
pub struct TrackerHandle {
    events: mpsc::Sender<PageEvent>,
    task: JoinHandle<()>,
}

impl TrackerHandle {
    /// Queue a page event.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Closed` if the tracker task is gone.
    pub async fn send(&self, event: PageEvent) -> Result<(), TrackerError> {
        self.events
            .send(event)
            .await
            .map_err(|_| TrackerError::Closed)
    }

    /// Tear the page down: stop accepting events and wait for pending sends.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Task` if the tracker task panicked.
    pub async fn shutdown(self) -> Result<(), TrackerError> {
        drop(self.events);
        self.task.await?;
        Ok(())
    }
}

/// Start a tracker for `document` on a new task.
pub fn spawn(
    document: &impl Document,
    sink: Arc<dyn InteractionSink>,
    tick_interval: Duration,
) -> TrackerHandle {
    let tracker = Tracker::new(document, Instant::now());
    let (events, receiver) = mpsc::channel(EVENT_BUFFER);
    let task = tokio::spawn(run(tracker, receiver, sink, tick_interval));

    TrackerHandle { events, task }
}

/// Drive a tracker until the event channel closes.
pub async fn run(
    mut tracker: Tracker,
    mut events: mpsc::Receiver<PageEvent>,
    sink: Arc<dyn InteractionSink>,
    tick_interval: Duration,
) {
    let mut ticks = time::interval_at(tracker.origin() + tick_interval, tick_interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut sends = JoinSet::new();

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                if let Some(dispatch) = tracker.handle(event, Instant::now()) {
                    sends.spawn(deliver(Arc::clone(&sink), dispatch));
                }
            }
            now = ticks.tick() => tracker.tick(now),
            Some(finished) = sends.join_next(), if !sends.is_empty() => log_join(finished),
        }
    }

    tracing::debug!(pending = sends.len(), "Event source closed, draining sends");
    while let Some(finished) = sends.join_next().await {
        log_join(finished);
    }
}

async fn deliver(sink: Arc<dyn InteractionSink>, dispatch: Dispatch) {
    let result = match &dispatch {
        Dispatch::Interaction(record) => sink.send_interaction(record).await,
        Dispatch::Session(record) => sink.send_session(record).await,
    };

    if let Err(e) = result {
        tracing::warn!(error = %e, kind = dispatch.kind(), "Failed to deliver tracking data");
    }
}

fn log_join(finished: Result<(), JoinError>) {
    if let Err(e) = finished {
        tracing::warn!(error = %e, "Tracking send task failed");
    }
}
