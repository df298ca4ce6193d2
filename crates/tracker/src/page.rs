//! Page-side inputs to the tracker.
//!
//! The tracker never touches a real DOM. The host translates browser events
//! into [`PageEvent`]s and describes the inputs present at construction
//! through a [`Document`]. Inputs are identified by [`NodeKey`], not by their
//! attributes, so two identical `<input>` elements stay distinct.

use serde::{Deserialize, Serialize};
use sweet_home_core::ElementDescriptor;

/// Scroll position of the page when a scroll event fired, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    /// How far down the page the viewport is, as a rounded percentage.
    ///
    /// A page that cannot scroll is fully seen and counts as 100.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=100
    pub fn depth_percent(&self) -> u8 {
        let range = self.document_height - self.viewport_height;
        if range.is_nan() || range <= 0.0 {
            return 100;
        }

        (self.scroll_y / range * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Identity of one DOM node for the lifetime of the page.
///
/// Assigned by the host; never reused for a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeKey(pub u64);

/// Page visibility state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    Hidden,
}

/// A browser event the tracker reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageEvent {
    Scroll(ScrollMetrics),
    Click {
        target: ElementDescriptor,
        #[serde(default)]
        text: String,
        #[serde(default)]
        href: Option<String>,
    },
    /// Submission of the form described by `target`.
    FormSubmit {
        target: ElementDescriptor,
        #[serde(default)]
        action: String,
        #[serde(default)]
        method: String,
    },
    /// A `change` event on the input `node`.
    InputChange {
        node: NodeKey,
        target: ElementDescriptor,
        value: String,
    },
    VisibilityChange { state: Visibility },
}

/// The page the tracker is attached to.
pub trait Document {
    /// Nodes of the text and search inputs present on the page right now.
    fn text_inputs(&self) -> Vec<NodeKey>;
}

/// A document with a fixed set of inputs.
#[derive(Debug, Clone, Default)]
pub struct StaticDocument {
    inputs: Vec<NodeKey>,
}

impl StaticDocument {
    #[must_use]
    pub const fn new(inputs: Vec<NodeKey>) -> Self {
        Self { inputs }
    }
}

impl Document for StaticDocument {
    fn text_inputs(&self) -> Vec<NodeKey> {
        self.inputs.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn metrics(scroll_y: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_y,
            viewport_height: 800.0,
            document_height: 2800.0,
        }
    }

    #[test]
    fn test_depth_percent_rounds() {
        assert_eq!(metrics(0.0).depth_percent(), 0);
        assert_eq!(metrics(801.0).depth_percent(), 40);
        assert_eq!(metrics(2000.0).depth_percent(), 100);
    }

    #[test]
    fn test_depth_percent_clamps_overscroll() {
        assert_eq!(metrics(2600.0).depth_percent(), 100);
        assert_eq!(metrics(-50.0).depth_percent(), 0);
    }

    #[test]
    fn test_unscrollable_page_is_fully_seen() {
        let short = ScrollMetrics {
            scroll_y: 0.0,
            viewport_height: 900.0,
            document_height: 600.0,
        };
        assert_eq!(short.depth_percent(), 100);
    }

    #[test]
    fn test_input_change_carries_node_key() {
        let event: PageEvent = serde_json::from_str(
            r#"{"kind": "input_change", "node": 7, "target": {"tag": "INPUT"}, "value": "sofa"}"#,
        )
        .unwrap();

        let PageEvent::InputChange { node, .. } = event else {
            panic!("expected an input change");
        };
        assert_eq!(node, NodeKey(7));
    }

    #[test]
    fn test_page_event_yaml_shape() {
        let event: PageEvent = serde_json::from_str(
            r#"{"kind": "click", "target": {"tag": "BUTTON", "id": "buy"}, "text": "Buy Now"}"#,
        )
        .unwrap();

        assert_eq!(
            event,
            PageEvent::Click {
                target: ElementDescriptor::new("BUTTON").with_id("buy"),
                text: "Buy Now".to_owned(),
                href: None,
            }
        );
    }
}
