//! Client behavior tracking records.
//!
//! These are the payloads the tracker forwards and the analytics collector
//! accepts: one [`InteractionRecord`] per captured click, form submit or
//! search, and one [`SessionRecord`] per page-hide flush.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the DOM element an interaction originated from.
///
/// Missing attributes are represented as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// Upper-case tag name, e.g. `BUTTON`.
    pub tag: String,
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub name: String,
}

impl ElementDescriptor {
    /// Create a descriptor with only a tag name.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the element id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the element class attribute.
    #[must_use]
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Set the element name attribute.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Details captured for a click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickDetails {
    pub text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default, rename = "class")]
    pub class_name: String,
}

/// Details captured for a form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmitDetails {
    #[serde(default)]
    pub form_id: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub method: String,
}

/// Details captured for a search input change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDetails {
    pub query: String,
}

/// Kind of a captured interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Click,
    FormSubmit,
    Search,
}

impl InteractionType {
    /// Wire name of the interaction type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::FormSubmit => "form_submit",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured page interaction.
///
/// Serialized as `{"type": "...", "element": {...}, "timestamp": "...", "details": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionRecord {
    Click {
        element: ElementDescriptor,
        timestamp: DateTime<Utc>,
        details: ClickDetails,
    },
    FormSubmit {
        element: ElementDescriptor,
        timestamp: DateTime<Utc>,
        details: FormSubmitDetails,
    },
    Search {
        element: ElementDescriptor,
        timestamp: DateTime<Utc>,
        details: SearchDetails,
    },
}

impl InteractionRecord {
    /// The interaction kind.
    #[must_use]
    pub const fn interaction_type(&self) -> InteractionType {
        match self {
            Self::Click { .. } => InteractionType::Click,
            Self::FormSubmit { .. } => InteractionType::FormSubmit,
            Self::Search { .. } => InteractionType::Search,
        }
    }

    /// The element the interaction originated from.
    #[must_use]
    pub const fn element(&self) -> &ElementDescriptor {
        match self {
            Self::Click { element, .. }
            | Self::FormSubmit { element, .. }
            | Self::Search { element, .. } => element,
        }
    }

    /// When the interaction was captured.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Click { timestamp, .. }
            | Self::FormSubmit { timestamp, .. }
            | Self::Search { timestamp, .. } => *timestamp,
        }
    }
}

/// Aggregate of one page session, flushed when the page becomes hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Maximum scroll depth reached, in percent (0-100).
    pub scroll_depth: u8,
    /// Whole seconds on the page since the timer origin.
    pub time_on_page: u64,
    /// Interactions captured since the last flush, in capture order.
    #[serde(default)]
    pub interactions: Vec<InteractionRecord>,
}

impl SessionRecord {
    /// Highest scroll depth the collector accepts.
    pub const MAX_SCROLL_DEPTH: u8 = 100;

    /// Longest time on page the collector can store, in seconds.
    pub const MAX_TIME_ON_PAGE: u64 = i64::MAX.unsigned_abs();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_click_record_wire_shape() {
        let record = InteractionRecord::Click {
            element: ElementDescriptor::new("BUTTON").with_id("buy").with_class("btn"),
            timestamp: Utc::now(),
            details: ClickDetails {
                text: "Buy Now".to_owned(),
                href: None,
                class_name: "btn".to_owned(),
            },
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "click");
        assert_eq!(json["element"]["tag"], "BUTTON");
        assert_eq!(json["element"]["class"], "btn");
        assert_eq!(json["details"]["text"], "Buy Now");
    }

    #[test]
    fn test_form_submit_parses_from_browser_payload() {
        let record: InteractionRecord = serde_json::from_value(serde_json::json!({
            "type": "form_submit",
            "element": {"tag": "FORM", "id": "checkout"},
            "timestamp": "2026-01-01T00:00:00Z",
            "details": {"formId": "checkout", "action": "/pay", "method": "post"}
        }))
        .unwrap();

        assert_eq!(record.interaction_type(), InteractionType::FormSubmit);
        assert_eq!(record.element().id, "checkout");
        assert_eq!(record.element().class_name, "");
    }

    #[test]
    fn test_unknown_interaction_type_is_rejected() {
        let result = serde_json::from_value::<InteractionRecord>(serde_json::json!({
            "type": "hover",
            "element": {"tag": "DIV"},
            "timestamp": "2026-01-01T00:00:00Z",
            "details": {}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_session_record_camel_case() {
        let json = serde_json::to_value(SessionRecord {
            scroll_depth: 40,
            time_on_page: 12,
            interactions: Vec::new(),
        })
        .unwrap();
        assert_eq!(json["scrollDepth"], 40);
        assert_eq!(json["timeOnPage"], 12);
    }
}
