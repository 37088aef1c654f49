//! Message record type for exported workspace logs.
//!
//! This module provides [`MessageRecord`], a thin typed wrapper over the
//! loose JSON object a workspace export stores per message. Exports are
//! variant-rich — which fields appear depends on message kind, threading
//! state and client version — so the record keeps the raw map and exposes
//! typed accessors for the handful of fields the pipeline dispatches on.
//!
//! # Eligibility
//!
//! A record is eligible for deep transformation only if it carries a
//! client-assigned message identifier (`client_msg_id`). Records without one
//! (join/leave notices, bot posts, ...) are passed through untouched and
//! routed to a separate not-processed collection.
//!
//! # Example
//!
//! ```
//! use chatscrub::record::MessageRecord;
//!
//! let json = r#"{"client_msg_id": "abc", "ts": "1609459200", "text": "hi"}"#;
//! let mut record: MessageRecord = serde_json::from_str(json)?;
//!
//! assert!(record.is_eligible());
//! assert!(record.remove_field("text"));
//! assert!(!record.remove_field("text"));
//! # Ok::<(), serde_json::Error>(())
//! ```

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder identifier for records without a client message id.
pub const NO_CLIENT_MSG_ID: &str = "NO CLIENT MESSAGE ID AVAILABLE";

/// Output format for converted timestamps.
const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One message from a per-day export file.
///
/// Wraps the raw JSON object; key order is preserved on round-trip so
/// ineligible records can be passed through byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageRecord(pub Map<String, Value>);

impl MessageRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// The client-assigned message identifier, if present.
    pub fn client_msg_id(&self) -> Option<&str> {
        self.0.get("client_msg_id").and_then(Value::as_str)
    }

    /// The identifier used in diagnostics: the client message id or a
    /// placeholder.
    pub fn display_id(&self) -> String {
        self.client_msg_id().unwrap_or(NO_CLIENT_MSG_ID).to_string()
    }

    /// Whether this record is eligible for deep transformation.
    pub fn is_eligible(&self) -> bool {
        self.0.contains_key("client_msg_id")
    }

    /// Whether this record carries thread/reply metadata.
    pub fn has_thread_metadata(&self) -> bool {
        self.0.contains_key("reply_count")
    }

    /// Whether this record carries a rich-content block field.
    pub fn has_blocks(&self) -> bool {
        self.0.contains_key("blocks")
    }

    /// Removes a field if present.
    ///
    /// Returns whether the field existed, so callers can log the absence
    /// instead of swallowing it. Uses a shifting removal so the surviving
    /// fields keep their original order in the output.
    pub fn remove_field(&mut self, name: &str) -> bool {
        self.0.shift_remove(name).is_some()
    }

    /// Returns a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Returns a mutable field value by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.0.get_mut(name)
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    /// Converts every embedded epoch timestamp to `YYYY-MM-DD HH:MM:SS` UTC.
    ///
    /// Covers the record's own `ts` and the `ts` of each entry under
    /// `replies`. Unparsable or absent timestamps are left untouched.
    pub fn convert_timestamps(&mut self) {
        if let Some(ts) = self.0.get_mut("ts") {
            convert_epoch_in_place(ts);
        }
        if let Some(replies) = self.0.get_mut("replies").and_then(Value::as_array_mut) {
            for reply in replies {
                if let Some(ts) = reply.get_mut("ts") {
                    convert_epoch_in_place(ts);
                }
            }
        }
    }
}

impl Default for MessageRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Map<String, Value>> for MessageRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Rewrites an epoch timestamp value (string like `"1609459200.000200"` or
/// number) to its formatted UTC form, in place. Leaves the value untouched
/// when it cannot be interpreted as an epoch.
fn convert_epoch_in_place(value: &mut Value) {
    let epoch = match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    if let Some(formatted) = epoch
        .and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
        .map(|dt| dt.format(TS_FORMAT).to_string())
    {
        *value = Value::String(formatted);
    }
}
