//! # Transaction Context
//!
//! A replayed transaction as seen by the projector: its hash, the height it
//! was included at, and the per-message event log emitted during execution.
//!
//! ## Lookup Semantics
//!
//! Event and attribute lookups succeed only when exactly one match exists.
//! Zero matches and several matches are both errors; callers never pick
//! among candidates.

use serde::{Deserialize, Serialize};

use crate::entities::Height;
use crate::errors::EventLogError;

/// A key/value pair attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An event emitted during execution, with string attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<Attribute>,
}

impl StringEvent {
    pub fn new(kind: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            kind: kind.into(),
            attributes,
        }
    }

    /// Value of the single attribute named `key`.
    pub fn find_attribute_by_key(&self, key: &str) -> Result<&str, EventLogError> {
        let mut matches = self.attributes.iter().filter(|attr| attr.key == key);
        match (matches.next(), matches.count()) {
            (Some(attr), 0) => Ok(attr.value.as_str()),
            (Some(_), extra) => Err(EventLogError::AmbiguousAttribute {
                event_type: self.kind.clone(),
                key: key.to_string(),
                count: extra + 1,
            }),
            (None, _) => Err(EventLogError::AttributeNotFound {
                event_type: self.kind.clone(),
                key: key.to_string(),
            }),
        }
    }
}

/// Events emitted by a single message of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    pub msg_index: usize,
    pub events: Vec<StringEvent>,
}

/// A transaction together with its execution log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub hash: String,
    pub height: Height,
    /// One entry per successfully executed message. Empty for failed
    /// transactions.
    pub logs: Vec<MessageLog>,
}

impl Tx {
    pub fn new(hash: impl Into<String>, height: Height, logs: Vec<MessageLog>) -> Self {
        Self {
            hash: hash.into(),
            height,
            logs,
        }
    }

    /// Whether execution emitted any log at all.
    pub fn has_logs(&self) -> bool {
        !self.logs.is_empty()
    }

    /// The single event of type `event_type` emitted by message `index`.
    pub fn find_event_by_type(
        &self,
        index: usize,
        event_type: &str,
    ) -> Result<&StringEvent, EventLogError> {
        let mut logs = self.logs.iter().filter(|log| log.msg_index == index);
        let log = match (logs.next(), logs.count()) {
            (Some(log), 0) => log,
            (Some(_), extra) => {
                return Err(EventLogError::AmbiguousMessageLog {
                    index,
                    count: extra + 1,
                })
            }
            (None, _) => {
                return Err(EventLogError::MessageLogNotFound {
                    index,
                    available: self.logs.len(),
                })
            }
        };

        let mut matches = log.events.iter().filter(|event| event.kind == event_type);
        match (matches.next(), matches.count()) {
            (Some(event), 0) => Ok(event),
            (Some(_), extra) => Err(EventLogError::AmbiguousEvent {
                index,
                event_type: event_type.to_string(),
                count: extra + 1,
            }),
            (None, _) => Err(EventLogError::EventNotFound {
                index,
                event_type: event_type.to_string(),
            }),
        }
    }
}
