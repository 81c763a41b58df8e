//! # Error Types
//!
//! Errors raised while reading chain wire types.

use thiserror::Error;

/// Errors raised by event log lookups.
///
/// Every lookup has exactly-one-or-error semantics: a missing entry and an
/// ambiguous entry are both failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventLogError {
    /// The transaction has no log for the given message index.
    #[error("no message log for message {index} ({available} logs available)")]
    MessageLogNotFound { index: usize, available: usize },

    /// Several logs claim the same message index.
    #[error("found {count} message logs for message {index}, expected exactly one")]
    AmbiguousMessageLog { index: usize, count: usize },

    /// No event of the requested type was emitted by the message.
    #[error("no event with type {event_type} found in message {index}")]
    EventNotFound { index: usize, event_type: String },

    /// More than one event of the requested type was emitted by the message.
    #[error("found {count} events with type {event_type} in message {index}, expected exactly one")]
    AmbiguousEvent {
        index: usize,
        event_type: String,
        count: usize,
    },

    /// The event carries no attribute with the requested key.
    #[error("no attribute with key {key} found inside event with type {event_type}")]
    AttributeNotFound { event_type: String, key: String },

    /// The event carries the requested key more than once.
    #[error("found {count} attributes with key {key} inside event with type {event_type}, expected exactly one")]
    AmbiguousAttribute {
        event_type: String,
        key: String,
        count: usize,
    },
}

/// Errors raised while parsing decimal amounts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalError {
    /// The string is empty or contains something other than digits and a single dot.
    #[error("invalid decimal string: {0:?}")]
    Invalid(String),

    /// The fractional part is longer than the supported precision.
    #[error("decimal {value:?} has more than {max} fractional digits")]
    TooPrecise { value: String, max: u32 },

    /// The value does not fit the backing integer.
    #[error("decimal {0:?} is out of range")]
    Overflow(String),
}
