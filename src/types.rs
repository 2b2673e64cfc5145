//! Core data types for the streaming layer
//!
//! An [`AttributeEvent`] is one attribute-update notification from the
//! device layer. Events are immutable once created; ownership moves from
//! the producer into the mailbox and from the mailbox to the consumer.
//!
//! The coalescing pipeline treats the payload opaquely — it only decides
//! which event is newest, never inspects the value.

use chrono::{DateTime, Utc};

/// The kind of notification the device layer emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The attribute value changed.
    Change,
    /// Periodic re-send of the current value.
    Periodic,
    /// Attribute configuration (unit, format, limits) changed.
    Config,
    /// The device layer reported an error condition for this attribute.
    Error,
}

impl EventKind {
    /// Short lowercase label, used in log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Change => "change",
            EventKind::Periodic => "periodic",
            EventKind::Config => "config",
            EventKind::Error => "error",
        }
    }
}

/// Attribute payload carried by an event.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// A single reading (e.g. `nBunches`).
    Scalar(f64),
    /// A 1-D waveform (e.g. the bunch intensity curve).
    Spectrum(Vec<f64>),
}

impl AttrValue {
    /// Number of points in the payload.
    pub fn len(&self) -> usize {
        match self {
            AttrValue::Scalar(_) => 1,
            AttrValue::Spectrum(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, AttrValue::Spectrum(v) if v.is_empty())
    }

    /// The scalar reading, if this payload is one.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            AttrValue::Scalar(v) => Some(*v),
            AttrValue::Spectrum(_) => None,
        }
    }
}

/// One attribute-update notification.
///
/// `timestamp` is the wall-clock receive time, carried for observability
/// only — coalescing order is defined by push order, not by timestamps.
#[derive(Debug, Clone)]
pub struct AttributeEvent {
    /// Attribute name the event originates from.
    pub source: String,
    /// Notification kind.
    pub kind: EventKind,
    /// Payload.
    pub value: AttrValue,
    /// Receive time.
    pub timestamp: DateTime<Utc>,
}

impl AttributeEvent {
    /// Create an event stamped with the current time.
    pub fn new(source: impl Into<String>, kind: EventKind, value: AttrValue) -> Self {
        Self {
            source: source.into(),
            kind,
            value,
            timestamp: Utc::now(),
        }
    }

    /// Convenience constructor for a scalar change event.
    pub fn scalar(source: impl Into<String>, value: f64) -> Self {
        Self::new(source, EventKind::Change, AttrValue::Scalar(value))
    }

    /// Convenience constructor for a spectrum change event.
    pub fn spectrum(source: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(source, EventKind::Change, AttrValue::Spectrum(values))
    }
}
