// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe definitions for the sequencer.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Name of one scalar animatable channel on a target, e.g. `"position.x"`.
///
/// The sequencer never interprets the name; meaning is assigned by whichever
/// [`PropertySink`](crate::binding::PropertySink) receives the values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    /// Create a property identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the raw property name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PropertyId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PropertyId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for PropertyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PropertyId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PropertyId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A single timestamped sample of one property.
///
/// Keyframes are never edited in place: tracks replace them wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    time: f32,
    property: PropertyId,
    value: f32,
}

impl Keyframe {
    /// Create a new keyframe. Negative times are clamped to zero.
    pub fn new(time: f32, property: impl Into<PropertyId>, value: f32) -> Self {
        Self {
            time: time.max(0.0),
            property: property.into(),
            value,
        }
    }

    /// Time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Animated property
    pub fn property(&self) -> &PropertyId {
        &self.property
    }

    /// Value at this keyframe
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Whether this keyframe samples `property` within `epsilon` of `time`
    pub fn is_near(&self, property: &str, time: f32, epsilon: f32) -> bool {
        self.property == property && (self.time - time).abs() < epsilon
    }
}

/// Interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two floats
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Normalized position of `time` between `start` and `end`, clamped to `[0, 1]`.
    ///
    /// Returns `0.0` for an empty span.
    pub fn factor(start: f32, end: f32, time: f32) -> f32 {
        let span = end - start;
        if span <= 0.0 {
            return 0.0;
        }
        ((time - start) / span).clamp(0.0, 1.0)
    }
}
