// SPDX-License-Identifier: MIT OR Apache-2.0
//! Track definitions for the sequencer.

use crate::keyframe::{Keyframe, PropertyId};

/// Default time distance under which two keyframes of one property are merged
pub const DEFAULT_KEY_EPSILON: f32 = 0.05;

/// Outcome of inserting a keyframe into a track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyChange {
    /// A new keyframe was added
    Inserted,
    /// One or more existing keyframes were replaced
    Replaced,
    /// The keyframe was ignored (non-finite time or value)
    Rejected,
}

/// The keyframes animating one target, identified by its object path.
///
/// Keyframes only enter through [`Track::upsert`], so they stay sorted by time
/// and unique per property within the epsilon.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    target_path: String,
    keyframes: Vec<Keyframe>,
}

impl Track {
    /// Create an empty track for the target at `target_path`
    pub fn new(target_path: impl Into<String>) -> Self {
        Self {
            target_path: target_path.into(),
            keyframes: Vec::new(),
        }
    }

    /// Object path of the animated target
    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    /// Insert or replace a keyframe using [`DEFAULT_KEY_EPSILON`]
    pub fn upsert(&mut self, time: f32, property: impl Into<PropertyId>, value: f32) -> KeyChange {
        self.upsert_with_epsilon(time, property, value, DEFAULT_KEY_EPSILON)
    }

    /// Insert a keyframe, replacing every same-property keyframe closer than `epsilon`
    pub fn upsert_with_epsilon(
        &mut self,
        time: f32,
        property: impl Into<PropertyId>,
        value: f32,
        epsilon: f32,
    ) -> KeyChange {
        if !time.is_finite() || !value.is_finite() {
            return KeyChange::Rejected;
        }

        let keyframe = Keyframe::new(time, property, value);
        let before = self.keyframes.len();
        self.keyframes
            .retain(|k| !k.is_near(keyframe.property().as_str(), keyframe.time(), epsilon));
        let replaced = self.keyframes.len() != before;

        self.insert_sorted(keyframe);

        if replaced {
            KeyChange::Replaced
        } else {
            KeyChange::Inserted
        }
    }

    /// Insert after any keyframes sharing the same time, keeping the order stable
    fn insert_sorted(&mut self, keyframe: Keyframe) {
        let idx = self
            .keyframes
            .partition_point(|k| k.time() <= keyframe.time());
        self.keyframes.insert(idx, keyframe);
    }

    /// Remove every keyframe of `property` within `epsilon` of `time`.
    ///
    /// Returns the number of removed keyframes.
    pub fn remove_keyframe(&mut self, property: &str, time: f32, epsilon: f32) -> usize {
        let before = self.keyframes.len();
        self.keyframes.retain(|k| !k.is_near(property, time, epsilon));
        before - self.keyframes.len()
    }

    /// Remove all keyframes of a property
    pub fn remove_property(&mut self, property: &str) -> usize {
        let before = self.keyframes.len();
        self.keyframes.retain(|k| k.property() != property);
        before - self.keyframes.len()
    }

    /// Check if a keyframe of `property` exists near `time`
    pub fn has_keyframe_near(&self, property: &str, time: f32, epsilon: f32) -> bool {
        self.keyframes.iter().any(|k| k.is_near(property, time, epsilon))
    }

    /// Keyframes of one property, in time order
    pub fn keyframes_for<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a Keyframe> + 'a {
        self.keyframes.iter().filter(move |k| k.property() == property)
    }

    /// Distinct properties in the order they first appear
    pub fn properties(&self) -> Vec<&PropertyId> {
        let mut seen: Vec<&PropertyId> = Vec::new();
        for kf in &self.keyframes {
            if !seen.contains(&kf.property()) {
                seen.push(kf.property());
            }
        }
        seen
    }

    /// Get all keyframes
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Get keyframe count
    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether the track holds no keyframes
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Time of the last keyframe
    pub fn end_time(&self) -> f32 {
        self.keyframes.last().map_or(0.0, Keyframe::time)
    }
}
