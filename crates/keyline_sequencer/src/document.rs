// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline document containing one track per animated target.

use crate::interpolate;
use crate::keyframe::PropertyId;
use crate::track::{KeyChange, Track, DEFAULT_KEY_EPSILON};
use indexmap::IndexMap;

/// Duration given to newly created documents, in seconds
pub const DEFAULT_DURATION: f32 = 10.0;

/// One sampled value produced by [`TimelineDocument::evaluate`]
#[derive(Debug, Clone, PartialEq)]
pub struct SampledValue<'a> {
    /// Object path of the target
    pub target_path: &'a str,
    /// Animated property
    pub property: &'a PropertyId,
    /// Interpolated value
    pub value: f32,
}

/// A timeline: total duration plus the tracks it animates
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineDocument {
    duration: f32,
    /// Tracks keyed by target path, in creation order
    tracks: IndexMap<String, Track>,
}

impl TimelineDocument {
    /// Create an empty document with [`DEFAULT_DURATION`]
    pub fn new() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            tracks: IndexMap::new(),
        }
    }

    /// Create an empty document with the given duration.
    ///
    /// Invalid durations fall back to [`DEFAULT_DURATION`].
    pub fn with_duration(duration: f32) -> Self {
        let mut doc = Self::new();
        doc.set_duration(duration);
        doc
    }

    /// Total duration in seconds
    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Set the total duration.
    ///
    /// Zero, negative and non-finite durations are rejected and the previous
    /// duration is kept. Returns whether the new value was accepted.
    pub fn set_duration(&mut self, duration: f32) -> bool {
        if !duration.is_finite() || duration <= 0.0 {
            tracing::warn!("Rejected timeline duration {duration}, keeping {}", self.duration);
            return false;
        }
        self.duration = duration;
        true
    }

    /// Add or replace a keyframe on the track for `target_path`, creating the track if needed
    pub fn add_keyframe(
        &mut self,
        target_path: &str,
        time: f32,
        property: impl Into<PropertyId>,
        value: f32,
    ) -> KeyChange {
        self.track_entry(target_path).upsert(time, property, value)
    }

    /// Remove the keyframes of `property` near `time` on one target
    pub fn remove_keyframe(&mut self, target_path: &str, property: &str, time: f32) -> usize {
        self.tracks
            .get_mut(target_path)
            .map_or(0, |track| track.remove_keyframe(property, time, DEFAULT_KEY_EPSILON))
    }

    /// Check whether `property` of a target is keyed near `time`
    pub fn has_keyframe_near(&self, target_path: &str, property: &str, time: f32) -> bool {
        self.tracks
            .get(target_path)
            .is_some_and(|track| track.has_keyframe_near(property, time, DEFAULT_KEY_EPSILON))
    }

    /// Get the track of a target, creating an empty one if it does not exist
    pub fn track_entry(&mut self, target_path: &str) -> &mut Track {
        self.tracks
            .entry(target_path.to_owned())
            .or_insert_with(|| Track::new(target_path))
    }

    /// Insert a whole track, replacing any track with the same target path
    pub fn insert_track(&mut self, track: Track) -> Option<Track> {
        self.tracks.insert(track.target_path().to_owned(), track)
    }

    /// Remove a track, keeping the order of the remaining tracks
    pub fn remove_track(&mut self, target_path: &str) -> Option<Track> {
        self.tracks.shift_remove(target_path)
    }

    /// Get a track
    pub fn track(&self, target_path: &str) -> Option<&Track> {
        self.tracks.get(target_path)
    }

    /// Get a mutable track
    pub fn track_mut(&mut self, target_path: &str) -> Option<&mut Track> {
        self.tracks.get_mut(target_path)
    }

    /// Get all tracks
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Get track count
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Total number of keyframes across all tracks
    pub fn keyframe_count(&self) -> usize {
        self.tracks.values().map(Track::keyframe_count).sum()
    }

    /// Time of the last keyframe in any track
    pub fn content_duration(&self) -> f32 {
        self.tracks.values().map(Track::end_time).fold(0.0, f32::max)
    }

    /// Remove every track, keeping the duration
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Sample every keyed property of every track at `time`
    pub fn evaluate(&self, time: f32) -> Vec<SampledValue<'_>> {
        let mut results = Vec::new();

        for track in self.tracks.values() {
            for property in track.properties() {
                if let Some(value) = interpolate::sample(track, property.as_str(), time) {
                    results.push(SampledValue {
                        target_path: track.target_path(),
                        property,
                        value,
                    });
                }
            }
        }

        results
    }
}

impl Default for TimelineDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keyframe_creates_track_once() {
        let mut doc = TimelineDocument::new();
        doc.add_keyframe("Root/Cube", 0.0, "position.x", 0.0);
        doc.add_keyframe("Root/Cube", 1.0, "position.x", 1.0);
        doc.add_keyframe("Root/Sphere", 0.0, "scale.x", 1.0);

        assert_eq!(doc.track_count(), 2);
        assert_eq!(doc.keyframe_count(), 3);
        assert_eq!(doc.track("Root/Cube").map(Track::keyframe_count), Some(2));
    }

    #[test]
    fn test_upsert_through_document() {
        let mut doc = TimelineDocument::new();
        doc.add_keyframe("Cube", 2.0, "rotation.y", 10.0);
        let change = doc.add_keyframe("Cube", 2.01, "rotation.y", 45.0);

        assert_eq!(change, KeyChange::Replaced);
        assert_eq!(doc.keyframe_count(), 1);
        assert!(doc.has_keyframe_near("Cube", "rotation.y", 2.0));
        assert!(!doc.has_keyframe_near("Missing", "rotation.y", 2.0));
    }

    #[test]
    fn test_duration_rejects_invalid_values() {
        let mut doc = TimelineDocument::with_duration(4.0);
        assert!(!doc.set_duration(0.0));
        assert!(!doc.set_duration(-2.0));
        assert!(!doc.set_duration(f32::NAN));
        assert_eq!(doc.duration(), 4.0);

        assert_eq!(TimelineDocument::with_duration(0.0).duration(), DEFAULT_DURATION);
    }

    #[test]
    fn test_remove_track_keeps_order() {
        let mut doc = TimelineDocument::new();
        doc.track_entry("A");
        doc.track_entry("B");
        doc.track_entry("C");
        assert!(doc.remove_track("B").is_some());

        let paths: Vec<_> = doc.tracks().map(Track::target_path).collect();
        assert_eq!(paths, vec!["A", "C"]);
    }

    #[test]
    fn test_empty_track_contributes_nothing() {
        let mut doc = TimelineDocument::new();
        doc.track_entry("Empty");
        doc.add_keyframe("Cube", 1.0, "position.z", 3.0);

        let values = doc.evaluate(5.0);
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].target_path, "Cube");
        assert_eq!(values[0].value, 3.0);
        assert!(doc.evaluate(0.5).is_empty());
    }

    #[test]
    fn test_content_duration_and_clear() {
        let mut doc = TimelineDocument::new();
        doc.add_keyframe("A", 1.0, "position.x", 0.0);
        doc.add_keyframe("B", 7.5, "position.x", 0.0);
        assert_eq!(doc.content_duration(), 7.5);

        doc.clear();
        assert_eq!(doc.track_count(), 0);
        assert_eq!(doc.duration(), DEFAULT_DURATION);
    }
}
