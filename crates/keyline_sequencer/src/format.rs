// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSON persistence for timeline documents.
//!
//! The on-disk shape is an explicit schema rather than a dump of the
//! in-memory types:
//!
//! ```json
//! {
//!   "version": 1,
//!   "duration": 4.0,
//!   "tracks": [
//!     { "targetPath": "Root/Cube",
//!       "keyframes": [ { "time": 0.0, "property": "position.x", "value": 1.5 } ] }
//!   ]
//! }
//! ```
//!
//! Tracks are identified by object path, never by a runtime handle.

use crate::document::TimelineDocument;
use crate::keyframe::{Keyframe, PropertyId};
use crate::track::Track;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Current timeline format version
pub const TIMELINE_FORMAT_VERSION: u32 = 1;

/// Errors produced while reading or writing timeline documents
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Input is not a structurally valid timeline
    #[error("Malformed timeline document: {0}")]
    MalformedDocument(String),

    /// Document was written by a newer format version
    #[error("Unsupported timeline format version {found}")]
    UnsupportedVersion {
        /// Version found in the document
        found: u32,
    },

    /// Document could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn default_version() -> u32 {
    TIMELINE_FORMAT_VERSION
}

#[derive(Debug, Serialize, Deserialize)]
struct TimelineFile {
    #[serde(default = "default_version")]
    version: u32,
    duration: f32,
    #[serde(default)]
    tracks: Vec<TrackRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackRecord {
    target_path: String,
    #[serde(default)]
    keyframes: Vec<KeyframeRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct KeyframeRecord {
    time: f32,
    property: PropertyId,
    value: f32,
}

impl From<&Keyframe> for KeyframeRecord {
    fn from(kf: &Keyframe) -> Self {
        Self {
            time: kf.time(),
            property: kf.property().clone(),
            value: kf.value(),
        }
    }
}

/// Encode a document as pretty-printed JSON
pub fn serialize(document: &TimelineDocument) -> Result<String, FormatError> {
    let file = TimelineFile {
        version: TIMELINE_FORMAT_VERSION,
        duration: document.duration(),
        tracks: document
            .tracks()
            .map(|track| TrackRecord {
                target_path: track.target_path().to_owned(),
                keyframes: track.keyframes().iter().map(KeyframeRecord::from).collect(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Decode a document.
///
/// Either the whole document is valid and returned, or an error is returned;
/// nothing is partially applied.
pub fn deserialize(text: &str) -> Result<TimelineDocument, FormatError> {
    let file: TimelineFile = serde_json::from_str(text)
        .map_err(|e| FormatError::MalformedDocument(e.to_string()))?;

    if file.version > TIMELINE_FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion { found: file.version });
    }
    if !file.duration.is_finite() || file.duration <= 0.0 {
        return Err(FormatError::MalformedDocument(format!(
            "duration must be positive, got {}",
            file.duration
        )));
    }

    let mut document = TimelineDocument::with_duration(file.duration);
    let mut seen = HashSet::new();

    for record in file.tracks {
        if !seen.insert(record.target_path.clone()) {
            return Err(FormatError::MalformedDocument(format!(
                "duplicate track for target '{}'",
                record.target_path
            )));
        }

        let mut track = Track::new(record.target_path);
        for kf in record.keyframes {
            if !kf.time.is_finite() || kf.time < 0.0 || !kf.value.is_finite() {
                return Err(FormatError::MalformedDocument(format!(
                    "invalid keyframe '{}' at {} on '{}'",
                    kf.property,
                    kf.time,
                    track.target_path()
                )));
            }
            track.upsert(kf.time, kf.property, kf.value);
        }
        document.insert_track(track);
    }

    tracing::debug!(
        "Decoded timeline: {} tracks, {} keyframes, duration {}s",
        document.track_count(),
        document.keyframe_count(),
        document.duration()
    );

    Ok(document)
}

impl TimelineDocument {
    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, FormatError> {
        serialize(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        deserialize(json)
    }
}
