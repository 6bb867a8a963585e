// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe timeline engine for Keyline.
//!
//! This crate provides the runtime side of keyframe animation:
//! - Keyframes and per-target tracks
//! - Linear sampling of scalar properties
//! - Playback with loop and repeat control
//! - JSON persistence of timeline documents
//!
//! ## Architecture
//!
//! The sequencer is built on:
//! - [`TimelineDocument`], the unit of authoring and persistence
//! - [`ObjectResolver`] and [`PropertySink`], implemented by the host to
//!   connect tracks to live objects
//! - [`PlaybackController`], a tick-driven state machine with no I/O

pub mod binding;
pub mod document;
pub mod format;
pub mod interpolate;
pub mod keyframe;
pub mod playback;
pub mod track;

pub use binding::{BindingWarning, BoundTimeline, ObjectResolver, PropertySink};
pub use document::{SampledValue, TimelineDocument, DEFAULT_DURATION};
pub use format::{FormatError, TIMELINE_FORMAT_VERSION};
pub use interpolate::{sample, SAMPLE_TOLERANCE};
pub use keyframe::{Interpolation, Keyframe, PropertyId};
pub use playback::{
    PlaybackConfig, PlaybackController, PlaybackError, PlaybackEvent, PlaybackState, WrapMode,
};
pub use track::{KeyChange, Track, DEFAULT_KEY_EPSILON};
