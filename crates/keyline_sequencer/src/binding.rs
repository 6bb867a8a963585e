// SPDX-License-Identifier: MIT OR Apache-2.0
//! Binding of tracks to live targets.
//!
//! The sequencer does not know what a scene object is. Hosts provide an
//! [`ObjectResolver`] to turn object paths into handles at load time, and a
//! [`PropertySink`] to read and write property values during playback.

use crate::document::TimelineDocument;
use crate::keyframe::PropertyId;
use crate::track::Track;
use indexmap::IndexMap;

/// Resolves object paths such as `"Root/Child/Target"` to live handles
pub trait ObjectResolver {
    /// Handle type identifying a live target
    type Handle;

    /// Resolve a path, returning `None` when no target matches
    fn resolve(&self, path: &str) -> Option<Self::Handle>;
}

/// Applies property values to live targets
pub trait PropertySink {
    /// Handle type identifying a live target
    type Handle;

    /// Write `value` to `property` of `target`
    fn apply(&mut self, target: &Self::Handle, property: &PropertyId, value: f32);

    /// Read the current value of `property`, if the target has it
    fn read(&self, target: &Self::Handle, property: &PropertyId) -> Option<f32>;
}

/// Non-fatal problem found while binding a document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingWarning {
    /// A track's target path did not resolve; the track is kept but inert
    #[error("Unresolved target: {path}")]
    UnresolvedTarget {
        /// Path that failed to resolve
        path: String,
    },
}

/// Join object names into a path
pub fn join_path<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names.into_iter().collect::<Vec<_>>().join("/")
}

/// Split a path into its non-empty object names
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|name| !name.is_empty())
}

/// A timeline document together with the handles its tracks resolved to
#[derive(Debug, Clone)]
pub struct BoundTimeline<H> {
    document: TimelineDocument,
    handles: IndexMap<String, H>,
}

impl<H> BoundTimeline<H> {
    /// Wrap a document without resolving any targets
    pub fn unbound(document: TimelineDocument) -> Self {
        Self {
            document,
            handles: IndexMap::new(),
        }
    }

    /// Resolve every track of `document`.
    ///
    /// Unresolved tracks stay in the document so that saving it again does
    /// not drop their keyframes.
    pub fn bind<R>(document: TimelineDocument, resolver: &R) -> (Self, Vec<BindingWarning>)
    where
        R: ObjectResolver<Handle = H>,
    {
        let mut bound = Self::unbound(document);
        let warnings = bound.rebind(resolver);
        (bound, warnings)
    }

    /// Resolve all tracks again, replacing previous handles
    pub fn rebind<R>(&mut self, resolver: &R) -> Vec<BindingWarning>
    where
        R: ObjectResolver<Handle = H>,
    {
        self.handles.clear();
        let mut warnings = Vec::new();

        for track in self.document.tracks() {
            let path = track.target_path();
            match resolver.resolve(path) {
                Some(handle) => {
                    tracing::debug!("Bound track '{path}'");
                    self.handles.insert(path.to_owned(), handle);
                }
                None => {
                    tracing::warn!("Timeline target not found: {path}");
                    warnings.push(BindingWarning::UnresolvedTarget {
                        path: path.to_owned(),
                    });
                }
            }
        }

        tracing::info!(
            "Timeline bound: {} of {} tracks, duration {}s",
            self.handles.len(),
            self.document.track_count(),
            self.document.duration()
        );

        warnings
    }

    /// Bind a target directly, e.g. when authoring adds a new object
    pub fn attach(&mut self, target_path: impl Into<String>, handle: H) -> Option<H> {
        self.handles.insert(target_path.into(), handle)
    }

    /// Forget the handle for a target; its track stays in the document
    pub fn detach(&mut self, target_path: &str) -> Option<H> {
        self.handles.shift_remove(target_path)
    }

    /// Handle bound to a target path
    pub fn handle(&self, target_path: &str) -> Option<&H> {
        self.handles.get(target_path)
    }

    /// Whether the target of a track is bound
    pub fn is_bound(&self, target_path: &str) -> bool {
        self.handles.contains_key(target_path)
    }

    /// Paths of tracks without a bound handle
    pub fn unresolved(&self) -> Vec<&str> {
        self.document
            .tracks()
            .map(Track::target_path)
            .filter(|path| !self.handles.contains_key(*path))
            .collect()
    }

    /// Get the document
    pub fn document(&self) -> &TimelineDocument {
        &self.document
    }

    /// Get the document for authoring edits
    pub fn document_mut(&mut self) -> &mut TimelineDocument {
        &mut self.document
    }

    /// Give the document back, dropping all handles
    pub fn into_document(self) -> TimelineDocument {
        self.document
    }
}
