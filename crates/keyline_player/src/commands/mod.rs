// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command implementations.

use anyhow::Context;
use keyline_sequencer::TimelineDocument;
use std::path::Path;

pub mod info;
pub mod init;
pub mod key;
pub mod play;
pub mod sample;

/// Read and decode a timeline file
pub fn load_timeline(path: &Path) -> anyhow::Result<TimelineDocument> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read timeline {}", path.display()))?;
    let document = TimelineDocument::from_json(&json)
        .with_context(|| format!("Failed to load timeline {}", path.display()))?;

    tracing::info!(
        "Timeline loaded: {} tracks, duration {}s",
        document.track_count(),
        document.duration()
    );
    Ok(document)
}

/// Encode and write a timeline file
pub fn save_timeline(path: &Path, document: &TimelineDocument) -> anyhow::Result<()> {
    let json = document.to_json().context("Failed to encode timeline")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write timeline {}", path.display()))?;

    tracing::info!("Timeline saved to {}", path.display());
    Ok(())
}
