// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframe authoring commands.

use std::path::PathBuf;

use keyline_sequencer::{KeyChange, TimelineDocument};

use super::{load_timeline, save_timeline};

pub fn run(
    path: PathBuf,
    target: String,
    property: String,
    time: f32,
    value: f32,
    duration: Option<f32>,
) -> anyhow::Result<()> {
    let mut document = if path.exists() {
        load_timeline(&path)?
    } else {
        tracing::info!("Creating new timeline {}", path.display());
        TimelineDocument::new()
    };

    if let Some(duration) = duration {
        if !document.set_duration(duration) {
            anyhow::bail!("Invalid duration: {duration}");
        }
    }

    match document.add_keyframe(&target, time, property.as_str(), value) {
        KeyChange::Inserted => println!("Keyed {target} {property} = {value} at {time}s"),
        KeyChange::Replaced => println!("Replaced {target} {property} = {value} at {time}s"),
        KeyChange::Rejected => anyhow::bail!("Keyframe time and value must be finite"),
    }
    if time > document.duration() {
        tracing::warn!(
            "Keyframe at {time}s lies past the timeline duration {}s",
            document.duration()
        );
    }

    save_timeline(&path, &document)
}

pub fn remove(
    path: PathBuf,
    target: String,
    property: Option<String>,
    time: Option<f32>,
) -> anyhow::Result<()> {
    let mut document = load_timeline(&path)?;

    match (property, time) {
        (Some(property), Some(time)) => {
            let removed = document.remove_keyframe(&target, &property, time);
            if removed == 0 {
                anyhow::bail!("No {property} keyframe on {target} near {time}s");
            }
            println!("Removed {removed} keyframe(s) from {target} {property}");
        }
        _ => {
            let track = document
                .remove_track(&target)
                .ok_or_else(|| anyhow::anyhow!("No track for target {target}"))?;
            println!(
                "Removed track {} ({} keyframes)",
                track.target_path(),
                track.keyframe_count()
            );
        }
    }

    save_timeline(&path, &document)
}
