// SPDX-License-Identifier: MIT OR Apache-2.0
//! Show timeline information.

use std::path::PathBuf;

use super::load_timeline;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let document = load_timeline(&path)?;

    println!("Timeline: {}", path.display());
    println!("  Duration: {}s", document.duration());
    println!("  Last keyframe: {}s", document.content_duration());
    println!("  Keyframes: {}", document.keyframe_count());
    println!();

    println!("Tracks ({}):", document.track_count());
    for track in document.tracks() {
        println!("  {} ({} keyframes)", track.target_path(), track.keyframe_count());
        for property in track.properties() {
            let keys: Vec<String> = track
                .keyframes_for(property.as_str())
                .map(|kf| format!("{}@{}", kf.value(), kf.time()))
                .collect();
            println!("    {property}: {}", keys.join(", "));
        }
    }

    Ok(())
}
