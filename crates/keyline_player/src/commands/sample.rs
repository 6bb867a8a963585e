// SPDX-License-Identifier: MIT OR Apache-2.0
//! Print sampled values at a point in time.

use std::path::PathBuf;

use keyline_sequencer::{SampledValue, TimelineDocument};

use super::load_timeline;

/// Evaluate `document` at `time`, keeping only the requested target and property
fn select<'a>(
    document: &'a TimelineDocument,
    time: f32,
    target: Option<&str>,
    property: Option<&str>,
) -> Vec<SampledValue<'a>> {
    document
        .evaluate(time)
        .into_iter()
        .filter(|v| target.map_or(true, |t| v.target_path == t))
        .filter(|v| property.map_or(true, |p| v.property == p))
        .collect()
}

pub fn run(
    path: PathBuf,
    time: f32,
    target: Option<String>,
    property: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let document = load_timeline(&path)?;
    let time = time.clamp(0.0, document.duration());
    let values = select(&document, time, target.as_deref(), property.as_deref());

    if json {
        let entries: Vec<_> = values
            .iter()
            .map(|v| {
                serde_json::json!({
                    "targetPath": v.target_path,
                    "property": v.property,
                    "value": v.value,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({
            "time": time,
            "values": entries,
        }))?);
        return Ok(());
    }

    println!("t = {time}s");
    if values.is_empty() {
        println!("  (no keyed values)");
    }
    for v in &values {
        println!("  {} {} = {}", v.target_path, v.property, v.value);
    }

    Ok(())
}
