// SPDX-License-Identifier: MIT OR Apache-2.0
//! Write a default settings file.

use std::path::PathBuf;

use anyhow::Context;

use crate::settings::PlayerSettings;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    PlayerSettings::default()
        .save(&path)
        .with_context(|| format!("Failed to write settings {}", path.display()))?;

    println!("Wrote default settings to {}", path.display());
    Ok(())
}
