// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless playback against a scene description.

use std::path::PathBuf;

use anyhow::Context;
use keyline_sequencer::{BoundTimeline, PlaybackController, PlaybackEvent};

use super::load_timeline;
use crate::scene::{EntityId, SceneData};
use crate::settings::PlayerSettings;

/// Options for the `play` command
pub struct PlayOptions {
    pub timeline: PathBuf,
    pub scene: PathBuf,
    pub settings: Option<PathBuf>,
    pub looping: bool,
    pub repeat: Option<u32>,
    pub fps: Option<f32>,
    pub max_frames: Option<u32>,
    pub restore: bool,
}

impl PlayOptions {
    /// Load the settings file (if any) and apply command-line overrides
    fn resolve_settings(&self) -> anyhow::Result<PlayerSettings> {
        let mut settings = match &self.settings {
            Some(path) => PlayerSettings::load(path)
                .with_context(|| format!("Failed to load settings {}", path.display()))?,
            None => PlayerSettings::default(),
        };

        if self.looping {
            settings.playback.looping = true;
        }
        if let Some(repeat) = self.repeat {
            settings.playback.repeat_count = repeat;
        }
        if let Some(fps) = self.fps {
            settings.frame_rate = fps;
        }
        if let Some(max_frames) = self.max_frames {
            settings.max_frames = max_frames;
        }
        if self.restore {
            settings.restore_on_finish = true;
        }
        Ok(settings)
    }
}

/// Outcome of a simulated run
#[derive(Debug, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u32,
    pub loops: u32,
    pub finished: bool,
}

/// Tick the controller at a fixed step until it stops or the frame limit is hit
pub fn simulate(
    controller: &mut PlaybackController<EntityId>,
    scene: &mut SceneData,
    settings: &PlayerSettings,
) -> RunSummary {
    let delta = settings.frame_delta();
    let mut summary = RunSummary::default();

    while controller.is_playing() && summary.frames < settings.max_frames {
        controller.tick(delta, scene);
        summary.frames += 1;

        for event in controller.take_events() {
            match event {
                PlaybackEvent::Looped { loop_count } => summary.loops = loop_count,
                PlaybackEvent::Finished { loops_completed } => {
                    summary.loops = loops_completed;
                    summary.finished = true;
                }
            }
        }
    }

    if !summary.finished && controller.is_playing() {
        tracing::warn!("Frame limit {} reached while still playing", settings.max_frames);
    }
    summary
}

pub fn run(options: PlayOptions) -> anyhow::Result<()> {
    let settings = options.resolve_settings()?;
    let document = load_timeline(&options.timeline)?;
    let mut scene = SceneData::load(&options.scene)
        .with_context(|| format!("Failed to load scene {}", options.scene.display()))?;

    let (bound, warnings) = BoundTimeline::bind(document, &scene);
    for warning in &warnings {
        println!("warning: {warning}");
    }

    let mut controller = PlaybackController::new(settings.playback);
    controller.load(bound, &mut scene);

    if !settings.play_on_start {
        println!("play_on_start is disabled; nothing to do");
        return Ok(());
    }
    controller.play()?;

    let summary = simulate(&mut controller, &mut scene, &settings);
    println!(
        "Simulated {} frames at {} fps: {} pass(es), {}",
        summary.frames,
        settings.frame_rate,
        summary.loops,
        if summary.finished { "finished" } else { "still playing" }
    );

    if settings.restore_on_finish {
        controller.stop(&mut scene);
        println!("Scene restored");
    }

    print_bound_transforms(&controller, &scene);
    Ok(())
}

fn print_bound_transforms(controller: &PlaybackController<EntityId>, scene: &SceneData) {
    let Some(timeline) = controller.timeline() else {
        return;
    };

    println!();
    println!("Targets at t = {}s:", controller.time());
    for track in timeline.document().tracks() {
        let Some(entity) = timeline
            .handle(track.target_path())
            .and_then(|id| scene.get(id))
        else {
            println!("  {} (unresolved)", track.target_path());
            continue;
        };
        let t = entity.transform;
        println!("  {}", track.target_path());
        println!("    position: {:?}", t.position);
        println!("    rotation: {:?}", t.rotation);
        println!("    scale:    {:?}", t.scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyline_sequencer::{PlaybackConfig, TimelineDocument};

    const SCENE: &str = r#"(
        objects: [
            (name: "Root", children: [
                (name: "Cube", transform: (position: (5.0, 0.0, 0.0))),
            ]),
        ],
    )"#;

    fn setup(config: PlaybackConfig) -> (PlaybackController<EntityId>, SceneData, EntityId) {
        let mut scene = SceneData::from_ron(SCENE).unwrap();
        let cube = scene.find_by_path("Root/Cube").unwrap();

        let mut doc = TimelineDocument::with_duration(1.0);
        doc.add_keyframe("Root/Cube", 0.0, "position.x", 0.0);
        doc.add_keyframe("Root/Cube", 1.0, "position.x", 10.0);
        doc.add_keyframe("Root/Cube", 0.5, "rotation.y", 90.0);

        let (bound, warnings) = BoundTimeline::bind(doc, &scene);
        assert!(warnings.is_empty());

        let mut controller = PlaybackController::new(config);
        controller.load(bound, &mut scene);
        (controller, scene, cube)
    }

    #[test]
    fn test_single_pass_ends_on_last_keyframe() {
        let (mut controller, mut scene, cube) = setup(PlaybackConfig::default());
        let settings = PlayerSettings {
            frame_rate: 10.0,
            ..PlayerSettings::default()
        };
        controller.play().unwrap();

        let summary = simulate(&mut controller, &mut scene, &settings);
        assert!(summary.finished);
        assert_eq!(summary.loops, 1);

        let transform = scene.get(&cube).unwrap().transform;
        assert_eq!(transform.position[0], 10.0);
        assert_eq!(transform.rotation[1], 90.0);
    }

    #[test]
    fn test_looping_is_bounded_by_frame_limit() {
        let (mut controller, mut scene, _) = setup(PlaybackConfig::looping());
        let settings = PlayerSettings {
            frame_rate: 30.0,
            max_frames: 200,
            ..PlayerSettings::default()
        };
        controller.play().unwrap();

        let summary = simulate(&mut controller, &mut scene, &settings);
        assert_eq!(summary.frames, 200);
        assert!(!summary.finished);
        assert!(summary.loops >= 5);
        assert!(controller.is_playing());
    }

    #[test]
    fn test_stop_restores_scene() {
        let (mut controller, mut scene, cube) = setup(PlaybackConfig::repeat(2));
        let settings = PlayerSettings::default();
        controller.play().unwrap();
        simulate(&mut controller, &mut scene, &settings);

        controller.stop(&mut scene);
        let transform = scene.get(&cube).unwrap().transform;
        assert_eq!(transform.position, [5.0, 0.0, 0.0]);
        assert_eq!(transform.rotation, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cli_overrides_settings() {
        let options = PlayOptions {
            timeline: PathBuf::from("t.json"),
            scene: PathBuf::from("s.ron"),
            settings: None,
            looping: true,
            repeat: Some(4),
            fps: Some(24.0),
            max_frames: None,
            restore: true,
        };
        let settings = options.resolve_settings().unwrap();

        assert!(settings.playback.looping);
        assert_eq!(settings.playback.repeat_count, 4);
        assert_eq!(settings.frame_rate, 24.0);
        assert!(settings.restore_on_finish);
    }
}
