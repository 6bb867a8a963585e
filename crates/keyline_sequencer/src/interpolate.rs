// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sampling of track properties at arbitrary times.
//!
//! Sampling is stateless: every call looks only at the track and the query
//! time, so playback, scrubbing and inspection can interleave freely.

use crate::keyframe::{Interpolation, Keyframe};
use crate::track::Track;

/// Forward tolerance under which a keyframe counts as "at" the query time
pub const SAMPLE_TOLERANCE: f32 = 0.001;

/// Sample `property` of `track` at `time`.
///
/// Returns `None` before the first keyframe of the property and when the
/// property has no keyframes at all. After the last keyframe its value is held.
pub fn sample(track: &Track, property: &str, time: f32) -> Option<f32> {
    sample_keyframes(track.keyframes_for(property), time)
}

/// Sample an already filtered, time-ordered run of keyframes
pub fn sample_keyframes<'a, I>(keyframes: I, time: f32) -> Option<f32>
where
    I: IntoIterator<Item = &'a Keyframe>,
{
    let (prev, next) = find_keyframes(keyframes, time);
    let prev = prev?;

    match next {
        Some(next) if next.time() > prev.time() => {
            let t = Interpolation::factor(prev.time(), next.time(), time);
            Some(Interpolation::lerp(prev.value(), next.value(), t))
        }
        _ => Some(prev.value()),
    }
}

/// Find the keyframes surrounding `time`
fn find_keyframes<'a, I>(keyframes: I, time: f32) -> (Option<&'a Keyframe>, Option<&'a Keyframe>)
where
    I: IntoIterator<Item = &'a Keyframe>,
{
    let mut prev = None;
    for kf in keyframes {
        if kf.time() <= time + SAMPLE_TOLERANCE {
            prev = Some(kf);
        } else {
            return (prev, Some(kf));
        }
    }
    (prev, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    fn two_key_track() -> Track {
        let mut track = Track::new("Cube");
        track.upsert(1.0, "position.x", 2.0);
        track.upsert(3.0, "position.x", 6.0);
        track
    }

    #[test]
    fn test_single_keyframe_holds_after() {
        let mut track = Track::new("Cube");
        track.upsert(1.5, "scale.x", 4.0);

        assert_eq!(sample(&track, "scale.x", 1.5), Some(4.0));
        assert_eq!(sample(&track, "scale.x", 100.0), Some(4.0));
        assert_eq!(sample(&track, "scale.x", 1.0), None);
        assert_eq!(sample(&track, "scale.x", 0.0), None);
    }

    #[test]
    fn test_two_keyframes_exact_ends_and_midpoint() {
        let track = two_key_track();

        assert_eq!(sample(&track, "position.x", 1.0), Some(2.0));
        assert_eq!(sample(&track, "position.x", 3.0), Some(6.0));
        assert!(approx(sample(&track, "position.x", 2.0).unwrap(), 4.0));
        assert!(approx(sample(&track, "position.x", 1.5).unwrap(), 3.0));
    }

    #[test]
    fn test_before_first_keyframe_yields_nothing() {
        let track = two_key_track();
        assert_eq!(sample(&track, "position.x", 0.5), None);
    }

    #[test]
    fn test_unknown_property_yields_nothing() {
        let track = two_key_track();
        assert_eq!(sample(&track, "position.y", 2.0), None);
        assert_eq!(sample(&Track::new("Empty"), "position.x", 2.0), None);
    }

    #[test]
    fn test_forward_tolerance_snaps_to_keyframe() {
        let track = two_key_track();
        assert_eq!(sample(&track, "position.x", 0.9995), Some(2.0));
    }

    #[test]
    fn test_properties_are_independent() {
        let mut track = two_key_track();
        track.upsert(0.0, "position.y", -1.0);
        track.upsert(2.0, "position.y", 1.0);

        assert!(approx(sample(&track, "position.y", 1.0).unwrap(), 0.0));
        assert!(approx(sample(&track, "position.x", 2.0).unwrap(), 4.0));
    }

    #[test]
    fn test_coincident_keyframes_hold_previous() {
        let keys = [
            Keyframe::new(1.0, "position.x", 5.0),
            Keyframe::new(1.0, "position.x", 9.0),
        ];
        // Second key is `prev` because both are at or before the query time.
        assert_eq!(sample_keyframes(&keys, 1.0), Some(9.0));
        assert_eq!(sample_keyframes(&keys, 0.5), None);
    }

    #[test]
    fn test_scrubbing_order_does_not_matter() {
        let track = two_key_track();
        let forward: Vec<_> = [1.0, 2.0, 2.5].iter().map(|&t| sample(&track, "position.x", t)).collect();
        let mut backward: Vec<_> = [2.5, 2.0, 1.0].iter().map(|&t| sample(&track, "position.x", t)).collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }
}
