//! Keyframe tracks with amortized O(1) cursor-based sampling.
//!
//! Playback is overwhelmingly monotonic (time advances forward each frame),
//! so a small forward/backward linear scan from the last known position
//! resolves almost every sample without falling back to binary search.

use glam::{Quat, Vec3};

/// How neighbouring keyframes are blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
    CubicSpline,
}

/// Values a [`KeyframeTrack`] can hold must know how to blend between two
/// samples (e.g. `Quat` uses shortest-arc slerp, not linear blend).
pub trait Interpolatable: Copy {
    fn interpolate(a: Self, b: Self, t: f32) -> Self;
}

impl Interpolatable for Vec3 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

impl Interpolatable for Quat {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a.slerp(b, t)
    }
}

impl Interpolatable for f32 {
    fn interpolate(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

/// How far the forward/backward scan looks before giving up and binary
/// searching. Channels are short (§4.6), so this covers the common case.
const MAX_SCAN_OFFSET: usize = 3;

/// Remembers the last resolved keyframe index so repeated, monotonically
/// advancing samples are near-free.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    last_index: usize,
}

#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        debug_assert_eq!(times.len(), values.len());
        Self {
            times,
            values,
            interpolation,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Samples at time `t`, ignoring any cursor hint. Use
    /// [`Self::sample_with_cursor`] in a per-frame loop instead.
    #[must_use]
    pub fn sample(&self, t: f32) -> Option<T> {
        let mut cursor = KeyframeCursor::default();
        self.sample_with_cursor(t, &mut cursor)
    }

    /// Samples at time `t`, updating `cursor` with the resolved index so
    /// the next call (typically for `t' >= t`) is cheap.
    pub fn sample_with_cursor(&self, t: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let n = self.times.len();
        if n == 0 {
            return None;
        }
        if n == 1 {
            return Some(self.values[0]);
        }

        if t <= self.times[0] {
            cursor.last_index = 0;
            return Some(self.values[0]);
        }
        if t >= *self.times.last().unwrap() {
            cursor.last_index = n - 1;
            return Some(*self.values.last().unwrap());
        }

        let hint = cursor.last_index.min(n - 2);
        let lo = hint.saturating_sub(MAX_SCAN_OFFSET);
        let hi = (hint + MAX_SCAN_OFFSET).min(n - 2);

        let mut found = None;
        for i in lo..=hi {
            if self.times[i] <= t && t < self.times[i + 1] {
                found = Some(i);
                break;
            }
        }

        let index = found.unwrap_or_else(|| self.binary_search_segment(t));
        cursor.last_index = index;
        Some(self.interpolate_segment(index, t))
    }

    fn binary_search_segment(&self, t: f32) -> usize {
        match self.times.binary_search_by(|probe| probe.partial_cmp(&t).unwrap()) {
            Ok(i) => i.min(self.times.len() - 2),
            Err(i) => i.saturating_sub(1).min(self.times.len() - 2),
        }
    }

    fn interpolate_segment(&self, index: usize, t: f32) -> T {
        let t0 = self.times[index];
        let t1 = self.times[index + 1];
        let v0 = self.values[index];
        let v1 = self.values[index + 1];

        match self.interpolation {
            InterpolationMode::Step => v0,
            InterpolationMode::Linear | InterpolationMode::CubicSpline => {
                let span = (t1 - t0).max(f32::EPSILON);
                let alpha = ((t - t0) / span).clamp(0.0, 1.0);
                T::interpolate(v0, v1, alpha)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> KeyframeTrack<f32> {
        KeyframeTrack::new(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![0.0, 10.0, 20.0, 30.0],
            InterpolationMode::Linear,
        )
    }

    #[test]
    fn samples_before_first_key_clamp() {
        assert_eq!(chain().sample(-1.0), Some(0.0));
    }

    #[test]
    fn samples_after_last_key_clamp() {
        assert_eq!(chain().sample(10.0), Some(30.0));
    }

    #[test]
    fn linear_midpoint() {
        assert_eq!(chain().sample(0.5), Some(5.0));
    }

    #[test]
    fn forward_scan_cursor_matches_fresh_sample() {
        let track = chain();
        let mut cursor = KeyframeCursor::default();
        for t in [0.1, 0.9, 1.5, 2.5] {
            let expected = track.sample(t);
            let got = track.sample_with_cursor(t, &mut cursor);
            assert_eq!(expected, got);
        }
    }

    #[test]
    fn step_mode_holds_previous_value() {
        let track = KeyframeTrack::new(vec![0.0, 1.0], vec![1.0, 2.0], InterpolationMode::Step);
        assert_eq!(track.sample(0.9), Some(1.0));
    }

    #[test]
    fn quat_track_slerps_shortest_arc() {
        let track = KeyframeTrack::new(
            vec![0.0, 1.0],
            vec![Quat::IDENTITY, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)],
            InterpolationMode::Linear,
        );
        let mid = track.sample(0.5).unwrap();
        let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_4);
        assert!(mid.angle_between(expected) < 1e-4);
    }
}
