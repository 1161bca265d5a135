//! Animation clips (§3.1, §4.6).

use crate::animation::tracks::KeyframeTrack;
use glam::{Quat, Vec3};

/// Position/rotation/scaling tracks for one skeleton node. Channels
/// without keys fall back to the node's bind transform (§4.6).
#[derive(Debug, Clone, Default)]
pub struct NodeChannel {
    pub node_index: u32,
    pub position: Option<KeyframeTrack<Vec3>>,
    pub rotation: Option<KeyframeTrack<Quat>>,
    pub scaling: Option<KeyframeTrack<Vec3>>,
}

impl NodeChannel {
    #[must_use]
    pub fn new(node_index: u32) -> Self {
        Self {
            node_index,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub ticks_per_second: f32,
    pub duration_ticks: f32,
    pub channels: Vec<NodeChannel>,
}

impl AnimationClip {
    /// Duration is derived from the channels' own key times rather than
    /// stored redundantly, matching §4.6's "duration" being implied by the
    /// track data.
    #[must_use]
    pub fn new(name: String, ticks_per_second: f32, channels: Vec<NodeChannel>) -> Self {
        let duration_ticks = channels
            .iter()
            .flat_map(|c| {
                [
                    c.position.as_ref().and_then(|t| t.times.last().copied()),
                    c.rotation.as_ref().and_then(|t| t.times.last().copied()),
                    c.scaling.as_ref().and_then(|t| t.times.last().copied()),
                ]
            })
            .flatten()
            .fold(0.0f32, f32::max);

        Self {
            name,
            ticks_per_second,
            duration_ticks,
            channels,
        }
    }

    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        if self.ticks_per_second > 0.0 {
            self.duration_ticks / self.ticks_per_second
        } else {
            0.0
        }
    }

    /// Maps elapsed seconds to ticks, wrapping at the clip's duration
    /// (§4.2 step 4: "elapsed time ... modulo duration * ticks-per-second").
    #[must_use]
    pub fn ticks_for_elapsed(&self, elapsed_seconds: f32) -> f32 {
        if self.duration_ticks <= 0.0 {
            return 0.0;
        }
        let t = elapsed_seconds * self.ticks_per_second;
        t.rem_euclid(self.duration_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::tracks::InterpolationMode;

    #[test]
    fn duration_is_derived_from_longest_channel() {
        let mut channel = NodeChannel::new(0);
        channel.rotation = Some(KeyframeTrack::new(
            vec![0.0, 1.0],
            vec![Quat::IDENTITY, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)],
            InterpolationMode::Linear,
        ));
        let clip = AnimationClip::new("spin".into(), 24.0, vec![channel]);
        assert_eq!(clip.duration_ticks, 1.0);
        assert!((clip.duration_seconds() - 1.0 / 24.0).abs() < 1e-6);
    }

    #[test]
    fn ticks_for_elapsed_wraps() {
        let channel = NodeChannel::new(0);
        let mut clip = AnimationClip::new("c".into(), 1.0, vec![channel]);
        clip.duration_ticks = 2.0;
        assert!((clip.ticks_for_elapsed(2.5) - 0.5).abs() < 1e-6);
    }
}
