//! Animation sampling (§4.6).

pub mod clip;
pub mod tracks;

pub use clip::{AnimationClip, NodeChannel};
pub use tracks::{InterpolationMode, Interpolatable, KeyframeCursor, KeyframeTrack};
