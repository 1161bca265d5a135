//! Shadow system (§4.4): cascaded directional shadow maps and a punctual
//! shadow atlas.

pub mod atlas;
pub mod cascade;

pub use atlas::{AtlasAllocation, CellTier, PunctualShadowAtlas};
pub use cascade::{build_cascade_views, compute_cascade_boundaries, CascadeView};
