//! Punctual shadow atlas (§4.4, §4.4.2).
//!
//! A single square depth texture partitioned into a 2-level quadtree: one
//! quadrant holds a single full-quadrant cell, the next holds 2 cells, the
//! next 4, the next 8 — giving four cell sizes (1x, ½x, ¼x, ⅛x of the
//! atlas half-edge). No direct teacher precedent exists for this (point/
//! spot shadows are "future" there); see DESIGN.md for the grounding note
//! and the importance-metric constants, which §9 flags as implementer's
//! choice.

use crate::MAX_PER_LIGHT_SHADOW_MAP_COUNT;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CellTier {
    /// 1 cell, size = atlas half-edge.
    Full,
    /// 2 cells, size = ½ atlas half-edge.
    Half,
    /// 4 cells, size = ¼ atlas half-edge.
    Quarter,
    /// 8 cells, size = ⅛ atlas half-edge.
    Eighth,
}

impl CellTier {
    const ALL: [CellTier; 4] = [CellTier::Full, CellTier::Half, CellTier::Quarter, CellTier::Eighth];

    #[must_use]
    fn cell_count(self) -> usize {
        match self {
            CellTier::Full => 1,
            CellTier::Half => 2,
            CellTier::Quarter => 4,
            CellTier::Eighth => 8,
        }
    }

    /// Importance threshold above which a light is assigned this tier
    /// (§9's "screen-space importance" metric; constants pinned in
    /// DESIGN.md since the source left them ambiguous).
    #[must_use]
    fn importance_threshold(self) -> f32 {
        match self {
            CellTier::Full => 0.5,
            CellTier::Half => 0.25,
            CellTier::Quarter => 0.125,
            CellTier::Eighth => 0.0,
        }
    }

    #[must_use]
    fn for_importance(importance: f32) -> Self {
        Self::ALL
            .into_iter()
            .find(|&tier| importance >= tier.importance_threshold())
            .unwrap_or(CellTier::Eighth)
    }
}

/// One allocated rectangle in atlas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl CellRect {
    #[must_use]
    pub fn viewport(self) -> (f32, f32, f32, f32) {
        (self.x as f32, self.y as f32, self.size as f32, self.size as f32)
    }
}

/// Cells assigned to one light this frame: one per cube face for point
/// lights (up to [`MAX_PER_LIGHT_SHADOW_MAP_COUNT`]), or a single cell for
/// a spot light.
#[derive(Debug, Clone)]
pub struct AtlasAllocation {
    pub light_index: u32,
    pub cells: SmallVec<[CellRect; MAX_PER_LIGHT_SHADOW_MAP_COUNT]>,
}

fn tier_cells(resolution: u32, tier: CellTier) -> Vec<CellRect> {
    let half_edge = resolution / 2;
    let size = match tier {
        CellTier::Full => half_edge,
        CellTier::Half => half_edge / 2,
        CellTier::Quarter => half_edge / 4,
        CellTier::Eighth => half_edge / 8,
    };
    // Each tier owns one quadrant of the atlas (top-left, top-right,
    // bottom-left, bottom-right respectively); cells are packed
    // left-to-right, then top-to-bottom within that quadrant (§4.4.2 step 2).
    let (quadrant_x, quadrant_y) = match tier {
        CellTier::Full => (0, 0),
        CellTier::Half => (half_edge, 0),
        CellTier::Quarter => (0, half_edge),
        CellTier::Eighth => (half_edge, half_edge),
    };
    let cells_per_row = (half_edge / size.max(1)).max(1);
    (0..tier.cell_count() as u32)
        .map(|i| {
            let col = i % cells_per_row;
            let row = i / cells_per_row;
            CellRect {
                x: quadrant_x + col * size,
                y: quadrant_y + row * size,
                size,
            }
        })
        .collect()
}

pub struct PunctualShadowAtlas {
    resolution: u32,
}

impl PunctualShadowAtlas {
    #[must_use]
    pub fn new(resolution: u32) -> Self {
        Self { resolution }
    }

    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Assigns cells to every shadow-casting visible light, by descending
    /// importance, up to `face_count` cells each (6 for point lights sharing
    /// faces, 1 for spot). Lights that don't fit are dropped (the caller is
    /// responsible for marking them unshadowed, §4.4.2 step 4).
    ///
    /// `lights` is `(light_index, importance, face_count)`.
    #[must_use]
    pub fn allocate_frame(&mut self, mut lights: Vec<(u32, f32, u32)>) -> Vec<AtlasAllocation> {
        lights.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        // Re-seed free lists fresh each frame: the atlas assignment is
        // fully recomputed every frame rather than persisted, since light
        // importance (camera distance) changes continuously.
        let mut pools: FxHashMap<CellTier, Vec<CellRect>> = CellTier::ALL
            .into_iter()
            .map(|tier| (tier, tier_cells(self.resolution, tier)))
            .collect();

        let mut allocations = Vec::new();
        for (light_index, importance, face_count) in lights {
            let tier = CellTier::for_importance(importance);
            let face_count = face_count.min(MAX_PER_LIGHT_SHADOW_MAP_COUNT as u32).max(1);
            let pool = pools.get_mut(&tier).expect("all tiers seeded");
            if (pool.len() as u32) < face_count {
                continue; // doesn't fit; dropped from shadow set
            }
            let cells: SmallVec<[CellRect; MAX_PER_LIGHT_SHADOW_MAP_COUNT]> =
                pool.drain(..face_count as usize).collect();
            allocations.push(AtlasAllocation { light_index, cells });
        }
        allocations
    }
}

/// §4.4.2 step 1: screen-space importance from bounding-sphere radius and
/// camera distance. `base_weight` differentiates point (6 faces competing
/// for budget) from spot (1 face) lights, per DESIGN.md's pinned constants.
#[must_use]
pub fn compute_importance(bounding_sphere_radius: f32, distance_to_camera: f32, base_weight: f32) -> f32 {
    if distance_to_camera <= f32::EPSILON {
        return base_weight;
    }
    (bounding_sphere_radius / distance_to_camera * base_weight).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_cell_count_is_fifteen() {
        let total: usize = CellTier::ALL.iter().map(|&tier| tier_cells(4096, tier).len()).sum();
        assert_eq!(total, 1 + 2 + 4 + 8);
    }

    #[test]
    fn no_cell_is_assigned_to_more_than_one_light() {
        let mut atlas = PunctualShadowAtlas::new(4096);
        // 10 spot lights, varying importance, matching S5.
        let lights: Vec<(u32, f32, u32)> = (0..10)
            .map(|i| (i, 1.0 - i as f32 * 0.08, 1))
            .collect();
        let allocations = atlas.allocate_frame(lights);

        let mut seen = std::collections::HashSet::new();
        for alloc in &allocations {
            for cell in &alloc.cells {
                let key = (cell.x, cell.y, cell.size);
                assert!(seen.insert(key), "cell {key:?} assigned twice");
            }
        }
    }

    #[test]
    fn highest_importance_lights_get_largest_cells() {
        let mut atlas = PunctualShadowAtlas::new(4096);
        let lights = vec![(0u32, 1.0f32, 1u32), (1u32, 0.01f32, 1u32)];
        let allocations = atlas.allocate_frame(lights);
        let best = allocations.iter().find(|a| a.light_index == 0).unwrap();
        let worst = allocations.iter().find(|a| a.light_index == 1).unwrap();
        assert!(best.cells[0].size > worst.cells[0].size);
    }

    #[test]
    fn excess_lights_are_dropped_not_crashed() {
        let mut atlas = PunctualShadowAtlas::new(4096);
        // 20 point lights (6 faces each = 120 cells) vastly exceeds the
        // 15-cell budget; most should be dropped.
        let lights: Vec<(u32, f32, u32)> = (0..20).map(|i| (i, 0.9, 6)).collect();
        let allocations = atlas.allocate_frame(lights);
        assert!(allocations.len() < 20);
    }
}
