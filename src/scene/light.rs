//! Lights (§3.1): polymorphic over directional / point / spot.

use glam::Vec3;

/// Shadow-casting parameters shared by all light kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowConfig {
    pub casts_shadow: bool,
    pub near_plane: f32,
    pub depth_bias: f32,
    pub normal_bias: f32,
    /// Directional-only: how far behind the visible cascade slice casters
    /// are still considered (§4.4.1 "bBoxNearOffset").
    pub shadow_extension: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            casts_shadow: false,
            near_plane: 0.05,
            depth_bias: 0.001,
            normal_bias: 0.01,
            shadow_extension: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub shadow: ShadowConfig,
}

#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: Vec3,
    pub range: f32,
    pub shadow: ShadowConfig,
}

#[derive(Debug, Clone, Copy)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub range: f32,
    /// `cos(inner_half_angle)`.
    pub inner_cone_cos: f32,
    /// `cos(outer_half_angle)`.
    pub outer_cone_cos: f32,
    pub shadow: ShadowConfig,
}

#[derive(Debug, Clone, Copy)]
pub enum LightKind {
    Directional(DirectionalLight),
    Point(PointLight),
    Spot(SpotLight),
}

#[derive(Debug, Clone, Copy)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
}

impl Light {
    #[must_use]
    pub fn new_directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional(DirectionalLight {
                direction: direction.normalize_or_zero(),
                shadow: ShadowConfig::default(),
            }),
            color,
            intensity,
        }
    }

    #[must_use]
    pub fn new_point(position: Vec3, range: f32, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point(PointLight {
                position,
                range,
                shadow: ShadowConfig::default(),
            }),
            color,
            intensity,
        }
    }

    #[must_use]
    pub fn new_spot(
        position: Vec3,
        direction: Vec3,
        range: f32,
        inner_half_angle: f32,
        outer_half_angle: f32,
        color: Vec3,
        intensity: f32,
    ) -> Self {
        Self {
            kind: LightKind::Spot(SpotLight {
                position,
                direction: direction.normalize_or_zero(),
                range,
                inner_cone_cos: inner_half_angle.cos(),
                outer_cone_cos: outer_half_angle.cos(),
                shadow: ShadowConfig::default(),
            }),
            color,
            intensity,
        }
    }

    #[must_use]
    pub fn casts_shadow(&self) -> bool {
        match self.kind {
            LightKind::Directional(d) => d.shadow.casts_shadow,
            LightKind::Point(p) => p.shadow.casts_shadow,
            LightKind::Spot(s) => s.shadow.casts_shadow,
        }
    }

    #[must_use]
    pub fn shadow(&self) -> ShadowConfig {
        match self.kind {
            LightKind::Directional(d) => d.shadow,
            LightKind::Point(p) => p.shadow,
            LightKind::Spot(s) => s.shadow,
        }
    }
}
