//! Render Settings Configuration
//!
//! Runtime-mutable, sticky across frames, sampled into the [`crate::FramePacket`]
//! at extraction (§4.2 step 5, §6.4).

/// MSAA sample count for the main color/depth targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MsaaMode {
    #[default]
    Off,
    X2,
    X4,
    X8,
}

impl MsaaMode {
    #[must_use]
    pub fn sample_count(self) -> u32 {
        match self {
            MsaaMode::Off => 1,
            MsaaMode::X2 => 2,
            MsaaMode::X4 => 4,
            MsaaMode::X8 => 8,
        }
    }
}

/// Precision of the HDR scene-color target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorPrecision {
    /// `Rg11b10Float` — half the bandwidth of `Rgba16Float`, no alpha.
    #[default]
    Imprecise,
    /// `Rgba16Float`.
    Precise,
}

impl ColorPrecision {
    #[must_use]
    pub fn texture_format(self) -> wgpu::TextureFormat {
        match self {
            ColorPrecision::Imprecise => wgpu::TextureFormat::Rg11b10Ufloat,
            ColorPrecision::Precise => wgpu::TextureFormat::Rgba16Float,
        }
    }
}

/// Shadow filtering kernel applied when sampling a shadow map (§6.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowFiltering {
    None,
    HardwarePcf,
    #[default]
    Pcf3x3,
    PcfTent3x3,
    PcfTent5x5,
}

/// SSAO parameters (§6.4, §4.5 step 4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SsaoSettings {
    pub enabled: bool,
    pub radius: f32,
    pub bias: f32,
    pub power: f32,
    /// Hemisphere kernel sample count, clamped to `[1, 64]`.
    pub sample_count: u32,
}

impl Default for SsaoSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 0.5,
            bias: 0.025,
            power: 1.5,
            sample_count: 16,
        }
    }
}

/// Cascaded-shadow-map parameters (§4.4.1, §6.4).
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowSettings {
    pub shadow_distance: f32,
    /// `1..=4`.
    pub cascade_count: u32,
    /// Strictly increasing, length `cascade_count - 1`, values in `(0, 1)`.
    pub normalized_cascade_splits: Vec<f32>,
    pub filtering: ShadowFiltering,
    pub visualize_cascades: bool,
    /// Resolution of one cascade slice / the punctual atlas edge.
    pub cascade_resolution: u32,
    pub atlas_resolution: u32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            shadow_distance: 100.0,
            cascade_count: 4,
            normalized_cascade_splits: vec![0.067, 0.2, 0.467],
            filtering: ShadowFiltering::Pcf3x3,
            visualize_cascades: false,
            cascade_resolution: 2048,
            atlas_resolution: 4096,
        }
    }
}

impl ShadowSettings {
    /// Validates the invariant from spec §3.1 / §8.1 property 6: the split
    /// array is strictly increasing, length `cascade_count - 1`, values in
    /// `(0, 1)`.
    #[must_use]
    pub fn splits_valid(&self) -> bool {
        if self.cascade_count == 0 || self.cascade_count > crate::MAX_CASCADE_COUNT {
            return false;
        }
        if self.normalized_cascade_splits.len() != (self.cascade_count - 1) as usize {
            return false;
        }
        let mut prev = 0.0f32;
        for &s in &self.normalized_cascade_splits {
            if !(s > prev && s < 1.0) {
                return false;
            }
            prev = s;
        }
        true
    }
}

/// Top-level render settings, sampled whole into every frame packet.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// If `false`, skip intermediate HDR targets and post-process, drawing
    /// straight to the surface. Matches teacher's "straightforward mode".
    pub enable_hdr: bool,

    /// Background clear color for the main render target.
    pub clear_color: wgpu::Color,

    pub vsync: bool,
    pub sync_interval: u32,

    pub msaa: MsaaMode,
    pub color_precision: ColorPrecision,

    /// Whether the depth-normal pre-pass (§4.5 step 2) runs.
    pub depth_normal_prepass: bool,

    pub ssao: SsaoSettings,
    pub shadow: ShadowSettings,

    /// Inverse-gamma exponent applied in post (§4.5 step 8, §6.4).
    pub gamma: f32,

    pub power_preference: wgpu::PowerPreference,
    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,
    pub depth_format: wgpu::TextureFormat,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            enable_hdr: true,
            clear_color: wgpu::Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
            vsync: true,
            sync_interval: 1,
            msaa: MsaaMode::default(),
            color_precision: ColorPrecision::default(),
            depth_normal_prepass: false,
            ssao: SsaoSettings::default(),
            shadow: ShadowSettings::default(),
            gamma: 2.2,
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            depth_format: wgpu::TextureFormat::Depth32Float,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_splits_are_valid() {
        assert!(ShadowSettings::default().splits_valid());
    }

    #[test]
    fn non_increasing_splits_are_rejected() {
        let mut s = ShadowSettings::default();
        s.normalized_cascade_splits = vec![0.3, 0.2, 0.5];
        assert!(!s.splits_valid());
    }

    #[test]
    fn wrong_length_splits_are_rejected() {
        let mut s = ShadowSettings::default();
        s.cascade_count = 4;
        s.normalized_cascade_splits = vec![0.1, 0.2];
        assert!(!s.splits_valid());
    }
}
