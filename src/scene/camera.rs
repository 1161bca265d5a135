//! Camera and frustum (§3.1, §4.3).
//!
//! The renderer is reverse-Z throughout (§GLOSSARY): near maps to depth `1`,
//! far to depth `0`, depth test is `GREATER`.

use glam::{Mat4, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraKind {
    Perspective,
    Orthographic,
}

/// GPU-mirrored per-camera constants (§3.1, §6.3's "per-view constant
/// layout"). `#[repr(C)]` so it can be `bytemuck::cast`-uploaded directly.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderCamera {
    pub view: Mat4,
    pub projection: Mat4,
    pub view_projection: Mat4,
    pub position: Vec3,
    pub near: f32,
    pub _pad: Vec3,
    pub far: f32,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub kind: CameraKind,
    pub near: f32,
    pub far: f32,
    /// Vertical FOV in radians (perspective) or vertical half-size in world
    /// units (orthographic).
    pub fov_y_or_ortho_size: f32,
    pub aspect_ratio: f32,
    /// Normalized viewport rect `(x, y, w, h)` in `[0, 1]`.
    pub viewport: (f32, f32, f32, f32),

    view: Mat4,
    projection: Mat4,
    view_projection: Mat4,
    position: Vec3,
}

impl Camera {
    #[must_use]
    pub fn new_perspective(fov_y_radians: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            kind: CameraKind::Perspective,
            near,
            far,
            fov_y_or_ortho_size: fov_y_radians,
            aspect_ratio,
            viewport: (0.0, 0.0, 1.0, 1.0),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            position: Vec3::ZERO,
        };
        cam.update_projection_matrix();
        cam
    }

    #[must_use]
    pub fn new_orthographic(half_height: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            kind: CameraKind::Orthographic,
            near,
            far,
            fov_y_or_ortho_size: half_height,
            aspect_ratio,
            viewport: (0.0, 0.0, 1.0, 1.0),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            view_projection: Mat4::IDENTITY,
            position: Vec3::ZERO,
        };
        cam.update_projection_matrix();
        cam
    }

    /// Rebuilds the projection matrix. Perspective cameras use an
    /// infinite-far reverse-Z projection; orthographic cameras use a
    /// reverse-Z-mapped (near->1, far->0) orthographic projection.
    pub fn update_projection_matrix(&mut self) {
        self.projection = match self.kind {
            CameraKind::Perspective => {
                if self.far.is_finite() {
                    reverse_z_perspective(self.fov_y_or_ortho_size, self.aspect_ratio, self.near, self.far)
                } else {
                    Mat4::perspective_infinite_reverse_rh(
                        self.fov_y_or_ortho_size,
                        self.aspect_ratio,
                        self.near,
                    )
                }
            }
            CameraKind::Orthographic => {
                let h = self.fov_y_or_ortho_size;
                let w = h * self.aspect_ratio;
                reverse_z_orthographic(-w, w, -h, h, self.near, self.far)
            }
        };
    }

    pub fn update_view_projection(&mut self, world_from_camera: &glam::Affine3A) {
        self.view = Mat4::from(world_from_camera.inverse());
        self.position = world_from_camera.translation.into();
        self.view_projection = self.projection * self.view;
    }

    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    #[must_use]
    pub fn extract_render_camera(&self) -> RenderCamera {
        RenderCamera {
            view: self.view,
            projection: self.projection,
            view_projection: self.view_projection,
            position: self.position,
            near: self.near,
            _pad: Vec3::ZERO,
            far: if self.far.is_finite() { self.far } else { f32::INFINITY },
        }
    }
}

fn reverse_z_perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    // Standard RH perspective with near/far swapped in the depth terms.
    let f = 1.0 / (fov_y * 0.5).tan();
    let a = near / (far - near);
    let b = near * far / (far - near);
    Mat4::from_cols(
        Vec4::new(f / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, f, 0.0, 0.0),
        Vec4::new(0.0, 0.0, a, -1.0),
        Vec4::new(0.0, 0.0, b, 0.0),
    )
}

fn reverse_z_orthographic(l: f32, r: f32, b: f32, t: f32, near: f32, far: f32) -> Mat4 {
    let standard = Mat4::orthographic_rh(l, r, b, t, near, far);
    // orthographic_rh maps near->-1, far->1 in most glam builds' NDC depth
    // range (0..1 for wgpu); flip the depth row/translation to reverse it.
    let flip_z = Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, -1.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 1.0),
    );
    flip_z * standard
}

/// Six outward-facing clip planes `(a, b, c, d)` satisfying
/// `a*x + b*y + c*z + d >= 0` inside the frustum, plus min/max Z bookkeeping
/// for shadow casters that lie outside the visible slice but behind it.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Gribb-Hartmann plane extraction from a view-projection matrix. With
    /// an infinite-far reverse-Z projection the far plane row is degenerate
    /// (all zero) by construction; such a plane is replaced with an
    /// always-true plane rather than a spurious clip.
    #[must_use]
    pub fn from_matrix(vp: &Mat4) -> Self {
        let m = vp.to_cols_array_2d(); // m[col][row]
        let row = |r: usize| Vec4::new(m[0][r], m[1][r], m[2][r], m[3][r]);
        let row0 = row(0);
        let row1 = row(1);
        let row2 = row(2);
        let row3 = row(3);

        let mut planes = [
            row3 + row0, // left
            row3 - row0, // right
            row3 + row1, // bottom
            row3 - row1, // top
            row2,        // near (reverse-Z: near plane is w=z, i.e. row2 alone)
            row3 - row2, // far
        ];

        for p in &mut planes {
            let len = Vec3::new(p.x, p.y, p.z).length();
            if len > 1e-8 {
                *p /= len;
            } else {
                // Degenerate far plane under infinite-far reverse-Z: replace
                // with an always-satisfied plane.
                *p = Vec4::new(0.0, 0.0, 0.0, 1.0);
            }
        }

        Self { planes }
    }

    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        for plane in &self.planes {
            let dist = plane.x * center.x + plane.y * center.y + plane.z * center.z + plane.w;
            if dist < -radius {
                return false;
            }
        }
        true
    }

    #[must_use]
    pub fn intersects_box(&self, min: Vec3, max: Vec3) -> bool {
        for plane in &self.planes {
            let normal = Vec3::new(plane.x, plane.y, plane.z);
            // Positive vertex: the AABB corner furthest along the plane
            // normal's direction.
            let p = Vec3::new(
                if normal.x >= 0.0 { max.x } else { min.x },
                if normal.y >= 0.0 { max.y } else { min.y },
                if normal.z >= 0.0 { max.z } else { min.z },
            );
            if normal.dot(p) + plane.w < 0.0 {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_fully_outside_frustum_does_not_intersect() {
        let mut cam = Camera::new_perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        cam.update_view_projection(&glam::Affine3A::IDENTITY);
        let frustum = Frustum::from_matrix(&cam.view_projection());
        assert!(!frustum.intersects_box(Vec3::new(-1000.0, -1.0, -1.0), Vec3::new(-900.0, 1.0, 1.0)));
    }

    #[test]
    fn sphere_at_origin_ahead_of_camera_intersects() {
        let mut cam = Camera::new_perspective(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);
        let world = glam::Affine3A::from_translation(Vec3::new(0.0, 0.0, 5.0));
        cam.update_view_projection(&world);
        let frustum = Frustum::from_matrix(&cam.view_projection());
        assert!(frustum.intersects_sphere(Vec3::ZERO, 1.0));
    }
}
