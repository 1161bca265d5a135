//! CPU-side generators for the built-in default meshes (§4.1
//! "holder of built-in default resources... cube/plane/sphere meshes").
//! Output feeds straight into [`crate::resources::mesh_pool::GpuMeshPool`].

use super::mesh_pool::Vertex;

/// Unit cube centered at the origin, edge length 1.
#[must_use]
pub fn unit_cube() -> (Vec<Vertex>, Vec<u32>) {
    const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [[-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5]]),
        ([0.0, 0.0, -1.0], [[0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5]]),
        ([1.0, 0.0, 0.0], [[0.5, -0.5, 0.5], [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5]]),
        ([-1.0, 0.0, 0.0], [[-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5]]),
        ([0.0, 1.0, 0.0], [[-0.5, 0.5, 0.5], [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5]]),
        ([0.0, -1.0, 0.0], [[-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5]]),
    ];
    const UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in FACES {
        let base = vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(UVS) {
            vertices.push(Vertex { position: *corner, normal, uv });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    (vertices, indices)
}

/// Unit plane (1x1) on the XZ plane, facing +Y.
#[must_use]
pub fn unit_plane() -> (Vec<Vertex>, Vec<u32>) {
    let vertices = vec![
        Vertex { position: [-0.5, 0.0, -0.5], normal: [0.0, 1.0, 0.0], uv: [0.0, 0.0] },
        Vertex { position: [0.5, 0.0, -0.5], normal: [0.0, 1.0, 0.0], uv: [1.0, 0.0] },
        Vertex { position: [0.5, 0.0, 0.5], normal: [0.0, 1.0, 0.0], uv: [1.0, 1.0] },
        Vertex { position: [-0.5, 0.0, 0.5], normal: [0.0, 1.0, 0.0], uv: [0.0, 1.0] },
    ];
    (vertices, vec![0, 1, 2, 0, 2, 3])
}

/// Unit-radius UV sphere, grounded on the standard latitude/longitude
/// tessellation (coarse enough to stay a default placeholder, not an
/// asset-quality mesh).
#[must_use]
pub fn unit_sphere() -> (Vec<Vertex>, Vec<u32>) {
    const STACKS: u32 = 12;
    const SLICES: u32 = 16;

    let mut vertices = Vec::with_capacity(((STACKS + 1) * (SLICES + 1)) as usize);
    for stack in 0..=STACKS {
        let phi = std::f32::consts::PI * stack as f32 / STACKS as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for slice in 0..=SLICES {
            let theta = 2.0 * std::f32::consts::PI * slice as f32 / SLICES as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let normal = [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta];
            vertices.push(Vertex {
                position: [normal[0] * 0.5, normal[1] * 0.5, normal[2] * 0.5],
                normal,
                uv: [slice as f32 / SLICES as f32, stack as f32 / STACKS as f32],
            });
        }
    }

    let mut indices = Vec::new();
    let row = SLICES + 1;
    for stack in 0..STACKS {
        for slice in 0..SLICES {
            let a = stack * row + slice;
            let b = a + row;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    (vertices, indices)
}
