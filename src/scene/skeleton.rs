//! Skeleton and bones (§3.1, §4.6).

use glam::{Affine3A, Mat4};

/// One node in the scene's node hierarchy, as referenced by a skeleton.
#[derive(Debug, Clone, Copy)]
pub struct SkeletonNode {
    pub parent: Option<u32>,
    pub bind_local_transform: Affine3A,
}

/// A bone: an offset (inverse-bind) matrix plus the index of the skeleton
/// node it rides on (§3.1).
#[derive(Debug, Clone, Copy)]
pub struct Bone {
    pub skeleton_node_index: u32,
    pub offset_matrix: Affine3A,
}

#[derive(Debug, Clone)]
pub struct Skeleton {
    pub nodes: Vec<SkeletonNode>,
    pub bones: Vec<Bone>,
    pub root_node_index: u32,
}

impl Skeleton {
    /// Multiplies local transforms down the hierarchy to get world-space
    /// node matrices (§4.6 "Skeleton pose"). `local_transforms` has one
    /// entry per node; nodes without a sampled channel use
    /// `bind_local_transform` (the caller is expected to have already
    /// substituted that fallback — see [`crate::animation`]).
    #[must_use]
    pub fn compute_world_transforms(&self, local_transforms: &[Affine3A]) -> Vec<Affine3A> {
        debug_assert_eq!(local_transforms.len(), self.nodes.len());
        let mut world = vec![Affine3A::IDENTITY; self.nodes.len()];
        // Nodes are expected to be stored parent-before-child; compute in
        // order so each parent's world transform is ready when its
        // children are processed.
        for (i, node) in self.nodes.iter().enumerate() {
            world[i] = match node.parent {
                Some(p) => world[p as usize] * local_transforms[i],
                None => local_transforms[i],
            };
        }
        world
    }

    /// §4.6 "Bone matrices": `bone_matrix[b] = node_world[b.node] * b.offset`.
    #[must_use]
    pub fn compute_bone_matrices(&self, world_transforms: &[Affine3A]) -> Vec<Mat4> {
        self.bones
            .iter()
            .map(|bone| Mat4::from(world_transforms[bone.skeleton_node_index as usize] * bone.offset_matrix))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn two_bone_chain_world_transforms_compose() {
        let skeleton = Skeleton {
            nodes: vec![
                SkeletonNode {
                    parent: None,
                    bind_local_transform: Affine3A::IDENTITY,
                },
                SkeletonNode {
                    parent: Some(0),
                    bind_local_transform: Affine3A::from_translation(Vec3::new(1.0, 0.0, 0.0)),
                },
            ],
            bones: vec![
                Bone {
                    skeleton_node_index: 0,
                    offset_matrix: Affine3A::IDENTITY,
                },
                Bone {
                    skeleton_node_index: 1,
                    offset_matrix: Affine3A::IDENTITY,
                },
            ],
            root_node_index: 0,
        };

        let locals = vec![
            Affine3A::from_translation(Vec3::new(0.0, 1.0, 0.0)),
            Affine3A::from_translation(Vec3::new(1.0, 0.0, 0.0)),
        ];
        let world = skeleton.compute_world_transforms(&locals);
        assert_eq!(world[1].translation, Vec3::new(1.0, 1.0, 0.0).into());

        let bones = skeleton.compute_bone_matrices(&world);
        assert_eq!(bones.len(), 2);
    }
}
