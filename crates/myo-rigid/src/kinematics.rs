//! Forward kinematics — compute world transforms of every segment.

use myo_math::SpatialTransform;
use myo_model::{GeneralizedCoordinates, Model};

/// Compute forward kinematics: world→segment transforms for every segment.
///
/// In the returned transforms, `rot` maps world coordinates into the segment
/// frame and `pos` is the segment origin expressed in world coordinates, so
/// [`SpatialTransform::transform_point`] takes segment-local points to world.
pub fn forward_kinematics(model: &Model, q: &GeneralizedCoordinates) -> Vec<SpatialTransform> {
    let ns = model.nsegments();
    let mut x_world = vec![SpatialTransform::identity(); ns];

    for i in 0..ns {
        let segment = &model.segments[i];
        let joint = &model.joints[segment.joint_idx];
        let q_idx = model.q_offsets[segment.joint_idx];
        let ndof = joint.ndof();

        // x_tree: parent → segment (Plücker transform)
        let x_joint = joint.joint_transform(&q.as_slice()[q_idx..q_idx + ndof]);
        let x_tree = x_joint.compose(&joint.parent_to_joint);

        if segment.parent < 0 {
            x_world[i] = x_tree;
        } else {
            // world → segment_i = (parent → segment_i) after (world → parent)
            x_world[i] = x_tree.compose(&x_world[segment.parent as usize]);
        }
    }

    x_world
}
