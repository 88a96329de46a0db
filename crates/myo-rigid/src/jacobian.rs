//! Positional Jacobians of segment-fixed points.

use myo_math::{DMat, SpatialTransform, Vec3};
use myo_model::{JointType, Model};

/// Compute the 3×nv positional Jacobian of a point rigidly attached to a
/// segment, at the pose described by `x_world` (see
/// [`forward_kinematics`](crate::forward_kinematics)).
///
/// Columns are filled by walking the ancestor chain: a revolute joint j with
/// world axis a and anchor o contributes a × (p − o), a prismatic joint
/// contributes a; all other columns are zero.
pub fn point_jacobian(
    model: &Model,
    x_world: &[SpatialTransform],
    segment: usize,
    point_local: &Vec3,
) -> DMat {
    assert!(
        segment < model.nsegments(),
        "segment index {} out of range ({} segments)",
        segment,
        model.nsegments()
    );

    let p_world = x_world[segment].transform_point(point_local);
    let mut jac = DMat::zeros(3, model.nv);

    let mut i = segment as i32;
    while i >= 0 {
        let seg = &model.segments[i as usize];
        let joint = &model.joints[seg.joint_idx];
        let v_idx = model.v_offsets[seg.joint_idx];

        // The joint axis is fixed in the joint/segment frame (invariant under
        // the joint's own motion), so the segment's world rotation maps it out.
        match joint.joint_type {
            JointType::Revolute => {
                let a_world = x_world[i as usize].rot.transpose() * joint.axis;
                let anchor = x_world[i as usize].pos;
                let col = a_world.cross(&(p_world - anchor));
                for r in 0..3 {
                    jac[(r, v_idx)] = col[r];
                }
            }
            JointType::Prismatic => {
                let a_world = x_world[i as usize].rot.transpose() * joint.axis;
                for r in 0..3 {
                    jac[(r, v_idx)] = a_world[r];
                }
            }
            JointType::Fixed => {}
        }

        i = seg.parent;
    }

    jac
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forward_kinematics;
    use approx::assert_relative_eq;
    use myo_math::{DVec, SpatialInertia};
    use myo_model::ModelBuilder;

    fn planar_two_link() -> Model {
        ModelBuilder::new()
            .add_revolute_segment(
                "upper",
                -1,
                SpatialTransform::identity(),
                SpatialInertia::rod(1.0, 0.3),
            )
            .add_revolute_segment(
                "lower",
                0,
                SpatialTransform::translation(Vec3::new(0.0, -0.3, 0.0)),
                SpatialInertia::rod(1.0, 0.25),
            )
            .build()
    }

    #[test]
    fn single_revolute_jacobian_is_tangent() {
        let model = ModelBuilder::new()
            .add_revolute_segment(
                "arm",
                -1,
                SpatialTransform::identity(),
                SpatialInertia::rod(1.0, 0.3),
            )
            .build();
        let xf = forward_kinematics(&model, &model.zero_q());
        let jac = point_jacobian(&model, &xf, 0, &Vec3::new(1.0, 0.0, 0.0));
        // z × (1,0,0) = (0,1,0)
        assert_relative_eq!(jac[(0, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(jac[(1, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(jac[(2, 0)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn jacobian_matches_finite_differences() {
        let model = planar_two_link();
        let p_local = Vec3::new(0.05, -0.2, 0.0);
        let q0 = DVec::from_vec(vec![0.4, -0.7]);

        let xf = forward_kinematics(&model, &q0);
        let jac = point_jacobian(&model, &xf, 1, &p_local);

        let h = 1e-7;
        for j in 0..model.nv {
            let mut qp = q0.clone();
            let mut qm = q0.clone();
            qp[j] += h;
            qm[j] -= h;
            let pp = forward_kinematics(&model, &qp)[1].transform_point(&p_local);
            let pm = forward_kinematics(&model, &qm)[1].transform_point(&p_local);
            for r in 0..3 {
                let fd = (pp[r] - pm[r]) / (2.0 * h);
                assert_relative_eq!(jac[(r, j)], fd, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn prismatic_column_is_the_world_axis() {
        let model = ModelBuilder::new()
            .add_prismatic_segment(
                "slider",
                -1,
                SpatialTransform::identity(),
                Vec3::new(0.0, 1.0, 0.0),
                SpatialInertia::point_mass(1.0, Vec3::zeros()),
            )
            .build();
        let xf = forward_kinematics(&model, &model.zero_q());
        let jac = point_jacobian(&model, &xf, 0, &Vec3::new(0.3, 0.1, 0.0));
        assert_relative_eq!(jac[(0, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(jac[(1, 0)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(jac[(2, 0)], 0.0, epsilon = 1e-12);
    }
}
