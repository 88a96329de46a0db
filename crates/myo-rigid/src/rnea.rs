//! Recursive Newton-Euler Algorithm (RNEA) — inverse dynamics.
//!
//! Given (q, qdot, qddot), compute the required joint torques.

use myo_math::{DVec, SpatialTransform, SpatialVec, Vec3};
use myo_model::{GeneralizedCoordinates, GeneralizedVelocity, Model};

/// Run RNEA: compute the inverse dynamics torques, gravity included.
///
/// Given a pose (q, qdot) and desired accelerations `qddot`, returns the
/// generalized torques needed to realize them.
pub fn rnea(
    model: &Model,
    q: &GeneralizedCoordinates,
    qdot: &GeneralizedVelocity,
    qddot: &DVec,
) -> DVec {
    rnea_with_gravity(model, q, qdot, qddot, true)
}

/// RNEA with gravity optionally disabled (used for mass matrix assembly).
pub(crate) fn rnea_with_gravity(
    model: &Model,
    q: &GeneralizedCoordinates,
    qdot: &GeneralizedVelocity,
    qddot: &DVec,
    with_gravity: bool,
) -> DVec {
    let ns = model.nsegments();
    let mut tau = DVec::zeros(model.nv);

    let mut x_tree = vec![SpatialTransform::identity(); ns];
    let mut vel = vec![SpatialVec::zero(); ns];
    let mut acc = vec![SpatialVec::zero(); ns];

    // Fictitious base acceleration −g stands in for the gravity field.
    let a0 = if with_gravity {
        SpatialVec::new(Vec3::zeros(), -model.gravity)
    } else {
        SpatialVec::zero()
    };

    // ── Forward pass: velocities and accelerations ──
    for i in 0..ns {
        let segment = &model.segments[i];
        let joint = &model.joints[segment.joint_idx];
        let q_idx = model.q_offsets[segment.joint_idx];
        let v_idx = model.v_offsets[segment.joint_idx];
        let ndof = joint.ndof();

        let x_joint = joint.joint_transform(&q.as_slice()[q_idx..q_idx + ndof]);
        x_tree[i] = x_joint.compose(&joint.parent_to_joint);

        let (v_joint, a_joint) = match joint.motion_subspace() {
            Some(s) => (s * qdot[v_idx], s * qddot[v_idx]),
            None => (SpatialVec::zero(), SpatialVec::zero()),
        };

        if segment.parent < 0 {
            vel[i] = v_joint;
            acc[i] = x_tree[i].apply_motion(&a0) + a_joint;
        } else {
            let pi = segment.parent as usize;
            let v_parent = x_tree[i].apply_motion(&vel[pi]);
            vel[i] = v_parent + v_joint;

            let a_parent = x_tree[i].apply_motion(&acc[pi]);
            acc[i] = a_parent + vel[i].cross_motion(&v_joint) + a_joint;
        }
    }

    // ── Backward pass: forces and torques ──
    let mut forces = vec![SpatialVec::zero(); ns];
    for i in 0..ns {
        let inertia = &model.segments[i].inertia;
        forces[i] = inertia.apply(&acc[i]) + vel[i].cross_force(&inertia.apply(&vel[i]));
    }

    for i in (0..ns).rev() {
        let segment = &model.segments[i];
        let joint = &model.joints[segment.joint_idx];
        let v_idx = model.v_offsets[segment.joint_idx];

        if let Some(s) = joint.motion_subspace() {
            tau[v_idx] = s.dot(&forces[i]);
        }

        if segment.parent >= 0 {
            let pi = segment.parent as usize;
            forces[pi] = forces[pi] + x_tree[i].inv_apply_force(&forces[i]);
        }
    }

    tau
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use myo_math::{GRAVITY, Mat3, SpatialInertia, SpatialTransform};
    use myo_model::ModelBuilder;

    /// Pendulum: revolute about Z, gravity along -Y, rod hangs in -Y at q=0.
    fn pendulum(mass: f64, length: f64) -> Model {
        ModelBuilder::new()
            .gravity(Vec3::new(0.0, -GRAVITY, 0.0))
            .add_revolute_segment(
                "pendulum",
                -1,
                SpatialTransform::identity(),
                SpatialInertia::new(
                    mass,
                    Vec3::new(0.0, -length / 2.0, 0.0),
                    Mat3::from_diagonal(&Vec3::new(
                        mass * length * length / 12.0,
                        0.0,
                        mass * length * length / 12.0,
                    )),
                ),
            )
            .build()
    }

    #[test]
    fn hanging_pendulum_needs_no_torque() {
        let model = pendulum(1.0, 1.0);
        let tau = rnea(&model, &model.zero_q(), &model.zero_qdot(), &model.zero_tau());
        assert_relative_eq!(tau[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn horizontal_pendulum_gravity_torque() {
        let mass = 1.0;
        let length = 1.0;
        let model = pendulum(mass, length);
        let mut q = model.zero_q();
        q[0] = std::f64::consts::FRAC_PI_2; // rod horizontal
        let tau = rnea(&model, &q, &model.zero_qdot(), &DVec::zeros(1));
        // Holding the rod horizontal requires m·g·L/2 about the pivot.
        assert_relative_eq!(tau[0].abs(), mass * GRAVITY * length / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn pure_inertia_torque_without_gravity() {
        let mass = 2.0;
        let length = 0.8;
        let model = pendulum(mass, length);
        let qdd = DVec::from_vec(vec![3.0]);
        let tau = rnea_with_gravity(&model, &model.zero_q(), &model.zero_qdot(), &qdd, false);
        // I about the pivot = mL²/3 for a uniform rod.
        let i_pivot = mass * length * length / 3.0;
        assert_relative_eq!(tau[0], i_pivot * 3.0, epsilon = 1e-9);
    }
}
