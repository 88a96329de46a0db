//! Integration tests for the myo musculoskeletal library.

use approx::assert_relative_eq;
use myo::{
    DVec, ForceModel, Integrator, ModelBuilder, Muscle, MuscleCharacteristics, Muscles, PathPoint,
    RigidBodySolver, TreeSolver, Vec3,
    myo_math::{GRAVITY, Mat3, SpatialInertia, SpatialTransform},
};

fn rod_inertia(mass: f64, length: f64) -> SpatialInertia {
    SpatialInertia::new(
        mass,
        Vec3::new(0.0, -length / 2.0, 0.0),
        Mat3::from_diagonal(&Vec3::new(
            mass * length * length / 12.0,
            0.0,
            mass * length * length / 12.0,
        )),
    )
}

/// Planar two-segment arm: both joints revolute about Z, forearm hanging
/// 0.3 m below the shoulder.
fn arm_solver() -> TreeSolver {
    let model = ModelBuilder::new()
        .gravity(Vec3::new(0.0, -GRAVITY, 0.0))
        .add_revolute_segment(
            "upper_arm",
            -1,
            SpatialTransform::identity(),
            rod_inertia(2.0, 0.3),
        )
        .add_revolute_segment(
            "forearm",
            0,
            SpatialTransform::translation(Vec3::new(0.0, -0.3, 0.0)),
            rod_inertia(1.5, 0.25),
        )
        .build();
    TreeSolver::new(model)
}

/// One flexor group with a two-point and a three-point muscle.
fn arm_muscles(solver: &TreeSolver) -> Muscles {
    let upper = solver.segment_id("upper_arm").unwrap();
    let fore = solver.segment_id("forearm").unwrap();

    let mut muscles = Muscles::new();
    let gid = muscles
        .add_muscle_group("flexors", "upper_arm", "forearm")
        .unwrap();
    let group = muscles.muscle_group_mut(gid);
    group.add_muscle(Muscle::new(
        "brachialis",
        vec![
            PathPoint::new("origin", upper, Vec3::new(0.01, -0.12, 0.0)),
            PathPoint::new("insertion", fore, Vec3::new(0.01, -0.04, 0.0)),
        ],
        MuscleCharacteristics::new(0.12, 400.0),
        ForceModel::Idealized,
    ));
    group.add_muscle(Muscle::new(
        "biceps",
        vec![
            PathPoint::new("origin", upper, Vec3::new(0.02, -0.02, 0.0)),
            PathPoint::new("via", upper, Vec3::new(0.03, -0.25, 0.01)),
            PathPoint::new("insertion", fore, Vec3::new(0.015, -0.06, 0.0)),
        ],
        MuscleCharacteristics::new(0.18, 600.0),
        ForceModel::Hill,
    ));
    muscles
}

#[test]
fn torque_matches_finite_difference_jacobian() {
    let mut solver = arm_solver();
    let mut muscles = arm_muscles(&solver);

    let q = DVec::from_vec(vec![0.4, -0.8]);
    muscles.update_muscles(&mut solver, &q, true).unwrap();
    let jac = muscles.muscles_length_jacobian(&solver).unwrap();
    assert_eq!(jac.nrows(), 2);
    assert_eq!(jac.ncols(), 2);

    // Independently assemble the Jacobian by central differences on the
    // muscle lengths.
    let h = 1e-7;
    let mut jac_fd = myo::DMat::zeros(2, 2);
    for j in 0..2 {
        let mut qp = q.clone();
        let mut qm = q.clone();
        qp[j] += h;
        qm[j] -= h;

        muscles.update_muscles(&mut solver, &qp, true).unwrap();
        let lp: Vec<f64> = muscles.muscles().map(|m| m.length().unwrap()).collect();
        muscles.update_muscles(&mut solver, &qm, true).unwrap();
        let lm: Vec<f64> = muscles.muscles().map(|m| m.length().unwrap()).collect();

        for i in 0..2 {
            jac_fd[(i, j)] = (lp[i] - lm[i]) / (2.0 * h);
        }
    }

    for i in 0..2 {
        for j in 0..2 {
            assert_relative_eq!(jac[(i, j)], jac_fd[(i, j)], epsilon = 1e-6);
        }
    }

    // τ = −Jᵀ·F against the finite-difference assembly.
    muscles.update_muscles(&mut solver, &q, true).unwrap();
    let f = DVec::from_vec(vec![35.0, 80.0]);
    let tau = muscles.muscular_joint_torque(&solver, &f).unwrap();
    let tau_fd = -(jac_fd.transpose() * &f);
    for j in 0..2 {
        assert_relative_eq!(tau[j], tau_fd[j], epsilon = 1e-5);
    }
}

#[test]
fn muscle_counts_sum_over_groups() {
    let solver = arm_solver();
    let mut muscles = arm_muscles(&solver);
    muscles
        .add_muscle_group("extensors", "upper_arm", "forearm")
        .unwrap();

    let total: usize = (0..muscles.nb_muscle_groups())
        .map(|i| muscles.muscle_group(i).nb_muscles())
        .sum();
    assert_eq!(muscles.nb_muscle_total(), total);
    assert_eq!(muscles.nb_muscles(), total);
}

#[test]
fn deep_copy_does_not_alias_geometry() {
    let mut solver = arm_solver();
    let mut original = arm_muscles(&solver);

    let q1 = DVec::from_vec(vec![0.2, -0.3]);
    original.update_muscles(&mut solver, &q1, true).unwrap();
    let length_before = original.muscle(0).length().unwrap();

    // Mutate the copy's geometry at a very different pose.
    let mut copy = original.clone();
    let q2 = DVec::from_vec(vec![1.2, 0.9]);
    copy.update_muscles(&mut solver, &q2, true).unwrap();

    assert_relative_eq!(
        original.muscle(0).length().unwrap(),
        length_before,
        epsilon = 0.0
    );
    assert!((copy.muscle(0).length().unwrap() - length_before).abs() > 1e-6);
}

#[test]
fn update_is_idempotent_at_fixed_pose() {
    let mut solver = arm_solver();
    let mut muscles = arm_muscles(&solver);
    let q = DVec::from_vec(vec![0.7, -0.1]);

    muscles.update_muscles(&mut solver, &q, true).unwrap();
    let first: Vec<Vec3> = muscles
        .muscles()
        .flat_map(|m| m.geometry().points_global().unwrap().to_vec())
        .collect();

    muscles.update_muscles(&mut solver, &q, true).unwrap();
    let second: Vec<Vec3> = muscles
        .muscles()
        .flat_map(|m| m.geometry().points_global().unwrap().to_vec())
        .collect();

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_relative_eq!(a, b, epsilon = 1e-15);
    }
}

#[test]
fn zero_torque_static_equilibrium() {
    // Single rotational DOF, no gravity component along the motion: Q must
    // come back unchanged over an arbitrary horizon.
    let model = ModelBuilder::new()
        .gravity(Vec3::zeros())
        .add_revolute_segment(
            "rotor",
            -1,
            SpatialTransform::identity(),
            rod_inertia(1.0, 0.5),
        )
        .build();
    let solver = TreeSolver::new(model);

    let q0 = DVec::from_vec(vec![0.7]);
    let mut integrator = Integrator::new(1e-3);
    integrator
        .integrate(&solver, &q0, &DVec::zeros(1), &DVec::zeros(1), 0.3, 1.7)
        .unwrap();

    let q_final = integrator.q_at(integrator.steps() - 1);
    assert_relative_eq!(q_final[0], q0[0], epsilon = 1e-12);
}

#[test]
fn two_point_muscle_length_against_hand_computation() {
    // Root segment rigidly attached with an identity transform; a single
    // revolute segment about Z carries the insertion point.
    let model = ModelBuilder::new()
        .add_fixed_segment(
            "torso",
            -1,
            SpatialTransform::identity(),
            SpatialInertia::point_mass(10.0, Vec3::zeros()),
        )
        .add_revolute_segment("arm", 0, SpatialTransform::identity(), rod_inertia(1.0, 0.3))
        .build();
    let mut solver = TreeSolver::new(model);

    let p0 = Vec3::new(0.10, 0.20, 0.0);
    let p1 = Vec3::new(0.15, -0.30, 0.0);
    let mut muscles = Muscles::new();
    let gid = muscles.add_muscle_group("G", "torso", "arm").unwrap();
    muscles.muscle_group_mut(gid).add_muscle(Muscle::new(
        "strap",
        vec![
            PathPoint::new("origin", 0, p0),
            PathPoint::new("insertion", 1, p1),
        ],
        MuscleCharacteristics::new(0.3, 100.0),
        ForceModel::Idealized,
    ));

    // Reference pose: both transforms are the identity, so the length is the
    // straight-line distance between the local coordinates.
    let q = solver.model().zero_q();
    muscles.update_muscles(&mut solver, &q, true).unwrap();
    assert_relative_eq!(
        muscles.muscle(0).length().unwrap(),
        (p1 - p0).norm(),
        epsilon = 1e-9
    );

    // Rotating the arm by θ about Z carries the insertion to Rz(θ)·p1.
    let theta = 0.37;
    let mut q2 = solver.model().zero_q();
    q2[0] = theta;
    muscles.update_muscles(&mut solver, &q2, true).unwrap();

    let (s, c) = theta.sin_cos();
    let p1_rotated = Vec3::new(c * p1.x - s * p1.y, s * p1.x + c * p1.y, 0.0);
    assert_relative_eq!(
        muscles.muscle(0).length().unwrap(),
        (p1_rotated - p0).norm(),
        epsilon = 1e-9
    );
}

#[test]
fn group_lookup_by_name_and_sentinel() {
    let mut muscles = Muscles::new();
    muscles.add_muscle_group("G1", "A", "B").unwrap();
    assert_eq!(muscles.muscle_group_id("G1"), 0);
    assert_eq!(muscles.muscle_group_id("unknown"), -1);
}

#[test]
fn state_driven_torque_end_to_end() {
    let mut solver = arm_solver();
    let mut muscles = arm_muscles(&solver);

    let q = DVec::from_vec(vec![0.3, -0.6]);
    let qdot = DVec::from_vec(vec![0.1, -0.2]);
    let mut states = muscles.state_set();
    for s in &mut states {
        s.activation = 0.5;
    }

    let tau = muscles
        .muscular_joint_torque_from_states_at(&mut solver, &states, &q, &qdot)
        .unwrap();
    assert_eq!(tau.len(), 2);

    // Same answer when forces are converted explicitly first.
    let forces = muscles.muscle_forces(&states).unwrap();
    let tau_explicit = muscles.muscular_joint_torque(&solver, &forces).unwrap();
    for j in 0..2 {
        assert_relative_eq!(tau[j], tau_explicit[j], epsilon = 1e-12);
    }

    // Flexor tension must load both joints.
    assert!(tau.iter().any(|t| t.abs() > 1e-6));
}

#[test]
fn pendulum_period_under_integration() {
    // Compound pendulum: expected period T = 2π√(I_pivot / (m g d)).
    let mass = 1.0;
    let length = 1.0;
    let model = ModelBuilder::new()
        .gravity(Vec3::new(0.0, -GRAVITY, 0.0))
        .add_revolute_segment(
            "pendulum",
            -1,
            SpatialTransform::identity(),
            rod_inertia(mass, length),
        )
        .build();
    let solver = TreeSolver::new(model);

    let i_pivot = mass * length * length / 3.0;
    let d = length / 2.0;
    let expected_period = 2.0 * std::f64::consts::PI * (i_pivot / (mass * GRAVITY * d)).sqrt();

    let dt = 1e-3;
    let mut integrator = Integrator::new(dt);
    let q0 = DVec::from_vec(vec![0.1]); // small angle
    integrator
        .integrate(&solver, &q0, &DVec::zeros(1), &DVec::zeros(1), 0.0, 10.0)
        .unwrap();

    // Detect positive-to-negative zero crossings of q.
    let mut crossings: Vec<f64> = Vec::new();
    for step in 1..integrator.steps() {
        let prev = integrator.x(step - 1)[0];
        let cur = integrator.x(step)[0];
        if prev > 0.0 && cur <= 0.0 {
            let frac = prev / (prev - cur);
            crossings.push(integrator.time(step - 1) + frac * dt);
        }
    }
    assert!(crossings.len() >= 2, "need at least 2 crossings");

    let mut periods = Vec::new();
    for i in 0..crossings.len() - 1 {
        periods.push(crossings[i + 1] - crossings[i]);
    }
    let avg: f64 = periods.iter().sum::<f64>() / periods.len() as f64;
    let relative_error = ((avg - expected_period) / expected_period).abs();
    assert!(
        relative_error < 0.02,
        "period error {:.4}% exceeds 2% (measured={:.6}, expected={:.6})",
        relative_error * 100.0,
        avg,
        expected_period,
    );
}

#[test]
fn length_jacobian_recompute_variant_refreshes_the_pose() {
    let mut solver = arm_solver();
    let mut muscles = arm_muscles(&solver);

    let q1 = DVec::from_vec(vec![0.1, 0.2]);
    let q2 = DVec::from_vec(vec![-0.4, 0.9]);
    let jac1 = muscles.muscles_length_jacobian_at(&mut solver, &q1).unwrap();
    let jac2 = muscles.muscles_length_jacobian_at(&mut solver, &q2).unwrap();

    // The cached Jacobian now belongs to q2's pose, and differs from q1's.
    // (Column 0 is identically zero — the shoulder rotates the whole arm
    // rigidly — so the elbow column is the discriminating one.)
    let cached = muscles.muscles_length_jacobian(&solver).unwrap();
    assert_relative_eq!(cached[(0, 1)], jac2[(0, 1)], epsilon = 1e-15);
    assert!((jac1[(0, 1)] - jac2[(0, 1)]).abs() > 1e-9);
}
