//! Example: elbow flexion driven by a Hill-type biceps.
//!
//! Builds a two-segment arm, excites the muscle, converts activation to a
//! muscular joint torque through the length Jacobian, and integrates the
//! motion in short horizons.

use myo::{
    DVec, ForceModel, Integrator, ModelBuilder, Muscle, MuscleCharacteristics, MuscleState,
    Muscles, PathPoint, RigidBodySolver, TreeSolver, Vec3,
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

fn main() {
    println!("=== Elbow flexion example ===\n");

    // Upper arm clamped to the world, forearm free to flex about Z.
    let model = ModelBuilder::new()
        .gravity(Vec3::new(0.0, -GRAVITY, 0.0))
        .add_fixed_segment(
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
    let mut solver = TreeSolver::new(model);

    let upper = solver.segment_id("upper_arm").unwrap();
    let fore = solver.segment_id("forearm").unwrap();

    let mut muscles = Muscles::new();
    let gid = muscles
        .add_muscle_group("flexors", "upper_arm", "forearm")
        .unwrap();
    muscles.muscle_group_mut(gid).add_muscle(Muscle::new(
        "biceps",
        vec![
            PathPoint::new("origin", upper, Vec3::new(0.02, -0.05, 0.0)),
            PathPoint::new("via", upper, Vec3::new(0.03, -0.28, 0.0)),
            PathPoint::new("insertion", fore, Vec3::new(0.02, -0.05, 0.0)),
        ],
        MuscleCharacteristics::new(0.25, 800.0),
        ForceModel::Hill,
    ));

    // Full excitation, activation builds up through the state dynamics.
    let mut state = MuscleState::new(1.0, 0.05);

    let dt = 1e-3;
    let horizon = 0.05;
    let mut integrator = Integrator::new(dt);
    let mut q = solver.model().zero_q();
    let mut qdot = solver.model().zero_qdot();

    println!("time(s)  angle(rad)  activation  length(m)  force(N)");
    for step in 0..20 {
        let t = step as f64 * horizon;

        // Activation dynamics, forward Euler over the horizon.
        state.activation =
            (state.activation + horizon * state.activation_dot(true)).clamp(0.0, 1.0);

        let states = vec![state.clone()];
        let tau = muscles
            .muscular_joint_torque_from_states_at(&mut solver, &states, &q, &qdot)
            .expect("muscle torque");
        let force = muscles.muscle_forces(&states).expect("muscle forces")[0];
        let length = muscles.muscle(0).length().expect("muscle length");

        println!(
            "{:6.2}   {:9.4}   {:9.3}   {:8.4}   {:7.1}",
            t, q[0], state.activation, length, force
        );

        integrator
            .integrate(&solver, &q, &qdot, &tau, t, t + horizon)
            .expect("integration");
        let x = integrator.x(integrator.steps() - 1);
        q = DVec::from_vec(vec![x[0]]);
        qdot = DVec::from_vec(vec![x[1]]);
    }

    println!("\nRecorded {} observations", integrator.steps());
}
