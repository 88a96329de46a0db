//! myo — musculoskeletal dynamics library.
//!
//! This is the umbrella crate that provides the [`Integrator`] and
//! re-exports core types from the sub-crates: spatial algebra
//! (`myo-math`), the kinematic-tree model (`myo-model`), the rigid-body
//! solver (`myo-rigid`) and the muscle layer (`myo-muscle`).

mod integrator;

pub use integrator::Integrator;

pub use myo_math::{self, DMat, DVec, Vec3};
pub use myo_model::{
    self, GeneralizedCoordinates, GeneralizedTorque, GeneralizedVelocity, Joint, JointType, Model,
    ModelBuilder, Segment,
};
pub use myo_muscle::{
    self, ForceModel, Muscle, MuscleCharacteristics, MuscleError, MuscleGeometry, MuscleGroup,
    MuscleState, Muscles, PathPoint, PathPolicy,
};
pub use myo_rigid::{
    self, RigidBodySolver, SolverError, TreeSolver, forward_dynamics, forward_kinematics,
    mass_matrix, point_jacobian, rnea,
};
