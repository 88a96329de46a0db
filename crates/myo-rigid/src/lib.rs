//! Rigid-body solver for the myo musculoskeletal library.
//!
//! Implements:
//! - Forward kinematics over the segment tree
//! - Positional Jacobians of segment-fixed points
//! - Recursive Newton-Euler inverse dynamics
//! - Mass matrix assembly and forward dynamics
//!
//! The muscle layer consumes this crate only through the [`RigidBodySolver`]
//! capability trait; [`TreeSolver`] is the bundled reference implementation.

pub mod dynamics;
pub mod jacobian;
pub mod kinematics;
pub mod rnea;
mod solver;

pub use dynamics::{forward_dynamics, mass_matrix};
pub use jacobian::point_jacobian;
pub use kinematics::forward_kinematics;
pub use rnea::rnea;
pub use solver::TreeSolver;

use myo_math::{DMat, DVec, SpatialTransform, Vec3};
use myo_model::{GeneralizedCoordinates, GeneralizedTorque, GeneralizedVelocity};
use thiserror::Error;

/// Errors surfaced by rigid-body computations.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The multibody computation diverged or degenerated; not recoverable
    /// by retrying with the same inputs.
    #[error("numerical failure: {0}")]
    NumericalFailure(String),

    #[error("unknown segment: {0}")]
    UnknownSegment(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Capability interface the muscle layer consumes from a rigid-body engine.
///
/// A solver holds a pose-dependent kinematic cache, refreshed explicitly by
/// [`update_kinematics`](RigidBodySolver::update_kinematics). Every refresh
/// bumps the pose version, which downstream caches use to detect staleness.
/// Instances are not safe for concurrent mutation; use one per thread.
pub trait RigidBodySolver {
    /// Number of velocity degrees of freedom.
    fn nv(&self) -> usize;

    /// Refresh the internal kinematic cache at the given pose.
    fn update_kinematics(
        &mut self,
        q: &GeneralizedCoordinates,
        qdot: Option<&GeneralizedVelocity>,
    );

    /// Monotone counter identifying the pose of the current cache.
    fn pose_version(&self) -> u64;

    /// World transform of a segment at the current pose.
    ///
    /// Panics if `segment` is out of range.
    fn segment_transform(&self, segment: usize) -> SpatialTransform;

    /// 3×nv positional Jacobian of a segment-fixed point at the current pose.
    ///
    /// Panics if `segment` is out of range.
    fn point_jacobian(&self, segment: usize, point_local: &Vec3) -> DMat;

    /// Generalized accelerations from (Q, Qdot, generalized torques).
    fn forward_dynamics(
        &self,
        q: &GeneralizedCoordinates,
        qdot: &GeneralizedVelocity,
        tau: &GeneralizedTorque,
    ) -> Result<DVec>;

    /// Look up a segment index from its name.
    fn segment_id(&self, name: &str) -> Option<usize>;
}
