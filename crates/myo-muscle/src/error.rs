//! Error types for the muscle layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MuscleError {
    /// Geometry has never been computed for this muscle or registry.
    #[error("muscle geometry has never been updated")]
    NeverUpdated,

    /// Cached geometry was computed at an older pose than the solver holds.
    #[error("muscle geometry is stale: computed at pose {computed_at}, solver at pose {current}")]
    StaleGeometry { computed_at: u64, current: u64 },

    /// Geometry was last updated without generalized velocities.
    #[error("muscle path velocity was not computed (update with Qdot first)")]
    VelocityNotComputed,

    #[error("muscle group {0:?} already exists")]
    DuplicateGroup(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Solver(#[from] myo_rigid::SolverError),
}

pub type Result<T> = std::result::Result<T, MuscleError>;
