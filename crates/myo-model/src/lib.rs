//! Model types for the myo musculoskeletal library.
//!
//! `Model` is the static description of a body (segment topology, masses,
//! joint types). The generalized-vector aliases name the minimal
//! parameterization of its configuration.

pub mod joint;
pub mod model;
pub mod segment;

pub use joint::{Joint, JointType};
pub use model::{Model, ModelBuilder};
pub use segment::Segment;

use myo_math::DVec;

/// Generalized coordinates Q (joint angles/displacements), length = nq.
pub type GeneralizedCoordinates = DVec;
/// Generalized velocities Qdot, length = nv.
pub type GeneralizedVelocity = DVec;
/// Generalized joint torques, length = nv.
pub type GeneralizedTorque = DVec;
