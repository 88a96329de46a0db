//! Reference rigid-body solver over a segment-tree model.

use crate::{RigidBodySolver, Result, forward_dynamics, forward_kinematics, point_jacobian};
use myo_math::{DMat, DVec, SpatialTransform, Vec3};
use myo_model::{GeneralizedCoordinates, GeneralizedTorque, GeneralizedVelocity, Model};

/// Rigid-body solver owning a [`Model`] and its pose-dependent kinematic
/// cache.
///
/// The cache holds the world transform of every segment for the last pose
/// passed to [`update_kinematics`](RigidBodySolver::update_kinematics); each
/// refresh bumps a monotone pose version that downstream consumers use to
/// tag their own derived caches.
#[derive(Debug, Clone)]
pub struct TreeSolver {
    model: Model,
    x_world: Vec<SpatialTransform>,
    version: u64,
}

impl TreeSolver {
    /// Create a solver with the kinematic cache initialized at the zero pose.
    pub fn new(model: Model) -> Self {
        let x_world = forward_kinematics(&model, &model.zero_q());
        Self {
            model,
            x_world,
            version: 1,
        }
    }

    /// The underlying model.
    pub fn model(&self) -> &Model {
        &self.model
    }
}

impl RigidBodySolver for TreeSolver {
    fn nv(&self) -> usize {
        self.model.nv
    }

    fn update_kinematics(
        &mut self,
        q: &GeneralizedCoordinates,
        _qdot: Option<&GeneralizedVelocity>,
    ) {
        self.x_world = forward_kinematics(&self.model, q);
        self.version += 1;
    }

    fn pose_version(&self) -> u64 {
        self.version
    }

    fn segment_transform(&self, segment: usize) -> SpatialTransform {
        assert!(
            segment < self.x_world.len(),
            "segment index {} out of range ({} segments)",
            segment,
            self.x_world.len()
        );
        self.x_world[segment]
    }

    fn point_jacobian(&self, segment: usize, point_local: &Vec3) -> DMat {
        point_jacobian(&self.model, &self.x_world, segment, point_local)
    }

    fn forward_dynamics(
        &self,
        q: &GeneralizedCoordinates,
        qdot: &GeneralizedVelocity,
        tau: &GeneralizedTorque,
    ) -> Result<DVec> {
        forward_dynamics(&self.model, q, qdot, tau)
    }

    fn segment_id(&self, name: &str) -> Option<usize> {
        self.model.segment_id(name)
    }
}
