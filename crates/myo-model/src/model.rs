//! Model definition — static description of a musculoskeletal body.

use crate::{GeneralizedCoordinates, GeneralizedTorque, GeneralizedVelocity, Joint, Segment};
use myo_math::{GRAVITY, SpatialInertia, SpatialTransform, Vec3};

/// Static model describing the topology and parameters of a body.
#[derive(Debug, Clone)]
pub struct Model {
    /// Segments in the kinematic tree, parents before children.
    pub segments: Vec<Segment>,
    /// Joints connecting segments.
    pub joints: Vec<Joint>,
    /// Gravity vector in world frame.
    pub gravity: Vec3,
    /// Total number of position DOFs.
    pub nq: usize,
    /// Total number of velocity DOFs.
    pub nv: usize,
    /// Position DOF offset for each joint.
    pub q_offsets: Vec<usize>,
    /// Velocity DOF offset for each joint.
    pub v_offsets: Vec<usize>,
}

impl Model {
    /// Number of segments.
    pub fn nsegments(&self) -> usize {
        self.segments.len()
    }

    /// Look up a segment index from its name.
    pub fn segment_id(&self, name: &str) -> Option<usize> {
        self.segments.iter().position(|s| s.name == name)
    }

    /// Zero generalized coordinates for this model.
    pub fn zero_q(&self) -> GeneralizedCoordinates {
        GeneralizedCoordinates::zeros(self.nq)
    }

    /// Zero generalized velocities for this model.
    pub fn zero_qdot(&self) -> GeneralizedVelocity {
        GeneralizedVelocity::zeros(self.nv)
    }

    /// Zero generalized torques for this model.
    pub fn zero_tau(&self) -> GeneralizedTorque {
        GeneralizedTorque::zeros(self.nv)
    }
}

/// Builder for constructing models.
pub struct ModelBuilder {
    segments: Vec<Segment>,
    joints: Vec<Joint>,
    gravity: Vec3,
}

impl ModelBuilder {
    /// Start building a new model.
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            joints: Vec::new(),
            gravity: Vec3::new(0.0, 0.0, -GRAVITY),
        }
    }

    /// Set the gravity vector.
    pub fn gravity(mut self, g: Vec3) -> Self {
        self.gravity = g;
        self
    }

    /// Add a segment with a revolute joint (about local Z) to the given parent.
    ///
    /// `parent` is the index of the parent segment, or -1 for world.
    /// `parent_to_joint` is the transform from parent frame to joint frame.
    pub fn add_revolute_segment(
        self,
        name: &str,
        parent: i32,
        parent_to_joint: SpatialTransform,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_segment(name, parent, Joint::revolute(parent_to_joint), inertia)
    }

    /// Add a segment with a revolute joint about an arbitrary local axis.
    pub fn add_revolute_segment_about(
        self,
        name: &str,
        parent: i32,
        parent_to_joint: SpatialTransform,
        axis: Vec3,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_segment(
            name,
            parent,
            Joint::revolute_about(parent_to_joint, axis),
            inertia,
        )
    }

    /// Add a segment with a prismatic joint to the given parent.
    pub fn add_prismatic_segment(
        self,
        name: &str,
        parent: i32,
        parent_to_joint: SpatialTransform,
        axis: Vec3,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_segment(name, parent, Joint::prismatic(parent_to_joint, axis), inertia)
    }

    /// Add a rigidly attached segment (fixed joint, 0 DOF).
    pub fn add_fixed_segment(
        self,
        name: &str,
        parent: i32,
        parent_to_joint: SpatialTransform,
        inertia: SpatialInertia,
    ) -> Self {
        self.add_segment(name, parent, Joint::fixed(parent_to_joint), inertia)
    }

    /// Add a generic joint and segment.
    pub fn add_segment(
        mut self,
        name: &str,
        parent: i32,
        joint: Joint,
        inertia: SpatialInertia,
    ) -> Self {
        assert!(
            parent < self.segments.len() as i32,
            "parent index {} out of range for segment {:?} ({} segments so far)",
            parent,
            name,
            self.segments.len()
        );
        let joint_idx = self.joints.len();
        self.joints.push(joint);
        self.segments.push(Segment {
            name: name.to_string(),
            inertia,
            parent,
            joint_idx,
        });
        self
    }

    /// Build the model.
    pub fn build(self) -> Model {
        let mut nq = 0;
        let mut nv = 0;
        let mut q_offsets = Vec::new();
        let mut v_offsets = Vec::new();

        for joint in &self.joints {
            q_offsets.push(nq);
            v_offsets.push(nv);
            nq += joint.ndof();
            nv += joint.ndof();
        }

        Model {
            segments: self.segments,
            joints: self.joints,
            gravity: self.gravity,
            nq,
            nv,
            q_offsets,
            v_offsets,
        }
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}
