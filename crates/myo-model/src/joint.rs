//! Joint types and definitions.

use myo_math::{Mat3, SpatialTransform, SpatialVec, Vec3};

/// Joint type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointType {
    /// Single rotational DOF about an axis.
    Revolute,
    /// Single translational DOF along an axis.
    Prismatic,
    /// 0 DOF rigid attachment.
    Fixed,
}

/// A joint connecting two segments.
#[derive(Debug, Clone)]
pub struct Joint {
    /// Joint type.
    pub joint_type: JointType,
    /// Transform from parent segment frame to joint frame (constant).
    pub parent_to_joint: SpatialTransform,
    /// Joint axis in local frame.
    pub axis: Vec3,
    /// Viscous damping coefficient.
    pub damping: f64,
}

impl Joint {
    /// Create a revolute joint about the local Z axis.
    pub fn revolute(parent_to_joint: SpatialTransform) -> Self {
        Self::revolute_about(parent_to_joint, Vec3::new(0.0, 0.0, 1.0))
    }

    /// Create a revolute joint about an arbitrary local axis.
    pub fn revolute_about(parent_to_joint: SpatialTransform, axis: Vec3) -> Self {
        Self {
            joint_type: JointType::Revolute,
            parent_to_joint,
            axis,
            damping: 0.0,
        }
    }

    /// Create a prismatic joint along an arbitrary local axis.
    pub fn prismatic(parent_to_joint: SpatialTransform, axis: Vec3) -> Self {
        Self {
            joint_type: JointType::Prismatic,
            parent_to_joint,
            axis,
            damping: 0.0,
        }
    }

    /// Create a fixed joint (rigid attachment).
    pub fn fixed(parent_to_joint: SpatialTransform) -> Self {
        Self {
            joint_type: JointType::Fixed,
            parent_to_joint,
            axis: Vec3::zeros(),
            damping: 0.0,
        }
    }

    /// Set the damping coefficient.
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Number of degrees of freedom for this joint type.
    pub fn ndof(&self) -> usize {
        match self.joint_type {
            JointType::Revolute | JointType::Prismatic => 1,
            JointType::Fixed => 0,
        }
    }

    /// Compute the joint transform for the given joint position slice.
    ///
    /// Returns the Plücker transform from predecessor to successor frame.
    /// For revolute joints the successor frame has rotated by +q about the
    /// joint axis, so the coordinate transform uses R(-q) = R(q)ᵀ.
    pub fn joint_transform(&self, q: &[f64]) -> SpatialTransform {
        match self.joint_type {
            JointType::Revolute => {
                // Passive rotation: negate angle for coordinate transform
                let (s, c) = (-q[0]).sin_cos();
                let ax = myo_math::skew(&self.axis);
                let rot = Mat3::identity() + ax * s + ax * ax * (1.0 - c);
                SpatialTransform::new(rot, Vec3::zeros())
            }
            JointType::Prismatic => {
                SpatialTransform::new(Mat3::identity(), self.axis * q[0])
            }
            JointType::Fixed => SpatialTransform::identity(),
        }
    }

    /// Motion subspace vector S for this joint (None for 0-DOF joints).
    ///
    /// Revolute: [axis; 0], prismatic: [0; axis].
    pub fn motion_subspace(&self) -> Option<SpatialVec> {
        match self.joint_type {
            JointType::Revolute => Some(SpatialVec::new(self.axis, Vec3::zeros())),
            JointType::Prismatic => Some(SpatialVec::new(Vec3::zeros(), self.axis)),
            JointType::Fixed => None,
        }
    }
}
