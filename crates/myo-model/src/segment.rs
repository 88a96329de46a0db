//! Body segment definition.

use myo_math::SpatialInertia;

/// A rigid body segment in the kinematic tree.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Name of the segment, used for muscle attachment lookup.
    pub name: String,
    /// Spatial inertia in segment-local frame.
    pub inertia: SpatialInertia,
    /// Index of the parent segment (-1 for world/root).
    pub parent: i32,
    /// Index of the joint connecting this segment to its parent.
    pub joint_idx: usize,
}
