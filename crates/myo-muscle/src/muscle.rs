//! One musculotendon unit.

use crate::error::Result;
use crate::force::{ForceModel, MuscleCharacteristics};
use crate::geometry::MuscleGeometry;
use crate::path::PathPoint;
use crate::state::MuscleState;

/// A muscle: a named path through the skeleton plus a force model and its
/// dynamic state.
///
/// Length, velocity and moment arms are derived quantities cached by the
/// geometry for the pose they were last computed at.
#[derive(Debug, Clone)]
pub struct Muscle {
    name: String,
    geometry: MuscleGeometry,
    characteristics: MuscleCharacteristics,
    force_model: ForceModel,
    state: MuscleState,
}

impl Muscle {
    /// Create a muscle from its path points (origin first, insertion last).
    pub fn new(
        name: &str,
        points: Vec<PathPoint>,
        characteristics: MuscleCharacteristics,
        force_model: ForceModel,
    ) -> Self {
        Self {
            name: name.to_string(),
            geometry: MuscleGeometry::new(points),
            characteristics,
            force_model,
            state: MuscleState::default(),
        }
    }

    /// Muscle name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path geometry (read-only).
    pub fn geometry(&self) -> &MuscleGeometry {
        &self.geometry
    }

    /// Path geometry, for updates.
    pub fn geometry_mut(&mut self) -> &mut MuscleGeometry {
        &mut self.geometry
    }

    /// Mechanical characteristics.
    pub fn characteristics(&self) -> &MuscleCharacteristics {
        &self.characteristics
    }

    /// Force model.
    pub fn force_model(&self) -> ForceModel {
        self.force_model
    }

    /// Default dynamic state attached to this muscle.
    pub fn state(&self) -> &MuscleState {
        &self.state
    }

    /// Replace the attached dynamic state.
    pub fn set_state(&mut self, state: MuscleState) {
        self.state = state;
    }

    /// Cached path length.
    pub fn length(&self) -> Result<f64> {
        self.geometry.length()
    }

    /// Cached path lengthening velocity.
    pub fn velocity(&self) -> Result<f64> {
        self.geometry.velocity()
    }

    /// Scalar force produced under the given state.
    ///
    /// Geometry-dependent models read the cached length/velocity, so the
    /// geometry must have been updated at the pose of interest; an absent
    /// velocity is treated as isometric.
    pub fn force(&self, state: &MuscleState) -> Result<f64> {
        match self.force_model {
            ForceModel::Idealized => Ok(self.force_model.force(
                &self.characteristics,
                state.activation,
                0.0,
                None,
            )),
            ForceModel::Hill => {
                let length = self.geometry.length()?;
                let velocity = self.geometry.velocity().ok();
                Ok(self
                    .force_model
                    .force(&self.characteristics, state.activation, length, velocity))
            }
        }
    }
}
