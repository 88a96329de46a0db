//! The muscle registry: named groups, bulk updates, force/torque queries.

use crate::error::{MuscleError, Result};
use crate::group::MuscleGroup;
use crate::muscle::Muscle;
use crate::state::MuscleState;
use myo_math::{DMat, DVec, Vec3};
use myo_model::{GeneralizedCoordinates, GeneralizedTorque, GeneralizedVelocity};
use myo_rigid::RigidBodySolver;

/// Registry owning every muscle group of a model.
///
/// Muscles are ordered group-major (by group, then by index within the
/// group); the assembled muscle-length Jacobian stacks one row per muscle in
/// that order. The Jacobian and the per-muscle geometry caches are tagged
/// with the solver pose version they were computed at, and force/torque
/// queries refuse stale tags.
///
/// `Clone` is a deep copy: groups and muscles are owned by value, so
/// mutating a clone never affects the original.
#[derive(Debug, Clone, Default)]
pub struct Muscles {
    groups: Vec<MuscleGroup>,
    /// Assembled #muscles × nv length Jacobian and its pose tag.
    length_jacobian: Option<(DMat, u64)>,
}

impl Muscles {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction and introspection ──

    /// Append a new empty group, returning its dense id.
    pub fn add_muscle_group(
        &mut self,
        name: &str,
        origin_segment: &str,
        insertion_segment: &str,
    ) -> Result<usize> {
        if self.groups.iter().any(|g| g.name() == name) {
            return Err(MuscleError::DuplicateGroup(name.to_string()));
        }
        self.length_jacobian = None;
        self.groups
            .push(MuscleGroup::new(name, origin_segment, insertion_segment));
        Ok(self.groups.len() - 1)
    }

    /// Dense id of a group, or −1 if no group has that name.
    pub fn muscle_group_id(&self, name: &str) -> i32 {
        self.groups
            .iter()
            .position(|g| g.name() == name)
            .map(|i| i as i32)
            .unwrap_or(-1)
    }

    /// Group lookup by name.
    pub fn muscle_group_by_name(&self, name: &str) -> Option<&MuscleGroup> {
        self.groups.iter().find(|g| g.name() == name)
    }

    /// Group at `idx`. Panics if the index is out of range.
    pub fn muscle_group(&self, idx: usize) -> &MuscleGroup {
        assert!(
            idx < self.groups.len(),
            "muscle group index {} out of range ({} groups)",
            idx,
            self.groups.len()
        );
        &self.groups[idx]
    }

    /// Mutable group at `idx`. Panics if the index is out of range.
    ///
    /// Drops the assembled Jacobian, since the caller may change the muscle
    /// set.
    pub fn muscle_group_mut(&mut self, idx: usize) -> &mut MuscleGroup {
        assert!(
            idx < self.groups.len(),
            "muscle group index {} out of range ({} groups)",
            idx,
            self.groups.len()
        );
        self.length_jacobian = None;
        &mut self.groups[idx]
    }

    /// All groups, in id order.
    pub fn muscle_groups(&self) -> &[MuscleGroup] {
        &self.groups
    }

    /// Number of muscle groups.
    pub fn nb_muscle_groups(&self) -> usize {
        self.groups.len()
    }

    /// Total number of muscles across groups.
    pub fn nb_muscles(&self) -> usize {
        self.groups.iter().map(|g| g.nb_muscles()).sum()
    }

    /// Total number of muscles (alias kept for API parity).
    pub fn nb_muscle_total(&self) -> usize {
        self.nb_muscles()
    }

    /// All muscles in group-major order.
    pub fn muscles(&self) -> impl Iterator<Item = &Muscle> + '_ {
        self.groups.iter().flat_map(|g| g.muscles().iter())
    }

    fn muscles_mut(&mut self) -> impl Iterator<Item = &mut Muscle> + '_ {
        self.groups.iter_mut().flat_map(|g| g.muscles_mut().iter_mut())
    }

    /// Muscle at group-major index `idx`. Panics if out of range.
    pub fn muscle(&self, idx: usize) -> &Muscle {
        let mut i = idx;
        for group in &self.groups {
            if i < group.nb_muscles() {
                return group.muscle(i);
            }
            i -= group.nb_muscles();
        }
        panic!(
            "muscle index {} out of range ({} muscles)",
            idx,
            self.nb_muscles()
        );
    }

    /// Names of all muscles, group-major.
    pub fn muscle_names(&self) -> Vec<String> {
        self.muscles().map(|m| m.name().to_string()).collect()
    }

    /// Clones of every muscle's attached dynamic state, group-major; the
    /// conventional starting point for building a state batch.
    pub fn state_set(&self) -> Vec<MuscleState> {
        self.muscles().map(|m| m.state().clone()).collect()
    }

    // ── Geometry updates ──

    /// Recompute every muscle's geometry at pose Q.
    ///
    /// `update_kinematics` controls whether the solver's kinematic cache is
    /// refreshed first; pass false only when the caller guarantees the
    /// solver is already at Q. Either way the new caches are tagged with the
    /// solver's pose version, so later queries stay consistent with the
    /// solver's actual pose.
    pub fn update_muscles<S: RigidBodySolver + ?Sized>(
        &mut self,
        solver: &mut S,
        q: &GeneralizedCoordinates,
        update_kinematics: bool,
    ) -> Result<()> {
        if update_kinematics {
            solver.update_kinematics(q, None);
        }
        self.refresh_geometry(solver, None)
    }

    /// Velocity-aware variant of [`update_muscles`](Self::update_muscles):
    /// also computes each muscle's path lengthening velocity.
    pub fn update_muscles_with_velocity<S: RigidBodySolver + ?Sized>(
        &mut self,
        solver: &mut S,
        q: &GeneralizedCoordinates,
        qdot: &GeneralizedVelocity,
        update_kinematics: bool,
    ) -> Result<()> {
        if qdot.len() != solver.nv() {
            return Err(MuscleError::DimensionMismatch {
                expected: solver.nv(),
                got: qdot.len(),
            });
        }
        if update_kinematics {
            solver.update_kinematics(q, Some(qdot));
        }
        self.refresh_geometry(solver, Some(qdot))
    }

    fn refresh_geometry<S: RigidBodySolver + ?Sized>(
        &mut self,
        solver: &S,
        qdot: Option<&GeneralizedVelocity>,
    ) -> Result<()> {
        let version = solver.pose_version();
        for muscle in self.muscles_mut() {
            muscle.geometry_mut().update(solver, qdot);
        }
        self.assemble_length_jacobian(solver.nv(), version)
    }

    /// Inject precomputed geometry, bypassing the solver queries (used to
    /// reuse one Jacobian across several force evaluations at the same
    /// pose). One world-position vector and one 3×nv Jacobian set per
    /// muscle, group-major; `pose_version` is the solver pose the data
    /// belongs to.
    pub fn update_muscles_manual(
        &mut self,
        pose_version: u64,
        points_global: Vec<Vec<Vec3>>,
        point_jacobians: Vec<Vec<DMat>>,
        qdot: Option<&GeneralizedVelocity>,
    ) -> Result<()> {
        let nb = self.nb_muscles();
        if points_global.len() != nb {
            return Err(MuscleError::DimensionMismatch {
                expected: nb,
                got: points_global.len(),
            });
        }
        if point_jacobians.len() != nb {
            return Err(MuscleError::DimensionMismatch {
                expected: nb,
                got: point_jacobians.len(),
            });
        }

        let nv = point_jacobians
            .first()
            .and_then(|jacs| jacs.first())
            .map(|j| j.ncols())
            .unwrap_or(0);

        for (muscle, (points, jacs)) in self
            .muscles_mut()
            .zip(points_global.into_iter().zip(point_jacobians))
        {
            muscle
                .geometry_mut()
                .update_manual(points, jacs, qdot, pose_version);
        }
        self.assemble_length_jacobian(nv, pose_version)
    }

    fn assemble_length_jacobian(&mut self, nv: usize, pose_version: u64) -> Result<()> {
        let nb = self.nb_muscles();
        let mut jac = DMat::zeros(nb, nv);
        for (i, muscle) in self.muscles().enumerate() {
            let row = muscle.geometry().length_jacobian()?;
            if row.len() != nv {
                return Err(MuscleError::DimensionMismatch {
                    expected: nv,
                    got: row.len(),
                });
            }
            for c in 0..nv {
                jac[(i, c)] = row[c];
            }
        }
        self.length_jacobian = Some((jac, pose_version));
        Ok(())
    }

    fn fresh_jacobian(&self, current: u64) -> Result<&DMat> {
        match &self.length_jacobian {
            None => Err(MuscleError::NeverUpdated),
            Some((jac, tag)) if *tag == current => Ok(jac),
            Some((_, tag)) => Err(MuscleError::StaleGeometry {
                computed_at: *tag,
                current,
            }),
        }
    }

    // ── Jacobian and torque queries ──

    /// The assembled muscle-length Jacobian (#muscles × nv) for the solver's
    /// current pose. Fails if the registry has not been updated at that
    /// pose.
    pub fn muscles_length_jacobian<S: RigidBodySolver + ?Sized>(
        &self,
        solver: &S,
    ) -> Result<DMat> {
        Ok(self.fresh_jacobian(solver.pose_version())?.clone())
    }

    /// Recompute geometry at Q, then return the assembled Jacobian.
    pub fn muscles_length_jacobian_at<S: RigidBodySolver + ?Sized>(
        &mut self,
        solver: &mut S,
        q: &GeneralizedCoordinates,
    ) -> Result<DMat> {
        self.update_muscles(solver, q, true)?;
        self.muscles_length_jacobian(solver)
    }

    /// Muscular joint torque τ = −Jᵀ·F from per-muscle forces F.
    ///
    /// The virtual-power mapping: increasing tension shortens the path, so
    /// the transpose-Jacobian image of F enters the joints with a negative
    /// sign. Requires geometry updated at the solver's current pose.
    pub fn muscular_joint_torque<S: RigidBodySolver + ?Sized>(
        &self,
        solver: &S,
        forces: &DVec,
    ) -> Result<GeneralizedTorque> {
        let jac = self.fresh_jacobian(solver.pose_version())?;
        if forces.len() != jac.nrows() {
            return Err(MuscleError::DimensionMismatch {
                expected: jac.nrows(),
                got: forces.len(),
            });
        }
        Ok(-(jac.transpose() * forces))
    }

    /// Refresh geometry at (Q, Qdot), then compute τ = −Jᵀ·F.
    pub fn muscular_joint_torque_at<S: RigidBodySolver + ?Sized>(
        &mut self,
        solver: &mut S,
        forces: &DVec,
        q: &GeneralizedCoordinates,
        qdot: &GeneralizedVelocity,
    ) -> Result<GeneralizedTorque> {
        self.update_muscles_with_velocity(solver, q, qdot, true)?;
        self.muscular_joint_torque(solver, forces)
    }

    /// Convert states to forces through each muscle's force model, then
    /// compute τ = −Jᵀ·F at the current (already updated) pose.
    pub fn muscular_joint_torque_from_states<S: RigidBodySolver + ?Sized>(
        &self,
        solver: &S,
        states: &[MuscleState],
    ) -> Result<GeneralizedTorque> {
        let forces = self.muscle_forces(states)?;
        self.muscular_joint_torque(solver, &forces)
    }

    /// Refresh geometry at (Q, Qdot), then convert states to forces and
    /// compute τ = −Jᵀ·F.
    pub fn muscular_joint_torque_from_states_at<S: RigidBodySolver + ?Sized>(
        &mut self,
        solver: &mut S,
        states: &[MuscleState],
        q: &GeneralizedCoordinates,
        qdot: &GeneralizedVelocity,
    ) -> Result<GeneralizedTorque> {
        self.update_muscles_with_velocity(solver, q, qdot, true)?;
        self.muscular_joint_torque_from_states(solver, states)
    }

    // ── Forces and activation dynamics ──

    /// Per-muscle scalar forces from a state batch, group-major.
    ///
    /// Geometry-dependent force models read the cached length/velocity, so
    /// the registry must have been updated at the pose of interest.
    pub fn muscle_forces(&self, states: &[MuscleState]) -> Result<DVec> {
        let nb = self.nb_muscles();
        if states.len() != nb {
            return Err(MuscleError::DimensionMismatch {
                expected: nb,
                got: states.len(),
            });
        }
        let mut forces = DVec::zeros(nb);
        for (i, (muscle, state)) in self.muscles().zip(states).enumerate() {
            forces[i] = muscle.force(state)?;
        }
        Ok(forces)
    }

    /// Refresh geometry at (Q, Qdot), then compute per-muscle forces.
    pub fn muscle_forces_at<S: RigidBodySolver + ?Sized>(
        &mut self,
        solver: &mut S,
        states: &[MuscleState],
        q: &GeneralizedCoordinates,
        qdot: &GeneralizedVelocity,
    ) -> Result<DVec> {
        self.update_muscles_with_velocity(solver, q, qdot, true)?;
        self.muscle_forces(states)
    }

    /// Activation time-derivative for each state in the batch.
    pub fn activation_dot(
        &self,
        states: &[MuscleState],
        already_normalized: bool,
    ) -> Result<DVec> {
        let nb = self.nb_muscles();
        if states.len() != nb {
            return Err(MuscleError::DimensionMismatch {
                expected: nb,
                got: states.len(),
            });
        }
        Ok(DVec::from_iterator(
            nb,
            states.iter().map(|s| s.activation_dot(already_normalized)),
        ))
    }
}
