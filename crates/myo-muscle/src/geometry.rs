//! Muscle path geometry — world positions, length, velocity, Jacobians.

use crate::error::{MuscleError, Result};
use crate::path::{PathPoint, PathPolicy};
use myo_math::{DMat, DVec, Vec3};
use myo_model::GeneralizedVelocity;
use myo_rigid::RigidBodySolver;

/// Path segments shorter than this contribute nothing to length derivatives.
const MIN_SEGMENT_LENGTH: f64 = 1e-12;

#[derive(Debug, Clone)]
struct GeometryCache {
    /// World position of each path point.
    points_global: Vec<Vec3>,
    /// 3×nv positional Jacobian of each path point.
    point_jacobians: Vec<DMat>,
    /// ∂(path length)/∂Q, length nv.
    length_jacobian: DVec,
    /// Path length.
    length: f64,
    /// Path lengthening velocity, present only when updated with Qdot.
    velocity: Option<f64>,
    /// Solver pose version this cache was computed at.
    pose_version: u64,
}

/// Geometry of one muscle path: anchored points plus the per-pose cache.
///
/// The cache is valid only for the pose version it was computed at; accessors
/// report [`MuscleError::NeverUpdated`] until the first update.
#[derive(Debug, Clone)]
pub struct MuscleGeometry {
    points: Vec<PathPoint>,
    policy: PathPolicy,
    cache: Option<GeometryCache>,
}

impl MuscleGeometry {
    /// Create the geometry for an origin→(via…)→insertion point sequence.
    ///
    /// Panics if fewer than two points are given.
    pub fn new(points: Vec<PathPoint>) -> Self {
        assert!(
            points.len() >= 2,
            "a muscle path needs at least origin and insertion, got {} point(s)",
            points.len()
        );
        Self {
            points,
            policy: PathPolicy::StraightLine,
            cache: None,
        }
    }

    /// Replace the path policy.
    pub fn with_policy(mut self, policy: PathPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The anchored path points, origin first.
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    /// Pose version of the cache, if any update happened yet.
    pub fn computed_at(&self) -> Option<u64> {
        self.cache.as_ref().map(|c| c.pose_version)
    }

    /// Recompute the cache from the solver's current pose.
    ///
    /// Queries one segment transform and one positional Jacobian per path
    /// point. When `qdot` is given, also computes the path lengthening
    /// velocity as the length-Jacobian row contracted with Qdot.
    pub fn update<S: RigidBodySolver + ?Sized>(
        &mut self,
        solver: &S,
        qdot: Option<&GeneralizedVelocity>,
    ) {
        let points_global: Vec<Vec3> = self
            .points
            .iter()
            .map(|p| solver.segment_transform(p.segment).transform_point(&p.local))
            .collect();
        let point_jacobians: Vec<DMat> = self
            .points
            .iter()
            .map(|p| solver.point_jacobian(p.segment, &p.local))
            .collect();

        self.store(
            points_global,
            point_jacobians,
            qdot,
            solver.nv(),
            solver.pose_version(),
        );
    }

    /// Inject precomputed world positions and point Jacobians, bypassing the
    /// solver queries. `pose_version` must be the solver pose the data was
    /// computed at; dimension checks are the caller's responsibility at the
    /// registry level.
    pub fn update_manual(
        &mut self,
        points_global: Vec<Vec3>,
        point_jacobians: Vec<DMat>,
        qdot: Option<&GeneralizedVelocity>,
        pose_version: u64,
    ) {
        assert_eq!(
            points_global.len(),
            self.points.len(),
            "expected one world position per path point"
        );
        assert_eq!(
            point_jacobians.len(),
            self.points.len(),
            "expected one Jacobian per path point"
        );
        let nv = point_jacobians[0].ncols();
        self.store(points_global, point_jacobians, qdot, nv, pose_version);
    }

    fn store(
        &mut self,
        points_global: Vec<Vec3>,
        point_jacobians: Vec<DMat>,
        qdot: Option<&GeneralizedVelocity>,
        nv: usize,
        pose_version: u64,
    ) {
        let effective = self.policy.effective_path(&points_global);

        let mut length = 0.0;
        for pair in effective.windows(2) {
            length += (pair[1] - pair[0]).norm();
        }

        // Length-Jacobian row: Σ_k u_kᵀ (J_{k+1} − J_k), u_k the unit vector
        // along path segment k, traversed origin→insertion.
        let mut row = DVec::zeros(nv);
        for k in 0..points_global.len() - 1 {
            let d = points_global[k + 1] - points_global[k];
            let seg_len = d.norm();
            if seg_len < MIN_SEGMENT_LENGTH {
                continue;
            }
            let u = d / seg_len;
            let (jp, jn) = (&point_jacobians[k], &point_jacobians[k + 1]);
            for c in 0..nv {
                let mut acc = 0.0;
                for r in 0..3 {
                    acc += u[r] * (jn[(r, c)] - jp[(r, c)]);
                }
                row[c] += acc;
            }
        }

        let velocity = qdot.map(|v| {
            assert_eq!(v.len(), nv, "Qdot length does not match solver DOFs");
            row.dot(v)
        });

        self.cache = Some(GeometryCache {
            points_global,
            point_jacobians,
            length_jacobian: row,
            length,
            velocity,
            pose_version,
        });
    }

    fn cache(&self) -> Result<&GeometryCache> {
        self.cache.as_ref().ok_or(MuscleError::NeverUpdated)
    }

    /// Cached path length.
    pub fn length(&self) -> Result<f64> {
        Ok(self.cache()?.length)
    }

    /// Cached path lengthening velocity (positive = lengthening).
    pub fn velocity(&self) -> Result<f64> {
        self.cache()?
            .velocity
            .ok_or(MuscleError::VelocityNotComputed)
    }

    /// Cached world positions of the path points.
    pub fn points_global(&self) -> Result<&[Vec3]> {
        Ok(&self.cache()?.points_global)
    }

    /// Cached per-point positional Jacobians.
    pub fn point_jacobians(&self) -> Result<&[DMat]> {
        Ok(&self.cache()?.point_jacobians)
    }

    /// Cached length-Jacobian row, ∂(length)/∂Q.
    pub fn length_jacobian(&self) -> Result<&DVec> {
        Ok(&self.cache()?.length_jacobian)
    }
}
