//! Mass matrix and forward dynamics.

use crate::rnea::rnea_with_gravity;
use crate::{Result, SolverError, rnea};
use myo_math::{DMat, DVec};
use myo_model::{GeneralizedCoordinates, GeneralizedTorque, GeneralizedVelocity, Model};

/// Compute the joint-space mass matrix M(q).
///
/// Column j is assembled as the gravity-free inverse dynamics of a unit
/// acceleration along DOF j at zero velocity: M·eⱼ = RNEA(q, 0, eⱼ).
pub fn mass_matrix(model: &Model, q: &GeneralizedCoordinates) -> DMat {
    let nv = model.nv;
    let zero_v = DVec::zeros(nv);
    let mut m = DMat::zeros(nv, nv);

    for j in 0..nv {
        let mut e_j = DVec::zeros(nv);
        e_j[j] = 1.0;
        let col = rnea_with_gravity(model, q, &zero_v, &e_j, false);
        m.column_mut(j).copy_from(&col);
    }

    m
}

/// Forward dynamics: generalized accelerations from (Q, Qdot, torques).
///
/// Solves M(q)·qddot = τ − C(q, qdot) − D·qdot with C the gravity/Coriolis
/// bias from RNEA and D the joint viscous damping. A non-positive-definite
/// mass matrix or non-finite result is a [`SolverError::NumericalFailure`].
pub fn forward_dynamics(
    model: &Model,
    q: &GeneralizedCoordinates,
    qdot: &GeneralizedVelocity,
    tau: &GeneralizedTorque,
) -> Result<DVec> {
    if q.len() != model.nq {
        return Err(SolverError::DimensionMismatch {
            expected: model.nq,
            got: q.len(),
        });
    }
    if qdot.len() != model.nv {
        return Err(SolverError::DimensionMismatch {
            expected: model.nv,
            got: qdot.len(),
        });
    }
    if tau.len() != model.nv {
        return Err(SolverError::DimensionMismatch {
            expected: model.nv,
            got: tau.len(),
        });
    }

    let bias = rnea(model, q, qdot, &DVec::zeros(model.nv));

    let mut rhs = tau - bias;
    for (joint_idx, joint) in model.joints.iter().enumerate() {
        if joint.ndof() == 1 {
            let v_idx = model.v_offsets[joint_idx];
            rhs[v_idx] -= joint.damping * qdot[v_idx];
        }
    }

    let m = mass_matrix(model, q);
    let chol = m.cholesky().ok_or_else(|| {
        SolverError::NumericalFailure("mass matrix is not positive definite".to_string())
    })?;
    let qddot = chol.solve(&rhs);

    if qddot.iter().any(|x| !x.is_finite()) {
        return Err(SolverError::NumericalFailure(
            "forward dynamics produced a non-finite acceleration".to_string(),
        ));
    }

    Ok(qddot)
}
