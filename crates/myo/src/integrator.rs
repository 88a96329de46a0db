//! Time integration of the generalized state under constant applied torques.

use myo_math::DVec;
use myo_model::{GeneralizedCoordinates, GeneralizedTorque, GeneralizedVelocity};
use myo_rigid::{Result, RigidBodySolver, SolverError};
use std::collections::BTreeMap;

/// Advances a flattened state x = [Q; Qdot] with fixed-step RK4, using the
/// solver's forward dynamics as the ODE right-hand side.
///
/// Every accepted step appends (x, t) to an append-only observation log
/// that keeps growing across repeated [`integrate`](Integrator::integrate)
/// calls. `Clone` duplicates the configuration only and starts a fresh log.
#[derive(Debug)]
pub struct Integrator {
    /// Nominal step size; the final step of a horizon is shortened to land
    /// exactly on t1.
    dt: f64,
    /// Recorded state vectors, one per accepted step.
    x_log: Vec<DVec>,
    /// Timestamp of each recorded step.
    times: Vec<f64>,
}

impl Integrator {
    /// Create an integrator with the given nominal step size.
    ///
    /// Panics if `dt` is not strictly positive.
    pub fn new(dt: f64) -> Self {
        assert!(dt > 0.0, "integration step must be positive, got {}", dt);
        Self {
            dt,
            x_log: Vec::new(),
            times: Vec::new(),
        }
    }

    /// Nominal step size.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Advance (Q, Qdot) from t0 to t1 under a constant generalized torque.
    ///
    /// The right-hand side is (Qdot, solver.forward_dynamics(Q, Qdot, τ)).
    /// The initial state and every accepted step are recorded. A solver
    /// failure or a non-finite state aborts the run with the failure; steps
    /// accepted before the failure stay in the log.
    pub fn integrate<S: RigidBodySolver + ?Sized>(
        &mut self,
        solver: &S,
        q0: &GeneralizedCoordinates,
        qdot0: &GeneralizedVelocity,
        tau: &GeneralizedTorque,
        t0: f64,
        t1: f64,
    ) -> Result<()> {
        if t1 < t0 {
            return Err(SolverError::NumericalFailure(format!(
                "integration horizon is reversed: t0 = {}, t1 = {}",
                t0, t1
            )));
        }
        if qdot0.len() != q0.len() {
            return Err(SolverError::DimensionMismatch {
                expected: q0.len(),
                got: qdot0.len(),
            });
        }

        let nq = q0.len();
        let mut x = DVec::zeros(2 * nq);
        x.rows_mut(0, nq).copy_from(q0);
        x.rows_mut(nq, nq).copy_from(qdot0);

        let mut t = t0;
        self.record(&x, t);

        // Small float guard so the shortened final step cannot leave a
        // degenerate residual interval behind.
        while t1 - t > 1e-12 {
            let h = self.dt.min(t1 - t);

            let k1 = Self::derivative(solver, &x, tau)?;
            let k2 = Self::derivative(solver, &(&x + &k1 * (h / 2.0)), tau)?;
            let k3 = Self::derivative(solver, &(&x + &k2 * (h / 2.0)), tau)?;
            let k4 = Self::derivative(solver, &(&x + &k3 * h), tau)?;

            x += (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (h / 6.0);
            t += h;

            if x.iter().any(|v| !v.is_finite()) {
                return Err(SolverError::NumericalFailure(format!(
                    "state diverged at t = {}",
                    t
                )));
            }
            self.record(&x, t);
        }

        Ok(())
    }

    /// RHS of the flattened ODE: dx/dt = [Qdot; Qddot].
    fn derivative<S: RigidBodySolver + ?Sized>(
        solver: &S,
        x: &DVec,
        tau: &GeneralizedTorque,
    ) -> Result<DVec> {
        let nq = x.len() / 2;
        let q = x.rows(0, nq).into_owned();
        let qdot = x.rows(nq, nq).into_owned();
        let qddot = solver.forward_dynamics(&q, &qdot, tau)?;

        let mut dxdt = DVec::zeros(2 * nq);
        dxdt.rows_mut(0, nq).copy_from(&qdot);
        dxdt.rows_mut(nq, nq).copy_from(&qddot);
        Ok(dxdt)
    }

    fn record(&mut self, x: &DVec, t: f64) {
        self.x_log.push(x.clone());
        self.times.push(t);
    }

    /// Number of recorded observations so far.
    pub fn steps(&self) -> usize {
        self.times.len()
    }

    /// Recorded flattened state at a step index.
    ///
    /// Panics if `step` is out of range.
    pub fn x(&self, step: usize) -> &DVec {
        assert!(
            step < self.x_log.len(),
            "step index {} out of range ({} recorded)",
            step,
            self.x_log.len()
        );
        &self.x_log[step]
    }

    /// Recorded generalized coordinates at a step index.
    ///
    /// Panics if `step` is out of range.
    pub fn q_at(&self, step: usize) -> GeneralizedCoordinates {
        let x = self.x(step);
        let nq = x.len() / 2;
        x.rows(0, nq).into_owned()
    }

    /// Timestamp of a recorded step. Panics if `step` is out of range.
    pub fn time(&self, step: usize) -> f64 {
        assert!(
            step < self.times.len(),
            "step index {} out of range ({} recorded)",
            step,
            self.times.len()
        );
        self.times[step]
    }

    /// Export the observation log as JSON ({"x": [...], "time": [...]}).
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        let mut data: BTreeMap<&str, Vec<Vec<f64>>> = BTreeMap::new();
        data.insert(
            "x",
            self.x_log.iter().map(|x| x.as_slice().to_vec()).collect(),
        );
        data.insert("time", self.times.iter().map(|&t| vec![t]).collect());
        serde_json::to_string_pretty(&data)
    }
}

impl Clone for Integrator {
    /// Duplicates the configuration only; the copy starts with an empty
    /// observation log.
    fn clone(&self) -> Self {
        Self::new(self.dt)
    }
}
