//! Muscle force models.

/// Width of the active force-length Gaussian (dimensionless).
const FORCE_LENGTH_WIDTH: f64 = 0.45;
/// Passive force-length exponent.
const PASSIVE_EXPONENT: f64 = 4.0;
/// Passive strain at one normalized force.
const PASSIVE_STRAIN: f64 = 0.6;
/// Force-velocity curvature of the shortening hyperbola.
const FV_CURVATURE: f64 = 0.25;
/// Eccentric force plateau multiplier.
const FV_ECCENTRIC_GAIN: f64 = 1.8;

/// Constant mechanical characteristics of one muscle.
#[derive(Debug, Clone)]
pub struct MuscleCharacteristics {
    /// Optimal fiber length (m), where active force peaks.
    pub optimal_length: f64,
    /// Maximal isometric force (N).
    pub force_iso_max: f64,
    /// Maximal contraction velocity, in optimal lengths per second.
    pub max_contraction_velocity: f64,
}

impl MuscleCharacteristics {
    /// Create characteristics with the default maximal contraction velocity
    /// of 10 optimal lengths per second.
    pub fn new(optimal_length: f64, force_iso_max: f64) -> Self {
        Self {
            optimal_length,
            force_iso_max,
            max_contraction_velocity: 10.0,
        }
    }

    /// Set the maximal contraction velocity (optimal lengths per second).
    pub fn with_max_contraction_velocity(mut self, v: f64) -> Self {
        self.max_contraction_velocity = v;
        self
    }
}

/// How a muscle converts activation and cached geometry into a scalar force.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceModel {
    /// Idealized actuator: F = a · F_iso_max, geometry-independent.
    Idealized,
    /// Rigid-tendon Hill model: active force-length Gaussian, exponential
    /// passive element and hyperbolic force-velocity scaling.
    Hill,
}

impl ForceModel {
    /// Scalar musculotendon force.
    ///
    /// `length` and `velocity` are the cached path quantities; an absent
    /// velocity is treated as an isometric contraction.
    pub fn force(
        &self,
        characteristics: &MuscleCharacteristics,
        activation: f64,
        length: f64,
        velocity: Option<f64>,
    ) -> f64 {
        let a = activation.clamp(0.0, 1.0);
        match self {
            ForceModel::Idealized => characteristics.force_iso_max * a,
            ForceModel::Hill => {
                let l_norm = length / characteristics.optimal_length;
                let v_norm = velocity.unwrap_or(0.0)
                    / (characteristics.max_contraction_velocity * characteristics.optimal_length);

                let fl = (-(l_norm - 1.0).powi(2) / FORCE_LENGTH_WIDTH).exp();
                let fpe = passive_force(l_norm);
                let fv = force_velocity(v_norm);

                (characteristics.force_iso_max * (a * fl * fv + fpe)).max(0.0)
            }
        }
    }
}

/// Exponential passive element, zero below optimal length.
fn passive_force(l_norm: f64) -> f64 {
    if l_norm <= 1.0 {
        return 0.0;
    }
    ((PASSIVE_EXPONENT * (l_norm - 1.0) / PASSIVE_STRAIN).exp() - 1.0)
        / (PASSIVE_EXPONENT.exp() - 1.0)
}

/// Hill hyperbola on the shortening side, saturating plateau on the
/// eccentric side. v_norm < 0 is shortening.
fn force_velocity(v_norm: f64) -> f64 {
    if v_norm <= 0.0 {
        if v_norm <= -1.0 {
            0.0
        } else {
            (1.0 + v_norm) / (1.0 - v_norm / FV_CURVATURE)
        }
    } else {
        (1.0 + FV_ECCENTRIC_GAIN * v_norm) / (1.0 + v_norm)
    }
}
