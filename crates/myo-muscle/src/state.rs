//! Muscle dynamic state — excitation and activation.

/// Activation time constant (s).
const TAU_ACTIVATION: f64 = 0.01;
/// Deactivation time constant (s).
const TAU_DEACTIVATION: f64 = 0.04;
/// Activation floor keeping the dynamics well-conditioned near zero.
const MIN_ACTIVATION: f64 = 0.01;

/// Dynamic state of one muscle: neural excitation driving activation
/// through first-order dynamics with activation-dependent time constants.
#[derive(Debug, Clone)]
pub struct MuscleState {
    /// Neural excitation (input of the activation dynamics).
    pub excitation: f64,
    /// Activation (output of the activation dynamics), canonically in [0, 1].
    pub activation: f64,
    /// Scale of raw excitation values; used when inputs are not normalized.
    pub excitation_max: f64,
}

impl MuscleState {
    /// Create a state with the given excitation and activation.
    pub fn new(excitation: f64, activation: f64) -> Self {
        Self {
            excitation,
            activation,
            excitation_max: 1.0,
        }
    }

    /// Set the raw excitation scale used by non-normalized inputs.
    pub fn with_excitation_max(mut self, excitation_max: f64) -> Self {
        self.excitation_max = excitation_max;
        self
    }

    /// Time derivative of activation under first-order dynamics.
    ///
    /// Rising excitation acts on the fast time constant scaled by
    /// (0.5 + 1.5a); falling excitation on the slow one divided by it.
    /// With `already_normalized` false, excitation is first rescaled by
    /// `excitation_max` into the canonical [0, 1] range.
    pub fn activation_dot(&self, already_normalized: bool) -> f64 {
        let e = if already_normalized {
            self.excitation
        } else {
            self.excitation / self.excitation_max
        }
        .clamp(0.0, 1.0);

        let a = self.activation.max(MIN_ACTIVATION);
        let num = e - a;
        let denom = if num > 0.0 {
            TAU_ACTIVATION * (0.5 + 1.5 * a)
        } else {
            TAU_DEACTIVATION / (0.5 + 1.5 * a)
        };
        num / denom
    }
}

impl Default for MuscleState {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
