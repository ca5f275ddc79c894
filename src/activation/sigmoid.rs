use serde::{Serialize, Deserialize};

/// Beyond this magnitude the curve is clamped to avoid `exp` overflow.
pub const SATURATION: f64 = 45.0;

/// Steepness-scaled logistic: `1 / (1 + e^(slope * x))`.
///
/// A negative slope gives the usual rising curve; `-1` is the textbook
/// logistic and the network default of `-3` is three times steeper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sigmoid {
    pub slope: f64,
}

impl Sigmoid {
    pub fn new(slope: f64) -> Sigmoid {
        Sigmoid { slope }
    }

    /// Activation for a pre-activation value `x`.
    ///
    /// Saturates to exactly `1.0` above `+45` and `0.0` below `-45`
    /// regardless of slope.
    pub fn function(&self, x: f64) -> f64 {
        if x > SATURATION {
            1.0
        } else if x < -SATURATION {
            0.0
        } else {
            1.0 / (1.0 + (self.slope * x).exp())
        }
    }

    /// Logistic derivative expressed through the activation, `a * (1 - a)`.
    /// This is the factor the error terms use; it ignores the slope.
    pub fn derivative_from_active(active: f64) -> f64 {
        active * (1.0 - active)
    }
}

impl Default for Sigmoid {
    fn default() -> Self {
        Sigmoid { slope: -3.0 }
    }
}
