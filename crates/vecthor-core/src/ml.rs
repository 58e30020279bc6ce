use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::VecthorError;
use crate::types::Rate;
use crate::VecthorResult;

/// Exact 0 and 1 are pulled inward by this much.
pub const PROBABILITY_EPSILON: Decimal = dec!(0.000001);

/// Default-probability estimate produced by an external predictive model.
///
/// The engine never looks inside the model; it only needs the probability
/// and whether it came from the calibrated variant, which selects the
/// weighting regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MlSignal {
    pub probability: Rate,
    #[serde(default)]
    pub is_calibrated: bool,
}

impl MlSignal {
    pub fn new(probability: Rate, is_calibrated: bool) -> Self {
        MlSignal {
            probability,
            is_calibrated,
        }
    }

    /// Probability checked against [0,1], with the boundaries nudged inward.
    pub fn risk(&self) -> VecthorResult<Rate> {
        let p = self.probability;
        if p < Decimal::ZERO || p > Decimal::ONE {
            return Err(VecthorError::InvalidInput {
                field: "ml_signal.probability".into(),
                reason: format!("probability must lie in [0, 1] (got {p})"),
            });
        }
        Ok(p.max(PROBABILITY_EPSILON).min(Decimal::ONE - PROBABILITY_EPSILON))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_probability_unchanged() {
        assert_eq!(MlSignal::new(dec!(0.42), true).risk().unwrap(), dec!(0.42));
    }

    #[test]
    fn test_boundaries_nudged_inward() {
        assert_eq!(MlSignal::new(Decimal::ZERO, false).risk().unwrap(), dec!(0.000001));
        assert_eq!(MlSignal::new(Decimal::ONE, false).risk().unwrap(), dec!(0.999999));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(MlSignal::new(dec!(1.2), true).risk().is_err());
        assert!(MlSignal::new(dec!(-0.01), true).risk().is_err());
    }

    #[test]
    fn test_calibrated_flag_defaults_to_false() {
        let s: MlSignal = serde_json::from_str(r#"{"probability": 0.3}"#).unwrap();
        assert!(!s.is_calibrated);
    }
}
