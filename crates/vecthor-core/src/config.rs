use serde::{Deserialize, Serialize};

use crate::aggregate::{BandThresholds, RegimeTable};
use crate::normalize::CalibrationTable;
use crate::VecthorResult;

/// Tunable parameters of the scoring engine. Any section left out of a
/// config document keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub regimes: RegimeTable,
    pub bands: BandThresholds,
    pub calibration: CalibrationTable,
}

impl EngineConfig {
    pub fn validate(&self) -> VecthorResult<()> {
        self.regimes.validate()?;
        self.bands.validate()?;
        self.calibration.validate()
    }
}
