pub mod aggregate;
pub mod assessment;
pub mod config;
pub mod distress;
pub mod error;
pub mod esg;
pub mod financials;
pub mod math;
pub mod ml;
pub mod normalize;
pub mod ratios;
pub mod types;

pub use assessment::{assess_risk, RiskAssessment, RiskAssessmentInput};
pub use config::EngineConfig;
pub use error::VecthorError;
pub use financials::{FinancialInput, FinancialRecord};
pub use ml::MlSignal;
pub use types::*;

/// Standard result type for all vecthor operations
pub type VecthorResult<T> = Result<T, VecthorError>;
