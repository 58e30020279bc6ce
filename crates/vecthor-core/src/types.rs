use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates and risk values expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Multiples and scores (e.g., 1.5x current ratio, 2.3 Z-Score)
pub type Multiple = Decimal;

/// Rendering of a metric that could not be computed.
pub const NOT_APPLICABLE: &str = "N/A";

/// Outcome of a single ratio or distress model.
///
/// A metric that cannot be computed (zero denominator, missing input,
/// logarithm of a non-positive number) is `NotApplicable`. It has no numeric
/// meaning and is never folded into arithmetic or medians.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    Value(Decimal),
    #[default]
    NotApplicable,
}

impl Metric {
    /// Build a metric from an optional raw value, rounding defined values to
    /// `dp` decimal places.
    pub fn rounded(value: Option<Decimal>, dp: u32) -> Self {
        match value {
            Some(v) => Metric::Value(v.round_dp(dp)),
            None => Metric::NotApplicable,
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Metric::Value(_))
    }
}

impl From<Option<Decimal>> for Metric {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Metric::NotApplicable, Metric::Value)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{v}"),
            Metric::NotApplicable => write!(f, "{NOT_APPLICABLE}"),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => Serialize::serialize(v, serializer),
            Metric::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Value(Decimal),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Value(v) => Ok(Metric::Value(v)),
            Repr::Text(s) if s == NOT_APPLICABLE => Ok(Metric::NotApplicable),
            Repr::Text(s) => Err(serde::de::Error::custom(format!(
                "expected a decimal or \"{NOT_APPLICABLE}\", got \"{s}\""
            ))),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
