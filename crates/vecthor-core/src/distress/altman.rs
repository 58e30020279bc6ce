use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::financials::FinancialRecord;
use super::classify_zone;
use crate::math::safe_div;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which published Z-Score formula applies to the company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltmanVariant {
    /// Original Z: listed manufacturer, market-value leverage term.
    PublicManufacturing,
    /// Z'': listed non-manufacturer, four terms, no asset turnover.
    PublicNonManufacturing,
    /// Z': unlisted company, book-equity leverage term.
    Private,
}

impl AltmanVariant {
    pub fn select(is_publicly_listed: bool, is_manufacturing: bool) -> Self {
        match (is_publicly_listed, is_manufacturing) {
            (true, true) => AltmanVariant::PublicManufacturing,
            (true, false) => AltmanVariant::PublicNonManufacturing,
            (false, _) => AltmanVariant::Private,
        }
    }

    /// (distress_upper_bound, safe_lower_bound)
    pub fn zone_thresholds(&self) -> (Decimal, Decimal) {
        match self {
            AltmanVariant::PublicManufacturing => (Z_DISTRESS, Z_SAFE),
            AltmanVariant::PublicNonManufacturing => (ZPP_DISTRESS, ZPP_SAFE),
            AltmanVariant::Private => (ZP_DISTRESS, ZP_SAFE),
        }
    }
}

impl std::fmt::Display for AltmanVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PublicManufacturing => write!(f, "Original Z-Score"),
            Self::PublicNonManufacturing => write!(f, "Z''-Score (Non-Manufacturing)"),
            Self::Private => write!(f, "Z'-Score (Private)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZScoreZone {
    Safe,
    Grey,
    Distress,
}

impl std::fmt::Display for ZScoreZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Safe => write!(f, "Safe"),
            Self::Grey => write!(f, "Grey Zone"),
            Self::Distress => write!(f, "Distress"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScoreComponent {
    pub name: String,
    pub ratio: Decimal,
    pub coefficient: Decimal,
    pub weighted_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltmanScore {
    pub variant: AltmanVariant,
    pub model: String,
    pub score: Decimal,
    pub zone: ZScoreZone,
    pub components: Vec<ZScoreComponent>,
    /// (distress_upper_bound, safe_lower_bound)
    pub zone_thresholds: (Decimal, Decimal),
}

// ---------------------------------------------------------------------------
// Coefficients
// ---------------------------------------------------------------------------

// Original Z-Score (public manufacturing)
const Z_COEFF_X1: Decimal = dec!(1.2);
const Z_COEFF_X2: Decimal = dec!(1.4);
const Z_COEFF_X3: Decimal = dec!(3.3);
const Z_COEFF_X4: Decimal = dec!(0.6);
const Z_COEFF_X5: Decimal = dec!(1.0);

// Z'-Score (private companies)
const ZP_COEFF_X1: Decimal = dec!(0.717);
const ZP_COEFF_X2: Decimal = dec!(0.847);
const ZP_COEFF_X3: Decimal = dec!(3.107);
const ZP_COEFF_X4: Decimal = dec!(0.420);
const ZP_COEFF_X5: Decimal = dec!(0.998);

// Z''-Score (public non-manufacturing)
const ZPP_COEFF_X1: Decimal = dec!(6.56);
const ZPP_COEFF_X2: Decimal = dec!(3.26);
const ZPP_COEFF_X3: Decimal = dec!(6.72);
const ZPP_COEFF_X4: Decimal = dec!(1.05);

// Zone thresholds
const Z_SAFE: Decimal = dec!(2.99);
const Z_DISTRESS: Decimal = dec!(1.81);

const ZP_SAFE: Decimal = dec!(2.90);
const ZP_DISTRESS: Decimal = dec!(1.23);

const ZPP_SAFE: Decimal = dec!(2.60);
const ZPP_DISTRESS: Decimal = dec!(1.10);

const X1_LABEL: &str = "X1: Working Capital / Total Assets";
const X2_LABEL: &str = "X2: Retained Earnings / Total Assets";
const X3_LABEL: &str = "X3: EBIT / Total Assets";
const X4_MARKET_LABEL: &str = "X4: Market Cap / Total Liabilities";
const X4_BOOK_LABEL: &str = "X4': Book Equity / Total Liabilities";
const X5_LABEL: &str = "X5: Revenue / Total Assets";

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Altman Z-Score for the variant matching the company profile.
///
/// Undefined when total assets or total liabilities is zero, or when any
/// input the selected variant reads is undefined.
pub fn calculate_altman(record: &FinancialRecord) -> Option<AltmanScore> {
    let variant = AltmanVariant::select(record.is_publicly_listed, record.is_manufacturing);

    let ta = record.total_assets?;
    let tl = record.total_liabilities?;

    let x1 = safe_div(record.working_capital?, ta)?;
    let x2 = safe_div(record.retained_earnings?, ta)?;
    let x3 = safe_div(record.ebit?, ta)?;

    let components = match variant {
        AltmanVariant::PublicManufacturing => {
            let x4 = safe_div(record.market_capitalization?, tl)?;
            let x5 = safe_div(record.revenue?, ta)?;
            vec![
                build_component(X1_LABEL, x1, Z_COEFF_X1)?,
                build_component(X2_LABEL, x2, Z_COEFF_X2)?,
                build_component(X3_LABEL, x3, Z_COEFF_X3)?,
                build_component(X4_MARKET_LABEL, x4, Z_COEFF_X4)?,
                build_component(X5_LABEL, x5, Z_COEFF_X5)?,
            ]
        }
        AltmanVariant::PublicNonManufacturing => {
            let x4 = safe_div(record.total_equity?, tl)?;
            vec![
                build_component(X1_LABEL, x1, ZPP_COEFF_X1)?,
                build_component(X2_LABEL, x2, ZPP_COEFF_X2)?,
                build_component(X3_LABEL, x3, ZPP_COEFF_X3)?,
                build_component(X4_BOOK_LABEL, x4, ZPP_COEFF_X4)?,
            ]
        }
        AltmanVariant::Private => {
            let x4 = safe_div(record.total_equity?, tl)?;
            let x5 = safe_div(record.revenue?, ta)?;
            vec![
                build_component(X1_LABEL, x1, ZP_COEFF_X1)?,
                build_component(X2_LABEL, x2, ZP_COEFF_X2)?,
                build_component(X3_LABEL, x3, ZP_COEFF_X3)?,
                build_component(X4_BOOK_LABEL, x4, ZP_COEFF_X4)?,
                build_component(X5_LABEL, x5, ZP_COEFF_X5)?,
            ]
        }
    };

    let score = components
        .iter()
        .try_fold(Decimal::ZERO, |acc, c| acc.checked_add(c.weighted_value))?;
    let (distress_upper, safe_lower) = variant.zone_thresholds();

    Some(AltmanScore {
        variant,
        model: variant.to_string(),
        score,
        zone: classify_zone(score, distress_upper, safe_lower),
        components,
        zone_thresholds: (distress_upper, safe_lower),
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn build_component(name: &str, ratio: Decimal, coefficient: Decimal) -> Option<ZScoreComponent> {
    Some(ZScoreComponent {
        name: name.to_string(),
        ratio,
        coefficient,
        weighted_value: coefficient.checked_mul(ratio)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
