//! Financial-statement record for one company-year.
//!
//! [`FinancialInput`] is the wire shape handed over by the extraction layer:
//! every field is optional and read leniently. [`FinancialRecord`] is the
//! immutable, normalised form the calculators read from, with totals,
//! working capital and quick assets derived once at construction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::esg::{EsgInputs, PillarWeights};
use crate::math::{checked_diff, checked_sum};
use crate::types::Money;

/// SIC major groups 20–39 form Division D (Manufacturing).
const SIC_MANUFACTURING: std::ops::RangeInclusive<u32> = 2000..=3999;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Raw financial figures as received from the caller.
///
/// Required numerics default to zero when the key is missing; a key that is
/// present but `null` or non-numeric is undefined, so only the metrics that
/// need it become not applicable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialInput {
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub total_current_assets: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub total_non_current_assets: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub inventories: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub total_current_liabilities: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub total_non_current_liabilities: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub retained_earnings: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub ebit: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub revenue: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub total_equity: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub net_income: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub interest_expense: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub tangible_fixed_assets: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub operating_cash_flow: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub market_capitalization: Option<Money>,
    #[serde(default = "lenient::zero", deserialize_with = "lenient::decimal")]
    pub depreciation: Option<Money>,

    // Optional figures
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub quick_assets: Option<Money>,
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub net_income_t_minus_1: Option<Money>,
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub dscr_cash_flow: Option<Money>,
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub dscr_debt_service: Option<Money>,
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub gnp_price_level_index: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub total_debt: Option<Money>,

    // Company profile
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub sic: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub industry_sector: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_publicly_listed: bool,

    // ESG
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub esg_rating: Option<String>,
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub esg_score_e: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub esg_score_s: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub esg_score_g: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::decimal", skip_serializing_if = "Option::is_none")]
    pub esg_overall: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esg_pillar_weights: Option<PillarWeights>,

    // Identity
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::year", skip_serializing_if = "Option::is_none")]
    pub fiscal_year: Option<i32>,
}

/// Matches an empty JSON object: required numerics at zero, everything else
/// undefined.
impl Default for FinancialInput {
    fn default() -> Self {
        let zero = lenient::zero();
        FinancialInput {
            total_current_assets: zero,
            total_non_current_assets: zero,
            inventories: zero,
            total_current_liabilities: zero,
            total_non_current_liabilities: zero,
            retained_earnings: zero,
            ebit: zero,
            revenue: zero,
            total_equity: zero,
            net_income: zero,
            interest_expense: zero,
            tangible_fixed_assets: zero,
            operating_cash_flow: zero,
            market_capitalization: zero,
            depreciation: zero,
            quick_assets: None,
            net_income_t_minus_1: None,
            dscr_cash_flow: None,
            dscr_debt_service: None,
            gnp_price_level_index: None,
            total_debt: None,
            sic: None,
            industry_sector: None,
            is_publicly_listed: false,
            esg_rating: None,
            esg_score_e: None,
            esg_score_s: None,
            esg_score_g: None,
            esg_overall: None,
            esg_pillar_weights: None,
            country: None,
            company_name: None,
            fiscal_year: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Normalised, read-only company-year snapshot.
///
/// Built once per request from a [`FinancialInput`]; every calculator borrows
/// it immutably. `None` means the figure is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialRecord {
    pub total_current_assets: Option<Money>,
    pub total_non_current_assets: Option<Money>,
    pub inventories: Option<Money>,
    pub total_current_liabilities: Option<Money>,
    pub total_non_current_liabilities: Option<Money>,
    pub retained_earnings: Option<Money>,
    pub ebit: Option<Money>,
    pub revenue: Option<Money>,
    pub total_equity: Option<Money>,
    pub net_income: Option<Money>,
    pub interest_expense: Option<Money>,
    pub tangible_fixed_assets: Option<Money>,
    pub operating_cash_flow: Option<Money>,
    pub market_capitalization: Option<Money>,
    pub depreciation: Option<Money>,
    pub net_income_prior: Option<Money>,
    pub dscr_cash_flow: Option<Money>,
    pub dscr_debt_service: Option<Money>,
    pub gnp_price_level_index: Option<Decimal>,

    // Derived
    pub total_assets: Option<Money>,
    pub total_liabilities: Option<Money>,
    pub working_capital: Option<Money>,
    pub quick_assets: Option<Money>,
    /// Reported total debt, falling back to total liabilities.
    pub total_debt: Option<Money>,

    pub is_publicly_listed: bool,
    pub is_manufacturing: bool,
    pub industry_sector: Option<String>,
    pub esg: EsgInputs,

    pub company_name: Option<String>,
    pub country: Option<String>,
    pub fiscal_year: Option<i32>,
}

impl FinancialRecord {
    /// Normalise the raw input and derive the shared aggregates.
    pub fn from_input(input: &FinancialInput) -> Self {
        let total_assets = checked_sum(input.total_current_assets, input.total_non_current_assets);
        let total_liabilities = checked_sum(
            input.total_current_liabilities,
            input.total_non_current_liabilities,
        );
        let working_capital = checked_diff(input.total_current_assets, input.total_current_liabilities);
        let quick_assets = input
            .quick_assets
            .or_else(|| checked_diff(input.total_current_assets, input.inventories));

        // Market value is meaningless for an unlisted company.
        let market_capitalization = if input.is_publicly_listed {
            input.market_capitalization
        } else {
            Some(Decimal::ZERO)
        };

        FinancialRecord {
            total_current_assets: input.total_current_assets,
            total_non_current_assets: input.total_non_current_assets,
            inventories: input.inventories,
            total_current_liabilities: input.total_current_liabilities,
            total_non_current_liabilities: input.total_non_current_liabilities,
            retained_earnings: input.retained_earnings,
            ebit: input.ebit,
            revenue: input.revenue,
            total_equity: input.total_equity,
            net_income: input.net_income,
            interest_expense: input.interest_expense,
            tangible_fixed_assets: input.tangible_fixed_assets,
            operating_cash_flow: input.operating_cash_flow,
            market_capitalization,
            depreciation: input.depreciation,
            net_income_prior: input.net_income_t_minus_1,
            dscr_cash_flow: input.dscr_cash_flow,
            dscr_debt_service: input.dscr_debt_service,
            gnp_price_level_index: input.gnp_price_level_index,
            total_assets,
            total_liabilities,
            working_capital,
            quick_assets,
            total_debt: input.total_debt.or(total_liabilities),
            is_publicly_listed: input.is_publicly_listed,
            is_manufacturing: is_manufacturing(input.industry_sector.as_deref(), input.sic.as_deref()),
            industry_sector: input.industry_sector.clone(),
            esg: EsgInputs {
                rating: input.esg_rating.clone(),
                environmental: input.esg_score_e,
                social: input.esg_score_s,
                governance: input.esg_score_g,
                overall: input.esg_overall,
                pillar_weights: input.esg_pillar_weights.clone(),
            },
            company_name: input.company_name.clone(),
            country: input.country.clone(),
            fiscal_year: input.fiscal_year,
        }
    }
}

impl From<&FinancialInput> for FinancialRecord {
    fn from(input: &FinancialInput) -> Self {
        FinancialRecord::from_input(input)
    }
}

/// A declared sector wins; the SIC code is consulted only when no sector is
/// given.
fn is_manufacturing(sector: Option<&str>, sic: Option<&str>) -> bool {
    if let Some(sector) = sector {
        return sector.trim().eq_ignore_ascii_case("manufacturing");
    }
    sic.and_then(|code| code.trim().parse::<u32>().ok())
        .map(|code| SIC_MANUFACTURING.contains(&code))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Lenient field readers
// ---------------------------------------------------------------------------

/// Serde helpers that never reject a field because of its type: anything
/// that cannot be read becomes undefined.
pub(crate) mod lenient {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use std::str::FromStr;

    pub fn zero() -> Option<Decimal> {
        Some(Decimal::ZERO)
    }

    pub fn decimal<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Decimal>, D::Error> {
        Ok(to_decimal(&Value::deserialize(d)?))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::String(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "true" | "yes" | "y" | "1" | "public"
            ),
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            _ => false,
        })
    }

    pub fn year<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        Ok(to_decimal(&Value::deserialize(d)?)
            .filter(|y| y.fract().is_zero())
            .and_then(|y| y.to_i32()))
    }

    fn to_decimal(value: &Value) -> Option<Decimal> {
        match value {
            Value::Number(n) => parse(&n.to_string()),
            Value::String(s) => {
                let cleaned: String = s.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
                parse(&cleaned)
            }
            _ => None,
        }
    }

    fn parse(s: &str) -> Option<Decimal> {
        if s.is_empty() {
            return None;
        }
        Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
