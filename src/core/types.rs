use serde::{Deserialize, Serialize};

use super::parse::{parse_float_prefix, parse_int_prefix};

pub const DEFAULT_RETIREMENT_AGE: u32 = 60;
pub const DEFAULT_ANNUITY_PERCENT: f64 = 40.0;
pub const DEFAULT_ANNUITY_RATE_PERCENT: f64 = 6.0;

/// Ages above this are read as this, bounding the horizon at a century.
pub const MAX_AGE: u32 = 100;
pub const MAX_ANNUAL_RETURN_PERCENT: f64 = 100.0;
pub const MIN_ANNUITY_PERCENT: f64 = 40.0;
pub const MAX_ANNUITY_PERCENT: f64 = 100.0;
pub const MIN_ANNUITY_RATE_PERCENT: f64 = 1.0;
pub const MAX_ANNUITY_RATE_PERCENT: f64 = 15.0;

/// Annuity percentages offered by the calculator page.
pub const ANNUITY_PERCENT_CHOICES: [u32; 13] = [40, 45, 50, 55, 60, 65, 70, 75, 80, 85, 90, 95, 100];

/// A single raw form field: a JSON number, or text as typed by the user.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FormValue::Number(v) => Some(*v).filter(|v| v.is_finite()),
            FormValue::Text(text) => parse_float_prefix(text),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FormValue::Number(v) if v.is_finite() => Some(v.trunc() as i64),
            FormValue::Number(_) => None,
            FormValue::Text(text) => parse_int_prefix(text),
        }
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        FormValue::Number(value)
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

/// Raw calculator form state. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectionForm {
    pub monthly_investment: Option<FormValue>,
    pub expected_return: Option<FormValue>,
    pub start_age: Option<FormValue>,
    pub retirement_age: Option<FormValue>,
    pub annuity_percent: Option<FormValue>,
    pub annuity_rate: Option<FormValue>,
}

impl ProjectionForm {
    /// The state the calculator page opens with.
    pub fn defaults() -> Self {
        Self {
            monthly_investment: None,
            expected_return: None,
            start_age: None,
            retirement_age: Some(FormValue::Number(f64::from(DEFAULT_RETIREMENT_AGE))),
            annuity_percent: Some(FormValue::Number(DEFAULT_ANNUITY_PERCENT)),
            annuity_rate: Some(FormValue::Number(DEFAULT_ANNUITY_RATE_PERCENT)),
        }
    }

    /// Coerces the raw fields into a sanitized input. Zero, missing and
    /// unparseable values all fall back to the field's default.
    pub fn to_input(&self) -> ProjectionInput {
        ProjectionInput {
            monthly_contribution: float_or(self.monthly_investment.as_ref(), 0.0),
            annual_return_percent: float_or(self.expected_return.as_ref(), 0.0),
            start_age: age_or(self.start_age.as_ref(), 0),
            retirement_age: age_or(self.retirement_age.as_ref(), DEFAULT_RETIREMENT_AGE),
            annuity_percent: float_or(self.annuity_percent.as_ref(), DEFAULT_ANNUITY_PERCENT),
            annuity_annual_rate_percent: float_or(self.annuity_rate.as_ref(), 0.0),
        }
        .sanitized()
    }
}

fn float_or(value: Option<&FormValue>, default: f64) -> f64 {
    value
        .and_then(FormValue::as_float)
        .filter(|v| *v != 0.0)
        .unwrap_or(default)
}

fn age_or(value: Option<&FormValue>, default: u32) -> u32 {
    match value.and_then(FormValue::as_int) {
        Some(0) | None => default,
        Some(age) => u32::try_from(age.clamp(0, i64::from(MAX_AGE))).unwrap_or(MAX_AGE),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInput {
    pub monthly_contribution: f64,
    pub annual_return_percent: f64,
    pub start_age: u32,
    pub retirement_age: u32,
    pub annuity_percent: f64,
    /// Zero means no payout rate was given; otherwise within [1, 15].
    pub annuity_annual_rate_percent: f64,
}

impl ProjectionInput {
    /// Clamps every field into its documented range.
    pub fn sanitized(self) -> Self {
        let monthly_contribution = if self.monthly_contribution.is_finite() {
            self.monthly_contribution.max(0.0)
        } else {
            0.0
        };
        let annual_return_percent = if self.annual_return_percent.is_nan() {
            0.0
        } else {
            self.annual_return_percent
                .clamp(0.0, MAX_ANNUAL_RETURN_PERCENT)
        };
        let annuity_percent = if self.annuity_percent.is_nan() {
            DEFAULT_ANNUITY_PERCENT
        } else {
            self.annuity_percent
                .clamp(MIN_ANNUITY_PERCENT, MAX_ANNUITY_PERCENT)
        };
        let annuity_annual_rate_percent = if self.annuity_annual_rate_percent > 0.0 {
            self.annuity_annual_rate_percent
                .clamp(MIN_ANNUITY_RATE_PERCENT, MAX_ANNUITY_RATE_PERCENT)
        } else {
            0.0
        };

        Self {
            monthly_contribution,
            annual_return_percent,
            start_age: self.start_age.min(MAX_AGE),
            retirement_age: self.retirement_age.min(MAX_AGE),
            annuity_percent,
            annuity_annual_rate_percent,
        }
    }

    pub fn years(&self) -> u32 {
        self.retirement_age.saturating_sub(self.start_age)
    }

    pub fn months(&self) -> u64 {
        u64::from(self.years()) * 12
    }
}

/// Projection outputs rounded to whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub total_invested: i64,
    /// Negative when the zero-return guard zeroes the maturity amount.
    pub interest_earned: i64,
    pub maturity_amount: i64,
    pub lump_sum: i64,
    pub annuity_value: i64,
    pub estimated_monthly_pension: i64,
}
