//! Input validation for raw calculator payloads.
//!
//! Fields are checked in a fixed order and the first failure is returned, so
//! the same payload always reports the same field.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::pricing::models::{ContractLength, PricingInput, SupportTier};

pub const CURRENT_PRICE: &str = "currentPrice";
pub const CUSTOMERS: &str = "customers";
pub const CHURN_RATE: &str = "churnRate";
pub const COMPETITOR_PRICE: &str = "competitorPrice";
pub const CAC: &str = "cac";
pub const FEATURES: &str = "features";
pub const GROWTH_RATE: &str = "growthRate";
pub const SUPPORT_TIER: &str = "supportTier";
pub const CONTRACT_LENGTH: &str = "contractLength";

/// Upper bound for monetary inputs
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;
pub const MAX_CUSTOMERS: u64 = 1_000_000_000;
pub const MAX_FEATURES: u64 = 1_000;
/// Upper bound for the monthly growth percentage
pub const MAX_GROWTH_RATE: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    Required,
    MustBePositive,
    MustBeNonNegative,
    MustBeInteger,
    OutOfRange,
    InvalidEnum,
}

impl ValidationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MustBePositive => "must_be_positive",
            Self::MustBeNonNegative => "must_be_non_negative",
            Self::MustBeInteger => "must_be_integer",
            Self::OutOfRange => "out_of_range",
            Self::InvalidEnum => "invalid_enum",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

/// Validate and normalize a raw calculator payload.
///
/// Numbers may arrive as JSON numbers or numeric strings. `null`, an empty
/// string and an absent key all count as missing. A payload that is not an
/// object is treated as an empty object.
pub fn validate(raw: &Value) -> Result<PricingInput, ValidationError> {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    let current_price = required_number(fields, CURRENT_PRICE)?;
    ensure_positive_amount(CURRENT_PRICE, current_price)?;

    let customers = required_count(fields, CUSTOMERS, MAX_CUSTOMERS)?;

    let churn_rate = required_number(fields, CHURN_RATE)?;
    if !(0.0..=100.0).contains(&churn_rate) {
        return Err(ValidationError::new(CHURN_RATE, ValidationReason::OutOfRange));
    }

    let competitor_price = optional_number(fields, COMPETITOR_PRICE)?;
    if let Some(price) = competitor_price {
        ensure_positive_amount(COMPETITOR_PRICE, price)?;
    }

    let cac = optional_number(fields, CAC)?;
    if let Some(cost) = cac {
        ensure_positive_amount(CAC, cost)?;
    }

    let features = required_count(fields, FEATURES, MAX_FEATURES)?;

    let growth_rate = required_number(fields, GROWTH_RATE)?;
    if growth_rate < 0.0 {
        return Err(ValidationError::new(GROWTH_RATE, ValidationReason::MustBeNonNegative));
    }
    if growth_rate > MAX_GROWTH_RATE {
        return Err(ValidationError::new(GROWTH_RATE, ValidationReason::OutOfRange));
    }

    let support_tier = enum_field(fields, SUPPORT_TIER, SupportTier::parse)?;
    let contract_length = enum_field(fields, CONTRACT_LENGTH, ContractLength::parse)?;

    Ok(PricingInput {
        current_price,
        customers,
        churn_rate,
        competitor_price,
        cac,
        features,
        growth_rate,
        support_tier,
        contract_length,
    })
}

/// Outcome of reading one numeric field
enum NumberField {
    Missing,
    Invalid,
    Finite(f64),
}

fn read_number(fields: &Map<String, Value>, name: &str) -> NumberField {
    match fields.get(name) {
        None | Some(Value::Null) => NumberField::Missing,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) if v.is_finite() => NumberField::Finite(v),
            _ => NumberField::Invalid,
        },
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return NumberField::Missing;
            }
            match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => NumberField::Finite(v),
                _ => NumberField::Invalid,
            }
        }
        Some(_) => NumberField::Invalid,
    }
}

fn required_number(fields: &Map<String, Value>, name: &'static str) -> Result<f64, ValidationError> {
    match read_number(fields, name) {
        NumberField::Finite(v) => Ok(v),
        NumberField::Missing | NumberField::Invalid => {
            Err(ValidationError::new(name, ValidationReason::Required))
        }
    }
}

fn optional_number(
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<f64>, ValidationError> {
    match read_number(fields, name) {
        NumberField::Missing => Ok(None),
        NumberField::Finite(v) => Ok(Some(v)),
        NumberField::Invalid => Err(ValidationError::new(name, ValidationReason::Required)),
    }
}

fn required_count(
    fields: &Map<String, Value>,
    name: &'static str,
    max: u64,
) -> Result<u64, ValidationError> {
    let value = required_number(fields, name)?;

    if value < 0.0 {
        return Err(ValidationError::new(name, ValidationReason::MustBeNonNegative));
    }
    if value.fract() != 0.0 {
        return Err(ValidationError::new(name, ValidationReason::MustBeInteger));
    }
    if value > max as f64 {
        return Err(ValidationError::new(name, ValidationReason::OutOfRange));
    }

    Ok(value as u64)
}

fn ensure_positive_amount(name: &'static str, value: f64) -> Result<(), ValidationError> {
    if value <= 0.0 {
        return Err(ValidationError::new(name, ValidationReason::MustBePositive));
    }
    if value > MAX_AMOUNT {
        return Err(ValidationError::new(name, ValidationReason::OutOfRange));
    }
    Ok(())
}

fn enum_field<T: Default>(
    fields: &Map<String, Value>,
    name: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, ValidationError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(T::default()),
        Some(Value::String(s)) => {
            parse(s).ok_or_else(|| ValidationError::new(name, ValidationReason::InvalidEnum))
        }
        Some(_) => Err(ValidationError::new(name, ValidationReason::InvalidEnum)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "currentPrice": 99,
            "customers": 100,
            "churnRate": 5,
            "competitorPrice": 120,
            "cac": 300,
            "features": 3,
            "growthRate": 10,
            "supportTier": "standard",
            "contractLength": "monthly"
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut payload = valid_payload();
        payload[field] = value;
        payload
    }

    fn without(field: &str) -> Value {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove(field);
        payload
    }

    #[test]
    fn test_valid_payload() {
        let input = validate(&valid_payload()).unwrap();
        assert_eq!(input.current_price, 99.0);
        assert_eq!(input.customers, 100);
        assert_eq!(input.churn_rate, 5.0);
        assert_eq!(input.competitor_price, Some(120.0));
        assert_eq!(input.cac, Some(300.0));
        assert_eq!(input.features, 3);
        assert_eq!(input.growth_rate, 10.0);
        assert_eq!(input.support_tier, SupportTier::Standard);
        assert_eq!(input.contract_length, ContractLength::Monthly);
    }

    #[test]
    fn test_numeric_strings_from_form_fields() {
        let payload = json!({
            "currentPrice": " 49.5 ",
            "customers": "12",
            "churnRate": "2.5",
            "competitorPrice": "",
            "features": "4",
            "growthRate": "0",
            "supportTier": "Premium",
        });

        let input = validate(&payload).unwrap();
        assert_eq!(input.current_price, 49.5);
        assert_eq!(input.customers, 12);
        assert_eq!(input.competitor_price, None);
        assert_eq!(input.cac, None);
        assert_eq!(input.support_tier, SupportTier::Premium);
        assert_eq!(input.contract_length, ContractLength::Monthly);
    }

    #[test]
    fn test_negative_churn_is_out_of_range() {
        let err = validate(&with("churnRate", json!(-5))).unwrap_err();
        assert_eq!(err, ValidationError::new("churnRate", ValidationReason::OutOfRange));

        let err = validate(&with("churnRate", json!(100.5))).unwrap_err();
        assert_eq!(err.reason, ValidationReason::OutOfRange);
    }

    #[test]
    fn test_churn_bounds_are_inclusive() {
        assert!(validate(&with("churnRate", json!(0))).is_ok());
        assert!(validate(&with("churnRate", json!(100))).is_ok());
    }

    #[test]
    fn test_unknown_support_tier_is_invalid_enum() {
        let err = validate(&with("supportTier", json!("gold"))).unwrap_err();
        assert_eq!(err, ValidationError::new("supportTier", ValidationReason::InvalidEnum));

        let err = validate(&with("contractLength", json!(12))).unwrap_err();
        assert_eq!(err, ValidationError::new("contractLength", ValidationReason::InvalidEnum));
    }

    #[test]
    fn test_enum_defaults() {
        let mut payload = without("supportTier");
        payload["contractLength"] = Value::Null;

        let input = validate(&payload).unwrap();
        assert_eq!(input.support_tier, SupportTier::Standard);
        assert_eq!(input.contract_length, ContractLength::Monthly);
    }

    #[test]
    fn test_price_must_be_positive() {
        let err = validate(&with("currentPrice", json!(0))).unwrap_err();
        assert_eq!(err, ValidationError::new("currentPrice", ValidationReason::MustBePositive));

        let err = validate(&with("cac", json!(-1))).unwrap_err();
        assert_eq!(err, ValidationError::new("cac", ValidationReason::MustBePositive));
    }

    #[test]
    fn test_missing_or_non_numeric_is_required() {
        let err = validate(&without("currentPrice")).unwrap_err();
        assert_eq!(err, ValidationError::new("currentPrice", ValidationReason::Required));

        let err = validate(&with("customers", json!("lots"))).unwrap_err();
        assert_eq!(err, ValidationError::new("customers", ValidationReason::Required));

        let err = validate(&with("growthRate", json!("NaN"))).unwrap_err();
        assert_eq!(err, ValidationError::new("growthRate", ValidationReason::Required));

        let err = validate(&with("competitorPrice", json!(true))).unwrap_err();
        assert_eq!(err, ValidationError::new("competitorPrice", ValidationReason::Required));
    }

    #[test]
    fn test_counts_must_be_whole_and_non_negative() {
        let err = validate(&with("customers", json!(-1))).unwrap_err();
        assert_eq!(err, ValidationError::new("customers", ValidationReason::MustBeNonNegative));

        let err = validate(&with("features", json!(2.5))).unwrap_err();
        assert_eq!(err, ValidationError::new("features", ValidationReason::MustBeInteger));

        let err = validate(&with("features", json!(MAX_FEATURES + 1))).unwrap_err();
        assert_eq!(err, ValidationError::new("features", ValidationReason::OutOfRange));
    }

    #[test]
    fn test_first_failing_field_wins() {
        let payload = json!({
            "currentPrice": 10,
            "customers": -3,
            "churnRate": 250,
            "supportTier": "gold"
        });

        let err = validate(&payload).unwrap_err();
        assert_eq!(err.field, "customers");
    }

    #[test]
    fn test_non_object_payload() {
        let err = validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, ValidationError::new("currentPrice", ValidationReason::Required));
    }

    #[test]
    fn test_error_serialization() {
        let err = ValidationError::new("churnRate", ValidationReason::OutOfRange);
        assert_eq!(
            serde_json::to_value(err).unwrap(),
            json!({"field": "churnRate", "reason": "out_of_range"})
        );
        assert_eq!(err.to_string(), "invalid churnRate: out_of_range");
    }
}
