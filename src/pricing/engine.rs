//! Pricing engine: a pure transformation from validated inputs to a report.
//!
//! Undefined figures (division by zero, unbounded lifetime) never surface as
//! NaN or infinity. They are reported as [`Computed::NotApplicable`] and listed
//! in `not_applicable` with the metric that failed.

use chrono::{DateTime, Utc};

use crate::pricing::models::{
    CompetitivePosition, ComputationError, ComputationReason, Computed, MarketPosition, Metric,
    PriceBreakdown, PricingInput, PricingReport, PricingTier, UnitEconomics,
};
use crate::pricing::recommendations;

pub const BASE_PRICE: f64 = 99.0;
pub const PRICE_PER_USER: f64 = 10.0;
pub const FEATURE_STEP: f64 = 0.1;
pub const GROWTH_STEP: f64 = 0.01;
/// Share of the annual price reported as savings on annual contracts
pub const ANNUAL_SAVINGS_RATE: f64 = 0.2;
/// Competitor gap, percent, inside which prices count as at market
pub const MARKET_PARITY_BAND: i64 = 10;

/// Tier ladder as (name, ratio of the monthly price, feature count)
const TIER_LADDER: [(&str, f64, usize); 3] = [
    ("Starter", 0.8, 3),
    ("Professional", 1.5, 6),
    ("Enterprise", 3.0, 10),
];

/// Features in ladder order; each tier includes the first N
const TIER_FEATURES: [&str; 10] = [
    "Pricing dashboard",
    "Up to 3 team seats",
    "Email support",
    "Competitor benchmarking",
    "Unlimited team seats",
    "Priority support",
    "Dedicated success manager",
    "Custom integrations",
    "SSO and audit logs",
    "99.9% uptime SLA",
];

/// Multipliers derived from the inputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multipliers {
    pub feature: f64,
    pub growth: f64,
    pub support: f64,
    pub contract: f64,
}

impl Multipliers {
    pub fn for_input(input: &PricingInput) -> Self {
        Self {
            feature: 1.0 + input.features as f64 * FEATURE_STEP,
            growth: 1.0 + input.growth_rate * GROWTH_STEP,
            support: input.support_tier.multiplier(),
            contract: input.contract_length.discount(),
        }
    }
}

/// Calculate a report stamped with the current time
pub fn calculate(input: &PricingInput) -> PricingReport {
    calculate_at(input, Utc::now())
}

/// Calculate a report with an explicit timestamp.
///
/// Every field except `timestamp` depends on `input` alone.
pub fn calculate_at(input: &PricingInput, timestamp: DateTime<Utc>) -> PricingReport {
    let mut not_applicable = Vec::new();
    let m = Multipliers::for_input(input);

    let user_cost = input.customers as f64 * PRICE_PER_USER;
    let monthly_price =
        round_whole(BASE_PRICE + user_cost * m.feature * m.growth * m.support * m.contract);
    let annual_price = monthly_price.saturating_mul(12);
    let savings = if input.contract_length.is_annual() {
        round_whole(annual_price as f64 * ANNUAL_SAVINGS_RATE)
    } else {
        0
    };

    let price_per_user = collect(
        divide(Metric::PricePerUser, monthly_price as f64, input.customers as f64)
            .map(round_whole),
        &mut not_applicable,
    );

    let breakdown = PriceBreakdown {
        base: BASE_PRICE as i64,
        user_cost: input.customers.saturating_mul(PRICE_PER_USER as u64),
        feature_multiplier: percent_delta(m.feature),
        growth_multiplier: percent_delta(m.growth),
        support_multiplier: percent_delta(m.support),
        contract_discount: percent_delta(m.contract),
    };

    let metrics = input
        .cac
        .map(|cac| unit_economics(input.current_price, input.churn_rate, cac, &mut not_applicable));

    let competitive_position = input
        .competitor_price
        .map(|competitor| competitive_position(input.current_price, competitor));

    let recommendations =
        recommendations::recommend(input, metrics.as_ref(), competitive_position.as_ref());

    PricingReport {
        monthly_price,
        annual_price,
        savings,
        price_per_user,
        breakdown,
        tiers: build_tiers(monthly_price),
        metrics,
        competitive_position,
        recommendations,
        not_applicable,
        timestamp,
    }
}

fn unit_economics(
    current_price: f64,
    churn_rate: f64,
    cac: f64,
    not_applicable: &mut Vec<ComputationError>,
) -> UnitEconomics {
    // Average lifetime in months is 1 / monthly churn
    let ltv = if churn_rate == 0.0 {
        Err(ComputationError::new(Metric::Ltv, ComputationReason::UnboundedLifetime))
    } else {
        divide(Metric::Ltv, current_price, churn_rate / 100.0)
    };

    let ltv_cac_ratio = match ltv {
        Ok(ltv) => divide(Metric::LtvCacRatio, ltv, cac),
        Err(_) => Err(ComputationError::new(
            Metric::LtvCacRatio,
            ComputationReason::DependsOnUndefined,
        )),
    };

    let payback = divide(Metric::PaybackPeriodMonths, cac, current_price);

    UnitEconomics {
        ltv: collect(ltv.and_then(|v| cents(Metric::Ltv, v)), not_applicable),
        ltv_cac_ratio: collect(
            ltv_cac_ratio.and_then(|v| cents(Metric::LtvCacRatio, v)),
            not_applicable,
        ),
        payback_period_months: collect(
            payback.and_then(|v| cents(Metric::PaybackPeriodMonths, v)),
            not_applicable,
        ),
    }
}

fn competitive_position(current_price: f64, competitor_price: f64) -> CompetitivePosition {
    let difference_percent =
        round_whole((current_price - competitor_price) / competitor_price * 100.0);

    let position = if difference_percent < -MARKET_PARITY_BAND {
        MarketPosition::BelowMarket
    } else if difference_percent > MARKET_PARITY_BAND {
        MarketPosition::AboveMarket
    } else {
        MarketPosition::AtMarket
    };

    CompetitivePosition {
        competitor_price,
        difference_percent,
        position,
    }
}

fn build_tiers(monthly_price: i64) -> [PricingTier; 3] {
    TIER_LADDER.map(|(name, ratio, feature_count)| PricingTier {
        name: name.to_string(),
        price: round_whole(monthly_price as f64 * ratio),
        features: TIER_FEATURES[..feature_count]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    })
}

fn divide(metric: Metric, numerator: f64, denominator: f64) -> Result<f64, ComputationError> {
    if denominator == 0.0 {
        return Err(ComputationError::new(metric, ComputationReason::DivisionByZero));
    }
    finite(metric, numerator / denominator)
}

fn finite(metric: Metric, value: f64) -> Result<f64, ComputationError> {
    if !value.is_finite() {
        return Err(ComputationError::new(metric, ComputationReason::NonFinite));
    }
    Ok(value)
}

/// Round to cents; scaling can overflow a finite quotient near `f64::MAX`
fn cents(metric: Metric, value: f64) -> Result<f64, ComputationError> {
    finite(metric, round_cents(value))
}

fn collect<T>(result: Result<T, ComputationError>, sink: &mut Vec<ComputationError>) -> Computed<T> {
    match result {
        Ok(value) => Computed::Value(value),
        Err(err) => {
            sink.push(err);
            Computed::NotApplicable
        }
    }
}

/// Round half away from zero to a whole unit; saturates at the `i64` bounds
fn round_whole(value: f64) -> i64 {
    value.round() as i64
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percent_delta(multiplier: f64) -> i64 {
    round_whole((multiplier - 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{ContractLength, SupportTier};
    use chrono::TimeZone;

    fn scenario() -> PricingInput {
        PricingInput {
            current_price: 99.0,
            customers: 100,
            churn_rate: 5.0,
            competitor_price: Some(120.0),
            cac: Some(300.0),
            features: 3,
            growth_rate: 10.0,
            support_tier: SupportTier::Standard,
            contract_length: ContractLength::Monthly,
        }
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_golden_monthly_scenario() {
        let report = calculate_at(&scenario(), fixed_time());

        // 99 + 100 * 10 * 1.3 * 1.1
        assert_eq!(report.monthly_price, 1529);
        assert_eq!(report.annual_price, 18348);
        assert_eq!(report.savings, 0);
        assert_eq!(report.price_per_user, Computed::Value(15));
        assert!(report.not_applicable.is_empty());
    }

    #[test]
    fn test_golden_annual_scenario() {
        let mut input = scenario();
        input.contract_length = ContractLength::Annual;
        let report = calculate_at(&input, fixed_time());

        // 99 + 1430 * 0.8
        assert_eq!(report.monthly_price, 1243);
        assert_eq!(report.annual_price, 14916);
        assert_eq!(report.savings, 2983);
        assert_eq!(report.breakdown.contract_discount, -20);
    }

    #[test]
    fn test_breakdown() {
        let mut input = scenario();
        input.support_tier = SupportTier::Enterprise;
        let report = calculate_at(&input, fixed_time());

        assert_eq!(
            report.breakdown,
            PriceBreakdown {
                base: 99,
                user_cost: 1000,
                feature_multiplier: 30,
                growth_multiplier: 10,
                support_multiplier: 100,
                contract_discount: 0,
            }
        );
        // 99 + 1430 * 2.0
        assert_eq!(report.monthly_price, 2959);
    }

    #[test]
    fn test_zero_customers_uses_base_price() {
        let mut input = scenario();
        input.customers = 0;
        let report = calculate_at(&input, fixed_time());

        assert_eq!(report.monthly_price, 99);
        assert_eq!(report.price_per_user, Computed::NotApplicable);
        assert_eq!(
            report.not_applicable,
            vec![ComputationError::new(Metric::PricePerUser, ComputationReason::DivisionByZero)]
        );
    }

    #[test]
    fn test_zero_churn_marks_ltv_not_applicable() {
        let mut input = scenario();
        input.churn_rate = 0.0;
        let report = calculate_at(&input, fixed_time());

        let metrics = report.metrics.unwrap();
        assert!(metrics.ltv.is_not_applicable());
        assert!(metrics.ltv_cac_ratio.is_not_applicable());
        assert_eq!(metrics.payback_period_months, Computed::Value(3.03));
        assert_eq!(
            report.not_applicable,
            vec![
                ComputationError::new(Metric::Ltv, ComputationReason::UnboundedLifetime),
                ComputationError::new(Metric::LtvCacRatio, ComputationReason::DependsOnUndefined),
            ]
        );
    }

    #[test]
    fn test_unit_economics() {
        let report = calculate_at(&scenario(), fixed_time());
        let metrics = report.metrics.unwrap();

        assert_eq!(metrics.ltv, Computed::Value(1980.0));
        assert_eq!(metrics.ltv_cac_ratio, Computed::Value(6.6));
        assert_eq!(metrics.payback_period_months, Computed::Value(3.03));
    }

    #[test]
    fn test_huge_lifetime_value_is_not_applicable() {
        let input = PricingInput {
            current_price: 1e9,
            customers: 10,
            churn_rate: 1e-296,
            competitor_price: None,
            cac: Some(1.0),
            features: 0,
            growth_rate: 0.0,
            support_tier: SupportTier::Standard,
            contract_length: ContractLength::Monthly,
        };
        let report = calculate_at(&input, fixed_time());

        let metrics = report.metrics.as_ref().unwrap();
        assert!(metrics.ltv.is_not_applicable());
        assert!(metrics.ltv_cac_ratio.is_not_applicable());
        assert_eq!(metrics.payback_period_months, Computed::Value(0.0));
        assert_eq!(
            report.not_applicable,
            vec![
                ComputationError::new(Metric::Ltv, ComputationReason::NonFinite),
                ComputationError::new(Metric::LtvCacRatio, ComputationReason::NonFinite),
            ]
        );
        assert!(report.recommendations.iter().all(|r| !r.message.contains("inf")));
    }

    #[test]
    fn test_metrics_absent_without_cac() {
        let mut input = scenario();
        input.cac = None;
        input.competitor_price = None;
        let report = calculate_at(&input, fixed_time());

        assert!(report.metrics.is_none());
        assert!(report.competitive_position.is_none());
    }

    #[test]
    fn test_competitive_position() {
        let report = calculate_at(&scenario(), fixed_time());
        let position = report.competitive_position.unwrap();

        // (99 - 120) / 120 = -17.5%
        assert_eq!(position.difference_percent, -18);
        assert_eq!(position.position, MarketPosition::BelowMarket);

        assert_eq!(competitive_position(105.0, 100.0).position, MarketPosition::AtMarket);
        assert_eq!(competitive_position(150.0, 100.0).position, MarketPosition::AboveMarket);
    }

    #[test]
    fn test_tiers() {
        let report = calculate_at(&scenario(), fixed_time());
        let names: Vec<&str> = report.tiers.iter().map(|t| t.name.as_str()).collect();
        let prices: Vec<i64> = report.tiers.iter().map(|t| t.price).collect();
        let counts: Vec<usize> = report.tiers.iter().map(|t| t.features.len()).collect();

        assert_eq!(names, vec!["Starter", "Professional", "Enterprise"]);
        assert_eq!(prices, vec![1223, 2294, 4587]);
        assert_eq!(counts, vec![3, 6, 10]);
    }

    #[test]
    fn test_identical_inputs_identical_reports() {
        let a = calculate_at(&scenario(), fixed_time());
        let b = calculate_at(&scenario(), fixed_time());
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_report_serializes_camel_case_with_nulls() {
        let mut input = scenario();
        input.customers = 0;
        let json = serde_json::to_value(calculate_at(&input, fixed_time())).unwrap();

        assert_eq!(json["monthlyPrice"], 99);
        assert!(json["pricePerUser"].is_null());
        assert_eq!(json["tiers"].as_array().unwrap().len(), 3);
        assert_eq!(json["metrics"]["ltvCacRatio"], 6.6);
        assert_eq!(json["notApplicable"][0]["metric"], "pricePerUser");
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_whole(2.5), 3);
        assert_eq!(round_whole(-2.5), -3);
        assert_eq!(round_whole(2.4999), 2);
    }
}
