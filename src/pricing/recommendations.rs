use crate::pricing::models::{
    CompetitivePosition, ContractLength, MarketPosition, Priority, PricingInput, Recommendation,
    RecommendationCategory, SupportTier, UnitEconomics,
};

const HIGH_CHURN: f64 = 5.0;
const ELEVATED_CHURN: f64 = 2.0;
const HEALTHY_LTV_CAC: f64 = 3.0;
const STRONG_LTV_CAC: f64 = 5.0;
const MAX_PAYBACK_MONTHS: f64 = 12.0;
const FEATURE_RICH: u64 = 5;

/// Build recommendations in a fixed rule order
pub fn recommend(
    input: &PricingInput,
    metrics: Option<&UnitEconomics>,
    position: Option<&CompetitivePosition>,
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if input.churn_rate >= HIGH_CHURN {
        out.push(rec(
            RecommendationCategory::Retention,
            Priority::High,
            format!(
                "Monthly churn of {}% is high; invest in onboarding and retention before raising prices",
                input.churn_rate
            ),
        ));
    } else if input.churn_rate >= ELEVATED_CHURN {
        out.push(rec(
            RecommendationCategory::Retention,
            Priority::Medium,
            format!(
                "Monthly churn of {}% is elevated; track cancellation reasons by cohort",
                input.churn_rate
            ),
        ));
    }

    if let Some(metrics) = metrics {
        match metrics.ltv_cac_ratio.value() {
            Some(ratio) if ratio < 1.0 => out.push(rec(
                RecommendationCategory::UnitEconomics,
                Priority::High,
                format!(
                    "LTV:CAC of {:.2} means each customer costs more to acquire than they return",
                    ratio
                ),
            )),
            Some(ratio) if ratio < HEALTHY_LTV_CAC => out.push(rec(
                RecommendationCategory::UnitEconomics,
                Priority::Medium,
                format!(
                    "LTV:CAC of {:.2} is below the 3:1 benchmark; lower acquisition cost or raise price",
                    ratio
                ),
            )),
            Some(ratio) if ratio > STRONG_LTV_CAC => out.push(rec(
                RecommendationCategory::UnitEconomics,
                Priority::Low,
                format!(
                    "LTV:CAC of {:.2} leaves room to spend more on acquisition",
                    ratio
                ),
            )),
            Some(_) => {}
            None => out.push(rec(
                RecommendationCategory::UnitEconomics,
                Priority::Low,
                "Churn is too low to bound customer lifetime; validate LTV against cohort data"
                    .to_string(),
            )),
        }

        if let Some(months) = metrics.payback_period_months.value() {
            if months > MAX_PAYBACK_MONTHS {
                out.push(rec(
                    RecommendationCategory::UnitEconomics,
                    Priority::Medium,
                    format!(
                        "CAC payback of {:.1} months exceeds 12 months; shorten it with annual prepayment",
                        months
                    ),
                ));
            }
        }
    }

    if let Some(position) = position {
        match position.position {
            MarketPosition::BelowMarket => out.push(rec(
                RecommendationCategory::Positioning,
                Priority::Medium,
                format!(
                    "Current price is {}% below the competitor; there is room to raise it",
                    position.difference_percent.abs()
                ),
            )),
            MarketPosition::AboveMarket => out.push(rec(
                RecommendationCategory::Positioning,
                Priority::Low,
                format!(
                    "Current price is {}% above the competitor; make the premium visible in the offer",
                    position.difference_percent
                ),
            )),
            MarketPosition::AtMarket => {}
        }
    }

    if input.contract_length == ContractLength::Monthly {
        out.push(rec(
            RecommendationCategory::Billing,
            Priority::Low,
            "Offer an annual contract; customers save 20% and cash arrives up front".to_string(),
        ));
    }

    if input.features >= FEATURE_RICH && input.support_tier == SupportTier::Standard {
        out.push(rec(
            RecommendationCategory::Packaging,
            Priority::Low,
            format!(
                "With {} bundled features, a premium support tier can lift revenue per account",
                input.features
            ),
        ));
    }

    if input.customers == 0 {
        out.push(rec(
            RecommendationCategory::Packaging,
            Priority::Low,
            "No paying customers yet; the price is the base platform fee only".to_string(),
        ));
    }

    out
}

fn rec(category: RecommendationCategory, priority: Priority, message: String) -> Recommendation {
    Recommendation {
        category,
        priority,
        message,
    }
}
