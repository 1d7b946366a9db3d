//! Static checkout catalog.
//!
//! Checkout prices come from configuration, not from a live calculation: the
//! report tiers are for display, the catalog is what a customer is charged.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::pricing::ContractLength;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierLevel {
    Starter,
    Professional,
    Enterprise,
}

impl TierLevel {
    pub const ALL: [TierLevel; 3] = [Self::Starter, Self::Professional, Self::Enterprise];

    /// Accepts catalog keys and report tier names alike ("starter", "Starter")
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "starter" => Some(Self::Starter),
            "professional" => Some(Self::Professional),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for TierLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPlan {
    pub tier: TierLevel,
    pub display_name: String,
    pub monthly_amount_cents: u64,
    pub annual_amount_cents: u64,
}

impl CatalogPlan {
    pub fn amount_cents(&self, cycle: ContractLength) -> u64 {
        match cycle {
            ContractLength::Monthly => self.monthly_amount_cents,
            ContractLength::Annual => self.annual_amount_cents,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutCatalog {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_plans")]
    pub plans: Vec<CatalogPlan>,
}

impl Default for CheckoutCatalog {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            plans: default_plans(),
        }
    }
}

fn default_currency() -> String {
    "usd".to_string()
}

// Annual plans carry the same 20% discount as annual contracts
fn default_plans() -> Vec<CatalogPlan> {
    vec![
        CatalogPlan {
            tier: TierLevel::Starter,
            display_name: "Starter".to_string(),
            monthly_amount_cents: 2_900,
            annual_amount_cents: 27_840,
        },
        CatalogPlan {
            tier: TierLevel::Professional,
            display_name: "Professional".to_string(),
            monthly_amount_cents: 7_900,
            annual_amount_cents: 75_840,
        },
        CatalogPlan {
            tier: TierLevel::Enterprise,
            display_name: "Enterprise".to_string(),
            monthly_amount_cents: 19_900,
            annual_amount_cents: 191_040,
        },
    ]
}

/// What the checkout collaborator sends: a tier name and a billing cycle
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub tier_name: String,
    pub billing_cycle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutQuote {
    pub tier: TierLevel,
    pub display_name: String,
    pub billing_cycle: ContractLength,
    pub amount_cents: u64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown tier: {0}")]
    UnknownTier(String),
    #[error("invalid billing cycle: {0}")]
    InvalidBillingCycle(String),
    #[error("tier {0} is not offered")]
    NotOffered(TierLevel),
}

impl CheckoutCatalog {
    pub fn plan(&self, tier: TierLevel) -> Option<&CatalogPlan> {
        self.plans.iter().find(|p| p.tier == tier)
    }

    /// Price a checkout request from the catalog
    pub fn quote(&self, request: &CheckoutRequest) -> Result<CheckoutQuote, CatalogError> {
        let tier = TierLevel::parse(&request.tier_name)
            .ok_or_else(|| CatalogError::UnknownTier(request.tier_name.clone()))?;
        let cycle = ContractLength::parse(&request.billing_cycle)
            .ok_or_else(|| CatalogError::InvalidBillingCycle(request.billing_cycle.clone()))?;
        let plan = self.plan(tier).ok_or(CatalogError::NotOffered(tier))?;

        Ok(CheckoutQuote {
            tier,
            display_name: plan.display_name.clone(),
            billing_cycle: cycle,
            amount_cents: plan.amount_cents(cycle),
            currency: self.currency.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tier: &str, cycle: &str) -> CheckoutRequest {
        CheckoutRequest {
            tier_name: tier.to_string(),
            billing_cycle: cycle.to_string(),
        }
    }

    #[test]
    fn test_quote_from_report_tier_name() {
        let catalog = CheckoutCatalog::default();
        let quote = catalog.quote(&request("Professional", "annual")).unwrap();

        assert_eq!(quote.tier, TierLevel::Professional);
        assert_eq!(quote.billing_cycle, ContractLength::Annual);
        assert_eq!(quote.amount_cents, 75_840);
        assert_eq!(quote.currency, "usd");
    }

    #[test]
    fn test_quote_errors() {
        let catalog = CheckoutCatalog::default();

        assert_eq!(
            catalog.quote(&request("platinum", "monthly")),
            Err(CatalogError::UnknownTier("platinum".to_string()))
        );
        assert_eq!(
            catalog.quote(&request("starter", "weekly")),
            Err(CatalogError::InvalidBillingCycle("weekly".to_string()))
        );

        let mut partial = CheckoutCatalog::default();
        partial.plans.retain(|p| p.tier != TierLevel::Enterprise);
        assert_eq!(
            partial.quote(&request("enterprise", "monthly")),
            Err(CatalogError::NotOffered(TierLevel::Enterprise))
        );
    }

    #[test]
    fn test_default_annual_plans_are_discounted() {
        for plan in CheckoutCatalog::default().plans {
            assert_eq!(plan.annual_amount_cents, plan.monthly_amount_cents * 12 * 8 / 10);
        }
    }
}
