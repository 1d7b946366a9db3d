use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Support level bundled with the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportTier {
    #[default]
    Standard,
    Premium,
    Enterprise,
}

impl SupportTier {
    /// Parse a wire value, ignoring case and surrounding whitespace
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "premium" => Some(Self::Premium),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Premium => "premium",
            Self::Enterprise => "enterprise",
        }
    }

    /// Price multiplier applied to the per-user cost
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Standard => 1.0,
            Self::Premium => 1.5,
            Self::Enterprise => 2.0,
        }
    }
}

impl fmt::Display for SupportTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract length, also used as the checkout billing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractLength {
    #[default]
    Monthly,
    Annual,
}

impl ContractLength {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" => Some(Self::Monthly),
            "annual" => Some(Self::Annual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }

    pub fn is_annual(&self) -> bool {
        matches!(self, Self::Annual)
    }

    /// Discount factor applied to the per-user cost
    pub fn discount(&self) -> f64 {
        match self {
            Self::Monthly => 1.0,
            Self::Annual => 0.8,
        }
    }
}

impl fmt::Display for ContractLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated business inputs for one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingInput {
    pub current_price: f64,
    pub customers: u64,
    /// Monthly churn, percent in [0, 100]
    pub churn_rate: f64,
    pub competitor_price: Option<f64>,
    pub cac: Option<f64>,
    pub features: u64,
    /// Expected monthly growth, percent
    pub growth_rate: f64,
    pub support_tier: SupportTier,
    pub contract_length: ContractLength,
}

/// A derived figure that may be undefined for the given inputs.
///
/// Serializes as a plain JSON number, or `null` when not applicable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Computed<T> {
    Value(T),
    NotApplicable,
}

impl<T: Copy> Computed<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Self::Value(v) => Some(*v),
            Self::NotApplicable => None,
        }
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable)
    }
}

/// Report figures that can be marked not applicable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    PricePerUser,
    Ltv,
    LtvCacRatio,
    PaybackPeriodMonths,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PricePerUser => "pricePerUser",
            Self::Ltv => "ltv",
            Self::LtvCacRatio => "ltvCacRatio",
            Self::PaybackPeriodMonths => "paybackPeriodMonths",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputationReason {
    DivisionByZero,
    /// Zero churn: customers never leave, lifetime has no bound
    UnboundedLifetime,
    DependsOnUndefined,
    NonFinite,
}

impl ComputationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DivisionByZero => "division_by_zero",
            Self::UnboundedLifetime => "unbounded_lifetime",
            Self::DependsOnUndefined => "depends_on_undefined",
            Self::NonFinite => "non_finite",
        }
    }
}

impl fmt::Display for ComputationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An undefined arithmetic result, reported instead of NaN or infinity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{metric} is not applicable: {reason}")]
pub struct ComputationError {
    pub metric: Metric,
    pub reason: ComputationReason,
}

impl ComputationError {
    pub fn new(metric: Metric, reason: ComputationReason) -> Self {
        Self { metric, reason }
    }
}

/// Itemized contribution of each pricing factor.
///
/// Multiplier entries are percentage deltas, e.g. a 1.3x feature multiplier is `30`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base: i64,
    pub user_cost: u64,
    pub feature_multiplier: i64,
    pub growth_multiplier: i64,
    pub support_multiplier: i64,
    pub contract_discount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub name: String,
    pub price: i64,
    pub features: Vec<String>,
}

/// LTV / CAC figures, present only when CAC is supplied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitEconomics {
    pub ltv: Computed<f64>,
    pub ltv_cac_ratio: Computed<f64>,
    pub payback_period_months: Computed<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    BelowMarket,
    AtMarket,
    AboveMarket,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitivePosition {
    pub competitor_price: f64,
    /// Current price relative to the competitor, percent
    pub difference_percent: i64,
    pub position: MarketPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Retention,
    UnitEconomics,
    Positioning,
    Billing,
    Packaging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: Priority,
    pub message: String,
}

/// Result of one calculation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingReport {
    pub monthly_price: i64,
    pub annual_price: i64,
    pub savings: i64,
    pub price_per_user: Computed<i64>,
    pub breakdown: PriceBreakdown,
    pub tiers: [PricingTier; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<UnitEconomics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_position: Option<CompetitivePosition>,
    pub recommendations: Vec<Recommendation>,
    pub not_applicable: Vec<ComputationError>,
    pub timestamp: DateTime<Utc>,
}
