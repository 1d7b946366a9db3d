//! Operator activity log.
//!
//! Keeps a bounded, in-memory record of recent calculations and completed
//! purchases. It is injected into the handlers through `AppState` and read
//! only through the authenticated `/admin` routes. Nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{CheckoutQuote, TierLevel};
use crate::pricing::{ContractLength, PricingInput, PricingReport, SupportTier};

/// Summary of one calculation; no business figures beyond the price
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub customers: u64,
    pub support_tier: SupportTier,
    pub contract_length: ContractLength,
    pub monthly_price: i64,
    pub not_applicable: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub session_id: String,
    pub tier: TierLevel,
    pub billing_cycle: ContractLength,
    pub amount_cents: u64,
    pub currency: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub calculations: usize,
    pub purchases: usize,
    pub purchases_by_tier: BTreeMap<TierLevel, usize>,
    pub revenue_cents: u64,
}

pub struct ActivityLog {
    max_entries: usize,
    calculations: RwLock<VecDeque<CalculationRecord>>,
    purchases: RwLock<VecDeque<PurchaseRecord>>,
}

impl ActivityLog {
    /// Create a log keeping at most `max_entries` records of each kind
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries: max_entries.max(1),
            calculations: RwLock::new(VecDeque::new()),
            purchases: RwLock::new(VecDeque::new()),
        }
    }

    pub async fn record_calculation(
        &self,
        input: &PricingInput,
        report: &PricingReport,
    ) -> CalculationRecord {
        let record = CalculationRecord {
            id: Uuid::new_v4(),
            recorded_at: report.timestamp,
            customers: input.customers,
            support_tier: input.support_tier,
            contract_length: input.contract_length,
            monthly_price: report.monthly_price,
            not_applicable: report.not_applicable.len(),
        };

        let mut calculations = self.calculations.write().await;
        push_bounded(&mut calculations, record.clone(), self.max_entries);
        debug!(id = %record.id, "Recorded calculation");
        record
    }

    pub async fn record_purchase(&self, quote: &CheckoutQuote, session_id: &str) -> PurchaseRecord {
        let record = PurchaseRecord {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            session_id: session_id.to_string(),
            tier: quote.tier,
            billing_cycle: quote.billing_cycle,
            amount_cents: quote.amount_cents,
            currency: quote.currency.clone(),
        };

        let mut purchases = self.purchases.write().await;
        push_bounded(&mut purchases, record.clone(), self.max_entries);
        debug!(id = %record.id, tier = %record.tier, "Recorded purchase");
        record
    }

    /// Most recent calculations, newest first
    pub async fn recent_calculations(&self, limit: usize) -> Vec<CalculationRecord> {
        let calculations = self.calculations.read().await;
        calculations.iter().rev().take(limit).cloned().collect()
    }

    /// Most recent purchases, newest first
    pub async fn recent_purchases(&self, limit: usize) -> Vec<PurchaseRecord> {
        let purchases = self.purchases.read().await;
        purchases.iter().rev().take(limit).cloned().collect()
    }

    /// Totals over the retained records
    pub async fn summary(&self) -> ActivitySummary {
        let calculations = self.calculations.read().await.len();
        let purchases = self.purchases.read().await;

        let mut summary = ActivitySummary {
            calculations,
            purchases: purchases.len(),
            ..Default::default()
        };
        for purchase in purchases.iter() {
            *summary.purchases_by_tier.entry(purchase.tier).or_insert(0) += 1;
            summary.revenue_cents = summary.revenue_cents.saturating_add(purchase.amount_cents);
        }
        summary
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, item: T, max: usize) {
    while queue.len() >= max {
        queue.pop_front();
    }
    queue.push_back(item);
}
