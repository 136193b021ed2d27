//! Seller commission ledger for the admin payout screen.
//!
//! The ledger is a fixed mock dataset; payouts change it in memory only.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, Price, UserId};

/// Commission rate for a direct sale, in percent.
pub const DIRECT_RATE_PERCENT: u32 = 10;

/// Commission rate for a referred sale, in percent.
pub const REFERRAL_RATE_PERCENT: u32 = 5;

/// Payout state of a commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommissionStatus {
    Paid,
    Pending,
    Cancelled,
}

impl CommissionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commission owed on one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub id: String,
    pub order_id: OrderId,
    pub seller_id: UserId,
    pub seller_email: String,
    pub commission_amount: Price,
    pub order_total: Price,
    /// 1 for a direct sale, 2 for a referral.
    pub tier: u8,
    pub date: DateTime<Utc>,
    pub status: CommissionStatus,
}

impl Commission {
    #[must_use]
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.trim().to_lowercase();
        needle.is_empty()
            || self.order_id.as_str().to_lowercase().contains(&needle)
            || self.seller_email.to_lowercase().contains(&needle)
    }
}

/// Rate for a tier, in percent.
#[must_use]
pub const fn tier_rate_percent(tier: u8) -> u32 {
    if tier <= 1 {
        DIRECT_RATE_PERCENT
    } else {
        REFERRAL_RATE_PERCENT
    }
}

/// The commission ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissionLedger {
    entries: Vec<Commission>,
}

impl CommissionLedger {
    #[must_use]
    pub const fn new(entries: Vec<Commission>) -> Self {
        Self { entries }
    }

    /// The four sample commissions for the approved mock seller.
    #[must_use]
    pub fn sample(now: DateTime<Utc>) -> Self {
        let entry = |n: u8, total: i64, days_ago: i64, status| {
            let order_total = Price::baht(total);
            Commission {
                id: format!("COM-00{n}"),
                order_id: OrderId::new(format!("BLIFE-167888640000{n}")),
                seller_id: UserId::new("user-1678886400001"),
                seller_email: "seller.approved@example.com".to_owned(),
                commission_amount: order_total.percent(tier_rate_percent(1)),
                order_total,
                tier: 1,
                date: now - Duration::days(days_ago),
                status,
            }
        };

        Self::new(vec![
            entry(1, 1890, 1, CommissionStatus::Paid),
            entry(2, 850, 2, CommissionStatus::Paid),
            entry(3, 450, 0, CommissionStatus::Pending),
            entry(4, 120, 0, CommissionStatus::Pending),
        ])
    }

    #[must_use]
    pub fn entries(&self) -> &[Commission] {
        &self.entries
    }

    /// Entries whose order ID or seller email contain `search`
    /// (case-insensitive).
    #[must_use]
    pub fn search(&self, search: &str) -> Vec<&Commission> {
        self.entries.iter().filter(|c| c.matches(search)).collect()
    }

    /// Mark the selected pending commissions as paid. Returns how many
    /// changed.
    pub fn payout(&mut self, ids: &[String]) -> usize {
        let mut paid = 0;
        for entry in &mut self.entries {
            if entry.status == CommissionStatus::Pending && ids.contains(&entry.id) {
                entry.status = CommissionStatus::Paid;
                paid += 1;
            }
        }
        paid
    }

    #[must_use]
    pub fn total_with_status(&self, status: CommissionStatus) -> Price {
        self.entries
            .iter()
            .filter(|c| c.status == status)
            .map(|c| c.commission_amount)
            .sum()
    }

    #[must_use]
    pub fn total_paid(&self) -> Price {
        self.total_with_status(CommissionStatus::Paid)
    }

    #[must_use]
    pub fn total_pending(&self) -> Price {
        self.total_with_status(CommissionStatus::Pending)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_ledger_amounts() {
        let ledger = CommissionLedger::sample(Utc::now());
        let amounts: Vec<Price> = ledger.entries().iter().map(|c| c.commission_amount).collect();
        assert_eq!(
            amounts,
            vec![Price::baht(189), Price::baht(85), Price::baht(45), Price::baht(12)]
        );
        assert_eq!(ledger.total_paid(), Price::baht(274));
        assert_eq!(ledger.total_pending(), Price::baht(57));
    }

    #[test]
    fn test_search_by_order_or_email() {
        let ledger = CommissionLedger::sample(Utc::now());
        assert_eq!(ledger.search("blife-1678886400003").len(), 1);
        assert_eq!(ledger.search("SELLER.APPROVED").len(), 4);
        assert_eq!(ledger.search("").len(), 4);
        assert!(ledger.search("nobody").is_empty());
    }

    #[test]
    fn test_payout_only_touches_pending() {
        let mut ledger = CommissionLedger::sample(Utc::now());
        let changed = ledger.payout(&["COM-001".to_owned(), "COM-003".to_owned()]);
        assert_eq!(changed, 1);
        assert_eq!(ledger.total_pending(), Price::baht(12));
        assert_eq!(ledger.total_paid(), Price::baht(319));
    }

    #[test]
    fn test_tier_rates() {
        assert_eq!(tier_rate_percent(1), 10);
        assert_eq!(tier_rate_percent(2), 5);
    }
}
