use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reserved lifecycle for a contribution. This core only ever writes
/// `Pending`; the transition to `Confirmed` or `Failed` belongs to a
/// reconciliation component that does not exist yet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContributionStatus {
    Pending,
    Confirmed,
    Failed,
}

impl ContributionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContributionStatus::Pending => "pending",
            ContributionStatus::Confirmed => "confirmed",
            ContributionStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ContributionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContributionStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ContributionStatus::Pending),
            "confirmed" => Ok(ContributionStatus::Confirmed),
            "failed" => Ok(ContributionStatus::Failed),
            other => Err(format!("unknown contribution status '{other}'")),
        }
    }
}

/// A group savings purse. `address` is the globally unique join key that
/// contributions reference; nothing else links the two record types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kitty {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub description: String,
    pub kitty_type: String,
    pub beneficiary_count: u32,
    pub maturity_date: DateTime<Utc>,
    pub address: String,
    /// Advisory running total. Not derived from the ledger.
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A single monetary pledge against a kitty address. The address is not
/// checked against the registry, so orphaned contributions are possible
/// and tolerated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contribution {
    pub id: Uuid,
    pub kitty_address: String,
    pub contributor_name: String,
    pub contributor_email: String,
    pub amount: Decimal,
    pub transaction_ref: String,
    pub status: ContributionStatus,
    pub created_at: DateTime<Utc>,
}

/// Input for kitty creation, before the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewKitty {
    pub email: String,
    pub name: String,
    pub description: String,
    pub kitty_type: String,
    pub beneficiary_count: u32,
    pub maturity_date: DateTime<Utc>,
    pub address: String,
}

/// Input for recording a contribution.
#[derive(Debug, Clone)]
pub struct NewContribution {
    pub kitty_address: String,
    pub contributor_name: String,
    pub contributor_email: String,
    pub amount: Decimal,
    pub transaction_ref: String,
}
