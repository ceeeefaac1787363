use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vaultfund_core::{Contribution, ContributionStatus, Kitty};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKittyRequest {
    pub email: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kitty_type: String,
    pub beneficiary_count: u32,
    pub maturity_date: DateTime<Utc>,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateKittyResponse {
    pub message: String,
    pub kitty: Kitty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordContributionRequest {
    pub kitty_address: String,
    pub name: String,
    pub email: String,
    pub amount: Decimal,
    pub transaction_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordContributionResponse {
    pub message: String,
    pub contribution_id: Uuid,
    pub status: ContributionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KittyExistsResponse {
    pub address: String,
    pub exists: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KittyListResponse {
    pub items: Vec<Kitty>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionListResponse {
    pub items: Vec<Contribution>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushPaymentRequest {
    pub phone: String,
    pub amount: Decimal,
}
