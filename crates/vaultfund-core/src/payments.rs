use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::VaultError;

/// Mobile-money payment initiation. `push` asks the provider to prompt
/// the given phone number to authorize a payment and returns the raw
/// provider response payload for surfacing to the end user.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn push(&self, phone: &str, amount: Decimal) -> Result<serde_json::Value, VaultError>;
}
