use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use crate::error::VaultError;
use crate::models::{Contribution, ContributionStatus, NewContribution};
use crate::notify::{Notifier, NotifyBody};
use crate::registry::require;
use crate::storage::ContributionStore;

/// Append-only contribution records keyed by kitty address.
#[derive(Clone)]
pub struct ContributionLedger {
    store: Arc<dyn ContributionStore>,
    notifier: Arc<dyn Notifier>,
}

impl ContributionLedger {
    pub fn new(store: Arc<dyn ContributionStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Records a contribution with `pending` status and the current
    /// timestamp. The kitty address is deliberately not checked against
    /// the registry; records against an unknown address are accepted.
    /// The receipt mail is dispatched detached and only logged.
    pub async fn record(&self, input: NewContribution) -> Result<Contribution, VaultError> {
        validate_new_contribution(&input)?;

        let contribution = Contribution {
            id: Uuid::new_v4(),
            kitty_address: input.kitty_address.trim().to_string(),
            contributor_name: input.contributor_name.trim().to_string(),
            contributor_email: input.contributor_email.trim().to_string(),
            amount: input.amount,
            transaction_ref: input.transaction_ref.trim().to_string(),
            status: ContributionStatus::Pending,
            created_at: Utc::now(),
        };

        let contribution = self.store.insert(contribution).await?;

        let notifier = Arc::clone(&self.notifier);
        let recipient = contribution.contributor_email.clone();
        let body = NotifyBody::Plain(contribution_received_body(
            &contribution.contributor_name,
            contribution.amount,
            &contribution.kitty_address,
        ));
        tokio::spawn(async move {
            if let Err(err) = notifier
                .send(&recipient, "Contribution received", &body)
                .await
            {
                warn!("contribution receipt not delivered: {err}");
            }
        });

        Ok(contribution)
    }

    pub async fn list_all(&self) -> Result<Vec<Contribution>, VaultError> {
        self.store.list_all().await
    }

    pub async fn list_by_email(&self, email: &str) -> Result<Vec<Contribution>, VaultError> {
        if email.trim().is_empty() {
            return Err(VaultError::missing("email"));
        }
        self.store.list_by_email(email.trim()).await
    }

    /// `NotFound` when the address has zero contributions. A kitty that
    /// exists but has not received anything yet is indistinguishable
    /// here from an address that was never created at all.
    pub async fn list_by_kitty(&self, address: &str) -> Result<Vec<Contribution>, VaultError> {
        if address.trim().is_empty() {
            return Err(VaultError::missing("kitty address"));
        }

        let contributions = self.store.list_by_kitty(address.trim()).await?;
        if contributions.is_empty() {
            return Err(VaultError::NotFound(format!(
                "no contributions recorded for kitty '{}'",
                address.trim()
            )));
        }

        Ok(contributions)
    }
}

fn validate_new_contribution(input: &NewContribution) -> Result<(), VaultError> {
    require("kitty address", &input.kitty_address)?;
    require("name", &input.contributor_name)?;
    require("email", &input.contributor_email)?;
    require("transaction reference", &input.transaction_ref)?;

    if input.amount <= Decimal::ZERO {
        return Err(VaultError::Validation(
            "amount must be positive".to_string(),
        ));
    }

    Ok(())
}

fn contribution_received_body(name: &str, amount: Decimal, kitty_address: &str) -> String {
    format!(
        "Hello {name},\n\nWe have received your contribution of {amount} \
toward kitty {kitty_address}. It is recorded as pending and will appear \
in the next contribution summary.\n\nBest regards,\nThe VaultFund Team"
    )
}
