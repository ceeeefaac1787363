use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use crate::error::VaultError;
use crate::models::{Kitty, NewKitty};
use crate::notify::{Notifier, NotifyBody};
use crate::storage::KittyStore;

/// Kitty definitions and their creation confirmations.
#[derive(Clone)]
pub struct KittyRegistry {
    store: Arc<dyn KittyStore>,
    notifier: Arc<dyn Notifier>,
}

impl KittyRegistry {
    pub fn new(store: Arc<dyn KittyStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Creates a kitty with a fresh address. The existence pre-check and
    /// the insert are not atomic together; the store's own uniqueness
    /// guarantee breaks the tie between racing creations, and the loser
    /// sees `Conflict`. The confirmation mail is dispatched detached:
    /// creation success never depends on it.
    pub async fn create(&self, input: NewKitty) -> Result<Kitty, VaultError> {
        validate_new_kitty(&input)?;

        if self.store.exists(input.address.trim()).await? {
            return Err(VaultError::Conflict(input.address.trim().to_string()));
        }

        let kitty = Kitty {
            id: Uuid::new_v4(),
            email: input.email.trim().to_string(),
            name: input.name.trim().to_string(),
            description: input.description.trim().to_string(),
            kitty_type: input.kitty_type.trim().to_string(),
            beneficiary_count: input.beneficiary_count,
            maturity_date: input.maturity_date,
            address: input.address.trim().to_string(),
            amount: Decimal::ZERO,
            created_at: Utc::now(),
        };

        let kitty = self.store.insert(kitty).await?;

        let notifier = Arc::clone(&self.notifier);
        let recipient = kitty.email.clone();
        let kitty_name = kitty.name.clone();
        tokio::spawn(async move {
            let body = NotifyBody::Plain(kitty_created_body(&kitty_name));
            if let Err(err) = notifier
                .send(&recipient, "Your VaultFund kitty is live", &body)
                .await
            {
                warn!("kitty-created confirmation not delivered: {err}");
            }
        });

        Ok(kitty)
    }

    pub async fn list(&self) -> Result<Vec<Kitty>, VaultError> {
        self.store.list().await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Vec<Kitty>, VaultError> {
        if email.trim().is_empty() {
            return Err(VaultError::missing("email"));
        }

        let kitties = self.store.find_by_email(email.trim()).await?;
        if kitties.is_empty() {
            return Err(VaultError::NotFound(format!(
                "no kitties found for '{}'",
                email.trim()
            )));
        }

        Ok(kitties)
    }

    pub async fn exists(&self, address: &str) -> Result<bool, VaultError> {
        self.store.exists(address.trim()).await
    }
}

fn validate_new_kitty(input: &NewKitty) -> Result<(), VaultError> {
    require("email", &input.email)?;
    require("name", &input.name)?;
    require("description", &input.description)?;
    require("type", &input.kitty_type)?;
    require("address", &input.address)?;

    if input.beneficiary_count == 0 {
        return Err(VaultError::Validation(
            "beneficiary count must be positive".to_string(),
        ));
    }

    Ok(())
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), VaultError> {
    if value.trim().is_empty() {
        return Err(VaultError::missing(field));
    }
    Ok(())
}

fn kitty_created_body(kitty_name: &str) -> String {
    format!(
        "Hello,\n\nYour kitty \"{kitty_name}\" has been created on VaultFund. \
Share its address with your group so everyone can contribute and track \
savings in one place.\n\nBest regards,\nThe VaultFund Team"
    )
}
