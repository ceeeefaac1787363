use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use vaultfund_core::{Contribution, Kitty, VaultError};
use vaultfund_core::storage::{ContributionStore, KittyStore};

/// In-process store over both collections. Used by tests and local runs;
/// the uniqueness check on kitty addresses happens under the write lock,
/// so racing inserts resolve with exactly one winner, same as the
/// Postgres unique index.
#[derive(Default)]
pub struct MemoryStore {
    kitties: RwLock<Vec<Kitty>>,
    contributions: RwLock<Vec<Contribution>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KittyStore for MemoryStore {
    async fn insert(&self, kitty: Kitty) -> Result<Kitty, VaultError> {
        let mut kitties = self.kitties.write().await;
        if kitties.iter().any(|existing| existing.address == kitty.address) {
            return Err(VaultError::Conflict(kitty.address));
        }
        kitties.push(kitty.clone());
        Ok(kitty)
    }

    async fn list(&self) -> Result<Vec<Kitty>, VaultError> {
        Ok(self.kitties.read().await.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<Kitty>, VaultError> {
        let kitties = self.kitties.read().await;
        Ok(kitties
            .iter()
            .filter(|kitty| kitty.email == email)
            .cloned()
            .collect())
    }

    async fn exists(&self, address: &str) -> Result<bool, VaultError> {
        let kitties = self.kitties.read().await;
        Ok(kitties.iter().any(|kitty| kitty.address == address))
    }

    async fn active_on(&self, today: DateTime<Utc>) -> Result<Vec<Kitty>, VaultError> {
        let kitties = self.kitties.read().await;
        Ok(kitties
            .iter()
            .filter(|kitty| kitty.maturity_date >= today)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ContributionStore for MemoryStore {
    async fn insert(&self, contribution: Contribution) -> Result<Contribution, VaultError> {
        let mut contributions = self.contributions.write().await;
        contributions.push(contribution.clone());
        Ok(contribution)
    }

    async fn list_all(&self) -> Result<Vec<Contribution>, VaultError> {
        let contributions = self.contributions.read().await;
        Ok(most_recent_first(contributions.clone()))
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Contribution>, VaultError> {
        let contributions = self.contributions.read().await;
        Ok(most_recent_first(
            contributions
                .iter()
                .filter(|entry| entry.contributor_email == email)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_kitty(&self, address: &str) -> Result<Vec<Contribution>, VaultError> {
        let contributions = self.contributions.read().await;
        Ok(most_recent_first(
            contributions
                .iter()
                .filter(|entry| entry.kitty_address == address)
                .cloned()
                .collect(),
        ))
    }
}

// Stable sort keeps insertion order among equal timestamps, matching the
// Postgres `ORDER BY created_at DESC, seq ASC`.
fn most_recent_first(mut entries: Vec<Contribution>) -> Vec<Contribution> {
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    entries
}
