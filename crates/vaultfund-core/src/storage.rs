use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::VaultError;
use crate::models::{Contribution, Kitty};

/// Record of truth for kitties. Implementations enforce address
/// uniqueness themselves so that two racing inserts resolve with exactly
/// one winner regardless of any application-level pre-check.
#[async_trait]
pub trait KittyStore: Send + Sync {
    async fn insert(&self, kitty: Kitty) -> Result<Kitty, VaultError>;
    async fn list(&self) -> Result<Vec<Kitty>, VaultError>;
    async fn find_by_email(&self, email: &str) -> Result<Vec<Kitty>, VaultError>;
    async fn exists(&self, address: &str) -> Result<bool, VaultError>;
    /// Kitties whose maturity date is `today` or later.
    async fn active_on(&self, today: DateTime<Utc>) -> Result<Vec<Kitty>, VaultError>;
}

/// Record of truth for contributions. List operations return records
/// ordered by `created_at` descending, ties broken by insertion order
/// (earlier insert first). An empty result is not an error at this
/// layer; callers decide what "no contributions" means.
#[async_trait]
pub trait ContributionStore: Send + Sync {
    async fn insert(&self, contribution: Contribution) -> Result<Contribution, VaultError>;
    async fn list_all(&self) -> Result<Vec<Contribution>, VaultError>;
    async fn list_by_email(&self, email: &str) -> Result<Vec<Contribution>, VaultError>;
    async fn list_by_kitty(&self, address: &str) -> Result<Vec<Contribution>, VaultError>;
}
