use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use vaultfund_core::{Contribution, ContributionStatus, Kitty, VaultError};
use vaultfund_core::storage::{ContributionStore, KittyStore};

/// Postgres-backed record of truth. Kitty address uniqueness rides on the
/// table's unique index, so a racing insert surfaces as `Conflict` to the
/// losing caller.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), VaultError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(VaultError::store)
    }
}

#[async_trait]
impl KittyStore for PgStore {
    async fn insert(&self, kitty: Kitty) -> Result<Kitty, VaultError> {
        let result = sqlx::query(
            r#"
            INSERT INTO kitties (
                id, email, name, description, kitty_type, beneficiary_count,
                maturity_date, address, amount, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(kitty.id)
        .bind(&kitty.email)
        .bind(&kitty.name)
        .bind(&kitty.description)
        .bind(&kitty.kitty_type)
        .bind(kitty.beneficiary_count as i32)
        .bind(kitty.maturity_date)
        .bind(&kitty.address)
        .bind(kitty.amount)
        .bind(kitty.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(kitty),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(VaultError::Conflict(kitty.address.clone()))
            }
            Err(err) => Err(VaultError::store(err)),
        }
    }

    async fn list(&self) -> Result<Vec<Kitty>, VaultError> {
        let rows = sqlx::query(&kitty_select("ORDER BY created_at DESC"))
            .fetch_all(&self.pool)
            .await
            .map_err(VaultError::store)?;

        rows.into_iter().map(|row| kitty_from_row(&row)).collect()
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<Kitty>, VaultError> {
        let rows = sqlx::query(&kitty_select("WHERE email = $1 ORDER BY created_at DESC"))
            .bind(email)
            .fetch_all(&self.pool)
            .await
            .map_err(VaultError::store)?;

        rows.into_iter().map(|row| kitty_from_row(&row)).collect()
    }

    async fn exists(&self, address: &str) -> Result<bool, VaultError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM kitties WHERE address = $1)")
            .bind(address)
            .fetch_one(&self.pool)
            .await
            .map_err(VaultError::store)
    }

    async fn active_on(&self, today: DateTime<Utc>) -> Result<Vec<Kitty>, VaultError> {
        let rows = sqlx::query(&kitty_select(
            "WHERE maturity_date >= $1 ORDER BY created_at DESC",
        ))
        .bind(today)
        .fetch_all(&self.pool)
        .await
        .map_err(VaultError::store)?;

        rows.into_iter().map(|row| kitty_from_row(&row)).collect()
    }
}

#[async_trait]
impl ContributionStore for PgStore {
    async fn insert(&self, contribution: Contribution) -> Result<Contribution, VaultError> {
        sqlx::query(
            r#"
            INSERT INTO contributions (
                id, kitty_address, contributor_name, contributor_email,
                amount, transaction_ref, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(contribution.id)
        .bind(&contribution.kitty_address)
        .bind(&contribution.contributor_name)
        .bind(&contribution.contributor_email)
        .bind(contribution.amount)
        .bind(&contribution.transaction_ref)
        .bind(contribution.status.as_str())
        .bind(contribution.created_at)
        .execute(&self.pool)
        .await
        .map_err(VaultError::store)?;

        Ok(contribution)
    }

    async fn list_all(&self) -> Result<Vec<Contribution>, VaultError> {
        let rows = sqlx::query(&contribution_select(""))
            .fetch_all(&self.pool)
            .await
            .map_err(VaultError::store)?;

        rows.into_iter().map(|row| contribution_from_row(&row)).collect()
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<Contribution>, VaultError> {
        let rows = sqlx::query(&contribution_select("WHERE contributor_email = $1"))
            .bind(email)
            .fetch_all(&self.pool)
            .await
            .map_err(VaultError::store)?;

        rows.into_iter().map(|row| contribution_from_row(&row)).collect()
    }

    async fn list_by_kitty(&self, address: &str) -> Result<Vec<Contribution>, VaultError> {
        let rows = sqlx::query(&contribution_select("WHERE kitty_address = $1"))
            .bind(address)
            .fetch_all(&self.pool)
            .await
            .map_err(VaultError::store)?;

        rows.into_iter().map(|row| contribution_from_row(&row)).collect()
    }
}

fn kitty_select(suffix: &str) -> String {
    format!(
        "SELECT id, email, name, description, kitty_type, beneficiary_count, \
         maturity_date, address, amount, created_at FROM kitties {suffix}"
    )
}

fn contribution_select(filter: &str) -> String {
    // seq ASC keeps insertion order among equal timestamps.
    format!(
        "SELECT id, kitty_address, contributor_name, contributor_email, amount, \
         transaction_ref, status, created_at FROM contributions {filter} \
         ORDER BY created_at DESC, seq ASC"
    )
}

fn kitty_from_row(row: &PgRow) -> Result<Kitty, VaultError> {
    Ok(Kitty {
        id: row.try_get::<Uuid, _>("id").map_err(VaultError::store)?,
        email: row.try_get("email").map_err(VaultError::store)?,
        name: row.try_get("name").map_err(VaultError::store)?,
        description: row.try_get("description").map_err(VaultError::store)?,
        kitty_type: row.try_get("kitty_type").map_err(VaultError::store)?,
        beneficiary_count: row
            .try_get::<i32, _>("beneficiary_count")
            .map_err(VaultError::store)? as u32,
        maturity_date: row.try_get("maturity_date").map_err(VaultError::store)?,
        address: row.try_get("address").map_err(VaultError::store)?,
        amount: row.try_get::<Decimal, _>("amount").map_err(VaultError::store)?,
        created_at: row.try_get("created_at").map_err(VaultError::store)?,
    })
}

fn contribution_from_row(row: &PgRow) -> Result<Contribution, VaultError> {
    let status: String = row.try_get("status").map_err(VaultError::store)?;

    Ok(Contribution {
        id: row.try_get::<Uuid, _>("id").map_err(VaultError::store)?,
        kitty_address: row.try_get("kitty_address").map_err(VaultError::store)?,
        contributor_name: row
            .try_get("contributor_name")
            .map_err(VaultError::store)?,
        contributor_email: row
            .try_get("contributor_email")
            .map_err(VaultError::store)?,
        amount: row.try_get::<Decimal, _>("amount").map_err(VaultError::store)?,
        transaction_ref: row.try_get("transaction_ref").map_err(VaultError::store)?,
        status: status.parse().map_err(VaultError::Store)?,
        created_at: row.try_get("created_at").map_err(VaultError::store)?,
    })
}
