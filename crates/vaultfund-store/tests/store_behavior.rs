use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use vaultfund_core::storage::{ContributionStore, KittyStore};
use vaultfund_core::{Contribution, ContributionStatus, Kitty, VaultError};
use vaultfund_store::MemoryStore;

fn kitty(address: &str, email: &str, maturity: DateTime<Utc>) -> Kitty {
    Kitty {
        id: Uuid::new_v4(),
        email: email.to_string(),
        name: format!("Kitty {address}"),
        description: "A shared purse".to_string(),
        kitty_type: "savings".to_string(),
        beneficiary_count: 5,
        maturity_date: maturity,
        address: address.to_string(),
        amount: Decimal::ZERO,
        created_at: Utc::now(),
    }
}

fn contribution(address: &str, email: &str, amount: i64, created_at: DateTime<Utc>) -> Contribution {
    Contribution {
        id: Uuid::new_v4(),
        kitty_address: address.to_string(),
        contributor_name: "Giver".to_string(),
        contributor_email: email.to_string(),
        amount: Decimal::new(amount, 0),
        transaction_ref: format!("TX-{amount}"),
        status: ContributionStatus::Pending,
        created_at,
    }
}

#[tokio::test]
async fn duplicate_address_is_a_conflict_and_keeps_the_original() {
    let store = MemoryStore::new();
    let maturity = Utc::now() + Duration::days(30);

    let original = kitty("KT-001", "first@x.com", maturity);
    KittyStore::insert(&store, original.clone()).await.unwrap();

    let imposter = kitty("KT-001", "second@x.com", maturity);
    let err = KittyStore::insert(&store, imposter).await.unwrap_err();
    assert!(matches!(err, VaultError::Conflict(address) if address == "KT-001"));

    let kitties = store.list().await.unwrap();
    assert_eq!(kitties.len(), 1);
    assert_eq!(kitties[0].email, "first@x.com");
    assert_eq!(kitties[0].id, original.id);
}

#[tokio::test]
async fn exists_flips_after_creation() {
    let store = MemoryStore::new();
    assert!(!store.exists("KT-404").await.unwrap());

    KittyStore::insert(&store, kitty("KT-404", "a@x.com", Utc::now()))
        .await
        .unwrap();
    assert!(store.exists("KT-404").await.unwrap());
}

#[tokio::test]
async fn find_by_email_filters_and_can_be_empty() {
    let store = MemoryStore::new();
    let maturity = Utc::now() + Duration::days(10);
    KittyStore::insert(&store, kitty("KT-001", "a@x.com", maturity))
        .await
        .unwrap();
    KittyStore::insert(&store, kitty("KT-002", "b@x.com", maturity))
        .await
        .unwrap();

    let mine = store.find_by_email("a@x.com").await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].address, "KT-001");

    assert!(store.find_by_email("nobody@x.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_order_inserts_still_list_most_recent_first() {
    let store = MemoryStore::new();
    let base = Utc::now();

    // Inserted out of chronological order on purpose.
    ContributionStore::insert(&store, contribution("KT-001", "a@x.com", 10, base))
        .await
        .unwrap();
    ContributionStore::insert(
        &store,
        contribution("KT-001", "a@x.com", 30, base + Duration::hours(2)),
    )
    .await
    .unwrap();
    ContributionStore::insert(
        &store,
        contribution("KT-001", "b@x.com", 20, base + Duration::hours(1)),
    )
    .await
    .unwrap();

    let by_kitty = store.list_by_kitty("KT-001").await.unwrap();
    let amounts: Vec<Decimal> = by_kitty.iter().map(|c| c.amount).collect();
    assert_eq!(
        amounts,
        vec![Decimal::new(30, 0), Decimal::new(20, 0), Decimal::new(10, 0)]
    );

    let by_email = store.list_by_email("a@x.com").await.unwrap();
    let amounts: Vec<Decimal> = by_email.iter().map(|c| c.amount).collect();
    assert_eq!(amounts, vec![Decimal::new(30, 0), Decimal::new(10, 0)]);

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn equal_timestamps_keep_insertion_order() {
    let store = MemoryStore::new();
    let at = Utc::now();

    let first = contribution("KT-001", "a@x.com", 1, at);
    let second = contribution("KT-001", "a@x.com", 2, at);
    ContributionStore::insert(&store, first.clone()).await.unwrap();
    ContributionStore::insert(&store, second.clone()).await.unwrap();

    let listed = store.list_by_kitty("KT-001").await.unwrap();
    assert_eq!(listed[0].id, first.id);
    assert_eq!(listed[1].id, second.id);
}

#[tokio::test]
async fn contributions_against_unknown_kitty_are_accepted() {
    let store = MemoryStore::new();
    // No kitty with this address exists anywhere.
    ContributionStore::insert(&store, contribution("KT-GHOST", "a@x.com", 40, Utc::now()))
        .await
        .unwrap();

    let orphans = store.list_by_kitty("KT-GHOST").await.unwrap();
    assert_eq!(orphans.len(), 1);
}

#[tokio::test]
async fn active_on_excludes_matured_kitties() {
    let store = MemoryStore::new();
    let today = Utc::now();

    KittyStore::insert(&store, kitty("KT-PAST", "a@x.com", today - Duration::days(1)))
        .await
        .unwrap();
    KittyStore::insert(&store, kitty("KT-TODAY", "a@x.com", today))
        .await
        .unwrap();
    KittyStore::insert(&store, kitty("KT-AHEAD", "a@x.com", today + Duration::days(365)))
        .await
        .unwrap();

    let active = store.active_on(today).await.unwrap();
    let addresses: Vec<&str> = active.iter().map(|k| k.address.as_str()).collect();
    assert_eq!(addresses, vec!["KT-TODAY", "KT-AHEAD"]);
}
