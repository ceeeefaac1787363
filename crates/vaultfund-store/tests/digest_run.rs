use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use vaultfund_core::storage::{ContributionStore, KittyStore};
use vaultfund_core::{Contribution, ContributionStatus, Kitty, run_digest};
use vaultfund_notify::{FailingNotifier, RecordingNotifier};
use vaultfund_store::MemoryStore;

fn kitty(address: &str, maturity: DateTime<Utc>) -> Kitty {
    Kitty {
        id: Uuid::new_v4(),
        email: "chair@group.org".to_string(),
        name: format!("Kitty {address}"),
        description: "A shared purse".to_string(),
        kitty_type: "savings".to_string(),
        beneficiary_count: 3,
        maturity_date: maturity,
        address: address.to_string(),
        amount: Decimal::ZERO,
        created_at: Utc::now(),
    }
}

fn contribution(address: &str, email: &str, amount: i64) -> Contribution {
    Contribution {
        id: Uuid::new_v4(),
        kitty_address: address.to_string(),
        contributor_name: "Giver".to_string(),
        contributor_email: email.to_string(),
        amount: Decimal::new(amount, 0),
        transaction_ref: format!("TX-{amount}"),
        status: ContributionStatus::Pending,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn one_digest_per_unique_contributor_with_the_full_total() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let today = Utc::now();

    KittyStore::insert(&store, kitty("KT-001", today + Duration::days(365)))
        .await
        .unwrap();
    ContributionStore::insert(&store, contribution("KT-001", "a@x.com", 100))
        .await
        .unwrap();
    ContributionStore::insert(&store, contribution("KT-001", "a@x.com", 50))
        .await
        .unwrap();
    ContributionStore::insert(&store, contribution("KT-001", "b@x.com", 25))
        .await
        .unwrap();

    let report = run_digest(&store, &store, &notifier, today).await.unwrap();
    assert_eq!(report.kitties_digested, 1);
    assert_eq!(report.notifications_sent, 2);
    assert_eq!(report.notifications_failed, 0);

    let sent = notifier.sent();
    let mut recipients: Vec<&str> = sent.iter().map(|s| s.recipient.as_str()).collect();
    recipients.sort();
    assert_eq!(recipients, vec!["a@x.com", "b@x.com"]);

    // Every digest shows the arithmetic total across all contributions,
    // pending included.
    for notification in &sent {
        assert!(notification.body.text().contains("175"));
        assert!(notification.subject.contains("Kitty KT-001"));
    }
}

#[tokio::test]
async fn matured_kitties_get_no_digest() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let today = Utc::now();

    KittyStore::insert(&store, kitty("KT-OLD", today - Duration::days(1)))
        .await
        .unwrap();
    ContributionStore::insert(&store, contribution("KT-OLD", "a@x.com", 500))
        .await
        .unwrap();

    let report = run_digest(&store, &store, &notifier, today).await.unwrap();
    assert_eq!(report.kitties_digested, 0);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn kitties_without_contributions_are_skipped() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let today = Utc::now();

    KittyStore::insert(&store, kitty("KT-EMPTY", today + Duration::days(30)))
        .await
        .unwrap();

    let report = run_digest(&store, &store, &notifier, today).await.unwrap();
    assert_eq!(report.kitties_digested, 0);
    assert_eq!(report.notifications_sent, 0);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn a_failing_recipient_does_not_abort_the_rest() {
    let store = MemoryStore::new();
    let notifier = FailingNotifier::for_recipient("a@x.com");
    let today = Utc::now();

    KittyStore::insert(&store, kitty("KT-001", today + Duration::days(30)))
        .await
        .unwrap();
    KittyStore::insert(&store, kitty("KT-002", today + Duration::days(30)))
        .await
        .unwrap();
    ContributionStore::insert(&store, contribution("KT-001", "a@x.com", 100))
        .await
        .unwrap();
    ContributionStore::insert(&store, contribution("KT-001", "b@x.com", 25))
        .await
        .unwrap();
    ContributionStore::insert(&store, contribution("KT-002", "c@x.com", 10))
        .await
        .unwrap();

    let report = run_digest(&store, &store, &notifier, today).await.unwrap();
    assert_eq!(report.kitties_digested, 2);
    assert_eq!(report.notifications_sent, 2);
    assert_eq!(report.notifications_failed, 1);

    // Every contributor was attempted exactly once despite the failure.
    let mut attempted = notifier.attempted();
    attempted.sort();
    assert_eq!(attempted, vec!["a@x.com", "b@x.com", "c@x.com"]);
}

#[tokio::test]
async fn repeat_contributors_get_one_digest_per_kitty() {
    let store = MemoryStore::new();
    let notifier = RecordingNotifier::new();
    let today = Utc::now();

    KittyStore::insert(&store, kitty("KT-001", today + Duration::days(30)))
        .await
        .unwrap();
    KittyStore::insert(&store, kitty("KT-002", today + Duration::days(30)))
        .await
        .unwrap();
    for _ in 0..3 {
        ContributionStore::insert(&store, contribution("KT-001", "a@x.com", 10))
            .await
            .unwrap();
    }
    ContributionStore::insert(&store, contribution("KT-002", "a@x.com", 5))
        .await
        .unwrap();

    let report = run_digest(&store, &store, &notifier, today).await.unwrap();
    // One digest per kitty for the same contributor, never one per
    // contribution.
    assert_eq!(report.notifications_sent, 2);
    assert_eq!(notifier.sent().len(), 2);
}
