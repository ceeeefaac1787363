use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::error::VaultError;
use crate::models::{Contribution, Kitty};
use crate::notify::{Notifier, NotifyBody};
use crate::storage::{ContributionStore, KittyStore};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DigestReport {
    pub kitties_digested: usize,
    pub notifications_sent: usize,
    pub notifications_failed: usize,
}

/// One settlement-digest pass over every active kitty.
///
/// A kitty is active while its maturity date is `today` or later;
/// matured kitties stop receiving summaries. Kitties without
/// contributions are skipped outright. Each unique contributor email
/// gets exactly one individually-addressed digest per kitty, and a send
/// failure never aborts the remaining recipients or kitties. The pass
/// reads the stores without locking, so a contribution landing mid-run
/// may or may not make this run's summary.
pub async fn run_digest(
    kitties: &dyn KittyStore,
    contributions: &dyn ContributionStore,
    notifier: &dyn Notifier,
    today: DateTime<Utc>,
) -> Result<DigestReport, VaultError> {
    let active = kitties.active_on(today).await?;
    let mut report = DigestReport::default();

    for kitty in active {
        let entries = match contributions.list_by_kitty(&kitty.address).await {
            Ok(entries) => entries,
            Err(err) => {
                error!("skipping kitty {}: {err}", kitty.address);
                continue;
            }
        };

        if entries.is_empty() {
            continue;
        }

        let total: Decimal = entries.iter().map(|entry| entry.amount).sum();
        let subject = format!("Contribution summary for {}", kitty.name);
        let body = NotifyBody::Html(render_summary(&kitty, &entries, total));

        for recipient in unique_contributor_emails(&entries) {
            match notifier.send(&recipient, &subject, &body).await {
                Ok(()) => report.notifications_sent += 1,
                Err(err) => {
                    report.notifications_failed += 1;
                    warn!("digest for kitty {} not delivered: {err}", kitty.address);
                }
            }
        }

        report.kitties_digested += 1;
    }

    info!(
        "digest pass complete: {} kitties, {} sent, {} failed",
        report.kitties_digested, report.notifications_sent, report.notifications_failed
    );

    Ok(report)
}

/// Contributor emails with duplicates removed, first-seen order kept. A
/// contributor who gave several times gets one digest, not one per
/// contribution.
pub fn unique_contributor_emails(entries: &[Contribution]) -> Vec<String> {
    let mut seen = Vec::new();
    for entry in entries {
        if !seen.iter().any(|email| email == &entry.contributor_email) {
            seen.push(entry.contributor_email.clone());
        }
    }
    seen
}

/// Tabular rendering of every contribution plus the arithmetic total.
/// The total includes pending amounts, matching ledger semantics.
pub fn render_summary(kitty: &Kitty, entries: &[Contribution], total: Decimal) -> String {
    let mut html = String::new();
    html.push_str(&format!(
        "<h3>Contributions to {} ({})</h3>\n",
        kitty.name, kitty.address
    ));
    html.push_str("<table border=\"1\" cellpadding=\"4\">\n");
    html.push_str(
        "<tr><th>Name</th><th>Email</th><th>Amount</th><th>Reference</th><th>Status</th></tr>\n",
    );

    for entry in entries {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            entry.contributor_name,
            entry.contributor_email,
            entry.amount,
            entry.transaction_ref,
            entry.status
        ));
    }

    html.push_str(&format!(
        "<tr><td colspan=\"2\"><strong>Total</strong></td><td colspan=\"3\"><strong>{total}</strong></td></tr>\n",
    ));
    html.push_str("</table>\n");
    html
}
