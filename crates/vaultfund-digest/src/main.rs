use std::sync::Arc;
use std::time::Duration as StdDuration;

use anyhow::Result;
use chrono::{DateTime, Duration, Local, NaiveTime, Utc};
use tracing::{error, info};

use vaultfund_core::run_digest;
use vaultfund_notify::LogNotifier;
use vaultfund_platform::{ServiceConfig, connect_database};
use vaultfund_store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "vaultfund_digest=info".to_string()),
        )
        .init();

    let config = ServiceConfig::worker_from_env()?;
    let pool = connect_database(&config.database_url).await?;
    let store = Arc::new(PgStore::new(pool));
    store.migrate().await?;

    let notifier = LogNotifier::new(config.mail_from.clone());

    info!("digest worker started; runs at local start of day");

    loop {
        let now = Local::now();
        let next = next_run_after(now);
        let wait = (next - now)
            .to_std()
            .unwrap_or(StdDuration::from_secs(24 * 60 * 60));
        info!("next digest run at {}", next);
        tokio::time::sleep(wait).await;

        let today = start_of_day(Local::now());
        // A failed run is not retried; it waits for the next instant.
        match run_digest(store.as_ref(), store.as_ref(), &notifier, today).await {
            Ok(report) => info!(
                "digest run done: {} kitties, {} sent, {} failed",
                report.kitties_digested, report.notifications_sent, report.notifications_failed
            ),
            Err(err) => error!("digest run failed: {err}"),
        }
    }
}

/// Start of the current day in the provider's local timezone.
fn start_of_day(now: DateTime<Local>) -> DateTime<Utc> {
    now.date_naive()
        .and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
        .unwrap_or(now)
        .with_timezone(&Utc)
}

/// The next local start-of-day strictly after `now`.
fn next_run_after(now: DateTime<Local>) -> DateTime<Local> {
    (now.date_naive() + Duration::days(1))
        .and_time(NaiveTime::MIN)
        .and_local_timezone(Local)
        .earliest()
        .unwrap_or(now + Duration::days(1))
}
