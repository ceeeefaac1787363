pub mod digest;
pub mod error;
pub mod ledger;
pub mod models;
pub mod notify;
pub mod payments;
pub mod registry;
pub mod storage;

pub use digest::{DigestReport, run_digest};
pub use error::VaultError;
pub use ledger::ContributionLedger;
pub use models::{Contribution, ContributionStatus, Kitty, NewContribution, NewKitty};
pub use notify::{Notifier, NotifyBody};
pub use payments::PaymentGateway;
pub use registry::KittyRegistry;
pub use storage::{ContributionStore, KittyStore};
