pub mod config;
pub mod contracts;
pub mod db;

pub use config::{MpesaConfig, ServiceConfig};
pub use contracts::{
    ContributionListResponse, CreateKittyRequest, CreateKittyResponse, KittyExistsResponse,
    KittyListResponse, PushPaymentRequest, RecordContributionRequest, RecordContributionResponse,
};
pub use db::connect_database;
