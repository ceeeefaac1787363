use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result as AnyResult;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use vaultfund_core::{
    ContributionLedger, KittyRegistry, NewContribution, NewKitty, PaymentGateway, VaultError,
};
use vaultfund_mpesa::DarajaClient;
use vaultfund_notify::LogNotifier;
use vaultfund_platform::{
    ContributionListResponse, CreateKittyRequest, CreateKittyResponse, KittyExistsResponse,
    KittyListResponse, MpesaConfig, PushPaymentRequest, RecordContributionRequest,
    RecordContributionResponse, ServiceConfig, connect_database,
};
use vaultfund_store::PgStore;

#[derive(Clone)]
struct AppState {
    registry: KittyRegistry,
    ledger: ContributionLedger,
    payments: Arc<dyn PaymentGateway>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct KittyAddressQuery {
    address: Option<String>,
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "vaultfund_gateway=info".to_string()),
        )
        .init();

    let config = ServiceConfig::from_env("0.0.0.0:8080")?;
    let mpesa_config = MpesaConfig::from_env()?;

    let pool = connect_database(&config.database_url).await?;
    let store = Arc::new(PgStore::new(pool));
    store.migrate().await?;

    let notifier = Arc::new(LogNotifier::new(config.mail_from.clone()));
    let state = AppState {
        registry: KittyRegistry::new(store.clone(), notifier.clone()),
        ledger: ContributionLedger::new(store, notifier),
        payments: Arc::new(DarajaClient::new(mpesa_config)),
    };

    let router = app_router(state);

    let addr: SocketAddr = config.http_addr.parse()?;
    info!("gateway listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/kitties", post(create_kitty).get(list_kitties))
        .route("/kitties/search", get(find_kitties))
        .route("/kitties/{address}/exists", get(kitty_exists))
        .route("/contributions", post(record_contribution).get(list_contributions))
        .route("/contributions/search", get(find_contributions))
        .route("/contributions/by-kitty", get(contributions_by_kitty))
        .route("/payments/push", post(push_payment))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn create_kitty(
    State(state): State<AppState>,
    Json(payload): Json<CreateKittyRequest>,
) -> Result<(StatusCode, Json<CreateKittyResponse>), (StatusCode, String)> {
    let kitty = state
        .registry
        .create(NewKitty {
            email: payload.email,
            name: payload.name,
            description: payload.description,
            kitty_type: payload.kitty_type,
            beneficiary_count: payload.beneficiary_count,
            maturity_date: payload.maturity_date,
            address: payload.address,
        })
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateKittyResponse {
            message: "Kitty created successfully!".to_string(),
            kitty,
        }),
    ))
}

async fn list_kitties(
    State(state): State<AppState>,
) -> Result<Json<KittyListResponse>, (StatusCode, String)> {
    let items = state.registry.list().await.map_err(error_response)?;
    Ok(Json(KittyListResponse { items }))
}

async fn find_kitties(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<KittyListResponse>, (StatusCode, String)> {
    let email = require_query(query.email, "email")?;
    let items = state
        .registry
        .find_by_email(&email)
        .await
        .map_err(error_response)?;
    Ok(Json(KittyListResponse { items }))
}

async fn kitty_exists(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<KittyExistsResponse>, (StatusCode, String)> {
    let exists = state
        .registry
        .exists(&address)
        .await
        .map_err(error_response)?;
    Ok(Json(KittyExistsResponse { address, exists }))
}

async fn record_contribution(
    State(state): State<AppState>,
    Json(payload): Json<RecordContributionRequest>,
) -> Result<(StatusCode, Json<RecordContributionResponse>), (StatusCode, String)> {
    let contribution = state
        .ledger
        .record(NewContribution {
            kitty_address: payload.kitty_address,
            contributor_name: payload.name,
            contributor_email: payload.email,
            amount: payload.amount,
            transaction_ref: payload.transaction_ref,
        })
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(RecordContributionResponse {
            message: "Contribution recorded successfully!".to_string(),
            contribution_id: contribution.id,
            status: contribution.status,
            created_at: contribution.created_at,
        }),
    ))
}

async fn list_contributions(
    State(state): State<AppState>,
) -> Result<Json<ContributionListResponse>, (StatusCode, String)> {
    let items = state.ledger.list_all().await.map_err(error_response)?;
    Ok(Json(ContributionListResponse { items }))
}

async fn find_contributions(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<ContributionListResponse>, (StatusCode, String)> {
    let email = require_query(query.email, "email")?;
    let items = state
        .ledger
        .list_by_email(&email)
        .await
        .map_err(error_response)?;
    Ok(Json(ContributionListResponse { items }))
}

async fn contributions_by_kitty(
    State(state): State<AppState>,
    Query(query): Query<KittyAddressQuery>,
) -> Result<Json<ContributionListResponse>, (StatusCode, String)> {
    let address = require_query(query.address, "address")?;
    let items = state
        .ledger
        .list_by_kitty(&address)
        .await
        .map_err(error_response)?;
    Ok(Json(ContributionListResponse { items }))
}

async fn push_payment(
    State(state): State<AppState>,
    Json(payload): Json<PushPaymentRequest>,
) -> Result<Json<Value>, (StatusCode, String)> {
    if payload.phone.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "phone is required".to_string()));
    }

    let provider_response = state
        .payments
        .push(payload.phone.trim(), payload.amount)
        .await
        .map_err(error_response)?;

    Ok(Json(provider_response))
}

fn require_query(value: Option<String>, name: &str) -> Result<String, (StatusCode, String)> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err((StatusCode::BAD_REQUEST, format!("{name} is required"))),
    }
}

fn error_response(err: VaultError) -> (StatusCode, String) {
    match err {
        VaultError::Validation(_) | VaultError::Conflict(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        VaultError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        // The raw provider body is surfaced so the caller can show it.
        VaultError::Gateway { status, body } => {
            error!("payment gateway failure (provider status {status})");
            (StatusCode::INTERNAL_SERVER_ERROR, body)
        }
        VaultError::Store(details) => {
            error!("store failure: {details}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            )
        }
        VaultError::Notification { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        ),
    }
}
