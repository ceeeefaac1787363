use anyhow::{Context, Result};

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub database_url: String,
    pub http_addr: String,
    pub mail_from: String,
}

impl ServiceConfig {
    pub fn from_env(default_http_addr: &str) -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let http_addr =
            std::env::var("HTTP_ADDR").unwrap_or_else(|_| default_http_addr.to_string());
        let mail_from =
            std::env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@vaultfund.app".to_string());

        Ok(Self {
            database_url,
            http_addr,
            mail_from,
        })
    }

    pub fn worker_from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is required")?;
        let mail_from =
            std::env::var("MAIL_FROM").unwrap_or_else(|_| "noreply@vaultfund.app".to_string());

        Ok(Self {
            database_url,
            http_addr: String::new(),
            mail_from,
        })
    }
}

/// Credentials and identities for the mobile-money provider. All static;
/// the short-lived access token is fetched per push, never configured.
#[derive(Clone, Debug)]
pub struct MpesaConfig {
    pub base_url: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub shortcode: String,
    pub passkey: String,
    pub callback_url: String,
}

impl MpesaConfig {
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("MPESA_BASE_URL")
            .unwrap_or_else(|_| "https://sandbox.safaricom.co.ke".to_string());
        let consumer_key =
            std::env::var("MPESA_CONSUMER_KEY").context("MPESA_CONSUMER_KEY is required")?;
        let consumer_secret =
            std::env::var("MPESA_CONSUMER_SECRET").context("MPESA_CONSUMER_SECRET is required")?;
        let shortcode = std::env::var("MPESA_SHORTCODE").context("MPESA_SHORTCODE is required")?;
        let passkey = std::env::var("MPESA_PASSKEY").context("MPESA_PASSKEY is required")?;
        let callback_url =
            std::env::var("MPESA_CALLBACK_URL").context("MPESA_CALLBACK_URL is required")?;

        Ok(Self {
            base_url,
            consumer_key,
            consumer_secret,
            shortcode,
            passkey,
            callback_url,
        })
    }
}
