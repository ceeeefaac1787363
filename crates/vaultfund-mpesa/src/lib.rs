//! Daraja-style mobile-money client: a stateless two-step bridge that
//! exchanges static consumer credentials for a short-lived bearer token
//! and then submits an STK payment push. The token is re-fetched on
//! every push; nothing here is cached or retried. The callback URL is
//! passed through to the provider, but no receiver for it exists yet.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use vaultfund_core::{PaymentGateway, VaultError};
use vaultfund_platform::MpesaConfig;

#[derive(Clone)]
pub struct DarajaClient {
    http: reqwest::Client,
    config: MpesaConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl DarajaClient {
    pub fn new(config: MpesaConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Trades the consumer key/secret for a bearer token. Called once
    /// per push, trading latency and provider rate-limit headroom for
    /// simplicity.
    async fn access_token(&self) -> Result<String, VaultError> {
        let basic = BASE64.encode(format!(
            "{}:{}",
            self.config.consumer_key, self.config.consumer_secret
        ));

        let response = self
            .http
            .get(format!(
                "{}/oauth/v1/generate?grant_type=client_credentials",
                self.config.base_url
            ))
            .header("Authorization", format!("Basic {basic}"))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(VaultError::Gateway {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|err| {
            VaultError::Gateway {
                status: status.as_u16(),
                body: format!("unparseable token response: {err}; body={body}"),
            }
        })?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl PaymentGateway for DarajaClient {
    async fn push(&self, phone: &str, amount: Decimal) -> Result<Value, VaultError> {
        let token = self.access_token().await?;

        let timestamp = stk_timestamp(Local::now().naive_local());
        let password = stk_password(&self.config.shortcode, &self.config.passkey, &timestamp);

        let payload = json!({
            "BusinessShortCode": self.config.shortcode,
            "Password": password,
            "Timestamp": timestamp,
            "TransactionType": "CustomerPayBillOnline",
            "Amount": amount,
            "PartyA": phone,
            "PartyB": self.config.shortcode,
            "PhoneNumber": phone,
            "CallBackURL": self.config.callback_url,
            "AccountReference": "VaultFund",
            "TransactionDesc": "Kitty contribution",
        });

        info!("submitting payment push for {phone}");

        let response = self
            .http
            .post(format!(
                "{}/mpesa/stkpush/v1/processrequest",
                self.config.base_url
            ))
            .header("Authorization", format!("Bearer {token}"))
            .json(&payload)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        if !status.is_success() {
            // The raw provider body travels with the error so the caller
            // can surface it to the end user.
            return Err(VaultError::Gateway {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|err| VaultError::Gateway {
            status: status.as_u16(),
            body: format!("unparseable push response: {err}; body={body}"),
        })
    }
}

/// Provider password: base64 of shortcode + passkey + timestamp.
pub fn stk_password(shortcode: &str, passkey: &str, timestamp: &str) -> String {
    BASE64.encode(format!("{shortcode}{passkey}{timestamp}"))
}

/// Provider timestamp, `YYYYMMDDHHmmss` in provider-local wall time.
pub fn stk_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}

fn transport(err: reqwest::Error) -> VaultError {
    VaultError::Gateway {
        status: 0,
        body: format!("transport error: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn timestamp_is_compact_wall_clock() {
        let at = NaiveDate::from_ymd_opt(2026, 8, 30)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap();
        assert_eq!(stk_timestamp(at), "20260830140509");
    }

    #[test]
    fn password_is_base64_of_concatenation() {
        let password = stk_password("174379", "secretpasskey", "20260830140509");
        let decoded = BASE64.decode(password).unwrap();
        assert_eq!(decoded, b"174379secretpasskey20260830140509");
    }

    #[test]
    fn password_changes_with_timestamp() {
        let first = stk_password("174379", "secretpasskey", "20260830140509");
        let second = stk_password("174379", "secretpasskey", "20260830140510");
        assert_ne!(first, second);
    }
}
