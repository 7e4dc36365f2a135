use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::json;

use crate::core::error::{truncate_payload, AppError};
use crate::core::money::to_minor_units;
use crate::modules::gateways::models::BillplzConfig;

use super::adapter::{
    transport_error, PaymentResult, Provider, ProviderAdapter, SandboxSettings,
};

const SANDBOX_HOST: &str = "https://www.billplz-sandbox.com";
const LIVE_HOST: &str = "https://www.billplz.com";

/// Billplz bill creation
///
/// JSON POST to the v3 bills API, authenticated with HTTP Basic where the
/// API key is the username and the password is empty.
/// API reference: https://www.billplz.com/api
pub struct BillplzAdapter {
    client: Client,
    settings: SandboxSettings,
}

impl BillplzAdapter {
    pub fn new(client: Client, settings: SandboxSettings) -> Self {
        Self { client, settings }
    }

    pub fn base_url(config: &BillplzConfig) -> &'static str {
        if config.is_sandbox {
            SANDBOX_HOST
        } else {
            LIVE_HOST
        }
    }

    pub fn endpoint(config: &BillplzConfig) -> String {
        format!("{}/api/v3/bills", Self::base_url(config))
    }

    pub fn payload(&self, config: &BillplzConfig, amount_minor: i64) -> serde_json::Value {
        json!({
            "collection_id": config.collection_id,
            "description": "Sandbox Test Payment",
            "email": "test@example.com",
            "name": "Test User",
            "amount": amount_minor,
            "callback_url": format!("{}/billplz/callback", self.settings.callback_base),
            "redirect_url": format!("{}?billplz[paid]=true", self.settings.return_url),
        })
    }

    /// Success marker: 2xx and a `url` field in the body. Error messages
    /// prefer the provider's `error.message` over the raw payload.
    pub fn decode(status_ok: bool, body: &str) -> PaymentResult {
        let data: serde_json::Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                return AppError::Parse(format!(
                    "Billplz response not valid JSON: {} ({})",
                    e,
                    truncate_payload(body, 500)
                ))
                .into()
            }
        };

        if status_ok {
            if let Some(url) = data.get("url").and_then(|u| u.as_str()) {
                return PaymentResult::ok(url);
            }
        }

        let message = data
            .pointer("/error/message")
            .map(|m| m.to_string())
            .unwrap_or_else(|| truncate_payload(body, 500));
        AppError::ProviderRejection(format!("Billplz bill creation failed: {}", message)).into()
    }
}

#[async_trait]
impl ProviderAdapter for BillplzAdapter {
    fn provider(&self) -> Provider {
        Provider::Billplz
    }

    async fn create_test_payment(
        &self,
        amount: Decimal,
        config: &serde_json::Value,
    ) -> PaymentResult {
        let config = match BillplzConfig::from_value(config) {
            Ok(config) => config,
            Err(e) => return e.into(),
        };
        let amount_minor = match to_minor_units(amount) {
            Ok(minor) => minor,
            Err(e) => return e.into(),
        };

        let response = match self
            .client
            .post(Self::endpoint(&config))
            .basic_auth(&config.api_key, Some(""))
            .json(&self.payload(&config, amount_minor))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return transport_error(Provider::Billplz, &e).into(),
        };

        let status_ok = response.status().is_success();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return transport_error(Provider::Billplz, &e).into(),
        };

        Self::decode(status_ok, &body)
    }
}
