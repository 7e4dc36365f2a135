use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::core::error::{truncate_payload, AppError};
use crate::core::money::to_minor_units;
use crate::modules::gateways::models::StripeConfig;

use super::adapter::{
    transport_error, PaymentResult, Provider, ProviderAdapter, SandboxSettings,
};

const API_HOST: &str = "https://api.stripe.com";

/// Stripe Checkout Session creation
///
/// Form-encoded POST to the Checkout Sessions API with bearer auth. Stripe
/// has no sandbox host; the secret key prefix (sk_test_/sk_live_) selects
/// the mode. Currency is fixed at MYR, the tenant's operating currency.
/// API reference: https://docs.stripe.com/api/checkout/sessions/create
pub struct StripeAdapter {
    client: Client,
    settings: SandboxSettings,
}

impl StripeAdapter {
    pub fn new(client: Client, settings: SandboxSettings) -> Self {
        Self { client, settings }
    }

    pub fn endpoint() -> String {
        format!("{}/v1/checkout/sessions", API_HOST)
    }

    pub fn form_fields(&self, amount_minor: i64) -> Vec<(&'static str, String)> {
        vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("line_items[0][price_data][currency]", "myr".to_string()),
            (
                "line_items[0][price_data][unit_amount]",
                amount_minor.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]",
                "Sandbox Test Payment".to_string(),
            ),
            (
                "line_items[0][price_data][product_data][description]",
                "Test payment from system sandbox".to_string(),
            ),
            (
                "success_url",
                format!("{}?status=success", self.settings.return_url),
            ),
            (
                "cancel_url",
                format!("{}?status=cancelled", self.settings.return_url),
            ),
        ]
    }

    /// Success marker: the created session carries a `url`.
    pub fn decode(status_ok: bool, body: &str) -> PaymentResult {
        let data: serde_json::Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                return AppError::Parse(format!(
                    "Stripe response not valid JSON: {} ({})",
                    e,
                    truncate_payload(body, 500)
                ))
                .into()
            }
        };

        if status_ok {
            return match data.get("url").and_then(|u| u.as_str()) {
                Some(url) => PaymentResult::ok(url),
                None => AppError::ProviderRejection(
                    "Stripe session created without a redirect URL".to_string(),
                )
                .into(),
            };
        }

        let message = data
            .pointer("/error/message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| truncate_payload(body, 500));
        AppError::ProviderRejection(format!("Stripe session creation failed: {}", message))
            .into()
    }
}

#[async_trait]
impl ProviderAdapter for StripeAdapter {
    fn provider(&self) -> Provider {
        Provider::Stripe
    }

    async fn create_test_payment(
        &self,
        amount: Decimal,
        config: &serde_json::Value,
    ) -> PaymentResult {
        let config = match StripeConfig::from_value(config) {
            Ok(config) => config,
            Err(e) => return e.into(),
        };
        let amount_minor = match to_minor_units(amount) {
            Ok(minor) => minor,
            Err(e) => return e.into(),
        };

        let response = match self
            .client
            .post(Self::endpoint())
            .bearer_auth(&config.secret_key)
            .form(&self.form_fields(amount_minor))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return transport_error(Provider::Stripe, &e).into(),
        };

        let status_ok = response.status().is_success();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return transport_error(Provider::Stripe, &e).into(),
        };

        Self::decode(status_ok, &body)
    }
}
