use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::core::error::{truncate_payload, AppError};
use crate::core::money::to_minor_units;
use crate::modules::gateways::models::ToyyibPayConfig;

use super::adapter::{
    transport_error, PaymentResult, Provider, ProviderAdapter, SandboxSettings,
};

const SANDBOX_HOST: &str = "https://dev.toyyibpay.com";
const LIVE_HOST: &str = "https://toyyibpay.com";

/// ToyyibPay bill creation
///
/// Form-encoded POST to the createBill API. The secret key travels as a form
/// field; the payment URL is the host joined with the returned bill code.
/// API reference: https://toyyibpay.com/apireference/
pub struct ToyyibPayAdapter {
    client: Client,
    settings: SandboxSettings,
}

impl ToyyibPayAdapter {
    pub fn new(client: Client, settings: SandboxSettings) -> Self {
        Self { client, settings }
    }

    pub fn base_url(config: &ToyyibPayConfig) -> &'static str {
        if config.is_sandbox {
            SANDBOX_HOST
        } else {
            LIVE_HOST
        }
    }

    pub fn endpoint(config: &ToyyibPayConfig) -> String {
        format!("{}/index.php/api/createBill", Self::base_url(config))
    }

    pub fn form_fields(
        &self,
        config: &ToyyibPayConfig,
        amount_minor: i64,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("userSecretKey", config.user_secret_key.clone()),
            ("categoryCode", config.category_code.clone()),
            ("billName", "Sandbox Test Payment".to_string()),
            (
                "billDescription",
                "Test payment from system sandbox".to_string(),
            ),
            ("billPriceSetting", "1".to_string()),
            ("billPayorInfo", "1".to_string()),
            ("billAmount", amount_minor.to_string()),
            ("billReturnUrl", self.settings.return_url.clone()),
            (
                "billCallbackUrl",
                format!("{}/callback", self.settings.callback_base),
            ),
            (
                "billExternalReferenceNo",
                format!("TEST-{}", Utc::now().timestamp_millis()),
            ),
            ("billTo", "Test User".to_string()),
            ("billEmail", "test@example.com".to_string()),
            ("billPhone", "0123456789".to_string()),
        ]
    }

    /// ToyyibPay replies with a JSON array whose first element carries
    /// `BillCode` on success; anything else is a rejection.
    pub fn decode(base_url: &str, body: &str) -> PaymentResult {
        let data: serde_json::Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                return AppError::Parse(format!(
                    "ToyyibPay response not valid JSON: {} ({})",
                    e,
                    truncate_payload(body, 500)
                ))
                .into()
            }
        };

        match data
            .get(0)
            .and_then(|bill| bill.get("BillCode"))
            .and_then(|code| code.as_str())
        {
            Some(bill_code) => PaymentResult::ok(format!("{}/{}", base_url, bill_code)),
            None => AppError::ProviderRejection(format!(
                "ToyyibPay did not return a bill code: {}",
                truncate_payload(body, 500)
            ))
            .into(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for ToyyibPayAdapter {
    fn provider(&self) -> Provider {
        Provider::ToyyibPay
    }

    async fn create_test_payment(
        &self,
        amount: Decimal,
        config: &serde_json::Value,
    ) -> PaymentResult {
        let config = match ToyyibPayConfig::from_value(config) {
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
            .form(&self.form_fields(&config, amount_minor))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return transport_error(Provider::ToyyibPay, &e).into(),
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return transport_error(Provider::ToyyibPay, &e).into(),
        };

        Self::decode(Self::base_url(&config), &body)
    }
}
