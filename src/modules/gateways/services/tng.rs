use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use crate::core::error::{truncate_payload, AppError};
use crate::core::money::to_minor_units;
use crate::modules::gateways::models::TngDigitalConfig;

use super::adapter::{
    transport_error, PaymentResult, Provider, ProviderAdapter, SandboxSettings,
};
use super::signing::SigningService;

const SANDBOX_HOST: &str = "https://ual.tngdigital.com.my";
const LIVE_HOST: &str = "https://miniprogram.tngdigital.com.my";
const PAY_PATH: &str = "/acl/api/v1/payments/pay";

/// Sentinel payment URL when the provider approves without a redirect form.
const NO_REDIRECT_URL: &str = "#";

/// TNG Digital cashier payment
///
/// JSON POST signed with the merchant's RSA private key. The body is
/// serialized exactly once; the same bytes are signed and sent, since the
/// provider verifies the signature against the wire payload.
pub struct TngDigitalAdapter {
    client: Client,
    settings: SandboxSettings,
}

impl TngDigitalAdapter {
    pub fn new(client: Client, settings: SandboxSettings) -> Self {
        Self { client, settings }
    }

    pub fn base_url(config: &TngDigitalConfig) -> &'static str {
        if config.is_sandbox {
            SANDBOX_HOST
        } else {
            LIVE_HOST
        }
    }

    pub fn endpoint(config: &TngDigitalConfig) -> String {
        format!("{}{}", Self::base_url(config), PAY_PATH)
    }

    /// Millisecond timestamp plus a short random suffix, unique per attempt.
    pub fn payment_request_id() -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("REQ-{}-{}", Utc::now().timestamp_millis(), &suffix[..6])
    }

    pub fn payload(
        &self,
        config: &TngDigitalConfig,
        amount_minor: i64,
        payment_request_id: &str,
    ) -> serde_json::Value {
        json!({
            "partnerId": config.merchant_id,
            "appId": "unknown",
            "paymentRequestId": payment_request_id,
            "paymentOrderTitle": "Sandbox Test Payment",
            "productCode": "PC_000001",
            "mcc": "0000",
            "paymentAmount": {
                "currency": "MYR",
                "value": amount_minor.to_string()
            },
            "paymentFactor": {
                "isCashierPayment": true
            },
            "paymentReturnUrl": format!("{}?status=success", self.settings.return_url),
            "paymentNotifyUrl": format!("{}/tng/callback", self.settings.callback_base),
            "extendInfo": "{\"customerBelongsTo\":\"tng\"}",
            "envInfo": {
                "osType": "IOS",
                "terminalType": "APP"
            }
        })
    }

    /// Success marker: `result.resultStatus` of `A` (accepted) or `S`
    /// (success). The cashier flow returns the redirect in
    /// `actionForm.redirectionUrl`.
    pub fn decode(body: &str) -> PaymentResult {
        let data: serde_json::Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => {
                return AppError::Parse(format!(
                    "TNG Digital response not valid JSON: {} ({})",
                    e,
                    truncate_payload(body, 500)
                ))
                .into()
            }
        };

        let status = data
            .pointer("/result/resultStatus")
            .and_then(|s| s.as_str());

        if matches!(status, Some("A") | Some("S")) {
            let url = data
                .pointer("/actionForm/redirectionUrl")
                .and_then(|u| u.as_str())
                .unwrap_or(NO_REDIRECT_URL);
            return PaymentResult::ok(url);
        }

        let message = data
            .pointer("/result/resultMessage")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| truncate_payload(body, 500));
        AppError::ProviderRejection(format!("TNG Digital payment failed: {}", message)).into()
    }
}

#[async_trait]
impl ProviderAdapter for TngDigitalAdapter {
    fn provider(&self) -> Provider {
        Provider::TngDigital
    }

    async fn create_test_payment(
        &self,
        amount: Decimal,
        config: &serde_json::Value,
    ) -> PaymentResult {
        let config = match TngDigitalConfig::from_value(config) {
            Ok(config) => config,
            Err(e) => return e.into(),
        };
        let amount_minor = match to_minor_units(amount) {
            Ok(minor) => minor,
            Err(e) => return e.into(),
        };

        let request_id = Self::payment_request_id();
        let payload = self.payload(&config, amount_minor, &request_id);
        let body = match serde_json::to_string(&payload) {
            Ok(body) => body,
            Err(e) => return AppError::Json(e).into(),
        };

        // Sign the exact bytes that go on the wire.
        let signature = match SigningService::sign(body.as_bytes(), &config.private_key) {
            Ok(signature) => signature,
            Err(e) => return e.into(),
        };
        let request_time = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let response = match self
            .client
            .post(Self::endpoint(&config))
            .header("Content-Type", "application/json; charset=UTF-8")
            .header("Client-Id", &config.client_id)
            .header("Request-Time", request_time)
            .header("Signature", SigningService::signature_header(&signature))
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return transport_error(Provider::TngDigital, &e).into(),
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return transport_error(Provider::TngDigital, &e).into(),
        };

        Self::decode(&body)
    }
}
