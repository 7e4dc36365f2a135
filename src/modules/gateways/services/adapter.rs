use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::AppError;

use super::billplz::BillplzAdapter;
use super::stripe::StripeAdapter;
use super::tng::TngDigitalAdapter;
use super::toyyibpay::ToyyibPayAdapter;

/// Outbound provider calls get one bounded attempt. A hung provider must
/// surface as a transport error, never block the runner indefinitely.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Supported payment providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    ToyyibPay,
    Stripe,
    Billplz,
    TngDigital,
}

impl Provider {
    /// Derive the provider from the gateway's display name.
    ///
    /// Dispatch is a case-insensitive substring match in a fixed priority
    /// order. A name like "My Stripe Clone" therefore resolves to Stripe;
    /// keep provider keywords out of unrelated gateway names.
    pub fn detect(gateway_name: &str) -> Option<Provider> {
        let name = gateway_name.to_lowercase();
        if name.contains("toyyibpay") {
            Some(Provider::ToyyibPay)
        } else if name.contains("stripe") {
            Some(Provider::Stripe)
        } else if name.contains("billplz") {
            Some(Provider::Billplz)
        } else if name.contains("touch") || name.contains("tng") {
            Some(Provider::TngDigital)
        } else {
            None
        }
    }

    /// The one config key an ad-hoc secret override replaces for this
    /// provider.
    pub fn secret_field(&self) -> &'static str {
        match self {
            Provider::ToyyibPay => "userSecretKey",
            Provider::Stripe => "secretKey",
            Provider::Billplz => "apiKey",
            Provider::TngDigital => "privateKey",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::ToyyibPay => write!(f, "toyyibpay"),
            Provider::Stripe => write!(f, "stripe"),
            Provider::Billplz => write!(f, "billplz"),
            Provider::TngDigital => write!(f, "tngdigital"),
        }
    }
}

/// Normalized outcome of a provider call. This two-variant shape is the only
/// contract callers depend on, regardless of which provider was invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PaymentResult {
    pub fn ok(payment_url: impl Into<String>) -> Self {
        Self {
            success: true,
            payment_url: Some(payment_url.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            payment_url: None,
            error: Some(error.into()),
        }
    }
}

impl From<AppError> for PaymentResult {
    fn from(err: AppError) -> Self {
        PaymentResult::failed(err.to_string())
    }
}

/// Classify a reqwest failure for the normalized error message.
pub(crate) fn transport_error(provider: Provider, err: &reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::transport(format!(
            "{} request timed out after {}s",
            provider,
            PROVIDER_TIMEOUT.as_secs()
        ))
    } else if err.is_connect() {
        AppError::transport(format!("{} connection failed: {}", provider, err))
    } else {
        AppError::transport(format!("{} request failed: {}", provider, err))
    }
}

/// Redirect/callback URLs stamped into synthesized sandbox bill metadata.
#[derive(Debug, Clone)]
pub struct SandboxSettings {
    /// Page the payer lands on after completing (or abandoning) the payment.
    pub return_url: String,
    /// Base for provider server-to-server callbacks; adapters append their
    /// provider-specific path.
    pub callback_base: String,
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            return_url: "http://localhost:3000/system/payment-gateways/sandbox".to_string(),
            callback_base: "http://localhost:3000/api/payment".to_string(),
        }
    }
}

/// Provider adapter: encode a `(amount, config)` pair into the provider's
/// wire call and decode the reply into a [`PaymentResult`].
///
/// Nothing escapes this boundary as an error. Transport failures, non-2xx
/// statuses, unparseable bodies, and 2xx bodies without the provider's
/// success marker all come back as `{success: false, error}`.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> Provider;

    async fn create_test_payment(
        &self,
        amount: Decimal,
        config: &serde_json::Value,
    ) -> PaymentResult;
}

/// Maps a gateway record to the adapter that speaks its provider's protocol.
pub struct AdapterResolver {
    toyyibpay: Arc<ToyyibPayAdapter>,
    stripe: Arc<StripeAdapter>,
    billplz: Arc<BillplzAdapter>,
    tng: Arc<TngDigitalAdapter>,
}

impl AdapterResolver {
    pub fn new(settings: SandboxSettings) -> Self {
        // One client for all adapters; the timeout covers connect through
        // body read.
        let client = Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            toyyibpay: Arc::new(ToyyibPayAdapter::new(client.clone(), settings.clone())),
            stripe: Arc::new(StripeAdapter::new(client.clone(), settings.clone())),
            billplz: Arc::new(BillplzAdapter::new(client.clone(), settings.clone())),
            tng: Arc::new(TngDigitalAdapter::new(client, settings)),
        }
    }

    pub fn resolve(&self, gateway_name: &str) -> Option<Arc<dyn ProviderAdapter>> {
        match Provider::detect(gateway_name)? {
            Provider::ToyyibPay => Some(self.toyyibpay.clone()),
            Provider::Stripe => Some(self.stripe.clone()),
            Provider::Billplz => Some(self.billplz.clone()),
            Provider::TngDigital => Some(self.tng.clone()),
        }
    }
}
