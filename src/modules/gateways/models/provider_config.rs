//! Typed provider configurations.
//!
//! Gateway `config` blobs are stored opaque, but each adapter deserializes
//! into one of these structs before any wire call, so a missing or empty
//! credential fails as a configuration error instead of a provider rejection.

use serde::{Deserialize, Serialize};

use crate::core::error::{AppError, Result};

fn parse<T: serde::de::DeserializeOwned>(
    provider: &str,
    config: &serde_json::Value,
) -> Result<T> {
    serde_json::from_value(config.clone())
        .map_err(|e| AppError::configuration(format!("{} config invalid: {}", provider, e)))
}

fn require(provider: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::configuration(format!(
            "{} config is missing required key '{}'",
            provider, field
        )));
    }
    Ok(())
}

/// ToyyibPay credentials: secret key sent as a form field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToyyibPayConfig {
    #[serde(default)]
    pub user_secret_key: String,
    #[serde(default)]
    pub category_code: String,
    #[serde(default)]
    pub is_sandbox: bool,
}

impl ToyyibPayConfig {
    pub fn from_value(config: &serde_json::Value) -> Result<Self> {
        let parsed: Self = parse("ToyyibPay", config)?;
        require("ToyyibPay", "userSecretKey", &parsed.user_secret_key)?;
        require("ToyyibPay", "categoryCode", &parsed.category_code)?;
        Ok(parsed)
    }
}

/// Stripe credentials. The key prefix (sk_test_/sk_live_) implies the mode,
/// so there is no sandbox flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeConfig {
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub publishable_key: Option<String>,
}

impl StripeConfig {
    pub fn from_value(config: &serde_json::Value) -> Result<Self> {
        let parsed: Self = parse("Stripe", config)?;
        require("Stripe", "secretKey", &parsed.secret_key)?;
        Ok(parsed)
    }
}

/// Billplz credentials: API key used as the Basic auth username with an
/// empty password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillplzConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub collection_id: String,
    #[serde(default)]
    pub x_signature_key: Option<String>,
    #[serde(default)]
    pub is_sandbox: bool,
}

impl BillplzConfig {
    pub fn from_value(config: &serde_json::Value) -> Result<Self> {
        let parsed: Self = parse("Billplz", config)?;
        require("Billplz", "apiKey", &parsed.api_key)?;
        require("Billplz", "collectionId", &parsed.collection_id)?;
        Ok(parsed)
    }
}

/// TNG Digital credentials: requests are signed with the PEM private key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TngDigitalConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub merchant_id: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub is_sandbox: bool,
}

impl TngDigitalConfig {
    pub fn from_value(config: &serde_json::Value) -> Result<Self> {
        let parsed: Self = parse("TNG Digital", config)?;
        require("TNG Digital", "clientId", &parsed.client_id)?;
        require("TNG Digital", "merchantId", &parsed.merchant_id)?;
        require("TNG Digital", "privateKey", &parsed.private_key)?;
        Ok(parsed)
    }
}
