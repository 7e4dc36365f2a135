use std::sync::Arc;

use tracing::{error, info};

use crate::core::error::{AppError, Result};
use crate::modules::gateways::models::{
    BillplzConfig, GatewayScope, GatewayUpsert, PaymentGateway, StripeConfig, TngDigitalConfig,
    ToyyibPayConfig,
};
use crate::modules::gateways::repositories::{GatewayStore, GatewayWrite};

use super::adapter::Provider;

/// Tenant-scoped CRUD over gateway records.
///
/// The store is injected so the registry never touches a process-wide
/// database handle. All default-flag writes go through the store's atomic
/// clear-then-set path.
pub struct GatewayRegistry {
    store: Arc<dyn GatewayStore>,
}

impl GatewayRegistry {
    pub fn new(store: Arc<dyn GatewayStore>) -> Self {
        Self { store }
    }

    /// Gateways whose scope matches exactly, creation time ascending.
    pub async fn list(&self, scope: &GatewayScope) -> Result<Vec<PaymentGateway>> {
        self.store.list(scope).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<PaymentGateway>> {
        self.store.find_by_id(id).await
    }

    /// Validate and write a gateway record.
    ///
    /// The config blob must be valid JSON; when the gateway name resolves to
    /// a known provider, the typed config is also validated here so a broken
    /// credential set fails at save time rather than at dispatch time.
    pub async fn upsert(&self, payload: GatewayUpsert) -> Result<PaymentGateway> {
        let config: serde_json::Value = serde_json::from_str(&payload.config)
            .map_err(|e| AppError::configuration(format!("Invalid JSON configuration: {}", e)))?;

        if let Some(provider) = Provider::detect(&payload.name) {
            validate_provider_config(provider, &config)?;
        }

        let scope = payload.scope();
        info!(
            gateway = %payload.name,
            scope = %scope,
            is_default = payload.is_default,
            "Upserting payment gateway"
        );

        let result = self
            .store
            .upsert(GatewayWrite {
                id: payload.id,
                name: payload.name,
                is_enabled: payload.is_enabled,
                config,
                is_default: payload.is_default,
                organization_id: scope.organization_id().map(str::to_string),
            })
            .await;

        if let Err(e) = &result {
            error!(error = %e, "Failed to upsert payment gateway");
        }
        result
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        info!(gateway_id = %id, "Deleting payment gateway");
        self.store.delete(id).await
    }

    /// Make `id` the single default in `scope`; the gateway is also enabled,
    /// since a default gateway is never dormant.
    pub async fn set_default(&self, id: &str, scope: &GatewayScope) -> Result<()> {
        info!(gateway_id = %id, scope = %scope, "Setting default payment gateway");
        self.store.set_default(id, scope).await
    }
}

/// Eager per-provider config validation at upsert time.
fn validate_provider_config(provider: Provider, config: &serde_json::Value) -> Result<()> {
    match provider {
        Provider::ToyyibPay => ToyyibPayConfig::from_value(config).map(|_| ()),
        Provider::Stripe => StripeConfig::from_value(config).map(|_| ()),
        Provider::Billplz => BillplzConfig::from_value(config).map(|_| ()),
        Provider::TngDigital => TngDigitalConfig::from_value(config).map(|_| ()),
    }
}
