use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::core::error::{AppError, Result};
use crate::modules::gateways::models::GatewayScope;
use crate::modules::gateways::repositories::GatewayStore;

use super::adapter::{AdapterResolver, PaymentResult, Provider};

/// Creates a real test payment against a configured gateway's provider.
///
/// Orchestration only: fetch the gateway, resolve its adapter, optionally
/// swap in an ad-hoc secret, invoke, and hand back the adapter's normalized
/// result untouched. No state is shared across calls.
pub struct SandboxPaymentRunner {
    store: Arc<dyn GatewayStore>,
    resolver: AdapterResolver,
}

impl SandboxPaymentRunner {
    pub fn new(store: Arc<dyn GatewayStore>, resolver: AdapterResolver) -> Self {
        Self { store, resolver }
    }

    pub async fn run(
        &self,
        gateway_id: &str,
        scope: &GatewayScope,
        amount: Decimal,
        secret_override: Option<String>,
    ) -> Result<PaymentResult> {
        let gateway = self
            .store
            .find_by_id(gateway_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment gateway {}", gateway_id)))?;

        // A caller in one scope never tests another scope's gateway.
        if gateway.scope() != *scope {
            return Err(AppError::not_found(format!(
                "Payment gateway {} in scope {}",
                gateway_id, scope
            )));
        }

        if !gateway.is_enabled {
            return Err(AppError::not_found(format!(
                "Payment gateway {} is disabled",
                gateway_id
            )));
        }

        if !gateway.config.is_object() {
            return Err(AppError::configuration(
                "Gateway config is not a JSON object",
            ));
        }

        let adapter = self.resolver.resolve(&gateway.name).ok_or_else(|| {
            AppError::UnsupportedProvider(format!(
                "No provider adapter matches gateway '{}'",
                gateway.name
            ))
        })?;

        let mut config = gateway.config.clone();
        let overridden = secret_override.is_some();
        if let Some(secret) = secret_override {
            // For this call only; the stored configuration is untouched.
            apply_secret_override(adapter.provider(), &mut config, secret);
        }

        info!(
            gateway_id = %gateway_id,
            provider = %adapter.provider(),
            scope = %scope,
            amount = %amount,
            secret_override = overridden,
            "Creating sandbox test payment"
        );

        Ok(adapter.create_test_payment(amount, &config).await)
    }
}

/// Substitute an ad-hoc secret into the provider's single secret field.
pub fn apply_secret_override(
    provider: Provider,
    config: &mut serde_json::Value,
    secret: String,
) {
    if let Some(object) = config.as_object_mut() {
        object.insert(
            provider.secret_field().to_string(),
            serde_json::Value::String(secret),
        );
    }
}
