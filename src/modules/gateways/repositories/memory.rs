use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::gateways::models::{GatewayScope, PaymentGateway};

use super::gateway_repository::{GatewayStore, GatewayWrite};

/// In-memory gateway store.
///
/// Backs unit tests and local runs without a MySQL instance. The whole map
/// sits behind one mutex, so clear-then-set is atomic with respect to every
/// other operation, matching the transactional guarantee of the MySQL store.
#[derive(Default)]
pub struct InMemoryGatewayRepository {
    gateways: Mutex<HashMap<String, PaymentGateway>>,
}

impl InMemoryGatewayRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn in_scope(gateway: &PaymentGateway, scope: &GatewayScope) -> bool {
    gateway.organization_id.as_deref() == scope.organization_id()
}

#[async_trait]
impl GatewayStore for InMemoryGatewayRepository {
    async fn list(&self, scope: &GatewayScope) -> Result<Vec<PaymentGateway>> {
        let gateways = self.gateways.lock().expect("gateway store poisoned");
        let mut matching: Vec<PaymentGateway> = gateways
            .values()
            .filter(|g| in_scope(g, scope))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matching)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentGateway>> {
        let gateways = self.gateways.lock().expect("gateway store poisoned");
        Ok(gateways.get(id).cloned())
    }

    async fn upsert(&self, write: GatewayWrite) -> Result<PaymentGateway> {
        let scope = write.scope();
        let is_enabled = write.is_enabled || write.is_default;
        let now = Utc::now().naive_utc();

        let mut gateways = self.gateways.lock().expect("gateway store poisoned");

        // No rollback here, so reject unknown ids before touching defaults.
        if let Some(id) = &write.id {
            if !gateways.contains_key(id) {
                return Err(AppError::not_found(format!("Payment gateway {}", id)));
            }
        }

        if write.is_default {
            for gateway in gateways.values_mut().filter(|g| in_scope(g, &scope)) {
                gateway.is_default = false;
            }
        }

        let stored = match write.id {
            Some(id) => {
                let existing = gateways.get_mut(&id).expect("checked above");
                existing.name = write.name;
                existing.is_enabled = is_enabled;
                existing.config = write.config;
                existing.is_default = write.is_default;
                existing.organization_id = scope.organization_id().map(str::to_string);
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let gateway = PaymentGateway {
                    id: Uuid::new_v4().to_string(),
                    name: write.name,
                    is_enabled,
                    config: write.config,
                    is_default: write.is_default,
                    organization_id: scope.organization_id().map(str::to_string),
                    created_at: now,
                    updated_at: now,
                };
                gateways.insert(gateway.id.clone(), gateway.clone());
                gateway
            }
        };

        Ok(stored)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut gateways = self.gateways.lock().expect("gateway store poisoned");
        gateways
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Payment gateway {}", id)))
    }

    async fn set_default(&self, id: &str, scope: &GatewayScope) -> Result<()> {
        let mut gateways = self.gateways.lock().expect("gateway store poisoned");

        // Same rule as the MySQL store: the gateway must live in `scope`.
        let in_requested_scope = gateways
            .get(id)
            .map(|g| in_scope(g, scope))
            .unwrap_or(false);
        if !in_requested_scope {
            return Err(AppError::not_found(format!(
                "Payment gateway {} in scope {}",
                id, scope
            )));
        }

        for gateway in gateways.values_mut().filter(|g| in_scope(g, scope)) {
            gateway.is_default = false;
        }

        let gateway = gateways.get_mut(id).expect("checked above");
        gateway.is_default = true;
        gateway.is_enabled = true;
        gateway.updated_at = Utc::now().naive_utc();
        Ok(())
    }
}
