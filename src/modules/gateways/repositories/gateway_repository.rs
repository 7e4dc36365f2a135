//! Gateway store port.
//!
//! The registry and sandbox runner receive a `dyn GatewayStore` at
//! construction instead of reaching for a process-wide database handle.
//! Adapters (MySQL, in-memory) implement this trait.

use async_trait::async_trait;

use crate::core::Result;
use crate::modules::gateways::models::{GatewayScope, PaymentGateway};

/// A validated gateway write, ready for the store. `config` has already been
/// parsed by the registry; the store treats it as an opaque document.
#[derive(Debug, Clone)]
pub struct GatewayWrite {
    pub id: Option<String>,
    pub name: String,
    pub is_enabled: bool,
    pub config: serde_json::Value,
    pub is_default: bool,
    pub organization_id: Option<String>,
}

impl GatewayWrite {
    pub fn scope(&self) -> GatewayScope {
        GatewayScope::from_organization(self.organization_id.clone())
    }
}

/// Persistence port for gateway records.
///
/// Operations that touch the default flag MUST be atomic: no reader at the
/// store's isolation level may observe two defaults in one scope.
#[async_trait]
pub trait GatewayStore: Send + Sync + 'static {
    /// All gateways in exactly this scope, ordered by creation time ascending.
    async fn list(&self, scope: &GatewayScope) -> Result<Vec<PaymentGateway>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentGateway>>;

    /// Insert (no id) or update (id present). When `write.is_default` is
    /// set, every other default in the scope is cleared within the same
    /// transaction, and the record is forced enabled.
    async fn upsert(&self, write: GatewayWrite) -> Result<PaymentGateway>;

    /// Remove the record. A deleted default leaves the scope with zero
    /// defaults; nothing is auto-reassigned.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Atomically clear other defaults in `scope`, then mark `id` as the
    /// default and enabled.
    async fn set_default(&self, id: &str, scope: &GatewayScope) -> Result<()>;
}
