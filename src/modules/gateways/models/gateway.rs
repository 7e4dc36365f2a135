use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tenant boundary for gateway records. The single-default invariant is
/// enforced independently per scope; global and per-organization gateways
/// are disjoint sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GatewayScope {
    Global,
    Organization(String),
}

impl GatewayScope {
    pub fn from_organization(organization_id: Option<String>) -> Self {
        match organization_id {
            Some(id) if !id.is_empty() => GatewayScope::Organization(id),
            _ => GatewayScope::Global,
        }
    }

    /// Database representation: NULL organization_id means global.
    pub fn organization_id(&self) -> Option<&str> {
        match self {
            GatewayScope::Global => None,
            GatewayScope::Organization(id) => Some(id),
        }
    }
}

impl std::fmt::Display for GatewayScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayScope::Global => write!(f, "global"),
            GatewayScope::Organization(id) => write!(f, "{}", id),
        }
    }
}

/// Configured payment gateway record
///
/// `config` is an opaque provider-specific JSON document. The registry never
/// interprets it; only the adapter matched for this gateway does.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentGateway {
    pub id: String,
    pub name: String,
    pub is_enabled: bool,

    #[sqlx(json)]
    pub config: serde_json::Value,

    pub is_default: bool,
    pub organization_id: Option<String>,

    #[sqlx(default)]
    pub created_at: chrono::NaiveDateTime,

    #[sqlx(default)]
    pub updated_at: chrono::NaiveDateTime,
}

impl PaymentGateway {
    pub fn scope(&self) -> GatewayScope {
        GatewayScope::from_organization(self.organization_id.clone())
    }
}

/// Upsert payload issued by an administrator. `config` arrives as a raw JSON
/// string and is parsed (and rejected) by the registry before it touches the
/// store. An absent `id` inserts, a present `id` updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayUpsert {
    pub id: Option<String>,
    pub name: String,
    pub is_enabled: bool,
    pub config: String,
    pub is_default: bool,
    pub organization_id: Option<String>,
}

impl GatewayUpsert {
    pub fn scope(&self) -> GatewayScope {
        GatewayScope::from_organization(self.organization_id.clone())
    }
}
