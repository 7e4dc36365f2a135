use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::core::error::AppError;
use crate::modules::gateways::models::{GatewayScope, GatewayUpsert};
use crate::modules::gateways::services::{GatewayRegistry, SandboxPaymentRunner};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeQuery {
    pub organization_id: Option<String>,
}

impl ScopeQuery {
    fn scope(&self) -> GatewayScope {
        GatewayScope::from_organization(self.organization_id.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxTestRequest {
    pub organization_id: Option<String>,
    pub amount: Decimal,
    /// Ad-hoc credential for this call only; never persisted.
    pub secret_override: Option<String>,
}

/// GET /gateways?organizationId=...
/// Gateways in exactly the requested scope, creation time ascending.
pub async fn list_gateways(
    registry: web::Data<GatewayRegistry>,
    query: web::Query<ScopeQuery>,
) -> Result<HttpResponse, AppError> {
    let gateways = registry.list(&query.scope()).await?;
    Ok(HttpResponse::Ok().json(gateways))
}

/// PUT /gateways
/// Insert (no id) or update (id present) a gateway record.
pub async fn upsert_gateway(
    registry: web::Data<GatewayRegistry>,
    payload: web::Json<GatewayUpsert>,
) -> Result<HttpResponse, AppError> {
    let gateway = registry.upsert(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(gateway))
}

/// DELETE /gateways/{id}
pub async fn delete_gateway(
    registry: web::Data<GatewayRegistry>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    registry.delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /gateways/{id}/default
/// Make this gateway the single default in its scope.
pub async fn set_default_gateway(
    registry: web::Data<GatewayRegistry>,
    path: web::Path<String>,
    payload: web::Json<ScopeQuery>,
) -> Result<HttpResponse, AppError> {
    registry
        .set_default(&path.into_inner(), &payload.scope())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /gateways/{id}/test
/// Create a real sandbox payment against the gateway's provider and return
/// the normalized result.
pub async fn test_gateway(
    runner: web::Data<SandboxPaymentRunner>,
    path: web::Path<String>,
    payload: web::Json<SandboxTestRequest>,
) -> Result<HttpResponse, AppError> {
    let request = payload.into_inner();
    let scope = GatewayScope::from_organization(request.organization_id);
    let result = runner
        .run(
            &path.into_inner(),
            &scope,
            request.amount,
            request.secret_override,
        )
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Configure gateway routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gateways")
            .route("", web::get().to(list_gateways))
            .route("", web::put().to(upsert_gateway))
            .route("/{id}", web::delete().to(delete_gateway))
            .route("/{id}/default", web::post().to(set_default_gateway))
            .route("/{id}/test", web::post().to(test_gateway)),
    );
}
