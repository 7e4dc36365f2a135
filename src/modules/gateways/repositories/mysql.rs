use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::gateways::models::{GatewayScope, PaymentGateway};

use super::gateway_repository::{GatewayStore, GatewayWrite};

const SELECT_COLUMNS: &str = "id, name, is_enabled, config, is_default, \
     organization_id, created_at, updated_at";

/// MySQL-backed gateway store
#[derive(Clone)]
pub struct MySqlGatewayRepository {
    pool: MySqlPool,
}

impl MySqlGatewayRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Enforces the single-default-per-scope invariant inside a store
/// transaction. Clearing runs before the new default is written, so no
/// intermediate state with two defaults is ever visible, and the commit is
/// all-or-nothing.
pub struct DefaultGatewaySelector;

impl DefaultGatewaySelector {
    pub async fn clear_defaults(
        tx: &mut Transaction<'_, MySql>,
        scope: &GatewayScope,
    ) -> Result<()> {
        match scope.organization_id() {
            Some(org) => {
                sqlx::query(
                    "UPDATE payment_gateways SET is_default = FALSE \
                     WHERE is_default = TRUE AND organization_id = ?",
                )
                .bind(org)
                .execute(&mut **tx)
                .await?;
            }
            None => {
                sqlx::query(
                    "UPDATE payment_gateways SET is_default = FALSE \
                     WHERE is_default = TRUE AND organization_id IS NULL",
                )
                .execute(&mut **tx)
                .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GatewayStore for MySqlGatewayRepository {
    async fn list(&self, scope: &GatewayScope) -> Result<Vec<PaymentGateway>> {
        let query = format!(
            "SELECT {} FROM payment_gateways WHERE {} ORDER BY created_at ASC, id ASC",
            SELECT_COLUMNS,
            match scope.organization_id() {
                Some(_) => "organization_id = ?",
                None => "organization_id IS NULL",
            }
        );

        let mut q = sqlx::query_as::<_, PaymentGateway>(&query);
        if let Some(org) = scope.organization_id() {
            q = q.bind(org);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PaymentGateway>> {
        let query = format!(
            "SELECT {} FROM payment_gateways WHERE id = ?",
            SELECT_COLUMNS
        );

        let gateway = sqlx::query_as::<_, PaymentGateway>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(gateway)
    }

    async fn upsert(&self, write: GatewayWrite) -> Result<PaymentGateway> {
        let scope = write.scope();
        // A default gateway is never dormant.
        let is_enabled = write.is_enabled || write.is_default;
        let config_json = serde_json::to_string(&write.config)?;

        let mut tx = self.pool.begin().await?;

        if write.is_default {
            DefaultGatewaySelector::clear_defaults(&mut tx, &scope).await?;
        }

        let id = match write.id {
            Some(id) => {
                // MySQL reports zero affected rows for no-op updates, so
                // check existence explicitly instead of rows_affected().
                let exists: Option<(String,)> =
                    sqlx::query_as("SELECT id FROM payment_gateways WHERE id = ? FOR UPDATE")
                        .bind(&id)
                        .fetch_optional(&mut *tx)
                        .await?;
                if exists.is_none() {
                    return Err(AppError::not_found(format!("Payment gateway {}", id)));
                }

                sqlx::query(
                    "UPDATE payment_gateways \
                     SET name = ?, is_enabled = ?, config = ?, is_default = ?, \
                         organization_id = ? \
                     WHERE id = ?",
                )
                .bind(&write.name)
                .bind(is_enabled)
                .bind(&config_json)
                .bind(write.is_default)
                .bind(scope.organization_id())
                .bind(&id)
                .execute(&mut *tx)
                .await?;
                id
            }
            None => {
                let id = Uuid::new_v4().to_string();
                sqlx::query(
                    "INSERT INTO payment_gateways \
                     (id, name, is_enabled, config, is_default, organization_id) \
                     VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(&id)
                .bind(&write.name)
                .bind(is_enabled)
                .bind(&config_json)
                .bind(write.is_default)
                .bind(scope.organization_id())
                .execute(&mut *tx)
                .await?;
                id
            }
        };

        tx.commit().await?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Gateway {} vanished after write", id)))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM payment_gateways WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Payment gateway {}", id)));
        }
        Ok(())
    }

    async fn set_default(&self, id: &str, scope: &GatewayScope) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        DefaultGatewaySelector::clear_defaults(&mut tx, scope).await?;

        // The gateway must live in the scope whose defaults were cleared,
        // otherwise this call could leave two defaults in its real scope.
        let exists: Option<(String,)> = match scope.organization_id() {
            Some(org) => {
                sqlx::query_as(
                    "SELECT id FROM payment_gateways \
                     WHERE id = ? AND organization_id = ? FOR UPDATE",
                )
                .bind(id)
                .bind(org)
                .fetch_optional(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT id FROM payment_gateways \
                     WHERE id = ? AND organization_id IS NULL FOR UPDATE",
                )
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
            }
        };
        if exists.is_none() {
            return Err(AppError::not_found(format!(
                "Payment gateway {} in scope {}",
                id, scope
            )));
        }

        sqlx::query(
            "UPDATE payment_gateways SET is_default = TRUE, is_enabled = TRUE WHERE id = ?",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
