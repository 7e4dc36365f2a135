use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payhub::config::Config;
use payhub::middleware::RequestId;
use payhub::modules::gateways::{
    self, AdapterResolver, GatewayRegistry, GatewayStore, MySqlGatewayRepository,
    SandboxPaymentRunner,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payhub=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting PayHub gateway integration service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config.database.create_pool().await?;
    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    let store: Arc<dyn GatewayStore> = Arc::new(MySqlGatewayRepository::new(db_pool));
    let registry = web::Data::new(GatewayRegistry::new(store.clone()));
    let runner = web::Data::new(SandboxPaymentRunner::new(
        store,
        AdapterResolver::new(config.sandbox.clone()),
    ));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let server = HttpServer::new(move || {
        App::new()
            .app_data(registry.clone())
            .app_data(runner.clone())
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .route("/health", web::get().to(health_check))
            .configure(gateways::configure)
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "payhub"
    }))
}
