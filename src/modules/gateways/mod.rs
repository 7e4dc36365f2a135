pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::configure;
pub use models::{GatewayScope, GatewayUpsert, PaymentGateway};
pub use repositories::{
    GatewayStore, GatewayWrite, InMemoryGatewayRepository, MySqlGatewayRepository,
};
pub use services::{
    AdapterResolver, GatewayRegistry, PaymentResult, Provider, ProviderAdapter,
    SandboxPaymentRunner, SandboxSettings, SigningService,
};
