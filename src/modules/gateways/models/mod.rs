pub mod gateway;
pub mod provider_config;

pub use gateway::{GatewayScope, GatewayUpsert, PaymentGateway};
pub use provider_config::{BillplzConfig, StripeConfig, TngDigitalConfig, ToyyibPayConfig};
