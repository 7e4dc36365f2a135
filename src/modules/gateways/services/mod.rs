pub mod adapter;
pub mod billplz;
pub mod registry;
pub mod sandbox;
pub mod signing;
pub mod stripe;
pub mod tng;
pub mod toyyibpay;

pub use adapter::{
    AdapterResolver, PaymentResult, Provider, ProviderAdapter, SandboxSettings,
};
pub use billplz::BillplzAdapter;
pub use registry::GatewayRegistry;
pub use sandbox::SandboxPaymentRunner;
pub use signing::SigningService;
pub use stripe::StripeAdapter;
pub use tng::TngDigitalAdapter;
pub use toyyibpay::ToyyibPayAdapter;
