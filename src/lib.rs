//! PayHub multi-provider payment gateway integration layer
//!
//! Stores per-tenant gateway configurations, enforces a single default
//! gateway per scope, and turns a uniform "create a test payment" request
//! into provider-specific wire calls (ToyyibPay, Stripe, Billplz,
//! TNG Digital) with normalized results.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::gateways;
