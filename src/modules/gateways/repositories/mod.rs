pub mod gateway_repository;
pub mod memory;
pub mod mysql;

pub use gateway_repository::{GatewayStore, GatewayWrite};
pub use memory::InMemoryGatewayRepository;
pub use mysql::{DefaultGatewaySelector, MySqlGatewayRepository};
