// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod error;
pub mod id;

pub use auth::{Actor, AuthError, Capability, Principal, Resource};
pub use entity_ids::*;
pub use error::{MarketError, MarketResult};
pub use id::Id;
