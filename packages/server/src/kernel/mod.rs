//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod postgres_store;
pub mod retry;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use postgres_store::PostgresStore;
pub use retry::{with_retry, RetryPolicy};
pub use test_dependencies::{InMemoryStore, InjectedFailure, TestDependencies};
pub use traits::*;
