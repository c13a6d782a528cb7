//! Authorization for the marketplace core
//!
//! Every rule (owner-or-admin for listings and comments, admin-only for
//! moderation and feedback) is decided by [`can_perform`]. Actions use the
//! fluent wrapper:
//!
//! ```rust
//! use market_core::common::auth::{Actor, Capability, Principal};
//! use market_core::common::MemberId;
//!
//! let admin = Some(Principal::admin(MemberId::new()));
//! Actor::new(admin)
//!     .can(Capability::ModerateListing)
//!     .check()
//!     .unwrap();
//! ```

mod builder;
mod capability;
mod errors;
mod principal;

pub use builder::{Actor, CapabilityBuilder};
pub use capability::{can_perform, AccessRule, Capability, Decision, DenyReason, Resource};
pub use errors::AuthError;
pub use principal::Principal;
