// HTTP routes
pub mod comments;
pub mod engagement;
pub mod feedback;
pub mod health;
pub mod listings;
pub mod moderation;

pub use comments::*;
pub use engagement::*;
pub use feedback::*;
pub use health::*;
pub use listings::*;
pub use moderation::*;

use axum::extract::Extension;

use crate::common::Principal;

/// The principal resolved by `jwt_auth_middleware`, if any
pub(crate) fn caller(principal: Option<Extension<Principal>>) -> Option<Principal> {
    principal.map(|Extension(principal)| principal)
}
