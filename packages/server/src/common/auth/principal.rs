use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::common::entity_ids::MemberId;

/// The resolved identity of a caller.
///
/// Credential verification happens outside the core (see the JWT middleware);
/// every action receives an already-resolved `Option<Principal>`, where `None`
/// means an anonymous caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub member_id: MemberId,
    pub is_admin: bool,
}

impl Principal {
    pub fn member(member_id: MemberId) -> Self {
        Self {
            member_id,
            is_admin: false,
        }
    }

    pub fn admin(member_id: MemberId) -> Self {
        Self {
            member_id,
            is_admin: true,
        }
    }

    /// Unwrap an optional principal or fail with `AuthenticationRequired`.
    pub fn required(principal: Option<Principal>) -> Result<Principal, AuthError> {
        principal.ok_or(AuthError::AuthenticationRequired)
    }

    pub fn owns(&self, owner_id: MemberId) -> bool {
        self.member_id == owner_id
    }
}
