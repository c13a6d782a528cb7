use tracing::warn;

use super::{can_perform, AuthError, Capability, Decision, DenyReason, Principal, Resource};

/// Entry point for authorization checks
///
/// Usage:
/// ```
/// use market_core::common::auth::{Actor, Capability, Principal, Resource};
/// use market_core::common::MemberId;
///
/// let author = MemberId::new();
/// let principal = Actor::new(Some(Principal::member(author)))
///     .can(Capability::EditComment)
///     .on(Resource::OwnedBy(author))
///     .check()
///     .unwrap();
/// assert_eq!(principal.member_id, author);
/// ```
pub struct Actor {
    principal: Option<Principal>,
}

impl Actor {
    pub fn new(principal: Option<Principal>) -> Self {
        Self { principal }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: Capability) -> CapabilityBuilder {
        CapabilityBuilder {
            principal: self.principal,
            capability,
            resource: Resource::Global,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder {
    principal: Option<Principal>,
    capability: Capability,
    resource: Resource,
}

impl CapabilityBuilder {
    /// Scope the check to a specific resource
    pub fn on(mut self, resource: Resource) -> Self {
        self.resource = resource;
        self
    }

    /// Perform the authorization check, returning the authenticated principal
    pub fn check(self) -> Result<Principal, AuthError> {
        match (
            can_perform(self.principal.as_ref(), self.resource, self.capability),
            self.principal,
        ) {
            (Decision::Allow, Some(principal)) => Ok(principal),
            (Decision::Allow, None) | (Decision::Deny(DenyReason::Unauthenticated), _) => {
                Err(AuthError::AuthenticationRequired)
            }
            (Decision::Deny(reason), principal) => {
                warn!(
                    capability = ?self.capability,
                    member_id = ?principal.map(|p| p.member_id),
                    ?reason,
                    "Authorization denied"
                );
                Err(match reason {
                    DenyReason::AdminRequired => AuthError::AdminRequired,
                    _ => AuthError::PermissionDenied(format!(
                        "{:?} requires ownership or admin access",
                        self.capability
                    )),
                })
            }
        }
    }
}
