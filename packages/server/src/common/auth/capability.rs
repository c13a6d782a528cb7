//! The single capability check behind every authorization decision.

use super::Principal;
use crate::common::entity_ids::MemberId;

/// Actions a principal may attempt against a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    CreateListing,
    EditListing,
    DeleteListing,
    /// Flip a listing's moderation flag (authorize or unauthorize)
    ModerateListing,
    ReviewPendingListings,
    /// Favorite or rate a listing
    Engage,
    AddComment,
    EditComment,
    DeleteComment,
    SubmitFeedback,
    ReadFeedback,
}

/// Who is allowed to exercise a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    AnyMember,
    OwnerOrAdmin,
    AdminOnly,
}

impl Capability {
    pub fn rule(&self) -> AccessRule {
        match self {
            Capability::CreateListing
            | Capability::Engage
            | Capability::AddComment
            | Capability::SubmitFeedback => AccessRule::AnyMember,
            Capability::EditListing
            | Capability::DeleteListing
            | Capability::EditComment
            | Capability::DeleteComment => AccessRule::OwnerOrAdmin,
            Capability::ModerateListing
            | Capability::ReviewPendingListings
            | Capability::ReadFeedback => AccessRule::AdminOnly,
        }
    }
}

/// The thing being acted on, as far as authorization cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// No owner (collections, the moderation queue, the feedback inbox)
    Global,
    /// A listing or comment owned by its creator
    OwnedBy(MemberId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unauthenticated,
    AdminRequired,
    NotOwner,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Decide whether `principal` may exercise `capability` on `resource`.
///
/// Admins have override authority on owned resources but are not owners.
/// An owner-scoped capability on a `Global` resource is admin-only.
pub fn can_perform(
    principal: Option<&Principal>,
    resource: Resource,
    capability: Capability,
) -> Decision {
    let Some(principal) = principal else {
        return Decision::Deny(DenyReason::Unauthenticated);
    };

    match capability.rule() {
        AccessRule::AnyMember => Decision::Allow,
        AccessRule::AdminOnly if principal.is_admin => Decision::Allow,
        AccessRule::AdminOnly => Decision::Deny(DenyReason::AdminRequired),
        AccessRule::OwnerOrAdmin => {
            if principal.is_admin {
                return Decision::Allow;
            }
            match resource {
                Resource::OwnedBy(owner_id) if principal.owns(owner_id) => Decision::Allow,
                _ => Decision::Deny(DenyReason::NotOwner),
            }
        }
    }
}
