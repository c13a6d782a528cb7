use crate::common::Principal;
use crate::domains::listings::models::Listing;

/// Whether `principal` may see `listing`.
///
/// Authorized listings are public. Unauthorized ones are seen only by their
/// owner and by admins.
pub fn is_visible(listing: &Listing, principal: Option<&Principal>) -> bool {
    listing.is_authorized
        || principal.map_or(false, |p| p.is_admin || p.owns(listing.owner_id))
}

/// Keep only the listings `principal` may see, preserving order
pub fn retain_visible(listings: Vec<Listing>, principal: Option<&Principal>) -> Vec<Listing> {
    listings
        .into_iter()
        .filter(|listing| is_visible(listing, principal))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::MemberId;
    use crate::domains::listings::models::{Condition, ListingContent};
    use rust_decimal::Decimal;

    fn listing(owner: MemberId, authorized: bool) -> Listing {
        let mut listing = Listing::new(
            owner,
            ListingContent {
                title: "Hilux".to_string(),
                description: "Work truck".to_string(),
                condition: Condition::Used,
                brand: "Toyota".to_string(),
                model: "Hilux".to_string(),
                manufacturing_year: 2010,
                price: Decimal::new(900000, 2),
                images: vec!["hilux.jpg".to_string()],
                related_link: None,
            },
        );
        listing.is_authorized = authorized;
        listing
    }

    #[test]
    fn unauthorized_listing_hidden_from_anonymous_and_strangers() {
        let owner = MemberId::new();
        let pending = listing(owner, false);

        assert!(!is_visible(&pending, None));
        assert!(!is_visible(&pending, Some(&Principal::member(MemberId::new()))));
    }

    #[test]
    fn unauthorized_listing_visible_to_owner_and_admin() {
        let owner = MemberId::new();
        let pending = listing(owner, false);

        assert!(is_visible(&pending, Some(&Principal::member(owner))));
        assert!(is_visible(&pending, Some(&Principal::admin(MemberId::new()))));
    }

    #[test]
    fn authorized_listing_is_public() {
        let live = listing(MemberId::new(), true);
        assert!(is_visible(&live, None));
    }

    #[test]
    fn retain_visible_keeps_order() {
        let owner = MemberId::new();
        let listings = vec![
            listing(owner, true),
            listing(MemberId::new(), false),
            listing(owner, false),
        ];
        let ids: Vec<_> = vec![listings[0].id, listings[2].id];

        let visible = retain_visible(listings, Some(&Principal::member(owner)));
        assert_eq!(visible.iter().map(|l| l.id).collect::<Vec<_>>(), ids);
    }
}
