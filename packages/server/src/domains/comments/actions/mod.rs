//! Comment actions
//!
//! Adding or listing requires the listing to be visible to the caller.
//! Editing and deleting are for the author or an admin; a denied request leaves
//! the comment exactly as it was.

use tracing::info;

use crate::common::auth::{Actor, Capability, Resource};
use crate::common::{CommentId, ListingId, MarketError, MarketResult, Principal};
use crate::domains::comments::models::{normalize_text, Comment};
use crate::domains::listings::actions::find_visible;
use crate::kernel::ServerDeps;

pub async fn add_comment(
    listing_id: ListingId,
    text: String,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Comment> {
    let author = Actor::new(principal)
        .can(Capability::AddComment)
        .check()?;
    let text = normalize_text(&text)?;
    find_visible(listing_id, Some(&author), deps).await?;

    let comment = Comment::new(listing_id, author.member_id, text);
    info!(
        comment_id = %comment.id,
        listing_id = %listing_id,
        author_id = %author.member_id,
        "Adding comment"
    );

    deps.comments.insert(&comment).await?;
    Ok(comment)
}

/// Replace a comment's text and mark it edited (author or admin)
pub async fn edit_comment(
    comment_id: CommentId,
    text: String,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Comment> {
    let principal = Principal::required(principal)?;
    let comment = find_comment(comment_id, deps).await?;

    Actor::new(Some(principal))
        .can(Capability::EditComment)
        .on(Resource::OwnedBy(comment.author_id))
        .check()?;

    let text = normalize_text(&text)?;

    info!(comment_id = %comment_id, member_id = %principal.member_id, "Editing comment");

    deps.comments
        .update_text(comment_id, &text)
        .await?
        .ok_or_else(|| MarketError::not_found("Comment", comment_id))
}

/// Remove a comment (author or admin)
pub async fn delete_comment(
    comment_id: CommentId,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<()> {
    let principal = Principal::required(principal)?;
    let comment = find_comment(comment_id, deps).await?;

    Actor::new(Some(principal))
        .can(Capability::DeleteComment)
        .on(Resource::OwnedBy(comment.author_id))
        .check()?;

    info!(comment_id = %comment_id, member_id = %principal.member_id, "Deleting comment");

    if !deps.comments.delete(comment_id).await? {
        return Err(MarketError::not_found("Comment", comment_id));
    }
    Ok(())
}

/// Comments on a visible listing in the order they were posted
pub async fn list_comments(
    listing_id: ListingId,
    principal: Option<Principal>,
    deps: &ServerDeps,
) -> MarketResult<Vec<Comment>> {
    find_visible(listing_id, principal.as_ref(), deps).await?;
    Ok(deps.comments.list_for_listing(listing_id).await?)
}

async fn find_comment(comment_id: CommentId, deps: &ServerDeps) -> MarketResult<Comment> {
    deps.comments
        .find_by_id(comment_id)
        .await?
        .ok_or_else(|| MarketError::not_found("Comment", comment_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::MemberId;
    use crate::domains::listings::models::{Condition, Listing, ListingContent};
    use crate::kernel::TestDependencies;
    use rust_decimal::Decimal;

    async fn authorized_listing(deps: &ServerDeps) -> ListingId {
        let mut listing = Listing::new(
            MemberId::new(),
            ListingContent {
                title: "Ranger".to_string(),
                description: "Towing package".to_string(),
                condition: Condition::Used,
                brand: "Ford".to_string(),
                model: "Ranger".to_string(),
                manufacturing_year: 2019,
                price: Decimal::new(2400000, 2),
                images: vec!["ranger.jpg".to_string()],
                related_link: None,
            },
        );
        listing.is_authorized = true;
        deps.listings.insert(&listing).await.unwrap();
        listing.id
    }

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let deps = TestDependencies::new().into_deps();
        let listing_id = authorized_listing(&deps).await;
        let author = Some(Principal::member(MemberId::new()));

        let result = add_comment(listing_id, "  ".to_string(), author, &deps).await;
        assert!(matches!(result, Err(MarketError::Validation(_))));
    }

    #[tokio::test]
    async fn stranger_edit_is_denied_and_comment_unchanged() {
        let deps = TestDependencies::new().into_deps();
        let listing_id = authorized_listing(&deps).await;
        let author = Principal::member(MemberId::new());
        let comment = add_comment(listing_id, "Is it rust free?".to_string(), Some(author), &deps)
            .await
            .unwrap();

        let stranger = Some(Principal::member(MemberId::new()));
        let edit = edit_comment(comment.id, "spam".to_string(), stranger, &deps).await;
        assert!(matches!(edit, Err(MarketError::PermissionDenied(_))));
        let delete = delete_comment(comment.id, stranger, &deps).await;
        assert!(matches!(delete, Err(MarketError::PermissionDenied(_))));

        let stored = deps.comments.find_by_id(comment.id).await.unwrap().unwrap();
        assert_eq!(stored, comment);
    }

    #[tokio::test]
    async fn author_and_admin_may_edit() {
        let deps = TestDependencies::new().into_deps();
        let listing_id = authorized_listing(&deps).await;
        let author = Principal::member(MemberId::new());
        let comment = add_comment(listing_id, "First".to_string(), Some(author), &deps)
            .await
            .unwrap();

        let edited = edit_comment(comment.id, "First, edited".to_string(), Some(author), &deps)
            .await
            .unwrap();
        assert!(edited.edited);
        assert_eq!(edited.text, "First, edited");

        let admin = Some(Principal::admin(MemberId::new()));
        delete_comment(comment.id, admin, &deps).await.unwrap();
        assert!(list_comments(listing_id, None, &deps).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn comments_keep_insertion_order_after_edits() {
        let deps = TestDependencies::new().into_deps();
        let listing_id = authorized_listing(&deps).await;
        let author = Principal::member(MemberId::new());

        let first = add_comment(listing_id, "one".to_string(), Some(author), &deps)
            .await
            .unwrap();
        add_comment(listing_id, "two".to_string(), Some(author), &deps)
            .await
            .unwrap();
        edit_comment(first.id, "one again".to_string(), Some(author), &deps)
            .await
            .unwrap();

        let texts: Vec<_> = list_comments(listing_id, None, &deps)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["one again", "two"]);
    }

    #[tokio::test]
    async fn cannot_comment_on_hidden_listing() {
        let deps = TestDependencies::new().into_deps();
        let listing_id = authorized_listing(&deps).await;
        deps.listings.set_authorized(listing_id, false).await.unwrap();

        let result = add_comment(
            listing_id,
            "hello".to_string(),
            Some(Principal::member(MemberId::new())),
            &deps,
        )
        .await;
        assert!(matches!(result, Err(MarketError::NotFound { .. })));
    }
}
