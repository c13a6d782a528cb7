// Business domains
pub mod auth;
pub mod comments;
pub mod engagement;
pub mod feedback;
pub mod listings;
pub mod member;
pub mod moderation;
