//! Member domain - read-only directory of members provisioned upstream

pub mod models;

pub use models::member::{Member, MemberProfile};
