// Vehicle Market - API Core
//
// This crate provides the backend for a peer-to-peer vehicle listing
// marketplace: listing moderation, favorites and ratings, comments and
// member feedback. Business logic lives per-domain in domains/*/actions/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
