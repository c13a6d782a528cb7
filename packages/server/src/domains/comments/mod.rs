//! Comments domain - member remarks on listings

pub mod actions;
pub mod models;

pub use models::Comment;
