pub mod favorite;
pub mod rating;

pub use favorite::*;
pub use rating::*;
