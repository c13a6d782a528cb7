//! Auth domain - bearer token verification
//!
//! Members sign in through the identity provider; the core only turns a
//! presented token into a `Principal`.

pub mod jwt;

pub use jwt::{Claims, JwtService};
