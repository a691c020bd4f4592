//! Data models for ResQ session entities.
//!
//! - `User`: the authenticated operator record returned by the users endpoint
//! - `Role`: the closed set of operator roles that gate protected views

pub mod role;
pub mod user;

pub use role::Role;
pub use user::User;
