//! REST client for the ResQ data server.
//!
//! The dispatch backend is a json-server style store exposing collection
//! endpoints. Only the `/users` collection is consumed here, to resolve
//! login credentials into a `User` record.

pub mod client;
pub mod error;

pub use client::HttpAuthenticator;
pub use error::ApiError;
