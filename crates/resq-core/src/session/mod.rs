//! Session state container.
//!
//! This module provides:
//! - `SessionSnapshot`: the immutable view of who is logged in
//! - `SessionEvent` and `reduce`: the pure transition function
//! - `SessionStore`: the shared store that runs login attempts on spawned
//!   tasks and notifies subscribers after every transition
//!
//! Nothing here is persisted; a fresh store always starts logged out.

pub mod reducer;
pub mod snapshot;
pub mod store;

pub use reducer::{reduce, SessionEvent};
pub use snapshot::{SessionPhase, SessionSnapshot};
pub use store::{LoginTask, SessionStore, DEFAULT_LOGIN_TIMEOUT_SECS};
