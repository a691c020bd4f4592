//! Navigation guard for role-scoped views.
//!
//! Guards are pure functions of a `SessionSnapshot`. They are meant to run on
//! every navigation, so a logout anywhere is seen on the next render without
//! any cached authorization state.

pub mod checks;
pub mod route;

pub use checks::{
    landing_route, navigate, require_authenticated, require_role, GuardDecision, Navigation,
    UnrecognizedRolePolicy, DEFAULT_LANDING,
};
pub use route::{Access, Route};
