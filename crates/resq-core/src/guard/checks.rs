use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Role;
use crate::session::SessionSnapshot;

use super::{Access, Route};

/// Where a role mismatch sends an authenticated user
pub const DEFAULT_LANDING: Route = Route::Home;

/// Outcome of a single guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Authentication passed; further checks may run
    Continue,
    Render,
    RedirectToLogin,
    RedirectToLanding,
}

/// What the router should do with a requested path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Navigation {
    /// The route that ends up on screen
    pub fn route(&self) -> Route {
        match self {
            Navigation::Render(route) | Navigation::Redirect(route) => *route,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Navigation::Redirect(_))
    }
}

/// Landing page for users whose role has no dedicated dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnrecognizedRolePolicy {
    /// Send them to the dispatcher operations dashboard
    #[default]
    OperationsDashboard,
    /// Keep them on the login page
    Deny,
}

pub fn require_authenticated(snapshot: &SessionSnapshot) -> GuardDecision {
    if snapshot.current_user.is_some() {
        GuardDecision::Continue
    } else {
        GuardDecision::RedirectToLogin
    }
}

/// Authentication check followed by an exact role match.
/// A user without a role never matches.
pub fn require_role(snapshot: &SessionSnapshot, required: &Role) -> GuardDecision {
    match require_authenticated(snapshot) {
        GuardDecision::Continue => {}
        other => return other,
    }

    if snapshot.current_user.as_ref().is_some_and(|u| u.has_role(required)) {
        GuardDecision::Render
    } else {
        GuardDecision::RedirectToLanding
    }
}

/// Dashboard a user lands on after login
pub fn landing_route(role: Option<&Role>, policy: UnrecognizedRolePolicy) -> Route {
    match role {
        Some(Role::FleetManager) => Route::FleetManagement,
        Some(Role::Dispatcher) => Route::Home,
        Some(Role::Unrecognized(_)) | None => match policy {
            UnrecognizedRolePolicy::OperationsDashboard => Route::Home,
            UnrecognizedRolePolicy::Deny => Route::Login,
        },
    }
}

/// Decide what to show for `path` given the current session.
pub fn navigate(snapshot: &SessionSnapshot, path: &str, policy: UnrecognizedRolePolicy) -> Navigation {
    let route = Route::from_path(path);

    let decision = match route.access() {
        Access::Public => {
            if route == Route::Login && snapshot.is_authenticated() {
                let landing = landing_route(snapshot.role(), policy);
                if landing != Route::Login {
                    debug!(from = %route, to = %landing, "Already signed in, redirecting");
                    return Navigation::Redirect(landing);
                }
            }
            GuardDecision::Render
        }
        Access::Authenticated => require_authenticated(snapshot),
        Access::Role(required) => require_role(snapshot, &required),
    };

    let navigation = match decision {
        GuardDecision::Continue | GuardDecision::Render => Navigation::Render(route),
        GuardDecision::RedirectToLogin => Navigation::Redirect(Route::Login),
        GuardDecision::RedirectToLanding => Navigation::Redirect(DEFAULT_LANDING),
    };

    if let Navigation::Redirect(to) = navigation {
        debug!(from = %route, to = %to, role = ?snapshot.role(), "Navigation redirected");
    }
    navigation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn session_with_role(role: Option<&str>) -> SessionSnapshot {
        let mut user = User::new("1", "Ahmed", "a@b.com");
        user.role = role.map(Role::from);
        SessionSnapshot {
            current_user: Some(user),
            ..Default::default()
        }
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let snapshot = SessionSnapshot::default();
        assert_eq!(require_authenticated(&snapshot), GuardDecision::RedirectToLogin);
        assert_eq!(require_role(&snapshot, &Role::FleetManager), GuardDecision::RedirectToLogin);
        assert_eq!(require_role(&snapshot, &Role::Dispatcher), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn test_pending_login_is_not_authenticated() {
        let snapshot = SessionSnapshot { loading: true, ..Default::default() };
        assert_eq!(require_authenticated(&snapshot), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn test_role_mismatch_redirects_to_landing() {
        let snapshot = session_with_role(Some("dispatcher"));
        assert_eq!(require_authenticated(&snapshot), GuardDecision::Continue);
        assert_eq!(
            require_role(&snapshot, &Role::parse("fleet_manager")),
            GuardDecision::RedirectToLanding
        );
    }

    #[test]
    fn test_role_match_renders() {
        let snapshot = session_with_role(Some("fleet_manager"));
        assert_eq!(require_role(&snapshot, &Role::parse("fleet_manager")), GuardDecision::Render);
        // Source and English spellings are the same role
        assert_eq!(require_role(&snapshot, &Role::parse("chef_parc")), GuardDecision::Render);
    }

    #[test]
    fn test_role_casing_variant_is_redirected() {
        let snapshot = session_with_role(Some("CHEF_PARC"));
        assert_eq!(require_role(&snapshot, &Role::FleetManager), GuardDecision::RedirectToLanding);
        assert_eq!(
            navigate(&snapshot, "/FleetManagement", UnrecognizedRolePolicy::default()),
            Navigation::Redirect(Route::Home)
        );
    }

    #[test]
    fn test_missing_role_never_matches() {
        let snapshot = session_with_role(None);
        assert_eq!(require_role(&snapshot, &Role::Dispatcher), GuardDecision::RedirectToLanding);
    }

    #[test]
    fn test_unrecognized_roles_compare_by_value() {
        let snapshot = session_with_role(Some("auditor"));
        assert_eq!(require_role(&snapshot, &Role::parse("auditor")), GuardDecision::Render);
        assert_eq!(require_role(&snapshot, &Role::parse("admin")), GuardDecision::RedirectToLanding);
    }

    #[test]
    fn test_landing_route() {
        let policy = UnrecognizedRolePolicy::default();
        assert_eq!(landing_route(Some(&Role::FleetManager), policy), Route::FleetManagement);
        assert_eq!(landing_route(Some(&Role::Dispatcher), policy), Route::Home);
        assert_eq!(landing_route(Some(&Role::parse("auditor")), policy), Route::Home);
        assert_eq!(landing_route(None, policy), Route::Home);

        let deny = UnrecognizedRolePolicy::Deny;
        assert_eq!(landing_route(Some(&Role::parse("auditor")), deny), Route::Login);
        assert_eq!(landing_route(Some(&Role::Dispatcher), deny), Route::Home);
    }

    #[test]
    fn test_navigate_protected_routes() {
        let policy = UnrecognizedRolePolicy::default();
        let logged_out = SessionSnapshot::default();
        assert_eq!(navigate(&logged_out, "/home", policy), Navigation::Redirect(Route::Login));
        assert_eq!(
            navigate(&logged_out, "/FleetManagement", policy),
            Navigation::Redirect(Route::Login)
        );

        let dispatcher = session_with_role(Some("regulateur"));
        assert_eq!(navigate(&dispatcher, "/home", policy), Navigation::Render(Route::Home));
        assert_eq!(
            navigate(&dispatcher, "/FleetManagement", policy),
            Navigation::Redirect(Route::Home)
        );

        let manager = session_with_role(Some("chef_parc"));
        assert_eq!(
            navigate(&manager, "/FleetManagement", policy),
            Navigation::Render(Route::FleetManagement)
        );
        // Role mismatch landing is a page every authenticated user can render
        assert_eq!(navigate(&manager, DEFAULT_LANDING.path(), policy), Navigation::Render(Route::Home));
    }

    #[test]
    fn test_navigate_login_when_signed_in() {
        let policy = UnrecognizedRolePolicy::default();
        let manager = session_with_role(Some("chef_parc"));
        assert_eq!(
            navigate(&manager, "/login", policy),
            Navigation::Redirect(Route::FleetManagement)
        );

        let logged_out = SessionSnapshot::default();
        assert_eq!(navigate(&logged_out, "/login", policy), Navigation::Render(Route::Login));

        // Under Deny the login page stays put instead of redirecting to itself
        let unknown = session_with_role(Some("auditor"));
        assert_eq!(
            navigate(&unknown, "/login", UnrecognizedRolePolicy::Deny),
            Navigation::Render(Route::Login)
        );
    }

    #[test]
    fn test_navigate_unknown_path_renders_not_found() {
        let nav = navigate(&SessionSnapshot::default(), "/incidents", UnrecognizedRolePolicy::default());
        assert_eq!(nav, Navigation::Render(Route::NotFound));
        assert!(!nav.is_redirect());
    }

    #[test]
    fn test_guard_sees_logout_immediately() {
        let policy = UnrecognizedRolePolicy::default();
        let mut snapshot = session_with_role(Some("regulateur"));
        assert_eq!(navigate(&snapshot, "/dashboard", policy).route(), Route::Dashboard);

        snapshot.current_user = None;
        assert_eq!(navigate(&snapshot, "/dashboard", policy).route(), Route::Login);
    }
}
