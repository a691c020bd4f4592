use std::fmt;

use crate::models::Role;

/// Pages the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    /// Operations dashboard used by dispatchers
    Home,
    Dashboard,
    FleetManagement,
    NotFound,
}

/// Who may render a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Role(Role),
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::Login,
        Route::Home,
        Route::Dashboard,
        Route::FleetManagement,
        Route::NotFound,
    ];

    /// Resolve a requested path. Matching is case-sensitive; query strings,
    /// fragments and a trailing slash are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default().trim();
        let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };

        match path {
            "/login" => Route::Login,
            "/home" => Route::Home,
            "/dashboard" => Route::Dashboard,
            "/FleetManagement" => Route::FleetManagement,
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Home => "/home",
            Route::Dashboard => "/dashboard",
            Route::FleetManagement => "/FleetManagement",
            Route::NotFound => "*",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign In",
            Route::Home => "Operations",
            Route::Dashboard => "Dashboard",
            Route::FleetManagement => "Fleet Management",
            Route::NotFound => "Not Found",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Login | Route::NotFound => Access::Public,
            Route::Home | Route::Dashboard => Access::Authenticated,
            Route::FleetManagement => Access::Role(Role::FleetManager),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
