use serde::{Deserialize, Serialize};

use crate::models::{Role, User};

/// Point-in-time view of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub current_user: Option<User>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Coarse login state derived from a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    LoggedOut,
    Authenticating,
    Authenticated,
    LoginFailed,
}

impl SessionSnapshot {
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Authenticating
        } else if self.current_user.is_some() {
            SessionPhase::Authenticated
        } else if self.error.is_some() {
            SessionPhase::LoginFailed
        } else {
            SessionPhase::LoggedOut
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Role of the current user, if logged in and the record carries one
    pub fn role(&self) -> Option<&Role> {
        self.current_user.as_ref().and_then(User::role)
    }
}
