use crate::models::User;

use super::SessionSnapshot;

/// A command or login completion applied to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login attempt began
    LoginStarted,
    /// The current login attempt resolved with a user
    LoginSucceeded(User),
    /// The current login attempt failed with a display message
    LoginFailed(String),
    /// Session hydrated directly with a trusted user
    UserSet(User),
    /// Logout
    UserCleared,
    /// Back to the initial empty session
    Reset,
}

/// Compute the snapshot that follows `event`.
pub fn reduce(state: &SessionSnapshot, event: &SessionEvent) -> SessionSnapshot {
    match event {
        SessionEvent::LoginStarted => SessionSnapshot {
            current_user: state.current_user.clone(),
            loading: true,
            error: None,
        },
        SessionEvent::LoginSucceeded(user) => SessionSnapshot {
            current_user: Some(user.clone()),
            loading: false,
            error: None,
        },
        // A failed attempt never logs out an existing user
        SessionEvent::LoginFailed(message) => SessionSnapshot {
            current_user: state.current_user.clone(),
            loading: false,
            error: Some(message.clone()),
        },
        SessionEvent::UserSet(user) => SessionSnapshot {
            current_user: Some(user.clone()),
            loading: state.loading,
            error: None,
        },
        SessionEvent::UserCleared => SessionSnapshot {
            current_user: None,
            ..state.clone()
        },
        SessionEvent::Reset => SessionSnapshot::default(),
    }
}
