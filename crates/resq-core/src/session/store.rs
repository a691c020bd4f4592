//! Shared session store.
//!
//! Every transition goes through [`reduce`] under the watch channel's lock and
//! is broadcast to all subscribers before the command returns. Login attempts
//! run on spawned Tokio tasks and report back as [`SessionEvent`]s tagged with
//! the attempt number; only the most recently started attempt may update the
//! session.

use std::any::Any;
use std::future::IntoFuture;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::{AuthError, Authenticator, Credentials};
use crate::models::User;

use super::{reduce, SessionEvent, SessionPhase, SessionSnapshot};

// ============================================================================
// Constants
// ============================================================================

/// Default upper bound on a single authenticator call, in seconds
pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 15;

/// Handle to the session. Clones share the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: watch::Sender<SessionSnapshot>,
    /// Number of the latest login attempt; 0 before any attempt
    generation: AtomicU64,
    authenticator: Arc<dyn Authenticator>,
    login_timeout: Duration,
}

impl SessionStore {
    /// Create an empty, logged-out store
    pub fn new(authenticator: Arc<dyn Authenticator>) -> Self {
        Self::with_login_timeout(authenticator, Duration::from_secs(DEFAULT_LOGIN_TIMEOUT_SECS))
    }

    pub fn with_login_timeout(authenticator: Arc<dyn Authenticator>, login_timeout: Duration) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            inner: Arc::new(StoreInner {
                state,
                generation: AtomicU64::new(0),
                authenticator,
                login_timeout,
            }),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.state.borrow().phase()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().current_user.clone()
    }

    /// Receive every snapshot published after this call
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn login_timeout(&self) -> Duration {
        self.inner.login_timeout
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Log in and wait for this attempt to resolve.
    ///
    /// The failure is also stored in the snapshot's `error` field. If a newer
    /// attempt was started meanwhile, this attempt's result is still returned
    /// but does not touch the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.start_login(Credentials::new(email, password)).wait().await
    }

    /// Begin a login attempt on a background task and return immediately.
    ///
    /// The session is `loading` by the time this returns. Dropping the
    /// returned handle does not cancel the attempt.
    pub fn start_login(&self, credentials: Credentials) -> LoginTask {
        let attempt = self.inner.begin_attempt();
        info!(attempt, email = %credentials.email, "Login started");

        let authenticator = Arc::clone(&self.inner.authenticator);
        let timeout = self.inner.login_timeout;
        let store = Arc::downgrade(&self.inner);

        let handle = tokio::spawn(async move {
            // Calling `authenticate` inside the guarded future also catches
            // panics raised before its future is returned
            let call = AssertUnwindSafe(async move { authenticator.authenticate(credentials).await })
                .catch_unwind();

            let result = match tokio::time::timeout(timeout, call).await {
                Ok(Ok(result)) => result,
                Ok(Err(panic)) => Err(AuthError::Aborted(panic_message(panic.as_ref()))),
                Err(_) => Err(AuthError::Timeout(timeout)),
            };
            StoreInner::deliver(&store, attempt, &result);
            result
        });

        LoginTask {
            attempt,
            handle,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Hydrate the session with a trusted user. Clears `error`.
    pub fn set_current_user(&self, user: User) {
        info!(user_id = %user.id, "Session user set");
        self.inner.apply(&SessionEvent::UserSet(user));
    }

    /// Log out. `loading` and `error` are left as they are.
    pub fn clear_current_user(&self) {
        info!("Session user cleared");
        self.inner.apply(&SessionEvent::UserCleared);
    }

    /// Return to the initial empty session, discarding any in-flight attempt
    pub fn reset(&self) {
        debug!("Session reset");
        self.inner.state.send_modify(|snapshot| {
            self.inner.generation.fetch_add(1, Ordering::SeqCst);
            *snapshot = reduce(snapshot, &SessionEvent::Reset);
        });
    }
}

impl StoreInner {
    fn apply(&self, event: &SessionEvent) {
        self.state.send_modify(|snapshot| *snapshot = reduce(snapshot, event));
    }

    /// Start a new generation and mark the session loading in one step
    fn begin_attempt(&self) -> u64 {
        let mut attempt = 0;
        self.state.send_modify(|snapshot| {
            attempt = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *snapshot = reduce(snapshot, &SessionEvent::LoginStarted);
        });
        attempt
    }

    /// Apply a completion if `attempt` is still the latest. Returns whether it was applied.
    fn complete_attempt(&self, attempt: u64, event: &SessionEvent) -> bool {
        self.state.send_if_modified(|snapshot| {
            if self.generation.load(Ordering::SeqCst) != attempt {
                return false;
            }
            *snapshot = reduce(snapshot, event);
            true
        })
    }

    /// Route a finished attempt back to its store, if the store still exists
    fn deliver(store: &Weak<StoreInner>, attempt: u64, result: &Result<User, AuthError>) {
        let Some(inner) = store.upgrade() else {
            debug!(attempt, "Session store dropped before login resolved, discarding result");
            return;
        };

        let event = match result {
            Ok(user) => SessionEvent::LoginSucceeded(user.clone()),
            Err(e) => SessionEvent::LoginFailed(e.to_string()),
        };

        if !inner.complete_attempt(attempt, &event) {
            debug!(attempt, "Superseded login attempt resolved, discarding result");
            return;
        }

        match result {
            Ok(user) => info!(attempt, user_id = %user.id, role = ?user.role, "Login successful"),
            Err(e) => warn!(attempt, error = %e, "Login failed"),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("authenticator panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("authenticator panicked: {}", s)
    } else {
        "authenticator panicked".to_string()
    }
}

/// An in-flight login attempt.
///
/// Awaiting it (or calling [`LoginTask::wait`]) yields the attempt's own result.
pub struct LoginTask {
    attempt: u64,
    handle: JoinHandle<Result<User, AuthError>>,
    store: Weak<StoreInner>,
}

impl LoginTask {
    /// Attempt number, increasing with each `start_login`
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub async fn wait(self) -> Result<User, AuthError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => {
                // Cancelled by runtime shutdown before it could deliver
                let err = AuthError::Aborted(e.to_string());
                StoreInner::deliver(&self.store, self.attempt, &Err(err.clone()));
                Err(err)
            }
        }
    }
}

impl IntoFuture for LoginTask {
    type Output = Result<User, AuthError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        self.wait().boxed()
    }
}
