use futures::future::BoxFuture;

use super::{AuthError, Credentials};
use crate::models::User;

/// Resolves login credentials into a user record.
///
/// The returned future owns everything it needs so the session store can run
/// it on a spawned task that outlives the caller.
pub trait Authenticator: Send + Sync + 'static {
    fn authenticate(&self, credentials: Credentials) -> BoxFuture<'static, Result<User, AuthError>>;
}
