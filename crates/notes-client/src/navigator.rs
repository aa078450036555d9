//! Login redirect hook
//!
//! Invoked once per de-authentication, after credentials have been cleared.

use tracing::warn;

/// Sends the user back to the login flow.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Navigator that only logs; for hosts with no login view of their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect_to_login(&self) {
        warn!("session expired, login required");
    }
}
