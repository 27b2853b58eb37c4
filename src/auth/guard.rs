use serde::Serialize;

use crate::session::SessionProvider;

/// Layout-level gate states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GuardState {
    #[default]
    Unchecked,
    Redirecting,
    Admitted,
}

/// Admits the application shell only while both session entries are present.
///
/// Checks presence only: the role and the token's authenticity or expiry are not
/// examined here. Once a redirect is issued the guard stays `Redirecting` until
/// [`RouteGuard::reset`] is called for a reload or a session-change event.
#[derive(Debug, Default)]
pub struct RouteGuard {
    state: GuardState,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Run the check for one render pass
    pub fn check<P: SessionProvider + ?Sized>(&mut self, provider: &P) -> GuardState {
        if self.state == GuardState::Redirecting {
            return self.state;
        }

        self.state = if provider.is_present() {
            GuardState::Admitted
        } else {
            tracing::debug!("No session found, redirecting to login");
            GuardState::Redirecting
        };
        self.state
    }

    pub fn reset(&mut self) {
        self.state = GuardState::Unchecked;
    }
}
