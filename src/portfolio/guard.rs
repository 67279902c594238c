//! Authentication guard for the admin dashboard.

use super::api::TokenVerifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Checking,
    Authenticated,
    Unauthenticated,
}

impl GuardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

impl std::fmt::Display for GuardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verifies the cached credential before the guarded view may render.
///
/// There is no terminal state: [`AuthGuard::restart`] puts the guard back
/// into `Checking` for the next navigation.
#[derive(Debug, Default)]
pub struct AuthGuard {
    state: GuardState,
}

impl AuthGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Only an authenticated guard renders protected content.
    pub fn can_render(&self) -> bool {
        self.state == GuardState::Authenticated
    }

    pub fn restart(&mut self) {
        self.state = GuardState::Checking;
    }

    pub async fn check<V>(&mut self, verifier: &V) -> GuardState
    where
        V: TokenVerifier + ?Sized,
    {
        self.state = GuardState::Checking;

        if !verifier.has_credential() {
            tracing::debug!("No credential cached");
            self.state = GuardState::Unauthenticated;
            return self.state;
        }

        if verifier.verify_token().await {
            verifier.mark_authenticated();
            self.state = GuardState::Authenticated;
        } else {
            tracing::info!("Cached credential rejected; clearing it");
            verifier.clear_credential();
            self.state = GuardState::Unauthenticated;
        }
        self.state
    }
}
