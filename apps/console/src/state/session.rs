//! # Session State
//!
//! Who is at the console and which screens they may open.
//!
//! ## Thread Safety
//! Wrapped in `Arc<Mutex<T>>`: login and logout replace the session while
//! commands read it. Every command takes the lock only long enough to copy
//! the role out.

use std::sync::{Arc, Mutex};

use opsdesk_core::{Role, Screen, Session};
use tracing::{debug, info};

use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    /// Starts logged out.
    pub fn new() -> Self {
        SessionState::default()
    }

    /// Starts logged in as `role`.
    pub fn logged_in(role: Role) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(Session::new(role))),
        }
    }

    pub fn login(&self, role: Role) -> Result<Session, ApiError> {
        let mut session = self.lock()?;
        *session = Session::new(role);
        info!(role = %role, "Logged in");
        Ok(session.clone())
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        let mut session = self.lock()?;
        session.logged_in = false;
        info!(role = %session.role, "Logged out");
        Ok(())
    }

    pub fn current(&self) -> Result<Session, ApiError> {
        Ok(self.lock()?.clone())
    }

    /// Fails unless the current session may open `screen`.
    pub fn require(&self, screen: Screen) -> Result<Role, ApiError> {
        let session = self.current()?;
        if !session.logged_in {
            return Err(ApiError::unauthenticated());
        }
        if !session.can_open(screen) {
            debug!(role = %session.role, ?screen, "Screen denied");
            return Err(ApiError::forbidden(session.role, screen));
        }
        Ok(session.role)
    }

    /// Fails unless an admin is logged in.
    pub fn require_admin(&self, screen: Screen) -> Result<(), ApiError> {
        match self.require(screen)? {
            Role::Admin => Ok(()),
            role => Err(ApiError::forbidden(role, screen)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Session>, ApiError> {
        self.session
            .lock()
            .map_err(|_| ApiError::internal("Session lock poisoned"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_logged_out_opens_nothing() {
        let state = SessionState::new();
        let err = state.require(Screen::Dashboard).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthenticated);
    }

    #[test]
    fn test_staff_gating() {
        let state = SessionState::logged_in(Role::Staff);
        assert_eq!(state.require(Screen::OrderEntry).unwrap(), Role::Staff);

        let err = state.require(Screen::Accounts).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(state.require_admin(Screen::Dashboard).is_err());
    }

    #[test]
    fn test_login_logout() {
        let state = SessionState::new();
        state.login(Role::Admin).unwrap();
        assert!(state.require_admin(Screen::Reports).is_ok());

        state.logout().unwrap();
        assert!(!state.current().unwrap().logged_in);
        assert!(state.require(Screen::Orders).is_err());
    }
}
