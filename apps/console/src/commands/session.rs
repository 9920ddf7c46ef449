//! # Session Commands
//!
//! Login is a role pick, not an identity check; the ledger trusts whoever
//! is at the console.

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::SessionState;
use opsdesk_core::{Role, Screen, Session};

/// The session plus the navigation it unlocks.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session: Session,
    pub screens: Vec<Screen>,
}

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        let screens = if session.logged_in {
            session.role.screens()
        } else {
            Vec::new()
        };
        SessionView { session, screens }
    }
}

pub fn login(session: &SessionState, role: Role) -> Result<SessionView, ApiError> {
    debug!(role = %role, "login command");
    Ok(session.login(role)?.into())
}

pub fn logout(session: &SessionState) -> Result<(), ApiError> {
    debug!("logout command");
    session.logout()
}

pub fn current_session(session: &SessionState) -> Result<SessionView, ApiError> {
    Ok(session.current()?.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_navigation() {
        let state = SessionState::new();
        assert!(current_session(&state).unwrap().screens.is_empty());

        let view = login(&state, Role::Staff).unwrap();
        assert_eq!(view.screens.len(), 4);
        assert!(!view.screens.contains(&Screen::Accounts));

        logout(&state).unwrap();
        assert!(current_session(&state).unwrap().screens.is_empty());
    }
}
