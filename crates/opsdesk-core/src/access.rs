//! # Access Module
//!
//! Roles and the console screens each role may open.
//!
//! ```text
//!              Dashboard  Orders  OrderEntry  BulkEntry  Inventory  Reports  Accounts
//!   Admin         ✓         ✓        ✓           ✓          ✓          ✓        ✓
//!   Staff         ✓         ✓        ✓                      ✓
//! ```
//!
//! This is screen gating for a trusted team, not a security boundary. The
//! ledger functions themselves never check roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Staff => f.write_str("staff"),
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["admin".to_string(), "staff".to_string()],
            }),
        }
    }
}

/// Console surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    Orders,
    OrderEntry,
    BulkEntry,
    Inventory,
    Reports,
    Accounts,
}

impl Screen {
    pub const ALL: [Screen; 7] = [
        Screen::Dashboard,
        Screen::Orders,
        Screen::OrderEntry,
        Screen::BulkEntry,
        Screen::Inventory,
        Screen::Reports,
        Screen::Accounts,
    ];
}

impl Role {
    pub fn can_open(&self, screen: Screen) -> bool {
        match self {
            Role::Admin => true,
            Role::Staff => matches!(
                screen,
                Screen::Dashboard | Screen::Orders | Screen::OrderEntry | Screen::Inventory
            ),
        }
    }

    /// Screens shown in the navigation for this role.
    pub fn screens(&self) -> Vec<Screen> {
        Screen::ALL
            .into_iter()
            .filter(|s| self.can_open(*s))
            .collect()
    }
}

/// Who is using the console.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    pub role: Role,
    pub logged_in: bool,
}

impl Session {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            logged_in: true,
        }
    }

    /// Logged out sessions can open nothing.
    pub fn can_open(&self, screen: Screen) -> bool {
        self.logged_in && self.role.can_open(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_sees_everything() {
        assert_eq!(Role::Admin.screens().len(), Screen::ALL.len());
    }

    #[test]
    fn test_staff_screens() {
        assert_eq!(
            Role::Staff.screens(),
            vec![Screen::Dashboard, Screen::Orders, Screen::OrderEntry, Screen::Inventory]
        );
        assert!(!Role::Staff.can_open(Screen::Reports));
        assert!(!Role::Staff.can_open(Screen::Accounts));
        assert!(!Role::Staff.can_open(Screen::BulkEntry));
    }

    #[test]
    fn test_logged_out_session() {
        let session = Session::default();
        assert!(!session.can_open(Screen::Dashboard));
        assert!(Session::new(Role::Staff).can_open(Screen::Dashboard));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());
    }
}
