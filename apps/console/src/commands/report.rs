//! # Report Commands
//!
//! Dashboards and the period report. Every call rescans the ledgers, so
//! the numbers are as fresh as the last committed write.
//!
//! ```text
//!   dashboard ──► Admin? ── AdminDashboard (money figures)
//!                 Staff? ── StaffDashboard (order counts only)
//! ```

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, DbState, SessionState};
use opsdesk_core::report::{AdminDashboard, PeriodReport, StaffDashboard};
use opsdesk_core::{Role, Screen};

/// The dashboard for whoever is logged in.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardView {
    Admin(AdminDashboard),
    Staff(StaffDashboard),
}

pub async fn dashboard(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
) -> Result<DashboardView, ApiError> {
    match session.require(Screen::Dashboard)? {
        Role::Admin => Ok(DashboardView::Admin(admin_dashboard(db, session).await?)),
        Role::Staff => Ok(DashboardView::Staff(
            staff_dashboard(db, session, config).await?,
        )),
    }
}

/// Net profit, inventory value, courier pending and company value.
pub async fn admin_dashboard(
    db: &DbState,
    session: &SessionState,
) -> Result<AdminDashboard, ApiError> {
    session.require_admin(Screen::Dashboard)?;
    debug!("admin_dashboard command");
    Ok(db.inner().reports().admin_dashboard().await?)
}

pub async fn staff_dashboard(
    db: &DbState,
    session: &SessionState,
    config: &ConfigState,
) -> Result<StaffDashboard, ApiError> {
    session.require(Screen::Dashboard)?;
    debug!(recent = config.recent_orders, "staff_dashboard command");

    let db = db.inner();
    let snapshot = db.reports().snapshot().await?;
    Ok(StaffDashboard::compute(
        &snapshot.orders,
        db.today(),
        db.calendar(),
        config.recent_orders,
    ))
}

/// Today, last 7 days, this month and all-time.
pub async fn period_report(db: &DbState, session: &SessionState) -> Result<PeriodReport, ApiError> {
    session.require(Screen::Reports)?;
    let db = db.inner();
    Ok(db.reports().period_report(db.today()).await?)
}
