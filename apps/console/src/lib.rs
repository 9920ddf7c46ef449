//! # opsdesk Console Library
//!
//! Command layer of the opsdesk operations console: configuration,
//! session gating and the commands behind every screen.
//!
//! ## Module Organization
//! ```text
//! opsdesk_console/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── session.rs  ◄─── Logged-in role and screen gating
//! │   └── config.rs   ◄─── TOML / env configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── order.rs    ◄─── Order entry, bulk entry, edits
//! │   ├── report.rs   ◄─── Dashboards and period report
//! │   └── ...
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging ──► tracing-subscriber, RUST_LOG or default     │
//! │  2. Load Config ─────────► config.toml, then OPSDESK_* overrides        │
//! │  3. Connect to Database ─► SQLite WAL, pending migrations               │
//! │  4. Log In ──────────────► role from --role or config                   │
//! │  5. Dispatch ────────────► one command, JSON on stdout                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use opsdesk_core::{OrderStatus, Role};
use opsdesk_db::DbConfig;
use state::{ConfigState, DbState, SessionState};

// =============================================================================
// Command Line
// =============================================================================

/// Operations console for the order, inventory and cash ledgers.
///
/// Commands that create records read their JSON body from stdin.
#[derive(Debug, Parser)]
#[command(name = "opsdesk-console", version)]
pub struct Cli {
    /// Role to log in as; defaults to the configured role
    #[arg(long, short = 'r', global = true, value_name = "admin|staff")]
    pub role: Option<Role>,

    /// SQLite database file
    #[arg(long = "db", short = 'd', global = true, value_name = "PATH")]
    pub database_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Dashboard for the logged-in role
    Dashboard,
    /// Order counts and recent orders
    Staff,
    /// Today, last 7 days, this month and all time
    Report,
    /// Cash in minus cash out
    Wallet,
    /// List products
    Inventory,
    /// List orders, newest first
    Orders,
    /// List expenses
    Expenses,
    /// List cash transactions
    Transactions,
    /// Screens the current role may open
    Screens,
    /// Show the effective configuration
    Config,
    /// Create an order (OrderDraft on stdin)
    NewOrder,
    /// Create a batch of past orders (BulkEntry on stdin)
    Bulk,
    /// Add a product (ProductDraft on stdin)
    NewProduct,
    /// Add an expense (ExpenseDraft on stdin)
    NewExpense,
    /// Record a cash movement (CashEntry on stdin)
    Cash,
    /// Set an order's status
    Status {
        order_id: String,
        /// pending, processing, in_transit, delivered, returned or cancelled
        status: OrderStatus,
    },
    /// Chat links for an order
    Links { order_id: String },
}

impl Command {
    /// Commands that consume JSON input.
    pub fn reads_input(&self) -> bool {
        matches!(
            self,
            Command::NewOrder
                | Command::Bulk
                | Command::NewProduct
                | Command::NewExpense
                | Command::Cash
        )
    }
}

// =============================================================================
// Console
// =============================================================================

/// The three pieces of state every command draws from.
#[derive(Debug, Clone)]
pub struct Console {
    pub db: DbState,
    pub session: SessionState,
    pub config: ConfigState,
}

impl Console {
    /// Opens the configured database and logs in as `role`.
    ///
    /// The database runs on the shop calendar from `config`.
    pub async fn open(config: ConfigState, db_config: DbConfig, role: Role) -> Result<Self, ApiError> {
        let db = DbState::open(db_config.calendar(config.calendar()?)).await?;
        Ok(Console {
            db,
            session: SessionState::logged_in(role),
            config,
        })
    }

    /// Runs one command. `input` is the JSON body for commands that read one.
    pub async fn execute(
        &self,
        command: &Command,
        input: Option<&str>,
    ) -> Result<Value, ApiError> {
        let (db, session, config) = (&self.db, &self.session, &self.config);

        match command {
            Command::Dashboard => to_json(commands::report::dashboard(db, session, config).await?),
            Command::Staff => {
                to_json(commands::report::staff_dashboard(db, session, config).await?)
            }
            Command::Report => to_json(commands::report::period_report(db, session).await?),
            Command::Wallet => to_json(commands::accounts::wallet_balance(db, session).await?),
            Command::Inventory => to_json(commands::inventory::list_products(db, session).await?),
            Command::Orders => to_json(commands::order::list_orders(db, session).await?),
            Command::Expenses => to_json(commands::expense::list_expenses(db, session).await?),
            Command::Transactions => {
                to_json(commands::accounts::list_transactions(db, session).await?)
            }
            Command::Screens => to_json(commands::session::current_session(session)?),
            Command::Config => to_json(commands::config::get_config(config)),
            Command::NewOrder => {
                let draft = from_input(input)?;
                to_json(commands::order::create_order(db, session, config, draft).await?)
            }
            Command::Bulk => {
                let entry = from_input(input)?;
                to_json(commands::order::create_bulk_orders(db, session, config, entry).await?)
            }
            Command::NewProduct => {
                let draft = from_input(input)?;
                to_json(commands::inventory::create_product(db, session, draft).await?)
            }
            Command::NewExpense => {
                let draft = from_input(input)?;
                to_json(commands::expense::add_expense(db, session, draft).await?)
            }
            Command::Cash => {
                let entry = from_input(input)?;
                to_json(commands::accounts::record_transaction(db, session, entry).await?)
            }
            Command::Status { order_id, status } => {
                commands::order::set_order_status(db, session, order_id, *status).await?;
                to_json(commands::order::get_order(db, session, order_id).await?)
            }
            Command::Links { order_id } => {
                to_json(commands::notify::order_links(db, session, config, order_id).await?)
            }
        }
    }
}

fn from_input<T: DeserializeOwned>(input: Option<&str>) -> Result<T, ApiError> {
    let raw = input.ok_or_else(|| ApiError::validation("Expected JSON input"))?;
    serde_json::from_str(raw).map_err(|e| ApiError::validation(format!("Invalid JSON: {}", e)))
}

fn to_json<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

// =============================================================================
// Startup
// =============================================================================

/// Runs one console invocation and returns its JSON output.
pub async fn run(cli: Cli) -> Result<Value, ApiError> {
    let mut config = ConfigState::load()?;
    if let Some(path) = cli.database_path {
        config.database_path = Some(path);
    }
    let role = cli.role.unwrap_or(config.role);

    let db_path = config.resolve_database_path()?;
    info!(?db_path, role = %role, command = ?cli.command, "Starting opsdesk console");

    let input = if cli.command.reads_input() {
        Some(
            std::io::read_to_string(std::io::stdin())
                .map_err(|e| ApiError::internal(format!("Could not read input: {}", e)))?,
        )
    } else {
        None
    };

    let console = Console::open(config, DbConfig::new(db_path), role).await?;
    let output = console.execute(&cli.command, input.as_deref()).await;
    console.db.inner().close().await;
    output
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr; stdout carries only the command's JSON.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=opsdesk_db=trace` - Trace the store only
/// - Default: `info,opsdesk=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,opsdesk=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("opsdesk-console").chain(args.iter().copied()))
    }

    async fn console(role: Role) -> Console {
        Console::open(ConfigState::default(), DbConfig::in_memory(), role)
            .await
            .unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_status_with_global_options() {
        let cli = parse(&["--role", "admin", "status", "o-1", "shipped", "--db", "/tmp/shop.db"])
            .unwrap();
        assert_eq!(
            cli.command,
            Command::Status {
                order_id: "o-1".to_string(),
                status: OrderStatus::InTransit,
            }
        );
        assert_eq!(cli.role, Some(Role::Admin));
        assert_eq!(cli.database_path, Some(PathBuf::from("/tmp/shop.db")));

        let cli = parse(&["new-order"]).unwrap();
        assert!(cli.command.reads_input());
        assert_eq!(cli.role, None);
    }

    #[test]
    fn test_parse_rejects_bad_invocations() {
        assert_eq!(
            parse(&["launch"]).unwrap_err().kind(),
            ErrorKind::InvalidSubcommand
        );
        assert!(parse(&[]).is_err());
        assert_eq!(
            parse(&["--role", "owner", "orders"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
        assert_eq!(
            parse(&["links"]).unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
    }

    #[tokio::test]
    async fn test_json_round() {
        let console = console(Role::Admin).await;

        let product = console
            .execute(
                &Command::NewProduct,
                Some(r#"{"name": "Push Chopper", "buy_price_cents": 18000, "sell_price_cents": 25000, "stock": 3}"#),
            )
            .await
            .unwrap();
        let product_id = product["id"].as_str().unwrap().to_string();

        let order = console
            .execute(
                &Command::NewOrder,
                Some(&format!(
                    r#"{{"customer_name": "Karim", "phone": "01811111111", "product_id": "{product_id}"}}"#
                )),
            )
            .await
            .unwrap();
        assert_eq!(order["total_amount_cents"], 31000);
        assert_eq!(order["status"], "pending");

        let order_id = order["id"].as_str().unwrap().to_string();
        let updated = console
            .execute(
                &Command::Status {
                    order_id: order_id.clone(),
                    status: OrderStatus::InTransit,
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(updated["status"], "in_transit");

        let inventory = console.execute(&Command::Inventory, None).await.unwrap();
        assert_eq!(inventory[0]["stock"], 2);

        let dashboard = console.execute(&Command::Dashboard, None).await.unwrap();
        assert_eq!(dashboard["view"], "admin");
    }

    #[tokio::test]
    async fn test_missing_input_and_forbidden() {
        let console = console(Role::Staff).await;

        let err = console.execute(&Command::NewOrder, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = console.execute(&Command::Wallet, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
