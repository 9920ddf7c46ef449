//! # opsdesk Console Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        opsdesk Console                                  │
//! │                                                                         │
//! │  $ opsdesk-console --role admin dashboard                              │
//! │  $ echo '{"customer_name": ...}' | opsdesk-console new-order           │
//! │                                                                         │
//! │  main.rs ────► logging, exit code                                       │
//! │  lib.rs ─────► config, database, session, dispatch                      │
//! │  commands/ ──► create_order, record_transaction, admin_dashboard, ...   │
//! │                                                                         │
//! │  stdout: command result as JSON                                         │
//! │  stderr: logs, or {"code": ..., "message": ...} on failure              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::process::ExitCode;

use opsdesk_console::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    opsdesk_console::init_tracing();

    match opsdesk_console::run(cli).await {
        Ok(output) => {
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!(
                "{}",
                serde_json::to_string(&err).unwrap_or_else(|_| err.to_string())
            );
            ExitCode::FAILURE
        }
    }
}
