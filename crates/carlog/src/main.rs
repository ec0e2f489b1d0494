//! # Carlog CLI Architecture
//!
//! Carlog ships a terminal client, but the binary is intentionally thin: the CLI lives
//! in `src/cli/`, while this file only invokes `cli::run()` and handles process
//! termination. Everything that decides what a record is, what a vehicle costs or what
//! a backup contains lives in the `carlogapp` library.
//!
//! ## Workspace Structure
//!
//! - `crates/carlogapp/`: Core library with UI-agnostic business logic
//! - `crates/carlog/`: This CLI tool, depends on `carlogapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/carlog/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal Confirm/Notify ports (ports.rs)                 │
//! │  - Tables and summaries (render.rs, styles.rs)              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/carlogapp/src/api.rs)                    │
//! │  - Owns repositories and the active vehicle                 │
//! │  - Returns records, dashboards and reports                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/carlogapp/src/commands/*)            │
//! │  - Pure business logic + data access                        │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Logging
//!
//! The library logs through `tracing`. The CLI installs a `tracing_subscriber` fmt
//! subscriber writing to stderr: warnings by default, everything down to debug with
//! `--verbose`.
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests per command module, API tests with recording ports.
//! - **CLI**: end-to-end tests in `tests/` run the binary with `assert_cmd` against a
//!   temporary data directory set through `CARLOG_DATA_DIR`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
