//! # CLI Behavior
//!
//! This is **one possible UI client** for carlog, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Naked Execution (`carlog`)
//!
//! Running `carlog` with no arguments shows the dashboard of the active vehicle.
//!
//! ## The Active Vehicle
//!
//! Fuel, maintenance, part and reminder commands always act on the active vehicle.
//! The first vehicle added becomes active; `carlog vehicle use <ID>` switches.
//!
//! ## Record IDs
//!
//! Listings print the first eight characters of each id. Any unique prefix is
//! accepted wherever a command takes an id.
//!
//! ## Confirmation
//!
//! Deletes and restores ask on the terminal. `--yes` answers for you; without a
//! terminal and without `--yes` the answer is no.
//!
//! ## Automatic Backup
//!
//! Every invocation refreshes the rolling backup once it is older than
//! `backup_interval_days`.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers
//! - `ports`: Terminal implementations of the library's Confirm/Notify traits
//! - `render`: Tables, summaries and notices
//! - `setup`: Argument parsing via clap
//! - `styles`: Light and dark palettes

mod commands;
mod ports;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
