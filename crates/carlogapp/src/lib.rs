//! # Carlog Architecture
//!
//! Carlog is a **UI-agnostic vehicle expense library**. It tracks vehicles and the fuel
//! fill-ups, maintenance visits, parts purchases and reminders that belong to them, and
//! derives spending summaries from those records. The `carlog` binary is one client of it.
//!
//! ## The Four Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Host (the carlog CLI, or anything else)                    │
//! │  - Parses input, renders output, answers Confirm/Notify     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade, owns the loaded state                       │
//! │  - Resolves the active vehicle for record writes            │
//! │  - Confirms destructive operations, emits notices           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, metrics.rs)                  │
//! │  - Cascades, reminder windows, reports, dashboard           │
//! │  - Import/export, rolling backup, theme                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (repository.rs, selection.rs, store/)        │
//! │  - Generic write-through Repository per entity              │
//! │  - KeyValueStore trait: FsBackend, MemBackend               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write-Through Persistence
//!
//! Every mutation updates the in-memory collection and then writes the whole collection
//! back as one JSON document. Reads never fail: a missing or corrupt document loads as
//! an empty collection and the problem is logged with `tracing`.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code:
//! - Takes regular Rust arguments, including "today" and "now" for anything date based
//! - Returns regular Rust types (`Result<T, CarlogError>`)
//! - **Never** writes to stdout/stderr or prompts
//!
//! ## Testing Strategy
//!
//! 1. **Commands and metrics**: unit tests over [`store::mem_backend::MemBackend`].
//! 2. **API**: tests with recording ports, checking notices, change events and the
//!    persisted documents.
//! 3. **Storage**: `tests/` exercises [`store::fs_backend::FsBackend`] on a temp dir.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic spanning collections
//! - [`metrics`]: Totals, consumption, cost per distance, monthly breakdown
//! - [`repository`]: Generic persisted collection
//! - [`selection`]: The active vehicle
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Records, drafts and patches
//! - [`ports`]: Host confirmation and notification traits
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod ports;
pub mod repository;
pub mod selection;
pub mod store;
