//! # Storage Layer
//!
//! Everything carlog persists goes through the [`KeyValueStore`] trait: a synchronous,
//! string-keyed store of textual (JSON) documents. Repositories, the active-vehicle
//! selection, backups and the theme preference all sit on top of it.
//!
//! ## Typed Access
//!
//! Backends deal only in raw strings. The free functions in this module add the
//! structured layer:
//!
//! - [`set`] serializes a value and writes it. Write failures come back as
//!   [`CarlogError::Persistence`] so callers can tell them apart from logic errors.
//! - [`get`] reads and parses a value, **failing soft**: a missing key, a read error or
//!   a document that does not parse all yield the caller's default. The condition is
//!   logged, never returned.
//!
//! Collections do not go through [`get`]: a [`Repository`](crate::repository::Repository)
//! reads its document record by record so one bad record cannot blank the rest.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one `<key>.json` file per key, atomic writes.
//! - [`mem_backend::MemBackend`]: in-memory map for tests, with write-error simulation.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── vehicles.json
//! ├── fuel.json
//! ├── maintenance.json
//! ├── parts.json
//! ├── reminders.json
//! ├── activeVehicle.json
//! ├── backup.json
//! ├── lastBackup.json
//! └── theme.json
//! ```

use crate::error::{CarlogError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

pub mod fs_backend;
pub mod mem_backend;

/// Keys of every persisted document.
pub mod keys {
    pub const VEHICLES: &str = "vehicles";
    pub const FUEL: &str = "fuel";
    pub const MAINTENANCE: &str = "maintenance";
    pub const PARTS: &str = "parts";
    pub const REMINDERS: &str = "reminders";
    pub const ACTIVE_VEHICLE: &str = "activeVehicle";
    pub const BACKUP: &str = "backup";
    pub const LAST_BACKUP: &str = "lastBackup";
    pub const THEME: &str = "theme";

    pub const ALL: [&str; 9] = [
        VEHICLES,
        FUEL,
        MAINTENANCE,
        PARTS,
        REMINDERS,
        ACTIVE_VEHICLE,
        BACKUP,
        LAST_BACKUP,
        THEME,
    ];
}

/// Abstract interface for raw key-value I/O.
///
/// This trait handles the "how" of storage (filesystem vs memory), while repositories
/// handle the "what". All methods take `&self`; backends manage their own interior
/// mutability since carlog is single-threaded.
pub trait KeyValueStore {
    /// Read the raw document stored under `key`.
    /// Returns Ok(None) if the key is absent.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Store `text` under `key`, replacing any previous document.
    /// MUST be atomic: readers never observe a partial write.
    fn write(&self, key: &str, text: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key owned by this store.
    fn clear(&self) -> Result<()>;
}

/// Serialize `value` and store it under `key`.
pub fn set<B, T>(backend: &B, key: &str, value: &T) -> Result<()>
where
    B: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(value).map_err(|e| CarlogError::persistence(key, e))?;
    backend.write(key, &text).map_err(|e| {
        error!(key, error = %e, "failed to write to store");
        match e {
            CarlogError::Persistence { .. } => e,
            other => CarlogError::persistence(key, other),
        }
    })?;
    debug!(key, bytes = text.len(), "stored document");
    Ok(())
}

/// Read and parse the document under `key`, falling back to `default`.
pub fn get<B, T>(backend: &B, key: &str, default: T) -> T
where
    B: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match backend.read(key) {
        Ok(Some(text)) => match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "stored document does not parse, using default");
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            warn!(key, error = %e, "failed to read from store, using default");
            default
        }
    }
}

/// Remove the document under `key`.
pub fn remove<B: KeyValueStore + ?Sized>(backend: &B, key: &str) -> Result<()> {
    backend
        .remove(key)
        .map_err(|e| CarlogError::persistence(key, e))
}

/// Remove every document.
pub fn clear<B: KeyValueStore + ?Sized>(backend: &B) -> Result<()> {
    backend
        .clear()
        .map_err(|e| CarlogError::persistence("*", e))
}
