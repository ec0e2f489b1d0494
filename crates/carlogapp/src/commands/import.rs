//! Import of a whole-dataset document.
//!
//! Import runs in two phases. [`parse`] decodes and validates the complete text
//! without touching the store; only a document that parsed cleanly reaches [`apply`].
//! A malformed file therefore never leaves a half-imported store behind. A collection
//! that repeats an identifier counts as malformed.
//!
//! Each collection present in the document fully replaces the stored one. Absent (or
//! `null`) collections are left alone, and unknown top-level keys such as
//! `exportDate` are ignored.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::info;

use crate::commands::Repositories;
use crate::error::{CarlogError, Result};
use crate::model::{Collection, FuelRecord, MaintenanceRecord, PartRecord, Reminder, Vehicle};
use crate::repository::{Entity, Repository};
use crate::store::KeyValueStore;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportDocument {
    #[serde(default)]
    pub vehicles: Option<Vec<Vehicle>>,
    #[serde(default)]
    pub fuel: Option<Vec<FuelRecord>>,
    #[serde(default)]
    pub maintenance: Option<Vec<MaintenanceRecord>>,
    #[serde(default)]
    pub parts: Option<Vec<PartRecord>>,
    #[serde(default)]
    pub reminders: Option<Vec<Reminder>>,
}

/// Collections written by an import, with their new sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: Vec<(Collection, usize)>,
}

impl ImportSummary {
    pub fn is_empty(&self) -> bool {
        self.imported.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.imported.iter().map(|(_, n)| n).sum()
    }
}

pub fn parse(text: &str) -> Result<ImportDocument> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| CarlogError::Import(e.to_string()))?;
    if !value.is_object() {
        return Err(CarlogError::Import(
            "document must be a JSON object".to_string(),
        ));
    }
    let document: ImportDocument =
        serde_json::from_value(value).map_err(|e| CarlogError::Import(e.to_string()))?;

    unique_ids(document.vehicles.as_deref())?;
    unique_ids(document.fuel.as_deref())?;
    unique_ids(document.maintenance.as_deref())?;
    unique_ids(document.parts.as_deref())?;
    unique_ids(document.reminders.as_deref())?;
    Ok(document)
}

fn unique_ids<E: Entity>(records: Option<&[E]>) -> Result<()> {
    let mut seen = HashSet::new();
    for record in records.unwrap_or_default() {
        if !seen.insert(record.id()) {
            return Err(CarlogError::Import(format!(
                "duplicate id in {}: {}",
                E::COLLECTION.key(),
                record.id()
            )));
        }
    }
    Ok(())
}

pub fn apply<B: KeyValueStore + ?Sized>(
    backend: &B,
    repos: &mut Repositories,
    document: ImportDocument,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    replace(backend, &mut repos.vehicles, document.vehicles, &mut summary)?;
    replace(backend, &mut repos.fuel, document.fuel, &mut summary)?;
    replace(backend, &mut repos.maintenance, document.maintenance, &mut summary)?;
    replace(backend, &mut repos.parts, document.parts, &mut summary)?;
    replace(backend, &mut repos.reminders, document.reminders, &mut summary)?;

    info!(records = summary.record_count(), "import applied");
    Ok(summary)
}

fn replace<B: KeyValueStore + ?Sized, E: Entity>(
    backend: &B,
    repo: &mut Repository<E>,
    records: Option<Vec<E>>,
    summary: &mut ImportSummary,
) -> Result<()> {
    if let Some(records) = records {
        let count = records.len();
        repo.replace_all(backend, records)?;
        summary.imported.push((E::COLLECTION, count));
    }
    Ok(())
}
