//! # Command Layer
//!
//! This module contains the **business logic** of carlog that spans more than one
//! collection. Each command lives in its own submodule and implements plain functions
//! over a [`KeyValueStore`](crate::store::KeyValueStore) and the loaded
//! [`Repositories`].
//!
//! ## What Commands Do NOT Do
//!
//! Commands explicitly avoid:
//! - **Any terminal I/O**: no stdout, stderr or prompts
//! - **Confirmation**: destructive commands assume the caller already asked
//! - **Notices**: they return data; the [`api`](crate::api) facade turns outcomes into
//!   [`CmdMessage`]s for the host
//!
//! ## Command Modules
//!
//! - [`vehicles`]: first-vehicle selection, cascade delete
//! - [`reminders`]: upcoming window, completion
//! - [`dashboard`]: summary for the active vehicle
//! - [`report`]: spending over a date range
//! - [`export`] / [`import`]: whole-dataset JSON documents
//! - [`backup`]: rolling snapshot and restore
//! - [`theme`]: light/dark preference

use serde::{Deserialize, Serialize};

use crate::model::{FuelRecord, MaintenanceRecord, PartRecord, RecordId, Reminder, Vehicle};
use crate::repository::{Entity, Repository};
use crate::store::KeyValueStore;

pub mod backup;
pub mod dashboard;
pub mod export;
pub mod import;
pub mod reminders;
pub mod report;
pub mod theme;
pub mod vehicles;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// The five loaded collections.
#[derive(Default)]
pub struct Repositories {
    pub vehicles: Repository<Vehicle>,
    pub fuel: Repository<FuelRecord>,
    pub maintenance: Repository<MaintenanceRecord>,
    pub parts: Repository<PartRecord>,
    pub reminders: Repository<Reminder>,
}

impl Repositories {
    pub fn load<B: KeyValueStore + ?Sized>(backend: &B) -> Self {
        Self {
            vehicles: Repository::load(backend),
            fuel: Repository::load(backend),
            maintenance: Repository::load(backend),
            parts: Repository::load(backend),
            reminders: Repository::load(backend),
        }
    }

    pub fn reload<B: KeyValueStore + ?Sized>(&mut self, backend: &B) {
        *self = Self::load(backend);
    }

    /// Whether every collection loaded without unreadable records.
    pub fn is_intact(&self) -> bool {
        self.vehicles.is_intact()
            && self.fuel.is_intact()
            && self.maintenance.is_intact()
            && self.parts.is_intact()
            && self.reminders.is_intact()
    }

    /// Records owned by `vehicle_id`, in display order.
    pub fn owned_by(&self, vehicle_id: &RecordId) -> Owned<'_> {
        Owned {
            fuel: self.fuel.all(Some(vehicle_id)),
            maintenance: self.maintenance.all(Some(vehicle_id)),
            parts: self.parts.all(Some(vehicle_id)),
            reminders: self.reminders.all(Some(vehicle_id)),
        }
    }
}

/// Borrowed view of one vehicle's records.
pub struct Owned<'a> {
    pub fuel: Vec<&'a FuelRecord>,
    pub maintenance: Vec<&'a MaintenanceRecord>,
    pub parts: Vec<&'a PartRecord>,
    pub reminders: Vec<&'a Reminder>,
}

/// Type-directed access to one of the [`Repositories`].
pub trait HasRepository<E: Entity> {
    fn repository(&self) -> &Repository<E>;
    fn repository_mut(&mut self) -> &mut Repository<E>;
}

macro_rules! has_repository {
    ($entity:ty, $field:ident) => {
        impl HasRepository<$entity> for Repositories {
            fn repository(&self) -> &Repository<$entity> {
                &self.$field
            }

            fn repository_mut(&mut self) -> &mut Repository<$entity> {
                &mut self.$field
            }
        }
    };
}

has_repository!(Vehicle, vehicles);
has_repository!(FuelRecord, fuel);
has_repository!(MaintenanceRecord, maintenance);
has_repository!(PartRecord, parts);
has_repository!(Reminder, reminders);

/// The five collections as one serializable value.
///
/// Used as the body of export documents and of the rolling backup. Missing
/// collections deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub fuel: Vec<FuelRecord>,
    #[serde(default)]
    pub maintenance: Vec<MaintenanceRecord>,
    #[serde(default)]
    pub parts: Vec<PartRecord>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

impl Dataset {
    /// Snapshot the collections as currently held in memory.
    pub fn capture(repos: &Repositories) -> Self {
        Self {
            vehicles: repos.vehicles.records().to_vec(),
            fuel: repos.fuel.records().to_vec(),
            maintenance: repos.maintenance.records().to_vec(),
            parts: repos.parts.records().to_vec(),
            reminders: repos.reminders.records().to_vec(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.vehicles.len()
            + self.fuel.len()
            + self.maintenance.len()
            + self.parts.len()
            + self.reminders.len()
    }
}
