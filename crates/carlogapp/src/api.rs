//! # API Facade
//!
//! The API layer is a **thin facade** over the repositories and the command layer. It is
//! the single entry point for all carlog operations, whatever host drives it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns state**: the backend, the five [`Repositories`] and the [`ActiveSelection`]
//! - **Resolves context**: record writes go to the active vehicle
//! - **Talks to the host**: asks [`Confirm`] before destructive operations, reports
//!   outcomes through [`Notify`]
//! - **Keeps time**: every mutation takes a single reading from its [`Clock`] and
//!   hands it down to the repository
//! - **Returns structured types**: records, summaries and [`Dashboard`]s, never strings
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: cascades, windows and reports belong in `commands/*.rs`
//! - **Terminal I/O**: the ports do that, and only if the host wants them to
//!
//! ## Generic Over Entities
//!
//! Record CRUD is one set of generic methods. The entity type picks the collection:
//!
//! ```ignore
//! let fill: FuelRecord = api.add(fuel_draft)?;
//! api.update::<Vehicle>(&id, patch)?;
//! api.delete::<Reminder>(&id)?;
//! ```
//!
//! Vehicles get two extra behaviors on the same methods: the first vehicle added
//! becomes active, and deleting a vehicle deletes everything it owns.
//!
//! ## Generic Over KeyValueStore
//!
//! `CarlogApi<B: KeyValueStore>` is generic over the storage backend:
//! - Production: `CarlogApi<FsBackend>`
//! - Testing: `CarlogApi<MemBackend>`

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use crate::commands::dashboard::{self, Dashboard};
use crate::commands::export::{self, ExportDocument};
use crate::commands::import::{self, ImportSummary};
use crate::commands::report::{self, Report};
use crate::commands::theme::{self, Theme};
use crate::commands::{backup, reminders, vehicles, CmdMessage, HasRepository, Repositories};
use crate::config::CarlogConfig;
use crate::error::{CarlogError, Result};
use crate::model::{Collection, RecordId, Reminder, Vehicle};
use crate::ports::{Clock, Confirm, Notify, SystemClock};
use crate::repository::{Entity, Repository};
use crate::selection::ActiveSelection;
use crate::store::KeyValueStore;

/// Outcome of a confirmed delete.
#[derive(Debug, Clone, PartialEq)]
pub enum Deleted<E> {
    Removed(E),
    /// The host declined; nothing changed.
    Declined,
}

impl<E> Deleted<E> {
    pub fn is_removed(&self) -> bool {
        matches!(self, Deleted::Removed(_))
    }
}

/// The main API facade for carlog operations.
pub struct CarlogApi<B: KeyValueStore> {
    backend: B,
    config: CarlogConfig,
    repos: Repositories,
    selection: ActiveSelection,
    confirm: Box<dyn Confirm>,
    notify: Box<dyn Notify>,
    clock: Box<dyn Clock>,
}

impl<B: KeyValueStore> CarlogApi<B> {
    pub fn new(
        backend: B,
        config: CarlogConfig,
        confirm: Box<dyn Confirm>,
        notify: Box<dyn Notify>,
    ) -> Self {
        let repos = Repositories::load(&backend);
        let selection = ActiveSelection::load(&backend);
        Self {
            backend,
            config,
            repos,
            selection,
            confirm,
            notify,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the system clock.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &CarlogConfig {
        &self.config
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// One whole collection, unfiltered.
    pub fn all<E: Entity>(&self) -> &Repository<E>
    where
        Repositories: HasRepository<E>,
    {
        HasRepository::<E>::repository(&self.repos)
    }

    // --- Active vehicle ---

    pub fn active_vehicle(&self) -> Option<&Vehicle> {
        self.selection.resolve(&self.repos.vehicles)
    }

    fn active_vehicle_id(&self) -> Option<RecordId> {
        self.active_vehicle().map(|v| v.id.clone())
    }

    /// Select `id` as the active vehicle.
    pub fn set_active(&mut self, id: &RecordId) -> Result<Vehicle> {
        let vehicle = self
            .repos
            .vehicles
            .get(id)
            .cloned()
            .ok_or_else(|| CarlogError::not_found(Collection::Vehicles, id))?;
        let result = self.selection.set_active(&self.backend, id);
        self.settle(result)?;
        self.notify.notice(&CmdMessage::success(format!(
            "Active vehicle: {}",
            vehicle.display_name()
        )));
        self.notify.changed(Collection::Vehicles);
        Ok(vehicle)
    }

    // --- Records ---

    /// Records visible in the current context: every vehicle, or the active
    /// vehicle's records for the other collections (none when nothing is active).
    pub fn list<E: Entity>(&self) -> Vec<&E>
    where
        Repositories: HasRepository<E>,
    {
        let repo = HasRepository::<E>::repository(&self.repos);
        if !E::REQUIRES_ACTIVE_VEHICLE {
            return repo.all(None);
        }
        match self.active_vehicle() {
            Some(vehicle) => repo.all(Some(&vehicle.id)),
            None => Vec::new(),
        }
    }

    pub fn get<E: Entity>(&self, id: &RecordId) -> Result<&E>
    where
        Repositories: HasRepository<E>,
    {
        HasRepository::<E>::repository(&self.repos)
            .get(id)
            .ok_or_else(|| CarlogError::not_found(E::COLLECTION, id))
    }

    /// Add a record. Non-vehicle records are owned by the active vehicle.
    pub fn add<E: Entity>(&mut self, draft: E::Draft) -> Result<E>
    where
        Repositories: HasRepository<E>,
    {
        let owner = self.active_vehicle_id();
        if E::REQUIRES_ACTIVE_VEHICLE && owner.is_none() {
            warn!(collection = %E::COLLECTION, "add rejected without active vehicle");
            self.notify
                .notice(&CmdMessage::warning("Select a vehicle first"));
            return Err(CarlogError::NoActiveVehicle);
        }
        let owner = owner.filter(|_| E::REQUIRES_ACTIVE_VEHICLE);

        let now = self.clock.now();
        let repo = HasRepository::<E>::repository_mut(&mut self.repos);
        let result = repo.add(&self.backend, owner.as_ref(), draft, now);
        let record = self.settle(result)?;

        if E::COLLECTION == Collection::Vehicles {
            let result = vehicles::activate_if_unselected(
                &self.backend,
                &self.repos.vehicles,
                &mut self.selection,
                record.id(),
            );
            self.settle(result)?;
        }

        self.notify
            .notice(&CmdMessage::success(format!("{} added", E::COLLECTION)));
        self.notify.changed(E::COLLECTION);
        Ok(record)
    }

    pub fn update<E: Entity>(&mut self, id: &RecordId, patch: E::Patch) -> Result<E>
    where
        Repositories: HasRepository<E>,
    {
        let now = self.clock.now();
        let repo = HasRepository::<E>::repository_mut(&mut self.repos);
        let result = repo.update(&self.backend, id, patch, now);
        let record = self.settle(result)?;

        self.notify
            .notice(&CmdMessage::success(format!("{} updated", E::COLLECTION)));
        self.notify.changed(E::COLLECTION);
        Ok(record)
    }

    /// Delete after confirmation. Deleting a vehicle deletes its records too.
    pub fn delete<E: Entity>(&mut self, id: &RecordId) -> Result<Deleted<E>>
    where
        Repositories: HasRepository<E>,
    {
        let is_vehicle = E::COLLECTION == Collection::Vehicles;
        let prompt = match self.repos.vehicles.get(id).filter(|_| is_vehicle) {
            Some(vehicle) => format!(
                "Delete {} and all of its records?",
                vehicle.display_name()
            ),
            None => {
                self.get::<E>(id)?;
                format!(
                    "Delete {} {}?",
                    E::COLLECTION.to_string().to_lowercase(),
                    id.short()
                )
            }
        };

        if !self.confirm.confirm(&prompt) {
            self.notify.notice(&CmdMessage::info("Nothing deleted"));
            return Ok(Deleted::Declined);
        }

        if is_vehicle {
            let result = vehicles::remove_dependents(
                &self.backend,
                &mut self.repos,
                &mut self.selection,
                id,
            );
            let cascade = self.settle(result)?;
            for (collection, count) in [
                (Collection::Fuel, cascade.fuel),
                (Collection::Maintenance, cascade.maintenance),
                (Collection::Parts, cascade.parts),
                (Collection::Reminders, cascade.reminders),
            ] {
                if count > 0 {
                    self.notify.changed(collection);
                }
            }
        }

        let repo = HasRepository::<E>::repository_mut(&mut self.repos);
        let result = repo.remove(&self.backend, id);
        let removed = self.settle(result)?;

        self.notify
            .notice(&CmdMessage::success(format!("{} deleted", E::COLLECTION)));
        self.notify.changed(E::COLLECTION);
        Ok(Deleted::Removed(removed))
    }

    // --- Reminders ---

    pub fn complete_reminder(&mut self, id: &RecordId) -> Result<Reminder> {
        let now = self.clock.now();
        let result = reminders::complete(&self.backend, &mut self.repos.reminders, id, now);
        let reminder = self.settle(result)?;
        self.notify
            .notice(&CmdMessage::success(format!("Done: {}", reminder.title)));
        self.notify.changed(Collection::Reminders);
        Ok(reminder)
    }

    /// Open reminders due within the configured window, for the active vehicle or,
    /// with nothing active, for every vehicle.
    pub fn upcoming_reminders(&self, today: NaiveDate) -> Vec<&Reminder> {
        let vehicle = self.active_vehicle().map(|v| &v.id);
        reminders::upcoming(
            &self.repos.reminders,
            vehicle,
            today,
            self.config.upcoming_days,
        )
    }

    // --- Summaries ---

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        dashboard::run(
            &self.repos,
            self.active_vehicle(),
            today,
            self.config.dashboard_options(),
        )
    }

    /// Spending of the active vehicle between `from` and `to` inclusive.
    pub fn report(&self, from: NaiveDate, to: NaiveDate) -> Result<Report> {
        let vehicle = self.active_vehicle().ok_or(CarlogError::NoActiveVehicle)?;
        Ok(report::run(&self.repos, vehicle, from, to))
    }

    // --- Import / Export ---

    pub fn export(&self, now: DateTime<Utc>) -> ExportDocument {
        export::run(&self.repos, now)
    }

    /// Validate `text` completely, then replace the collections it carries.
    pub fn import(&mut self, text: &str) -> Result<ImportSummary> {
        let document = match import::parse(text) {
            Ok(document) => document,
            Err(e) => {
                self.notify.notice(&CmdMessage::error(e.to_string()));
                return Err(e);
            }
        };

        let result = import::apply(&self.backend, &mut self.repos, document);
        let summary = self.settle(result);
        self.reload();
        let summary = summary?;

        for (collection, _) in &summary.imported {
            self.notify.changed(*collection);
        }
        self.notify.notice(&CmdMessage::success(format!(
            "Imported {} records",
            summary.record_count()
        )));
        Ok(summary)
    }

    /// Re-read every collection and the selection from the backend.
    pub fn reload(&mut self) {
        self.repos.reload(&self.backend);
        self.selection = ActiveSelection::load(&self.backend);
    }

    // --- Backup ---

    pub fn last_backup(&self) -> Option<DateTime<Utc>> {
        backup::last_backup(&self.backend)
    }

    /// Refresh the rolling backup if it is due. Returns whether one was taken.
    pub fn auto_backup(&self, now: DateTime<Utc>) -> Result<bool> {
        let result = backup::auto_backup(
            &self.backend,
            &self.repos,
            now,
            self.config.backup_interval_days,
        );
        self.settle(result)
    }

    pub fn backup_now(&self, now: DateTime<Utc>) -> Result<usize> {
        let result = backup::snapshot(&self.backend, &self.repos, now);
        let data = self.settle(result)?;
        self.notify.notice(&CmdMessage::success(format!(
            "Backed up {} records",
            data.record_count()
        )));
        Ok(data.record_count())
    }

    /// Replace current data with the rolling backup, after confirmation.
    /// Returns `false` when the host declined.
    pub fn restore_backup(&mut self) -> Result<bool> {
        let data = match backup::load(&self.backend) {
            Ok(data) => data,
            Err(e) => {
                self.notify.notice(&CmdMessage::error(e.to_string()));
                return Err(e);
            }
        };

        if !self
            .confirm
            .confirm("Restore the backup? Current data will be replaced.")
        {
            self.notify.notice(&CmdMessage::info("Restore cancelled"));
            return Ok(false);
        }

        let result = backup::restore(&self.backend, &mut self.repos, data);
        self.settle(result)?;
        self.reload();

        for collection in Collection::ALL {
            self.notify.changed(collection);
        }
        self.notify
            .notice(&CmdMessage::success("Backup restored"));
        Ok(true)
    }

    // --- Theme ---

    /// The stored theme, or `fallback` if none was saved.
    pub fn theme(&self, fallback: Theme) -> Theme {
        theme::get(&self.backend, fallback)
    }

    pub fn set_theme(&self, value: Theme) -> Result<()> {
        let result = theme::set(&self.backend, value);
        self.settle(result)
    }

    pub fn toggle_theme(&self, fallback: Theme) -> Result<Theme> {
        let result = theme::toggle(&self.backend, fallback);
        self.settle(result)
    }

    /// Surface persistence failures to the host before handing them back.
    fn settle<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err @ CarlogError::Persistence { .. }) = &result {
            self.notify.notice(&CmdMessage::error(err.to_string()));
        }
        result
    }
}
