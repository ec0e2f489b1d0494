//! # Generic Repository
//!
//! One [`Repository<E>`] implementation serves all five collections. What differs between
//! vehicles, fuel records, maintenance records, parts and reminders is captured by the
//! [`Entity`] trait: the store key, the display ordering, whether writes need an owning
//! vehicle, and how drafts and patches turn into records.
//!
//! ## Write-Through
//!
//! The repository loads its collection once and keeps an in-memory `Vec<E>`. Every
//! mutation changes the vector and immediately re-serializes the **whole** collection
//! under its key. If that write fails the in-memory state is ahead of the store until the
//! next successful write; the failure is returned as
//! [`CarlogError::Persistence`](crate::error::CarlogError::Persistence).
//!
//! ## Damaged Documents
//!
//! Records are decoded one at a time. A record that does not decode is logged and set
//! aside: it is invisible to callers but written back, untouched, with every later
//! write. A document that is not a JSON array at all (or cannot be read) leaves the
//! repository *degraded*: it loads empty and refuses every write until
//! [`Repository::replace_all`] supplies a whole new collection. Either way nothing
//! already on disk is overwritten by a partial view of it.
//!
//! ## Ordering
//!
//! Collections keep a display ordering after every `add` and `update`:
//!
//! | Entity | Order |
//! |--------|-------|
//! | Vehicle | insertion |
//! | Fuel, Maintenance, Part | date, newest first |
//! | Reminder | date, soonest first |
//!
//! Sorting is stable, so records sharing a date keep their relative order.
//!
//! ## What the Repository Does NOT Do
//!
//! It never asks for confirmation and never talks to the user. Resolving the active
//! vehicle, confirming deletes and emitting notices belong to the
//! [`api`](crate::api) facade.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CarlogError, Result};
use crate::model::{Collection, RecordId};
use crate::store::{self, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Insertion,
    DateAscending,
    DateDescending,
}

/// A record type managed by a [`Repository`].
pub trait Entity: Clone + Serialize + DeserializeOwned {
    const COLLECTION: Collection;
    const ORDER: SortOrder;
    /// Whether `add` needs an owning (active) vehicle.
    const REQUIRES_ACTIVE_VEHICLE: bool = true;

    /// Caller-supplied fields for a new record.
    type Draft;
    /// Partial fields merged over an existing record.
    type Patch;

    /// Build a new record. `owner` is always `Some` when `REQUIRES_ACTIVE_VEHICLE`.
    fn create(id: RecordId, owner: Option<RecordId>, draft: Self::Draft, now: DateTime<Utc>)
        -> Self;

    /// Merge `patch` over the record. `now` stamps any transition the patch causes.
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);

    /// Stamp the update timestamp.
    fn touch(&mut self, now: DateTime<Utc>);

    fn id(&self) -> &RecordId;

    /// Owning vehicle, `None` for vehicles themselves.
    fn vehicle_id(&self) -> Option<&RecordId>;

    /// Sort key for date-ordered collections.
    fn date(&self) -> Option<NaiveDate> {
        None
    }
}

pub struct Repository<E: Entity> {
    records: Vec<E>,
    /// Stored records that did not decode, kept verbatim.
    unreadable: Vec<Value>,
    degraded: bool,
}

impl<E: Entity> Default for Repository<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            unreadable: Vec::new(),
            degraded: false,
        }
    }
}

impl<E: Entity> Repository<E> {
    /// Load the collection from the store. A missing collection loads empty.
    pub fn load<B: KeyValueStore + ?Sized>(backend: &B) -> Self {
        let key = E::COLLECTION.key();
        let text = match backend.read(key) {
            Ok(Some(text)) => text,
            Ok(None) => return Self::default(),
            Err(e) => {
                warn!(key, error = %e, "failed to read collection, refusing writes");
                return Self::degraded();
            }
        };
        let values: Vec<Value> = match serde_json::from_str(&text) {
            Ok(values) => values,
            Err(e) => {
                warn!(key, error = %e, "stored collection does not parse, refusing writes");
                return Self::degraded();
            }
        };

        let mut repo = Self::default();
        for value in values {
            match <E as serde::Deserialize>::deserialize(&value) {
                Ok(record) => repo.records.push(record),
                Err(e) => {
                    warn!(key, error = %e, "skipping record that does not decode");
                    repo.unreadable.push(value);
                }
            }
        }
        debug!(
            collection = key,
            count = repo.records.len(),
            unreadable = repo.unreadable.len(),
            "loaded collection"
        );
        repo
    }

    fn degraded() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }

    /// Replace in-memory state with what the store currently holds.
    pub fn reload<B: KeyValueStore + ?Sized>(&mut self, backend: &B) {
        *self = Self::load(backend);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stored records that did not decode and are carried along unchanged.
    pub fn unreadable(&self) -> usize {
        self.unreadable.len()
    }

    /// Whether the in-memory view covers everything stored under the key.
    pub fn is_intact(&self) -> bool {
        !self.degraded && self.unreadable.is_empty()
    }

    /// Every record in display order.
    pub fn records(&self) -> &[E] {
        &self.records
    }

    /// All records, or only those owned by `vehicle_id`, in display order.
    pub fn all(&self, vehicle_id: Option<&RecordId>) -> Vec<&E> {
        match vehicle_id {
            Some(owner) => self
                .records
                .iter()
                .filter(|r| r.vehicle_id() == Some(owner))
                .collect(),
            None => self.records.iter().collect(),
        }
    }

    pub fn get(&self, id: &RecordId) -> Option<&E> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    pub fn add<B: KeyValueStore + ?Sized>(
        &mut self,
        backend: &B,
        owner: Option<&RecordId>,
        draft: E::Draft,
        now: DateTime<Utc>,
    ) -> Result<E> {
        if E::REQUIRES_ACTIVE_VEHICLE && owner.is_none() {
            return Err(CarlogError::NoActiveVehicle);
        }
        self.ensure_writable()?;

        let record = E::create(RecordId::new(), owner.cloned(), draft, now);
        self.records.push(record.clone());
        self.sort();
        self.persist(backend)?;
        Ok(record)
    }

    pub fn update<B: KeyValueStore + ?Sized>(
        &mut self,
        backend: &B,
        id: &RecordId,
        patch: E::Patch,
        now: DateTime<Utc>,
    ) -> Result<E> {
        self.ensure_writable()?;
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| CarlogError::not_found(E::COLLECTION, id))?;

        record.apply(patch, now);
        record.touch(now);
        let updated = record.clone();

        self.sort();
        self.persist(backend)?;
        Ok(updated)
    }

    pub fn remove<B: KeyValueStore + ?Sized>(&mut self, backend: &B, id: &RecordId) -> Result<E> {
        self.ensure_writable()?;
        let position = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| CarlogError::not_found(E::COLLECTION, id))?;

        let removed = self.records.remove(position);
        self.persist(backend)?;
        Ok(removed)
    }

    /// Drop every record owned by `vehicle_id`. Returns how many were removed.
    pub fn remove_owned_by<B: KeyValueStore + ?Sized>(
        &mut self,
        backend: &B,
        vehicle_id: &RecordId,
    ) -> Result<usize> {
        self.ensure_writable()?;
        let before = self.records.len();
        self.records.retain(|r| r.vehicle_id() != Some(vehicle_id));
        let removed = before - self.records.len();
        if removed > 0 {
            self.persist(backend)?;
        }
        Ok(removed)
    }

    /// Overwrite the whole collection, in the order given. Unreadable records are dropped.
    pub fn replace_all<B: KeyValueStore + ?Sized>(
        &mut self,
        backend: &B,
        records: Vec<E>,
    ) -> Result<()> {
        self.records = records;
        self.unreadable.clear();
        self.degraded = false;
        self.persist(backend)
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.degraded {
            return Err(CarlogError::persistence(
                E::COLLECTION.key(),
                "stored collection could not be read; refusing to overwrite it",
            ));
        }
        Ok(())
    }

    fn sort(&mut self) {
        match E::ORDER {
            SortOrder::Insertion => {}
            SortOrder::DateAscending => self.records.sort_by_key(|r| r.date()),
            SortOrder::DateDescending => self
                .records
                .sort_by(|a, b| b.date().cmp(&a.date())),
        }
    }

    fn persist<B: KeyValueStore + ?Sized>(&self, backend: &B) -> Result<()> {
        let key = E::COLLECTION.key();
        if self.unreadable.is_empty() {
            return store::set(backend, key, &self.records);
        }
        let mut document = self
            .records
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<Value>, _>>()
            .map_err(|e| CarlogError::persistence(key, e))?;
        document.extend(self.unreadable.iter().cloned());
        store::set(backend, key, &document)
    }
}
