//! # Domain Model
//!
//! Plain records for the five persisted collections: [`Vehicle`], [`FuelRecord`],
//! [`MaintenanceRecord`], [`PartRecord`] and [`Reminder`]. Records carry no behavior
//! beyond field merging; the generic [`Repository`](crate::repository::Repository)
//! drives them through the [`Entity`] trait.
//!
//! ## Wire Format
//!
//! Records serialize with camelCase keys (`vehicleId`, `plateNumber`, `createdAt`)
//! so documents exported by earlier versions of the tracker load unchanged.
//!
//! ## Lenient Numbers
//!
//! Numeric fields were historically written from form inputs, so a stored cost may be
//! `20`, `"20"` or missing entirely. On read every numeric field accepts a number or a
//! numeric string; anything else counts as zero (or as absent for optional numbers).
//! On write numbers are always emitted as JSON numbers.
//!
//! ## Drafts and Patches
//!
//! Each entity has a `*Draft` (the caller-supplied fields for `add`) and a `*Patch`
//! (all-optional fields for `update`). Patches never touch `id`, `vehicleId` or
//! `createdAt`, which keeps identifiers immutable after creation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::repository::{Entity, SortOrder};
use crate::store::keys;

/// Identifier of a persisted record.
///
/// New identifiers are UUID v4 strings. Identifiers read from older documents are
/// kept verbatim, whatever their shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a short prefix suitable for display in listings.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The persisted collections, one per entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Vehicles,
    Fuel,
    Maintenance,
    Parts,
    Reminders,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Vehicles,
        Collection::Fuel,
        Collection::Maintenance,
        Collection::Parts,
        Collection::Reminders,
    ];

    /// Store key the collection is persisted under.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Vehicles => keys::VEHICLES,
            Collection::Fuel => keys::FUEL,
            Collection::Maintenance => keys::MAINTENANCE,
            Collection::Parts => keys::PARTS,
            Collection::Reminders => keys::REMINDERS,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Collection::Vehicles => "Vehicle",
            Collection::Fuel => "Fuel record",
            Collection::Maintenance => "Maintenance record",
            Collection::Parts => "Part",
            Collection::Reminders => "Reminder",
        };
        f.write_str(label)
    }
}

/// Coercing deserializers for numeric fields.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn coerce(value: &Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.filter(|v| v.is_finite())
    }

    pub fn f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce(&value).unwrap_or(0.0))
    }

    pub fn u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        Ok(opt_u64(deserializer)?.unwrap_or(0))
    }

    pub fn opt_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce(&value)
            .filter(|v| *v >= 0.0)
            .map(|v| v.round() as u64))
    }

    pub fn opt_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        Ok(opt_u64(deserializer)?.and_then(|v| u32::try_from(v).ok()))
    }

    pub fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        Ok(opt_u32(deserializer)?.unwrap_or(1))
    }

    /// Unrecognised kinds fall back to routine.
    pub fn maintenance_kind<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<super::MaintenanceKind, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(super::MaintenanceKind::deserialize(&value).unwrap_or_default())
    }
}

fn default_quantity() -> u32 {
    1
}

// --- Vehicle ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: RecordId,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub year: Option<u32>,
    #[serde(default)]
    pub plate_number: String,
    #[serde(default)]
    pub fuel_type: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub current_mileage: Option<u64>,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Vehicle {
    /// "Make Model (PLATE)", skipping empty parts.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.make, self.model).trim().to_string();
        if self.plate_number.is_empty() {
            name
        } else {
            format!("{} ({})", name, self.plate_number)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VehicleDraft {
    pub make: String,
    pub model: String,
    pub year: Option<u32>,
    pub plate_number: String,
    pub fuel_type: String,
    pub color: String,
    pub current_mileage: Option<u64>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehiclePatch {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<u32>,
    pub plate_number: Option<String>,
    pub fuel_type: Option<String>,
    pub color: Option<String>,
    pub current_mileage: Option<u64>,
    pub notes: Option<String>,
}

impl Entity for Vehicle {
    const COLLECTION: Collection = Collection::Vehicles;
    const ORDER: SortOrder = SortOrder::Insertion;
    const REQUIRES_ACTIVE_VEHICLE: bool = false;
    type Draft = VehicleDraft;
    type Patch = VehiclePatch;

    fn create(
        id: RecordId,
        _owner: Option<RecordId>,
        draft: VehicleDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            make: draft.make,
            model: draft.model,
            year: draft.year,
            plate_number: draft.plate_number,
            fuel_type: draft.fuel_type,
            color: draft.color,
            current_mileage: draft.current_mileage,
            notes: draft.notes,
            created_at: now,
            updated_at: None,
        }
    }

    fn apply(&mut self, patch: VehiclePatch, _now: DateTime<Utc>) {
        if let Some(make) = patch.make {
            self.make = make;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(year) = patch.year {
            self.year = Some(year);
        }
        if let Some(plate) = patch.plate_number {
            self.plate_number = plate;
        }
        if let Some(fuel_type) = patch.fuel_type {
            self.fuel_type = fuel_type;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(mileage) = patch.current_mileage {
            self.current_mileage = Some(mileage);
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn vehicle_id(&self) -> Option<&RecordId> {
        None
    }
}

// --- Fuel ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRecord {
    pub id: RecordId,
    pub vehicle_id: RecordId,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub liters: f64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub cost: f64,
    /// Odometer reading at fill-up.
    #[serde(default, deserialize_with = "lenient::u64")]
    pub mileage: u64,
    #[serde(default)]
    pub station: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct FuelDraft {
    pub date: NaiveDate,
    pub liters: f64,
    pub cost: f64,
    pub mileage: u64,
    pub station: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuelPatch {
    pub date: Option<NaiveDate>,
    pub liters: Option<f64>,
    pub cost: Option<f64>,
    pub mileage: Option<u64>,
    pub station: Option<String>,
    pub notes: Option<String>,
}

impl Entity for FuelRecord {
    const COLLECTION: Collection = Collection::Fuel;
    const ORDER: SortOrder = SortOrder::DateDescending;
    type Draft = FuelDraft;
    type Patch = FuelPatch;

    fn create(id: RecordId, owner: Option<RecordId>, draft: FuelDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            vehicle_id: owner.unwrap_or_default(),
            date: draft.date,
            liters: draft.liters,
            cost: draft.cost,
            mileage: draft.mileage,
            station: draft.station,
            notes: draft.notes,
            created_at: now,
            updated_at: None,
        }
    }

    fn apply(&mut self, patch: FuelPatch, _now: DateTime<Utc>) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(liters) = patch.liters {
            self.liters = liters;
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        if let Some(mileage) = patch.mileage {
            self.mileage = mileage;
        }
        if let Some(station) = patch.station {
            self.station = station;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn vehicle_id(&self) -> Option<&RecordId> {
        Some(&self.vehicle_id)
    }

    fn date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

// --- Maintenance ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceKind {
    #[default]
    #[serde(alias = "دورية")]
    Routine,
    #[serde(alias = "طارئة")]
    Emergency,
}

impl fmt::Display for MaintenanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceKind::Routine => f.write_str("routine"),
            MaintenanceKind::Emergency => f.write_str("emergency"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: RecordId,
    pub vehicle_id: RecordId,
    #[serde(rename = "type", default, deserialize_with = "lenient::maintenance_kind")]
    pub kind: MaintenanceKind,
    /// Service category, e.g. "oil change" or "brakes".
    #[serde(default)]
    pub service: String,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub cost: f64,
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub mileage: Option<u64>,
    #[serde(default)]
    pub workshop: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct MaintenanceDraft {
    pub kind: MaintenanceKind,
    pub service: String,
    pub date: NaiveDate,
    pub cost: f64,
    pub mileage: Option<u64>,
    pub workshop: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenancePatch {
    pub kind: Option<MaintenanceKind>,
    pub service: Option<String>,
    pub date: Option<NaiveDate>,
    pub cost: Option<f64>,
    pub mileage: Option<u64>,
    pub workshop: Option<String>,
    pub notes: Option<String>,
}

impl Entity for MaintenanceRecord {
    const COLLECTION: Collection = Collection::Maintenance;
    const ORDER: SortOrder = SortOrder::DateDescending;
    type Draft = MaintenanceDraft;
    type Patch = MaintenancePatch;

    fn create(
        id: RecordId,
        owner: Option<RecordId>,
        draft: MaintenanceDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            vehicle_id: owner.unwrap_or_default(),
            kind: draft.kind,
            service: draft.service,
            date: draft.date,
            cost: draft.cost,
            mileage: draft.mileage,
            workshop: draft.workshop,
            notes: draft.notes,
            created_at: now,
            updated_at: None,
        }
    }

    fn apply(&mut self, patch: MaintenancePatch, _now: DateTime<Utc>) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(service) = patch.service {
            self.service = service;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        if let Some(mileage) = patch.mileage {
            self.mileage = Some(mileage);
        }
        if let Some(workshop) = patch.workshop {
            self.workshop = workshop;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn vehicle_id(&self) -> Option<&RecordId> {
        Some(&self.vehicle_id)
    }

    fn date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

// --- Parts ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRecord {
    pub id: RecordId,
    pub vehicle_id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub price: f64,
    #[serde(default)]
    pub supplier: String,
    #[serde(default = "default_quantity", deserialize_with = "lenient::quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct PartDraft {
    pub name: String,
    pub category: String,
    pub date: NaiveDate,
    pub price: f64,
    pub supplier: String,
    pub quantity: u32,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub price: Option<f64>,
    pub supplier: Option<String>,
    pub quantity: Option<u32>,
    pub notes: Option<String>,
}

impl Entity for PartRecord {
    const COLLECTION: Collection = Collection::Parts;
    const ORDER: SortOrder = SortOrder::DateDescending;
    type Draft = PartDraft;
    type Patch = PartPatch;

    fn create(id: RecordId, owner: Option<RecordId>, draft: PartDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            vehicle_id: owner.unwrap_or_default(),
            name: draft.name,
            category: draft.category,
            date: draft.date,
            price: draft.price,
            supplier: draft.supplier,
            quantity: draft.quantity,
            notes: draft.notes,
            created_at: now,
            updated_at: None,
        }
    }

    fn apply(&mut self, patch: PartPatch, _now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(supplier) = patch.supplier {
            self.supplier = supplier;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn vehicle_id(&self) -> Option<&RecordId> {
        Some(&self.vehicle_id)
    }

    fn date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

// --- Reminders ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: RecordId,
    pub vehicle_id: RecordId,
    #[serde(default)]
    pub title: String,
    /// Free-form reminder type, e.g. "insurance renewal".
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Due date.
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct ReminderDraft {
    pub title: String,
    pub kind: String,
    pub date: NaiveDate,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub kind: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl Entity for Reminder {
    const COLLECTION: Collection = Collection::Reminders;
    const ORDER: SortOrder = SortOrder::DateAscending;
    type Draft = ReminderDraft;
    type Patch = ReminderPatch;

    fn create(
        id: RecordId,
        owner: Option<RecordId>,
        draft: ReminderDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            vehicle_id: owner.unwrap_or_default(),
            title: draft.title,
            kind: draft.kind,
            date: draft.date,
            description: draft.description,
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: None,
        }
    }

    fn apply(&mut self, patch: ReminderPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        match patch.completed {
            Some(true) if !self.completed => {
                self.completed = true;
                self.completed_at = Some(now);
            }
            Some(false) => {
                self.completed = false;
                self.completed_at = None;
            }
            _ => {}
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn vehicle_id(&self) -> Option<&RecordId> {
        Some(&self.vehicle_id)
    }

    fn date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_ids_are_unique_uuids() {
        let a = RecordId::new();
        let b = RecordId::new();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn short_id_truncates_to_eight_chars() {
        let id = RecordId::from("abcdefghijkl");
        assert_eq!(id.short(), "abcdefgh");
        assert_eq!(RecordId::from("abc").short(), "abc");
    }

    #[test]
    fn fuel_record_accepts_numeric_strings() {
        let json = r#"{
            "id": "k1x9",
            "vehicleId": "v1",
            "date": "2024-03-01",
            "liters": "40.5",
            "cost": "20",
            "mileage": "1200"
        }"#;
        let record: FuelRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.liters, 40.5);
        assert_eq!(record.cost, 20.0);
        assert_eq!(record.mileage, 1200);
        assert_eq!(record.station, "");
    }

    #[test]
    fn garbage_numbers_become_zero() {
        let json = r#"{
            "id": "m1",
            "vehicleId": "v1",
            "date": "2024-03-01",
            "cost": "n/a",
            "mileage": null
        }"#;
        let record: MaintenanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.cost, 0.0);
        assert_eq!(record.mileage, None);
        assert_eq!(record.kind, MaintenanceKind::Routine);
    }

    #[test]
    fn part_quantity_defaults_to_one() {
        let json = r#"{"id": "p1", "vehicleId": "v1", "date": "2024-03-01", "price": 12}"#;
        let part: PartRecord = serde_json::from_str(json).unwrap();
        assert_eq!(part.quantity, 1);
        assert_eq!(part.price, 12.0);
    }

    #[test]
    fn serializes_camel_case_keys() {
        let vehicle = Vehicle::create(
            RecordId::from("v1"),
            None,
            VehicleDraft {
                make: "Toyota".into(),
                plate_number: "ABC 123".into(),
                ..Default::default()
            },
            Utc::now(),
        );
        let json = serde_json::to_value(&vehicle).unwrap();
        assert_eq!(json["plateNumber"], "ABC 123");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_none());
    }

    #[test]
    fn patch_leaves_unset_fields_alone() {
        let mut record = FuelRecord::create(
            RecordId::new(),
            Some(RecordId::from("v1")),
            FuelDraft {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                liters: 30.0,
                cost: 60.0,
                mileage: 1000,
                station: "North".into(),
                notes: String::new(),
            },
            Utc::now(),
        );
        record.apply(
            FuelPatch {
                cost: Some(65.0),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(record.cost, 65.0);
        assert_eq!(record.liters, 30.0);
        assert_eq!(record.station, "North");
        assert_eq!(record.vehicle_id, RecordId::from("v1"));
    }

    #[test]
    fn completing_a_reminder_stamps_completion_time() {
        let mut reminder = Reminder::create(
            RecordId::new(),
            Some(RecordId::from("v1")),
            ReminderDraft {
                title: "Insurance".into(),
                kind: "renewal".into(),
                date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                description: String::new(),
            },
            Utc::now(),
        );
        let done = Utc.with_ymd_and_hms(2024, 6, 2, 18, 0, 0).unwrap();
        reminder.apply(
            ReminderPatch {
                completed: Some(true),
                ..Default::default()
            },
            done,
        );
        assert!(reminder.completed);
        assert_eq!(reminder.completed_at, Some(done));

        reminder.apply(
            ReminderPatch {
                completed: Some(false),
                ..Default::default()
            },
            done,
        );
        assert!(!reminder.completed);
        assert!(reminder.completed_at.is_none());
    }

    #[test]
    fn display_name_skips_missing_plate() {
        let mut vehicle = Vehicle::create(
            RecordId::new(),
            None,
            VehicleDraft {
                make: "Honda".into(),
                model: "Civic".into(),
                ..Default::default()
            },
            Utc::now(),
        );
        assert_eq!(vehicle.display_name(), "Honda Civic");
        vehicle.plate_number = "XYZ".into();
        assert_eq!(vehicle.display_name(), "Honda Civic (XYZ)");
    }

    #[test]
    fn maintenance_kind_reads_arabic_labels() {
        let kinds: Vec<MaintenanceKind> = ["دورية", "طارئة", "routine", "emergency", "other"]
            .iter()
            .map(|label| {
                let json = serde_json::json!({
                    "id": "m1",
                    "vehicleId": "v1",
                    "type": label,
                    "date": "2024-03-01",
                });
                serde_json::from_value::<MaintenanceRecord>(json).unwrap().kind
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                MaintenanceKind::Routine,
                MaintenanceKind::Emergency,
                MaintenanceKind::Routine,
                MaintenanceKind::Emergency,
                MaintenanceKind::Routine,
            ]
        );
    }
}
