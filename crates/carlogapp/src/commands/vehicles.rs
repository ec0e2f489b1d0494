use tracing::info;

use crate::commands::Repositories;
use crate::error::Result;
use crate::model::{RecordId, Vehicle};
use crate::repository::Repository;
use crate::selection::ActiveSelection;
use crate::store::KeyValueStore;

/// Make `vehicle_id` active when nothing resolvable is selected yet.
/// Returns whether the selection changed.
pub fn activate_if_unselected<B: KeyValueStore + ?Sized>(
    backend: &B,
    vehicles: &Repository<Vehicle>,
    selection: &mut ActiveSelection,
    vehicle_id: &RecordId,
) -> Result<bool> {
    if selection.resolve(vehicles).is_some() {
        return Ok(false);
    }
    selection.set_active(backend, vehicle_id)?;
    info!(vehicle = %vehicle_id, "first vehicle selected as active");
    Ok(true)
}

/// What a vehicle delete took with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cascade {
    pub fuel: usize,
    pub maintenance: usize,
    pub parts: usize,
    pub reminders: usize,
    pub cleared_selection: bool,
}

impl Cascade {
    pub fn total(&self) -> usize {
        self.fuel + self.maintenance + self.parts + self.reminders
    }
}

/// Remove every record owned by `vehicle_id` and drop it from the selection.
///
/// The vehicle itself is left for the caller to remove.
pub fn remove_dependents<B: KeyValueStore + ?Sized>(
    backend: &B,
    repos: &mut Repositories,
    selection: &mut ActiveSelection,
    vehicle_id: &RecordId,
) -> Result<Cascade> {
    let mut cascade = Cascade {
        fuel: repos.fuel.remove_owned_by(backend, vehicle_id)?,
        maintenance: repos.maintenance.remove_owned_by(backend, vehicle_id)?,
        parts: repos.parts.remove_owned_by(backend, vehicle_id)?,
        reminders: repos.reminders.remove_owned_by(backend, vehicle_id)?,
        cleared_selection: false,
    };

    if selection.is(vehicle_id) {
        selection.clear(backend)?;
        cascade.cleared_selection = true;
    }

    info!(
        vehicle = %vehicle_id,
        records = cascade.total(),
        "removed dependent records"
    );
    Ok(cascade)
}
