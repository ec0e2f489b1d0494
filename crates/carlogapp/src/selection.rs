//! Active-vehicle selection, persisted under `activeVehicle`.
//!
//! The stored id is not validated on write. Resolution happens on read: an id that no
//! longer names a vehicle behaves exactly like no selection at all.

use tracing::debug;

use crate::error::Result;
use crate::model::{RecordId, Vehicle};
use crate::repository::Repository;
use crate::store::{self, keys, KeyValueStore};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveSelection {
    id: Option<RecordId>,
}

impl ActiveSelection {
    pub fn load<B: KeyValueStore + ?Sized>(backend: &B) -> Self {
        Self {
            id: store::get(backend, keys::ACTIVE_VEHICLE, None),
        }
    }

    /// The raw stored id, resolved or not.
    pub fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    pub fn set_active<B: KeyValueStore + ?Sized>(
        &mut self,
        backend: &B,
        id: &RecordId,
    ) -> Result<()> {
        self.id = Some(id.clone());
        debug!(vehicle = %id, "active vehicle set");
        store::set(backend, keys::ACTIVE_VEHICLE, &self.id)
    }

    pub fn clear<B: KeyValueStore + ?Sized>(&mut self, backend: &B) -> Result<()> {
        self.id = None;
        debug!("active vehicle cleared");
        store::set(backend, keys::ACTIVE_VEHICLE, &self.id)
    }

    /// The selected vehicle, if the stored id still names one.
    pub fn resolve<'a>(&self, vehicles: &'a Repository<Vehicle>) -> Option<&'a Vehicle> {
        self.id.as_ref().and_then(|id| vehicles.get(id))
    }

    pub fn is(&self, id: &RecordId) -> bool {
        self.id.as_ref() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VehicleDraft;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn empty_store_has_no_selection() {
        let backend = MemBackend::new();
        let vehicles: Repository<Vehicle> = Repository::load(&backend);
        let selection = ActiveSelection::load(&backend);
        assert!(selection.id().is_none());
        assert!(selection.resolve(&vehicles).is_none());
    }

    #[test]
    fn selection_persists_and_resolves() {
        let backend = MemBackend::new();
        let mut vehicles: Repository<Vehicle> = Repository::load(&backend);
        let vehicle = vehicles
            .add(&backend, None, VehicleDraft::default(), chrono::Utc::now())
            .unwrap();

        let mut selection = ActiveSelection::load(&backend);
        selection.set_active(&backend, &vehicle.id).unwrap();

        let reloaded = ActiveSelection::load(&backend);
        assert_eq!(reloaded.resolve(&vehicles).map(|v| &v.id), Some(&vehicle.id));
    }

    #[test]
    fn dangling_id_resolves_to_nothing() {
        let backend = MemBackend::new();
        let vehicles: Repository<Vehicle> = Repository::load(&backend);
        let mut selection = ActiveSelection::load(&backend);
        selection
            .set_active(&backend, &RecordId::from("gone"))
            .unwrap();

        assert!(selection.is(&RecordId::from("gone")));
        assert!(selection.resolve(&vehicles).is_none());
    }

    #[test]
    fn clear_persists_null() {
        let backend = MemBackend::new();
        let mut selection = ActiveSelection::load(&backend);
        selection.set_active(&backend, &RecordId::from("v1")).unwrap();
        selection.clear(&backend).unwrap();

        assert_eq!(backend.raw(keys::ACTIVE_VEHICLE).as_deref(), Some("null"));
        assert!(ActiveSelection::load(&backend).id().is_none());
    }
}
