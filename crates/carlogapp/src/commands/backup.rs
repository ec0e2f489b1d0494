//! Rolling backup.
//!
//! A single snapshot of the five collections lives under the `backup` key, with the
//! time it was taken (epoch milliseconds) under `lastBackup`. [`auto_backup`] refreshes
//! it when it is missing or older than the configured interval; hosts call it once at
//! startup. [`restore`] puts the snapshot back.
//!
//! A snapshot is only taken while every collection loaded cleanly, so a damaged store
//! never replaces a good backup.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::commands::{Dataset, Repositories};
use crate::error::{CarlogError, Result};
use crate::store::{self, keys, KeyValueStore};

/// When the stored snapshot was taken, if there is one.
pub fn last_backup<B: KeyValueStore + ?Sized>(backend: &B) -> Option<DateTime<Utc>> {
    let millis: Option<i64> = store::get(backend, keys::LAST_BACKUP, None);
    millis.and_then(DateTime::from_timestamp_millis)
}

pub fn is_due(last: Option<DateTime<Utc>>, now: DateTime<Utc>, interval: Duration) -> bool {
    match last {
        Some(taken) => now - taken > interval,
        None => true,
    }
}

/// Take a snapshot now, replacing any previous one.
pub fn snapshot<B: KeyValueStore + ?Sized>(
    backend: &B,
    repos: &Repositories,
    now: DateTime<Utc>,
) -> Result<Dataset> {
    if !repos.is_intact() {
        return Err(CarlogError::persistence(
            keys::BACKUP,
            "some stored records could not be read; not replacing the backup",
        ));
    }
    let data = Dataset::capture(repos);
    store::set(backend, keys::BACKUP, &data)?;
    store::set(backend, keys::LAST_BACKUP, &now.timestamp_millis())?;
    info!(records = data.record_count(), "backup snapshot taken");
    Ok(data)
}

/// Snapshot when none exists or the last one is older than `interval_days`.
/// Returns whether a snapshot was taken.
pub fn auto_backup<B: KeyValueStore + ?Sized>(
    backend: &B,
    repos: &Repositories,
    now: DateTime<Utc>,
    interval_days: u32,
) -> Result<bool> {
    let interval = Duration::days(i64::from(interval_days));
    if !is_due(last_backup(backend), now, interval) {
        debug!("backup not due");
        return Ok(false);
    }
    if !repos.is_intact() {
        warn!("skipping backup, some stored records could not be read");
        return Ok(false);
    }
    snapshot(backend, repos, now)?;
    Ok(true)
}

/// The stored snapshot.
pub fn load<B: KeyValueStore + ?Sized>(backend: &B) -> Result<Dataset> {
    let data: Option<Dataset> = store::get(backend, keys::BACKUP, None);
    data.ok_or(CarlogError::NoBackup)
}

/// Replace all five collections with `data`.
pub fn restore<B: KeyValueStore + ?Sized>(
    backend: &B,
    repos: &mut Repositories,
    data: Dataset,
) -> Result<()> {
    let count = data.record_count();
    repos.vehicles.replace_all(backend, data.vehicles)?;
    repos.fuel.replace_all(backend, data.fuel)?;
    repos.maintenance.replace_all(backend, data.maintenance)?;
    repos.parts.replace_all(backend, data.parts)?;
    repos.reminders.replace_all(backend, data.reminders)?;
    info!(records = count, "backup restored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VehicleDraft;
    use crate::store::mem_backend::MemBackend;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap()
    }

    #[test]
    fn first_run_takes_a_snapshot() {
        let backend = MemBackend::new();
        let repos = Repositories::load(&backend);

        assert!(auto_backup(&backend, &repos, at(1), 7).unwrap());
        assert_eq!(last_backup(&backend), Some(at(1)));
        assert_eq!(
            backend.raw(keys::LAST_BACKUP),
            Some(at(1).timestamp_millis().to_string())
        );
    }

    #[test]
    fn snapshot_is_refreshed_only_after_interval() {
        let backend = MemBackend::new();
        let repos = Repositories::load(&backend);
        auto_backup(&backend, &repos, at(1), 7).unwrap();

        assert!(!auto_backup(&backend, &repos, at(8), 7).unwrap());
        assert!(auto_backup(&backend, &repos, at(9), 7).unwrap());
        assert_eq!(last_backup(&backend), Some(at(9)));
    }

    #[test]
    fn restore_puts_snapshot_back() {
        let backend = MemBackend::new();
        let mut repos = Repositories::load(&backend);
        repos
            .vehicles
            .add(&backend, None, VehicleDraft::default(), at(1))
            .unwrap();
        snapshot(&backend, &repos, at(1)).unwrap();

        repos
            .vehicles
            .add(&backend, None, VehicleDraft::default(), at(2))
            .unwrap();
        assert_eq!(repos.vehicles.len(), 2);

        let data = load(&backend).unwrap();
        restore(&backend, &mut repos, data).unwrap();
        assert_eq!(repos.vehicles.len(), 1);
        assert_eq!(Repositories::load(&backend).vehicles.len(), 1);
    }

    #[test]
    fn load_without_snapshot_fails() {
        let backend = MemBackend::new();
        assert!(matches!(load(&backend), Err(CarlogError::NoBackup)));
    }

    #[test]
    fn partial_snapshot_restores_missing_collections_as_empty() {
        let backend = MemBackend::new();
        store::set(
            &backend,
            keys::BACKUP,
            &serde_json::json!({"vehicles": [{"id": "v1"}]}),
        )
        .unwrap();
        let data = load(&backend).unwrap();
        assert_eq!(data.vehicles.len(), 1);
        assert!(data.fuel.is_empty());
    }

    #[test]
    fn damaged_store_never_replaces_the_backup() {
        let backend = MemBackend::new();
        let mut repos = Repositories::load(&backend);
        repos
            .vehicles
            .add(&backend, None, VehicleDraft::default(), at(1))
            .unwrap();
        snapshot(&backend, &repos, at(1)).unwrap();
        let good = backend.raw(keys::BACKUP);

        backend
            .write(keys::MAINTENANCE, r#"[{"id": "m1", "vehicleId": "v1", "date": ""}]"#)
            .unwrap();
        let repos = Repositories::load(&backend);
        assert!(!repos.is_intact());

        assert!(!auto_backup(&backend, &repos, at(20), 7).unwrap());
        assert!(matches!(
            snapshot(&backend, &repos, at(20)),
            Err(CarlogError::Persistence { .. })
        ));
        assert_eq!(backend.raw(keys::BACKUP), good);
        assert_eq!(last_backup(&backend), Some(at(1)));
    }
}
