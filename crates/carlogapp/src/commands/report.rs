use chrono::NaiveDate;
use serde::Serialize;

use crate::commands::Repositories;
use crate::metrics::{self, ExpenseTotals};
use crate::model::{FuelRecord, MaintenanceRecord, PartRecord, Vehicle};

/// Spending of one vehicle over an inclusive date range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub vehicle: Vehicle,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub fuel: Vec<FuelRecord>,
    pub maintenance: Vec<MaintenanceRecord>,
    pub parts: Vec<PartRecord>,
    pub totals: ExpenseTotals,
    pub total_liters: f64,
}

pub fn run(repos: &Repositories, vehicle: &Vehicle, from: NaiveDate, to: NaiveDate) -> Report {
    let owned = repos.owned_by(&vehicle.id);
    let in_range = |date: NaiveDate| date >= from && date <= to;

    let fuel: Vec<&FuelRecord> = owned.fuel.into_iter().filter(|r| in_range(r.date)).collect();
    let maintenance: Vec<&MaintenanceRecord> = owned
        .maintenance
        .into_iter()
        .filter(|r| in_range(r.date))
        .collect();
    let parts: Vec<&PartRecord> = owned.parts.into_iter().filter(|r| in_range(r.date)).collect();

    Report {
        vehicle: vehicle.clone(),
        from,
        to,
        totals: ExpenseTotals::from_records(&fuel, &maintenance, &parts),
        total_liters: metrics::total_liters(fuel.iter().copied()),
        fuel: fuel.into_iter().cloned().collect(),
        maintenance: maintenance.into_iter().cloned().collect(),
        parts: parts.into_iter().cloned().collect(),
    }
}
