//! # Derived Metrics
//!
//! Values computed on demand from repository contents and never persisted. Every
//! function here is pure: it takes borrowed records, never mutates them, and answers
//! sensibly for empty input.
//!
//! Two small traits let the dashboard and reports treat the three spending collections
//! uniformly:
//!
//! - [`Expense`]: a dated amount of money (fuel cost, maintenance cost, part price).
//! - [`Odometer`]: an optional odometer reading taken with the record.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::fmt;

use crate::model::{FuelRecord, MaintenanceRecord, PartRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    Fuel,
    Maintenance,
    Parts,
}

impl fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpenseKind::Fuel => f.write_str("fuel"),
            ExpenseKind::Maintenance => f.write_str("maintenance"),
            ExpenseKind::Parts => f.write_str("parts"),
        }
    }
}

pub trait Expense {
    const KIND: ExpenseKind;

    fn spent_on(&self) -> NaiveDate;

    fn amount(&self) -> f64;

    /// Short headline for transaction lists.
    fn title(&self) -> String;

    /// Secondary line for transaction lists.
    fn detail(&self) -> String;
}

pub trait Odometer {
    fn odometer(&self) -> Option<u64>;
}

impl Expense for FuelRecord {
    const KIND: ExpenseKind = ExpenseKind::Fuel;

    fn spent_on(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> f64 {
        self.cost
    }

    fn title(&self) -> String {
        if self.station.is_empty() {
            "Fuel fill-up".to_string()
        } else {
            format!("Fuel fill-up at {}", self.station)
        }
    }

    fn detail(&self) -> String {
        format!("{:.2} L", self.liters)
    }
}

impl Odometer for FuelRecord {
    fn odometer(&self) -> Option<u64> {
        Some(self.mileage)
    }
}

impl Expense for MaintenanceRecord {
    const KIND: ExpenseKind = ExpenseKind::Maintenance;

    fn spent_on(&self) -> NaiveDate {
        self.date
    }

    fn amount(&self) -> f64 {
        self.cost
    }

    fn title(&self) -> String {
        self.service.clone()
    }

    fn detail(&self) -> String {
        self.kind.to_string()
    }
}

impl Odometer for MaintenanceRecord {
    fn odometer(&self) -> Option<u64> {
        self.mileage
    }
}

impl Expense for PartRecord {
    const KIND: ExpenseKind = ExpenseKind::Parts;

    fn spent_on(&self) -> NaiveDate {
        self.date
    }

    /// The stored price, not multiplied by quantity.
    fn amount(&self) -> f64 {
        self.price
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn detail(&self) -> String {
        self.category.clone()
    }
}

/// Sum `field` over `records`. Non-finite values count as zero.
pub fn total<'a, T: 'a>(
    records: impl IntoIterator<Item = &'a T>,
    field: impl Fn(&T) -> f64,
) -> f64 {
    records
        .into_iter()
        .map(|r| field(r))
        .filter(|v| v.is_finite())
        .sum()
}

pub fn total_cost<'a, E: Expense + 'a>(records: impl IntoIterator<Item = &'a E>) -> f64 {
    total(records, E::amount)
}

pub fn total_liters<'a>(records: impl IntoIterator<Item = &'a FuelRecord>) -> f64 {
    total(records, |r: &FuelRecord| r.liters)
}

/// Average distance per liter across consecutive fill-ups.
///
/// Records are taken in date order (odometer breaks ties). For each consecutive pair
/// with a positive odometer difference, the distance and the later fill-up's liters
/// are accumulated. Pairs where the odometer did not advance are skipped.
///
/// Returns `None` with fewer than two records or when no liters were accumulated.
pub fn consumption_rate(records: &[&FuelRecord]) -> Option<f64> {
    if records.len() < 2 {
        return None;
    }

    let mut ordered = records.to_vec();
    ordered.sort_by_key(|r| (r.date, r.mileage));

    let mut distance = 0.0;
    let mut liters = 0.0;
    for pair in ordered.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next.mileage > prev.mileage {
            distance += (next.mileage - prev.mileage) as f64;
            if next.liters.is_finite() {
                liters += next.liters;
            }
        }
    }

    if liters <= 0.0 {
        return None;
    }
    Some(distance / liters)
}

/// Distance per liter of each fill-up, in input order.
///
/// A fill-up's figure is the odometer distance since the fill-up before it (date order,
/// odometer breaking ties) divided by its own liters. It is `None` for the earliest
/// fill-up, when the odometer did not advance, or when the liters are not positive.
pub fn fill_consumption(records: &[&FuelRecord]) -> Vec<Option<f64>> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&i| (records[i].date, records[i].mileage));

    let mut figures = vec![None; records.len()];
    for pair in order.windows(2) {
        let (prev, next) = (records[pair[0]], records[pair[1]]);
        let distance = next.mileage.saturating_sub(prev.mileage);
        if distance > 0 && next.liters > 0.0 && next.liters.is_finite() {
            figures[pair[1]] = Some(distance as f64 / next.liters);
        }
    }
    figures
}

/// Total cost divided by the odometer span covered by the records.
///
/// Returns `None` when there are no odometer readings or the span is zero.
pub fn cost_per_distance<E: Expense + Odometer>(records: &[&E]) -> Option<f64> {
    let readings: Vec<u64> = records.iter().filter_map(|r| r.odometer()).collect();
    let min = readings.iter().min()?;
    let max = readings.iter().max()?;
    let span = max - min;
    if span == 0 {
        return None;
    }
    Some(total_cost(records.iter().copied()) / span as f64)
}

/// Spending per category, with record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseTotals {
    pub fuel_cost: f64,
    pub maintenance_cost: f64,
    pub parts_cost: f64,
    pub fuel_count: usize,
    pub maintenance_count: usize,
    pub parts_count: usize,
}

impl ExpenseTotals {
    pub fn from_records(
        fuel: &[&FuelRecord],
        maintenance: &[&MaintenanceRecord],
        parts: &[&PartRecord],
    ) -> Self {
        Self {
            fuel_cost: total_cost(fuel.iter().copied()),
            maintenance_cost: total_cost(maintenance.iter().copied()),
            parts_cost: total_cost(parts.iter().copied()),
            fuel_count: fuel.len(),
            maintenance_count: maintenance.len(),
            parts_count: parts.len(),
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.fuel_cost + self.maintenance_cost + self.parts_cost
    }
}

/// Spending within one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    /// First day of the month.
    pub month: NaiveDate,
    pub fuel: f64,
    pub maintenance: f64,
    pub parts: f64,
}

impl MonthlyTotal {
    pub fn total(&self) -> f64 {
        self.fuel + self.maintenance + self.parts
    }
}

/// Per-month totals for the `months` calendar months ending with the month of
/// `today`, oldest first.
pub fn monthly_breakdown(
    fuel: &[&FuelRecord],
    maintenance: &[&MaintenanceRecord],
    parts: &[&PartRecord],
    today: NaiveDate,
    months: u32,
) -> Vec<MonthlyTotal> {
    let Some(current) = today.with_day(1) else {
        return Vec::new();
    };

    (0..months)
        .rev()
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .map(|month| {
            let in_month = |d: NaiveDate| d.year() == month.year() && d.month() == month.month();
            MonthlyTotal {
                month,
                fuel: total_cost(fuel.iter().copied().filter(|r| in_month(r.date))),
                maintenance: total_cost(maintenance.iter().copied().filter(|r| in_month(r.date))),
                parts: total_cost(parts.iter().copied().filter(|r| in_month(r.date))),
            }
        })
        .collect()
}

/// One line in a merged list of spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub kind: ExpenseKind,
    pub date: NaiveDate,
    pub title: String,
    pub detail: String,
    pub amount: f64,
}

impl Transaction {
    fn from_expense<E: Expense>(record: &E) -> Self {
        Self {
            kind: E::KIND,
            date: record.spent_on(),
            title: record.title(),
            detail: record.detail(),
            amount: record.amount(),
        }
    }
}

/// The `limit` most recent fuel, maintenance and part entries, newest first.
pub fn recent_transactions(
    fuel: &[&FuelRecord],
    maintenance: &[&MaintenanceRecord],
    parts: &[&PartRecord],
    limit: usize,
) -> Vec<Transaction> {
    let mut all: Vec<Transaction> = fuel
        .iter()
        .map(|r| Transaction::from_expense(*r))
        .chain(maintenance.iter().map(|r| Transaction::from_expense(*r)))
        .chain(parts.iter().map(|r| Transaction::from_expense(*r)))
        .collect();
    all.sort_by(|a, b| b.date.cmp(&a.date));
    all.truncate(limit);
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MaintenanceKind, RecordId};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fill(day: u32, mileage: u64, liters: f64, cost: f64) -> FuelRecord {
        FuelRecord {
            id: RecordId::new(),
            vehicle_id: RecordId::from("v1"),
            date: date(2024, 3, day),
            liters,
            cost,
            mileage,
            station: String::new(),
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn service(on: NaiveDate, cost: f64) -> MaintenanceRecord {
        MaintenanceRecord {
            id: RecordId::new(),
            vehicle_id: RecordId::from("v1"),
            kind: MaintenanceKind::Routine,
            service: "Oil change".into(),
            date: on,
            cost,
            mileage: None,
            workshop: String::new(),
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn part(on: NaiveDate, price: f64, quantity: u32) -> PartRecord {
        PartRecord {
            id: RecordId::new(),
            vehicle_id: RecordId::from("v1"),
            name: "Filter".into(),
            category: "engine".into(),
            date: on,
            price,
            supplier: String::new(),
            quantity,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn total_tolerates_string_and_missing_costs() {
        let json = r#"[
            {"id": "a", "vehicleId": "v1", "date": "2024-01-01", "cost": 10},
            {"id": "b", "vehicleId": "v1", "date": "2024-01-02", "cost": "20"},
            {"id": "c", "vehicleId": "v1", "date": "2024-01-03"}
        ]"#;
        let records: Vec<MaintenanceRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(total_cost(&records), 30.0);
    }

    #[test]
    fn total_of_nothing_is_zero() {
        let none: Vec<FuelRecord> = Vec::new();
        assert_eq!(total_cost(&none), 0.0);
        assert_eq!(total_liters(&none), 0.0);
    }

    #[test]
    fn total_skips_non_finite_values() {
        let records = [fill(1, 0, f64::NAN, 5.0), fill(2, 0, 10.0, 5.0)];
        assert_eq!(total_liters(&records), 10.0);
    }

    #[test]
    fn consumption_over_three_fill_ups() {
        let a = fill(1, 1000, 35.0, 70.0);
        let b = fill(8, 1400, 40.0, 80.0);
        let c = fill(15, 1800, 40.0, 80.0);
        assert_eq!(consumption_rate(&[&c, &a, &b]), Some(10.0));
    }

    #[test]
    fn consumption_needs_two_records() {
        assert_eq!(consumption_rate(&[]), None);
        let only = fill(1, 1000, 40.0, 80.0);
        assert_eq!(consumption_rate(&[&only]), None);
    }

    #[test]
    fn consumption_without_liters_is_none() {
        let a = fill(1, 1000, 0.0, 0.0);
        let b = fill(2, 1400, 0.0, 0.0);
        assert_eq!(consumption_rate(&[&a, &b]), None);
    }

    #[test]
    fn consumption_skips_pairs_without_progress() {
        let a = fill(1, 1000, 30.0, 0.0);
        let b = fill(2, 1000, 30.0, 0.0);
        let c = fill(3, 1500, 50.0, 0.0);
        assert_eq!(consumption_rate(&[&a, &b, &c]), Some(10.0));
    }

    #[test]
    fn consumption_does_not_reorder_input() {
        let a = fill(1, 1000, 30.0, 0.0);
        let b = fill(2, 1500, 50.0, 0.0);
        let input = [&b, &a];
        consumption_rate(&input);
        assert_eq!(input[0].mileage, 1500);
    }

    #[test]
    fn consumption_survives_huge_odometer_readings() {
        let a = fill(1, 0, 40.0, 0.0);
        let b = fill(2, u64::MAX - 1, 40.0, 0.0);
        let c = fill(3, u64::MAX, 40.0, 0.0);
        let rate = consumption_rate(&[&a, &b, &c]).unwrap();
        assert!(rate.is_finite() && rate > 0.0);
    }

    #[test]
    fn fill_consumption_follows_input_order() {
        let a = fill(1, 1000, 35.0, 0.0);
        let b = fill(8, 1400, 40.0, 0.0);
        let c = fill(15, 1900, 50.0, 0.0);
        assert_eq!(
            fill_consumption(&[&c, &b, &a]),
            vec![Some(10.0), Some(10.0), None]
        );
    }

    #[test]
    fn fill_consumption_without_progress_or_liters_is_none() {
        let a = fill(1, 1000, 30.0, 0.0);
        let b = fill(2, 1000, 30.0, 0.0);
        let c = fill(3, 1500, 0.0, 0.0);
        let d = fill(4, 1200, 20.0, 0.0);
        assert_eq!(
            fill_consumption(&[&a, &b, &c, &d]),
            vec![None, None, None, None]
        );
        assert!(fill_consumption(&[]).is_empty());
    }

    #[test]
    fn cost_per_distance_uses_odometer_span() {
        let a = fill(1, 1000, 40.0, 100.0);
        let b = fill(2, 1500, 40.0, 100.0);
        assert_eq!(cost_per_distance(&[&a, &b]), Some(0.4));
    }

    #[test]
    fn cost_per_distance_without_span_is_none() {
        let empty: [&FuelRecord; 0] = [];
        assert_eq!(cost_per_distance(&empty), None);

        let a = fill(1, 1000, 40.0, 100.0);
        assert_eq!(cost_per_distance(&[&a]), None);

        let unmetered = service(date(2024, 1, 1), 50.0);
        assert_eq!(cost_per_distance(&[&unmetered]), None);
    }

    #[test]
    fn part_cost_ignores_quantity() {
        let p = part(date(2024, 1, 1), 25.0, 4);
        assert_eq!(total_cost([&p]), 25.0);
    }

    #[test]
    fn expense_totals_add_up() {
        let f = fill(1, 1000, 40.0, 80.0);
        let m = service(date(2024, 3, 2), 120.0);
        let p = part(date(2024, 3, 3), 30.0, 1);
        let totals = ExpenseTotals::from_records(&[&f], &[&m], &[&p]);
        assert_eq!(totals.total_cost(), 230.0);
        assert_eq!(totals.fuel_count, 1);
        assert_eq!(totals.parts_count, 1);
    }

    #[test]
    fn monthly_breakdown_covers_trailing_months() {
        let f = fill(10, 1000, 40.0, 80.0);
        let old = service(date(2023, 12, 20), 50.0);
        let ancient = service(date(2022, 1, 1), 999.0);
        let p = part(date(2024, 1, 5), 15.0, 1);

        let months = monthly_breakdown(&[&f], &[&old, &ancient], &[&p], date(2024, 3, 31), 6);
        assert_eq!(months.len(), 6);
        assert_eq!(months[0].month, date(2023, 10, 1));
        assert_eq!(months[5].month, date(2024, 3, 1));
        assert_eq!(months[5].fuel, 80.0);
        assert_eq!(months[2].maintenance, 50.0);
        assert_eq!(months[3].parts, 15.0);

        let grand: f64 = months.iter().map(MonthlyTotal::total).sum();
        assert_eq!(grand, 145.0);
    }

    #[test]
    fn recent_transactions_are_newest_first_and_limited() {
        let fuel: Vec<FuelRecord> = (1..=4).map(|d| fill(d, 1000, 40.0, 80.0)).collect();
        let m = service(date(2024, 3, 20), 120.0);
        let p = part(date(2024, 2, 1), 30.0, 1);
        let fuel_refs: Vec<&FuelRecord> = fuel.iter().collect();

        let recent = recent_transactions(&fuel_refs, &[&m], &[&p], 5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].kind, ExpenseKind::Maintenance);
        assert_eq!(recent[0].title, "Oil change");
        assert!(recent.windows(2).all(|w| w[0].date >= w[1].date));
        assert!(recent.iter().all(|t| t.kind != ExpenseKind::Parts));
    }
}
