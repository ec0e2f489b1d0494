//! Summary of the active vehicle: spending totals, the last months of spending, recent
//! transactions, fuel economy and reminders that need attention.
//!
//! Without a vehicle the dashboard is all zeros and empty lists.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::commands::{reminders, Repositories};
use crate::metrics::{self, ExpenseTotals, MonthlyTotal, Transaction};
use crate::model::{Reminder, Vehicle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub months: u32,
    pub recent: usize,
    pub upcoming_days: u32,
    pub urgent_days: u32,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            months: 6,
            recent: 5,
            upcoming_days: 30,
            urgent_days: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub vehicle: Option<Vehicle>,
    pub totals: ExpenseTotals,
    pub total_liters: f64,
    pub consumption_rate: Option<f64>,
    pub cost_per_distance: Option<f64>,
    pub monthly: Vec<MonthlyTotal>,
    pub recent: Vec<Transaction>,
    /// Open reminders inside the upcoming window, soonest first.
    pub upcoming: Vec<Reminder>,
    /// How many of `upcoming` fall inside the urgent window.
    pub urgent: usize,
    pub overdue: usize,
}

pub fn run(
    repos: &Repositories,
    vehicle: Option<&Vehicle>,
    today: NaiveDate,
    options: DashboardOptions,
) -> Dashboard {
    let Some(vehicle) = vehicle else {
        return Dashboard::default();
    };

    let owned = repos.owned_by(&vehicle.id);
    let upcoming = reminders::upcoming(
        &repos.reminders,
        Some(&vehicle.id),
        today,
        options.upcoming_days,
    );
    let urgent_until = today
        .checked_add_days(Days::new(u64::from(options.urgent_days)))
        .unwrap_or(NaiveDate::MAX);

    Dashboard {
        vehicle: Some(vehicle.clone()),
        totals: ExpenseTotals::from_records(&owned.fuel, &owned.maintenance, &owned.parts),
        total_liters: metrics::total_liters(owned.fuel.iter().copied()),
        consumption_rate: metrics::consumption_rate(&owned.fuel),
        cost_per_distance: metrics::cost_per_distance(&owned.fuel),
        monthly: metrics::monthly_breakdown(
            &owned.fuel,
            &owned.maintenance,
            &owned.parts,
            today,
            options.months,
        ),
        recent: metrics::recent_transactions(
            &owned.fuel,
            &owned.maintenance,
            &owned.parts,
            options.recent,
        ),
        urgent: upcoming.iter().filter(|r| r.date <= urgent_until).count(),
        overdue: reminders::overdue(&owned.reminders, today).len(),
        upcoming: upcoming.into_iter().cloned().collect(),
    }
}
