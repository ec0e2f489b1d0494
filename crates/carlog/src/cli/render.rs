//! # Rendering
//!
//! Plain `println!` output: notices colored by level with `colored`, tables and
//! summaries styled through the theme [`Palette`].
//!
//! ## Table Layout
//!
//! Every listing goes through [`print_table`]. Column widths are the widest cell of
//! each column, measured with `unicode-width` so accented station names and the like
//! line up, and capped at [`MAX_COL_WIDTH`]; longer cells are truncated with `…`.
//! Padding is applied before styling so ANSI codes never count towards width.

use carlogapp::commands::dashboard::Dashboard;
use carlogapp::commands::report::Report;
use carlogapp::commands::{CmdMessage, MessageLevel};
use carlogapp::metrics;
use carlogapp::model::{FuelRecord, MaintenanceRecord, PartRecord, RecordId, Reminder, Vehicle};
use chrono::NaiveDate;
use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::styles::Palette;

pub const MAX_COL_WIDTH: usize = 40;
const COL_GAP: &str = "  ";
const ACTIVE_MARKER: &str = "●";

pub fn print_message(message: &CmdMessage) {
    match message.level {
        MessageLevel::Info => println!("{}", message.content.dimmed()),
        MessageLevel::Success => println!("{}", message.content.green()),
        MessageLevel::Warning => println!("{}", message.content.yellow()),
        MessageLevel::Error => println!("{}", message.content.red()),
    }
}

pub fn money(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// A record that prints as one table row.
pub trait Row {
    fn headers() -> &'static [&'static str];
    fn cells(&self, currency: &str) -> Vec<String>;
}

impl Row for Vehicle {
    fn headers() -> &'static [&'static str] {
        &["ID", "Vehicle", "Year", "Fuel", "Mileage"]
    }

    fn cells(&self, _currency: &str) -> Vec<String> {
        vec![
            self.id.short().to_string(),
            self.display_name(),
            self.year.map(|y| y.to_string()).unwrap_or_else(|| "-".into()),
            or_dash(&self.fuel_type),
            self.current_mileage
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".into()),
        ]
    }
}

impl Row for FuelRecord {
    fn headers() -> &'static [&'static str] {
        &["ID", "Date", "Liters", "Cost", "Mileage", "Station"]
    }

    fn cells(&self, currency: &str) -> Vec<String> {
        vec![
            self.id.short().to_string(),
            self.date.to_string(),
            format!("{:.2}", self.liters),
            money(self.cost, currency),
            self.mileage.to_string(),
            or_dash(&self.station),
        ]
    }
}

impl Row for MaintenanceRecord {
    fn headers() -> &'static [&'static str] {
        &["ID", "Date", "Service", "Kind", "Cost", "Workshop"]
    }

    fn cells(&self, currency: &str) -> Vec<String> {
        vec![
            self.id.short().to_string(),
            self.date.to_string(),
            self.service.clone(),
            self.kind.to_string(),
            money(self.cost, currency),
            or_dash(&self.workshop),
        ]
    }
}

impl Row for PartRecord {
    fn headers() -> &'static [&'static str] {
        &["ID", "Date", "Part", "Qty", "Price", "Supplier"]
    }

    fn cells(&self, currency: &str) -> Vec<String> {
        vec![
            self.id.short().to_string(),
            self.date.to_string(),
            self.name.clone(),
            self.quantity.to_string(),
            money(self.price, currency),
            or_dash(&self.supplier),
        ]
    }
}

impl Row for Reminder {
    fn headers() -> &'static [&'static str] {
        &["ID", "Due", "Title", "Kind", "Status"]
    }

    fn cells(&self, _currency: &str) -> Vec<String> {
        vec![
            self.id.short().to_string(),
            self.date.to_string(),
            self.title.clone(),
            or_dash(&self.kind),
            if self.completed { "done" } else { "open" }.to_string(),
        ]
    }
}

pub fn print_records<R: Row>(records: &[&R], currency: &str, palette: &Palette, empty: &str) {
    if records.is_empty() {
        println!("{}", empty);
        return;
    }
    let rows: Vec<Vec<String>> = records.iter().map(|r| r.cells(currency)).collect();
    print_table(R::headers(), &rows, palette);
}

/// Fuel rows with each fill-up's distance per liter appended.
fn fuel_rows(records: &[&FuelRecord], currency: &str) -> Vec<Vec<String>> {
    records
        .iter()
        .zip(metrics::fill_consumption(records))
        .map(|(record, rate)| {
            let mut row = record.cells(currency);
            row.push(rate.map(|r| format!("{:.2}", r)).unwrap_or_else(|| "-".into()));
            row
        })
        .collect()
}

pub fn print_fuel(records: &[&FuelRecord], currency: &str, palette: &Palette) {
    if records.is_empty() {
        println!("No fill-ups recorded.");
        return;
    }
    let mut headers = FuelRecord::headers().to_vec();
    headers.push("km/L");
    print_table(&headers, &fuel_rows(records, currency), palette);
}

/// Vehicles with a marker column for the active one.
pub fn print_vehicles(vehicles: &[&Vehicle], active: Option<&RecordId>, palette: &Palette) {
    if vehicles.is_empty() {
        println!("No vehicles yet. Add one with `carlog vehicle add`.");
        return;
    }
    let mut headers = vec![""];
    headers.extend_from_slice(Vehicle::headers());

    let rows: Vec<Vec<String>> = vehicles
        .iter()
        .map(|v| {
            let marker = if Some(&v.id) == active { ACTIVE_MARKER } else { "" };
            let mut row = vec![marker.to_string()];
            row.extend(v.cells(""));
            row
        })
        .collect();
    print_table(&headers, &rows, palette);
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>], palette: &Palette) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width().min(MAX_COL_WIDTH));
            }
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| palette.heading.apply_to(pad_to_width(h, *w)).to_string())
        .collect();
    println!("{}", header_line.join(COL_GAP).trim_end());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let cell = pad_to_width(&truncate_to_width(cell, *w), *w);
                if headers.get(i) == Some(&"ID") {
                    palette.muted.apply_to(cell).to_string()
                } else {
                    palette.label.apply_to(cell).to_string()
                }
            })
            .collect();
        println!("{}", line.join(COL_GAP).trim_end());
    }
}

pub fn print_dashboard(dashboard: &Dashboard, today: NaiveDate, currency: &str, palette: &Palette) {
    let Some(vehicle) = &dashboard.vehicle else {
        println!("{}", "No active vehicle. Add one with `carlog vehicle add`.".yellow());
        return;
    };
    println!("{}", palette.heading.apply_to(vehicle.display_name()));

    let totals = &dashboard.totals;
    println!();
    println!("{}", palette.accent.apply_to("Spending"));
    print_pairs(
        &[
            (
                "Fuel",
                format!("{}  ({})", money(totals.fuel_cost, currency), totals.fuel_count),
            ),
            (
                "Maintenance",
                format!(
                    "{}  ({})",
                    money(totals.maintenance_cost, currency),
                    totals.maintenance_count
                ),
            ),
            (
                "Parts",
                format!("{}  ({})", money(totals.parts_cost, currency), totals.parts_count),
            ),
            ("Total", money(totals.total_cost(), currency)),
            ("Fuel used", format!("{:.2} L", dashboard.total_liters)),
            (
                "Consumption",
                dashboard
                    .consumption_rate
                    .map(|rate| format!("{:.2} km/L", rate))
                    .unwrap_or_else(|| "n/a".into()),
            ),
            (
                "Cost per km",
                dashboard
                    .cost_per_distance
                    .map(|cost| format!("{}/km", money(cost, currency)))
                    .unwrap_or_else(|| "n/a".into()),
            ),
        ],
        palette,
    );

    if !dashboard.monthly.is_empty() {
        println!();
        println!("{}", palette.accent.apply_to("By month"));
        let rows: Vec<Vec<String>> = dashboard
            .monthly
            .iter()
            .map(|m| {
                vec![
                    m.month.format("%Y-%m").to_string(),
                    money(m.fuel, currency),
                    money(m.maintenance, currency),
                    money(m.parts, currency),
                    money(m.total(), currency),
                ]
            })
            .collect();
        print_table(
            &["Month", "Fuel", "Maintenance", "Parts", "Total"],
            &rows,
            palette,
        );
    }

    if !dashboard.recent.is_empty() {
        println!();
        println!("{}", palette.accent.apply_to("Recent"));
        let rows: Vec<Vec<String>> = dashboard
            .recent
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.title.clone(),
                    or_dash(&t.detail),
                    money(t.amount, currency),
                ]
            })
            .collect();
        print_table(&["Date", "Type", "Title", "Detail", "Amount"], &rows, palette);
    }

    println!();
    println!("{}", palette.accent.apply_to("Reminders"));
    let urgent = format!("{} urgent", dashboard.urgent);
    let overdue = format!("{} overdue", dashboard.overdue);
    println!(
        "{} upcoming, {}, {}",
        dashboard.upcoming.len(),
        if dashboard.urgent > 0 {
            palette.urgent.apply_to(urgent).to_string()
        } else {
            urgent
        },
        if dashboard.overdue > 0 {
            palette.overdue.apply_to(overdue).to_string()
        } else {
            overdue
        },
    );
    for reminder in &dashboard.upcoming {
        println!(
            "  {}  {}  {}",
            reminder.date,
            reminder.title,
            palette.muted.apply_to(due_in(reminder.date, today))
        );
    }
}

pub fn print_report(report: &Report, currency: &str, palette: &Palette) {
    println!(
        "{}  {}",
        palette.heading.apply_to(report.vehicle.display_name()),
        palette
            .muted
            .apply_to(format!("{} to {}", report.from, report.to))
    );

    let fuel: Vec<&FuelRecord> = report.fuel.iter().collect();
    let maintenance: Vec<&MaintenanceRecord> = report.maintenance.iter().collect();
    let parts: Vec<&PartRecord> = report.parts.iter().collect();

    println!();
    println!("{}", palette.accent.apply_to("Fuel"));
    print_records(&fuel, currency, palette, "No fill-ups in range.");
    println!();
    println!("{}", palette.accent.apply_to("Maintenance"));
    print_records(&maintenance, currency, palette, "No maintenance in range.");
    println!();
    println!("{}", palette.accent.apply_to("Parts"));
    print_records(&parts, currency, palette, "No parts in range.");

    let totals = &report.totals;
    println!();
    print_pairs(
        &[
            ("Fuel", money(totals.fuel_cost, currency)),
            ("Maintenance", money(totals.maintenance_cost, currency)),
            ("Parts", money(totals.parts_cost, currency)),
            ("Total", money(totals.total_cost(), currency)),
            ("Fuel used", format!("{:.2} L", report.total_liters)),
        ],
        palette,
    );
}

fn print_pairs(pairs: &[(&str, String)], palette: &Palette) {
    let width = pairs.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
    for (label, value) in pairs {
        println!(
            "  {}  {}",
            palette.label.apply_to(pad_to_width(label, width)),
            palette.amount.apply_to(value)
        );
    }
}

fn due_in(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n if n < 0 => format!("{} days ago", -n),
        n => format!("in {} days", n),
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
