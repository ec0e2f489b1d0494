use carlogapp::model::{
    FuelDraft, FuelPatch, MaintenanceDraft, MaintenanceKind, MaintenancePatch, PartDraft,
    PartPatch, ReminderDraft, ReminderPatch, VehicleDraft, VehiclePatch,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "carlog",
    bin_name = "carlog",
    version,
    disable_help_subcommand = true
)]
#[command(
    about = "Track fuel, maintenance, parts and reminders for your vehicles",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true, help_heading = "Options")]
    pub yes: bool,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add, list and select vehicles
    #[command(subcommand, alias = "v", display_order = 1)]
    Vehicle(VehicleCommands),

    /// Fuel fill-ups of the active vehicle
    #[command(subcommand, alias = "f", display_order = 2)]
    Fuel(FuelCommands),

    /// Maintenance visits of the active vehicle
    #[command(subcommand, alias = "m", display_order = 3)]
    Maintenance(MaintenanceCommands),

    /// Parts bought for the active vehicle
    #[command(subcommand, alias = "p", display_order = 4)]
    Part(PartCommands),

    /// Reminders for the active vehicle
    #[command(subcommand, alias = "r", display_order = 5)]
    Reminder(ReminderCommands),

    /// Summary of the active vehicle (default)
    #[command(alias = "d", display_order = 10)]
    Dashboard,

    /// Spending of the active vehicle over a date range
    #[command(display_order = 11)]
    Report {
        /// First day included (default: first day of this month)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day included (default: today)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Export every collection as one JSON document
    #[command(display_order = 20)]
    Export {
        /// Output file, or - for stdout (default: vehicle-expenses-backup-<date>.json)
        file: Option<PathBuf>,
    },

    /// Replace collections with those found in an exported document
    #[command(display_order = 21)]
    Import { file: PathBuf },

    /// Take the rolling backup now
    #[command(display_order = 22)]
    Backup,

    /// Replace current data with the rolling backup
    #[command(display_order = 23)]
    Restore,

    /// Show or change the color theme
    #[command(display_order = 30)]
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

/// Liters: a finite number above zero.
fn positive_amount(input: &str) -> Result<f64, String> {
    let value: f64 = input.parse().map_err(|_| format!("'{}' is not a number", input))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("expected a number above zero, got {}", input));
    }
    Ok(value)
}

/// Money: a finite number, zero or more.
fn non_negative_amount(input: &str) -> Result<f64, String> {
    let value: f64 = input.parse().map_err(|_| format!("'{}' is not a number", input))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("expected zero or a positive number, got {}", input));
    }
    Ok(value)
}

// --- Vehicles ---

#[derive(Subcommand, Debug)]
pub enum VehicleCommands {
    /// Add a vehicle (the first one becomes active)
    #[command(alias = "a", display_order = 1)]
    Add(NewVehicle),

    /// List vehicles, marking the active one
    #[command(alias = "ls", display_order = 2)]
    List,

    /// Change fields of a vehicle
    #[command(alias = "e", display_order = 3)]
    Edit {
        id: String,
        #[command(flatten)]
        changes: VehicleChanges,
    },

    /// Delete a vehicle and every record it owns
    #[command(alias = "rm", display_order = 4)]
    Remove { id: String },

    /// Make a vehicle the active one
    #[command(display_order = 5)]
    Use { id: String },
}

#[derive(Args, Debug)]
pub struct NewVehicle {
    #[arg(long)]
    pub make: String,
    #[arg(long)]
    pub model: String,
    #[arg(long)]
    pub year: Option<u32>,
    #[arg(long, default_value = "")]
    pub plate: String,
    #[arg(long, default_value = "")]
    pub fuel_type: String,
    #[arg(long, default_value = "")]
    pub color: String,
    /// Current odometer reading
    #[arg(long)]
    pub mileage: Option<u64>,
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl From<NewVehicle> for VehicleDraft {
    fn from(args: NewVehicle) -> Self {
        VehicleDraft {
            make: args.make,
            model: args.model,
            year: args.year,
            plate_number: args.plate,
            fuel_type: args.fuel_type,
            color: args.color,
            current_mileage: args.mileage,
            notes: args.notes,
        }
    }
}

#[derive(Args, Debug)]
pub struct VehicleChanges {
    #[arg(long)]
    pub make: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub year: Option<u32>,
    #[arg(long)]
    pub plate: Option<String>,
    #[arg(long)]
    pub fuel_type: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub mileage: Option<u64>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl From<VehicleChanges> for VehiclePatch {
    fn from(args: VehicleChanges) -> Self {
        VehiclePatch {
            make: args.make,
            model: args.model,
            year: args.year,
            plate_number: args.plate,
            fuel_type: args.fuel_type,
            color: args.color,
            current_mileage: args.mileage,
            notes: args.notes,
        }
    }
}

// --- Fuel ---

#[derive(Subcommand, Debug)]
pub enum FuelCommands {
    /// Record a fill-up
    #[command(alias = "a", display_order = 1)]
    Add(NewFuel),

    /// List fill-ups, newest first
    #[command(alias = "ls", display_order = 2)]
    List,

    #[command(alias = "e", display_order = 3)]
    Edit {
        id: String,
        #[command(flatten)]
        changes: FuelChanges,
    },

    #[command(alias = "rm", display_order = 4)]
    Remove { id: String },
}

#[derive(Args, Debug)]
pub struct NewFuel {
    /// Fill-up date (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, value_parser = positive_amount)]
    pub liters: f64,
    #[arg(long, value_parser = non_negative_amount)]
    pub cost: f64,
    /// Odometer reading at the fill-up
    #[arg(long)]
    pub mileage: u64,
    #[arg(long, default_value = "")]
    pub station: String,
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl NewFuel {
    pub fn into_draft(self, today: NaiveDate) -> FuelDraft {
        FuelDraft {
            date: self.date.unwrap_or(today),
            liters: self.liters,
            cost: self.cost,
            mileage: self.mileage,
            station: self.station,
            notes: self.notes,
        }
    }
}

#[derive(Args, Debug)]
pub struct FuelChanges {
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, value_parser = positive_amount)]
    pub liters: Option<f64>,
    #[arg(long, value_parser = non_negative_amount)]
    pub cost: Option<f64>,
    #[arg(long)]
    pub mileage: Option<u64>,
    #[arg(long)]
    pub station: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl From<FuelChanges> for FuelPatch {
    fn from(args: FuelChanges) -> Self {
        FuelPatch {
            date: args.date,
            liters: args.liters,
            cost: args.cost,
            mileage: args.mileage,
            station: args.station,
            notes: args.notes,
        }
    }
}

// --- Maintenance ---

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Routine,
    Emergency,
}

impl From<KindArg> for MaintenanceKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Routine => MaintenanceKind::Routine,
            KindArg::Emergency => MaintenanceKind::Emergency,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum MaintenanceCommands {
    /// Record a maintenance visit
    #[command(alias = "a", display_order = 1)]
    Add(NewMaintenance),

    /// List maintenance, newest first
    #[command(alias = "ls", display_order = 2)]
    List,

    #[command(alias = "e", display_order = 3)]
    Edit {
        id: String,
        #[command(flatten)]
        changes: MaintenanceChanges,
    },

    #[command(alias = "rm", display_order = 4)]
    Remove { id: String },
}

#[derive(Args, Debug)]
pub struct NewMaintenance {
    /// What was done, e.g. "Oil change"
    #[arg(long)]
    pub service: String,
    #[arg(long, value_parser = non_negative_amount)]
    pub cost: f64,
    #[arg(long, value_enum, default_value_t = KindArg::Routine)]
    pub kind: KindArg,
    /// Visit date (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub mileage: Option<u64>,
    #[arg(long, default_value = "")]
    pub workshop: String,
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl NewMaintenance {
    pub fn into_draft(self, today: NaiveDate) -> MaintenanceDraft {
        MaintenanceDraft {
            kind: self.kind.into(),
            service: self.service,
            date: self.date.unwrap_or(today),
            cost: self.cost,
            mileage: self.mileage,
            workshop: self.workshop,
            notes: self.notes,
        }
    }
}

#[derive(Args, Debug)]
pub struct MaintenanceChanges {
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,
    #[arg(long)]
    pub service: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, value_parser = non_negative_amount)]
    pub cost: Option<f64>,
    #[arg(long)]
    pub mileage: Option<u64>,
    #[arg(long)]
    pub workshop: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl From<MaintenanceChanges> for MaintenancePatch {
    fn from(args: MaintenanceChanges) -> Self {
        MaintenancePatch {
            kind: args.kind.map(Into::into),
            service: args.service,
            date: args.date,
            cost: args.cost,
            mileage: args.mileage,
            workshop: args.workshop,
            notes: args.notes,
        }
    }
}

// --- Parts ---

#[derive(Subcommand, Debug)]
pub enum PartCommands {
    /// Record a part purchase
    #[command(alias = "a", display_order = 1)]
    Add(NewPart),

    /// List parts, newest first
    #[command(alias = "ls", display_order = 2)]
    List,

    #[command(alias = "e", display_order = 3)]
    Edit {
        id: String,
        #[command(flatten)]
        changes: PartChanges,
    },

    #[command(alias = "rm", display_order = 4)]
    Remove { id: String },
}

#[derive(Args, Debug)]
pub struct NewPart {
    #[arg(long)]
    pub name: String,
    #[arg(long, value_parser = non_negative_amount)]
    pub price: f64,
    #[arg(long, default_value = "")]
    pub category: String,
    /// Purchase date (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    pub supplier: String,
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub quantity: u32,
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl NewPart {
    pub fn into_draft(self, today: NaiveDate) -> PartDraft {
        PartDraft {
            name: self.name,
            category: self.category,
            date: self.date.unwrap_or(today),
            price: self.price,
            supplier: self.supplier,
            quantity: self.quantity,
            notes: self.notes,
        }
    }
}

#[derive(Args, Debug)]
pub struct PartChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long, value_parser = non_negative_amount)]
    pub price: Option<f64>,
    #[arg(long)]
    pub supplier: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub quantity: Option<u32>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl From<PartChanges> for PartPatch {
    fn from(args: PartChanges) -> Self {
        PartPatch {
            name: args.name,
            category: args.category,
            date: args.date,
            price: args.price,
            supplier: args.supplier,
            quantity: args.quantity,
            notes: args.notes,
        }
    }
}

// --- Reminders ---

#[derive(Subcommand, Debug)]
pub enum ReminderCommands {
    /// Add a reminder
    #[command(alias = "a", display_order = 1)]
    Add(NewReminder),

    /// List reminders by due date
    #[command(alias = "ls", display_order = 2)]
    List,

    #[command(alias = "e", display_order = 3)]
    Edit {
        id: String,
        #[command(flatten)]
        changes: ReminderChanges,
    },

    #[command(alias = "rm", display_order = 4)]
    Remove { id: String },

    /// Mark a reminder completed
    #[command(display_order = 5)]
    Done { id: String },

    /// Open reminders due within the upcoming window
    #[command(alias = "up", display_order = 6)]
    Upcoming,
}

#[derive(Args, Debug)]
pub struct NewReminder {
    #[arg(long)]
    pub title: String,
    /// Due date
    #[arg(long)]
    pub date: NaiveDate,
    #[arg(long, default_value = "")]
    pub kind: String,
    #[arg(long, default_value = "")]
    pub description: String,
}

impl From<NewReminder> for ReminderDraft {
    fn from(args: NewReminder) -> Self {
        ReminderDraft {
            title: args.title,
            kind: args.kind,
            date: args.date,
            description: args.description,
        }
    }
}

#[derive(Args, Debug)]
pub struct ReminderChanges {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub kind: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

impl From<ReminderChanges> for ReminderPatch {
    fn from(args: ReminderChanges) -> Self {
        ReminderPatch {
            title: args.title,
            kind: args.kind,
            date: args.date,
            description: args.description,
            completed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn naked_invocation_has_no_command() {
        let cli = parse(&["carlog"]);
        assert!(cli.command.is_none());
        assert!(!cli.yes);
    }

    #[test]
    fn fuel_add_parses_typed_fields() {
        let cli = parse(&[
            "carlog", "fuel", "add", "--liters", "40.5", "--cost", "90", "--mileage", "12000",
            "--date", "2024-03-01",
        ]);
        let Some(Commands::Fuel(FuelCommands::Add(args))) = cli.command else {
            panic!("expected fuel add");
        };
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let draft = args.into_draft(today);
        assert_eq!(draft.liters, 40.5);
        assert_eq!(draft.mileage, 12000);
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let cli = parse(&["carlog", "p", "a", "--name", "Filter", "--price", "25"]);
        let Some(Commands::Part(PartCommands::Add(args))) = cli.command else {
            panic!("expected part add");
        };
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let draft = args.into_draft(today);
        assert_eq!(draft.date, today);
        assert_eq!(draft.quantity, 1);
    }

    #[test]
    fn invalid_date_is_rejected() {
        let result = Cli::try_parse_from(["carlog", "reminder", "add", "--title", "x", "--date", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn vehicle_edit_only_sets_given_fields() {
        let cli = parse(&["carlog", "vehicle", "edit", "ab12", "--mileage", "5000", "-y"]);
        assert!(cli.yes);
        let Some(Commands::Vehicle(VehicleCommands::Edit { id, changes })) = cli.command else {
            panic!("expected vehicle edit");
        };
        assert_eq!(id, "ab12");
        let patch = VehiclePatch::from(changes);
        assert_eq!(patch.current_mileage, Some(5000));
        assert_eq!(patch.make, None);
    }

    #[test]
    fn theme_takes_an_optional_action() {
        let cli = parse(&["carlog", "theme", "toggle"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Theme {
                action: Some(ThemeAction::Toggle)
            })
        ));
        let cli = parse(&["carlog", "theme"]);
        assert!(matches!(cli.command, Some(Commands::Theme { action: None })));
    }

    #[test]
    fn amounts_are_validated_at_parse_time() {
        for args in [
            &["carlog", "fuel", "add", "--liters", "NaN", "--cost", "5", "--mileage", "1"][..],
            &["carlog", "fuel", "add", "--liters", "0", "--cost", "5", "--mileage", "1"],
            &["carlog", "fuel", "add", "--liters", "10", "--cost=-50", "--mileage", "1"],
            &["carlog", "fuel", "edit", "ab12", "--liters", "inf"],
            &["carlog", "maintenance", "add", "--service", "Oil", "--cost=-1"],
            &["carlog", "maintenance", "edit", "ab12", "--cost", "NaN"],
            &["carlog", "part", "add", "--name", "Filter", "--price=-3"],
            &["carlog", "part", "add", "--name", "Filter", "--price", "3", "--quantity", "0"],
            &["carlog", "part", "edit", "ab12", "--quantity", "0"],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "accepted {:?}", args);
        }
    }

    #[test]
    fn zero_cost_is_allowed() {
        let cli = parse(&["carlog", "maintenance", "add", "--service", "Check", "--cost", "0"]);
        let Some(Commands::Maintenance(MaintenanceCommands::Add(args))) = cli.command else {
            panic!("expected maintenance add");
        };
        assert_eq!(args.cost, 0.0);
    }
}
