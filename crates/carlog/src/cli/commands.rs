//! # CLI Layer
//!
//! This module is **one possible UI client** for carlog. It is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Reads and writes files the user names (export, import)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Logging, configuration, backend and API with terminal ports
//! 3. **Dispatch**: Route commands to handlers
//! 4. **Output Formatting**: Tables and summaries from `render`
//! 5. **Error Handling**: Errors bubble up as `anyhow` errors to `main`

use super::ports::{TerminalConfirm, TerminalNotifier};
use super::render::{
    print_dashboard, print_fuel, print_message, print_records, print_report, print_vehicles, Row,
};
use super::setup::{
    Cli, Commands, FuelCommands, MaintenanceCommands, PartCommands, ReminderCommands,
    ThemeAction, VehicleCommands,
};
use super::styles::{detected_theme, Palette};
use anyhow::{bail, Context, Result};
use carlogapp::api::CarlogApi;
use carlogapp::commands::theme::{self, Theme};
use carlogapp::commands::{export, CmdMessage, HasRepository, Repositories};
use carlogapp::config::CarlogConfig;
use carlogapp::error::CarlogError;
use carlogapp::model::{FuelRecord, MaintenanceRecord, PartRecord, RecordId, Reminder, Vehicle};
use carlogapp::repository::Entity;
use carlogapp::store::fs_backend::FsBackend;
use chrono::{Datelike, Local, NaiveDate, Utc};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{debug, warn, Level};

struct AppContext {
    api: CarlogApi<FsBackend>,
    palette: Palette,
    today: NaiveDate,
}

impl AppContext {
    fn currency(&self) -> &str {
        &self.api.config().currency
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut ctx = init_context(&cli)?;

    if let Err(e) = ctx.api.auto_backup(Utc::now()) {
        warn!(error = %e, "automatic backup failed");
    }

    match cli.command {
        Some(Commands::Vehicle(cmd)) => match cmd {
            VehicleCommands::Add(args) => handle_add::<Vehicle>(&mut ctx, args.into()),
            VehicleCommands::List => handle_vehicle_list(&ctx),
            VehicleCommands::Edit { id, changes } => {
                handle_edit::<Vehicle>(&mut ctx, &id, changes.into())
            }
            VehicleCommands::Remove { id } => handle_remove::<Vehicle>(&mut ctx, &id),
            VehicleCommands::Use { id } => handle_use(&mut ctx, &id),
        },
        Some(Commands::Fuel(cmd)) => match cmd {
            FuelCommands::Add(args) => {
                let draft = args.into_draft(ctx.today);
                handle_add::<FuelRecord>(&mut ctx, draft)
            }
            FuelCommands::List => handle_fuel_list(&ctx),
            FuelCommands::Edit { id, changes } => {
                handle_edit::<FuelRecord>(&mut ctx, &id, changes.into())
            }
            FuelCommands::Remove { id } => handle_remove::<FuelRecord>(&mut ctx, &id),
        },
        Some(Commands::Maintenance(cmd)) => match cmd {
            MaintenanceCommands::Add(args) => {
                let draft = args.into_draft(ctx.today);
                handle_add::<MaintenanceRecord>(&mut ctx, draft)
            }
            MaintenanceCommands::List => {
                handle_list::<MaintenanceRecord>(&ctx, "No maintenance recorded.")
            }
            MaintenanceCommands::Edit { id, changes } => {
                handle_edit::<MaintenanceRecord>(&mut ctx, &id, changes.into())
            }
            MaintenanceCommands::Remove { id } => {
                handle_remove::<MaintenanceRecord>(&mut ctx, &id)
            }
        },
        Some(Commands::Part(cmd)) => match cmd {
            PartCommands::Add(args) => {
                let draft = args.into_draft(ctx.today);
                handle_add::<PartRecord>(&mut ctx, draft)
            }
            PartCommands::List => handle_list::<PartRecord>(&ctx, "No parts recorded."),
            PartCommands::Edit { id, changes } => {
                handle_edit::<PartRecord>(&mut ctx, &id, changes.into())
            }
            PartCommands::Remove { id } => handle_remove::<PartRecord>(&mut ctx, &id),
        },
        Some(Commands::Reminder(cmd)) => match cmd {
            ReminderCommands::Add(args) => handle_add::<Reminder>(&mut ctx, args.into()),
            ReminderCommands::List => handle_list::<Reminder>(&ctx, "No reminders."),
            ReminderCommands::Edit { id, changes } => {
                handle_edit::<Reminder>(&mut ctx, &id, changes.into())
            }
            ReminderCommands::Remove { id } => handle_remove::<Reminder>(&mut ctx, &id),
            ReminderCommands::Done { id } => handle_done(&mut ctx, &id),
            ReminderCommands::Upcoming => handle_upcoming(&ctx),
        },
        Some(Commands::Dashboard) | None => handle_dashboard(&ctx),
        Some(Commands::Report { from, to }) => handle_report(&ctx, from, to),
        Some(Commands::Export { file }) => handle_export(&ctx, file),
        Some(Commands::Import { file }) => handle_import(&mut ctx, &file),
        Some(Commands::Backup) => handle_backup(&ctx),
        Some(Commands::Restore) => handle_restore(&mut ctx),
        Some(Commands::Theme { action }) => handle_theme(&ctx, action),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config = CarlogConfig::load(cli.config.as_deref())?;
    let data_dir = config.data_dir()?;
    debug!(path = %data_dir.display(), "data directory");

    let api = CarlogApi::new(
        FsBackend::new(data_dir),
        config,
        Box::new(TerminalConfirm::new(cli.yes)),
        Box::new(TerminalNotifier),
    );
    let theme = theme::stored(api.backend()).unwrap_or_else(detected_theme);

    Ok(AppContext {
        api,
        palette: Palette::for_theme(theme),
        today: Local::now().date_naive(),
    })
}

/// Full id, or a unique prefix of one, of a record in `E`'s collection.
fn resolve_id<E: Entity>(ctx: &AppContext, input: &str) -> Result<RecordId>
where
    Repositories: HasRepository<E>,
{
    let records = ctx.api.all::<E>().records();
    if let Some(exact) = records.iter().find(|r| r.id().as_str() == input) {
        return Ok(exact.id().clone());
    }

    let matches: Vec<&E> = records
        .iter()
        .filter(|r| r.id().as_str().starts_with(input))
        .collect();
    match matches.as_slice() {
        [one] => Ok(one.id().clone()),
        [] => Err(CarlogError::not_found(E::COLLECTION, &RecordId::from(input)).into()),
        _ => bail!(
            "'{}' matches {} records, use more characters",
            input,
            matches.len()
        ),
    }
}

fn require_active_vehicle(ctx: &AppContext) -> bool {
    if ctx.api.active_vehicle().is_some() {
        return true;
    }
    print_message(&CmdMessage::warning(
        "No active vehicle. Add one with `carlog vehicle add`.",
    ));
    false
}

fn handle_add<E: Entity>(ctx: &mut AppContext, draft: E::Draft) -> Result<()>
where
    Repositories: HasRepository<E>,
{
    let record = ctx.api.add::<E>(draft)?;
    println!("{}", ctx.palette.muted.apply_to(record.id().short()));
    Ok(())
}

fn handle_list<E: Entity + Row>(ctx: &AppContext, empty: &str) -> Result<()>
where
    Repositories: HasRepository<E>,
{
    if !require_active_vehicle(ctx) {
        return Ok(());
    }
    let records = ctx.api.list::<E>();
    print_records(&records, ctx.currency(), &ctx.palette, empty);
    Ok(())
}

fn handle_fuel_list(ctx: &AppContext) -> Result<()> {
    if !require_active_vehicle(ctx) {
        return Ok(());
    }
    let records = ctx.api.list::<FuelRecord>();
    print_fuel(&records, ctx.currency(), &ctx.palette);
    Ok(())
}

fn handle_vehicle_list(ctx: &AppContext) -> Result<()> {
    let vehicles = ctx.api.list::<Vehicle>();
    let active = ctx.api.active_vehicle().map(|v| &v.id);
    print_vehicles(&vehicles, active, &ctx.palette);
    Ok(())
}

fn handle_edit<E: Entity>(ctx: &mut AppContext, id: &str, patch: E::Patch) -> Result<()>
where
    Repositories: HasRepository<E>,
{
    let id = resolve_id::<E>(ctx, id)?;
    ctx.api.update::<E>(&id, patch)?;
    Ok(())
}

fn handle_remove<E: Entity>(ctx: &mut AppContext, id: &str) -> Result<()>
where
    Repositories: HasRepository<E>,
{
    let id = resolve_id::<E>(ctx, id)?;
    let outcome = ctx.api.delete::<E>(&id)?;
    debug!(id = %id, removed = outcome.is_removed(), "delete finished");
    Ok(())
}

fn handle_use(ctx: &mut AppContext, id: &str) -> Result<()> {
    let id = resolve_id::<Vehicle>(ctx, id)?;
    ctx.api.set_active(&id)?;
    Ok(())
}

fn handle_done(ctx: &mut AppContext, id: &str) -> Result<()> {
    let id = resolve_id::<Reminder>(ctx, id)?;
    ctx.api.complete_reminder(&id)?;
    Ok(())
}

fn handle_upcoming(ctx: &AppContext) -> Result<()> {
    let due = ctx.api.upcoming_reminders(ctx.today);
    let empty = format!(
        "Nothing due in the next {} days.",
        ctx.api.config().upcoming_days
    );
    print_records(&due, ctx.currency(), &ctx.palette, &empty);
    Ok(())
}

fn handle_dashboard(ctx: &AppContext) -> Result<()> {
    let dashboard = ctx.api.dashboard(ctx.today);
    print_dashboard(&dashboard, ctx.today, ctx.currency(), &ctx.palette);
    Ok(())
}

fn handle_report(ctx: &AppContext, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let to = to.unwrap_or(ctx.today);
    let from = from.unwrap_or_else(|| ctx.today.with_day(1).unwrap_or(ctx.today));
    if from > to {
        bail!("--from {} is after --to {}", from, to);
    }
    let report = ctx.api.report(from, to)?;
    print_report(&report, ctx.currency(), &ctx.palette);
    Ok(())
}

fn handle_export(ctx: &AppContext, file: Option<PathBuf>) -> Result<()> {
    let now = Utc::now();
    let document = ctx.api.export(now);
    let json = export::to_json(&document)?;

    if file.as_deref() == Some(Path::new("-")) {
        println!("{}", json);
        return Ok(());
    }

    let path = file.unwrap_or_else(|| PathBuf::from(export::file_name(now)));
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    print_message(&CmdMessage::success(format!(
        "Exported {} records to {}",
        document.data.record_count(),
        path.display()
    )));
    Ok(())
}

fn handle_import(ctx: &mut AppContext, file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    ctx.api.import(&text)?;
    Ok(())
}

fn handle_backup(ctx: &AppContext) -> Result<()> {
    ctx.api.backup_now(Utc::now())?;
    Ok(())
}

fn handle_restore(ctx: &mut AppContext) -> Result<()> {
    ctx.api.restore_backup()?;
    Ok(())
}

fn handle_theme(ctx: &AppContext, action: Option<ThemeAction>) -> Result<()> {
    let theme = match action {
        None => ctx.api.theme(Theme::default()),
        Some(ThemeAction::Light) => {
            ctx.api.set_theme(Theme::Light)?;
            Theme::Light
        }
        Some(ThemeAction::Dark) => {
            ctx.api.set_theme(Theme::Dark)?;
            Theme::Dark
        }
        Some(ThemeAction::Toggle) => ctx.api.toggle_theme(Theme::default())?,
    };
    println!("Theme: {}", theme);
    Ok(())
}
