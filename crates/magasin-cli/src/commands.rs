//! Subcommand execution
//!
//! Each subcommand opens the warehouse from the configured data file, runs
//! one operation and writes a human-readable report to `out`. Confirmation
//! prompts go through `prompt` unless `--yes` is given.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::ArgMatches;
use magasin_core::{
    JsonFileStore, MagasinConfig, MagasinError, Material, MaterialDraft, Placement,
    PlacementWorkflow, Rack, RackDraft, ReceptionBatch, Snapshot, UndoOutcome, ValidationError,
    Warehouse,
};
use magasin_export::{
    default_workbook_name, export_csv, write_backup, write_workbook, Backup, ChangeSignature,
    Collection, SyncRequest,
};
use std::io::Write;
use std::path::{Path, PathBuf};

fn text<'a>(args: &'a ArgMatches, id: &str) -> &'a str {
    args.get_one::<String>(id).map_or("", String::as_str)
}

fn matricule<'a>(config: &'a MagasinConfig, args: &'a ArgMatches) -> &'a str {
    config.matricule_or_default(args.get_one::<String>("matricule").map(String::as_str))
}

fn path_arg<'a>(args: &'a ArgMatches, id: &str) -> &'a Path {
    args.get_one::<PathBuf>(id)
        .map_or(Path::new("."), PathBuf::as_path)
}

/// Resolve configuration: file first, then `--data` / `--operator`
///
/// # Errors
/// Unreadable or invalid configuration file.
pub fn load_config(matches: &ArgMatches) -> Result<MagasinConfig> {
    let path = path_arg(matches, "config");
    let mut config = MagasinConfig::load(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    if let Some(data) = matches.get_one::<PathBuf>("data") {
        config = config.with_data_file(data);
    }
    if let Some(operator) = matches.get_one::<String>("operator") {
        config = config.with_operator(operator);
    }
    Ok(config)
}

/// Open the warehouse backed by the configured JSON file
///
/// # Errors
/// The data file exists but cannot be read or parsed.
pub fn open_warehouse(config: MagasinConfig) -> Result<Warehouse> {
    let store =
        JsonFileStore::new(config.data_file.clone()).with_quota(config.storage_quota_bytes);
    let data_file = config.data_file.clone();
    Warehouse::open(store, config)
        .with_context(|| format!("failed to open warehouse data {}", data_file.display()))
}

fn material_line(m: &Material) -> String {
    format!(
        "{}  P/N {}  S/N {}  {}  barcode {}",
        m.id(),
        m.part_number(),
        m.serial_number(),
        m.material_type(),
        m.barcode()
    )
}

fn rack_line(r: &Rack) -> String {
    if r.capacity_note().is_empty() {
        format!("{}  {}  barcode {}", r.id(), r.code(), r.barcode())
    } else {
        format!(
            "{}  {}  barcode {}  ({})",
            r.id(),
            r.code(),
            r.barcode(),
            r.capacity_note()
        )
    }
}

fn placement_line(p: &Placement) -> String {
    format!(
        "{}  {} -> {}  by {} at {}",
        p.id(),
        p.material_barcode(),
        p.rack_barcode(),
        p.magasinier_matricule(),
        p.timestamp().format("%Y-%m-%d %H:%M:%S")
    )
}

/// Run the selected subcommand
///
/// # Errors
/// Any failure of the underlying operation; storage failures surface as
/// `magasin_core::MagasinError::Storage` in the error chain.
pub fn run(
    matches: &ArgMatches,
    out: &mut dyn Write,
    prompt: &mut dyn FnMut(&str) -> bool,
) -> Result<()> {
    let config = load_config(matches)?;
    let mut warehouse = open_warehouse(config)?;

    match matches.subcommand() {
        Some(("receive", args)) => {
            let mut draft = MaterialDraft::new(text(args, "part-number"), text(args, "serial-number"))
                .with_description(text(args, "description"))
                .with_supplier(text(args, "supplier"))
                .with_reception_matricule(matricule(warehouse.config(), args));
            if let Some(kind) = args.get_one::<String>("type") {
                draft = draft.with_type(kind);
            }
            if let Some(date) = args.get_one::<NaiveDate>("date") {
                draft = draft.with_date_received(*date);
            }
            let material = warehouse.register_material(&draft)?;
            writeln!(out, "Received {}", material_line(&material))?;
        }
        Some(("bulk-receive", args)) => {
            let path = path_arg(args, "file");
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let batch = ReceptionBatch::parse(&content);
            let report = warehouse.bulk_receive(&batch)?;
            writeln!(
                out,
                "Added {} materials, skipped {} ({} invalid, {} duplicates)",
                report.added,
                report.skipped(),
                report.invalid,
                report.duplicates
            )?;
        }
        Some(("add-rack", args)) => {
            let draft = RackDraft::new(text(args, "zone"), text(args, "row"), text(args, "level"))
                .with_description(text(args, "description"));
            let rack = warehouse.register_rack(&draft)?;
            writeln!(out, "Created rack {}", rack_line(&rack))?;
        }
        Some(("capacity", args)) => {
            let rack = warehouse.set_rack_capacity_note(text(args, "code"), text(args, "note"))?;
            writeln!(out, "Updated rack {}", rack_line(&rack))?;
        }
        Some(("find", args)) => {
            let scan = text(args, "scan");
            if args.get_flag("rack") {
                let rack = warehouse.find_rack(scan)?;
                writeln!(out, "{}", rack_line(rack))?;
            } else {
                let resolution = warehouse.resolve_material(scan)?;
                writeln!(out, "{}", material_line(resolution.material))?;
                writeln!(out, "matched by {:?}", resolution.tier)?;
                if resolution.was_ambiguous() {
                    writeln!(
                        out,
                        "warning: {} materials matched, showing the most recent",
                        resolution.candidates
                    )?;
                }
            }
        }
        Some(("place", args)) => {
            let mut workflow = PlacementWorkflow::new();
            workflow.scan_material(&warehouse, text(args, "material"))?;
            workflow.scan_rack(&warehouse, text(args, "rack"))?;
            if let Some(summary) = workflow.summary() {
                writeln!(out, "Placing {summary}")?;
            }
            let matricule = matricule(warehouse.config(), args).to_string();
            let placement = workflow.confirm(&mut warehouse, &matricule)?;
            writeln!(out, "Placed {}", placement_line(&placement))?;
        }
        Some(("undo", args)) => {
            let yes = args.get_flag("yes");
            let outcome = warehouse.undo_last_placement(|last| {
                yes || prompt(&format!("Undo placement {}?", placement_line(last)))
            })?;
            match outcome {
                UndoOutcome::NothingToUndo => writeln!(out, "No placement to undo")?,
                UndoOutcome::Declined => writeln!(out, "Undo cancelled")?,
                UndoOutcome::Removed(p) => writeln!(out, "Removed {}", placement_line(&p))?,
            }
        }
        Some(("audit", args)) => {
            let entries = match args.get_one::<usize>("limit") {
                Some(limit) => warehouse.snapshot().audit_log.list_recent(*limit),
                None => warehouse.recent_audit(),
            };
            for e in entries {
                let details = serde_json::to_string(&e.details)?;
                writeln!(
                    out,
                    "{}  {}  {}  {} {} {}  {}",
                    e.id,
                    e.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    e.user,
                    e.action,
                    e.entity_type,
                    e.entity_id,
                    details
                )?;
            }
        }
        Some(("search", args)) => {
            let query = text(args, "query");
            writeln!(out, "Materials:")?;
            for m in warehouse.search_materials(query) {
                writeln!(out, "  {}", material_line(m))?;
            }
            writeln!(out, "Racks:")?;
            for r in warehouse.search_racks(query) {
                writeln!(out, "  {}", rack_line(r))?;
            }
            writeln!(out, "Placements:")?;
            for p in warehouse.search_placements(query) {
                writeln!(out, "  {}", placement_line(p))?;
            }
        }
        Some(("stats", _)) => {
            let stats = warehouse.stats();
            writeln!(out, "Materials:     {}", stats.materials)?;
            writeln!(out, "Racks:         {}", stats.racks)?;
            writeln!(out, "Placements:    {}", stats.placements)?;
            writeln!(out, "Audit entries: {}", stats.audit_entries)?;
        }
        Some(("export", args)) => export(warehouse.snapshot(), args, out)?,
        Some(("backup", args)) => {
            let path = write_backup(warehouse.snapshot(), path_arg(args, "out"), Utc::now())?;
            writeln!(out, "Backup written to {}", path.display())?;
        }
        Some(("import", args)) => {
            let path = path_arg(args, "file");
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let snapshot = Snapshot::from_json(&content).map_err(|e| {
                MagasinError::from(ValidationError::InvalidImport(format!(
                    "{}: {e}",
                    path.display()
                )))
            })?;
            let current = warehouse.stats();
            let question = format!(
                "Replace {} materials, {} racks and {} placements with {} materials, {} racks and {} placements?",
                current.materials,
                current.racks,
                current.placements,
                snapshot.materials.len(),
                snapshot.racks.len(),
                snapshot.placements.len()
            );
            if args.get_flag("yes") || prompt(&question) {
                let stats = warehouse.import_snapshot(snapshot)?;
                writeln!(
                    out,
                    "Imported {} materials, {} racks, {} placements",
                    stats.materials, stats.racks, stats.placements
                )?;
            } else {
                writeln!(out, "Import cancelled")?;
            }
        }
        Some(("clear", args)) => {
            let yes = args.get_flag("yes");
            let cleared = warehouse.clear_all(|stats| {
                yes || prompt(&format!(
                    "Delete {} materials, {} racks, {} placements and the audit log?",
                    stats.materials, stats.racks, stats.placements
                ))
            })?;
            if cleared {
                writeln!(out, "All data cleared")?;
            } else {
                writeln!(out, "Clear cancelled")?;
            }
        }
        _ => anyhow::bail!("unknown command"),
    }
    Ok(())
}

fn export(snapshot: &Snapshot, args: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let dir = path_arg(args, "out");
    let now = Utc::now();
    match text(args, "format") {
        "csv" => {
            for collection in Collection::ALL {
                let path = export_csv(snapshot, collection, dir)?;
                writeln!(out, "Wrote {}", path.display())?;
            }
        }
        "xlsx" => {
            let path = dir.join(default_workbook_name(now.date_naive()));
            write_workbook(snapshot, &path)?;
            writeln!(out, "Wrote {}", path.display())?;
        }
        "sheets" => {
            let signature = ChangeSignature::of(snapshot);
            let since = args.get_one::<String>("since").map(String::as_str);
            if signature.differs_from(since) {
                tracing::info!("Change signature: {}", signature.key());
                let request = SyncRequest::new(snapshot, now);
                writeln!(out, "{}", serde_json::to_string_pretty(&request)?)?;
            } else {
                tracing::info!("No changes since last sync");
            }
        }
        "json" => writeln!(out, "{}", Backup::new(snapshot, now).to_json()?)?,
        other => anyhow::bail!("unsupported export format '{other}'"),
    }
    Ok(())
}
