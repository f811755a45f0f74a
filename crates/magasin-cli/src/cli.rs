//! Command-line definition
//!
//! Global options locate the configuration and data file; every subcommand
//! opens the warehouse, performs one operation and exits.

use chrono::NaiveDate;
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

fn yes_flag() -> Arg {
    Arg::new("yes")
        .long("yes")
        .short('y')
        .action(ArgAction::SetTrue)
        .help("Skip the confirmation prompt")
}

fn out_dir() -> Arg {
    Arg::new("out")
        .long("out")
        .default_value(".")
        .value_parser(value_parser!(PathBuf))
        .help("Directory receiving the written files")
}

/// Build the `magasin` command
#[must_use]
pub fn build() -> Command {
    Command::new("magasin")
        .version(magasin_core::VERSION)
        .about("Aviation warehouse inventory: reception, racks and scan-driven placement")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .env("MAGASIN_CONFIG")
                .default_value("magasin.toml")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .global(true)
                .env("MAGASIN_DATA")
                .value_parser(value_parser!(PathBuf))
                .help("JSON data file, overrides the configured one"),
        )
        .arg(
            Arg::new("operator")
                .long("operator")
                .global(true)
                .env("MAGASIN_OPERATOR")
                .help("Identity recorded on every change"),
        )
        .subcommand(
            Command::new("receive")
                .about("Register a received material")
                .arg(Arg::new("part-number").long("pn").required(true).help("Part number"))
                .arg(Arg::new("serial-number").long("sn").required(true).help("Serial number"))
                .arg(Arg::new("type").long("type").help("Material type"))
                .arg(Arg::new("description").long("description").help("Free description"))
                .arg(Arg::new("supplier").long("supplier").help("Supplier name"))
                .arg(
                    Arg::new("matricule")
                        .long("matricule")
                        .help("Matricule of the receiving agent, defaults to the configured one"),
                )
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_parser(value_parser!(NaiveDate))
                        .help("Reception date (YYYY-MM-DD), defaults to today"),
                ),
        )
        .subcommand(
            Command::new("bulk-receive")
                .about("Register materials from a CSV or JSON file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("CSV with a header row, or a JSON array"),
                ),
        )
        .subcommand(
            Command::new("add-rack")
                .about("Create a rack location")
                .arg(Arg::new("zone").long("zone").required(true).help("Zone"))
                .arg(Arg::new("row").long("row").required(true).help("Row"))
                .arg(Arg::new("level").long("level").required(true).help("Level"))
                .arg(Arg::new("description").long("description").help("Free description")),
        )
        .subcommand(
            Command::new("capacity")
                .about("Set the capacity note of a rack")
                .arg(Arg::new("code").required(true).help("Rack code or barcode"))
                .arg(Arg::new("note").required(true).help("Capacity note")),
        )
        .subcommand(
            Command::new("find")
                .about("Resolve a scan to a material, or to a rack with --rack")
                .arg(Arg::new("scan").required(true).help("Raw scanner input"))
                .arg(
                    Arg::new("rack")
                        .long("rack")
                        .action(ArgAction::SetTrue)
                        .help("Resolve a rack instead of a material"),
                ),
        )
        .subcommand(
            Command::new("place")
                .about("Place a material on a rack")
                .arg(Arg::new("material").required(true).help("Material scan"))
                .arg(Arg::new("rack").required(true).help("Rack scan"))
                .arg(
                    Arg::new("matricule")
                        .long("matricule")
                        .short('m')
                        .help("Magasinier matricule, defaults to the configured one"),
                ),
        )
        .subcommand(
            Command::new("undo")
                .about("Remove the most recent placement")
                .arg(yes_flag()),
        )
        .subcommand(
            Command::new("audit").about("Show recent audit entries").arg(
                Arg::new("limit")
                    .long("limit")
                    .value_parser(value_parser!(usize))
                    .help("Number of entries, defaults to the configured cap"),
            ),
        )
        .subcommand(
            Command::new("search")
                .about("Search materials, racks and placements")
                .arg(Arg::new("query").default_value("").help("Case-insensitive text")),
        )
        .subcommand(Command::new("stats").about("Show record counts"))
        .subcommand(
            Command::new("export")
                .about("Export the warehouse")
                .arg(
                    Arg::new("format")
                        .required(true)
                        .value_parser(["csv", "xlsx", "sheets", "json"])
                        .help("Output format"),
                )
                .arg(out_dir())
                .arg(
                    Arg::new("since")
                        .long("since")
                        .help("Last synced signature; sheets output is skipped when unchanged"),
                ),
        )
        .subcommand(
            Command::new("backup")
                .about("Write a dated JSON backup")
                .arg(out_dir()),
        )
        .subcommand(
            Command::new("import")
                .about("Replace all data with a backup or exported document")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON document"),
                )
                .arg(yes_flag()),
        )
        .subcommand(
            Command::new("clear")
                .about("Delete every record and the audit log")
                .arg(yes_flag()),
        )
}
