//! Inspects the time zone and country data a data source provides.

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use tzsource::{DataSource, DataSourceKind, DataSourceRegistry, DataSourceResult, DetectionConfig};

#[derive(Parser, Debug)]
#[command(name = "tzsource-inspect")]
#[command(about = "Inspect time zone and country metadata")]
struct Cli {
    /// Read a zoneinfo directory instead of detecting a data source
    #[arg(long, value_name = "DIR", global = true, conflicts_with = "bundled")]
    zoneinfo: Option<PathBuf>,

    /// Country table to use with --zoneinfo
    #[arg(long, value_name = "FILE", global = true, requires = "zoneinfo")]
    iso3166: Option<PathBuf>,

    /// Use the bundled time zone database
    #[arg(long, global = true)]
    bundled: bool,

    /// Log data source activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show which data source is in use
    Source,
    /// List time zone identifiers
    List {
        /// Only identifiers with their own data
        #[arg(long, conflicts_with = "linked")]
        data: bool,
        /// Only identifiers linked to another
        #[arg(long)]
        linked: bool,
    },
    /// Check whether an identifier is valid
    Check { identifier: String },
    /// Show a time zone
    Zone { identifier: String },
    /// List country codes
    Countries,
    /// Show a country and its time zones
    Country { code: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.verbose {
        if let Err(err) = simple_logger::init_with_level(log::Level::Debug) {
            eprintln!("failed to initialize logging: {err}");
        }
    }

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> DataSourceResult<ExitCode> {
    let source = data_source(cli)?;
    match &cli.command {
        Command::Source => {
            println!("{source}");
            if let Some(dir) = source.zoneinfo_dir() {
                println!("directory: {}", dir.display());
            }
        }
        Command::List { data, linked } => {
            let identifiers = match (data, linked) {
                (true, _) => source.data_timezone_identifiers()?,
                (_, true) => source.linked_timezone_identifiers()?,
                _ => source.timezone_identifiers()?,
            };
            for identifier in identifiers.iter() {
                println!("{identifier}");
            }
        }
        Command::Check { identifier } => {
            let Some(valid) = source.valid_timezone_identifier(identifier)? else {
                println!("{identifier:?} is not a valid time zone identifier");
                return Ok(ExitCode::FAILURE);
            };
            println!("{valid} is valid");
        }
        Command::Zone { identifier } => {
            let timezone = source.lookup_timezone(identifier)?.create_timezone();
            println!("{:<12} {}", "identifier", timezone.identifier());
            if timezone.is_linked() {
                println!("{:<12} {}", "linked to", timezone.canonical_identifier());
            }
            if let Some(tzif) = timezone.tzif() {
                let block = tzif.data_block();
                println!("{:<12} {}", "transitions", block.transition_times.len());
                println!(
                    "{:<12} {}",
                    "local types",
                    block.local_time_type_records.len()
                );
                if let Some(footer) = tzif.posix_tz_string() {
                    println!("{:<12} {footer:?}", "footer");
                }
            }
        }
        Command::Countries => {
            for code in source.country_codes()?.iter() {
                let country = source.lookup_country(code)?;
                println!("{code}\t{}", country.name());
            }
        }
        Command::Country { code } => {
            let country = source.lookup_country(code)?;
            println!("{} {}", country.code(), country.name());
            for zone in country.zones() {
                println!(
                    "  {:<32} {:>9.4} {:>10.4}  {}",
                    zone.identifier,
                    zone.latitude,
                    zone.longitude,
                    zone.description.as_deref().unwrap_or("")
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn data_source(cli: &Cli) -> DataSourceResult<std::sync::Arc<DataSource>> {
    let registry = DataSourceRegistry::new(DetectionConfig::from_env());
    if cli.bundled {
        registry.set_kind(DataSourceKind::Bundled, &[] as &[PathBuf])?;
    } else if let Some(dir) = &cli.zoneinfo {
        let args: Vec<&PathBuf> = std::iter::once(dir).chain(&cli.iso3166).collect();
        registry.set_kind(DataSourceKind::Zoneinfo, &args)?;
    }
    registry.get()
}
