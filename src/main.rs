//! ncdf - inspect and create netCDF classic headers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ncdf::{cdl, data, HeaderReader, HeaderWriter, NcFile, Version};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ncdf")]
#[command(about = "Inspect and create netCDF classic file headers", long_about = None)]
struct Args {
    /// Enable logging to specified file
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the header of a netCDF file
    Info {
        /// Path to the netCDF file
        file: PathBuf,

        /// Print JSON instead of CDL
        #[arg(long)]
        json: bool,
    },

    /// Create a netCDF file from a CDL schema
    New {
        /// Path to the CDL source
        #[arg(value_name = "CDL")]
        schema: PathBuf,

        /// Path of the file to create
        out: PathBuf,

        /// Write a classic (32-bit offset) file
        #[arg(long)]
        classic: bool,

        /// Write zeroed data blocks after the header
        #[arg(long)]
        fill: bool,
    },

    /// Parse a CDL schema and print it back normalised
    Cdl {
        /// Path to the CDL source
        #[arg(value_name = "CDL")]
        schema: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;

    match args.command {
        Command::Info { file, json } => info(&file, json),
        Command::New {
            schema,
            out,
            classic,
            fill,
        } => create(&schema, &out, classic, fill),
        Command::Cdl { schema } => {
            let file = cdl::parse_file(&schema)?;
            print!("{}", file.to_cdl(&schema_name(&schema))?);
            Ok(())
        }
    }
}

/// Log to `log_path` when given, otherwise to stderr. `RUST_LOG` overrides
/// the default level.
fn init_logging(log_path: Option<&Path>) -> Result<()> {
    let default_level = if log_path.is_some() { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_path {
        Some(path) => {
            let log_file = std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            let subscriber = fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(log_file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
            tracing::info!("Starting ncdf");
        }
        None => {
            let subscriber = fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn info(path: &Path, json: bool) -> Result<()> {
    let file = HeaderReader::read_file(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&file)?);
    } else {
        print!("{}", file.to_cdl(&schema_name(path))?);
    }
    Ok(())
}

fn create(cdl_path: &Path, out: &Path, classic: bool, fill: bool) -> Result<()> {
    let mut file: NcFile = cdl::parse_file(cdl_path)?;
    if classic {
        file.version = Version::Classic;
    }

    let mut sink = HeaderWriter::write_file(out, &mut file)?;
    if fill {
        for name in file.vars.keys() {
            data::write_zeroed(&file, name, &mut sink)
                .with_context(|| format!("Failed to fill variable {name}"))?;
        }
    }

    tracing::info!(
        path = %out.display(),
        header = file.header_size(),
        variables = file.vars.len(),
        "created file"
    );
    Ok(())
}

/// File stem used as the `netcdf <name>` of rendered CDL.
fn schema_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string())
}
