//! dpo-finder command line interface
//!
//! Resolve Indian postal addresses to their Delivery Post Office from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # One-shot lookups, one argument per address
//! dpo-finder lookup "Indiranagar, Bangalore 560038" "Fort, Mumbai 400001"
//!
//! # Interactive prompt
//! dpo-finder --data data/postal_data.csv interactive
//!
//! # Quick suggestions and office details as JSON
//! dpo-finder --json suggest "anna nagar" --limit 10
//! dpo-finder details "Connaught Place H.O"
//! ```
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::{Parser, Subcommand};
use dpo_finder::{DEFAULT_SUGGESTION_PAGE_SIZE, DpoFinder};
use tracing::{Level, debug, info};

mod display;

#[derive(Debug, Parser)]
#[command(name = "dpo-finder", version)]
#[command(about = "Suggest the Delivery Post Office and PIN code for Indian postal addresses")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Postal directory CSV (defaults to data/postal_data.csv)
    #[arg(long, global = true, env = "POSTAL_DATA_FILE", value_name = "PATH")]
    data: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve one or more addresses
    Lookup {
        /// Addresses to resolve; quote each one
        #[arg(required = true, value_name = "ADDRESS")]
        addresses: Vec<String>,
    },

    /// Prompt for addresses until 'exit'
    Interactive,

    /// Quick suggestions for a partially typed address
    Suggest {
        query: String,

        /// Maximum number of offices to show
        #[arg(long, short, default_value_t = DEFAULT_SUGGESTION_PAGE_SIZE)]
        limit: usize,
    },

    /// Full record of a post office
    Details {
        #[arg(value_name = "OFFICE_NAME")]
        office_name: String,
    },

    /// Summary of the loaded postal directory
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    dpo_finder::init_logging(level)?;

    let finder = match &cli.data {
        Some(path) => DpoFinder::from_path(path),
        None => DpoFinder::from_default_location(),
    };
    debug!(command = ?cli.command, "Starting dpo-finder");

    run(&cli, &finder, &mut io::stdin().lock(), &mut io::stdout().lock())
}

fn run(cli: &Cli, finder: &DpoFinder, input: &mut impl BufRead, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Commands::Lookup { addresses } => {
            let outcomes = finder.lookup_batch(addresses);
            if cli.json {
                writeln!(out, "{}", display::to_json(&outcomes)?)?;
            } else {
                for (address, outcome) in addresses.iter().zip(&outcomes) {
                    writeln!(out, "{}", display::render_outcome(address, outcome))?;
                }
            }
        }
        Commands::Interactive => interactive(cli.json, finder, input, out)?,
        Commands::Suggest { query, limit } => {
            let suggestions = finder.suggest(query, *limit)?;
            if cli.json {
                writeln!(out, "{}", display::to_json(&suggestions)?)?;
            } else {
                writeln!(out, "{}", display::render_suggestions(query, &suggestions))?;
            }
        }
        Commands::Details { office_name } => match finder.office_details(office_name)? {
            Some(record) if cli.json => writeln!(out, "{}", display::to_json(&record)?)?,
            Some(record) => writeln!(out, "{}", display::render_details(&record))?,
            None => anyhow::bail!("No post office named '{office_name}'"),
        },
        Commands::Info => {
            let info = finder.info()?;
            if cli.json {
                writeln!(out, "{}", display::to_json(&info)?)?;
            } else {
                writeln!(out, "{}", display::render_info(&info))?;
            }
        }
    }
    Ok(())
}

/// Read-resolve-print loop. Ends on 'exit' or end of input.
fn interactive(
    json: bool,
    finder: &DpoFinder,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Welcome to the Delivery Post Office Identification System!")?;
    writeln!(out, "Loading postal data...")?;
    let t_load = std::time::Instant::now();
    let info = finder.info()?;
    info!(elapsed = ?t_load.elapsed(), records = info.records, "Postal data ready");
    writeln!(out, "{}", display::render_info(&info))?;
    writeln!(out, "{}", "-".repeat(30))?;

    let mut line = String::new();
    loop {
        write!(out, "Enter address (or type 'exit' to quit): ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let address = line.trim();
        if address.eq_ignore_ascii_case("exit") {
            break;
        }
        if address.is_empty() {
            writeln!(out, "Please enter an address.")?;
            continue;
        }

        let parsed = finder.parse(address);
        let outcome = finder.lookup_parsed(&parsed);
        if json {
            writeln!(out, "{}", display::to_json(&outcome)?)?;
        } else {
            writeln!(out, "\nProcessing address: '{address}'")?;
            writeln!(out, "{}", display::render_parsed(&parsed))?;
            writeln!(out, "\n--- Suggestion ---\n{outcome}")?;
        }
        writeln!(out, "{}", "-".repeat(30))?;
    }
    writeln!(out, "Exiting application.")?;
    Ok(())
}
