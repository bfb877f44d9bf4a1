//! Voltaic command-line interface: parse a netlist, run the analyses it
//! requests, and print the results as CSV tables or JSON.

mod output;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "voltaic",
    version,
    about = "SPICE-style AC and transient circuit simulator"
)]
struct Args {
    /// Netlist file to simulate.
    netlist: PathBuf,

    /// Emit a JSON document instead of CSV tables.
    #[arg(long)]
    json: bool,

    /// Write results to a file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.netlist)
        .with_context(|| format!("reading {}", args.netlist.display()))?;
    let result = voltaic::simulate(&text)
        .with_context(|| format!("simulating {}", args.netlist.display()))?;

    if result.ac.is_none() && result.tran.is_none() {
        log::warn!("netlist requests no analysis (.ac or .tran); nothing to report");
    }

    let rendered = if args.json {
        output::to_json(&result).context("serializing results")?
    } else {
        let mut tables = String::new();
        if let Some(ac) = &result.ac {
            tables.push_str(&output::ac_csv(ac));
        }
        if let Some(tran) = &result.tran {
            if !tables.is_empty() {
                tables.push('\n');
            }
            tables.push_str(&output::tran_csv(tran));
        }
        tables
    };

    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}
