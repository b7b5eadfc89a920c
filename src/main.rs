// src/main.rs
// Command-line dlog to CSV converter

use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use dlogcsv::{format_header_info, write_table, Dlog, Result, TableOptions};

/// Convert an instrument data-log file to CSV on stdout.
#[derive(Parser)]
#[command(name = "dlogcsv", version, about, long_about = None)]
struct Cli {
    /// Input log file
    inputfile: PathBuf,

    /// Omit log file information (printed on stderr)
    #[arg(short, long)]
    quiet: bool,

    /// Omit the log header row from the CSV output
    #[arg(long)]
    no_csv_log_header: bool,

    /// Omit the column header row from the CSV output
    #[arg(long)]
    no_csv_column_header: bool,
}

fn run(cli: &Cli) -> Result<()> {
    let dlog = Dlog::open(&cli.inputfile)?;
    let header = dlog.header.clone();

    if !cli.quiet {
        eprintln!("Header Information");
        for line in format_header_info(&header)? {
            eprintln!("{line}");
        }
    }

    let options = TableOptions {
        include_log_header: !cli.no_csv_log_header,
        include_column_header: !cli.no_csv_column_header,
    };

    let stdout = io::stdout().lock();
    write_table(&header, dlog.into_samples(), &options, stdout)
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error converting '{}': {}", cli.inputfile.display(), e);
        process::exit(1);
    }
}
