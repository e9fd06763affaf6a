//! Troupes: build AIC wiki pages from the Hideout troupe application sheet.
//!
//! # Usage
//!
//! ```text
//! troupes init [--config troupes.yaml]
//! troupes build <workbook> [--out <dir>] [--current-year N] [--dry-run] [--photos]
//! troupes diff <workbook> [--out <dir>]
//! troupes list <workbook> [--json]
//! troupes show <workbook> <troupe>
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    build::BuildArgs, diff::DiffArgs, init::InitArgs, list::ListArgs, show::ShowArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "troupes",
    version,
    about = "Collate troupe applications into wiki pages",
    long_about = None,
)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default troupes.yaml.
    Init(InitArgs),

    /// Collate the sheet and write one page per troupe.
    Build(BuildArgs),

    /// Show unified diff of what build would write.
    Diff(DiffArgs),

    /// Summarize collated troupes as a table.
    List(ListArgs),

    /// Print the rendered page for one troupe.
    Show(ShowArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Build(args) => args.run(),
        Commands::Diff(args) => args.run(),
        Commands::List(args) => args.run(),
        Commands::Show(args) => args.run(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
