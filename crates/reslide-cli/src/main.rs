use clap::{Parser, Subcommand};
use reslide_core::{
    DeckSummary, PmlDocument, RearrangeSettings, Rearranger, ReslideError, Result, SlideSequence,
};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "reslide")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
#[command(about = "Reorder, duplicate and delete PowerPoint slides", long_about = None)]
struct Cli {
    /// Log every clone, removal and move to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build OUTPUT from TEMPLATE's slides in the given order
    ///
    /// Indices are 0-based and may repeat: `0,34,34,50,52` uses slide 34 twice.
    Rearrange {
        template: PathBuf,

        output: PathBuf,

        /// Comma-separated slide indices, e.g. 0,34,34,50,52
        #[arg(allow_hyphen_values = true)]
        sequence: String,

        /// Keep parts no slide refers to any more
        #[arg(long)]
        keep_orphans: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Describe the slides of a deck
    Info {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Rearrange {
            template,
            output,
            sequence,
            keep_orphans,
            json,
        } => {
            let sequence = SlideSequence::parse(&sequence)?;
            require_file(&template, "Template")?;

            let settings = RearrangeSettings {
                remove_orphaned_parts: !keep_orphans,
                ..RearrangeSettings::default()
            };
            debug!(?settings, %sequence, "starting rearrangement");
            let report = Rearranger::new(settings).rearrange_file(&template, &output, &sequence)?;

            if json {
                println!("{}", report.to_json()?);
            } else {
                println!("{}", report);
                println!("Saved rearranged presentation to: {}", output.display());
            }
        }
        Commands::Info { file, json } => {
            require_file(&file, "Input")?;
            let doc = PmlDocument::from_file(&file)?;
            let summary = DeckSummary::from_document(&doc)?;

            if json {
                println!("{}", summary.to_json()?);
            } else {
                println!("{}", summary);
            }
        }
    }
    Ok(())
}

fn require_file(path: &Path, what: &str) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }
    Err(ReslideError::Io(io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} file not found: {}", what, path.display()),
    )))
}
