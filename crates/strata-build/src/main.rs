//! strata-gen CLI
//!
//! Generates the query API of strata models outside a build script.

use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use strata_build::{BuildError, Builder, DEFAULT_FILE_NAME};

/// Generates SQLite query builders for strata models.
#[derive(Parser)]
#[command(name = "strata-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source files declaring models and type adapters.
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Output directory.
    #[arg(short, long, env = "STRATA_OUT", default_value = ".")]
    out: PathBuf,

    /// Generated file name.
    #[arg(short, long, default_value = DEFAULT_FILE_NAME)]
    file_name: String,

    /// Print the generated code instead of writing it.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let builder = Builder::new()
        .sources(cli.sources)
        .out_dir(cli.out)
        .file_name(cli.file_name)
        .cargo_instructions(false);

    let result = if cli.dry_run {
        builder.render().map(|code| print!("{code}"))
    } else {
        builder
            .generate()
            .map(|path| info!("Generated {}", path.display()))
    };

    match result {
        Err(BuildError::Processing(errors)) => {
            for err in &errors {
                error!("{err}");
            }
            anyhow::bail!("{} error(s) in models", errors.len())
        }
        other => Ok(other?),
    }
}
