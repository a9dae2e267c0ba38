//! Thin CLI wrapper around [`contigmerge`]: argument parsing, logging
//! setup, and exit-code mapping (spec §6/§7). All actual work lives in
//! the library.

use std::{
    fs::File,
    io::BufReader,
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("FASTA mode (CONTIGS given) requires -k")]
    MissingK,
    #[error("FASTA mode (CONTIGS given) requires -o")]
    MissingOutput,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Core(#[from] contigmerge::CoreError),
}

/// Merge mutually consistent contig paths into canonical assemblies,
/// optionally splicing the result into FASTA records.
#[derive(Debug, Parser)]
#[command(name = "contigmerge", version, about)]
struct Args {
    /// FASTA file of input contigs. Omit for paths-only mode.
    contigs: Option<PathBuf>,

    /// Path file (one `@NAME± -> NAME± ...` record per line).
    paths: PathBuf,

    /// k-mer size used for overlap checks. Required when CONTIGS is given.
    #[arg(short = 'k')]
    k: Option<u32>,

    /// Output file. Required when CONTIGS is given; paths-only mode writes to stdout.
    #[arg(short = 'o')]
    output: Option<PathBuf>,

    /// Increase verbosity (repeatable: -v, -vv).
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn run(args: Args) -> Result<(), CliError> {
    let paths_file = BufReader::new(File::open(&args.paths)?);

    match args.contigs {
        None => {
            let stdout = std::io::stdout();
            contigmerge::merge_paths_only(paths_file, stdout.lock())?;
        }
        Some(contigs_path) => {
            let k = args.k.ok_or(CliError::MissingK)?;
            let output_path = args.output.ok_or(CliError::MissingOutput)?;

            let contigs_file = BufReader::new(File::open(&contigs_path)?);
            let output = File::create(&output_path)?;
            contigmerge::merge_fasta(contigs_file, paths_file, k, output)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
