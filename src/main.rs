use anyhow::{Context, Result};
use clap::Parser;

use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufReader, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use connect4_solver::*;

/// Solves Connect 4 positions given as move sequences
#[derive(Parser)]
#[command(
    name = "connect4_bench",
    version,
    about = "Solves Connect 4 positions given as move sequences\n\nPrints '<line> <score> <nodes> <milliseconds>' for every input line"
)]
struct Cli {
    /// File with one move sequence per line, or '-' for stdin
    #[arg(short, long, default_value = "test.txt")]
    file: PathBuf,

    /// Only find out whether positions are won, drawn or lost
    #[arg(short, long)]
    weak: bool,

    /// Number of positions solved at once
    #[arg(short, long, default_value = "1")]
    jobs: NonZeroUsize,

    /// Show a progress bar on stderr
    #[arg(long)]
    progress: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let input: Box<dyn BufRead> = if cli.file.as_os_str() == "-" {
        Box::new(BufReader::new(stdin()))
    } else {
        let file = File::open(&cli.file)
            .with_context(|| format!("failed to open {}", cli.file.display()))?;
        Box::new(BufReader::new(file))
    };

    let mode = if cli.weak {
        SolveMode::Weak
    } else {
        SolveMode::Exact
    };
    log::info!("reading move sequences from {}", cli.file.display());

    let stdout = stdout();
    let mut output = stdout.lock();
    Benchmark::new(mode)
        .with_jobs(cli.jobs.get())
        .with_progress(cli.progress)
        .run(input, &mut output)?;
    output.flush()?;

    Ok(())
}
