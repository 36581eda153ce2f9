//! Batch solving of move sequences, one position per input line
//!
//! Each line starts with a move sequence (see [`Position::from_moves`]); anything
//! after the first whitespace is ignored. Every solved line is written back as
//! `<line> <score> <nodes> <milliseconds>`.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use std::fmt;
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use crate::error::Error;
use crate::position::Position;
use crate::solver::{SolveMode, Solver};

/// The outcome of solving one input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineResult {
    pub line: String,
    pub score: i32,
    pub node_count: usize,
    pub elapsed: Duration,
}

impl fmt::Display for LineResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.line,
            self.score,
            self.node_count,
            self.elapsed.as_millis()
        )
    }
}

/// Totals over a whole run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub lines: usize,
    pub node_count: usize,
    pub elapsed: Duration,
}

/// Parses the move sequence at the start of a line, `line_number` is 1-indexed
pub fn parse_line(line_number: usize, line: &str) -> crate::Result<Position> {
    let moves = line
        .split_whitespace()
        .next()
        .ok_or(Error::EmptyLine { line: line_number })?;
    Position::from_moves(moves)
}

/// Solves one already parsed line with a fresh `Solver`
pub fn solve_line(line: &str, position: Position, mode: SolveMode) -> crate::Result<LineResult> {
    debug!(
        "solving {} ({} moves, {} winning cells)\n{}",
        line,
        position.num_moves(),
        position.winning_cells().count_ones(),
        position
    );

    let mut solver = Solver::new(position);
    let start_time = Instant::now();
    let score = solver.solve(mode)?;
    let elapsed = start_time.elapsed();

    debug!(
        "{}: score {}, {} tiles to the end",
        line,
        score,
        solver.win_distance(score)
    );

    Ok(LineResult {
        line: line.to_string(),
        score,
        node_count: solver.node_count(),
        elapsed,
    })
}

/// A batch run over a source of move sequences
#[derive(Clone, Debug)]
pub struct Benchmark {
    mode: SolveMode,
    jobs: usize,
    progress: bool,
}

impl Benchmark {
    pub fn new(mode: SolveMode) -> Self {
        Self {
            mode,
            jobs: 1,
            progress: false,
        }
    }

    /// Solves up to `jobs` lines at once, each line gets its own search
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Draws a progress bar on stderr
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Solves every line of `input`, writing results to `output` in input order
    ///
    /// The first bad line aborts the run. Sequentially, lines before it have
    /// already been written; with more than one job every line is parsed
    /// before any search starts, so nothing is written.
    pub fn run<R: BufRead, W: Write>(&self, input: R, output: &mut W) -> Result<Summary> {
        let lines = input
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .context("failed to read move sequences")?;

        info!(
            "solving {} positions ({:?}, {} job(s))",
            lines.len(),
            self.mode,
            self.jobs
        );

        let progress = self.progress_bar(lines.len());
        let start_time = Instant::now();

        let results = if self.jobs == 1 {
            self.run_sequential(&lines, output, &progress)?
        } else {
            self.run_parallel(&lines, output, &progress)?
        };
        progress.finish_and_clear();

        let summary = Summary {
            lines: results.len(),
            node_count: results.iter().map(|r| r.node_count).sum(),
            elapsed: start_time.elapsed(),
        };
        info!(
            "solved {} positions, {} nodes in {}ms",
            summary.lines,
            summary.node_count,
            summary.elapsed.as_millis()
        );
        Ok(summary)
    }

    fn run_sequential<W: Write>(
        &self,
        lines: &[String],
        output: &mut W,
        progress: &ProgressBar,
    ) -> Result<Vec<LineResult>> {
        let mut results = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let position = parse_line(i + 1, line)
                .with_context(|| format!("bad move sequence on line {}", i + 1))?;
            let result = solve_line(line, position, self.mode)
                .with_context(|| format!("search failed on line {}", i + 1))?;
            writeln!(output, "{}", result)?;
            progress.inc(1);
            results.push(result);
        }
        Ok(results)
    }

    fn run_parallel<W: Write>(
        &self,
        lines: &[String],
        output: &mut W,
        progress: &ProgressBar,
    ) -> Result<Vec<LineResult>> {
        let positions = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                parse_line(i + 1, line)
                    .with_context(|| format!("bad move sequence on line {}", i + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .context("failed to start worker threads")?;

        let mode = self.mode;
        let results = pool.install(|| {
            lines
                .par_iter()
                .zip(positions.par_iter())
                .map_with(progress.clone(), |progress, (line, &position)| {
                    let result = solve_line(line, position, mode);
                    progress.inc(1);
                    result
                })
                .collect::<crate::Result<Vec<_>>>()
        })?;

        for result in results.iter() {
            writeln!(output, "{}", result)?;
        }
        Ok(results)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let progress = ProgressBar::new(len as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("Solving positions: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
                .progress_chars("█▓▒░  "),
        );
        progress
    }
}
