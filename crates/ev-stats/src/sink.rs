//! Report sinks.
//!
//! The end-of-run report is one line per vehicle type.  [`TextLogSink`]
//! prints each line to the console and appends it to a plain-text log file;
//! [`MemorySink`] keeps the lines in memory for tests and embedding.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

use crate::StatsResult;

/// Destination for report lines.
pub trait ReportSink {
    /// Write one report line (no trailing newline).
    fn write_line(&mut self, line: &str) -> StatsResult<()>;

    /// Flush any buffered output.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> StatsResult<()> {
        Ok(())
    }
}

// ── TextLogSink ───────────────────────────────────────────────────────────────

/// Writes each line to a console writer (stdout by default) and appends it
/// to a log file.  Existing file contents are never truncated.
pub struct TextLogSink<W: Write = Stdout> {
    console: W,
    file:    BufWriter<File>,
}

impl TextLogSink<Stdout> {
    /// Open (or create) `path` for appending; console output goes to stdout.
    pub fn new(path: &Path) -> StatsResult<Self> {
        Self::with_console(path, io::stdout())
    }
}

impl<W: Write> TextLogSink<W> {
    /// Open (or create) `path` for appending, echoing lines to `console`.
    pub fn with_console(path: &Path, console: W) -> StatsResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { console, file: BufWriter::new(file) })
    }

    /// Unwrap the console writer (e.g. to inspect captured output).
    pub fn into_console(self) -> W {
        self.console
    }
}

impl<W: Write> ReportSink for TextLogSink<W> {
    fn write_line(&mut self, line: &str) -> StatsResult<()> {
        writeln!(self.console, "{line}")?;
        writeln!(self.file, "{line}")?;
        Ok(())
    }

    fn finish(&mut self) -> StatsResult<()> {
        self.console.flush()?;
        self.file.flush()?;
        Ok(())
    }
}

// ── MemorySink ────────────────────────────────────────────────────────────────

/// Collects report lines in a `Vec`.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for MemorySink {
    fn write_line(&mut self, line: &str) -> StatsResult<()> {
        self.lines.push(line.to_owned());
        Ok(())
    }
}
