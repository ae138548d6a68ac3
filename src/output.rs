//! This module is in charge of writing the decorated collections and the run
//! summary to disk

use crate::{counters::FsrCounters, numeric::Float, results::RunResults};
use std::{
    fs::File,
    io::{self, BufWriter, Result, Write},
    path::Path,
    time::Duration,
};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Write the decorated collections of every event as a JSON array
pub fn dump_events(results: &RunResults, path: &Path) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut file, &results.events)?;
    writeln!(file)?;
    file.flush()
}

/// Write the run summary: counters of each producer, and timings
pub fn dump_summary(
    results: &RunResults,
    elapsed_time: Duration,
    path: &Path,
) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_summary(&mut file, results, elapsed_time, &timestamp()?)?;
    file.flush()
}

/// Timestamp of the end of the run
fn timestamp() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

/// Summary writer proper
fn write_summary(
    out: &mut impl Write,
    results: &RunResults,
    elapsed_time: Duration,
    timestamp: &str,
) -> Result<()> {
    write_item(out, timestamp)?;
    write_item(out, "---------------------------------------------")?;
    let num_events = results.num_events();
    write_item(out, ("Processed events", num_events))?;
    let elapsed_secs = elapsed_time.as_secs_f64() as Float;
    write_item(out, ("Elapsed time (s)", elapsed_secs))?;
    if num_events > 0 {
        let per_event = elapsed_secs / num_events as Float;
        write_item(out, ("Elapsed time per event (s)", per_event))?;
    }
    for (name, counters) in &results.counters {
        write_item(out, "---------------------------------------------")?;
        write_item(out, ("Producer", name.as_str()))?;
        write_counters(out, counters)?;
    }
    Ok(())
}

/// Counters of one producer, with the efficiency of each stage
fn write_counters(out: &mut impl Write, counters: &FsrCounters) -> Result<()> {
    let stages = [
        ("nPassPre", counters.n_pass_pre),
        ("nHaveBest", counters.n_have_best),
        ("nPassIso", counters.n_pass_iso),
        ("nPassVeto", counters.n_pass_veto),
    ];
    for (name, count) in stages {
        write_item(out, (name, count))?;
    }
    if counters.n_pass_pre > 0 {
        let efficiency = counters.n_pass_veto as Float / counters.n_pass_pre as Float;
        write_item(out, ("Embedded fraction", efficiency))?;
    }
    if counters.n_events > 0 {
        let per_event = counters.n_pass_veto as Float / counters.n_events as Float;
        write_item(out, ("Embedded photons per event", per_event))?;
    }
    Ok(())
}

/// Summary line output facility
fn write_item(out: &mut impl Write, data: impl SummaryItem) -> Result<()> {
    write!(out, " ")?;
    data.write(out)?;
    writeln!(out)
}

/// Trait implemented by things which can be printed in the summary
trait SummaryItem: Sized {
    /// Write down `self` to the summary
    fn write(self, out: &mut impl Write) -> Result<()>;
}

impl SummaryItem for &str {
    fn write(self, out: &mut impl Write) -> Result<()> {
        write!(out, "{self}")
    }
}

impl SummaryItem for usize {
    fn write(self, out: &mut impl Write) -> Result<()> {
        write!(out, "{self}")
    }
}

impl SummaryItem for Float {
    // Six significant digits, like C's %g
    fn write(self, out: &mut impl Write) -> Result<()> {
        write!(out, "{self:.5e}")
    }
}

impl<T: SummaryItem> SummaryItem for (&str, T) {
    // Key-value output that uses fixed-size columns for better readability
    fn write(self, out: &mut impl Write) -> Result<()> {
        write!(out, "{:<31}: ", self.0)?;
        self.1.write(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_layout() {
        let mut results = RunResults::default();
        results.events.resize_with(4, Default::default);
        results.counters.insert(
            "slimmedMuons".to_owned(),
            FsrCounters {
                n_events: 4,
                n_pass_pre: 8,
                n_have_best: 4,
                n_pass_iso: 3,
                n_pass_veto: 2,
            },
        );
        let mut out = Vec::new();
        let elapsed = Duration::from_millis(2);
        write_summary(&mut out, &results, elapsed, "2026-01-01T00:00:00Z").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], " 2026-01-01T00:00:00Z");
        assert!(text.contains(&format!(" {:<31}: 4\n", "Processed events")));
        assert!(text.contains(&format!(" {:<31}: slimmedMuons\n", "Producer")));
        assert!(text.contains(&format!(" {:<31}: 2\n", "nPassVeto")));
        assert!(text.contains(&format!(" {:<31}: 2.50000e-1\n", "Embedded fraction")));
        assert!(text.contains(&format!(" {:<31}: 5.00000e-1\n", "Embedded photons per event")));
    }
}
