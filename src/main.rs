//! Command-line driver of the FSR producers
//!
//! Loads the producer configurations, reads a JSON file of events, runs every
//! producer over every event, and writes out the decorated collections along
//! with a summary of the selection counters.

use clap::Parser;
use eyre::WrapErr;
use fsr_embed::{output, producer, scheduling, Configuration, Event, Producer};
use std::{collections::BTreeSet, fs, path::PathBuf, time::Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// We'll use eyre's type-erased result type throughout the application
type Result<T> = eyre::Result<T>;

/// Associate FSR photons with the leptons that radiated them
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Producer configuration file (repeat to run several producers)
    #[arg(short, long = "config", required = true)]
    configs: Vec<PathBuf>,

    /// JSON file holding the input events
    #[arg(short, long)]
    events: PathBuf,

    /// JSON file receiving the decorated collections
    #[arg(short, long)]
    output: PathBuf,

    /// Text file receiving the selection summary
    #[arg(short, long, default_value = "fsr.summary")]
    summary: PathBuf,
}

/// This will act as our main function, with suitable error handling
fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    // ### CONFIGURATION READOUT ###

    let producers = args
        .configs
        .iter()
        .map(|path| -> Result<Box<dyn Producer>> {
            let config_str = fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read configuration {}", path.display()))?;
            let cfg = Configuration::parse(&config_str)
                .wrap_err_with(|| format!("Failed to load configuration {}", path.display()))?;
            Ok(producer::build(cfg)?)
        })
        .collect::<Result<Vec<_>>>()?;
    let mut names = BTreeSet::new();
    for producer in &producers {
        eyre::ensure!(
            names.insert(producer.name()),
            "Several producers decorate collection {}",
            producer.name()
        );
    }

    let events: Vec<Event> = {
        let events_str = fs::read_to_string(&args.events)
            .wrap_err_with(|| format!("Failed to read events from {}", args.events.display()))?;
        serde_json::from_str(&events_str).wrap_err("Failed to decode the events")?
    };
    info!(num_events = events.len(), num_producers = producers.len(), "starting");

    // ### EVENT PROCESSING ###

    // Start the clock after input I/O, to avoid IO-induced timing fluctuations
    let saved_time = Instant::now();
    let results = scheduling::run_producers(&events, &producers)?;
    let elapsed_time = saved_time.elapsed();

    // ### RESULTS DISPLAY AND STORAGE ###

    for (name, counters) in &results.counters {
        counters.report(name);
    }
    output::dump_events(&results, &args.output)
        .wrap_err_with(|| format!("Failed to write {}", args.output.display()))?;
    output::dump_summary(&results, elapsed_time, &args.summary)
        .wrap_err_with(|| format!("Failed to write {}", args.summary.display()))?;

    // ...and we're done
    Ok(())
}
