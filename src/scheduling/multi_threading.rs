//! Multi-threaded back-end of the event processing

use crate::{
    error::Result,
    event::Event,
    producer::Producer,
    results::RunResults,
    scheduling::{process_batch, EVENT_BATCH_SIZE},
};
use rayon::prelude::*;

/// Process events in multi-threaded mode
///
/// Events are split in batches, which are processed in parallel and then
/// merged back in input order, so that the output does not depend on how
/// tasks were scheduled.
///
pub fn run_producers_impl(
    events: &[Event],
    producers: &[Box<dyn Producer>],
) -> Result<RunResults> {
    let batches = events
        .par_chunks(EVENT_BATCH_SIZE)
        .enumerate()
        .map(|(batch_id, batch)| {
            process_batch(batch_id * EVENT_BATCH_SIZE, batch, producers)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut results = RunResults::default();
    for batch in batches {
        results.merge(batch);
    }
    Ok(results)
}
