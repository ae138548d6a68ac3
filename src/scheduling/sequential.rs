//! Sequential back-end of the event processing

use crate::{
    error::Result,
    event::Event,
    producer::Producer,
    results::RunResults,
    scheduling::{process_batch, EVENT_BATCH_SIZE},
};

/// Process events in sequential mode
///
/// Events go through the same batches as in multi-threaded runs, so that
/// both modes merge counters in the same order.
///
pub fn run_producers_impl(
    events: &[Event],
    producers: &[Box<dyn Producer>],
) -> Result<RunResults> {
    let mut results = RunResults::default();
    for (batch_id, batch) in events.chunks(EVENT_BATCH_SIZE).enumerate() {
        results.merge(process_batch(batch_id * EVENT_BATCH_SIZE, batch, producers)?);
    }
    Ok(results)
}
