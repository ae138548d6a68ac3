//! This module takes care of scheduling the event processing work,
//! encapsulating use of multiple threads

#[cfg(not(feature = "multi-threading"))]
mod sequential;
#[cfg(feature = "multi-threading")]
mod multi_threading;

use crate::{error::Result, event::Event, producer::Producer, results::RunResults};

/// Size of the processed event batches
///
/// Events are independent. Batches amortize the cost of spawning tasks and
/// merging their results in multi-threaded mode, and both back-ends use the
/// same ones so that they yield the same results, in the same order.
///
const EVENT_BATCH_SIZE: usize = 1_000;

/// Run every producer over every event, in the manner that was configured at
/// build time.
///
/// Processing stops at the first event which a producer fails on.
///
pub fn run_producers(
    events: &[Event],
    producers: &[Box<dyn Producer>],
) -> Result<RunResults> {
    // ...in sequential mode
    #[cfg(not(feature = "multi-threading"))]
    {
        sequential::run_producers_impl(events, producers)
    }

    // ...in multi-threaded mode
    #[cfg(feature = "multi-threading")]
    {
        multi_threading::run_producers_impl(events, producers)
    }
}

/// Process a contiguous batch of events, `first_index` being the position of
/// the first of them in the input
fn process_batch(
    first_index: usize,
    events: &[Event],
    producers: &[Box<dyn Producer>],
) -> Result<RunResults> {
    let mut results = RunResults::default();
    for (offset, event) in events.iter().enumerate() {
        results.process(first_index + offset, event, producers)?;
    }
    Ok(results)
}
