//! This module allows accumulating producer outputs across events

use crate::{
    counters::FsrCounters,
    error::{FsrError, Result},
    event::Event,
    producer::Producer,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Decorated collections of one event, by producer name
pub type EventOutput = BTreeMap<String, Value>;

/// Accumulated results of a run, in event order
#[derive(Debug, Default, Serialize)]
pub struct RunResults {
    /// Outputs of each event
    pub events: Vec<EventOutput>,

    /// Counters of each producer
    pub counters: BTreeMap<String, FsrCounters>,
}
//
impl RunResults {
    /// Run every producer over one event, and integrate the outcome
    ///
    /// `index` is the position of the event in the input, for diagnostics.
    ///
    pub fn process(
        &mut self,
        index: usize,
        event: &Event,
        producers: &[Box<dyn Producer>],
    ) -> Result<()> {
        let mut output = EventOutput::new();
        for producer in producers {
            let name = producer.name();
            let (decorated, counters) =
                producer.produce_json(event).map_err(|source| FsrError::InEvent {
                    index,
                    producer: name.to_owned(),
                    source: Box::new(source),
                })?;
            output.insert(name.to_owned(), decorated);
            *self.counters.entry(name.to_owned()).or_default() += counters;
        }
        self.events.push(output);
        Ok(())
    }

    /// Integrate the results of the following events
    #[allow(clippy::needless_pass_by_value)]
    pub fn merge(&mut self, other: Self) {
        self.events.extend(other.events);
        for (name, counters) in other.counters {
            *self.counters.entry(name).or_default() += counters;
        }
    }

    /// Number of integrated events
    pub fn num_events(&self) -> usize {
        self.events.len()
    }
}
