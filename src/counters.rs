//! Diagnostic counters of the FSR pipeline, accumulated across events

use serde::Serialize;
use std::ops::AddAssign;
use tracing::info;

/// How many photons made it through each stage of the pipeline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FsrCounters {
    /// Number of processed events
    pub n_events: usize,

    /// Photons which entered the pipeline
    pub n_pass_pre: usize,

    /// Photons for which a best lepton was found
    pub n_have_best: usize,

    /// Photons which passed the isolation cut
    pub n_pass_iso: usize,

    /// Photons which passed the cluster veto, and were thus embedded
    pub n_pass_veto: usize,
}
//
impl FsrCounters {
    /// Integrate counts from another event or batch of events
    #[allow(clippy::needless_pass_by_value)]
    pub fn merge(&mut self, other: Self) {
        self.n_events += other.n_events;
        self.n_pass_pre += other.n_pass_pre;
        self.n_have_best += other.n_have_best;
        self.n_pass_iso += other.n_pass_iso;
        self.n_pass_veto += other.n_pass_veto;
    }

    /// Log the counts of a producer
    pub fn report(&self, producer: &str) {
        info!(
            producer,
            n_events = self.n_events,
            n_pass_pre = self.n_pass_pre,
            n_have_best = self.n_have_best,
            n_pass_iso = self.n_pass_iso,
            n_pass_veto = self.n_pass_veto,
            "FSR photon selection summary"
        );
    }
}

impl AddAssign for FsrCounters {
    fn add_assign(&mut self, other: Self) {
        self.merge(other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merging_adds_up_every_counter() {
        let mut total = FsrCounters {
            n_events: 1,
            n_pass_pre: 4,
            n_have_best: 3,
            n_pass_iso: 2,
            n_pass_veto: 1,
        };
        total += FsrCounters {
            n_events: 2,
            n_pass_pre: 10,
            n_have_best: 5,
            n_pass_iso: 5,
            n_pass_veto: 4,
        };
        assert_eq!(
            total,
            FsrCounters {
                n_events: 3,
                n_pass_pre: 14,
                n_have_best: 8,
                n_pass_iso: 7,
                n_pass_veto: 5,
            }
        );
    }

    #[test]
    fn counters_use_framework_names() {
        let json = serde_json::to_value(FsrCounters::default()).unwrap();
        for key in ["nEvents", "nPassPre", "nHaveBest", "nPassIso", "nPassVeto"] {
            assert_eq!(json[key], 0, "{key}");
        }
    }
}
