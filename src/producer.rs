//! Flavor-erased FSR producers, as instantiated from a configuration

use crate::{
    config::Configuration,
    counters::FsrCounters,
    error::Result,
    event::{Electron, Event, Muon},
    lepton::{Flavor, Lepton},
    matcher::FsrEmbedder,
};
use serde_json::Value;

/// A configured producer, whatever the flavor of the leptons it decorates
pub trait Producer: Send + Sync {
    /// Tag of the decorated collection, which also names the output
    fn name(&self) -> &str;

    /// Process one event, yielding the decorated collection as JSON along
    /// with the event's counters
    fn produce_json(&self, event: &Event) -> Result<(Value, FsrCounters)>;
}

impl<L: Lepton, A: Lepton> Producer for FsrEmbedder<L, A> {
    fn name(&self) -> &str {
        &self.config().src
    }

    fn produce_json(&self, event: &Event) -> Result<(Value, FsrCounters)> {
        let product = self.produce(event)?;
        Ok((serde_json::to_value(&product.leptons)?, product.counters))
    }
}

/// Build the producer requested by a configuration
pub fn build(cfg: Configuration) -> Result<Box<dyn Producer>> {
    Ok(match cfg.flavor {
        Flavor::Electron => Box::new(FsrEmbedder::<Electron, Muon>::new(cfg)?),
        Flavor::Muon => Box::new(FsrEmbedder::<Muon, Electron>::new(cfg)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        event::{Photon, Vertex},
        lepton::tests::muon,
        momentum::{from_pt_eta_phi_m, Point},
    };

    #[test]
    fn flavor_picks_the_lepton_types() {
        let cfg = Configuration::parse(
            "flavor muon\nsrc mus\nsrcAlt eles\nisoLabels iso\n\
             srcPho phos\nsrcVeto eles\nsrcVtx pvs",
        )
        .unwrap();
        let producer = build(cfg).unwrap();
        assert_eq!(producer.name(), "mus");

        let mut event = Event::default();
        event.muons.insert("mus".to_owned(), vec![muon(20., 0., 0.)]);
        event.electrons.insert("eles".to_owned(), Vec::new());
        event.photons.insert(
            "phos".to_owned(),
            vec![Photon {
                p4: from_pt_eta_phi_m(3., 0.05, 0., 0.),
                user_floats: [("iso".to_owned(), 0.2)].into_iter().collect(),
            }],
        );
        event.vertices.insert(
            "pvs".to_owned(),
            vec![Vertex {
                position: Point::zeros(),
            }],
        );

        let (json, counters) = producer.produce_json(&event).unwrap();
        assert_eq!(counters.n_pass_veto, 1);
        let mu = &json[0];
        assert_eq!(mu["is_pf_muon"], true);
        assert_eq!(mu["user_ints"]["nFSRCand"], 1);
        assert_eq!(mu["user_cands"]["FSRCand0"]["collection"], "phos");
        assert_eq!(mu["user_cands"]["FSRCand0"]["index"], 0);
    }

    #[test]
    fn missing_alternate_collection_is_reported() {
        let text = "flavor electron\nsrc eles\nsrcAlt mus\nisoLabels iso";
        let cfg = Configuration::parse(text).unwrap();
        let producer = build(cfg).unwrap();
        let mut event = Event::default();
        event.electrons.insert("eles".to_owned(), Vec::new());
        let err = producer.produce_json(&event).unwrap_err();
        assert!(err.to_string().contains("\"mus\""), "{err}");
    }
}
