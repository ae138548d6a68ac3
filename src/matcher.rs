//! Association of FSR photons with the leptons that radiated them
//!
//! Every photon of the event goes through the same pipeline:
//!
//! * find the closest identified lepton within `dROuter`, giving up if the
//!   lepton collection of the other flavor has a strictly closer one,
//! * pick the inner or outer cone cuts depending on the distance to it,
//! * cut on the photon's isolation, pt and |eta|,
//! * apply the cluster veto,
//! * embed the photon in the lepton.
//!
//! The first failing step ends the photon's journey. Only the decorated
//! lepton collection and the diagnostic counters come out of it.

use crate::{
    config::Configuration,
    counters::FsrCounters,
    error::{FsrError, Result},
    event::{Event, Photon},
    isolation::relative_isolation,
    lepton::{Flavor, Lepton},
    momentum::{self, Direction},
    numeric::Float,
    selector::CandidateSelector,
    veto::ClusterVeto,
};
use serde::Serialize;
use std::{collections::BTreeMap, marker::PhantomData};
use tracing::{debug, trace};

/// Photon association and selection cuts
#[derive(Clone, Debug, PartialEq)]
pub struct FsrCuts {
    /// Photons closer than this to their lepton use the inner cuts
    pub dr_inner: Float,

    /// Photons must be closer than this to their lepton
    pub dr_outer: Float,

    /// Maximal isolation within `dr_inner`
    pub iso_inner: Float,

    /// Maximal isolation between `dr_inner` and `dr_outer`
    pub iso_outer: Float,

    /// Minimal pt within `dr_inner`
    pub pt_inner: Float,

    /// Minimal pt between `dr_inner` and `dr_outer`
    pub pt_outer: Float,

    /// Maximal photon |eta|
    pub max_eta: Float,
}
//
impl FsrCuts {
    /// Cuts applying to a photon at distance `dr` from its lepton
    pub fn band(&self, dr: Float) -> Band {
        if dr < self.dr_inner {
            Band {
                inner: true,
                max_iso: self.iso_inner,
                min_pt: self.pt_inner,
            }
        } else {
            Band {
                inner: false,
                max_iso: self.iso_outer,
                min_pt: self.pt_outer,
            }
        }
    }
}

/// Distance band of a photon around its lepton, and the cuts that go with it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    /// Whether this is the inner band
    pub inner: bool,

    /// Maximal isolation
    pub max_iso: Float,

    /// Minimal pt
    pub min_pt: Float,
}

/// Pipeline steps which can reject a photon
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// No suitable lepton, or a closer one of the other flavor
    BestLepton,
    /// Isolation cut of the distance band
    Isolation,
    /// Pt cut of the distance band
    Pt,
    /// |eta| cut
    Eta,
    /// Cluster veto
    ClusterVeto,
}

/// Fate of a photon
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Embedded in the lepton at index `lepton` of the decorated collection,
    /// with rank `rank` among that lepton's photons
    Embedded {
        /// Lepton index
        lepton: usize,
        /// Rank of the photon in the lepton
        rank: usize,
    },
    /// Left out at some stage of the pipeline
    Rejected(Stage),
}

/// Reference to an object of a tagged event collection
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CandidateRef {
    /// Collection tag
    pub collection: String,

    /// Index within the collection
    pub index: usize,
}

/// An output lepton, along with the data embedded into it
#[derive(Clone, Debug, Serialize)]
pub struct Decorated<L> {
    /// The lepton itself
    #[serde(flatten)]
    pub object: L,

    /// Embedded integers
    pub user_ints: BTreeMap<String, usize>,

    /// Embedded object references
    pub user_cands: BTreeMap<String, CandidateRef>,
}
//
impl<L> Decorated<L> {
    /// Start decorating a lepton
    fn new(object: L) -> Self {
        Self {
            object,
            user_ints: BTreeMap::new(),
            user_cands: BTreeMap::new(),
        }
    }

    /// Access an embedded integer
    pub fn user_int(&self, name: &str) -> Option<usize> {
        self.user_ints.get(name).copied()
    }

    /// Access an embedded object reference
    pub fn user_cand(&self, name: &str) -> Option<&CandidateRef> {
        self.user_cands.get(name)
    }
}

/// Name of the embedded photon count
pub fn count_name(label: &str) -> String {
    format!("n{label}")
}

/// Name of the embedded reference to the photon of a given rank
pub fn cand_name(label: &str, rank: usize) -> String {
    format!("{label}{rank}")
}

/// Output of an FSR producer for one event
#[derive(Clone, Debug, Serialize)]
pub struct FsrProduct<L> {
    /// Decorated copy of the input lepton collection, in input order
    pub leptons: Vec<Decorated<L>>,

    /// Fate of each photon, in input order
    #[serde(skip)]
    pub decisions: Vec<Decision>,

    /// Diagnostic counters for this event
    pub counters: FsrCounters,
}

/// FSR producer decorating leptons of type `L`, yielding photons to closer
/// leptons of type `A`
pub struct FsrEmbedder<L, A> {
    /// Configuration
    cfg: Configuration,

    /// Lepton types in use
    flavors: PhantomData<fn() -> (L, A)>,
}
//
impl<L: Lepton, A: Lepton> FsrEmbedder<L, A> {
    /// Set up the producer
    pub fn new(cfg: Configuration) -> Result<Self> {
        if cfg.flavor != L::FLAVOR {
            return Err(FsrError::inconsistent(format!(
                "{} producer configured for {:?} flavor",
                L::NAME,
                cfg.flavor
            )));
        }
        if A::FLAVOR == L::FLAVOR {
            return Err(FsrError::inconsistent(
                "alternate leptons must be of the other flavor",
            ));
        }
        Ok(Self {
            cfg,
            flavors: PhantomData,
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &Configuration {
        &self.cfg
    }

    /// Process one event
    ///
    /// The event is left untouched: the decorated leptons are copies.
    ///
    pub fn produce(&self, event: &Event) -> Result<FsrProduct<L>> {
        let cfg = &self.cfg;
        let primary = L::collection(event, &cfg.src)?;
        let alternate = A::collection(event, &cfg.src_alt)?;
        let photons = event.photons(&cfg.src_pho)?;
        let veto_electrons = event.electrons(&cfg.src_veto)?;
        let pv = event.primary_vertex(&cfg.src_vtx)?;

        let mut matcher = EventMatcher {
            cfg,
            photons,
            primary: CandidateSelector::new(primary, &cfg.id, pv),
            alternate: CandidateSelector::new(alternate, &cfg.id, pv),
            veto: ClusterVeto::new(
                CandidateSelector::new(veto_electrons, &cfg.id, pv),
                &cfg.veto,
            ),
            primary_is_veto: L::FLAVOR == Flavor::Electron && cfg.src == cfg.src_veto,
            owned: vec![Vec::new(); primary.len()],
            counters: FsrCounters {
                n_events: 1,
                ..FsrCounters::default()
            },
        };
        let decisions = (0..photons.len())
            .map(|index| matcher.process_photon(index))
            .collect::<Result<Vec<_>>>()?;
        Ok(matcher.finish(decisions))
    }
}

/// Matching state for one event
struct EventMatcher<'ev, L: Lepton, A: Lepton> {
    /// Configuration
    cfg: &'ev Configuration,

    /// FSR photon candidates
    photons: &'ev [Photon],

    /// Leptons to be decorated
    primary: CandidateSelector<'ev, L>,

    /// Leptons of the other flavor
    alternate: CandidateSelector<'ev, A>,

    /// Cluster veto
    veto: ClusterVeto<'ev>,

    /// Whether the primary collection is also the veto collection
    primary_is_veto: bool,

    /// Indices of the photons owned by each primary lepton, in rank order
    owned: Vec<Vec<usize>>,

    /// Diagnostic counters
    counters: FsrCounters,
}
//
impl<'ev, L: Lepton, A: Lepton> EventMatcher<'ev, L, A> {
    /// Find the lepton which a photon should be associated with, if any
    ///
    /// Returns its index in the primary collection and its distance to the
    /// photon. A strictly closer identified lepton of the other flavor means
    /// that the photon belongs to that lepton, and hence to the producer of
    /// the other flavor.
    ///
    fn find_best_lepton(&mut self, photon: Direction) -> Result<Option<(usize, Float)>> {
        let max_dr = self.cfg.fsr.dr_outer;
        let Some((best, best_dr)) = self.primary.closest(photon, max_dr)? else {
            return Ok(None);
        };
        match self.alternate.closest(photon, max_dr)? {
            Some((_, alt_dr)) if alt_dr < best_dr => Ok(None),
            _ => Ok(Some((best, best_dr))),
        }
    }

    /// Run one photon through the pipeline
    fn process_photon(&mut self, index: usize) -> Result<Decision> {
        let photons = self.photons;
        let photon = &photons[index];
        let direction = Direction::of(&photon.p4);
        self.counters.n_pass_pre += 1;

        let Some((lepton, dr)) = self.find_best_lepton(direction)? else {
            return Ok(self.reject(index, Stage::BestLepton));
        };
        self.counters.n_have_best += 1;

        let band = self.cfg.fsr.band(dr);

        let iso = relative_isolation(photon, index, &self.cfg.iso_labels)?;
        if iso > band.max_iso {
            return Ok(self.reject(index, Stage::Isolation));
        }
        self.counters.n_pass_iso += 1;

        if momentum::pt(&photon.p4) < band.min_pt {
            return Ok(self.reject(index, Stage::Pt));
        }

        if direction.eta.abs() > self.cfg.fsr.max_eta {
            return Ok(self.reject(index, Stage::Eta));
        }

        let paired = self.primary_is_veto.then_some(lepton);
        if !self.veto.passes(direction, paired)? {
            return Ok(self.reject(index, Stage::ClusterVeto));
        }
        self.counters.n_pass_veto += 1;

        let rank = self.embed(lepton, index);
        debug!(
            photon = index,
            lepton,
            rank,
            dr,
            inner = band.inner,
            "embedded FSR photon"
        );
        Ok(Decision::Embedded { lepton, rank })
    }

    /// Record a rejection
    fn reject(&self, index: usize, stage: Stage) -> Decision {
        trace!(photon = index, ?stage, "rejected FSR photon");
        Decision::Rejected(stage)
    }

    /// Give a photon to a lepton, returning its rank among the lepton's
    /// photons
    fn embed(&mut self, lepton: usize, photon: usize) -> usize {
        let owned = &mut self.owned[lepton];
        owned.push(photon);
        owned.len() - 1
    }

    /// Build the decorated lepton collection
    fn finish(self, decisions: Vec<Decision>) -> FsrProduct<L> {
        let cfg = self.cfg;
        let count_name = count_name(&cfg.label);
        let leptons = self
            .primary
            .leptons()
            .iter()
            .zip(self.owned)
            .map(|(lepton, photons)| {
                let mut decorated = Decorated::new(lepton.clone());
                decorated
                    .user_ints
                    .insert(count_name.clone(), photons.len());
                for (rank, index) in photons.into_iter().enumerate() {
                    decorated.user_cands.insert(
                        cand_name(&cfg.label, rank),
                        CandidateRef {
                            collection: cfg.src_pho.clone(),
                            index,
                        },
                    );
                }
                decorated
            })
            .collect();
        debug!(
            src = %cfg.src,
            n_photons = self.photons.len(),
            n_embedded = self.counters.n_pass_veto,
            "processed event"
        );
        FsrProduct {
            leptons,
            decisions,
            counters: self.counters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        event::{Electron, Muon, Vertex},
        lepton::tests::{electron, muon},
        momentum::{from_pt_eta_phi_m, Point},
    };

    const ISO: &str = "fsrIso";

    fn config(flavor: &str, extra: &str) -> Configuration {
        let (src, alt) = match flavor {
            "electron" => ("slimmedElectrons", "slimmedMuons"),
            _ => ("slimmedMuons", "slimmedElectrons"),
        };
        let text = format!("flavor {flavor}\nsrc {src}\nsrcAlt {alt}\nisoLabels {ISO}\n{extra}");
        Configuration::parse(&text).unwrap()
    }

    fn photon(pt: Float, eta: Float, phi: Float, iso: Float) -> Photon {
        Photon {
            p4: from_pt_eta_phi_m(pt, eta, phi, 0.),
            user_floats: [(ISO.to_owned(), iso)].into_iter().collect(),
        }
    }

    fn event(electrons: Vec<Electron>, muons: Vec<Muon>, photons: Vec<Photon>) -> Event {
        let mut event = Event::default();
        event.electrons.insert("slimmedElectrons".to_owned(), electrons);
        event.muons.insert("slimmedMuons".to_owned(), muons);
        event.photons.insert("boostedFsrPhotons".to_owned(), photons);
        event.vertices.insert(
            "selectedPrimaryVertex".to_owned(),
            vec![Vertex {
                position: Point::zeros(),
            }],
        );
        event
    }

    fn muon_embedder(extra: &str) -> FsrEmbedder<Muon, Electron> {
        FsrEmbedder::new(config("muon", extra)).unwrap()
    }

    #[test]
    fn band_selection() {
        let cuts = config("muon", "").fsr;
        let inner = cuts.band(0.05);
        assert!(inner.inner);
        assert_eq!((inner.max_iso, inner.min_pt), (9999.9, 2.0));
        let outer = cuts.band(0.07);
        assert!(!outer.inner);
        assert_eq!((outer.max_iso, outer.min_pt), (1.0, 4.0));
    }

    #[test]
    fn inner_photon_is_embedded() {
        let ev = event(vec![], vec![muon(20., 0., 0.)], vec![photon(3.0, 0.05, 0., 0.5)]);
        let product = muon_embedder("").produce(&ev).unwrap();
        assert_eq!(product.decisions, vec![Decision::Embedded { lepton: 0, rank: 0 }]);
        let mu = &product.leptons[0];
        assert_eq!(mu.user_int("nFSRCand"), Some(1));
        assert_eq!(
            mu.user_cand("FSRCand0"),
            Some(&CandidateRef {
                collection: "boostedFsrPhotons".to_owned(),
                index: 0
            })
        );
        assert_eq!(product.counters.n_pass_veto, 1);
    }

    #[test]
    fn soft_inner_photon_fails_pt() {
        let ev = event(vec![], vec![muon(20., 0., 0.)], vec![photon(1.5, 0.05, 0., 0.5)]);
        let product = muon_embedder("").produce(&ev).unwrap();
        assert_eq!(product.decisions, vec![Decision::Rejected(Stage::Pt)]);
        assert_eq!(
            product.counters,
            FsrCounters {
                n_events: 1,
                n_pass_pre: 1,
                n_have_best: 1,
                n_pass_iso: 1,
                n_pass_veto: 0,
            }
        );
        assert_eq!(product.leptons[0].user_int("nFSRCand"), Some(0));
        assert!(product.leptons[0].user_cands.is_empty());
    }

    #[test]
    fn outer_photon_uses_outer_cuts() {
        // Fine in the inner band, too soft and too isolated for the outer one
        let soft = photon(3.0, 0.2, 0., 0.5);
        let dirty = photon(5.0, 0.2, 0., 1.5);
        let good = photon(5.0, 0.2, 0., 0.5);
        let ev = event(vec![], vec![muon(20., 0., 0.)], vec![soft, dirty, good]);
        let product = muon_embedder("").produce(&ev).unwrap();
        assert_eq!(
            product.decisions,
            vec![
                Decision::Rejected(Stage::Pt),
                Decision::Rejected(Stage::Isolation),
                Decision::Embedded { lepton: 0, rank: 0 },
            ]
        );
        assert_eq!(product.leptons[0].user_cand("FSRCand0").unwrap().index, 2);
    }

    #[test]
    fn forward_photon_fails_eta() {
        let ev = event(
            vec![],
            vec![muon(20., 2.3, 0.)],
            vec![photon(10., 2.45, 0., 0.1)],
        );
        let product = muon_embedder("").produce(&ev).unwrap();
        assert_eq!(product.decisions, vec![Decision::Rejected(Stage::Eta)]);
    }

    #[test]
    fn photon_without_lepton_is_dropped() {
        let ev = event(vec![], vec![muon(20., 0., 0.)], vec![photon(10., 0., 1.0, 0.1)]);
        let product = muon_embedder("").produce(&ev).unwrap();
        assert_eq!(product.decisions, vec![Decision::Rejected(Stage::BestLepton)]);
        assert_eq!(product.counters.n_have_best, 0);
        assert_eq!(product.counters.n_pass_pre, 1);
    }

    #[test]
    fn closer_alternate_lepton_takes_the_photon() {
        let ev = event(
            vec![electron(20., 0., 0.1, 0.9)],
            vec![muon(20., 0., 0.2)],
            vec![photon(10., 0., 0.12, 0.1)],
        );
        let product = muon_embedder("").produce(&ev).unwrap();
        assert_eq!(product.decisions, vec![Decision::Rejected(Stage::BestLepton)]);
    }

    #[test]
    fn unidentified_alternate_lepton_does_not_compete() {
        let ev = event(
            vec![electron(20., 0., 0.1, -0.9)],
            vec![muon(20., 0., 0.2)],
            vec![photon(10., 0., 0.12, 0.1)],
        );
        let product = muon_embedder("vetoRequireID true").produce(&ev).unwrap();
        assert_eq!(product.decisions, vec![Decision::Embedded { lepton: 0, rank: 0 }]);
    }

    #[test]
    fn cluster_veto_rejects() {
        // The electron is far enough not to compete for the photon, but it is
        // within the veto's Δφ/Δη window
        let ev = event(
            vec![electron(20., 0.03, 1.0, 0.9)],
            vec![muon(20., 0., 0.)],
            vec![photon(10., 0., 0.1, 0.1)],
        );
        let product = muon_embedder("").produce(&ev).unwrap();
        assert_eq!(product.decisions, vec![Decision::Rejected(Stage::ClusterVeto)]);
        assert_eq!(product.counters.n_pass_iso, 1);
        assert_eq!(product.counters.n_pass_veto, 0);
    }

    #[test]
    fn electron_does_not_veto_its_own_photon() {
        let ev = event(
            vec![electron(20., 0., 0., 0.9)],
            vec![],
            vec![photon(10., 0., 0.05, 0.1)],
        );
        let embedder: FsrEmbedder<Electron, Muon> =
            FsrEmbedder::new(config("electron", "")).unwrap();
        let product = embedder.produce(&ev).unwrap();
        assert_eq!(product.decisions, vec![Decision::Embedded { lepton: 0, rank: 0 }]);
    }

    #[test]
    fn ranks_are_contiguous() {
        let ev = event(
            vec![],
            vec![muon(20., 0., 0.), muon(20., 0., 2.0)],
            vec![
                photon(10., 0., 0.1, 0.1),
                photon(10., 0., 1.9, 0.1),
                photon(10., 0., 1.0, 0.1),
                photon(10., 0., -0.1, 0.1),
            ],
        );
        let product = muon_embedder("").produce(&ev).unwrap();
        let first = &product.leptons[0];
        assert_eq!(first.user_int("nFSRCand"), Some(2));
        assert_eq!(first.user_cand("FSRCand0").unwrap().index, 0);
        assert_eq!(first.user_cand("FSRCand1").unwrap().index, 3);
        let second = &product.leptons[1];
        assert_eq!(second.user_int("nFSRCand"), Some(1));
        assert_eq!(second.user_cand("FSRCand0").unwrap().index, 1);
        assert_eq!(product.decisions[2], Decision::Rejected(Stage::BestLepton));
    }

    #[test]
    fn photon_count_matches_embedded_references() {
        let photons = (1..=40)
            .map(|k| photon(10., 0., 0.001 * k as Float, 0.1))
            .collect();
        let ev = event(vec![], vec![muon(20., 0., 0.)], photons);
        let product = muon_embedder("").produce(&ev).unwrap();
        let mu = &product.leptons[0];
        assert_eq!(mu.user_int("nFSRCand"), Some(40));
        assert_eq!(mu.user_cands.len(), 40);
        assert_eq!(mu.user_cand("FSRCand39").unwrap().index, 39);
    }

    #[test]
    fn custom_label() {
        let ev = event(vec![], vec![muon(20., 0., 0.)], vec![photon(3.0, 0.05, 0., 0.5)]);
        let product = muon_embedder("userLabel FSRPho").produce(&ev).unwrap();
        assert_eq!(product.leptons[0].user_int("nFSRPho"), Some(1));
        assert!(product.leptons[0].user_cand("FSRPho0").is_some());
    }

    #[test]
    fn mismatched_flavor_is_a_config_error() {
        let err = FsrEmbedder::<Electron, Muon>::new(config("muon", "")).err().unwrap();
        assert!(err.is_config_error());
        let err = FsrEmbedder::<Muon, Muon>::new(config("muon", "")).err().unwrap();
        assert!(err.is_config_error());
    }

    #[test]
    fn missing_isolation_aborts_the_event() {
        let mut pho = photon(3.0, 0.05, 0., 0.5);
        pho.user_floats.clear();
        let ev = event(vec![], vec![muon(20., 0., 0.)], vec![pho]);
        let err = muon_embedder("").produce(&ev).unwrap_err();
        assert!(matches!(err, FsrError::MissingAttribute { object: "photon", .. }));
    }

    #[test]
    fn input_is_left_untouched() {
        let ev = event(vec![], vec![muon(20., 0., 0.)], vec![photon(3.0, 0.05, 0., 0.5)]);
        let before = ev.muons["slimmedMuons"].clone();
        let product = muon_embedder("").produce(&ev).unwrap();
        assert_eq!(ev.muons["slimmedMuons"], before);
        assert_eq!(product.leptons[0].object, before[0]);
    }
}
