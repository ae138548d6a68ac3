//! Cluster veto: photons too close to an electron are more likely to be a
//! piece of that electron's calorimeter cluster than a radiated photon

use crate::{
    error::Result,
    event::Electron,
    lepton::Lepton,
    momentum::{self, Direction},
    numeric::Float,
    selector::CandidateSelector,
};

/// Cluster veto cuts
#[derive(Clone, Debug, PartialEq)]
pub struct VetoCuts {
    /// Veto when an electron is within this ΔR...
    pub dr: Float,

    /// ...or within this |Δφ|...
    pub dphi: Float,

    /// ...and this |Δη| at the same time
    pub deta: Float,

    /// Only identified electrons may veto
    pub require_id: bool,

    /// Measure distances to the electron's supercluster rather than to its
    /// momentum, when the supercluster is known
    pub use_super_cluster: bool,
}

/// Cluster veto against one event's veto electrons
pub struct ClusterVeto<'ev> {
    /// Veto electrons
    electrons: CandidateSelector<'ev, Electron>,

    /// Veto cuts
    cuts: &'ev VetoCuts,
}
//
impl<'ev> ClusterVeto<'ev> {
    /// Prepare the cluster veto for an event
    pub fn new(electrons: CandidateSelector<'ev, Electron>, cuts: &'ev VetoCuts) -> Self {
        Self { electrons, cuts }
    }

    /// Whether a photon survives the veto
    ///
    /// `paired` is the index, within the veto collection, of the lepton which
    /// the photon is being associated with, if that lepton is itself one of
    /// the veto electrons. It may not veto its own photon.
    ///
    pub fn passes(&mut self, photon: Direction, paired: Option<usize>) -> Result<bool> {
        let electrons = self.electrons.leptons();
        for (index, electron) in electrons.iter().enumerate() {
            if Some(index) == paired {
                continue;
            }
            if self.cuts.require_id && !self.electrons.passes_id(index)? {
                continue;
            }
            let cluster = if self.cuts.use_super_cluster {
                electron.cluster_direction()
            } else {
                electron.direction()
            };
            if momentum::delta_r(photon, cluster) < self.cuts.dr {
                return Ok(false);
            }
            if momentum::abs_delta_phi(photon, cluster) < self.cuts.dphi
                && momentum::abs_delta_eta(photon, cluster) < self.cuts.deta
            {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
