//! What the FSR algorithm needs to know about a lepton, whatever its flavor

use crate::{
    error::Result,
    event::{user_float, Electron, Event, Muon, PrimaryVertex, UserFloats},
    idcut::{IdCuts, LeptonCuts},
    momentum::{self, Direction, Momentum, Point},
    numeric::Float,
};
use serde::Serialize;

/// Name of the 3D impact parameter significance attribute
pub const SIP3D: &str = "SIP3D";

/// Lepton flavors that can own FSR photons
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flavor {
    /// Electrons
    Electron,
    /// Muons
    Muon,
}

/// Capabilities of a lepton as seen by the FSR algorithm
pub trait Lepton: Clone + Serialize + Send + Sync + 'static {
    /// Flavor of this lepton type
    const FLAVOR: Flavor;

    /// Human-readable name of this lepton type, for diagnostics
    const NAME: &'static str;

    /// Look up a tagged collection of leptons of this type
    fn collection<'ev>(event: &'ev Event, tag: &str) -> Result<&'ev [Self]>;

    /// 4-momentum
    fn p4(&self) -> &Momentum;

    /// Point of closest approach of the lepton's track to the beam line
    fn reference_point(&self) -> &Point;

    /// Named scalar attributes
    fn user_floats(&self) -> &UserFloats;

    /// Flavor-specific part of the identification, run after the common
    /// kinematic and impact parameter cuts have passed
    fn passes_flavor_id(&self, index: usize, cuts: &IdCuts) -> Result<bool>;

    /// Kinematic and impact parameter cuts which apply to this flavor
    fn common_cuts(cuts: &IdCuts) -> &LeptonCuts;

    /// Direction of the lepton
    fn direction(&self) -> Direction {
        Direction::of(self.p4())
    }

    /// Look up a named attribute, `index` being the position of the lepton
    /// in its collection
    fn user_float(&self, index: usize, name: &str) -> Result<Float> {
        user_float(self.user_floats(), Self::NAME, index, name)
    }

    /// Transverse impact parameter with respect to the primary vertex
    fn dxy(&self, pv: &PrimaryVertex) -> Result<Float> {
        Ok(momentum::dxy(self.reference_point(), self.p4(), pv.position()?))
    }

    /// Longitudinal impact parameter with respect to the primary vertex
    fn dz(&self, pv: &PrimaryVertex) -> Result<Float> {
        Ok(momentum::dz(self.reference_point(), self.p4(), pv.position()?))
    }

    /// Full identification decision. Cuts are applied in order, and an
    /// attribute is only looked up once every cut before it has passed.
    fn passes_id(&self, index: usize, cuts: &IdCuts, pv: &PrimaryVertex) -> Result<bool> {
        let common = Self::common_cuts(cuts);
        let p4 = self.p4();
        if momentum::pt(p4) < common.pt {
            return Ok(false);
        }
        if momentum::eta(p4).abs() > common.max_eta {
            return Ok(false);
        }
        if self.user_float(index, SIP3D)?.abs() > common.sip {
            return Ok(false);
        }
        if self.dxy(pv)?.abs() > common.pv_dxy {
            return Ok(false);
        }
        if self.dz(pv)?.abs() > common.pv_dz {
            return Ok(false);
        }
        self.passes_flavor_id(index, cuts)
    }
}

impl Lepton for Electron {
    const FLAVOR: Flavor = Flavor::Electron;
    const NAME: &'static str = "electron";

    fn collection<'ev>(event: &'ev Event, tag: &str) -> Result<&'ev [Self]> {
        event.electrons(tag)
    }

    fn p4(&self) -> &Momentum {
        &self.p4
    }

    fn reference_point(&self) -> &Point {
        &self.vertex
    }

    fn user_floats(&self) -> &UserFloats {
        &self.user_floats
    }

    fn common_cuts(cuts: &IdCuts) -> &LeptonCuts {
        &cuts.electron.kinematics
    }

    fn passes_flavor_id(&self, index: usize, cuts: &IdCuts) -> Result<bool> {
        let cuts = &cuts.electron;
        let score = self.user_float(index, &cuts.id_label)?;
        Ok(cuts.keep_score(
            score,
            momentum::pt(&self.p4),
            momentum::eta(&self.p4).abs(),
        ))
    }
}

impl Electron {
    /// Direction of the electron's calorimeter cluster, falling back to its
    /// momentum direction when the supercluster is unknown
    pub fn cluster_direction(&self) -> Direction {
        self.super_cluster.unwrap_or_else(|| Direction::of(&self.p4))
    }
}

impl Lepton for Muon {
    const FLAVOR: Flavor = Flavor::Muon;
    const NAME: &'static str = "muon";

    fn collection<'ev>(event: &'ev Event, tag: &str) -> Result<&'ev [Self]> {
        event.muons(tag)
    }

    fn p4(&self) -> &Momentum {
        &self.p4
    }

    fn reference_point(&self) -> &Point {
        &self.vertex
    }

    fn user_floats(&self) -> &UserFloats {
        &self.user_floats
    }

    fn common_cuts(cuts: &IdCuts) -> &LeptonCuts {
        &cuts.muon
    }

    fn passes_flavor_id(&self, _index: usize, _cuts: &IdCuts) -> Result<bool> {
        Ok(self.is_pf_muon && (self.is_global_muon || self.is_tracker_muon))
    }
}
