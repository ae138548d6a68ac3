//! This module defines the properties and storage of reconstructed events
//!
//! An event is a bag of tagged collections, standing in for the framework's
//! per-event record store. Producers look their inputs up by tag and never
//! modify them.

use crate::{
    error::{FsrError, Result},
    momentum::{Direction, Momentum, Point},
    numeric::Float,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named scalar attributes attached to a reconstructed object
pub type UserFloats = BTreeMap<String, Float>;

/// Look up a named attribute, reporting which object lacked it
pub fn user_float(
    floats: &UserFloats,
    object: &'static str,
    index: usize,
    name: &str,
) -> Result<Float> {
    floats
        .get(name)
        .copied()
        .ok_or_else(|| FsrError::MissingAttribute {
            object,
            index,
            name: name.to_owned(),
        })
}

/// Reconstructed electron
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Electron {
    /// 4-momentum
    pub p4: Momentum,

    /// Electric charge (units of e)
    pub charge: i32,

    /// Point of closest approach of the GSF track to the beam line
    pub vertex: Point,

    /// Barycenter of the electron's supercluster, if known
    #[serde(default)]
    pub super_cluster: Option<Direction>,

    /// Identification and isolation variables
    #[serde(default)]
    pub user_floats: UserFloats,
}

/// Reconstructed muon
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Muon {
    /// 4-momentum
    pub p4: Momentum,

    /// Electric charge (units of e)
    pub charge: i32,

    /// Point of closest approach of the best track to the beam line
    pub vertex: Point,

    /// Reconstructed by the particle-flow algorithm
    #[serde(default)]
    pub is_pf_muon: bool,

    /// Reconstructed from a muon-system track fitted with the tracker
    #[serde(default)]
    pub is_global_muon: bool,

    /// Reconstructed from a tracker track matched to muon segments
    #[serde(default)]
    pub is_tracker_muon: bool,

    /// Identification and isolation variables
    #[serde(default)]
    pub user_floats: UserFloats,
}

/// FSR photon candidate (a particle-flow photon)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Photon {
    /// 4-momentum
    pub p4: Momentum,

    /// Isolation components and other variables
    #[serde(default)]
    pub user_floats: UserFloats,
}

/// Reconstructed vertex
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Vertex position
    pub position: Point,
}

/// Storage for one reconstructed event
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    /// Electron collections by tag
    pub electrons: BTreeMap<String, Vec<Electron>>,

    /// Muon collections by tag
    pub muons: BTreeMap<String, Vec<Muon>>,

    /// Photon collections by tag
    pub photons: BTreeMap<String, Vec<Photon>>,

    /// Vertex collections by tag
    pub vertices: BTreeMap<String, Vec<Vertex>>,
}
//
impl Event {
    /// Access an electron collection
    pub fn electrons(&self, tag: &str) -> Result<&[Electron]> {
        lookup(&self.electrons, "electron", tag)
    }

    /// Access a muon collection
    pub fn muons(&self, tag: &str) -> Result<&[Muon]> {
        lookup(&self.muons, "muon", tag)
    }

    /// Access a photon collection
    pub fn photons(&self, tag: &str) -> Result<&[Photon]> {
        lookup(&self.photons, "photon", tag)
    }

    /// Access the primary vertex, i.e. the first one of a vertex collection
    ///
    /// An empty collection is only an error once some cut actually needs the
    /// vertex, see [`PrimaryVertex::position`].
    ///
    pub fn primary_vertex<'ev>(&'ev self, tag: &'ev str) -> Result<PrimaryVertex<'ev>> {
        let vertices = lookup(&self.vertices, "vertex", tag)?;
        Ok(PrimaryVertex {
            tag,
            vertex: vertices.first(),
        })
    }
}

/// Tagged collection lookup
fn lookup<'ev, T>(
    collections: &'ev BTreeMap<String, Vec<T>>,
    kind: &'static str,
    tag: &str,
) -> Result<&'ev [T]> {
    collections
        .get(tag)
        .map(Vec::as_slice)
        .ok_or_else(|| FsrError::missing_collection(kind, tag))
}

/// The vertex which impact parameter cuts are measured against
#[derive(Clone, Copy, Debug)]
pub struct PrimaryVertex<'ev> {
    tag: &'ev str,
    vertex: Option<&'ev Vertex>,
}
//
impl<'ev> PrimaryVertex<'ev> {
    /// Wrap an existing vertex (mostly useful for testing)
    pub fn new(tag: &'ev str, vertex: Option<&'ev Vertex>) -> Self {
        Self { tag, vertex }
    }

    /// Position of the primary vertex
    pub fn position(&self) -> Result<&'ev Point> {
        self.vertex
            .map(|vertex| &vertex.position)
            .ok_or_else(|| FsrError::NoPrimaryVertex(self.tag.to_owned()))
    }
}
