//! FSR embedding: associating final-state radiation photons with leptons
//!
//!
//! # Introduction (for the physicist)
//!
//! Charged leptons coming out of a hard collision radiate photons. When such a
//! photon is energetic enough, it gets reconstructed as a separate particle,
//! and the lepton's momentum is accordingly lower than it should be. Getting
//! a Z boson's mass right in four-lepton analyses requires putting those
//! photons back.
//!
//! This crate takes care of the first half of the job: for every FSR photon
//! candidate of an event, it finds the lepton which most likely radiated it,
//! checks that the photon looks like a genuine, isolated radiation rather than
//! a piece of an electron's calorimeter cluster, and embeds a reference to the
//! photon into the lepton. Choosing which of the embedded photons actually
//! improves a Z candidate is left to later analysis steps.
//!
//!
//! # Introduction (for the computer guy)
//!
//! Electrons and muons are decorated by two separate producers which run on
//! the same read-only event. A photon only ever goes to its closest
//! identified lepton, so each producer also looks at the other flavor's
//! collection, and abstains when the photon is closer to one of those. This
//! is the only coordination between the two producers.
//!
//! * [`config`] loads a producer configuration,
//! * [`selector`] decides, once per lepton and per event, whether a lepton may
//!   own a photon,
//! * [`matcher`] runs the photons through the association pipeline,
//! * [`producer`] erases the lepton flavors so that producers can be picked
//!   at configuration time,
//! * [`scheduling`] runs the producers over a whole list of events.

#![warn(missing_docs)]

pub mod config;
pub mod counters;
pub mod error;
pub mod event;
pub mod idcut;
pub mod isolation;
pub mod lepton;
pub mod matcher;
pub mod momentum;
pub mod numeric;
pub mod output;
pub mod producer;
pub mod results;
pub mod scheduling;
pub mod selector;
pub mod veto;

pub use crate::{
    config::Configuration,
    counters::FsrCounters,
    error::{FsrError, Result},
    event::{Electron, Event, Muon, Photon, Vertex},
    lepton::{Flavor, Lepton},
    matcher::{Decision, Decorated, FsrEmbedder, FsrProduct, Stage},
    producer::Producer,
    results::RunResults,
};
