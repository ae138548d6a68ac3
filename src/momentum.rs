//! This module implements some domain-specific 4-momentum handling logic.
//!
//! Collider observables (transverse momentum, pseudorapidity, azimuth) are
//! derived on the fly from the cartesian 4-momentum, the same way the
//! reconstruction framework's candidates expose them.

use crate::numeric::{
    angles::{PI, TAU},
    Float,
};
use nalgebra::{SVector, Vector3};
use serde::{Deserialize, Serialize};

/// 4-momentum dimension
pub const MOMENTUM_DIM: usize = 4;

/// Relativistic 4-momentum
pub type Momentum = SVector<Float, MOMENTUM_DIM>;

/// Position in the detector frame (cm)
pub type Point = Vector3<Float>;

/// Convenience const for accessing the X coordinate of a 4-vector
pub const X: usize = 0;

/// Convenience const for accessing the Y coordinate of a 4-vector
pub const Y: usize = 1;

/// Convenience const for accessing the Z coordinate of a 4-vector
pub const Z: usize = 2;

/// Convenience const for accessing the E coordinate of a 4-vector
pub const E: usize = 3;

/// Build a 4-momentum from collider coordinates and a mass
pub fn from_pt_eta_phi_m(pt: Float, eta: Float, phi: Float, mass: Float) -> Momentum {
    let px = pt * phi.cos();
    let py = pt * phi.sin();
    let pz = pt * eta.sinh();
    let e = (px * px + py * py + pz * pz + mass * mass).sqrt();
    Momentum::new(px, py, pz, e)
}

/// Transverse momentum
pub fn pt(p: &Momentum) -> Float {
    p[X].hypot(p[Y])
}

/// Pseudorapidity
///
/// Purely longitudinal momenta map to infinite pseudorapidity, which fails
/// every acceptance cut as it should.
///
pub fn eta(p: &Momentum) -> Float {
    (p[Z] / pt(p)).asinh()
}

/// Azimuthal angle, in [-π, π]
pub fn phi(p: &Momentum) -> Float {
    p[Y].atan2(p[X])
}

/// A direction in (eta, phi) space, e.g. the barycenter of a calorimeter
/// cluster
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Direction {
    /// Pseudorapidity
    pub eta: Float,

    /// Azimuthal angle
    pub phi: Float,
}
//
impl Direction {
    /// Direction of a 4-momentum
    pub fn of(p: &Momentum) -> Self {
        Self {
            eta: eta(p),
            phi: phi(p),
        }
    }
}

/// Azimuthal separation, wrapped into [-π, π]
///
/// Any finite input wraps in constant time, however many turns away.
///
pub fn delta_phi(phi1: Float, phi2: Float) -> Float {
    (phi1 - phi2 + PI).rem_euclid(TAU) - PI
}

/// Absolute pseudorapidity separation between two directions
pub fn abs_delta_eta(d1: Direction, d2: Direction) -> Float {
    (d1.eta - d2.eta).abs()
}

/// Absolute azimuthal separation between two directions
pub fn abs_delta_phi(d1: Direction, d2: Direction) -> Float {
    delta_phi(d1.phi, d2.phi).abs()
}

/// Angular separation ΔR = sqrt(Δη² + Δφ²) between two directions
pub fn delta_r(d1: Direction, d2: Direction) -> Float {
    let d_eta = d1.eta - d2.eta;
    let d_phi = delta_phi(d1.phi, d2.phi);
    d_eta.hypot(d_phi)
}

/// Angular separation between two 4-momenta
pub fn delta_r_p4(p1: &Momentum, p2: &Momentum) -> Float {
    delta_r(Direction::of(p1), Direction::of(p2))
}

/// Transverse impact parameter of a track with respect to a vertex
///
/// `reference` is the track's point of closest approach to the beam line and
/// `p` its momentum at that point.
///
pub fn dxy(reference: &Point, p: &Momentum, vertex: &Point) -> Float {
    let d = reference - vertex;
    (-d[X] * p[Y] + d[Y] * p[X]) / pt(p)
}

/// Longitudinal impact parameter of a track with respect to a vertex
pub fn dz(reference: &Point, p: &Momentum, vertex: &Point) -> Float {
    let d = reference - vertex;
    let pt = pt(p);
    d[Z] - (d[X] * p[X] + d[Y] * p[Y]) / pt * (p[Z] / pt)
}
