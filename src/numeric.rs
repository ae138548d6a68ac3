//! Floating-point type of all kinematic quantities
//!
//! Event files store their numbers in double precision. Building with the
//! `f32` feature reads them into single precision instead, which changes the
//! outcome of borderline cuts and of exact distance ties.

#[cfg(feature = "f32")]
mod precision {
    /// Kinematic scalar
    pub type Float = f32;
    pub use std::f32 as reals;
}
#[cfg(not(feature = "f32"))]
mod precision {
    /// Kinematic scalar
    pub type Float = f64;
    pub use std::f64 as reals;
}

pub use precision::{reals, Float};

/// Angular constants at the configured precision
pub mod angles {
    use super::{reals::consts, Float};

    /// Half a turn, the largest azimuthal separation
    pub const PI: Float = consts::PI;

    /// A full turn in azimuth
    pub const TAU: Float = 2. * consts::PI;
}
