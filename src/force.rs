//! The Lennard-Jones interaction in reduced units (ε = σ = 1, unit mass).

use crate::{vector::Vector, Float};

/// Acceleration of particle 1 due to particle 2, where `dr = r2 - r1`.
///
/// This is the negative gradient of [`lennard_jones_potential`]:
/// `dr · (-24 s⁻¹ (2 s⁻⁶ - s⁻³))` with the squared distance `s = dr · dr`.
/// Particle 2 feels the exact opposite.
///
/// Coinciding particles divide by zero, nothing clamps the distance.
#[inline(always)]
#[must_use]
pub fn lennard_jones(dr: Vector) -> Vector {
    let recip_drdr = 1. / dr.norm_squared();
    let recip_drdr_cube = recip_drdr * recip_drdr * recip_drdr;

    dr * (-24. * recip_drdr * (2. * recip_drdr_cube * recip_drdr_cube - recip_drdr_cube))
}

/// Pair energy `4 (s⁻⁶ - s⁻³)` at squared distance `s`.
#[inline]
#[must_use]
pub fn lennard_jones_potential(distance_squared: Float) -> Float {
    let recip_cube = (1. / distance_squared).powi(3);
    4. * (recip_cube * recip_cube - recip_cube)
}
