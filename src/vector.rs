use nalgebra::Vector2;
use rand::Rng;
use rand_distr::Distribution;

use crate::{random::MarsagliaPolar, Float};

/// Positions, velocities and accelerations all live in the plane.
pub type Vector = Vector2<Float>;

/// The maximum norm, i.e. the largest absolute component.
#[must_use]
pub fn norm_max(v: &Vector) -> Float {
    v.amax()
}

/// Sample a unit vector with a uniformly distributed direction.
///
/// The direction of an isotropic Gaussian pair is uniform on the circle,
/// so this normalises a sample of [`MarsagliaPolar`].
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vector {
    let v: Vector = MarsagliaPolar.sample(rng);
    v / v.norm()
}
