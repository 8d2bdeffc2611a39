use nalgebra::Vector2;
use rand::Rng;
use rand_distr::Distribution;

use crate::Float;

/// Standard normal deviates from the Marsaglia polar method.
///
/// Uniform points in the square are rejected until one falls strictly inside
/// the unit disk, which is then mapped onto two independent deviates.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarsagliaPolar;

impl Distribution<Vector2<Float>> for MarsagliaPolar {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector2<Float> {
        loop {
            let u = 2. * rng.gen::<Float>() - 1.;
            let v = 2. * rng.gen::<Float>() - 1.;
            let s = u * u + v * v;

            if s > 0. && s < 1. {
                let factor = (-2. * s.ln() / s).sqrt();
                return Vector2::new(u * factor, v * factor);
            }
        }
    }
}

impl Distribution<Float> for MarsagliaPolar {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Float {
        let pair: Vector2<Float> = self.sample(rng);
        pair.x
    }
}
