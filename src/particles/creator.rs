use rand::Rng;

use super::Particles;
use crate::{
    vector::{random_direction, Vector},
    Float,
};

/// Side length `m` of each square sub-lattice if `n = 2 m²`.
#[must_use]
pub fn lattice_side(n: usize) -> Option<usize> {
    let m = (n as f64 / 2.).sqrt().round() as usize;
    (2 * m * m == n).then_some(m)
}

/// Place the particles on two interleaved square lattices and give them
/// random velocities with zero total momentum.
///
/// The first `m²` particles sit on a grid spanning `[-box_radius, box_radius)`
/// with spacing `2 box_radius / m`, the other `m²` on the same grid shifted by
/// half a lattice step in both directions. Every velocity points in a random
/// direction with length `avg_speed` before the mean velocity is removed.
///
/// # Panics
/// If `box_radius` is not positive, if the slices differ in length,
/// or if their length is not of the form `2 m²`.
pub fn populate<R: Rng + ?Sized>(
    positions: &mut [Vector],
    velocities: &mut [Vector],
    box_radius: Float,
    avg_speed: Float,
    rng: &mut R,
) {
    let n = positions.len();
    assert_eq!(n, velocities.len());
    assert!(box_radius > 0., "box radius has to be positive");
    let Some(m) = lattice_side(n) else {
        panic!("cannot place {n} particles on the lattice, n / 2 needs to be a perfect square");
    };

    let lattice_step = 2. * box_radius / m as Float;
    let (first, second) = positions.split_at_mut(m * m);
    for i in 0..m {
        for j in 0..m {
            first[i * m + j] = Vector::new(
                -box_radius + j as Float * lattice_step,
                -box_radius + i as Float * lattice_step,
            );
            second[i * m + j] = Vector::new(
                -box_radius + (j as Float + 0.5) * lattice_step,
                -box_radius + (i as Float + 0.5) * lattice_step,
            );
        }
    }

    for v in velocities.iter_mut() {
        *v = random_direction(rng) * avg_speed;
    }

    // Zero the total momentum
    if n > 0 {
        let v_avg = velocities.iter().sum::<Vector>() / n as Float;
        for v in velocities.iter_mut() {
            *v -= v_avg;
        }
    }
}

impl Particles {
    /// Allocate `n` particles and [`populate`] them.
    #[must_use]
    pub fn lattice<R: Rng + ?Sized>(
        n: usize,
        box_radius: Float,
        avg_speed: Float,
        rng: &mut R,
    ) -> Self {
        let mut positions = vec![Vector::zeros(); n];
        let mut velocities = vec![Vector::zeros(); n];
        populate(&mut positions, &mut velocities, box_radius, avg_speed, rng);

        Self::new(positions, velocities)
    }
}
