use std::thread;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{boundary::Boundary, force, vector::Vector, Float, ShortRangeSolver};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    #[default]
    SingleThreaded,
    Multithreaded {
        num_threads: usize,
    },
    #[cfg(feature = "rayon")]
    RayonIter,
    #[cfg(feature = "rayon")]
    RayonPool,
}

/// Evaluate every unordered pair exactly, O(n²).
#[derive(Copy, Clone, Debug, Default)]
pub struct DirectSummation {
    execution: Execution,
    #[cfg_attr(not(feature = "simd"), allow(dead_code))]
    simd: bool,
}

impl DirectSummation {
    #[must_use]
    pub fn new() -> Self {
        Self {
            execution: Execution::SingleThreaded,
            simd: false,
        }
    }

    /// Calculate the forces with multiple threads.
    ///
    /// The rows of the pair triangle are dealt out to the threads in turn.
    /// Every thread accumulates into its own full-length array, and a second
    /// pass, split by particle, sums those arrays.
    ///
    /// # Panics
    /// If `num_threads` is zero.
    #[must_use]
    pub fn multithreaded(mut self, num_threads: usize) -> Self {
        assert!(num_threads > 0, "need at least one thread");
        self.execution = Execution::Multithreaded { num_threads };
        self
    }

    /// Use Rayon to calculate the forces with multiple threads.
    ///
    /// Every particle sums the forces of all others on itself,
    /// so each pair is evaluated twice but no thread writes to another's data.
    ///
    /// # Panics
    /// If [`DirectSummation::simd`] was requested, this kernel has no SIMD version.
    #[cfg(feature = "rayon")]
    #[must_use]
    pub fn rayon_iter(mut self) -> Self {
        assert!(!self.simd, "rayon_iter cannot be combined with simd");
        self.execution = Execution::RayonIter;
        self
    }

    /// Use Rayon to calculate the forces with multiple threads.
    ///
    /// Like [`DirectSummation::multithreaded`], with one private array
    /// per thread of the Rayon pool.
    #[cfg(feature = "rayon")]
    #[must_use]
    pub fn rayon_pool(mut self) -> Self {
        self.execution = Execution::RayonPool;
        self
    }

    /// Evaluate four pairs at once.
    ///
    /// Applies to every execution except [`Execution::RayonIter`].
    ///
    /// # Panics
    /// If the execution is [`Execution::RayonIter`].
    #[cfg(feature = "simd")]
    #[must_use]
    pub fn simd(mut self) -> Self {
        #[cfg(feature = "rayon")]
        assert_ne!(
            self.execution,
            Execution::RayonIter,
            "rayon_iter cannot be combined with simd"
        );
        self.simd = true;
        self
    }

    #[must_use]
    pub fn execution(&self) -> Execution {
        self.execution
    }

    #[inline(always)]
    fn accumulate_row(
        &self,
        positions: &[Vector],
        accelerations: &mut [Vector],
        i: usize,
        boundary: Boundary,
        box_radius: Float,
    ) {
        #[cfg(feature = "simd")]
        if self.simd {
            crate::simd::accumulate_row(positions, accelerations, i, boundary, box_radius);
            return;
        }

        accumulate_row(positions, accelerations, i, boundary, box_radius);
    }

    /// Accumulate the rows `start, start + stride, ...` of the pair triangle.
    fn accumulate_rows(
        &self,
        positions: &[Vector],
        accelerations: &mut [Vector],
        start: usize,
        stride: usize,
        boundary: Boundary,
        box_radius: Float,
    ) {
        for i in (start..positions.len()).step_by(stride) {
            self.accumulate_row(positions, accelerations, i, boundary, box_radius);
        }
    }
}

/// Add the interaction of particle `i` with every particle `j > i`
/// to both accumulators.
#[inline(always)]
pub(crate) fn accumulate_row(
    positions: &[Vector],
    accelerations: &mut [Vector],
    i: usize,
    boundary: Boundary,
    box_radius: Float,
) {
    let (head, tail) = accelerations.split_at_mut(i + 1);
    let acc_i = &mut head[i];
    let ri = positions[i];

    for (rj, acc_j) in positions[i + 1..].iter().zip(tail) {
        let acc = force::lennard_jones(boundary.displacement(&ri, rj, box_radius));
        *acc_i += acc;
        *acc_j -= acc;
    }
}

/// Sum the private accumulators of all threads for the particles starting at `offset`.
fn reduce(accelerations: &mut [Vector], partials: &[Vec<Vector>], offset: usize) {
    for (i, a) in accelerations.iter_mut().enumerate() {
        *a = partials
            .iter()
            .fold(Vector::zeros(), |sum, partial| sum + partial[offset + i]);
    }
}

impl ShortRangeSolver for DirectSummation {
    fn calculate_accelerations(
        &self,
        positions: &[Vector],
        accelerations: &mut [Vector],
        boundary: Boundary,
        box_radius: Float,
    ) {
        let n = positions.len();
        assert_eq!(n, accelerations.len());

        match self.execution {
            Execution::SingleThreaded => {
                accelerations.fill(Vector::zeros());
                self.accumulate_rows(positions, accelerations, 0, 1, boundary, box_radius);
            }
            Execution::Multithreaded { num_threads } => {
                let mut partials = vec![vec![Vector::zeros(); n]; num_threads];

                thread::scope(|s| {
                    for (t, partial) in partials.iter_mut().enumerate() {
                        s.spawn(move || {
                            self.accumulate_rows(
                                positions,
                                partial,
                                t,
                                num_threads,
                                boundary,
                                box_radius,
                            );
                        });
                    }
                });

                let partials = &partials;
                let chunk_size = n.div_ceil(num_threads).max(1);
                thread::scope(|s| {
                    for (c, chunk) in accelerations.chunks_mut(chunk_size).enumerate() {
                        s.spawn(move || reduce(chunk, partials, c * chunk_size));
                    }
                });
            }
            #[cfg(feature = "rayon")]
            Execution::RayonIter => {
                accelerations
                    .par_iter_mut()
                    .enumerate()
                    .for_each(|(i, acc)| {
                        *acc = Vector::zeros();
                        for (j, rj) in positions.iter().enumerate() {
                            if i == j {
                                continue;
                            }
                            *acc += force::lennard_jones(boundary.displacement(
                                &positions[i],
                                rj,
                                box_radius,
                            ));
                        }
                    });
            }
            #[cfg(feature = "rayon")]
            Execution::RayonPool => {
                let partials = rayon::broadcast(|ctx| {
                    let mut partial = vec![Vector::zeros(); n];
                    self.accumulate_rows(
                        positions,
                        &mut partial,
                        ctx.index(),
                        ctx.num_threads(),
                        boundary,
                        box_radius,
                    );
                    partial
                });

                accelerations
                    .par_iter_mut()
                    .enumerate()
                    .for_each(|(i, a)| {
                        *a = partials
                            .iter()
                            .fold(Vector::zeros(), |sum, partial| sum + partial[i]);
                    });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_relative_eq, assert_ulps_eq};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::particles::Particles;

    const BOX_RADIUS: Float = 4.;

    fn jittered_lattice(seed: u64) -> Particles {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut particles = Particles::lattice(2 * 6 * 6, BOX_RADIUS, 1., &mut rng);
        for p in particles.positions.iter_mut() {
            *p += Vector::new(rng.gen_range(-0.1..0.1), rng.gen_range(-0.1..0.1));
        }
        particles
    }

    fn accelerations(
        solver: DirectSummation,
        particles: &Particles,
        boundary: Boundary,
    ) -> Vec<Vector> {
        let mut acc = vec![Vector::new(1e3, -1e3); particles.len()];
        solver.calculate_accelerations(&particles.positions, &mut acc, boundary, BOX_RADIUS);
        acc
    }

    fn compare(solver: DirectSummation) {
        let particles = jittered_lattice(0);
        for boundary in [Boundary::Periodic, Boundary::WallBounce] {
            let single = accelerations(DirectSummation::new(), &particles, boundary);
            let multi = accelerations(solver, &particles, boundary);

            for (s, m) in single.into_iter().zip(multi) {
                assert_relative_eq!(s, m, epsilon = 1e-9, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn symmetry() {
        let positions = [Vector::new(1., 0.), Vector::new(-0.1, 0.2)];
        let mut accs = [Vector::zeros(); 2];

        let ds = DirectSummation::new();
        ds.calculate_accelerations(&positions, &mut accs, Boundary::WallBounce, 10.);

        assert_ulps_eq!(accs[0], -accs[1]);
    }

    #[test]
    fn newtons_third_law() {
        let particles = jittered_lattice(1);
        let acc = accelerations(DirectSummation::new(), &particles, Boundary::Periodic);

        let total: Vector = acc.iter().sum();
        let scale: Float = acc.iter().map(|a| a.norm()).sum();
        assert!(total.norm() < 1e-12 * scale);
    }

    #[test]
    fn minimum_image_force() {
        let delta = 1.2;
        let positions = [
            Vector::new(-BOX_RADIUS + delta / 2., 0.),
            Vector::new(BOX_RADIUS - delta / 2., 0.),
        ];
        let mut accs = [Vector::zeros(); 2];
        let ds = DirectSummation::new();

        ds.calculate_accelerations(&positions, &mut accs, Boundary::Periodic, BOX_RADIUS);
        let expected = force::lennard_jones(Vector::new(-delta, 0.));
        assert_relative_eq!(accs[0], expected, max_relative = 1e-12);
        // attracted across the left edge
        assert!(accs[0].x < 0.);

        ds.calculate_accelerations(&positions, &mut accs, Boundary::WallBounce, BOX_RADIUS);
        let expected = force::lennard_jones(Vector::new(2. * BOX_RADIUS - delta, 0.));
        assert_relative_eq!(accs[0], expected, max_relative = 1e-12);
        assert!(accs[0].x > 0.);
    }

    #[test]
    fn overwrites_previous_values() {
        let positions = [Vector::new(0., 0.), Vector::new(5., 0.)];
        let mut accs = [Vector::new(7., 7.); 2];
        DirectSummation::new().multithreaded(3).calculate_accelerations(
            &positions,
            &mut accs,
            Boundary::WallBounce,
            10.,
        );
        let expected = force::lennard_jones(Vector::new(5., 0.));
        assert_relative_eq!(accs[0], expected);
        assert_relative_eq!(accs[1], -expected);
    }

    #[test]
    fn multithreaded() {
        compare(DirectSummation::new().multithreaded(2));
        compare(DirectSummation::new().multithreaded(5));
    }

    #[test]
    fn more_threads_than_particles() {
        let particles = jittered_lattice(2);
        let single = accelerations(DirectSummation::new(), &particles, Boundary::Periodic);
        let multi = accelerations(
            DirectSummation::new().multithreaded(2 * particles.len()),
            &particles,
            Boundary::Periodic,
        );
        for (s, m) in single.into_iter().zip(multi) {
            assert_relative_eq!(s, m, epsilon = 1e-9, max_relative = 1e-9);
        }
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn rayon_iter() {
        compare(DirectSummation::new().rayon_iter());
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn rayon_pool() {
        compare(DirectSummation::new().rayon_pool());
    }

    #[cfg(all(feature = "simd", feature = "rayon"))]
    #[test]
    fn simd() {
        compare(DirectSummation::new().simd());
        compare(DirectSummation::new().simd().multithreaded(3));
        compare(DirectSummation::new().simd().rayon_pool());
    }

    #[cfg(all(feature = "simd", feature = "rayon"))]
    #[test]
    #[should_panic(expected = "cannot be combined with simd")]
    fn simd_then_rayon_iter() {
        let _ = DirectSummation::new().simd().rayon_iter();
    }

    #[cfg(all(feature = "simd", feature = "rayon"))]
    #[test]
    #[should_panic(expected = "cannot be combined with simd")]
    fn rayon_iter_then_simd() {
        let _ = DirectSummation::new().rayon_iter().simd();
    }

    #[test]
    #[should_panic(expected = "at least one thread")]
    fn zero_threads() {
        let _ = DirectSummation::new().multithreaded(0);
    }
}
