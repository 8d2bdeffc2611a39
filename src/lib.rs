//! Molecular dynamics of a two-dimensional Lennard-Jones gas.
//!
//! Particles start on a checkerboard lattice with random velocities and zero
//! total momentum ([`Particles::lattice`]), and are advanced with velocity
//! Verlet ([`step`]) inside a square box that is either periodic or bounded by
//! reflecting walls ([`Boundary`]). The O(n²) force evaluation can be spread
//! over threads, see [`DirectSummation`].
//!
//! All quantities are in reduced units, ε = σ = m = 1.

pub mod boundary;
pub mod config;
pub mod csv;
pub mod diagnostics;
pub mod direct_summation;
pub mod error;
pub mod force;
pub mod particles;
pub mod random;
#[cfg(feature = "simd")]
pub mod simd;
pub mod vector;
#[cfg(feature = "visualization")]
pub mod visualization;

pub use boundary::Boundary;
pub use direct_summation::{DirectSummation, Execution};
pub use error::{Error, Result};
pub use particles::Particles;

use nalgebra::DMatrix;

use crate::vector::Vector;

pub type Float = f64;

/// Computes the accelerations caused by the pair interaction.
pub trait ShortRangeSolver {
    /// Overwrite `accelerations` with the total pair acceleration
    /// on every particle at `positions`.
    fn calculate_accelerations(
        &self,
        positions: &[Vector],
        accelerations: &mut [Vector],
        boundary: Boundary,
        box_radius: Float,
    );
}

/// Advance the particles by one velocity Verlet step.
///
/// `particles.accelerations` have to belong to the current positions.
/// Afterwards they belong to the new ones.
pub fn step<S: ShortRangeSolver>(
    particles: &mut Particles,
    solver: &S,
    dt: Float,
    box_radius: Float,
    boundary: Boundary,
) {
    let Particles {
        positions,
        velocities,
        accelerations,
    } = particles;

    for (v, a) in velocities.iter_mut().zip(accelerations.iter()) {
        *v += *a * (0.5 * dt);
    }

    for (r, v) in positions.iter_mut().zip(velocities.iter()) {
        *r += *v * dt;
    }

    solver.calculate_accelerations(positions, accelerations, boundary, box_radius);

    for ((r, v), a) in positions
        .iter_mut()
        .zip(velocities.iter_mut())
        .zip(accelerations.iter())
    {
        *v += *a * (0.5 * dt);
        boundary.enforce(r, v, box_radius);
    }
}

/// When to reorder the particles by their y coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Sorting {
    #[default]
    Never,
    /// Sort before every n-th step, starting with the first.
    EveryNIteration(usize),
}

#[derive(Debug)]
pub struct Simulation<S: ShortRangeSolver> {
    particles: Particles,
    solver: S,
    box_radius: Float,
    boundary: Boundary,
    sorting: Sorting,
    num_steps: usize,
}

impl<S: ShortRangeSolver> Simulation<S> {
    /// Set up a periodic simulation and evaluate the initial accelerations.
    ///
    /// # Panics
    /// If `box_radius` is not positive.
    pub fn new(particles: Particles, solver: S, box_radius: Float) -> Self {
        assert!(box_radius > 0., "box radius has to be positive");
        log::debug!(
            "simulating {} particles in a box of radius {box_radius}",
            particles.len()
        );

        let mut simulation = Self {
            particles,
            solver,
            box_radius,
            boundary: Boundary::default(),
            sorting: Sorting::default(),
            num_steps: 0,
        };
        simulation.update_accelerations();
        simulation
    }

    #[must_use]
    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self.update_accelerations();
        self
    }

    /// # Panics
    /// If asked to sort every zeroth iteration.
    #[must_use]
    pub fn sorting(mut self, sorting: Sorting) -> Self {
        assert_ne!(sorting, Sorting::EveryNIteration(0), "cannot sort every 0th iteration");
        self.sorting = sorting;
        self
    }

    fn update_accelerations(&mut self) {
        self.solver.calculate_accelerations(
            &self.particles.positions,
            &mut self.particles.accelerations,
            self.boundary,
            self.box_radius,
        );
    }

    pub fn step(&mut self, dt: Float) {
        if let Sorting::EveryNIteration(every) = self.sorting {
            if self.num_steps % every == 0 {
                log::trace!("sorting particles before step {}", self.num_steps);
                self.particles.sort_by_y();
            }
        }

        step(
            &mut self.particles,
            &self.solver,
            dt,
            self.box_radius,
            self.boundary,
        );
        self.num_steps += 1;
    }

    /// Run `num_steps` steps and record the positions.
    ///
    /// Row `t` of the result holds the positions after `t` steps.
    /// Keep in mind that sorting changes which column belongs to which particle.
    pub fn simulate(&mut self, dt: Float, num_steps: usize) -> DMatrix<Vector> {
        let n = self.particles.len();
        let mut positions = DMatrix::from_element(num_steps + 1, n, Vector::zeros());
        self.record(&mut positions, 0);

        for t in 0..num_steps {
            self.step(dt);
            self.record(&mut positions, t + 1);
        }

        positions
    }

    fn record(&self, positions: &mut DMatrix<Vector>, row: usize) {
        for (j, p) in self.particles.positions.iter().enumerate() {
            positions[(row, j)] = *p;
        }
    }

    #[must_use]
    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    #[must_use]
    pub fn box_radius(&self) -> Float {
        self.box_radius
    }

    /// Number of steps taken so far.
    #[must_use]
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    #[must_use]
    pub fn temperature(&self) -> Float {
        diagnostics::temperature(&self.particles.velocities)
    }

    #[must_use]
    pub fn pressure(&self) -> Float {
        diagnostics::pressure(&self.particles.velocities, self.box_radius)
    }

    #[must_use]
    pub fn kinetic_energy(&self) -> Float {
        diagnostics::kinetic_energy(&self.particles.velocities)
    }

    #[must_use]
    pub fn potential_energy(&self) -> Float {
        diagnostics::potential_energy(&self.particles.positions, self.boundary, self.box_radius)
    }

    #[must_use]
    pub fn total_energy(&self) -> Float {
        self.kinetic_energy() + self.potential_energy()
    }

    #[must_use]
    pub fn momentum(&self) -> Vector {
        diagnostics::momentum(&self.particles.velocities)
    }
}
