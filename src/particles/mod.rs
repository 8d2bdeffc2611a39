mod creator;

pub use creator::*;

use crate::vector::Vector;

/// A collection of particles.
///
/// This struct is used to utilize the Struct-of-Arrays (SOA) architecture:
/// entry `i` of every array describes the same particle.
#[derive(Clone, Debug)]
pub struct Particles {
    pub(crate) positions: Vec<Vector>,
    pub(crate) velocities: Vec<Vector>,
    pub(crate) accelerations: Vec<Vector>,
}

impl Particles {
    /// Create particles at rest with respect to forces, i.e. zero accelerations.
    #[must_use]
    pub fn new(positions: Vec<Vector>, velocities: Vec<Vector>) -> Self {
        let len = positions.len();
        assert_eq!(len, velocities.len());

        Self {
            positions,
            velocities,
            accelerations: vec![Vector::zeros(); len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[must_use]
    pub fn positions(&self) -> &[Vector] {
        &self.positions
    }

    #[must_use]
    pub fn velocities(&self) -> &[Vector] {
        &self.velocities
    }

    #[must_use]
    pub fn accelerations(&self) -> &[Vector] {
        &self.accelerations
    }

    /// Reorder all particles by descending y coordinate.
    ///
    /// Insertion sort, as particles barely move between two calls and the
    /// arrays are therefore nearly sorted. Positions, velocities and
    /// accelerations are moved in lock-step.
    ///
    /// # Panics
    /// If two neighbouring particles end up at bit-identical positions.
    pub fn sort_by_y(&mut self) {
        for i in 1..self.len() {
            let y = self.positions[i].y;
            if y > self.positions[i - 1].y {
                let target = self.positions[..i].partition_point(|p| p.y > y);
                self.positions[target..=i].rotate_right(1);
                self.velocities[target..=i].rotate_right(1);
                self.accelerations[target..=i].rotate_right(1);
            }
        }

        for pair in self.positions.windows(2) {
            assert!(pair[0].y >= pair[1].y, "particles are not sorted by y");
            assert!(
                pair[0].x.to_bits() != pair[1].x.to_bits()
                    || pair[0].y.to_bits() != pair[1].y.to_bits(),
                "two particles at the exact same position, this is very likely an error"
            );
        }
    }
}

impl FromIterator<(Vector, Vector)> for Particles {
    fn from_iter<T: IntoIterator<Item = (Vector, Vector)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let cap = iter.size_hint().0;
        let mut positions = Vec::with_capacity(cap);
        let mut velocities = Vec::with_capacity(cap);

        for (p, v) in iter {
            positions.push(p);
            velocities.push(v);
        }

        Self::new(positions, velocities)
    }
}
