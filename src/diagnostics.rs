//! Macroscopic observables of the gas.

use crate::{boundary::Boundary, force::lennard_jones_potential, vector::Vector, Float};

fn sum_squared_speeds(velocities: &[Vector]) -> Float {
    velocities.iter().map(Vector::norm_squared).sum()
}

/// Mean kinetic energy per particle, `Σ|v|² / (2n)`.
///
/// Two degrees of freedom with `k_B = 1`, so this equals the temperature.
/// NaN for no particles.
#[must_use]
pub fn temperature(velocities: &[Vector]) -> Float {
    sum_squared_speeds(velocities) * 0.5 / velocities.len() as Float
}

/// Ideal-gas pressure `Σ|v|² / (2 (2R)²)`, the kinetic energy per box area.
///
/// The virial of the pair forces is not included.
#[must_use]
pub fn pressure(velocities: &[Vector], box_radius: Float) -> Float {
    let side = 2. * box_radius;
    0.5 * sum_squared_speeds(velocities) / (side * side)
}

#[must_use]
pub fn kinetic_energy(velocities: &[Vector]) -> Float {
    0.5 * sum_squared_speeds(velocities)
}

/// Sum of the pair energies of all unordered pairs.
#[must_use]
pub fn potential_energy(positions: &[Vector], boundary: Boundary, box_radius: Float) -> Float {
    positions
        .iter()
        .enumerate()
        .map(|(i, ri)| {
            positions[i + 1..]
                .iter()
                .map(|rj| {
                    lennard_jones_potential(boundary.displacement(ri, rj, box_radius).norm_squared())
                })
                .sum::<Float>()
        })
        .sum()
}

#[must_use]
pub fn momentum(velocities: &[Vector]) -> Vector {
    velocities.iter().sum()
}

/// One row of the thermodynamic time series.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    pub time: Float,
    pub temperature: Float,
    pub pressure: Float,
}

impl Sample {
    #[must_use]
    pub fn measure(time: Float, velocities: &[Vector], box_radius: Float) -> Self {
        Self {
            time,
            temperature: temperature(velocities),
            pressure: pressure(velocities, box_radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    fn unit_velocities() -> [Vector; 4] {
        [
            Vector::new(1., 0.),
            Vector::new(-1., 0.),
            Vector::new(0., 1.),
            Vector::new(0., -1.),
        ]
    }

    #[test]
    fn thermometer_and_barometer() {
        let velocities = unit_velocities();

        assert_relative_eq!(temperature(&velocities), 0.5);
        assert_relative_eq!(pressure(&velocities, 1.), 0.5);
        assert_relative_eq!(kinetic_energy(&velocities), 2.);
        assert_eq!(momentum(&velocities), Vector::zeros());
    }

    #[test]
    fn pressure_scales_with_area() {
        let velocities = unit_velocities();
        assert_relative_eq!(pressure(&velocities, 2.), 0.125);
    }

    #[test]
    fn sample() {
        let sample = Sample::measure(1.5, &unit_velocities(), 1.);
        assert_eq!(
            sample,
            Sample {
                time: 1.5,
                temperature: 0.5,
                pressure: 0.5,
            }
        );
    }

    #[test]
    fn pair_at_minimum() {
        let r_min = Float::powf(2., 1. / 6.);
        let positions = [Vector::new(0., 0.), Vector::new(0., r_min)];

        assert_relative_eq!(
            potential_energy(&positions, Boundary::WallBounce, 10.),
            -1.,
            epsilon = 1e-12
        );
    }

    #[test]
    fn potential_through_periodic_image() {
        let r_min = Float::powf(2., 1. / 6.);
        let box_radius = 3.;
        let positions = [
            Vector::new(-box_radius + r_min / 2., 0.),
            Vector::new(box_radius - r_min / 2., 0.),
        ];

        assert_relative_eq!(
            potential_energy(&positions, Boundary::Periodic, box_radius),
            -1.,
            epsilon = 1e-12
        );
        assert!(potential_energy(&positions, Boundary::WallBounce, box_radius) > -0.01);
    }

    #[test]
    fn no_pairs() {
        assert_abs_diff_eq!(potential_energy(&[Vector::zeros()], Boundary::Periodic, 1.), 0.);
    }
}
