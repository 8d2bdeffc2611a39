//! Run parameters and the quantities derived from them.

use crate::{
    error::{Error, Result},
    particles::lattice_side,
    Float,
};

/// Everything a run needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameters {
    /// Number of particles, twice a perfect square.
    pub n: usize,
    /// Simulated time.
    pub time: Float,
    pub box_radius: Float,
    /// Initial speed of every particle before the momentum is removed.
    pub avg_speed: Float,
    /// Updates per unit of simulated time.
    pub ups: Float,
    /// Frames per unit of simulated time.
    pub fps: Float,
    /// Side length of the square frames in pixels.
    pub resolution: u32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            n: 200,
            time: 5.,
            box_radius: 10.,
            avg_speed: 1.,
            ups: 1000.,
            fps: 50.,
            resolution: 240,
        }
    }
}

fn positive(name: &'static str, value: Float) -> Result<()> {
    if value.is_finite() && value > 0. {
        Ok(())
    } else {
        Err(Error::NonPositive { name, value })
    }
}

impl Parameters {
    /// Check every parameter, so the run cannot fail halfway through.
    pub fn validate(&self) -> Result<()> {
        positive("time", self.time)?;
        positive("box radius", self.box_radius)?;
        positive("average speed", self.avg_speed)?;
        positive("updates per second", self.ups)?;
        positive("frames per second", self.fps)?;

        if self.n == 0 || lattice_side(self.n).is_none() {
            return Err(Error::ParticleCount(self.n));
        }
        if self.resolution == 0 {
            return Err(Error::Resolution);
        }
        if self.n_updates() == 0 {
            return Err(Error::NoUpdates {
                time: self.time,
                ups: self.ups,
            });
        }

        Ok(())
    }

    /// `⌊time · ups⌋`
    #[must_use]
    pub fn n_updates(&self) -> usize {
        (self.time * self.ups).floor() as usize
    }

    /// `⌈time · fps⌉`
    #[must_use]
    pub fn n_frames(&self) -> usize {
        (self.time * self.fps).ceil() as usize
    }

    /// Length of one update, chosen so the updates exactly fill the simulated time.
    #[must_use]
    pub fn dt(&self) -> Float {
        self.time / self.n_updates() as Float
    }

    #[must_use]
    pub fn frame_interval(&self) -> Float {
        self.time / self.n_frames() as Float
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Parameters::default().validate().is_ok());
    }

    #[test]
    fn derived_values() {
        let params = Parameters {
            time: 2.5,
            ups: 100.,
            fps: 0.9,
            ..Default::default()
        };

        assert_eq!(params.n_updates(), 250);
        assert_eq!(params.n_frames(), 3);
        assert_relative_eq!(params.dt(), 0.01);
        assert_relative_eq!(params.frame_interval(), 2.5 / 3.);
    }

    #[test]
    fn updates_round_down() {
        let params = Parameters {
            time: 1.,
            ups: 10.7,
            ..Default::default()
        };
        assert_eq!(params.n_updates(), 10);
        assert_relative_eq!(params.dt(), 0.1);
    }

    #[test]
    fn rejects_non_positive() {
        let params = Parameters {
            box_radius: 0.,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(Error::NonPositive { name: "box radius", .. })
        ));

        let params = Parameters {
            fps: Float::NAN,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(Error::NonPositive { name: "frames per second", .. })
        ));

        let params = Parameters {
            avg_speed: -1.,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_particle_count() {
        for n in [0, 3, 10, 201] {
            let params = Parameters {
                n,
                ..Default::default()
            };
            assert!(matches!(params.validate(), Err(Error::ParticleCount(m)) if m == n));
        }
    }

    #[test]
    fn rejects_no_updates() {
        let params = Parameters {
            time: 0.5,
            ups: 1.,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(Error::NoUpdates { .. })));
    }

    #[test]
    fn rejects_empty_frames() {
        let params = Parameters {
            resolution: 0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(Error::Resolution)));
    }

    #[test]
    fn error_message() {
        let err = Parameters {
            n: 10,
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot build a lattice of 10 particles, n / 2 needs to be a perfect square"
        );
    }
}
