use thiserror::Error;

use crate::Float;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{name} has to be a positive finite number, got {value}")]
    NonPositive { name: &'static str, value: Float },

    #[error("cannot build a lattice of {0} particles, n / 2 needs to be a perfect square")]
    ParticleCount(usize),

    #[error("{time} time units at {ups} updates per second is not a single update")]
    NoUpdates { time: Float, ups: Float },

    #[error("resolution has to be at least one pixel")]
    Resolution,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "visualization")]
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
