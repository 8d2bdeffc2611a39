use crate::{
    vector::{norm_max, Vector},
    Float,
};

/// How the square domain `[-box_radius, box_radius]²` treats its edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Boundary {
    /// The domain is a torus: particles leaving on one side re-enter on the
    /// opposite one, and pairs interact through their closest images.
    #[default]
    Periodic,
    /// Hard reflective walls.
    WallBounce,
}

impl Boundary {
    /// Displacement `r2 - r1`, shortened to the minimum image for [`Boundary::Periodic`].
    #[inline(always)]
    #[must_use]
    pub fn displacement(self, r1: &Vector, r2: &Vector, box_radius: Float) -> Vector {
        let dr = r2 - r1;
        match self {
            Boundary::Periodic => periodic_shift(dr, box_radius),
            Boundary::WallBounce => dr,
        }
    }

    /// Bring a particle that left the domain during the last drift back inside.
    #[inline]
    pub fn enforce(self, position: &mut Vector, velocity: &mut Vector, box_radius: Float) {
        match self {
            Boundary::Periodic => *position = periodic_shift(*position, box_radius),
            Boundary::WallBounce => wall_bounce(position, velocity, box_radius),
        }
    }
}

/// Shift every component outside `[-box_radius, box_radius]` by one box width.
///
/// Applied to positions this wraps them around the torus, applied to
/// displacements it yields the minimum image.
#[inline(always)]
#[must_use]
pub fn periodic_shift(mut v: Vector, box_radius: Float) -> Vector {
    if norm_max(&v) > box_radius {
        for c in v.iter_mut() {
            if *c > box_radius {
                *c -= 2. * box_radius;
            } else if *c < -box_radius {
                *c += 2. * box_radius;
            }
        }
    }

    v
}

/// Elastic reflection off the walls, each axis on its own.
///
/// The position is mirrored at the walls until it is back inside, flipping
/// the velocity once per mirroring. This conserves the kinetic energy and
/// holds for overshoots of any length.
#[inline]
pub fn wall_bounce(position: &mut Vector, velocity: &mut Vector, box_radius: Float) {
    if norm_max(position) <= box_radius {
        return;
    }

    for (r, v) in position.iter_mut().zip(velocity.iter_mut()) {
        if *r > box_radius || *r < -box_radius {
            reflect(r, v, box_radius);
        }
    }
}

/// Fold one coordinate into `[-box_radius, box_radius]`.
///
/// Unfolded, the mirrored motion repeats every two box widths.
#[inline]
fn reflect(r: &mut Float, v: &mut Float, box_radius: Float) {
    let width = 2. * box_radius;
    let shifted = *r + box_radius;
    let crossings = (shifted / width).floor();
    // rounding may leave the remainder a hair outside [0, width)
    let folded = (shifted - crossings * width).clamp(0., width);

    if crossings.rem_euclid(2.) == 0. {
        *r = folded - box_radius;
    } else {
        *r = box_radius - folded;
        *v = -*v;
    }
}
