//! Pair loop evaluated four partners at a time.

use nalgebra::{SimdPartialOrd, SimdValue};
use simba::simd::WideF64x4;

use crate::{boundary::Boundary, force, vector::Vector, Float};

pub type SimdFloat = WideF64x4;

const LANES: usize = 4;

/// Lane-wise minimum image, see [`crate::boundary::periodic_shift`].
#[inline(always)]
fn periodic_shift(d: SimdFloat, box_radius: Float) -> SimdFloat {
    let upper = SimdFloat::splat(box_radius);
    let lower = SimdFloat::splat(-box_radius);
    let width = SimdFloat::splat(2. * box_radius);

    (d - width).select(
        d.simd_gt(upper),
        (d + width).select(d.simd_lt(lower), d),
    )
}

/// Lane-wise [`force::lennard_jones`].
#[inline(always)]
fn lennard_jones(dx: SimdFloat, dy: SimdFloat) -> (SimdFloat, SimdFloat) {
    let recip_drdr = SimdFloat::splat(1.) / (dx * dx + dy * dy);
    let recip_drdr_cube = recip_drdr * recip_drdr * recip_drdr;
    let factor = SimdFloat::splat(-24.)
        * recip_drdr
        * (SimdFloat::splat(2.) * recip_drdr_cube * recip_drdr_cube - recip_drdr_cube);

    (dx * factor, dy * factor)
}

/// Add the interaction of particle `i` with every particle `j > i`
/// to both accumulators.
///
/// Partners are processed in the same order as the scalar loop,
/// the tail that does not fill a whole register falls back to it.
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
    let xi = SimdFloat::splat(ri.x);
    let yi = SimdFloat::splat(ri.y);

    let mut pos_chunks = positions[i + 1..].chunks_exact(LANES);
    let mut acc_chunks = tail.chunks_exact_mut(LANES);
    for (rj, acc_j) in (&mut pos_chunks).zip(&mut acc_chunks) {
        let mut dx = SimdFloat::from([rj[0].x, rj[1].x, rj[2].x, rj[3].x]) - xi;
        let mut dy = SimdFloat::from([rj[0].y, rj[1].y, rj[2].y, rj[3].y]) - yi;
        if boundary == Boundary::Periodic {
            dx = periodic_shift(dx, box_radius);
            dy = periodic_shift(dy, box_radius);
        }

        let (ax, ay) = lennard_jones(dx, dy);
        for (lane, a_j) in acc_j.iter_mut().enumerate() {
            let acc = Vector::new(ax.extract(lane), ay.extract(lane));
            *acc_i += acc;
            *a_j -= acc;
        }
    }

    for (rj, a_j) in pos_chunks
        .remainder()
        .iter()
        .zip(acc_chunks.into_remainder())
    {
        let acc = force::lennard_jones(boundary.displacement(&ri, rj, box_radius));
        *acc_i += acc;
        *a_j -= acc;
    }
}
