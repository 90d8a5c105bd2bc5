//! Vectorized escape-time evaluation.
//!
//! Computes, for every pixel of a rectangular region, the number of
//! iterations of `z <- z^2 + c` before `|z|` leaves the escape radius,
//! four pixels per vector step. Counts are written into a caller-owned
//! row-major buffer addressed by absolute framebuffer coordinates
//! (`y * row_stride + x`), so the region may be a sub-rectangle of a
//! larger image.

use log::{debug, trace};
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};

use crate::error::Error;
use crate::region::{PixelRegion, PlaneRegion};
use crate::simd::{F64x4, I64x4};

/// Squared escape radius: a point whose iterate reaches `|z|^2 >= 4.0`
/// diverges.
pub const ESCAPE_RADIUS_SQUARED: f64 = 4.0;

/// Pixels evaluated per vector step.
pub const LANES: usize = 4;

/// Iterates the recurrence for four plane points in lockstep until every
/// lane has either escaped or reached `iteration_cap`.
///
/// The escape test uses the squares of the *previous* iterate, so the
/// reported count lags the first `|z|^2 >= 4` update by one step. Lanes
/// that go inactive stop counting; their `z` keeps updating (possibly
/// through inf/NaN) without affecting any result, since NaN comparisons
/// are false and an inactive count never resumes.
fn iterate_group(c_real: F64x4, c_imag: F64x4, iteration_cap: u32) -> [i64; 4] {
    let cap = I64x4::splat(iteration_cap as i64);
    let radius = F64x4::splat(ESCAPE_RADIUS_SQUARED);

    let mut z_real = F64x4::splat(0.0);
    let mut z_imag = F64x4::splat(0.0);
    let mut count = I64x4::splat(0);

    loop {
        let real2 = z_real * z_real;
        let imag2 = z_imag * z_imag;
        let next_real = real2 - imag2 + c_real;
        let next_imag = (z_real + z_real) * z_imag + c_imag;
        z_real = next_real;
        z_imag = next_imag;

        let active = (real2 + imag2).lt(radius).and(count.lt(cap));
        count = count.increment(active);
        if !active.any() {
            return count.to_array();
        }
    }
}

/// Evaluates the columns `left..right` of one framebuffer row.
///
/// `row` is the full-stride row slice; lane `k` of a group starting at
/// column `x` lands in `row[x + k]`. A final partial group still runs
/// all four lanes (the out-of-region lanes evaluate plane points past
/// the right edge) and only the in-region lanes are stored.
fn evaluate_row(
    left: u32,
    right: u32,
    real_base: f64,
    x_scale: f64,
    c_imag: f64,
    iteration_cap: u32,
    row: &mut [u32],
) {
    let x_jump = F64x4::splat(4.0 * x_scale);
    let c_imag = F64x4::splat(c_imag);
    let mut c_real = F64x4::splat(real_base)
        + F64x4::new([0.0, x_scale, 2.0 * x_scale, 3.0 * x_scale]);

    let mut x = left as usize;
    let right = right as usize;
    while x < right {
        let counts = iterate_group(c_real, c_imag, iteration_cap);
        let lanes = (right - x).min(LANES);
        for (lane, &count) in counts.iter().take(lanes).enumerate() {
            row[x + lane] = count as u32;
        }
        c_real = c_real + x_jump;
        x += LANES;
    }
}

fn validate(region: &PixelRegion, row_stride: usize, output_len: usize) -> Result<(), Error> {
    if region.width() == 0 || region.height() == 0 {
        return Err(Error::EmptyRegion);
    }
    if row_stride < region.right as usize {
        return Err(Error::StrideTooSmall {
            stride: row_stride,
            right: region.right,
        });
    }
    let required = (region.bottom as usize - 1) * row_stride + region.right as usize;
    if output_len < required {
        return Err(Error::OutputTooSmall {
            required,
            actual: output_len,
        });
    }
    Ok(())
}

/// Computes escape-time counts for every pixel of `pixel_region`,
/// mapping it affinely onto `plane_region`, and writes them into
/// `output` at `y * row_stride + x`.
///
/// Every count lies in `[0, iteration_cap]`; a pixel that never escapes
/// reports exactly `iteration_cap`. Only the region's slots are
/// written. The call is deterministic: identical arguments always
/// produce bitwise-identical output.
pub fn evaluate(
    pixel_region: PixelRegion,
    plane_region: PlaneRegion,
    iteration_cap: u32,
    output: &mut [u32],
    row_stride: usize,
) -> Result<(), Error> {
    validate(&pixel_region, row_stride, output.len())?;

    trace!("begin evaluate");
    debug!(
        "evaluating {:?} over {:?} with cap {}",
        pixel_region, plane_region, iteration_cap
    );

    let x_scale = plane_region.width() / pixel_region.width() as f64;
    let y_scale = plane_region.height() / pixel_region.height() as f64;

    for y in pixel_region.top..pixel_region.bottom {
        let c_imag =
            plane_region.top_left.imaginary + (y - pixel_region.top) as f64 * y_scale;
        let row_start = y as usize * row_stride;
        let row_end = output.len().min(row_start + row_stride);
        evaluate_row(
            pixel_region.left,
            pixel_region.right,
            plane_region.top_left.real,
            x_scale,
            c_imag,
            iteration_cap,
            &mut output[row_start..row_end],
        );
    }

    trace!("end evaluate");
    Ok(())
}

/// [`evaluate`] with rows distributed over the rayon thread pool.
///
/// Each row's writes are confined to that row's stride chunk, so rows
/// share no mutable state and the output is bit-identical to the serial
/// version.
pub fn evaluate_parallel(
    pixel_region: PixelRegion,
    plane_region: PlaneRegion,
    iteration_cap: u32,
    output: &mut [u32],
    row_stride: usize,
) -> Result<(), Error> {
    validate(&pixel_region, row_stride, output.len())?;

    trace!("begin evaluate_parallel");

    let x_scale = plane_region.width() / pixel_region.width() as f64;
    let y_scale = plane_region.height() / pixel_region.height() as f64;
    let top = pixel_region.top as usize;
    let bottom = pixel_region.bottom as usize;

    output
        .par_chunks_mut(row_stride)
        .enumerate()
        .filter(|(y, _)| *y >= top && *y < bottom)
        .for_each(|(y, row)| {
            let c_imag = plane_region.top_left.imaginary + (y - top) as f64 * y_scale;
            evaluate_row(
                pixel_region.left,
                pixel_region.right,
                plane_region.top_left.real,
                x_scale,
                c_imag,
                iteration_cap,
                row,
            );
        });

    trace!("end evaluate_parallel");
    Ok(())
}
