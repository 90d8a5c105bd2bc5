//! Vectorized Mandelbrot escape-time evaluation.
//!
//! For every pixel of a rectangular region, mapped affinely onto a
//! rectangle of the complex plane, [`evaluate`] counts the iterations of
//! `z <- z^2 + c` (starting from `z = 0`) before `|z|^2` reaches the
//! escape radius of 4.0, up to a caller-supplied cap. Four pixels are
//! iterated per step in 4-wide double-precision SIMD lanes; lanes that
//! escape or hit the cap freeze their count while the rest continue.
//!
//! Counts land in a caller-owned row-major `u32` buffer addressed by
//! `y * row_stride + x`, so a region can be a sub-rectangle of a larger
//! framebuffer. [`evaluate_parallel`] produces bit-identical output with
//! rows spread over the rayon thread pool.
//!
//! ```
//! use mandelbrot_simd::{evaluate, Complex, PixelRegion, PlaneRegion};
//!
//! let region = PixelRegion::new(0, 0, 8, 8);
//! let plane = PlaneRegion::new(Complex::new(-2.0, -1.5), Complex::new(1.0, 1.5));
//! let mut counts = vec![0u32; 8 * 8];
//! evaluate(region, plane, 100, &mut counts, 8).unwrap();
//! assert!(counts.iter().all(|&n| n <= 100));
//! ```

pub mod error;
pub mod escape;
pub mod region;
pub mod simd;

pub use error::Error;
pub use escape::{evaluate, evaluate_parallel, ESCAPE_RADIUS_SQUARED, LANES};
pub use region::{Complex, PixelRegion, PlaneRegion};
