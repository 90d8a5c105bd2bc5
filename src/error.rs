use std::fmt;

/// Argument-validation errors. All are detected before any output write;
/// a failed call leaves the output buffer untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Pixel region width or height is zero.
    EmptyRegion,
    /// Row stride is smaller than the region's right edge, so rows would
    /// alias or fall outside their slice.
    StrideTooSmall { stride: usize, right: u32 },
    /// Output buffer cannot address the region's last pixel.
    OutputTooSmall { required: usize, actual: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRegion => write!(f, "pixel region width or height is zero"),
            Self::StrideTooSmall { stride, right } => write!(
                f,
                "row stride {} is smaller than the region's right edge {}",
                stride, right
            ),
            Self::OutputTooSmall { required, actual } => write!(
                f,
                "output buffer holds {} values but the region requires {}",
                actual, required
            ),
        }
    }
}

impl std::error::Error for Error {}
