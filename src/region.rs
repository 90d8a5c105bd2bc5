use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct Complex {
    pub real: f64,
    pub imaginary: f64,
}

impl Complex {
    pub const ZERO: Self = Complex {
        real: 0.0,
        imaginary: 0.0,
    };

    pub fn new(real: f64, imaginary: f64) -> Self {
        Complex { real, imaginary }
    }
}

/// Axis-aligned rectangle of the complex plane, mapped affinely onto a
/// [`PixelRegion`] when evaluating.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct PlaneRegion {
    pub top_left: Complex,
    pub bottom_right: Complex,
}

impl PlaneRegion {
    pub fn new(top_left: Complex, bottom_right: Complex) -> Self {
        PlaneRegion {
            top_left,
            bottom_right,
        }
    }

    pub fn width(&self) -> f64 {
        self.bottom_right.real - self.top_left.real
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.imaginary - self.top_left.imaginary
    }
}

/// Rectangle of pixel coordinates: `top_left` inclusive, `bottom_right`
/// exclusive. May be a sub-rectangle of a larger framebuffer.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRegion {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl PixelRegion {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        PixelRegion {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_region_dimensions() {
        let region = PixelRegion::new(2, 1, 10, 5);
        assert_eq!(region.width(), 8);
        assert_eq!(region.height(), 4);
    }

    #[test]
    fn inverted_pixel_region_is_empty() {
        let region = PixelRegion::new(10, 5, 2, 1);
        assert_eq!(region.width(), 0);
        assert_eq!(region.height(), 0);
    }

    #[test]
    fn plane_region_dimensions() {
        let plane = PlaneRegion::new(Complex::new(-2.0, -1.5), Complex::new(1.0, 1.5));
        assert_eq!(plane.width(), 3.0);
        assert_eq!(plane.height(), 3.0);
    }
}
