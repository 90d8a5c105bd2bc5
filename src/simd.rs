//! 4-wide double-precision lane abstraction.
//!
//! Three backends selected at compile time:
//!
//! - x86_64 AVX2: one 256-bit register per vector (4 × f64 / 4 × i64)
//! - aarch64 NEON: two 128-bit registers per vector (2 + 2 lanes)
//! - scalar fallback: unrolled `[T; 4]`, identical per-lane arithmetic order
//!
//! None of the backends use fused multiply-add, so every elementwise
//! operation is individually IEEE-rounded and all three produce
//! bit-identical results. Lane `k` of a vector always corresponds to
//! element `k` of the arrays passed to [`F64x4::new`] / returned by
//! [`I64x4::to_array`].

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
mod avx2 {
    use core::arch::x86_64::*;
    use core::ops::{Add, Mul, Sub};

    /// 4-lane f64 vector.
    #[derive(Clone, Copy, Debug)]
    #[repr(transparent)]
    pub struct F64x4(__m256d);

    /// 4-lane i64 vector.
    #[derive(Clone, Copy, Debug)]
    #[repr(transparent)]
    pub struct I64x4(__m256i);

    /// Per-lane boolean mask (all-ones or all-zeros per 64-bit lane).
    #[derive(Clone, Copy, Debug)]
    #[repr(transparent)]
    pub struct Mask4(__m256i);

    impl F64x4 {
        #[inline(always)]
        pub fn splat(value: f64) -> Self {
            // SAFETY: avx2 is guaranteed by the enclosing #[cfg].
            unsafe { Self(_mm256_set1_pd(value)) }
        }

        #[inline(always)]
        pub fn new(values: [f64; 4]) -> Self {
            unsafe { Self(_mm256_loadu_pd(values.as_ptr())) }
        }

        #[inline(always)]
        pub fn to_array(self) -> [f64; 4] {
            let mut values = [0.0f64; 4];
            unsafe { _mm256_storeu_pd(values.as_mut_ptr(), self.0) };
            values
        }

        /// Lane-wise `self < rhs`.
        #[inline(always)]
        pub fn lt(self, rhs: Self) -> Mask4 {
            unsafe {
                Mask4(_mm256_castpd_si256(_mm256_cmp_pd::<_CMP_LT_OQ>(
                    self.0, rhs.0,
                )))
            }
        }
    }

    impl Add for F64x4 {
        type Output = Self;

        #[inline(always)]
        fn add(self, rhs: Self) -> Self {
            unsafe { Self(_mm256_add_pd(self.0, rhs.0)) }
        }
    }

    impl Sub for F64x4 {
        type Output = Self;

        #[inline(always)]
        fn sub(self, rhs: Self) -> Self {
            unsafe { Self(_mm256_sub_pd(self.0, rhs.0)) }
        }
    }

    impl Mul for F64x4 {
        type Output = Self;

        #[inline(always)]
        fn mul(self, rhs: Self) -> Self {
            unsafe { Self(_mm256_mul_pd(self.0, rhs.0)) }
        }
    }

    impl I64x4 {
        #[inline(always)]
        pub fn splat(value: i64) -> Self {
            unsafe { Self(_mm256_set1_epi64x(value)) }
        }

        #[inline(always)]
        pub fn to_array(self) -> [i64; 4] {
            let mut values = [0i64; 4];
            unsafe { _mm256_storeu_si256(values.as_mut_ptr() as *mut __m256i, self.0) };
            values
        }

        /// Lane-wise `self < rhs`.
        #[inline(always)]
        pub fn lt(self, rhs: Self) -> Mask4 {
            unsafe { Mask4(_mm256_cmpgt_epi64(rhs.0, self.0)) }
        }

        /// Adds 1 to every lane whose mask lane is set.
        #[inline(always)]
        pub fn increment(self, mask: Mask4) -> Self {
            unsafe {
                Self(_mm256_add_epi64(
                    self.0,
                    _mm256_and_si256(mask.0, _mm256_set1_epi64x(1)),
                ))
            }
        }
    }

    impl Mask4 {
        #[inline(always)]
        pub fn and(self, rhs: Self) -> Self {
            unsafe { Self(_mm256_and_si256(self.0, rhs.0)) }
        }

        /// True if any lane is set.
        #[inline(always)]
        pub fn any(self) -> bool {
            unsafe { _mm256_testz_si256(self.0, self.0) == 0 }
        }
    }
}

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
pub use avx2::{F64x4, I64x4, Mask4};

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
mod neon {
    use core::arch::aarch64::*;
    use core::ops::{Add, Mul, Sub};

    /// 4-lane f64 vector as two NEON doubles.
    #[derive(Clone, Copy, Debug)]
    pub struct F64x4(float64x2_t, float64x2_t);

    /// 4-lane i64 vector as two NEON doubles.
    #[derive(Clone, Copy, Debug)]
    pub struct I64x4(int64x2_t, int64x2_t);

    /// Per-lane boolean mask (all-ones or all-zeros per 64-bit lane).
    #[derive(Clone, Copy, Debug)]
    pub struct Mask4(uint64x2_t, uint64x2_t);

    impl F64x4 {
        #[inline(always)]
        pub fn splat(value: f64) -> Self {
            // SAFETY: neon is guaranteed by the enclosing #[cfg].
            unsafe { Self(vdupq_n_f64(value), vdupq_n_f64(value)) }
        }

        #[inline(always)]
        pub fn new(values: [f64; 4]) -> Self {
            unsafe {
                Self(
                    vld1q_f64(values.as_ptr()),
                    vld1q_f64(values.as_ptr().add(2)),
                )
            }
        }

        #[inline(always)]
        pub fn to_array(self) -> [f64; 4] {
            let mut values = [0.0f64; 4];
            unsafe {
                vst1q_f64(values.as_mut_ptr(), self.0);
                vst1q_f64(values.as_mut_ptr().add(2), self.1);
            }
            values
        }

        /// Lane-wise `self < rhs`.
        #[inline(always)]
        pub fn lt(self, rhs: Self) -> Mask4 {
            unsafe { Mask4(vcltq_f64(self.0, rhs.0), vcltq_f64(self.1, rhs.1)) }
        }
    }

    impl Add for F64x4 {
        type Output = Self;

        #[inline(always)]
        fn add(self, rhs: Self) -> Self {
            unsafe { Self(vaddq_f64(self.0, rhs.0), vaddq_f64(self.1, rhs.1)) }
        }
    }

    impl Sub for F64x4 {
        type Output = Self;

        #[inline(always)]
        fn sub(self, rhs: Self) -> Self {
            unsafe { Self(vsubq_f64(self.0, rhs.0), vsubq_f64(self.1, rhs.1)) }
        }
    }

    impl Mul for F64x4 {
        type Output = Self;

        #[inline(always)]
        fn mul(self, rhs: Self) -> Self {
            unsafe { Self(vmulq_f64(self.0, rhs.0), vmulq_f64(self.1, rhs.1)) }
        }
    }

    impl I64x4 {
        #[inline(always)]
        pub fn splat(value: i64) -> Self {
            unsafe { Self(vdupq_n_s64(value), vdupq_n_s64(value)) }
        }

        #[inline(always)]
        pub fn to_array(self) -> [i64; 4] {
            let mut values = [0i64; 4];
            unsafe {
                vst1q_s64(values.as_mut_ptr(), self.0);
                vst1q_s64(values.as_mut_ptr().add(2), self.1);
            }
            values
        }

        /// Lane-wise `self < rhs`.
        #[inline(always)]
        pub fn lt(self, rhs: Self) -> Mask4 {
            unsafe { Mask4(vcltq_s64(self.0, rhs.0), vcltq_s64(self.1, rhs.1)) }
        }

        /// Adds 1 to every lane whose mask lane is set.
        #[inline(always)]
        pub fn increment(self, mask: Mask4) -> Self {
            unsafe {
                let one = vdupq_n_u64(1);
                Self(
                    vaddq_s64(self.0, vreinterpretq_s64_u64(vandq_u64(mask.0, one))),
                    vaddq_s64(self.1, vreinterpretq_s64_u64(vandq_u64(mask.1, one))),
                )
            }
        }
    }

    impl Mask4 {
        #[inline(always)]
        pub fn and(self, rhs: Self) -> Self {
            unsafe { Self(vandq_u64(self.0, rhs.0), vandq_u64(self.1, rhs.1)) }
        }

        /// True if any lane is set.
        #[inline(always)]
        pub fn any(self) -> bool {
            unsafe {
                let combined = vorrq_u64(self.0, self.1);
                (vgetq_lane_u64::<0>(combined) | vgetq_lane_u64::<1>(combined)) != 0
            }
        }
    }
}

#[cfg(all(target_arch = "aarch64", target_feature = "neon"))]
pub use neon::{F64x4, I64x4, Mask4};

#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "avx2"),
    all(target_arch = "aarch64", target_feature = "neon")
)))]
mod fallback {
    use core::ops::{Add, Mul, Sub};

    /// 4-lane f64 vector, unrolled scalar.
    #[derive(Clone, Copy, Debug)]
    pub struct F64x4([f64; 4]);

    /// 4-lane i64 vector, unrolled scalar.
    #[derive(Clone, Copy, Debug)]
    pub struct I64x4([i64; 4]);

    /// Per-lane boolean mask.
    #[derive(Clone, Copy, Debug)]
    pub struct Mask4([bool; 4]);

    impl F64x4 {
        #[inline(always)]
        pub fn splat(value: f64) -> Self {
            Self([value; 4])
        }

        #[inline(always)]
        pub fn new(values: [f64; 4]) -> Self {
            Self(values)
        }

        #[inline(always)]
        pub fn to_array(self) -> [f64; 4] {
            self.0
        }

        /// Lane-wise `self < rhs`.
        #[inline(always)]
        pub fn lt(self, rhs: Self) -> Mask4 {
            Mask4([
                self.0[0] < rhs.0[0],
                self.0[1] < rhs.0[1],
                self.0[2] < rhs.0[2],
                self.0[3] < rhs.0[3],
            ])
        }
    }

    impl Add for F64x4 {
        type Output = Self;

        #[inline(always)]
        fn add(self, rhs: Self) -> Self {
            Self([
                self.0[0] + rhs.0[0],
                self.0[1] + rhs.0[1],
                self.0[2] + rhs.0[2],
                self.0[3] + rhs.0[3],
            ])
        }
    }

    impl Sub for F64x4 {
        type Output = Self;

        #[inline(always)]
        fn sub(self, rhs: Self) -> Self {
            Self([
                self.0[0] - rhs.0[0],
                self.0[1] - rhs.0[1],
                self.0[2] - rhs.0[2],
                self.0[3] - rhs.0[3],
            ])
        }
    }

    impl Mul for F64x4 {
        type Output = Self;

        #[inline(always)]
        fn mul(self, rhs: Self) -> Self {
            Self([
                self.0[0] * rhs.0[0],
                self.0[1] * rhs.0[1],
                self.0[2] * rhs.0[2],
                self.0[3] * rhs.0[3],
            ])
        }
    }

    impl I64x4 {
        #[inline(always)]
        pub fn splat(value: i64) -> Self {
            Self([value; 4])
        }

        #[inline(always)]
        pub fn to_array(self) -> [i64; 4] {
            self.0
        }

        /// Lane-wise `self < rhs`.
        #[inline(always)]
        pub fn lt(self, rhs: Self) -> Mask4 {
            Mask4([
                self.0[0] < rhs.0[0],
                self.0[1] < rhs.0[1],
                self.0[2] < rhs.0[2],
                self.0[3] < rhs.0[3],
            ])
        }

        /// Adds 1 to every lane whose mask lane is set.
        #[inline(always)]
        pub fn increment(self, mask: Mask4) -> Self {
            Self([
                self.0[0] + mask.0[0] as i64,
                self.0[1] + mask.0[1] as i64,
                self.0[2] + mask.0[2] as i64,
                self.0[3] + mask.0[3] as i64,
            ])
        }
    }

    impl Mask4 {
        #[inline(always)]
        pub fn and(self, rhs: Self) -> Self {
            Mask4([
                self.0[0] && rhs.0[0],
                self.0[1] && rhs.0[1],
                self.0[2] && rhs.0[2],
                self.0[3] && rhs.0[3],
            ])
        }

        /// True if any lane is set.
        #[inline(always)]
        pub fn any(self) -> bool {
            self.0[0] || self.0[1] || self.0[2] || self.0[3]
        }
    }
}

#[cfg(not(any(
    all(target_arch = "x86_64", target_feature = "avx2"),
    all(target_arch = "aarch64", target_feature = "neon")
)))]
pub use fallback::{F64x4, I64x4, Mask4};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64x4_roundtrip() {
        let v = F64x4::new([1.0, -2.5, 0.0, f64::MAX]);
        assert_eq!(v.to_array(), [1.0, -2.5, 0.0, f64::MAX]);
        assert_eq!(F64x4::splat(3.25).to_array(), [3.25; 4]);
    }

    #[test]
    fn f64x4_arithmetic_is_lane_wise() {
        let a = F64x4::new([1.0, 2.0, 3.0, 4.0]);
        let b = F64x4::new([0.5, -1.0, 2.0, 10.0]);
        assert_eq!((a + b).to_array(), [1.5, 1.0, 5.0, 14.0]);
        assert_eq!((a - b).to_array(), [0.5, 3.0, 1.0, -6.0]);
        assert_eq!((a * b).to_array(), [0.5, -2.0, 6.0, 40.0]);
    }

    #[test]
    fn f64_compare_drives_increment() {
        let magnitude = F64x4::new([3.9, 4.0, 4.1, 0.0]);
        let mask = magnitude.lt(F64x4::splat(4.0));
        let counts = I64x4::splat(7).increment(mask);
        assert_eq!(counts.to_array(), [8, 7, 7, 8]);
    }

    #[test]
    fn i64_compare_is_strict() {
        let n = I64x4::splat(5);
        let below = n.lt(I64x4::splat(6));
        let equal = n.lt(I64x4::splat(5));
        assert_eq!(n.increment(below).to_array(), [6; 4]);
        assert_eq!(n.increment(equal).to_array(), [5; 4]);
    }

    #[test]
    fn mask_and_any() {
        let lo = F64x4::new([1.0, 9.0, 1.0, 9.0]).lt(F64x4::splat(4.0));
        let hi = F64x4::new([1.0, 1.0, 9.0, 9.0]).lt(F64x4::splat(4.0));
        let both = lo.and(hi);
        assert!(both.any());
        assert_eq!(I64x4::splat(0).increment(both).to_array(), [1, 0, 0, 0]);

        let none = F64x4::splat(9.0).lt(F64x4::splat(4.0));
        assert!(!none.any());
    }

    #[test]
    fn nan_compares_false() {
        let mask = F64x4::splat(f64::NAN).lt(F64x4::splat(4.0));
        assert!(!mask.any());
    }
}
