use std::fmt::Debug;

use num_traits::{Num, NumCast, Signed, ToPrimitive};

/// A trait for numeric types that can be used as point coordinates.
///
/// This trait is sealed and cannot be implemented for external types. The
/// index stores coordinate differences and their squares, so only signed
/// integers and floating point types are admitted; unsigned integers would
/// underflow the distance arithmetic.
pub trait CoordNum:
    private::Sealed + Num + NumCast + ToPrimitive + Signed + PartialOrd + Copy + Debug + Send + Sync
{
    /// The square of this value, as used by the squared-distance tests.
    #[inline]
    fn square(self) -> Self {
        self * self
    }
}

impl CoordNum for i8 {}
impl CoordNum for i16 {}
impl CoordNum for i32 {}
impl CoordNum for i64 {}
impl CoordNum for f32 {}
impl CoordNum for f64 {}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for i8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
