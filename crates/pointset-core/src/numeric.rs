//! Numeric trait for histogram marks
//!
//! Histograms count with integers and compare with floats; this trait is the
//! common bound that lets one histogram type serve both without committing
//! to a representation.

use num_traits::{Num, NumCast, ToPrimitive};
use std::fmt::Debug;

/// A mark type a histogram can accumulate
///
/// Blanket-implemented for every primitive integer and float.
pub trait BinCount: Num + NumCast + ToPrimitive + Copy + PartialOrd + Debug {
    /// Convert to `f64` for probability arithmetic
    ///
    /// Falls back to NaN for values `f64` cannot represent, which never
    /// happens for the primitive types.
    fn as_f64(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl<T> BinCount for T where T: Num + NumCast + ToPrimitive + Copy + PartialOrd + Debug {}
