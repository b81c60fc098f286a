//! The elementary reflection record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Miller index `(h, k, l)` of a reciprocal-lattice point.
pub type Miller = [i32; 3];

/// Friedel sign of a measurement.
///
/// Variants are declared in numeric order (-1, 0, +1) so the derived
/// ordering matches the sort order of merged data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    /// I(-).
    Minus,
    /// Sign not tracked; Friedel mates pooled together.
    #[default]
    Pooled,
    /// I(+).
    Plus,
}

impl Sign {
    /// Sign implied by a symmetry-operation code: odd codes map the index
    /// directly (I(+)), even codes go through the Friedel mate (I(-)).
    pub fn from_isym(isym: i32) -> Self {
        if isym % 2 == 0 { Sign::Minus } else { Sign::Plus }
    }

    pub fn is_tracked(self) -> bool {
        self != Sign::Pooled
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Minus => f.write_str("-"),
            Sign::Pooled => f.write_str("0"),
            Sign::Plus => f.write_str("+"),
        }
    }
}

/// One intensity measurement (or merged estimate) of a reflection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Refl {
    pub hkl: Miller,
    pub sign: Sign,
    pub value: f64,
    /// Standard deviation of `value`.
    pub sigma: f64,
}

impl Refl {
    pub fn new(hkl: Miller, sign: Sign, value: f64, sigma: f64) -> Self {
        Self {
            hkl,
            sign,
            value,
            sigma,
        }
    }

    /// True when the record can take part in merging: the value is a number
    /// and the sigma is strictly positive.
    ///
    /// XDS marks rejected observations with a negative sigma, and a zero
    /// sigma cannot be weighted.
    pub fn is_valid(&self) -> bool {
        !self.value.is_nan() && self.sigma > 0.0
    }

    /// Sort and merge key: records order lexicographically by
    /// `(h, k, l, sign)`; measured values never take part.
    pub fn key(&self) -> (Miller, Sign) {
        (self.hkl, self.sign)
    }

    pub fn same_key(&self, other: &Refl) -> bool {
        self.hkl == other.hkl && self.sign == other.sign
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_from_isym_parity() {
        assert_eq!(Sign::from_isym(1), Sign::Plus);
        assert_eq!(Sign::from_isym(2), Sign::Minus);
        assert_eq!(Sign::from_isym(7), Sign::Plus);
        assert_eq!(Sign::from_isym(12), Sign::Minus);
    }

    #[test]
    fn sign_orders_numerically() {
        assert!(Sign::Minus < Sign::Pooled);
        assert!(Sign::Pooled < Sign::Plus);
    }

    #[test]
    fn validity_rejects_nan_and_non_positive_sigma() {
        assert!(Refl::new([1, 2, 3], Sign::Pooled, 5.0, 0.5).is_valid());
        assert!(Refl::new([1, 2, 3], Sign::Pooled, -5.0, 0.5).is_valid());
        assert!(!Refl::new([1, 2, 3], Sign::Pooled, f64::NAN, 0.5).is_valid());
        assert!(!Refl::new([1, 2, 3], Sign::Pooled, 5.0, 0.0).is_valid());
        assert!(!Refl::new([1, 2, 3], Sign::Pooled, 5.0, -1.0).is_valid());
        assert!(!Refl::new([1, 2, 3], Sign::Pooled, 5.0, f64::NAN).is_valid());
    }

    #[test]
    fn key_ignores_values() {
        let a = Refl::new([1, 1, 1], Sign::Plus, 1.0, 1.0);
        let b = Refl::new([1, 1, 1], Sign::Plus, 9.0, 3.0);
        assert_eq!(a.key(), b.key());
        assert!(a.same_key(&b));
        assert!(!a.same_key(&Refl::new([1, 1, 1], Sign::Minus, 1.0, 1.0)));
    }
}
