//! Base-quantity exponent vectors.
//!
//! Every parsed units expression reduces to a scale factor plus a
//! fixed-length vector of exponents over the base quantities below. The
//! position of each quantity within the vector is part of the public
//! contract and must not be reordered.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Number of base quantities tracked by a [`UnitsVector`].
pub const QUANTITY_COUNT: usize = 17;

/// The base quantities, in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum BaseQuantity {
    Time = 0,
    Length = 1,
    Mass = 2,
    PlaneAngle = 3,
    SolidAngle = 4,
    Charge = 5,
    Mole = 6,
    Temperature = 7,
    LuminousIntensity = 8,
    SolarRatio = 9,
    Magnitude = 10,
    Pixel = 11,
    Count = 12,
    Voxel = 13,
    Bin = 14,
    Bit = 15,
    Beam = 16,
}

impl BaseQuantity {
    /// All quantities in vector order.
    pub const ALL: [BaseQuantity; QUANTITY_COUNT] = [
        BaseQuantity::Time,
        BaseQuantity::Length,
        BaseQuantity::Mass,
        BaseQuantity::PlaneAngle,
        BaseQuantity::SolidAngle,
        BaseQuantity::Charge,
        BaseQuantity::Mole,
        BaseQuantity::Temperature,
        BaseQuantity::LuminousIntensity,
        BaseQuantity::SolarRatio,
        BaseQuantity::Magnitude,
        BaseQuantity::Pixel,
        BaseQuantity::Count,
        BaseQuantity::Voxel,
        BaseQuantity::Bin,
        BaseQuantity::Bit,
        BaseQuantity::Beam,
    ];

    /// Short name used when rendering dimensional signatures.
    pub fn name(self) -> &'static str {
        match self {
            BaseQuantity::Time => "time",
            BaseQuantity::Length => "length",
            BaseQuantity::Mass => "mass",
            BaseQuantity::PlaneAngle => "plane_angle",
            BaseQuantity::SolidAngle => "solid_angle",
            BaseQuantity::Charge => "charge",
            BaseQuantity::Mole => "mole",
            BaseQuantity::Temperature => "temperature",
            BaseQuantity::LuminousIntensity => "intensity",
            BaseQuantity::SolarRatio => "solar",
            BaseQuantity::Magnitude => "mag",
            BaseQuantity::Pixel => "pixel",
            BaseQuantity::Count => "count",
            BaseQuantity::Voxel => "voxel",
            BaseQuantity::Bin => "bin",
            BaseQuantity::Bit => "bit",
            BaseQuantity::Beam => "beam",
        }
    }
}

/// Exponents of the base quantities for a compound unit.
///
/// Entries are small rationals in practice (`sqrt` contributes halves);
/// the all-zero vector denotes a dimensionless result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitsVector(pub [f64; QUANTITY_COUNT]);

impl UnitsVector {
    /// The dimensionless vector.
    pub const ZERO: UnitsVector = UnitsVector([0.0; QUANTITY_COUNT]);

    /// True if every exponent is zero.
    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|&e| e == 0.0)
    }

    /// Signature of a product of units (exponents add).
    pub fn multiply(&self, other: &UnitsVector) -> UnitsVector {
        let mut out = UnitsVector::ZERO;
        for i in 0..QUANTITY_COUNT {
            out.0[i] = self.0[i] + other.0[i];
        }
        out
    }

    /// Signature of a quotient of units (exponents subtract).
    pub fn divide(&self, other: &UnitsVector) -> UnitsVector {
        let mut out = UnitsVector::ZERO;
        for i in 0..QUANTITY_COUNT {
            out.0[i] = self.0[i] - other.0[i];
        }
        out
    }

    /// Signature of a unit raised to a power (exponents scale).
    pub fn power(&self, exp: f64) -> UnitsVector {
        let mut out = UnitsVector::ZERO;
        for i in 0..QUANTITY_COUNT {
            out.0[i] = self.0[i] * exp;
        }
        out
    }

    /// Signature of the reciprocal unit.
    pub fn invert(&self) -> UnitsVector {
        self.power(-1.0)
    }
}

impl Index<BaseQuantity> for UnitsVector {
    type Output = f64;

    fn index(&self, quantity: BaseQuantity) -> &f64 {
        &self.0[quantity as usize]
    }
}

impl IndexMut<BaseQuantity> for UnitsVector {
    fn index_mut(&mut self, quantity: BaseQuantity) -> &mut f64 {
        &mut self.0[quantity as usize]
    }
}

impl fmt::Display for UnitsVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        for quantity in BaseQuantity::ALL {
            let exp = self[quantity];
            if exp == 0.0 {
                continue;
            }
            if exp == 1.0 {
                parts.push(quantity.name().to_string());
            } else {
                parts.push(format!("{}^{}", quantity.name(), exp));
            }
        }
        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_dimensionless() {
        assert!(UnitsVector::ZERO.is_dimensionless());

        let mut v = UnitsVector::ZERO;
        v[BaseQuantity::Length] = 1.0;
        assert!(!v.is_dimensionless());
    }

    #[test]
    fn multiply_adds_exponents() {
        let mut length = UnitsVector::ZERO;
        length[BaseQuantity::Length] = 1.0;
        let mut per_time = UnitsVector::ZERO;
        per_time[BaseQuantity::Time] = -1.0;

        let velocity = length.multiply(&per_time);
        assert_eq!(velocity[BaseQuantity::Length], 1.0);
        assert_eq!(velocity[BaseQuantity::Time], -1.0);
    }

    #[test]
    fn divide_then_multiply_round_trips() {
        let mut a = UnitsVector::ZERO;
        a[BaseQuantity::Mass] = 1.0;
        a[BaseQuantity::Time] = -2.0;
        let mut b = UnitsVector::ZERO;
        b[BaseQuantity::Beam] = 1.0;

        assert_eq!(a.divide(&b).multiply(&b), a);
    }

    #[test]
    fn power_scales_exponents() {
        let mut v = UnitsVector::ZERO;
        v[BaseQuantity::Length] = 1.0;
        v[BaseQuantity::Time] = -1.0;

        let squared = v.power(2.0);
        assert_eq!(squared[BaseQuantity::Length], 2.0);
        assert_eq!(squared[BaseQuantity::Time], -2.0);

        assert_eq!(v.invert(), v.power(-1.0));
    }

    #[test]
    fn display_signature() {
        assert_eq!(UnitsVector::ZERO.to_string(), "1");

        let mut v = UnitsVector::ZERO;
        v[BaseQuantity::Mass] = 1.0;
        v[BaseQuantity::Length] = -1.0;
        v[BaseQuantity::Time] = -3.0;
        assert_eq!(v.to_string(), "time^-3 length^-1 mass");

        let mut half = UnitsVector::ZERO;
        half[BaseQuantity::Time] = 0.5;
        assert_eq!(half.to_string(), "time^0.5");
    }
}
