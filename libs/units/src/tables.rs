//! Static unit-atom and metric-prefix tables.
//!
//! The atom table defines every recognised unit name, its conversion
//! factor to coherent base units, its base-quantity signature, and which
//! metric prefixes it admits. Lookup is a linear longest-match scan; the
//! table is small enough that nothing faster is warranted.

use crate::vector::{BaseQuantity, UnitsVector};
use once_cell::sync::Lazy;
use std::f64::consts::PI;

/// Which metric prefixes a unit atom accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrefixPolicy {
    /// No prefix may be attached.
    None,
    /// Only submultiple prefixes (deci and below).
    SubOnly,
    /// Only multiple prefixes (deka and above).
    SuperOnly,
    /// Any prefix.
    Any,
}

/// Submultiple or multiple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrefixClass {
    Sub,
    Super,
}

impl PrefixPolicy {
    pub(crate) fn admits(self, class: PrefixClass) -> bool {
        match self {
            PrefixPolicy::None => false,
            PrefixPolicy::SubOnly => class == PrefixClass::Sub,
            PrefixPolicy::SuperOnly => class == PrefixClass::Super,
            PrefixPolicy::Any => true,
        }
    }
}

/// A metric prefix.
#[derive(Debug)]
pub(crate) struct Prefix {
    pub(crate) symbol: &'static str,
    pub(crate) multiplier: f64,
    pub(crate) class: PrefixClass,
}

/// A recognised unit atom.
#[derive(Debug)]
pub(crate) struct AtomDef {
    pub(crate) name: &'static str,
    pub(crate) factor: f64,
    pub(crate) delta: UnitsVector,
    pub(crate) policy: PrefixPolicy,
}

pub(crate) static PREFIXES: [Prefix; 20] = [
    Prefix { symbol: "y", multiplier: 1e-24, class: PrefixClass::Sub },
    Prefix { symbol: "z", multiplier: 1e-21, class: PrefixClass::Sub },
    Prefix { symbol: "a", multiplier: 1e-18, class: PrefixClass::Sub },
    Prefix { symbol: "f", multiplier: 1e-15, class: PrefixClass::Sub },
    Prefix { symbol: "p", multiplier: 1e-12, class: PrefixClass::Sub },
    Prefix { symbol: "n", multiplier: 1e-9, class: PrefixClass::Sub },
    Prefix { symbol: "u", multiplier: 1e-6, class: PrefixClass::Sub },
    Prefix { symbol: "m", multiplier: 1e-3, class: PrefixClass::Sub },
    Prefix { symbol: "c", multiplier: 1e-2, class: PrefixClass::Sub },
    Prefix { symbol: "d", multiplier: 1e-1, class: PrefixClass::Sub },
    Prefix { symbol: "da", multiplier: 1e1, class: PrefixClass::Super },
    Prefix { symbol: "h", multiplier: 1e2, class: PrefixClass::Super },
    Prefix { symbol: "k", multiplier: 1e3, class: PrefixClass::Super },
    Prefix { symbol: "M", multiplier: 1e6, class: PrefixClass::Super },
    Prefix { symbol: "G", multiplier: 1e9, class: PrefixClass::Super },
    Prefix { symbol: "T", multiplier: 1e12, class: PrefixClass::Super },
    Prefix { symbol: "P", multiplier: 1e15, class: PrefixClass::Super },
    Prefix { symbol: "E", multiplier: 1e18, class: PrefixClass::Super },
    Prefix { symbol: "Z", multiplier: 1e21, class: PrefixClass::Super },
    Prefix { symbol: "Y", multiplier: 1e24, class: PrefixClass::Super },
];

fn def(
    name: &'static str,
    factor: f64,
    policy: PrefixPolicy,
    deltas: &[(BaseQuantity, f64)],
) -> AtomDef {
    let mut delta = UnitsVector::ZERO;
    for &(quantity, exp) in deltas {
        delta[quantity] += exp;
    }
    AtomDef { name, factor, delta, policy }
}

static ATOMS: Lazy<Vec<AtomDef>> = Lazy::new(|| {
    use BaseQuantity::*;
    use PrefixPolicy::{Any, None as NoPrefix, SubOnly, SuperOnly};

    vec![
        // SI base units.
        def("s", 1.0, Any, &[(Time, 1.0)]),
        def("m", 1.0, Any, &[(Length, 1.0)]),
        def("g", 1e-3, Any, &[(Mass, 1.0)]),
        def("rad", 180.0 / PI, Any, &[(PlaneAngle, 1.0)]),
        def("sr", 1.0, Any, &[(SolidAngle, 1.0)]),
        def("K", 1.0, Any, &[(Temperature, 1.0)]),
        def("A", 1.0, Any, &[(Charge, 1.0), (Time, -1.0)]),
        def("mol", 1.0, Any, &[(Mole, 1.0)]),
        def("cd", 1.0, Any, &[(LuminousIntensity, 1.0)]),
        // SI derived units.
        def("Hz", 1.0, Any, &[(Time, -1.0)]),
        def("J", 1.0, Any, &[(Mass, 1.0), (Length, 2.0), (Time, -2.0)]),
        def("W", 1.0, Any, &[(Mass, 1.0), (Length, 2.0), (Time, -3.0)]),
        def("V", 1.0, Any, &[(Mass, 1.0), (Length, 1.0), (Time, -2.0), (Charge, -1.0)]),
        def("N", 1.0, Any, &[(Mass, 1.0), (Length, 1.0), (Time, -2.0)]),
        def("Pa", 1.0, Any, &[(Mass, 1.0), (Length, -1.0), (Time, -2.0)]),
        def("C", 1.0, Any, &[(Charge, 1.0)]),
        def("ohm", 1.0, Any, &[(Mass, 1.0), (Length, 2.0), (Time, -1.0), (Charge, -2.0)]),
        def("Ohm", 1.0, Any, &[(Mass, 1.0), (Length, 2.0), (Time, -1.0), (Charge, -2.0)]),
        def("S", 1.0, Any, &[(Mass, -1.0), (Length, -2.0), (Time, 1.0), (Charge, 2.0)]),
        def("F", 1.0, Any, &[(Mass, -1.0), (Length, -2.0), (Time, 3.0), (Charge, 2.0)]),
        def("Wb", 1.0, Any, &[(Mass, 1.0), (Length, 2.0), (Time, 1.0), (Charge, -1.0)]),
        def("T", 1.0, Any, &[(Mass, 1.0), (Time, 1.0), (Charge, -1.0)]),
        def("H", 1.0, Any, &[(Mass, 1.0), (Length, 2.0), (Time, 2.0), (Charge, -2.0)]),
        def("lm", 1.0, Any, &[(LuminousIntensity, 1.0), (SolidAngle, 1.0)]),
        def("lx", 1.0, Any, &[(LuminousIntensity, 1.0), (SolidAngle, 1.0), (Length, -2.0)]),
        // Other units that admit any prefix.
        def("eV", 1.6021765e-19, Any, &[(Mass, 1.0), (Length, 2.0), (Time, -2.0)]),
        def("Jy", 1e-26, Any, &[(Mass, 1.0), (Time, -2.0)]),
        def("R", 1e10 / (4.0 * PI), Any, &[(Length, -2.0), (Time, -1.0), (SolidAngle, -1.0)]),
        def("G", 1e-4, Any, &[(Mass, 1.0), (Time, 1.0), (Charge, -1.0)]),
        def("barn", 1e-28, Any, &[(Length, 2.0)]),
        // Multiple prefixes only.
        def("a", 31557600.0, SuperOnly, &[(Time, 1.0)]),
        def("yr", 31557600.0, SuperOnly, &[(Time, 1.0)]),
        def("pc", 3.0857e16, SuperOnly, &[(Length, 1.0)]),
        def("bit", 1.0, SuperOnly, &[(Bit, 1.0)]),
        def("byte", 8.0, SuperOnly, &[(Bit, 1.0)]),
        def("Byte", 8.0, SuperOnly, &[(Bit, 1.0)]),
        // Submultiple prefixes only.
        def("mag", 1.0, SubOnly, &[(Magnitude, 1.0)]),
        // Angles.
        def("deg", 1.0, NoPrefix, &[(PlaneAngle, 1.0)]),
        def("arcmin", 1.0 / 60.0, NoPrefix, &[(PlaneAngle, 1.0)]),
        def("arcsec", 1.0 / 3600.0, NoPrefix, &[(PlaneAngle, 1.0)]),
        def("mas", 1.0 / 3.6e6, NoPrefix, &[(PlaneAngle, 1.0)]),
        def("turn", 360.0, NoPrefix, &[(PlaneAngle, 1.0)]),
        // Time intervals.
        def("min", 60.0, NoPrefix, &[(Time, 1.0)]),
        def("h", 3600.0, NoPrefix, &[(Time, 1.0)]),
        def("d", 86400.0, NoPrefix, &[(Time, 1.0)]),
        def("cy", 3.15576e9, NoPrefix, &[(Time, 1.0)]),
        // Laboratory units.
        def("erg", 1e-7, NoPrefix, &[(Mass, 1.0), (Length, 2.0), (Time, -2.0)]),
        def("Ry", 13.605692 * 1.6021765e-19, NoPrefix, &[(Mass, 1.0), (Length, 2.0), (Time, -2.0)]),
        def("u", 1.6605387e-27, NoPrefix, &[(Mass, 1.0)]),
        def("D", 1e-29 / 3.0, NoPrefix, &[(Charge, 1.0), (Length, 1.0)]),
        // Astronomical units.
        def("angstrom", 1e-10, NoPrefix, &[(Length, 1.0)]),
        def("Angstrom", 1e-10, NoPrefix, &[(Length, 1.0)]),
        def("AU", 1.49598e11, NoPrefix, &[(Length, 1.0)]),
        def("lyr", 2.99792458e8 * 31557600.0, NoPrefix, &[(Length, 1.0)]),
        def("beam", 1.0, NoPrefix, &[(Beam, 1.0)]),
        def("solRad", 6.9599e8, NoPrefix, &[(Length, 1.0)]),
        def("solMass", 1.9891e30, NoPrefix, &[(Mass, 1.0)]),
        def("solLum", 3.8268e26, NoPrefix, &[(Mass, 1.0), (Length, 2.0), (Time, -3.0)]),
        def("Sun", 1.0, NoPrefix, &[(SolarRatio, 1.0)]),
        // Instrument units.
        def("adu", 1.0, NoPrefix, &[(Count, 1.0)]),
        def("bin", 1.0, NoPrefix, &[(Bin, 1.0)]),
        def("chan", 1.0, NoPrefix, &[(Bin, 1.0)]),
        def("count", 1.0, NoPrefix, &[(Count, 1.0)]),
        def("ct", 1.0, NoPrefix, &[(Count, 1.0)]),
        def("photon", 1.0, NoPrefix, &[(Count, 1.0)]),
        def("ph", 1.0, NoPrefix, &[(Count, 1.0)]),
        def("pixel", 1.0, NoPrefix, &[(Pixel, 1.0)]),
        def("pix", 1.0, NoPrefix, &[(Pixel, 1.0)]),
        def("voxel", 1.0, NoPrefix, &[(Voxel, 1.0)]),
    ]
});

pub(crate) fn atoms() -> &'static [AtomDef] {
    ATOMS.as_slice()
}

pub(crate) fn prefixes() -> &'static [Prefix] {
    &PREFIXES
}

/// A resolved unit token at the head of the input.
#[derive(Clone, Copy)]
pub(crate) struct UnitMatch {
    pub(crate) prefix: Option<&'static Prefix>,
    pub(crate) atom: &'static AtomDef,
    pub(crate) len: usize,
}

/// Longest match at the head of `rest` among bare atoms and admissible
/// prefix+atom pairs. On equal length the bare atom wins, so `cd` is the
/// candela and `Pa` the pascal rather than centi-day or peta-year.
pub(crate) fn match_unit(rest: &str) -> Option<UnitMatch> {
    let mut best: Option<UnitMatch> = None;

    for atom in atoms() {
        if rest.starts_with(atom.name) && best.map_or(true, |b| atom.name.len() > b.len) {
            best = Some(UnitMatch { prefix: None, atom, len: atom.name.len() });
        }
    }

    for prefix in prefixes() {
        let Some(tail) = rest.strip_prefix(prefix.symbol) else {
            continue;
        };
        for atom in atoms() {
            if !atom.policy.admits(prefix.class) {
                continue;
            }
            let len = prefix.symbol.len() + atom.name.len();
            if tail.starts_with(atom.name) && best.map_or(true, |b| len > b.len) {
                best = Some(UnitMatch { prefix: Some(prefix), atom, len });
            }
        }
    }

    best
}
