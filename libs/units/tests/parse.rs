//! End-to-end parsing scenarios.

use spica_units::{parse, BaseQuantity, Error, Function, UnitsVector};

/// Build an expected exponent vector from sparse entries.
fn units(entries: &[(BaseQuantity, f64)]) -> UnitsVector {
    let mut v = UnitsVector::ZERO;
    for &(quantity, exp) in entries {
        v[quantity] += exp;
    }
    v
}

fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-12 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "{actual} differs from {expected}"
    );
}

#[test]
fn metre() {
    let parsed = parse("m").unwrap();
    assert_eq!(parsed.func, Function::None);
    assert_eq!(parsed.scale, 1.0);
    assert_eq!(parsed.units, units(&[(BaseQuantity::Length, 1.0)]));
}

#[test]
fn velocity() {
    let parsed = parse("km/s").unwrap();
    assert_eq!(parsed.func, Function::None);
    assert_eq!(parsed.scale, 1000.0);
    assert_eq!(
        parsed.units,
        units(&[(BaseQuantity::Length, 1.0), (BaseQuantity::Time, -1.0)])
    );
}

#[test]
fn spectral_flux_density() {
    let parsed = parse("10**-12 erg/(cm**2 s Angstrom)").unwrap();
    assert_eq!(parsed.func, Function::None);
    assert_close(parsed.scale, 1e-5);
    assert_eq!(
        parsed.units,
        units(&[
            (BaseQuantity::Mass, 1.0),
            (BaseQuantity::Length, -1.0),
            (BaseQuantity::Time, -3.0),
        ])
    );
}

#[test]
fn log_frequency() {
    let parsed = parse("log(Hz)").unwrap();
    assert_eq!(parsed.func, Function::Log);
    assert_eq!(parsed.scale, 1.0);
    assert_eq!(parsed.units, units(&[(BaseQuantity::Time, -1.0)]));
}

#[test]
fn natural_log_and_exp() {
    assert_eq!(parse("ln(s)").unwrap().func, Function::Ln);
    assert_eq!(parse("exp(Hz)").unwrap().func, Function::Exp);
}

#[test]
fn flux_per_beam() {
    let parsed = parse("Jy/beam").unwrap();
    assert_eq!(parsed.func, Function::None);
    assert_eq!(parsed.scale, 1e-26);
    assert_eq!(
        parsed.units,
        units(&[
            (BaseQuantity::Mass, 1.0),
            (BaseQuantity::Time, -2.0),
            (BaseQuantity::Beam, -1.0),
        ])
    );
}

#[test]
fn unmatched_paren() {
    assert_eq!(parse("("), Err(Error::UnbalancedParen("(".into())));
}

#[test]
fn trailing_exponent_marker() {
    assert_eq!(parse("m**"), Err(Error::DanglingOperator("m**".into())));
}

#[test]
fn double_divide() {
    assert_eq!(parse("m//s"), Err(Error::ConsecutiveOperators("m//s".into())));
}

#[test]
fn nested_function() {
    assert_eq!(
        parse("exp(log(Hz))"),
        Err(Error::FunctionContext("exp(log(Hz))".into()))
    );
}

#[test]
fn chained_division() {
    let parsed = parse("erg/s/cm**2").unwrap();
    assert_close(parsed.scale, 1e-3);
    assert_eq!(
        parsed.units,
        units(&[(BaseQuantity::Mass, 1.0), (BaseQuantity::Time, -3.0)])
    );
}

#[test]
fn byte_is_eight_bits() {
    for spelling in ["byte", "Byte"] {
        let parsed = parse(spelling).unwrap();
        assert_eq!(parsed.scale, 8.0);
        assert_eq!(parsed.units, units(&[(BaseQuantity::Bit, 1.0)]));
    }
    assert_eq!(parse("kByte").unwrap().scale, 8000.0);
}

#[test]
fn count_spellings_agree() {
    let count = parse("count").unwrap();
    for spelling in ["ct", "adu", "photon", "ph"] {
        assert_eq!(parse(spelling).unwrap().units, count.units, "{spelling}");
    }
}

#[test]
fn angles_scale_to_degrees() {
    assert_eq!(parse("deg").unwrap().scale, 1.0);
    assert_close(parse("arcmin").unwrap().scale, 1.0 / 60.0);
    assert_close(parse("arcsec").unwrap().scale, 1.0 / 3600.0);
    assert_close(parse("mas").unwrap().scale, 1.0 / 3.6e6);
    assert_close(parse("rad").unwrap().scale, 57.29577951308232);
    let vector = units(&[(BaseQuantity::PlaneAngle, 1.0)]);
    for spelling in ["deg", "arcmin", "arcsec", "mas", "turn", "rad"] {
        assert_eq!(parse(spelling).unwrap().units, vector, "{spelling}");
    }
}

#[test]
fn magnitudes_per_area() {
    let parsed = parse("mag/arcsec**2").unwrap();
    assert_close(parsed.scale, 3600.0 * 3600.0);
    assert_eq!(
        parsed.units,
        units(&[(BaseQuantity::Magnitude, 1.0), (BaseQuantity::PlaneAngle, -2.0)])
    );
}

#[test]
fn solar_units() {
    assert_eq!(parse("solMass").unwrap().units, units(&[(BaseQuantity::Mass, 1.0)]));
    assert_eq!(parse("Sun").unwrap().units, units(&[(BaseQuantity::SolarRatio, 1.0)]));
    assert_eq!(parse("solLum/pc**2").unwrap().func, Function::None);
}

#[test]
fn noise_density() {
    let parsed = parse("1/sqrt(Hz)").unwrap();
    assert_eq!(parsed.scale, 1.0);
    assert_eq!(parsed.units, units(&[(BaseQuantity::Time, 0.5)]));
}

#[test]
fn grouped_term_with_exponent() {
    let parsed = parse("(km/s)**2").unwrap();
    assert_close(parsed.scale, 1e6);
    assert_eq!(
        parsed.units,
        units(&[(BaseQuantity::Length, 2.0), (BaseQuantity::Time, -2.0)])
    );
}

#[test]
fn explicit_multiplication_forms() {
    let expected = parse("J s").unwrap();
    assert_eq!(parse("J*s").unwrap(), expected);
    assert_eq!(parse("J.s").unwrap(), expected);
}

#[test]
fn error_messages_quote_the_input() {
    let err = parse("10**-12 furlong").unwrap_err();
    assert!(err.to_string().contains("10**-12 furlong"));
}

#[test]
fn errors_carry_no_partial_result() {
    for input in ["(", "m**", "m//s", "exp(log(Hz))", "[m", "105", "?"] {
        assert!(parse(input).is_err(), "{input}");
    }
}
