//! Units-specification scanner.
//!
//! A mode-driven scanner over the input bytes. Each step fires the
//! longest matching rule for the current mode, folding prefix and atom
//! factors into the running term and committing the term when an
//! operator or the end of input closes it. Parenthesised sub-expressions
//! are isolated and fed back through a fresh scanner, so parsing is
//! re-entrant and all state lives on the stack.

use crate::error::{Error, Result};
use crate::tables::{self, UnitMatch};
use crate::vector::{UnitsVector, QUANTITY_COUNT};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Nesting deeper than this is rejected as an internal error.
const MAX_RECURSION_DEPTH: usize = 64;

/// Unary function enclosing a units specification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Function {
    /// No enclosing function.
    #[default]
    None,
    /// Common logarithm, `log(...)`.
    Log,
    /// Natural logarithm, `ln(...)`.
    Ln,
    /// Exponential, `exp(...)`.
    Exp,
}

/// Result of parsing a units specification.
///
/// `scale` relates a value expressed in the parsed units to coherent
/// base units; `units` is its exponent vector over the base quantities.
/// When `func` is not [`Function::None`] the caller applies that
/// function to the measurand after scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedUnits {
    pub func: Function,
    pub scale: f64,
    pub units: UnitsVector,
}

/// Parse a FITS-style units specification.
///
/// ```
/// use spica_units::{parse, BaseQuantity};
///
/// let flux = parse("Jy/beam").unwrap();
/// assert_eq!(flux.scale, 1e-26);
/// assert_eq!(flux.units[BaseQuantity::Beam], -1.0);
/// ```
pub fn parse(input: &str) -> Result<ParsedUnits> {
    trace!(input, "parsing units specification");
    match UnitsParser::new(input, 0).run() {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            debug!(%err, "units parse failed");
            Err(err)
        }
    }
}

/// Check a units specification for validity, discarding the result.
pub fn validate(input: &str) -> Result<()> {
    parse(input).map(|_| ())
}

/// Scanner modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Between terms or at the start of the input.
    Initial,
    /// Capturing a parenthesised sub-expression.
    Paren,
    /// Consuming a staged metric prefix.
    Prefix,
    /// Consuming a staged unit atom.
    Units,
    /// After a term, reading its exponent and the following operator.
    Expon,
    /// Discarding the remainder after a diagnostic.
    Flush,
}

/// Diagnostic category recorded while scanning; paired with the input
/// text only when the parse finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Diag {
    Multiplier,
    Dangling,
    Consecutive,
    Symbol,
    Exponent,
    Function,
    Paren,
    Bracket,
    Internal,
}

impl Diag {
    fn error(self, input: &str) -> Error {
        let text = input.to_owned();
        match self {
            Diag::Multiplier => Error::InvalidMultiplier(text),
            Diag::Dangling => Error::DanglingOperator(text),
            Diag::Consecutive => Error::ConsecutiveOperators(text),
            Diag::Symbol => Error::InvalidSymbol(text),
            Diag::Exponent => Error::InvalidExponent(text),
            Diag::Function => Error::FunctionContext(text),
            Diag::Paren => Error::UnbalancedParen(text),
            Diag::Bracket => Error::UnbalancedBracket(text),
            Diag::Internal => Error::Internal(text),
        }
    }

    fn of(err: &Error) -> Diag {
        match err {
            Error::InvalidMultiplier(_) => Diag::Multiplier,
            Error::DanglingOperator(_) => Diag::Dangling,
            Error::ConsecutiveOperators(_) => Diag::Consecutive,
            Error::InvalidSymbol(_) => Diag::Symbol,
            Error::InvalidExponent(_) => Diag::Exponent,
            Error::FunctionContext(_) => Diag::Function,
            Error::UnbalancedParen(_) => Diag::Paren,
            Error::UnbalancedBracket(_) => Diag::Bracket,
            Error::Internal(_) => Diag::Internal,
        }
    }
}

struct UnitsParser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    mode: Mode,

    func: Function,
    scale: f64,
    units: UnitsVector,

    // Per-term state, folded into the accumulator on commit.
    types: UnitsVector,
    factor: f64,
    expon: f64,

    bracket: i32,
    paren: i32,
    operator: i32,
    leading: bool,
    committed: bool,
    staged: Option<UnitMatch>,
    paren_start: usize,
    diag: Option<Diag>,
}

impl<'a> UnitsParser<'a> {
    fn new(input: &'a str, depth: usize) -> Self {
        UnitsParser {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            depth,
            mode: Mode::Initial,
            func: Function::None,
            scale: 1.0,
            units: UnitsVector::ZERO,
            types: UnitsVector::ZERO,
            factor: 1.0,
            expon: 1.0,
            bracket: 0,
            paren: 0,
            operator: 0,
            leading: true,
            committed: false,
            staged: None,
            paren_start: 0,
            diag: None,
        }
    }

    fn run(mut self) -> Result<ParsedUnits> {
        if self.depth > MAX_RECURSION_DEPTH {
            return Err(Error::Internal(self.input.to_owned()));
        }
        while self.pos < self.bytes.len() {
            match self.mode {
                Mode::Initial => self.step_initial(),
                Mode::Paren => self.step_paren(),
                Mode::Prefix => self.step_prefix(),
                Mode::Units => self.step_units(),
                Mode::Expon => self.step_expon(),
                Mode::Flush => self.pos = self.bytes.len(),
            }
        }
        self.finish()
    }

    /// Fold the completed term into the accumulator.
    fn commit(&mut self) {
        self.scale *= self.factor.powf(self.expon);
        for i in 0..QUANTITY_COUNT {
            self.units.0[i] += self.expon * self.types.0[i];
        }
        self.types = UnitsVector::ZERO;
        self.factor = 1.0;
        self.expon = 1.0;
        self.committed = true;
    }

    /// Count a binary operator; a second one in a row flushes.
    fn binop(&mut self) {
        self.operator += 1;
        if self.operator > 1 {
            self.mode = Mode::Flush;
        }
    }

    fn step_initial(&mut self) {
        match self.bytes[self.pos] {
            b' ' | b'\t' => {
                self.pos += 1;
                return;
            }
            b'[' => {
                if !self.leading {
                    self.diag = Some(Diag::Symbol);
                    self.mode = Mode::Flush;
                } else if self.bracket == 0 {
                    self.bracket = 1;
                } else {
                    // Second opening bracket: discard the rest, the
                    // imbalance is diagnosed at end of input.
                    self.mode = Mode::Flush;
                }
                self.pos += 1;
                return;
            }
            _ => {}
        }

        let rest = &self.input[self.pos..];

        if let Some(tail) = rest.strip_prefix("10") {
            self.leading = false;
            self.pos += 2;
            if tail.as_bytes().first().is_some_and(|b| b.is_ascii_digit()) {
                self.diag = Some(Diag::Multiplier);
                self.mode = Mode::Flush;
            } else {
                self.factor = 10.0;
                self.mode = Mode::Expon;
            }
            return;
        }

        for (pattern, func) in [
            ("log(", Function::Log),
            ("ln(", Function::Ln),
            ("exp(", Function::Exp),
        ] {
            if rest.starts_with(pattern) {
                self.func = func;
                self.leading = false;
                self.pos += pattern.len() - 1; // the parenthesis is left for PAREN
                self.mode = Mode::Paren;
                return;
            }
        }
        if rest.starts_with("sqrt(") {
            self.expon *= 0.5;
            self.leading = false;
            self.pos += 4;
            self.mode = Mode::Paren;
            return;
        }

        match self.bytes[self.pos] {
            b'(' => {
                self.leading = false;
                self.mode = Mode::Paren;
            }
            b'*' | b'.' => {
                self.leading = false;
                self.pos += 1;
                if self.committed {
                    self.binop();
                } else {
                    self.diag = Some(Diag::Dangling);
                    self.mode = Mode::Flush;
                }
            }
            b'1' if self.leading && rest.starts_with("1/") => {
                self.leading = false;
                self.pos += 2;
                self.expon = -self.expon;
                self.binop();
            }
            b'/' => {
                self.leading = false;
                self.pos += 1;
                self.expon = -self.expon;
                self.binop();
            }
            b']' => {
                self.leading = false;
                self.pos += 1;
                self.bracket = 1 - self.bracket;
                self.mode = Mode::Flush;
            }
            _ => match tables::match_unit(rest) {
                Some(unit) => {
                    self.leading = false;
                    self.operator = 0;
                    self.mode = if unit.prefix.is_some() { Mode::Prefix } else { Mode::Units };
                    self.staged = Some(unit);
                }
                None => {
                    self.pos += 1;
                    self.diag = Some(Diag::Symbol);
                    self.mode = Mode::Flush;
                }
            },
        }
    }

    fn step_paren(&mut self) {
        match self.bytes[self.pos] {
            b'(' => {
                if self.paren == 0 {
                    self.paren_start = self.pos + 1;
                }
                self.paren += 1;
                self.pos += 1;
            }
            b')' => {
                self.paren -= 1;
                self.pos += 1;
                if self.paren == 0 {
                    let input = self.input;
                    self.recurse(&input[self.paren_start..self.pos - 1]);
                }
            }
            _ => self.pos += 1,
        }
    }

    /// Parse a captured sub-expression with fresh state and fold its
    /// result in as a single term.
    fn recurse(&mut self, inner: &str) {
        match UnitsParser::new(inner, self.depth + 1).run() {
            Ok(sub) => {
                if sub.func != Function::None {
                    self.diag = Some(Diag::Function);
                    self.mode = Mode::Flush;
                    return;
                }
                self.factor *= sub.scale;
                for i in 0..QUANTITY_COUNT {
                    self.types.0[i] += sub.units.0[i];
                }
                self.operator = 0;
                self.mode = Mode::Expon;
            }
            Err(err) => {
                self.diag = Some(Diag::of(&err));
                self.mode = Mode::Flush;
            }
        }
    }

    fn step_prefix(&mut self) {
        let Some(prefix) = self.staged.as_ref().and_then(|unit| unit.prefix) else {
            self.diag = Some(Diag::Internal);
            self.mode = Mode::Flush;
            return;
        };
        self.factor *= prefix.multiplier;
        self.pos += prefix.symbol.len();
        self.mode = Mode::Units;
    }

    fn step_units(&mut self) {
        let Some(unit) = self.staged.take() else {
            self.diag = Some(Diag::Internal);
            self.mode = Mode::Flush;
            return;
        };
        self.factor *= unit.atom.factor;
        for i in 0..QUANTITY_COUNT {
            self.types.0[i] += unit.atom.delta.0[i];
        }
        self.pos += unit.atom.name.len();
        self.mode = Mode::Expon;
    }

    fn step_expon(&mut self) {
        if let Some((value, len)) = self.scan_exponent() {
            self.expon *= value;
            self.pos += len;
            self.commit();
            self.operator = 0;
            self.mode = Mode::Initial;
            return;
        }
        if let Some(len) = self.scan_marker() {
            self.pos += len;
            self.binop();
            return;
        }

        match self.bytes[self.pos] {
            b' ' | b'\t' => {
                // Implicit multiplication.
                self.pos += 1;
                self.commit();
                self.mode = Mode::Initial;
            }
            b'(' => {
                // A new sub-expression; leave the parenthesis in place.
                self.commit();
                self.mode = Mode::Initial;
            }
            b'*' | b'.' => {
                self.pos += 1;
                self.commit();
                self.mode = Mode::Initial;
                self.binop();
            }
            b'/' => {
                self.pos += 1;
                self.commit();
                self.expon = -1.0;
                self.mode = Mode::Initial;
                self.binop();
            }
            b']' => {
                self.pos += 1;
                self.commit();
                self.bracket = 1 - self.bracket;
                self.mode = Mode::Flush;
            }
            _ => {
                self.pos += 1;
                self.diag = Some(Diag::Exponent);
                self.mode = Mode::Flush;
            }
        }
    }

    /// Exponentiation marker without a following number.
    fn scan_marker(&self) -> Option<usize> {
        let bytes = self.bytes;
        let mut i = self.pos;
        while is_ws_at(bytes, i) {
            i += 1;
        }
        if bytes[i..].starts_with(b"**") {
            Some(i + 2 - self.pos)
        } else if bytes.get(i) == Some(&b'^') {
            Some(i + 1 - self.pos)
        } else {
            None
        }
    }

    /// Numeric exponent: a bare integer, or a parenthesised integer,
    /// rational, or floating-point value, optionally preceded by an
    /// exponentiation marker. Returns the value and the bytes consumed.
    fn scan_exponent(&self) -> Option<(f64, usize)> {
        let bytes = self.bytes;
        let mut i = self.pos;
        while is_ws_at(bytes, i) {
            i += 1;
        }
        if bytes[i..].starts_with(b"**") {
            i += 2;
        } else if bytes.get(i) == Some(&b'^') {
            i += 1;
        }
        while is_ws_at(bytes, i) {
            i += 1;
        }

        if let Some((value, end)) = scan_int(bytes, i) {
            return Some((value, end - self.pos));
        }
        if bytes.get(i) != Some(&b'(') {
            return None;
        }

        let mut k = i + 1;
        while is_ws_at(bytes, k) {
            k += 1;
        }
        let num_start = k;
        if matches!(bytes.get(k).copied(), Some(b'+' | b'-')) {
            k += 1;
        }
        let first_digit = k;
        while matches!(bytes.get(k).copied(), Some(b'0'..=b'9')) {
            k += 1;
        }
        if k == first_digit {
            return None;
        }

        let value = match bytes.get(k).copied() {
            Some(b'.') => {
                k += 1;
                while matches!(bytes.get(k).copied(), Some(b'0'..=b'9')) {
                    k += 1;
                }
                parse_slice::<f64>(bytes, num_start, k)?
            }
            Some(b'/') => {
                if bytes[first_digit] == b'0' {
                    return None;
                }
                let numerator = parse_slice::<i64>(bytes, num_start, k)? as f64;
                k += 1;
                let den_start = k;
                if !matches!(bytes.get(k).copied(), Some(b'1'..=b'9')) {
                    return None;
                }
                k += 1;
                while matches!(bytes.get(k).copied(), Some(b'0'..=b'9')) {
                    k += 1;
                }
                let denominator = parse_slice::<i64>(bytes, den_start, k)? as f64;
                numerator / denominator
            }
            _ => {
                if bytes[first_digit] == b'0' {
                    return None;
                }
                parse_slice::<i64>(bytes, num_start, k)? as f64
            }
        };

        while is_ws_at(bytes, k) {
            k += 1;
        }
        if bytes.get(k) != Some(&b')') {
            return None;
        }
        Some((value, k + 1 - self.pos))
    }

    fn finish(mut self) -> Result<ParsedUnits> {
        if self.mode == Mode::Expon {
            self.commit();
        }

        let diag = if self.bracket != 0 {
            Some(Diag::Bracket)
        } else if self.paren != 0 {
            Some(Diag::Paren)
        } else if self.operator == 1 {
            Some(Diag::Dangling)
        } else if self.operator > 1 {
            Some(Diag::Consecutive)
        } else {
            self.diag
        };

        match diag {
            Some(diag) => Err(diag.error(self.input)),
            None => Ok(ParsedUnits {
                func: self.func,
                scale: self.scale,
                units: self.units,
            }),
        }
    }
}

fn is_ws_at(bytes: &[u8], i: usize) -> bool {
    matches!(bytes.get(i).copied(), Some(b' ' | b'\t'))
}

/// `[+-]?[1-9][0-9]*` at `i`; returns the value and the end index.
fn scan_int(bytes: &[u8], mut i: usize) -> Option<(f64, usize)> {
    let start = i;
    if matches!(bytes.get(i).copied(), Some(b'+' | b'-')) {
        i += 1;
    }
    if !matches!(bytes.get(i).copied(), Some(b'1'..=b'9')) {
        return None;
    }
    i += 1;
    while matches!(bytes.get(i).copied(), Some(b'0'..=b'9')) {
        i += 1;
    }
    parse_slice::<i64>(bytes, start, i).map(|value| (value as f64, i))
}

fn parse_slice<T: std::str::FromStr>(bytes: &[u8], start: usize, end: usize) -> Option<T> {
    std::str::from_utf8(&bytes[start..end]).ok()?.parse().ok()
}
