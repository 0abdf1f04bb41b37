#![forbid(unsafe_code)]

//! Parser for FITS-style units specifications.
//!
//! Turns a units string such as `10**-12 erg/(cm**2 s Angstrom)`,
//! `log(Hz)`, or `[Jy/beam]` into an enclosing function tag, a scale
//! factor relating the input to coherent base units, and an exponent
//! vector over a fixed set of base quantities. Parsing is a synchronous
//! pure function; the static unit tables are immutable and shared.

mod error;
mod parser;
mod tables;
mod vector;

pub use error::{Error, Result};
pub use parser::{parse, validate, Function, ParsedUnits};
pub use vector::{BaseQuantity, UnitsVector, QUANTITY_COUNT};
