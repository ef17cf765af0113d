// Author: Lukas Bower
// Purpose: Define the external term data model, wire constants, and error taxonomy.

//! Term data model definitions shared across codec entry points.

use core::fmt;

use alloc::string::String;
use alloc::vec::Vec;

/// Version marker byte leading every complete encoded stream.
pub const VERSION_MAGIC: u8 = 131;

/// Maximum atom text length in bytes, the capacity of the wire's one-byte
/// length field.
pub const MAX_ATOM_LEN: usize = 255;

/// Largest integer value the one-byte small-integer form can carry.
pub const SMALL_INTEGER_MAX: i32 = 255;

/// Largest tuple arity the one-byte small-tuple form can carry.
pub const SMALL_TUPLE_MAX_ARITY: usize = 255;

/// A structured value understood by the codec.
///
/// The variant set is closed: both codec directions match on it exhaustively,
/// so an unsupported shape is unrepresentable rather than a runtime error.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Symbolic constant, carried on the wire as length-prefixed UTF-8.
    Atom(String),
    /// Signed integer. The wire's non-small form carries 32 bits, so the
    /// in-memory type is `i32` and every wire value decodes losslessly.
    Integer(i32),
    /// 64-bit IEEE-754 double, carried as its raw big-endian bit pattern.
    Float(f64),
    /// Fixed-arity ordered sequence of child terms.
    Tuple(Vec<Term>),
    /// Ordered sequence of child terms. Always proper; the modeled format
    /// writes no tail term after the elements.
    List(Vec<Term>),
    /// Raw byte payload.
    Binary(Vec<u8>),
    /// Ordered key/value pairs. Construction order is preserved and duplicate
    /// keys are kept; a Nil key is rejected by both codec directions.
    Map(Vec<(Term, Term)>),
    /// The empty-list sentinel.
    Nil,
}

impl Term {
    /// Check whether this term is the Nil sentinel.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Term::Nil)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => f.write_str(name),
            Term::Integer(value) => write!(f, "{value}"),
            Term::Float(value) => write!(f, "{value}"),
            Term::Tuple(elements) => write_seq(f, "{", elements, "}"),
            Term::List(elements) => write_seq(f, "[", elements, "]"),
            Term::Binary(bytes) => {
                f.write_str("<<")?;
                for (index, byte) in bytes.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{byte}")?;
                }
                f.write_str(">>")
            }
            Term::Map(pairs) => {
                f.write_str("#{")?;
                for (index, (key, value)) in pairs.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{key} => {value}")?;
                }
                f.write_str("}")
            }
            Term::Nil => f.write_str("[]"),
        }
    }
}

fn write_seq(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    elements: &[Term],
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (index, element) in elements.iter().enumerate() {
        if index > 0 {
            f.write_str(",")?;
        }
        write!(f, "{element}")?;
    }
    f.write_str(close)
}

/// Possible errors produced while encoding or decoding terms.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    /// Zero-length buffer passed to decode.
    #[error("empty input")]
    EmptyInput,
    /// Leading byte was not the version marker.
    #[error("invalid version byte {0}")]
    InvalidVersion(u8),
    /// Fewer bytes remained than the named wire field requires.
    #[error("insufficient data for {field}")]
    InsufficientData {
        /// Wire field whose bytes ran out.
        field: &'static str,
    },
    /// Encountered a tag byte outside the recognized set.
    #[error("unsupported tag {0}")]
    UnsupportedTag(u8),
    /// Encountered a term variant outside the recognized set.
    ///
    /// Reserved: the closed [`Term`] enum makes this unreachable through
    /// [`Codec::encode`](crate::Codec::encode).
    #[error("unsupported term type")]
    UnsupportedTermType,
    /// Atom text exceeds the one-byte length field.
    #[error("atom length {len} exceeds 255")]
    AtomTooLong {
        /// Byte length of the offending atom text.
        len: usize,
    },
    /// A map pair used Nil as its key.
    #[error("map key cannot be nil")]
    NilMapKey,
    /// Atom payload was not valid UTF-8.
    #[error("invalid utf8 in atom text")]
    InvalidUtf8,
}
