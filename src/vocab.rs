//! Vocabulary: the fixed symbol ↔ code mapping.
//!
//! The alphabet is the 26 lowercase letters followed by the boundary symbol
//! `$`, which both marks the start of a sequence and pads batches:
//!
//! ```text
//! a b c ... z $
//! 0 1 2 ... 25 26
//! ```
//!
//! The table is a `const`. There is no way to change it at runtime; every
//! accessor here is a pure function.

use crate::error::{RaspError, Result};
use crate::sequence::{Element, Sequence, Tokens};
use serde::{Deserialize, Serialize};

/// The boundary / padding symbol.
pub const BOUNDARY: char = '$';

/// Code of [`BOUNDARY`].
pub const BOUNDARY_CODE: u32 = 26;

/// Number of symbols in the vocabulary.
pub const VOCAB_SIZE: usize = 27;

const SYMBOLS: [char; VOCAB_SIZE] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', BOUNDARY,
];

/// Code for a symbol. Uppercase ASCII letters map to their lowercase code.
pub fn code_of(symbol: char) -> Option<u32> {
    match symbol.to_ascii_lowercase() {
        c @ 'a'..='z' => Some(c as u32 - 'a' as u32),
        BOUNDARY => Some(BOUNDARY_CODE),
        _ => None,
    }
}

/// Symbol for a code.
pub fn symbol_of(code: u32) -> Option<char> {
    SYMBOLS.get(code as usize).copied()
}

/// A rectangular batch of encoded rows sharing one column count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenBatch")]
pub struct TokenBatch {
    rows: Vec<Tokens>,
    width: usize,
}

/// Unchecked wire form of [`TokenBatch`].
#[derive(Deserialize)]
struct RawTokenBatch {
    rows: Vec<Tokens>,
    width: usize,
}

impl TryFrom<RawTokenBatch> for TokenBatch {
    type Error = RaspError;

    fn try_from(raw: RawTokenBatch) -> Result<Self> {
        if let Some(row) = raw.rows.iter().find(|row| row.len() != raw.width) {
            return Err(RaspError::shape(raw.width, row.len()));
        }
        Ok(TokenBatch {
            rows: raw.rows,
            width: raw.width,
        })
    }
}

impl TokenBatch {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column count shared by every row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Tokens] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Tokens> {
        self.rows.get(index)
    }
}

/// Encode a string into vocabulary codes.
///
/// With `with_boundary`, the boundary code is prepended.
///
/// # Example
/// ```rust
/// use rasp::vocab;
///
/// assert_eq!(vocab::encode("hi", false)?.data(), &[7, 8]);
/// assert_eq!(vocab::encode("hi", true)?.data(), &[26, 7, 8]);
/// # Ok::<(), rasp::RaspError>(())
/// ```
pub fn encode(symbols: &str, with_boundary: bool) -> Result<Tokens> {
    let mut codes = Vec::with_capacity(symbols.len() + usize::from(with_boundary));
    if with_boundary {
        codes.push(BOUNDARY_CODE);
    }

    for (position, symbol) in symbols.chars().enumerate() {
        let code = code_of(symbol).ok_or(RaspError::InvalidSymbol { symbol, position })?;
        codes.push(code);
    }

    Ok(Sequence::from_data(codes))
}

/// Encode several strings into a rectangular batch.
///
/// Shorter strings are right-padded with [`BOUNDARY`] to the longest length
/// before encoding, so every row has the same width.
pub fn encode_batch<S: AsRef<str>>(batch: &[S], with_boundary: bool) -> Result<TokenBatch> {
    let longest = batch
        .iter()
        .map(|s| s.as_ref().chars().count())
        .max()
        .unwrap_or(0);

    let rows = batch
        .iter()
        .map(|s| {
            let s = s.as_ref();
            let pad = longest - s.chars().count();
            let mut padded = String::with_capacity(s.len() + pad);
            padded.push_str(s);
            padded.extend(std::iter::repeat(BOUNDARY).take(pad));
            encode(&padded, with_boundary)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TokenBatch {
        rows,
        width: longest + usize::from(with_boundary),
    })
}

/// Decode codes back into a string.
///
/// Everything from the first boundary symbol after position 0 onward is
/// padding and is cut off. A boundary symbol at position 0 is dropped: with
/// `with_boundary` it is the expected start marker, without it it is
/// leading padding. Either way `decode(encode(s, b), b) == s`.
///
/// Any element kind is accepted as long as every value is an integral code.
pub fn decode<T: Element>(seq: &Sequence<T>, with_boundary: bool) -> Result<String> {
    let mut out = String::with_capacity(seq.len());

    for (position, &value) in seq.iter().enumerate() {
        let value = value.to_f64();
        let symbol = to_code(value)
            .and_then(symbol_of)
            .ok_or(RaspError::InvalidCode { value, position })?;

        if symbol == BOUNDARY {
            if position == 0 {
                continue;
            }
            break;
        }
        out.push(symbol);
    }

    Ok(out)
}

/// Decode every row of a batch.
pub fn decode_batch(batch: &TokenBatch, with_boundary: bool) -> Result<Vec<String>> {
    batch
        .rows
        .iter()
        .map(|row| decode(row, with_boundary))
        .collect()
}

fn to_code(value: f64) -> Option<u32> {
    if value.fract() == 0.0 && (0.0..VOCAB_SIZE as f64).contains(&value) {
        Some(value as u32)
    } else {
        None
    }
}

/// Decoding for both single sequences and batches.
///
/// ```rust
/// use rasp::vocab::{self, Decode};
///
/// let one = vocab::encode("abc", false)?;
/// let many = vocab::encode_batch(&["ab", "abc"], false)?;
/// assert_eq!(one.decode(false)?, "abc");
/// assert_eq!(many.decode(false)?, vec!["ab", "abc"]);
/// # Ok::<(), rasp::RaspError>(())
/// ```
pub trait Decode {
    type Output;

    fn decode(&self, with_boundary: bool) -> Result<Self::Output>;
}

impl<T: Element> Decode for Sequence<T> {
    type Output = String;

    fn decode(&self, with_boundary: bool) -> Result<String> {
        decode(self, with_boundary)
    }
}

impl Decode for TokenBatch {
    type Output = Vec<String>;

    fn decode(&self, with_boundary: bool) -> Result<Vec<String>> {
        decode_batch(self, with_boundary)
    }
}
