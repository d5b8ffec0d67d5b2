//! Symbol alphabets and their binary encodings.
//!
//! An alphabet decides how a string decomposes into fixed-width symbols and
//! how wide each symbol's binary encoding is. The recurrent encoder consumes
//! one symbol bit-vector at a time, so the alphabet fixes the character side
//! of the network's input width.

use ndarray::Array1;

/// Decomposition of strings into fixed-width symbols.
///
/// `BIT_WIDTH` is the number of bits in one symbol's binary encoding;
/// [`symbols`](Alphabet::symbols) yields the symbol stream of a string in
/// left-to-right order.
pub trait Alphabet {
    /// Number of bits in one symbol's binary encoding.
    const BIT_WIDTH: usize;

    /// The symbol stream of `text`, left to right.
    fn symbols(text: &str) -> Vec<u32>;
}

/// UTF-8 bytes, 8 bits per symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteAlphabet;

impl Alphabet for ByteAlphabet {
    const BIT_WIDTH: usize = 8;

    fn symbols(text: &str) -> Vec<u32> {
        text.bytes().map(u32::from).collect()
    }
}

/// UTF-16 code units, 16 bits per symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf16Alphabet;

impl Alphabet for Utf16Alphabet {
    const BIT_WIDTH: usize = 16;

    fn symbols(text: &str) -> Vec<u32> {
        text.encode_utf16().map(u32::from).collect()
    }
}

/// Unicode scalar values, 32 bits per symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharAlphabet;

impl Alphabet for CharAlphabet {
    const BIT_WIDTH: usize = 32;

    fn symbols(text: &str) -> Vec<u32> {
        text.chars().map(u32::from).collect()
    }
}

/// Binary encoding of one symbol: component `i` is 1.0 when bit `i` of the
/// symbol is set, least-significant bit first.
pub fn bit_vector(symbol: u32, width: usize) -> Array1<f32> {
    Array1::from_shape_fn(width, |i| if symbol >> i & 1 == 1 { 1.0 } else { 0.0 })
}
