use crate::encoders::algorithms::errors::CharsetError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Largest supported charset.
pub const MAX_SYMBOLS: usize = 256;

/// Symbols that are always skipped while decoding, so they can never be digits.
pub(crate) const LINE_BREAKS: [char; 2] = ['\n', '\r'];

/// An ordered set of unique symbols used as the output alphabet.
///
/// A symbol's position is its digit value. Symbols are Unicode scalar values,
/// so multi-byte characters such as emoji are handled as single digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    symbols: Vec<char>,
    index: HashMap<char, u8>,
}

impl Charset {
    /// Creates a charset from a list of symbols.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - there are fewer than 2 or more than 256 symbols
    /// - a symbol appears more than once
    /// - a line break is used as a symbol
    pub fn new(symbols: Vec<char>) -> Result<Self, CharsetError> {
        let len = symbols.len();
        if len < 2 {
            return Err(CharsetError::TooFewSymbols { len });
        }
        if len > MAX_SYMBOLS {
            return Err(CharsetError::TooManySymbols { len });
        }

        let mut index = HashMap::with_capacity(len);
        for (i, &c) in symbols.iter().enumerate() {
            if LINE_BREAKS.contains(&c) {
                return Err(CharsetError::ReservedSymbol {
                    symbol: c,
                    position: i,
                });
            }
            // len <= 256, so every index fits in a u8
            if let Some(first) = index.insert(c, i as u8) {
                return Err(CharsetError::DuplicateSymbol {
                    symbol: c,
                    first: first as usize,
                    second: i,
                });
            }
        }

        Ok(Charset { symbols, index })
    }

    /// Returns the number of symbols, i.e. the numeric base.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false: a valid charset has at least two symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns true when the length is a power of two, which selects the
    /// bit-packing path.
    pub fn is_power_of_two(&self) -> bool {
        self.symbols.len().is_power_of_two()
    }

    /// Bits per symbol for power-of-two charsets.
    pub fn bits_per_symbol(&self) -> Option<u32> {
        self.is_power_of_two()
            .then(|| self.symbols.len().trailing_zeros())
    }

    /// Returns the symbol for a digit.
    pub fn encode_digit(&self, digit: usize) -> Option<char> {
        self.symbols.get(digit).copied()
    }

    /// Returns the digit value of a symbol, or `None` if it is not in the charset.
    pub fn decode_char(&self, c: char) -> Option<u8> {
        self.index.get(&c).copied()
    }

    /// The zero digit, used for left padding.
    pub fn zero(&self) -> char {
        self.symbols[0]
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl FromStr for Charset {
    type Err = CharsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Charset::new(s.chars().collect())
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| write!(f, "{}", c))
    }
}
