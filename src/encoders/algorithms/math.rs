use super::errors::{CodecError, DecodeError};
use super::symbols::{DigitReader, classify};
use crate::core::charset::Charset;
use crate::core::config::{DEFAULT_BUFFER_SIZE, DecodePolicy};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use std::io::{self, Read, Write};

/// Whole-input radix conversion, base58 style.
///
/// The input is read as one big-endian number and written in base
/// `charset.len()`. Each leading zero byte becomes one leading zero symbol,
/// so leading zeros survive the round trip. Output length depends on the
/// whole input, which therefore has to be buffered.
#[derive(Debug, Clone)]
pub struct StaticCoding {
    charset: Charset,
    policy: DecodePolicy,
}

impl StaticCoding {
    pub fn new(charset: Charset, policy: DecodePolicy) -> Self {
        StaticCoding { charset, policy }
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    pub fn encode(&self, data: &[u8]) -> String {
        let leading_zeros = data.iter().take_while(|&&b| b == 0).count();
        let zero = self.charset.zero();
        if leading_zeros == data.len() {
            return std::iter::repeat_n(zero, data.len()).collect();
        }

        let symbols = self.charset.symbols();
        let base = BigUint::from(self.charset.len());
        let mut num = BigUint::from_bytes_be(&data[leading_zeros..]);

        let estimate = ((data.len() - leading_zeros) as f64 * 8.0
            / (self.charset.len() as f64).log2())
        .ceil() as usize;
        let mut digits = Vec::with_capacity(estimate + leading_zeros);

        while !num.is_zero() {
            let (quotient, remainder) = num.div_rem(&base);
            digits.push(symbols[remainder.to_usize().unwrap_or_default()]);
            num = quotient;
        }
        digits.extend(std::iter::repeat_n(zero, leading_zeros));

        digits.iter().rev().collect()
    }

    pub fn decode(&self, encoded: &str) -> Result<Vec<u8>, DecodeError> {
        let mut acc = Accumulator::new(self.charset.len());
        for (position, c) in encoded.chars().enumerate() {
            if let Some(digit) = classify(&self.charset, self.policy, c, position)? {
                acc.push(digit);
            }
        }
        Ok(acc.finish())
    }

    /// Reads all of `src` and writes its encoding to `dst`.
    pub fn encode_stream<W: Write, R: Read>(&self, mut dst: W, mut src: R) -> io::Result<()> {
        let mut data = Vec::new();
        src.read_to_end(&mut data)?;
        let encoded = self.encode(&data);
        tracing::debug!(bytes = data.len(), symbols = encoded.chars().count(), "static encode finished");

        dst.write_all(encoded.as_bytes())?;
        dst.flush()
    }

    /// Reads all of `src` and writes the decoded bytes to `dst`.
    pub fn decode_stream<W: Write, R: Read>(&self, mut dst: W, src: R) -> Result<(), CodecError> {
        let mut digits = DigitReader::new(&self.charset, self.policy, DEFAULT_BUFFER_SIZE, src);
        let mut acc = Accumulator::new(self.charset.len());
        while let Some(digit) = digits.next_digit()? {
            acc.push(digit);
        }
        let decoded = acc.finish();
        tracing::debug!(bytes = decoded.len(), skipped = digits.skipped(), "static decode finished");

        dst.write_all(&decoded)?;
        dst.flush()?;
        Ok(())
    }
}

/// Folds digits into a number, counting leading zero digits apart.
struct Accumulator {
    base: BigUint,
    num: BigUint,
    leading_zeros: usize,
}

impl Accumulator {
    fn new(base: usize) -> Self {
        Accumulator {
            base: BigUint::from(base),
            num: BigUint::zero(),
            leading_zeros: 0,
        }
    }

    fn push(&mut self, digit: u8) {
        if self.num.is_zero() && digit == 0 {
            self.leading_zeros += 1;
        } else {
            self.num *= &self.base;
            self.num += u32::from(digit);
        }
    }

    fn finish(self) -> Vec<u8> {
        let mut result = vec![0u8; self.leading_zeros];
        if !self.num.is_zero() {
            result.extend_from_slice(&self.num.to_bytes_be());
        }
        result
    }
}
