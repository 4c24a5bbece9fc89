use super::bits::{BitReader, BitWriter};
use super::errors::{CharsetError, CodecError};
use super::symbols::DigitReader;
use crate::core::charset::Charset;
use crate::core::config::{CodingConfig, DecodePolicy};
use std::io::{self, Read, Write};

/// Power of two closest to `len` on a log scale.
fn nearest_power_of_two(len: usize) -> usize {
    if len <= 1 {
        return 1;
    }
    let lower = 1usize << (usize::BITS - 1 - len.leading_zeros());
    // log2(len) >= log2(lower) + 0.5  <=>  len^2 >= 2 * lower^2
    if len * len >= 2 * lower * lower {
        lower * 2
    } else {
        lower
    }
}

/// Bit-packing coder for power-of-two charsets.
///
/// Every `log2(len)` bits of input become one symbol. The output carries no
/// padding: a final group shorter than a symbol is filled with zero bits, and
/// the decoder drops bits that do not complete a byte.
#[derive(Debug, Clone)]
pub struct PackedCoding {
    charset: Charset,
    bits: u32,
    buffer_size: usize,
    policy: DecodePolicy,
}

impl PackedCoding {
    pub fn new(charset: Charset, config: &CodingConfig) -> Result<Self, CharsetError> {
        let bits = charset.bits_per_symbol().ok_or(CharsetError::NotPowerOfTwo {
            len: charset.len(),
            nearest: nearest_power_of_two(charset.len()),
        })?;

        Ok(PackedCoding {
            charset,
            bits,
            buffer_size: config.buffer_size,
            policy: config.policy,
        })
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    /// Bits carried by each symbol.
    pub fn bits_per_symbol(&self) -> u32 {
        self.bits
    }

    /// Encodes all of `src` into `dst`.
    pub fn encode<W: Write, R: Read>(&self, mut dst: W, src: R) -> io::Result<()> {
        let symbols = self.charset.symbols();
        let mut reader = BitReader::new(self.bits, self.buffer_size, src);
        let mut out = String::with_capacity(self.buffer_size + 4);
        let mut count = 0u64;

        while let Some(value) = reader.read()? {
            out.push(symbols[value as usize]);
            count += 1;
            if out.len() >= self.buffer_size {
                dst.write_all(out.as_bytes())?;
                out.clear();
            }
        }

        dst.write_all(out.as_bytes())?;
        dst.flush()?;
        tracing::debug!(symbols = count, "packed encode finished");
        Ok(())
    }

    /// Decodes all of `src` into `dst`.
    pub fn decode<W: Write, R: Read>(&self, dst: W, src: R) -> Result<(), CodecError> {
        let mut digits = DigitReader::new(&self.charset, self.policy, self.buffer_size, src);
        let mut writer = BitWriter::new(self.bits, self.buffer_size, dst);

        while let Some(digit) = digits.next_digit()? {
            writer.write(digit)?;
        }

        writer.finish()?;
        tracing::debug!(
            chars = digits.position(),
            skipped = digits.skipped(),
            "packed decode finished"
        );
        Ok(())
    }
}
