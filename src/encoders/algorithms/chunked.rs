use super::bits::read_full;
use super::errors::{CharsetError, CodecError, DecodeError};
use super::symbols::DigitReader;
use crate::core::charset::Charset;
use crate::core::config::{CodingConfig, DecodePolicy, MAX_CHUNK_SIZE};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use std::io::{self, Read, Write};

/// Number of base-`base` digits needed for any `chunk_size`-byte value: the
/// smallest `n` with `base^n >= 256^chunk_size`.
///
/// The float estimate `ceil(8 * chunk_size / log2(base))` is corrected with
/// exact integer powers, since rounding can be off by one near powers of two.
pub fn digits_per_chunk(base: usize, chunk_size: usize) -> usize {
    assert!(base >= 2, "base must be at least 2");

    let estimate = ((8 * chunk_size) as f64 / (base as f64).log2()).ceil() as usize;
    let limit = BigUint::one() << (8 * chunk_size);
    let base = BigUint::from(base);
    let covers = |n: usize| base.pow(n as u32) >= limit;

    let mut n = estimate.max(1);
    while !covers(n) {
        n += 1;
    }
    while n > 1 && covers(n - 1) {
        n -= 1;
    }
    n
}

/// Base-conversion coder for charsets of any length.
///
/// Input is cut into `chunk_size`-byte chunks; each chunk is read as a
/// big-endian number and written as exactly `digits_per_chunk` symbols. The
/// last chunk is zero-filled on the right and followed by one more run of
/// `digits_per_chunk` symbols holding its real length. Empty input encodes to
/// nothing.
#[derive(Debug, Clone)]
pub struct ChunkedCoding {
    charset: Charset,
    chunk_size: usize,
    digits_per_chunk: usize,
    buffer_size: usize,
    policy: DecodePolicy,
}

impl ChunkedCoding {
    pub fn new(charset: Charset, config: &CodingConfig) -> Result<Self, CharsetError> {
        let chunk_size = config.chunk_size;
        if !(1..=MAX_CHUNK_SIZE).contains(&chunk_size) {
            return Err(CharsetError::InvalidChunkSize { size: chunk_size });
        }

        Ok(ChunkedCoding {
            digits_per_chunk: digits_per_chunk(charset.len(), chunk_size),
            charset,
            chunk_size,
            buffer_size: config.buffer_size,
            policy: config.policy,
        })
    }

    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn digits_per_chunk(&self) -> usize {
        self.digits_per_chunk
    }

    /// Appends `num` as a zero-padded run of `digits_per_chunk` symbols.
    fn push_run(&self, mut num: BigUint, base: &BigUint, digits: &mut [u8], out: &mut String) {
        digits.fill(0);
        for slot in digits.iter_mut().rev() {
            if num.is_zero() {
                break;
            }
            let (quotient, remainder) = num.div_rem(base);
            *slot = remainder.to_u8().unwrap_or_default();
            num = quotient;
        }
        debug_assert!(num.is_zero(), "value does not fit in one run");

        let symbols = self.charset.symbols();
        out.extend(digits.iter().map(|&d| symbols[d as usize]));
    }

    /// Encodes all of `src` into `dst`.
    pub fn encode<W: Write, R: Read>(&self, mut dst: W, mut src: R) -> io::Result<()> {
        let base = BigUint::from(self.charset.len());
        let mut chunk = vec![0u8; self.chunk_size];
        let mut digits = vec![0u8; self.digits_per_chunk];
        let mut out = String::with_capacity(self.buffer_size + self.digits_per_chunk * 4);
        let mut last_len = None;
        let mut chunks = 0u64;

        loop {
            let n = read_full(&mut src, &mut chunk)?;
            if n == 0 {
                break;
            }
            chunk[n..].fill(0);
            self.push_run(BigUint::from_bytes_be(&chunk), &base, &mut digits, &mut out);
            chunks += 1;
            last_len = Some(n);

            if out.len() >= self.buffer_size {
                dst.write_all(out.as_bytes())?;
                out.clear();
            }
            if n < self.chunk_size {
                break;
            }
        }

        if let Some(len) = last_len {
            self.push_run(BigUint::from(len), &base, &mut digits, &mut out);
        }

        dst.write_all(out.as_bytes())?;
        dst.flush()?;
        tracing::debug!(chunks, trailer = ?last_len, "chunked encode finished");
        Ok(())
    }

    /// Renders a data run as a `chunk_size`-byte big-endian block. `position`
    /// is the symbol index where the run starts.
    fn block(&self, num: &BigUint, position: usize) -> Result<Vec<u8>, DecodeError> {
        if num.bits() > (8 * self.chunk_size) as u64 {
            return Err(DecodeError::ChunkOverflow { position });
        }
        let bytes = num.to_bytes_be();
        let mut block = vec![0u8; self.chunk_size];
        // zero renders as [0]
        if !num.is_zero() {
            block[self.chunk_size - bytes.len()..].copy_from_slice(&bytes);
        }
        Ok(block)
    }

    /// Decodes all of `src` into `dst`.
    ///
    /// Each completed run is held back until the next one arrives, because
    /// only the final run (the trailer) says how much of the run before it
    /// is real data.
    pub fn decode<W: Write, R: Read>(&self, mut dst: W, src: R) -> Result<(), CodecError> {
        let base = BigUint::from(self.charset.len());
        let mut digits = DigitReader::new(&self.charset, self.policy, self.buffer_size, src);
        let mut out = Vec::with_capacity(self.buffer_size + self.chunk_size);

        let mut num = BigUint::zero();
        let mut run_len = 0;
        let mut runs = 0usize;
        let mut held: Option<Vec<u8>> = None;
        let mut pending: Option<BigUint> = None;

        while let Some(digit) = digits.next_digit()? {
            num *= &base;
            num += u32::from(digit);
            run_len += 1;
            if run_len < self.digits_per_chunk {
                continue;
            }

            runs += 1;
            if let Some(block) = held.take() {
                out.extend_from_slice(&block);
                if out.len() >= self.buffer_size {
                    dst.write_all(&out)?;
                    out.clear();
                }
            }
            if let Some(previous) = pending.take() {
                held = Some(self.block(&previous, (runs - 2) * self.digits_per_chunk)?);
            }
            pending = Some(std::mem::take(&mut num));
            run_len = 0;
        }

        if run_len > 0 {
            return Err(DecodeError::TruncatedChunk {
                symbols: run_len,
                expected: self.digits_per_chunk,
            }
            .into());
        }

        match (held, pending) {
            (None, None) => {}
            // a lone zero trailer stands for empty input
            (None, Some(trailer)) if trailer.is_zero() => {}
            (None, Some(_)) => return Err(DecodeError::MissingTrailer.into()),
            (Some(block), Some(trailer)) => {
                let len = trailer
                    .to_usize()
                    .filter(|&len| len <= self.chunk_size)
                    .ok_or_else(|| DecodeError::InvalidTrailer {
                        value: trailer.to_u64().unwrap_or(u64::MAX),
                        chunk_size: self.chunk_size,
                    })?;
                out.extend_from_slice(&block[..len]);
            }
            (Some(_), None) => unreachable!("a held block always has a pending run after it"),
        }

        dst.write_all(&out)?;
        dst.flush()?;
        tracing::debug!(runs, skipped = digits.skipped(), "chunked decode finished");
        Ok(())
    }
}
