//! Fixed-width bit streams over buffered byte I/O.
//!
//! Values of `chunk_bits` bits (1 to 8) are read and written most significant
//! bit first. Both adapters size their buffer to a multiple of `chunk_bits`
//! bytes, so the buffer holds a whole number of values and a value never
//! spans a refill or flush boundary.

use std::io::{self, Read, Write};

/// Rounds `requested` down to a multiple of `chunk_bits` bytes, minimum one
/// group.
pub(crate) fn aligned_buffer_size(requested: usize, chunk_bits: u32) -> usize {
    let group = chunk_bits as usize;
    (requested / group).max(1) * group
}

/// Reads until `buf` is full or the reader is exhausted. Returns the number of
/// bytes read; fewer than `buf.len()` means end of input.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn check_width(chunk_bits: u32) {
    assert!(
        (1..=8).contains(&chunk_bits),
        "chunk width must be between 1 and 8 bits, got {}",
        chunk_bits
    );
}

/// Reads `chunk_bits`-wide values from a byte stream.
///
/// If the input length in bits is not a multiple of `chunk_bits`, the final
/// value is completed with zero bits. [`BitWriter::finish`] drops those bits
/// again, since they never make up a whole byte.
pub struct BitReader<R> {
    inner: R,
    chunk_bits: u32,
    buf: Vec<u8>,
    filled: usize,
    cursor: usize,
    eof: bool,
}

impl<R: Read> BitReader<R> {
    /// # Panics
    ///
    /// Panics if `chunk_bits` is not in `1..=8`.
    pub fn new(chunk_bits: u32, buffer_size: usize, inner: R) -> Self {
        check_width(chunk_bits);
        BitReader {
            inner,
            chunk_bits,
            buf: vec![0; aligned_buffer_size(buffer_size, chunk_bits)],
            filled: 0,
            cursor: 0,
            eof: false,
        }
    }

    pub fn chunk_bits(&self) -> u32 {
        self.chunk_bits
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn refill(&mut self) -> io::Result<()> {
        // A full buffer holds a whole number of values, so the cursor sits
        // exactly at the end of it.
        debug_assert_eq!(self.cursor, self.filled * 8);
        self.cursor -= self.filled * 8;

        self.filled = read_full(&mut self.inner, &mut self.buf)?;
        if self.filled < self.buf.len() {
            self.eof = true;
            self.buf[self.filled..].fill(0);
        }
        tracing::trace!(bytes = self.filled, eof = self.eof, "bit reader refill");
        Ok(())
    }

    /// Returns the next value, or `Ok(None)` once the input is exhausted.
    pub fn read(&mut self) -> io::Result<Option<u8>> {
        if self.cursor >= self.filled * 8 {
            if self.eof {
                return Ok(None);
            }
            self.refill()?;
            if self.cursor >= self.filled * 8 {
                return Ok(None);
            }
        }

        let width = self.chunk_bits;
        let byte = self.cursor / 8;
        let offset = (self.cursor % 8) as u32;

        let value = if offset + width <= 8 {
            (u16::from(self.buf[byte]) >> (8 - offset - width)) & ((1 << width) - 1)
        } else {
            // high bits from this byte, the rest from the next one
            let low_bits = offset + width - 8;
            let high = u16::from(self.buf[byte]) & (0xFF >> offset);
            (high << low_bits) | (u16::from(self.buf[byte + 1]) >> (8 - low_bits))
        };

        self.cursor += width as usize;
        Ok(Some(value as u8))
    }
}

/// Packs `chunk_bits`-wide values into a byte stream.
///
/// Full buffers are written out as they fill. [`finish`](Self::finish) must be
/// called once at the end to write the remaining whole bytes.
pub struct BitWriter<W: Write> {
    inner: W,
    chunk_bits: u32,
    buf: Vec<u8>,
    cursor: usize,
}

impl<W: Write> BitWriter<W> {
    /// # Panics
    ///
    /// Panics if `chunk_bits` is not in `1..=8`.
    pub fn new(chunk_bits: u32, buffer_size: usize, inner: W) -> Self {
        check_width(chunk_bits);
        BitWriter {
            inner,
            chunk_bits,
            buf: vec![0; aligned_buffer_size(buffer_size, chunk_bits)],
            cursor: 0,
        }
    }

    pub fn chunk_bits(&self) -> u32 {
        self.chunk_bits
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        self.inner.write_all(&self.buf[..self.cursor / 8])?;
        tracing::trace!(bytes = self.cursor / 8, "bit writer flush");
        self.buf.fill(0);
        self.cursor = 0;
        Ok(())
    }

    /// Appends one value. Bits above `chunk_bits` are ignored.
    pub fn write(&mut self, value: u8) -> io::Result<()> {
        let width = self.chunk_bits;
        debug_assert!(u16::from(value) < 1 << width, "value {} wider than {} bits", value, width);
        let value = u16::from(value) & ((1 << width) - 1);

        if self.cursor == self.buf.len() * 8 {
            self.flush_buffer()?;
        }

        let byte = self.cursor / 8;
        let offset = (self.cursor % 8) as u32;

        if offset + width <= 8 {
            self.buf[byte] |= (value << (8 - offset - width)) as u8;
        } else {
            let spill = offset + width - 8;
            self.buf[byte] |= (value >> spill) as u8;
            // the cast keeps only the low `spill` bits, now at the top of the byte
            self.buf[byte + 1] |= (value << (8 - spill)) as u8;
        }

        self.cursor += width as usize;
        Ok(())
    }

    /// Writes the remaining whole bytes and returns the sink. Bits that do not
    /// complete a byte are dropped.
    pub fn finish(mut self) -> io::Result<W> {
        self.flush_buffer()?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(chunk_bits: u32, buffer_size: usize, data: &[u8]) -> Vec<u8> {
        let mut reader = BitReader::new(chunk_bits, buffer_size, data);
        let mut values = Vec::new();
        while let Some(v) = reader.read().unwrap() {
            values.push(v);
        }
        values
    }

    fn write_all(chunk_bits: u32, buffer_size: usize, values: &[u8]) -> Vec<u8> {
        let mut writer = BitWriter::new(chunk_bits, buffer_size, Vec::new());
        for &v in values {
            writer.write(v).unwrap();
        }
        writer.finish().unwrap()
    }

    /// Delivers at most `step` bytes per read call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_read_single_bits() {
        assert_eq!(read_all(1, 16, &[0x41]), vec![0, 1, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_read_straddles_bytes() {
        // 101 100 110 101 010 1(00)
        assert_eq!(read_all(3, 64, &[0b1011_0011, 0b0101_0101]), vec![5, 4, 6, 5, 2, 4]);
    }

    #[test]
    fn test_read_full_bytes() {
        assert_eq!(read_all(8, 1, &[1, 2, 255]), vec![1, 2, 255]);
        assert_eq!(read_all(4, 4, &[0xAB, 0xCD]), vec![0xA, 0xB, 0xC, 0xD]);
    }

    #[test]
    fn test_read_empty_is_exhausted() {
        let mut reader = BitReader::new(5, 1024, &[][..]);
        assert_eq!(reader.read().unwrap(), None);
        assert_eq!(reader.read().unwrap(), None);
    }

    #[test]
    fn test_buffer_is_aligned_to_width() {
        assert_eq!(aligned_buffer_size(16 * 1024, 3), 16383);
        assert_eq!(aligned_buffer_size(64, 6), 60);
        assert_eq!(aligned_buffer_size(1, 7), 7);
        assert_eq!(aligned_buffer_size(0, 1), 1);
    }

    #[test]
    fn test_read_is_independent_of_buffer_and_read_sizes() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 37 % 256) as u8).collect();
        for bits in 1..=8 {
            let expected = read_all(bits, 16 * 1024, &data);
            assert_eq!(expected.len(), (data.len() * 8).div_ceil(bits as usize));
            for buffer_size in [1, 7, 64, 1024] {
                assert_eq!(read_all(bits, buffer_size, &data), expected, "bits {}", bits);
            }

            let mut reader = BitReader::new(bits, 64, Trickle { data: &data, step: 5 });
            let mut values = Vec::new();
            while let Some(v) = reader.read().unwrap() {
                values.push(v);
            }
            assert_eq!(values, expected, "trickled, bits {}", bits);
        }
    }

    #[test]
    fn test_write_packs_msb_first() {
        assert_eq!(write_all(1, 16, &[0, 1, 0, 0, 0, 0, 0, 1]), vec![0x41]);
        assert_eq!(write_all(3, 16, &[5, 4, 6, 5, 2]), vec![0b1011_0011]);
        assert_eq!(write_all(4, 16, &[0xA, 0xB, 0xC]), vec![0xAB]);
    }

    #[test]
    fn test_write_drops_partial_byte() {
        assert_eq!(write_all(6, 16, &[63]), Vec::<u8>::new());
        assert_eq!(write_all(1, 16, &[1, 1, 1]), Vec::<u8>::new());
    }

    #[test]
    fn test_round_trip_all_widths() {
        let data: Vec<u8> = (0..=255u8).chain((0..=255u8).rev()).collect();
        for bits in 1..=8 {
            for buffer_size in [1, 3, 64, 16 * 1024] {
                let values = read_all(bits, buffer_size, &data);
                assert_eq!(write_all(bits, buffer_size, &values), data, "bits {}", bits);
            }
        }
    }

    #[test]
    #[should_panic(expected = "chunk width")]
    fn test_width_out_of_range() {
        let _ = BitReader::new(9, 16, &[][..]);
    }
}
