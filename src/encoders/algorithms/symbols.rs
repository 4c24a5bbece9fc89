//! Incremental UTF-8 symbol input for the decoders.

use super::errors::{CodecError, DecodeError};
use crate::core::charset::{Charset, LINE_BREAKS};
use crate::core::config::DecodePolicy;
use std::io::{self, Read};

/// Smallest buffer able to hold one UTF-8 encoded character.
const MIN_BUFFER: usize = 4;

/// Number of bytes in the UTF-8 sequence started by `lead`, or 0 if `lead`
/// cannot start a sequence.
fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

/// Maps one input character to a digit under `policy`.
///
/// Line breaks and, with [`DecodePolicy::Skip`], unknown characters yield
/// `Ok(None)`.
pub(crate) fn classify(
    charset: &Charset,
    policy: DecodePolicy,
    c: char,
    position: usize,
) -> Result<Option<u8>, DecodeError> {
    if LINE_BREAKS.contains(&c) {
        return Ok(None);
    }
    match (charset.decode_char(c), policy) {
        (Some(digit), _) => Ok(Some(digit)),
        (None, DecodePolicy::Skip) => Ok(None),
        (None, DecodePolicy::Reject) => Err(DecodeError::InvalidCharacter { char: c, position }),
    }
}

/// Reads digits from UTF-8 text, one symbol at a time.
///
/// Characters may straddle read boundaries of the underlying reader.
pub(crate) struct DigitReader<'c, R> {
    inner: R,
    charset: &'c Charset,
    policy: DecodePolicy,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    /// byte offset of `buf[start]` in the stream
    offset: usize,
    /// characters consumed so far
    position: usize,
    skipped: usize,
}

impl<'c, R: Read> DigitReader<'c, R> {
    pub fn new(charset: &'c Charset, policy: DecodePolicy, buffer_size: usize, inner: R) -> Self {
        DigitReader {
            inner,
            charset,
            policy,
            buf: vec![0; buffer_size.max(MIN_BUFFER)],
            start: 0,
            end: 0,
            offset: 0,
            position: 0,
            skipped: 0,
        }
    }

    /// Number of characters consumed, including skipped ones.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of characters dropped under [`DecodePolicy::Skip`].
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn read_more(&mut self) -> io::Result<usize> {
        loop {
            match self.inner.read(&mut self.buf[self.end..]) {
                Ok(n) => {
                    self.end += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Makes at least `want` bytes available at `buf[start..]` unless the
    /// input ends first.
    fn fill(&mut self, want: usize) -> io::Result<()> {
        if self.end - self.start >= want {
            return Ok(());
        }
        self.buf.copy_within(self.start..self.end, 0);
        self.end -= self.start;
        self.start = 0;
        while self.end < want {
            if self.read_more()? == 0 {
                break;
            }
        }
        Ok(())
    }

    /// Returns the next well-formed character.
    ///
    /// Under [`DecodePolicy::Skip`] a byte that cannot start or complete a
    /// sequence counts as one skipped character; the reader resynchronises on
    /// the byte after it.
    fn next_char(&mut self) -> Result<Option<char>, CodecError> {
        loop {
            self.fill(1)?;
            if self.start == self.end {
                return Ok(None);
            }

            let width = utf8_width(self.buf[self.start]);
            if width > 0 {
                self.fill(width)?;
                let bytes = &self.buf[self.start..self.end.min(self.start + width)];
                let c = std::str::from_utf8(bytes)
                    .ok()
                    .filter(|_| bytes.len() == width)
                    .and_then(|s| s.chars().next());
                if let Some(c) = c {
                    self.start += width;
                    self.offset += width;
                    self.position += 1;
                    return Ok(Some(c));
                }
            }

            if self.policy == DecodePolicy::Reject {
                return Err(DecodeError::InvalidUtf8 {
                    position: self.offset,
                }
                .into());
            }
            self.start += 1;
            self.offset += 1;
            self.position += 1;
            self.skipped += 1;
        }
    }

    /// Returns the next digit, or `Ok(None)` at end of input.
    pub fn next_digit(&mut self) -> Result<Option<u8>, CodecError> {
        while let Some(c) = self.next_char()? {
            match classify(self.charset, self.policy, c, self.position - 1)? {
                Some(digit) => return Ok(Some(digit)),
                None if !LINE_BREAKS.contains(&c) => self.skipped += 1,
                None => {}
            }
        }
        Ok(None)
    }
}
