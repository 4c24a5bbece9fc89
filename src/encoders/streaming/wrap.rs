use std::io::{self, Write};

/// Inserts a newline after every `width` characters of UTF-8 text.
///
/// Characters are counted by their lead bytes, so multi-byte symbols are
/// never split across lines. Input must be valid UTF-8, which encoder output
/// always is.
pub(crate) struct LineWrapper<W: Write> {
    inner: W,
    width: usize,
    column: usize,
    line: Vec<u8>,
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

impl<W: Write> LineWrapper<W> {
    pub fn new(inner: W, width: usize) -> Self {
        assert!(width > 0, "wrap width must be positive");
        LineWrapper {
            inner,
            width,
            column: 0,
            line: Vec::new(),
        }
    }

    /// Terminates the last line and returns the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if self.column > 0 {
            self.line.push(b'\n');
            self.column = 0;
        }
        self.inner.write_all(&self.line)?;
        self.line.clear();
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for LineWrapper<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.line.reserve(buf.len() + buf.len() / self.width + 1);
        for &byte in buf {
            if !is_continuation(byte) {
                if self.column == self.width {
                    self.line.push(b'\n');
                    self.column = 0;
                }
                self.column += 1;
            }
            self.line.push(byte);
        }
        self.inner.write_all(&self.line)?;
        self.line.clear();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(width: usize, pieces: &[&str]) -> String {
        let mut wrapper = LineWrapper::new(Vec::new(), width);
        for piece in pieces {
            wrapper.write_all(piece.as_bytes()).unwrap();
        }
        String::from_utf8(wrapper.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_wraps_at_width() {
        assert_eq!(wrap(4, &["abcdefghij"]), "abcd\nefgh\nij\n");
        assert_eq!(wrap(5, &["abcde"]), "abcde\n");
        assert_eq!(wrap(3, &["ab", "cd", "e", "f"]), "abc\ndef\n");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        assert_eq!(wrap(2, &["🌑🌒🌓"]), "🌑🌒\n🌓\n");
        // a symbol split across writes stays on one line
        let moon = "🌒".as_bytes();
        let mut wrapper = LineWrapper::new(Vec::new(), 1);
        wrapper.write_all("🌑".as_bytes()).unwrap();
        wrapper.write_all(&moon[..2]).unwrap();
        wrapper.write_all(&moon[2..]).unwrap();
        assert_eq!(String::from_utf8(wrapper.finish().unwrap()).unwrap(), "🌑\n🌒\n");
    }

    #[test]
    fn test_empty_output_has_no_newline() {
        assert_eq!(wrap(4, &[]), "");
    }
}
