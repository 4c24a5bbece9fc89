use super::wrap::LineWrapper;
use crate::encoders::coding::Coding;
use std::io::{self, Read, Write};

/// Counts bytes passing through to the wrapped writer.
pub(super) struct Counting<W> {
    pub(super) inner: W,
    pub(super) count: u64,
}

impl<W: Write> Write for Counting<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Streaming encoder for processing large amounts of data efficiently.
///
/// Packed and chunked codings run in constant memory; static coding reads
/// the whole input first.
pub struct StreamingEncoder<'a, W: Write> {
    coding: &'a Coding,
    writer: W,
    wrap: usize,
}

impl<'a, W: Write> StreamingEncoder<'a, W> {
    /// Creates a new streaming encoder.
    ///
    /// # Arguments
    ///
    /// * `coding` - The coding to encode with
    /// * `writer` - The destination for encoded output
    pub fn new(coding: &'a Coding, writer: W) -> Self {
        StreamingEncoder {
            coding,
            writer,
            wrap: 0,
        }
    }

    /// Breaks the output into lines of `cols` symbols, ending with a newline.
    /// Zero disables wrapping.
    pub fn with_wrap(mut self, cols: usize) -> Self {
        self.wrap = cols;
        self
    }

    /// Encodes everything `reader` yields. Returns the number of bytes
    /// written, line breaks included.
    pub fn encode<R: Read>(&mut self, reader: R) -> io::Result<u64> {
        let mut sink = Counting {
            inner: &mut self.writer,
            count: 0,
        };

        if self.wrap == 0 {
            self.coding.encode(&mut sink, reader)?;
        } else {
            let mut wrapper = LineWrapper::new(&mut sink, self.wrap);
            self.coding.encode(&mut wrapper, reader)?;
            wrapper.finish()?;
        }

        tracing::debug!(bytes = sink.count, wrap = self.wrap, "encoded stream");
        Ok(sink.count)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
