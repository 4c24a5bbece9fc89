use super::encoder::Counting;
use crate::encoders::algorithms::CodecError;
use crate::encoders::coding::Coding;
use std::io::{Read, Write};

/// Streaming decoder for processing large amounts of encoded data efficiently.
///
/// Line breaks in the input are ignored, so wrapped output decodes as is.
pub struct StreamingDecoder<'a, W: Write> {
    coding: &'a Coding,
    writer: W,
}

impl<'a, W: Write> StreamingDecoder<'a, W> {
    /// Creates a new streaming decoder.
    ///
    /// # Arguments
    ///
    /// * `coding` - The coding the input was encoded with
    /// * `writer` - The destination for decoded output
    pub fn new(coding: &'a Coding, writer: W) -> Self {
        StreamingDecoder { coding, writer }
    }

    /// Decodes everything `reader` yields. Returns the number of bytes
    /// written.
    ///
    /// On error, the writer may already have received a decoded prefix.
    pub fn decode<R: Read>(&mut self, reader: R) -> Result<u64, CodecError> {
        let mut sink = Counting {
            inner: &mut self.writer,
            count: 0,
        };
        self.coding.decode(&mut sink, reader)?;

        tracing::debug!(bytes = sink.count, "decoded stream");
        Ok(sink.count)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
