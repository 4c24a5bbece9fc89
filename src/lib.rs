//! Encode binary data as text over arbitrary character sets.
//!
//! A [`Charset`] is any ordered list of 2 to 256 distinct Unicode symbols.
//! [`Coding`] picks the strategy once, from the charset length:
//!
//! - power-of-two charsets are bit-packed, `log2(len)` bits per symbol
//! - other charsets use chunked base conversion with a length trailer
//! - `static` mode converts the whole input as one number (base58 style)
//!
//! # Example
//!
//! ```
//! use aces::{Charset, Coding};
//!
//! let coding = Coding::new("01".parse::<Charset>().unwrap()).unwrap();
//! assert_eq!(aces::encode(b"A", &coding), "01000001");
//! assert_eq!(aces::decode("01000001", &coding).unwrap(), b"A");
//! ```

mod core;
mod encoders;

pub mod prelude;

pub use crate::core::charset::{Charset, MAX_SYMBOLS};
pub use crate::core::config::{
    CharsetConfig, CharsetRegistry, CodingConfig, CodingMode, DEFAULT_BUFFER_SIZE,
    DEFAULT_CHUNK_SIZE, DecodePolicy, MAX_CHUNK_SIZE, Settings,
};
pub use encoders::algorithms::{
    BitReader, BitWriter, CharsetError, CharsetNotFoundError, ChunkedCoding, CodecError,
    DecodeError, PackedCoding, StaticCoding, digits_per_chunk, find_closest_charset,
};
pub use encoders::coding::Coding;
pub use encoders::streaming::{StreamingDecoder, StreamingEncoder};

/// Encodes `data` in memory.
pub fn encode(data: &[u8], coding: &Coding) -> String {
    let mut out = Vec::new();
    coding
        .encode(&mut out, data)
        .expect("writing to a Vec cannot fail");
    // the coders only ever emit whole symbols
    String::from_utf8(out).expect("encoder output is valid UTF-8")
}

/// Decodes `encoded` in memory.
pub fn decode(encoded: &str, coding: &Coding) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    coding.decode(&mut out, encoded.as_bytes())?;
    Ok(out)
}
