//! Convenient re-exports for common usage.
//!
//! # Example
//!
//! ```
//! use aces::prelude::*;
//!
//! let registry = CharsetRegistry::load_default().unwrap();
//! let charset = registry.get_charset("dna").unwrap().to_charset().unwrap();
//! let coding = Coding::new(charset).unwrap();
//! assert_eq!(encode(b"\x1b", &coding), "ACGT");
//! ```

pub use crate::{
    // Core types
    Charset,
    Coding,
    CodingConfig,
    CodingMode,
    DecodePolicy,

    // Config
    CharsetConfig,
    CharsetRegistry,
    Settings,

    // Errors
    CharsetError,
    CodecError,
    DecodeError,

    // Streaming
    StreamingDecoder,
    StreamingEncoder,

    // Core encoding/decoding
    decode,
    encode,
};
