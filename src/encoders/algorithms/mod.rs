pub mod bits;
pub mod chunked;
pub mod errors;
pub mod math;
pub mod packed;
pub(crate) mod symbols;

// Re-export the coders and error types for the public API
pub use bits::{BitReader, BitWriter};
pub use chunked::{ChunkedCoding, digits_per_chunk};
pub use errors::{
    CharsetError, CharsetNotFoundError, CodecError, DecodeError, find_closest_charset,
};
pub use math::StaticCoding;
pub use packed::PackedCoding;
