mod decoder;
mod encoder;
mod wrap;

pub use decoder::StreamingDecoder;
pub use encoder::StreamingEncoder;
