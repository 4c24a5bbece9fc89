use super::algorithms::{ChunkedCoding, CharsetError, CodecError, PackedCoding, StaticCoding};
use crate::core::charset::Charset;
use crate::core::config::{CodingConfig, CodingMode};
use std::io::{Read, Write};

/// A charset bound to the coding strategy that serves it.
///
/// The strategy is chosen once, at construction: packed for power-of-two
/// charsets and chunked otherwise, unless the config names a mode.
#[derive(Debug, Clone)]
pub enum Coding {
    Packed(PackedCoding),
    Chunked(ChunkedCoding),
    Static(StaticCoding),
}

impl Coding {
    /// Builds a coder with the default configuration.
    pub fn new(charset: Charset) -> Result<Self, CharsetError> {
        Self::with_config(charset, &CodingConfig::default())
    }

    pub fn with_config(charset: Charset, config: &CodingConfig) -> Result<Self, CharsetError> {
        let mode = config.mode.unwrap_or_else(|| CodingMode::auto(charset.len()));
        let base = charset.len();

        let coding = match mode {
            CodingMode::Packed => Coding::Packed(PackedCoding::new(charset, config)?),
            CodingMode::Chunked => Coding::Chunked(ChunkedCoding::new(charset, config)?),
            CodingMode::Static => Coding::Static(StaticCoding::new(charset, config.policy)),
        };

        match &coding {
            Coding::Packed(packed) => tracing::debug!(
                mode = mode.as_str(),
                base,
                bits = packed.bits_per_symbol(),
                "selected coder"
            ),
            Coding::Chunked(chunked) => tracing::debug!(
                mode = mode.as_str(),
                base,
                chunk_size = chunked.chunk_size(),
                digits_per_chunk = chunked.digits_per_chunk(),
                "selected coder"
            ),
            Coding::Static(_) => tracing::debug!(mode = mode.as_str(), base, "selected coder"),
        }
        Ok(coding)
    }

    pub fn mode(&self) -> CodingMode {
        match self {
            Coding::Packed(_) => CodingMode::Packed,
            Coding::Chunked(_) => CodingMode::Chunked,
            Coding::Static(_) => CodingMode::Static,
        }
    }

    pub fn charset(&self) -> &Charset {
        match self {
            Coding::Packed(c) => c.charset(),
            Coding::Chunked(c) => c.charset(),
            Coding::Static(c) => c.charset(),
        }
    }

    /// Encodes all of `src` into `dst`. Static mode buffers the whole input.
    pub fn encode<W: Write, R: Read>(&self, dst: W, src: R) -> std::io::Result<()> {
        match self {
            Coding::Packed(c) => c.encode(dst, src),
            Coding::Chunked(c) => c.encode(dst, src),
            Coding::Static(c) => c.encode_stream(dst, src),
        }
    }

    /// Decodes all of `src` into `dst`.
    ///
    /// On error, `dst` may already hold the decoded prefix.
    pub fn decode<W: Write, R: Read>(&self, dst: W, src: R) -> Result<(), CodecError> {
        match self {
            Coding::Packed(c) => c.decode(dst, src),
            Coding::Chunked(c) => c.decode(dst, src),
            Coding::Static(c) => c.decode_stream(dst, src),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_selection() {
        assert_eq!(Coding::new("01".parse().unwrap()).unwrap().mode(), CodingMode::Packed);
        assert_eq!(
            Coding::new("<>(){}[]".parse().unwrap()).unwrap().mode(),
            CodingMode::Packed
        );
        assert_eq!(
            Coding::new("abcde".parse().unwrap()).unwrap().mode(),
            CodingMode::Chunked
        );
    }

    #[test]
    fn test_forced_modes() {
        let config = CodingConfig::default().with_mode(CodingMode::Chunked);
        let coding = Coding::with_config("0123456789abcdef".parse().unwrap(), &config).unwrap();
        assert_eq!(coding.mode(), CodingMode::Chunked);

        let config = CodingConfig::default().with_mode(CodingMode::Static);
        let coding = Coding::with_config("abc".parse().unwrap(), &config).unwrap();
        assert_eq!(coding.mode(), CodingMode::Static);

        let config = CodingConfig::default().with_mode(CodingMode::Packed);
        assert!(matches!(
            Coding::with_config("abc".parse().unwrap(), &config),
            Err(CharsetError::NotPowerOfTwo { len: 3, nearest: 4 })
        ));
    }

    #[test]
    fn test_charset_is_kept() {
        let coding = Coding::new("xyz".parse().unwrap()).unwrap();
        assert_eq!(coding.charset().symbols(), &['x', 'y', 'z']);
    }

    #[test]
    fn test_round_trip_every_mode() {
        let data = b"\x00\x00mode check\xff";
        for mode in [CodingMode::Packed, CodingMode::Chunked, CodingMode::Static] {
            let config = CodingConfig::default().with_mode(mode);
            let coding = Coding::with_config("0123456789abcdef".parse().unwrap(), &config).unwrap();
            let mut encoded = Vec::new();
            coding.encode(&mut encoded, &data[..]).unwrap();
            let mut decoded = Vec::new();
            coding.decode(&mut decoded, &encoded[..]).unwrap();
            assert_eq!(decoded, data, "{:?}", mode);
        }
    }
}
