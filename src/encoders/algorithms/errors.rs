use std::fmt;
use std::io;

/// Errors raised while building a [`Charset`](crate::Charset) or a
/// [`Coding`](crate::Coding) from it.
///
/// These are configuration errors: they are detected once, at construction,
/// and are never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharsetError {
    /// Fewer than two symbols.
    TooFewSymbols { len: usize },
    /// More than 256 symbols.
    TooManySymbols { len: usize },
    /// The same symbol appears twice.
    DuplicateSymbol {
        symbol: char,
        first: usize,
        second: usize,
    },
    /// A symbol that is always ignored while decoding (newline, carriage return).
    ReservedSymbol { symbol: char, position: usize },
    /// Packed mode was requested for a charset whose length is not a power of two.
    NotPowerOfTwo { len: usize, nearest: usize },
    /// Chunk size outside `1..=MAX_CHUNK_SIZE`.
    InvalidChunkSize { size: usize },
}

impl fmt::Display for CharsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharsetError::TooFewSymbols { len } => write!(
                f,
                "charset has too few symbols: have {}, want at least 2",
                len
            ),
            CharsetError::TooManySymbols { len } => write!(
                f,
                "charset has too many symbols: have {}, want at most {}",
                len,
                crate::core::charset::MAX_SYMBOLS
            ),
            CharsetError::DuplicateSymbol {
                symbol,
                first,
                second,
            } => write!(
                f,
                "duplicate symbol '{}' in charset at positions {} and {}",
                symbol.escape_debug(),
                first,
                second
            ),
            CharsetError::ReservedSymbol { symbol, position } => write!(
                f,
                "symbol '{}' at position {} cannot be used: line breaks are ignored while decoding",
                symbol.escape_debug(),
                position
            ),
            CharsetError::NotPowerOfTwo { len, nearest } => write!(
                f,
                "charset length is not a power of two\n   have: {}\n   want: a power of 2 (nearest is {}, which is {} away)",
                len,
                nearest,
                len.abs_diff(*nearest)
            ),
            CharsetError::InvalidChunkSize { size } => write!(
                f,
                "invalid chunk size {}: must be between 1 and {} bytes",
                size,
                crate::core::config::MAX_CHUNK_SIZE
            ),
        }
    }
}

impl std::error::Error for CharsetError {}

/// Errors that can occur during decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The input contains a character not in the charset.
    InvalidCharacter { char: char, position: usize },
    /// The input is not valid UTF-8 at this byte offset.
    InvalidUtf8 { position: usize },
    /// The input ended in the middle of a chunk's digit run.
    TruncatedChunk { symbols: usize, expected: usize },
    /// A digit run encodes a value too large for one chunk.
    ChunkOverflow { position: usize },
    /// The length trailer is out of range for the chunk size.
    InvalidTrailer { value: u64, chunk_size: usize },
    /// The input holds a single non-zero digit run, so there is no trailer.
    MissingTrailer,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidCharacter { char: c, position } => write!(
                f,
                "character '{}' (U+{:04X}) at position {} is not in the character set",
                c.escape_debug(),
                *c as u32,
                position
            ),
            DecodeError::InvalidUtf8 { position } => {
                write!(f, "input is not valid UTF-8 at byte {}", position)
            }
            DecodeError::TruncatedChunk { symbols, expected } => write!(
                f,
                "input ends in the middle of a chunk: {} trailing symbols, expected runs of {}",
                symbols, expected
            ),
            DecodeError::ChunkOverflow { position } => write!(
                f,
                "chunk starting at symbol {} is too large for the chunk size (wrong charset or chunk size?)",
                position
            ),
            DecodeError::InvalidTrailer { value, chunk_size } => write!(
                f,
                "length trailer {} is out of range for chunk size {}",
                value, chunk_size
            ),
            DecodeError::MissingTrailer => {
                write!(f, "input ends without a length trailer")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Errors returned by the streaming decoders.
///
/// Malformed input is reported as [`CodecError::Decode`]; failures of the
/// underlying reader or writer are passed through untouched as
/// [`CodecError::Io`].
#[derive(Debug)]
pub enum CodecError {
    Decode(DecodeError),
    Io(io::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Decode(e) => e.fmt(f),
            CodecError::Io(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Decode(e) => Some(e),
            CodecError::Io(e) => Some(e),
        }
    }
}

impl From<DecodeError> for CodecError {
    fn from(e: DecodeError) -> Self {
        CodecError::Decode(e)
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        CodecError::Io(e)
    }
}

/// Error when a preset is not found in the registry
#[derive(Debug)]
pub struct CharsetNotFoundError {
    pub name: String,
    pub suggestion: Option<String>,
}

impl CharsetNotFoundError {
    pub fn new(name: impl Into<String>, suggestion: Option<String>) -> Self {
        Self {
            name: name.into(),
            suggestion,
        }
    }
}

impl fmt::Display for CharsetNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "charset preset '{}' not found", self.name)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nhint: did you mean '{}'?", suggestion)?;
        }
        write!(f, "\n      run `aces --list` to see all presets")
    }
}

impl std::error::Error for CharsetNotFoundError {}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let len1 = s1.chars().count();
    let len2 = s2.chars().count();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut prev_row: Vec<usize> = (0..=len2).collect();
    let mut curr_row = vec![0; len2 + 1];

    for (i, c1) in s1.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, c2) in s2.chars().enumerate() {
            let cost = if c1 == c2 { 0 } else { 1 };
            curr_row[j + 1] = (curr_row[j] + 1)
                .min(prev_row[j + 1] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[len2]
}

/// Find the closest matching preset name
pub fn find_closest_charset(name: &str, available: &[String]) -> Option<String> {
    let threshold = if name.len() < 5 { 2 } else { 3 };

    available
        .iter()
        .map(|candidate| (levenshtein_distance(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)))
        .map(|(_, candidate)| candidate.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("base64", "base64"), 0);
        assert_eq!(levenshtein_distance("base64", "base32"), 2);
        assert_eq!(levenshtein_distance("bas64", "base64"), 1);
        assert_eq!(levenshtein_distance("", "moon"), 4);
    }

    #[test]
    fn test_find_closest_charset() {
        let presets = vec![
            "base64".to_string(),
            "base58".to_string(),
            "binary".to_string(),
            "dna".to_string(),
        ];

        assert_eq!(
            find_closest_charset("bas64", &presets),
            Some("base64".to_string())
        );
        assert_eq!(find_closest_charset("dnx", &presets), Some("dna".to_string()));
        assert_eq!(find_closest_charset("hieroglyphs", &presets), None);
        assert_eq!(find_closest_charset("x", &[]), None);
    }

    #[test]
    fn test_not_power_of_two_message() {
        let err = CharsetError::NotPowerOfTwo { len: 5, nearest: 4 };
        let display = err.to_string();
        assert!(display.contains("not a power of two"));
        assert!(display.contains("have: 5"));
        assert!(display.contains("nearest is 4, which is 1 away"));
    }

    #[test]
    fn test_invalid_character_message() {
        let err = DecodeError::InvalidCharacter {
            char: '_',
            position: 12,
        };
        let display = err.to_string();
        assert!(display.contains("'_'"));
        assert!(display.contains("U+005F"));
        assert!(display.contains("position 12"));
        assert!(display.contains("not in the character set"));
    }

    #[test]
    fn test_codec_error_preserves_io_error() {
        let err: CodecError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();
        match err {
            CodecError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            CodecError::Decode(_) => panic!("expected an io error"),
        }
    }

    #[test]
    fn test_not_found_hint() {
        let err = CharsetNotFoundError::new("bas64", Some("base64".to_string()));
        let display = err.to_string();
        assert!(display.contains("preset 'bas64' not found"));
        assert!(display.contains("did you mean 'base64'?"));
        assert!(display.contains("aces --list"));
    }
}
