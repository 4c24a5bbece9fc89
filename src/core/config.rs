use crate::core::charset::Charset;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Default I/O buffer size for the streaming paths.
pub const DEFAULT_BUFFER_SIZE: usize = 16 * 1024;

/// Default number of bytes per chunk in chunked mode.
pub const DEFAULT_CHUNK_SIZE: usize = 8;

/// Largest chunk size accepted in chunked mode.
pub const MAX_CHUNK_SIZE: usize = 64;

/// Encoding strategy for converting binary data to text.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum CodingMode {
    /// Fixed-width bit packing. Requires a power-of-two charset.
    /// Streams with constant memory.
    Packed,
    /// Independent base conversion of fixed-size byte chunks plus a
    /// length trailer. Works with any charset and streams.
    Chunked,
    /// True base conversion of the whole input as one number, keeping
    /// leading zero bytes (base58 style). Not streamable.
    #[serde(alias = "radix")]
    Static,
}

impl CodingMode {
    /// Mode chosen when none is configured.
    pub fn auto(charset_len: usize) -> Self {
        if charset_len.is_power_of_two() {
            CodingMode::Packed
        } else {
            CodingMode::Chunked
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CodingMode::Packed => "packed",
            CodingMode::Chunked => "chunked",
            CodingMode::Static => "static",
        }
    }
}

/// What the decoders do with a character that is not in the charset.
///
/// Line breaks are skipped under both policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Fail with [`DecodeError::InvalidCharacter`](crate::DecodeError::InvalidCharacter).
    #[default]
    Reject,
    /// Drop the character and continue.
    Skip,
}

/// Construction-time settings for a [`Coding`](crate::Coding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingConfig {
    /// Explicit mode, or `None` to pick from the charset length.
    pub mode: Option<CodingMode>,
    /// Size of the I/O buffers in bytes. Rounded by the bit adapters to a
    /// multiple of the symbol width.
    pub buffer_size: usize,
    /// Bytes per chunk in chunked mode. Encoder and decoder must agree.
    pub chunk_size: usize,
    pub policy: DecodePolicy,
}

impl Default for CodingConfig {
    fn default() -> Self {
        CodingConfig {
            mode: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            policy: DecodePolicy::Reject,
        }
    }
}

impl CodingConfig {
    pub fn with_mode(mut self, mode: CodingMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    pub fn with_policy(mut self, policy: DecodePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Configuration for a single charset preset loaded from TOML.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CharsetConfig {
    /// The symbols comprising the charset (explicit list)
    #[serde(default)]
    pub chars: String,
    /// First symbol of a sequential Unicode range, used with `length`
    #[serde(default)]
    pub start: Option<String>,
    /// Number of symbols in a range-based charset
    #[serde(default)]
    pub length: Option<usize>,
    /// The coding mode to use (auto-detected if not specified)
    #[serde(default)]
    pub mode: Option<CodingMode>,
    /// One-line description shown by `--list`
    #[serde(default)]
    pub description: Option<String>,
}

impl CharsetConfig {
    /// Returns the effective symbol string, generating it from the range if needed.
    ///
    /// Explicit `chars` take priority over `start` + `length`.
    pub fn effective_chars(&self) -> Result<String, String> {
        if !self.chars.is_empty() {
            return Ok(self.chars.clone());
        }

        if let (Some(start_str), Some(length)) = (&self.start, self.length) {
            let start_char = start_str
                .chars()
                .next()
                .ok_or("start must contain at least one character")?;

            return Self::generate_range(start_char as u32, length);
        }

        Err("charset needs either `chars` or `start` + `length`".to_string())
    }

    /// Generate a string of sequential Unicode characters from a range.
    fn generate_range(start: u32, length: usize) -> Result<String, String> {
        const MAX_UNICODE: u32 = 0x10FFFF;
        const SURROGATE_START: u32 = 0xD800;
        const SURROGATE_END: u32 = 0xDFFF;

        if length == 0 {
            return Err("length must be greater than 0".to_string());
        }

        let end = u32::try_from(length - 1)
            .ok()
            .and_then(|offset| start.checked_add(offset))
            .ok_or("range exceeds maximum Unicode codepoint")?;

        if end > MAX_UNICODE {
            return Err(format!(
                "range end U+{:X} exceeds maximum Unicode codepoint U+{:X}",
                end, MAX_UNICODE
            ));
        }

        if start <= SURROGATE_END && end >= SURROGATE_START {
            return Err(format!(
                "range U+{:X}..U+{:X} crosses surrogate gap (U+D800..U+DFFF)",
                start, end
            ));
        }

        (start..=end)
            .map(|cp| char::from_u32(cp).ok_or_else(|| format!("invalid codepoint U+{:X}", cp)))
            .collect()
    }

    /// Number of symbols without building the charset.
    pub fn symbol_count(&self) -> usize {
        if !self.chars.is_empty() {
            self.chars.chars().count()
        } else {
            self.length.unwrap_or(0)
        }
    }

    /// Returns the configured mode, or the one implied by the charset length.
    pub fn effective_mode(&self) -> CodingMode {
        self.mode
            .unwrap_or_else(|| CodingMode::auto(self.symbol_count()))
    }

    /// Builds and validates the charset.
    pub fn to_charset(&self) -> Result<Charset, Box<dyn std::error::Error>> {
        let chars = self.effective_chars()?;
        Ok(chars.parse::<Charset>()?)
    }
}

/// Global settings, all optional so that override files only replace what
/// they set.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Preset used when no charset is given on the command line
    #[serde(default)]
    pub default_charset: Option<String>,
    #[serde(default)]
    pub buffer_size: Option<usize>,
    #[serde(default)]
    pub chunk_size: Option<usize>,
    /// Skip characters outside the charset when decoding
    #[serde(default)]
    pub ignore_garbage: Option<bool>,
    /// Wrap encoded output after this many symbols (0 = never)
    #[serde(default)]
    pub wrap: Option<usize>,
}

impl Settings {
    /// Replaces every field that `other` sets.
    pub fn merge(&mut self, other: Settings) {
        if other.default_charset.is_some() {
            self.default_charset = other.default_charset;
        }
        if other.buffer_size.is_some() {
            self.buffer_size = other.buffer_size;
        }
        if other.chunk_size.is_some() {
            self.chunk_size = other.chunk_size;
        }
        if other.ignore_garbage.is_some() {
            self.ignore_garbage = other.ignore_garbage;
        }
        if other.wrap.is_some() {
            self.wrap = other.wrap;
        }
    }

    /// Coding configuration with these settings applied over the defaults.
    pub fn coding_config(&self) -> CodingConfig {
        let defaults = CodingConfig::default();
        CodingConfig {
            mode: None,
            buffer_size: self.buffer_size.unwrap_or(defaults.buffer_size),
            chunk_size: self.chunk_size.unwrap_or(defaults.chunk_size),
            policy: if self.ignore_garbage.unwrap_or(false) {
                DecodePolicy::Skip
            } else {
                DecodePolicy::Reject
            },
        }
    }
}

/// Collection of charset presets and settings loaded from TOML files.
#[derive(Debug, Deserialize, Default)]
pub struct CharsetRegistry {
    /// Map of preset names to their configurations
    #[serde(default)]
    pub charsets: HashMap<String, CharsetConfig>,
    #[serde(default)]
    pub settings: Settings,
}

impl CharsetRegistry {
    /// Parses a registry from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Loads the built-in presets bundled with the library.
    pub fn load_default() -> Result<Self, Box<dyn std::error::Error>> {
        let content = include_str!("../../charsets.toml");
        Ok(Self::from_toml(content)?)
    }

    /// Loads a registry from a file.
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?)
    }

    /// Loads the built-in presets with user overrides from standard locations.
    ///
    /// Searches in priority order:
    /// 1. Built-in presets (from library)
    /// 2. `~/.config/aces/charsets.toml` (user overrides)
    /// 3. `./charsets.toml` (project-local overrides)
    ///
    /// A file that fails to load is reported and skipped.
    pub fn load_with_overrides() -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = Self::load_default()?;

        if let Some(config_dir) = dirs::config_dir() {
            config.merge_file_if_exists(&config_dir.join("aces").join("charsets.toml"));
        }
        config.merge_file_if_exists(Path::new("charsets.toml"));

        Ok(config)
    }

    fn merge_file_if_exists(&mut self, path: &Path) {
        if !path.exists() {
            return;
        }
        match Self::load_from_file(path) {
            Ok(other) => {
                tracing::debug!(path = %path.display(), "loaded charset overrides");
                self.merge(other);
            }
            Err(e) => {
                tracing::warn!("failed to load config from {}: {}", path.display(), e);
            }
        }
    }

    /// Merges another registry into this one.
    ///
    /// Presets from `other` replace presets with the same name.
    pub fn merge(&mut self, other: CharsetRegistry) {
        self.charsets.extend(other.charsets);
        self.settings.merge(other.settings);
    }

    /// Retrieves a preset by name.
    pub fn get_charset(&self, name: &str) -> Option<&CharsetConfig> {
        self.charsets.get(name)
    }

    /// Preset names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.charsets.keys().cloned().collect();
        names.sort();
        names
    }
}
