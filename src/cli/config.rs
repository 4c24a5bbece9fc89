use aces::{Charset, CharsetNotFoundError, CharsetRegistry, CodingMode, find_closest_charset};
use std::path::Path;

/// Loads the registry with the standard overrides, then `extra` if given.
///
/// Unlike the standard locations, an explicit file that cannot be read or
/// parsed is an error.
pub fn load_registry(extra: Option<&str>) -> Result<CharsetRegistry, Box<dyn std::error::Error>> {
    let mut registry = CharsetRegistry::load_with_overrides()?;

    if let Some(path) = extra {
        let expanded = shellexpand::tilde(path);
        let file = CharsetRegistry::load_from_file(Path::new(expanded.as_ref()))
            .map_err(|e| format!("cannot load config '{}': {}", path, e))?;
        tracing::debug!(path = %expanded, presets = file.charsets.len(), "loaded config file");
        registry.merge(file);
    }

    Ok(registry)
}

/// Builds the charset from the positional argument, a preset, or the
/// configured default, in that order. Returns the preset's mode, if any.
pub fn resolve_charset(
    registry: &CharsetRegistry,
    chars: Option<&str>,
    preset: Option<&str>,
) -> Result<(Charset, Option<CodingMode>), Box<dyn std::error::Error>> {
    if let Some(chars) = chars {
        return Ok((chars.parse()?, None));
    }

    let name = preset
        .or(registry.settings.default_charset.as_deref())
        .ok_or("need a character set: pass CHARSET or --preset NAME")?;

    let preset_config = registry.get_charset(name).ok_or_else(|| {
        // Try to find a close match
        let suggestion = find_closest_charset(name, &registry.names());
        CharsetNotFoundError::new(name, suggestion)
    })?;

    let charset = preset_config
        .to_charset()
        .map_err(|e| format!("invalid preset '{}': {}", name, e))?;
    tracing::debug!(preset = name, symbols = charset.len(), "resolved preset");

    Ok((charset, preset_config.mode))
}
