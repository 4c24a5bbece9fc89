mod config;
mod logging;

use aces::{CharsetRegistry, Coding, CodingMode, DecodePolicy, StreamingDecoder, StreamingEncoder};
use clap::{ArgAction, Parser};
use std::io;

pub use logging::setup_logging;

#[derive(Parser)]
#[command(name = "aces")]
#[command(version)]
#[command(about = "Encode binary data with any set of characters", long_about = None)]
pub struct Cli {
    /// Symbols to encode with, in digit order (e.g. "01" or "🌑🌒🌓🌔")
    #[arg(value_name = "CHARSET", conflicts_with = "preset")]
    charset: Option<String>,

    /// Decode instead of encode
    #[arg(short, long)]
    decode: bool,

    /// Use a named charset from the registry
    #[arg(short, long, value_name = "NAME")]
    preset: Option<String>,

    /// Coding strategy (default: packed for power-of-two charsets, else chunked)
    #[arg(short, long, value_enum)]
    mode: Option<CodingMode>,

    /// Bytes per chunk in chunked mode
    #[arg(long, value_name = "N")]
    chunk_size: Option<usize>,

    /// I/O buffer size in bytes
    #[arg(long, value_name = "N")]
    buffer_size: Option<usize>,

    /// Skip characters outside the charset when decoding
    #[arg(short, long)]
    ignore_garbage: bool,

    /// Wrap encoded output after COLS symbols (0 disables wrapping)
    #[arg(short, long, value_name = "COLS")]
    wrap: Option<usize>,

    /// Extra TOML file with presets and settings
    #[arg(long, value_name = "PATH")]
    config: Option<String>,

    /// List available presets
    #[arg(short, long)]
    list: bool,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show more diagnostics (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn list_presets(registry: &CharsetRegistry) {
    println!("Available presets:\n");

    for name in registry.names() {
        let Some(preset) = registry.get_charset(&name) else {
            continue;
        };
        let (count, preview) = match preset.effective_chars() {
            Ok(chars) => (chars.chars().count(), chars.chars().take(20).collect::<String>()),
            Err(_) => (preset.symbol_count(), String::from("(invalid range)")),
        };
        let suffix = if count > 20 { "..." } else { "" };
        println!(
            "  {:<15} base-{:<3} {:>7}  {}{}",
            name,
            count,
            preset.effective_mode().as_str(),
            preview,
            suffix
        );
        if let Some(description) = &preset.description {
            println!("  {:<15} {}", "", description);
        }
    }
}

pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let registry = config::load_registry(cli.config.as_deref())?;

    if cli.list {
        list_presets(&registry);
        return Ok(());
    }

    let (charset, preset_mode) =
        config::resolve_charset(&registry, cli.charset.as_deref(), cli.preset.as_deref())?;

    // command-line flags override the settings tables
    let settings = &registry.settings;
    let mut coding_config = settings.coding_config();
    coding_config.mode = cli.mode.or(preset_mode);
    if let Some(size) = cli.chunk_size {
        coding_config.chunk_size = size;
    }
    if let Some(size) = cli.buffer_size {
        coding_config.buffer_size = size;
    }
    if cli.ignore_garbage {
        coding_config.policy = DecodePolicy::Skip;
    }
    let wrap = cli.wrap.or(settings.wrap).unwrap_or(0);

    let coding = Coding::with_config(charset, &coding_config)?;

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    if cli.decode {
        let bytes = StreamingDecoder::new(&coding, stdout).decode(stdin)?;
        tracing::info!(bytes, "decoded");
    } else {
        let bytes = StreamingEncoder::new(&coding, stdout)
            .with_wrap(wrap)
            .encode(stdin)?;
        tracing::info!(bytes, "encoded");
    }

    Ok(())
}
