//! CLI plumbing for the state machine compiler.
//!
//! The chart DSL lives *inside* the file being generated, between the first
//! `/**` and the following `**/`; the tool reads that region, compiles it,
//! and rewrites the same file with the generated code (which embeds the
//! region again, so the operation is repeatable). Writes are skipped when
//! the produced bytes already match the file, preserving timestamps for
//! build systems.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging with a default filter.
///
/// Use the `RUST_LOG` environment variable to override the default filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Read the chart region of a file: the text strictly between the first
/// `/**` and the following `**/`.
pub fn read_chart_region(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("unable to read file {}", path.display()))?;
    let Some(begin) = text.find("/**") else {
        bail!("{}: expecting /** ... **/", path.display());
    };
    let region = &text[begin + 3..];
    let Some(end) = region.find("**/") else {
        bail!("{}: expecting /** ... **/", path.display());
    };
    Ok(region[..end].to_string())
}

/// Write `text` to `path` unless the file already holds exactly those bytes.
pub fn write_if_changed(path: &Path, text: &[u8]) -> Result<()> {
    if let Ok(existing) = fs::read(path) {
        if existing == text {
            return Ok(());
        }
    }
    fs::write(path, text).with_context(|| format!("unable to create file {}", path.display()))
}
