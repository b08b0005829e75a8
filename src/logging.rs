use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;

/// Send `log` output to `path`, appending. The terminal belongs to the TUI,
/// so nothing is logged to stderr. `RUST_LOG` directives override `level`.
pub fn init_logging(level: &str, path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    env_logger::Builder::new()
        .parse_filters(level)
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Pipe(Box::new(file)))
        .write_style(env_logger::WriteStyle::Never)
        .format_timestamp_secs()
        .try_init()
        .context("Failed to initialize logger")?;

    log::debug!("Logging to {} at level {}", path.display(), level);
    Ok(())
}
