use std::str::FromStr;

use tracing::Level;

use crate::config::LogSettings;

/// Maps a configured level name onto a tracing level, defaulting to INFO.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "warning" => Level::WARN,
        other => Level::from_str(other).unwrap_or(Level::INFO),
    }
}

/// Initialize tracing/logging for the application.
///
/// Uses `try_init` so tests and embedding applications can call this more than
/// once, or install their own subscriber first.
pub fn init(settings: &LogSettings) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(&settings.level))
        .with_target(settings.with_target)
        .try_init();
}
