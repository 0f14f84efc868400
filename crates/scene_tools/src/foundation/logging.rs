//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

use log::LevelFilter;

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a default level
///
/// The level string uses the usual `error`/`warn`/`info`/`debug`/`trace`
/// names; unknown values fall back to `info`. `RUST_LOG` still overrides
/// the default when it is set.
pub fn init_with_level(level: &str) {
    let filter = parse_level(level);
    let _ = env_logger::Builder::from_default_env()
        .filter_level(filter)
        .parse_default_env()
        .try_init();
}

/// Parse a level name into a filter
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_names() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
    }

    #[test]
    fn test_parse_level_falls_back_to_info() {
        assert_eq!(parse_level("loud"), LevelFilter::Info);
        assert_eq!(parse_level(""), LevelFilter::Info);
    }
}
