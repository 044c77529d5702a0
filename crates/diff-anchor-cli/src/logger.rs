//! stderr logging using env_logger
//!
//! `RUST_LOG` wins when set; otherwise the level from the config file is
//! used.

use log::LevelFilter;

/// Map a config level name to a filter, defaulting to `Warn`
fn level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}

/// Initialize logging to stderr
pub fn init(config_level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level_filter(config_level));
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // A second init (e.g. in tests) keeps the first logger
    let _ = builder.format_timestamp(None).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter("debug"), LevelFilter::Debug);
        assert_eq!(level_filter("INFO"), LevelFilter::Info);
        assert_eq!(level_filter("off"), LevelFilter::Off);
        assert_eq!(level_filter("chatty"), LevelFilter::Warn);
    }
}
