/// Logging setup for cxtask
///
/// Task progress goes to stderr through `tracing`; external tool output is
/// inherited directly, so it is never mixed into log lines.
use tracing_subscriber::EnvFilter;

/// Log level selected by the -v/-q flags
pub fn level_for(verbose: u8, quiet: bool) -> tracing::Level {
    match verbose {
        0 if quiet => tracing::Level::ERROR,
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the flags.
pub fn init(verbose: u8, quiet: bool) {
    let level = level_for(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(0, false), tracing::Level::INFO);
        assert_eq!(level_for(0, true), tracing::Level::ERROR);
        assert_eq!(level_for(1, false), tracing::Level::DEBUG);
        assert_eq!(level_for(3, true), tracing::Level::TRACE);
    }
}
