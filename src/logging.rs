use log::LevelFilter;
use pretty_env_logger::env_logger::Target;

/// Timed, colored log lines on stderr. `RUST_LOG` overrides the default
/// `info` level; stdout is left to the probe report.
pub fn init() {
    let _ = pretty_env_logger::formatted_timed_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(Target::Stderr)
        .try_init();
}
