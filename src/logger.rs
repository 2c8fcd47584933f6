use log::LevelFilter;

/// Logs go to stderr so stdout stays clean for `--output json`.
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: LevelFilter) {
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .init();
}
