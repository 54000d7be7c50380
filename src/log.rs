use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;
use std::time::Instant;

/// Builds the global logger. The `RUST_LOG` environment variable wins;
/// `level` is the fallback filter. Records are prefixed with the elapsed
/// time since the logger was built.
pub fn build_logger_for_level(level: LevelFilter) {
    let start_time = Instant::now();

    let env = Env::default().default_filter_or(level.as_str());
    let mut builder = Builder::from_env(env);
    builder
        .format(move |buf, record| {
            let elapsed = start_time.elapsed().as_millis();
            writeln!(
                buf,
                "{:>6}.{:<03} [{}] {}",
                elapsed / 1000,
                elapsed % 1000,
                record.level(),
                record.args()
            )
        })
        .init();
}

/// Like [`build_logger_for_level`], with the fallback level raised by
/// `verbosity` many steps (e.g. the number of `-v` flags on the CLI).
pub fn build_logger_for_verbosity(default_level: LevelFilter, verbosity: usize) {
    build_logger_for_level(level_from_verbosity(default_level, verbosity));
}

fn level_from_verbosity(default_level: LevelFilter, verbosity: usize) -> LevelFilter {
    let levels = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];
    let index = levels
        .iter()
        .position(|&l| l == default_level)
        .expect("every level filter is listed");
    levels[(index + verbosity).min(levels.len() - 1)]
}
