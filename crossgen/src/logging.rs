//! Logger setup shared by the `crossgen` and `crosstui` binaries.

use log::LevelFilter;
use std::env;

/// Initialize logging to stderr.
///
/// Logs at `Debug` level if `debug_enabled` is true, otherwise at `Info`. `RUST_LOG`
/// overrides both when set. Calling this more than once is harmless.
pub fn init_logger(debug_enabled: bool) {
  let level = if debug_enabled {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };

  let mut builder = env_logger::Builder::new();
  builder
    .filter(None, level)
    .format_timestamp(None)
    .format_module_path(false)
    .format_target(false);

  // Let RUST_LOG override our defaults if explicitly set
  if let Ok(spec) = env::var("RUST_LOG") {
    builder.parse_filters(&spec);
  }

  if builder.try_init().is_ok() {
    log::debug!("Logger initialized at {level:?} level");
  }
}
