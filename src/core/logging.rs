//! Logging initialization

/// Initialize the logging system
///
/// Uses env_logger with a default filter of `info` and second-resolution
/// timestamps, so status lines read like `[2023-08-01T12:00:00Z INFO ...]`.
/// Override with the RUST_LOG environment variable.
///
/// # Example
/// ```
/// woxel::core::logging::init();
/// log::info!("New volumetric canvas created.");
/// ```
pub fn init() {
    init_with_default("info");
}

/// Initialize logging with a custom default filter.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_default(filter: &str) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(filter)
    )
    .format_timestamp_secs()
    .try_init();
}
