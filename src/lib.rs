pub mod game;

// ============================================================================
// Profiling Macros
// ============================================================================

/// Tick interval between `profile_log!` lines.
pub const PROFILE_LOG_INTERVAL: u64 = 100;

/// Log a message every [`PROFILE_LOG_INTERVAL`] ticks when the `perf_stats`
/// feature is enabled.
///
/// Without the feature only the tick is borrowed; the message arguments are
/// never evaluated.
///
/// # Example
/// ```ignore
/// profile_log!(tick, "mean divergence {}", mean_divergence(&lattice));
/// ```
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {
        if $tick.0 % $crate::PROFILE_LOG_INTERVAL == 0 {
            bevy::prelude::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {
        let _ = &$tick;
    };
}
