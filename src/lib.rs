//! twig - a small content-addressed version control engine
//!
//! The crate is split into three layers:
//!
//! - `areas`: persistent repository areas (object database, staging index, refs,
//!   remotes and the working directory), aggregated by [`areas::repository::Repository`]
//! - `artifacts`: object types and the algorithms working on them (ancestry,
//!   split point search, three-way merge, object transfer)
//! - `commands`: user commands implemented as `impl Repository` blocks

/// Debug logging for the split point search and merge resolution.
///
/// Compiled in only with the `debug_merge` feature flag.
macro_rules! debug_merge_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

/// Debug logging for object transfer between repositories.
///
/// Compiled in only with the `debug_sync` feature flag.
macro_rules! debug_sync_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_sync")]
        {
            eprintln!($($arg)*);
        }
    };
}

pub mod areas;
pub mod artifacts;
pub mod commands;
