use std::path::PathBuf;

mod handlers;
mod worker;

pub use worker::worker_task;

// Re-export types from library crates
pub use booklet_core::{BookletOptions, BookletStatistics};

/// Commands sent from the front end to the worker
#[derive(Debug)]
pub enum BookletCommand {
    /// Run the whole job: load, impose, save to `options.output_path()`
    Generate { options: BookletOptions },
    /// Report statistics for `options` without imposing
    CalculateStats { options: BookletOptions },
    /// Read options from a JSON file
    LoadConfig { path: PathBuf },
}

/// Updates sent from the worker back to the front end
#[derive(Debug, Clone)]
pub enum BookletUpdate {
    Progress {
        operation: String,
        current: usize,
        total: usize,
    },
    Status {
        message: String,
    },
    StatsCalculated {
        stats: BookletStatistics,
    },
    ConfigLoaded {
        options: BookletOptions,
    },
    Complete {
        path: PathBuf,
        stats: BookletStatistics,
    },
    Error {
        message: String,
    },
}

impl BookletUpdate {
    /// Whether this is the last update a command produces. `Progress` and
    /// `Status` may precede it.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::StatsCalculated { .. }
                | Self::ConfigLoaded { .. }
                | Self::Complete { .. }
                | Self::Error { .. }
        )
    }
}
