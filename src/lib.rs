pub mod cli;
pub mod core;
pub mod engine;
pub mod factories;
pub mod services;

pub use crate::core::{
    ProgressActions, ProgressConfig, ProgressError, ProgressMode, ProgressOptions,
    ProgressReporter, ProgressResult, ProgressState,
};
pub use crate::engine::{create_default_tracker, create_quiet_tracker, ProgressTracker};
pub use crate::services::{ConsoleProgressReporter, DefaultProgressConfig, NoOpProgressReporter};
