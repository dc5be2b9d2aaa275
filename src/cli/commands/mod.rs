// CLIコマンドの実装

pub mod modes;
pub mod run;

pub use modes::execute_modes;
pub use run::{execute_run, RunConfig, RunSummary, SimulatedActions};
