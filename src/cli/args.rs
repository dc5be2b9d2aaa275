use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "progress_action")]
#[command(about = "Track the progress of batched, sequential or simultaneous async actions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a simulated workload and print its progress
    Run {
        /// Number of items to process
        #[arg(short = 'n', long, default_value = "20")]
        items: usize,

        /// Execution mode: sequential, simultaneous or batch
        #[arg(short, long, default_value = "sequential")]
        mode: String,

        /// Chunk size for batch mode
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Dispatch items in random order
        #[arg(short, long)]
        shuffle: bool,

        /// Make every N-th item fail
        #[arg(short, long)]
        fail_every: Option<usize>,

        /// Simulated duration of one action in milliseconds
        #[arg(short, long, default_value = "20")]
        delay_ms: u64,

        /// Delay between reaching 100% and the finish hook
        #[arg(long, default_value = "300")]
        finish_delay_ms: u64,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,

        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the accepted execution mode names
    Modes,
}
