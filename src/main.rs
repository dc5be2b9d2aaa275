use anyhow::Result;
use clap::Parser;

use progress_action::cli::{execute_modes, execute_run, Cli, Commands, RunConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            items,
            mode,
            batch_size,
            shuffle,
            fail_every,
            delay_ms,
            finish_delay_ms,
            quiet,
            json,
        } => {
            let config = RunConfig {
                items,
                mode,
                batch_size,
                shuffle,
                fail_every,
                delay_ms,
                finish_delay_ms,
                quiet,
                json,
            };

            if let Err(error) = execute_run(config).await {
                eprintln!("❌ エラー: {error}");
                std::process::exit(1);
            }
        }
        Commands::Modes => execute_modes(),
    }

    Ok(())
}
