use clap::Parser;
use performance_engine::cli::{self, Cli};
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    cli.init_logging()?;

    info!("Player scoring consistency metrics calculator");

    match cli::run(&cli) {
        Ok(output) => {
            info!(
                "Performance metrics complete: {} player-seasons, {} position summaries",
                output.metrics.len(),
                output.summaries.len()
            );
            Ok(())
        }
        Err(e) => {
            error!("Performance metrics failed: {:#}", e);
            Err(e)
        }
    }
}
