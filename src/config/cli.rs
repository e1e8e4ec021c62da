use crate::config::AppConfig;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "quickpoll")]
#[command(about = "Polling backend demo over an in-memory single-table store")]
pub struct CliConfig {
    #[arg(long, default_value = "100")]
    pub page_size: usize,

    #[arg(long, default_value = "3")]
    pub batch_retry_limit: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl From<CliConfig> for AppConfig {
    fn from(cli: CliConfig) -> Self {
        Self {
            page_size: cli.page_size,
            batch_retry_limit: cli.batch_retry_limit,
            verbose: cli.verbose,
        }
    }
}
