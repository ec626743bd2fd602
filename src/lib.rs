pub mod cli;
pub mod core;
pub mod providers;

use crate::core::{ConversionProvider, Currency, config::AppConfig};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    /// One conversion; currencies fall back to the configured defaults.
    Convert {
        amount: String,
        from: Option<Currency>,
        to: Option<Currency>,
    },
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider: Arc<dyn ConversionProvider> = Arc::new(
        providers::frankfurter::FrankfurterProvider::new(config.frankfurter_base_url()),
    );

    match command {
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(
                provider,
                &amount,
                from.unwrap_or(config.from),
                to.unwrap_or(config.to),
            )
            .await
        }
        AppCommand::Interactive => cli::interactive::run(provider, config.from, config.to).await,
    }
}
