pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::preferences::PreferenceStore;
use crate::core::rate_store::RateStore;
use crate::core::session::Session;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

const PREFERENCES_COLLECTION: &str = "preferences";

pub enum AppCommand {
    Convert {
        amount: Option<String>,
        from: Option<String>,
        to: Option<String>,
    },
    Rates,
    Watch,
}

fn open_preferences(config: &AppConfig) -> Result<PreferenceStore> {
    let store = store::KeyValueStore::open(&config.default_data_path()?);
    Ok(PreferenceStore::new(store.collection(PREFERENCES_COLLECTION)?))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("pullarim starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = Arc::new(providers::CbuProvider::from_config(&config));
    let rate_store = Arc::new(RateStore::new(provider, &config.base_currency));

    match command {
        AppCommand::Convert { amount, from, to } => {
            let session = Session::new(rate_store, open_preferences(&config)?, &config);
            cli::convert::run(session, amount, from, to).await
        }
        AppCommand::Rates => cli::rates::run(&rate_store).await,
        AppCommand::Watch => {
            let session = Session::new(rate_store, open_preferences(&config)?, &config);
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            cli::watch::run(&config, session, input).await
        }
    }
}
