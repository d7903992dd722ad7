use crate::config::Config;
use anyhow::Context;

pub mod flag_client;
pub mod flag_store;
pub mod question_generator;
pub mod quiz_session;
pub mod sampler;

use flag_store::{FlagCdnResolver, FlagStore};

pub struct AppState {
    pub config: Config,
    pub store: FlagStore,
}

impl AppState {
    /// Loads the dataset named by `config`. The server must not start when
    /// this fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let resolver = FlagCdnResolver::new(config.image_base_url.clone());
        let store = FlagStore::load(&config.flags_path, &resolver)
            .context("Failed to load flags dataset")?;

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: FlagStore) -> Self {
        Self { config, store }
    }
}
