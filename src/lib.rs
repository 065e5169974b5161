pub mod api;
pub mod cli;
pub mod config;
pub mod crm;
pub mod dashboard;
pub mod db;

use config::Config;
use db::MemStorage;
use parking_lot::RwLock;

pub struct AppState {
    pub config: Config,
    /// Engagement store; locks are held only for the synchronous store call
    pub storage: RwLock<MemStorage>,
}

impl AppState {
    pub fn new(config: Config, storage: MemStorage) -> Self {
        Self {
            config,
            storage: RwLock::new(storage),
        }
    }

    /// Build the engagement store the configuration asks for
    pub fn from_config(config: Config) -> Self {
        let storage = if config.storage.seed_fixtures {
            MemStorage::with_fixtures()
        } else {
            MemStorage::new()
        };
        Self::new(config, storage)
    }
}
