// Application state module
// Immutable per-process state shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::error::ServerError;
use crate::facts::{FactProvider, NumbersApi};

/// Application state
pub struct AppState {
    pub config: Config,
    pub facts: Arc<dyn FactProvider>,
}

impl AppState {
    /// Create `AppState` backed by the real numbers trivia service
    pub fn new(config: &Config) -> Result<Self, ServerError> {
        let facts = NumbersApi::new(&config.facts)?;
        Ok(Self::with_provider(config, Arc::new(facts)))
    }

    /// Create `AppState` with an explicit fact provider
    pub fn with_provider(config: &Config, facts: Arc<dyn FactProvider>) -> Self {
        Self {
            config: config.clone(),
            facts,
        }
    }
}
