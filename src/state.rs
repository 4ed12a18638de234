use std::sync::Arc;

use crate::asr::{ASRFactory, ASRInterface};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub asr: Arc<dyn ASRInterface>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let asr = ASRFactory::create_asr(&config.asr_config);
        Self { config, asr }
    }

    /// Build state around an existing ASR backend
    pub fn with_asr(config: Config, asr: Arc<dyn ASRInterface>) -> Self {
        Self { config, asr }
    }
}
