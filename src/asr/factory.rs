use std::sync::Arc;
use tracing::{info, warn};

use crate::config::GroqWhisperConfig;
use super::groq_whisper::GroqWhisperASR;
use super::interface::ASRInterface;

/// Factory for creating ASR clients
pub struct ASRFactory;

impl ASRFactory {
    pub fn create_asr(asr_config: &GroqWhisperConfig) -> Arc<dyn ASRInterface> {
        info!(
            "Initializing Groq Whisper ASR: model={}, base_url={}",
            asr_config.model, asr_config.base_url
        );
        if asr_config.api_key.trim().is_empty() {
            warn!("GROQ_API_KEY is not set; transcription requests will fail");
        }

        Arc::new(GroqWhisperASR::new(
            asr_config.base_url.clone(),
            asr_config.api_key.clone(),
        ))
    }
}
