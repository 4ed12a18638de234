use async_trait::async_trait;

/// One transcription call against the hosted speech-to-text API
#[derive(Debug, Clone)]
pub struct ASRRequest {
    pub audio_data: Vec<u8>,
    pub file_name: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct ASRResponse {
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ASRError {
    #[error("no API key configured for the transcription backend")]
    MissingApiKey,
    #[error("request to transcription backend failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("transcription backend returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("unexpected response from transcription backend: {0}")]
    InvalidResponse(String),
}

/// ASR interface trait - transcription is delegated to an external service
#[async_trait]
pub trait ASRInterface: Send + Sync {
    async fn transcribe(&self, request: ASRRequest) -> Result<ASRResponse, ASRError>;
}
