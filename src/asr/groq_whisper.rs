use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use tracing::debug;

use super::interface::{ASRError, ASRInterface, ASRRequest, ASRResponse};

/// Groq's OpenAI-compatible Whisper endpoint
#[derive(Debug, Clone)]
pub struct GroqWhisperASR {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptionBody {
    text: String,
}

impl GroqWhisperASR {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn build_form(request: ASRRequest) -> multipart::Form {
        let file_part = multipart::Part::bytes(request.audio_data).file_name(request.file_name);

        multipart::Form::new()
            .part("file", file_part)
            .text("model", request.model)
            .text("temperature", request.temperature.to_string())
            .text("response_format", "json")
    }
}

#[async_trait]
impl ASRInterface for GroqWhisperASR {
    async fn transcribe(&self, request: ASRRequest) -> Result<ASRResponse, ASRError> {
        if self.api_key.trim().is_empty() {
            return Err(ASRError::MissingApiKey);
        }

        let url = format!("{}/audio/transcriptions", self.base_url);
        debug!(
            model = %request.model,
            bytes = request.audio_data.len(),
            file_name = %request.file_name,
            "Sending audio to Groq Whisper"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(Self::build_form(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ASRError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: TranscriptionBody = serde_json::from_str(&body)
            .map_err(|e| ASRError::InvalidResponse(e.to_string()))?;

        debug!(chars = parsed.text.len(), "Groq Whisper transcription completed");
        Ok(ASRResponse { text: parsed.text })
    }
}
