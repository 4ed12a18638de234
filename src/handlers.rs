use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::asr::{ASRError, ASRInterface, ASRRequest};
use crate::state::AppState;

/// Name given to the upstream file part when the client supplies none
pub const DEFAULT_FILE_NAME: &str = "audio.wav";

/// Decoding is always deterministic
pub const TRANSCRIPTION_TEMPERATURE: f32 = 0.0;

/// Audio received from a client, either as the raw body or a multipart `file` field
#[derive(Debug, Clone, Default)]
pub struct AudioPayload {
    pub audio_data: Vec<u8>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptionResponse {
    pub text: String,
    pub processing_time: f64,
    pub model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("empty audio payload")]
    EmptyPayload,
    #[error("multipart request has no `file` field")]
    MissingFile,
    #[error("unreadable request body: {detail}")]
    InvalidBody { status: StatusCode, detail: String },
    #[error("upstream transcription failed: {0}")]
    Upstream(ASRError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::EmptyPayload | RelayError::MissingFile => StatusCode::BAD_REQUEST,
            RelayError::InvalidBody { status, .. } => *status,
            RelayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message returned to the client. Upstream detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::EmptyPayload => "No audio data provided",
            RelayError::MissingFile => "No audio file provided",
            RelayError::InvalidBody { .. } => "Invalid request body",
            RelayError::Upstream(_) => "Transcription failed",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Pull the audio out of a request. Multipart bodies must carry a `file`
/// field; anything else is treated as raw audio bytes.
pub async fn read_payload(request: Request) -> Result<AudioPayload, RelayError> {
    if is_multipart(&request) {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|rejection| RelayError::InvalidBody {
                status: rejection.status(),
                detail: rejection.body_text(),
            })?;

        while let Some(field) = multipart.next_field().await.map_err(|e| RelayError::InvalidBody {
            status: e.status(),
            detail: e.body_text(),
        })? {
            if field.name() != Some("file") {
                continue;
            }
            let file_name = field.file_name().map(|n| n.to_string());
            let data = field.bytes().await.map_err(|e| RelayError::InvalidBody {
                status: e.status(),
                detail: e.body_text(),
            })?;
            return Ok(AudioPayload {
                audio_data: data.to_vec(),
                file_name,
            });
        }

        Err(RelayError::MissingFile)
    } else {
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|rejection| RelayError::InvalidBody {
                status: rejection.status(),
                detail: rejection.body_text(),
            })?;
        Ok(AudioPayload {
            audio_data: body.to_vec(),
            file_name: None,
        })
    }
}

/// Forward one payload to the ASR backend and time the call
pub async fn relay(
    asr: &dyn ASRInterface,
    model: &str,
    payload: AudioPayload,
) -> Result<TranscriptionResponse, RelayError> {
    if payload.audio_data.is_empty() {
        return Err(RelayError::EmptyPayload);
    }

    let request = ASRRequest {
        audio_data: payload.audio_data,
        file_name: payload
            .file_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        model: model.to_string(),
        temperature: TRANSCRIPTION_TEMPERATURE,
    };

    let start_time = Instant::now();
    let response = asr.transcribe(request).await.map_err(|e| {
        error!(error = %e, "Error during transcription");
        RelayError::Upstream(e)
    })?;
    let processing_time = start_time.elapsed().as_secs_f64();

    info!(
        processing_time,
        chars = response.text.len(),
        "Transcription completed"
    );

    Ok(TranscriptionResponse {
        text: response.text,
        processing_time,
        model: model.to_string(),
    })
}

pub async fn transcribe_audio(State(state): State<AppState>, request: Request) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("transcribe", %request_id);

    async move {
        let result = match read_payload(request).await {
            Ok(payload) => {
                relay(state.asr.as_ref(), &state.config.asr_config.model, payload).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(body) => Json(body).into_response(),
            Err(e) => {
                if !matches!(e, RelayError::Upstream(_)) {
                    warn!(error = %e, "Rejected transcription request");
                }
                e.into_response()
            }
        }
    }
    .instrument(span)
    .await
}
