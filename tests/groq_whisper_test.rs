use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use transcription_relay::asr::{ASRError, ASRInterface, ASRRequest, GroqWhisperASR};

#[derive(Debug, Default, Clone)]
struct CapturedUpload {
    authorization: Option<String>,
    fields: HashMap<String, Vec<u8>>,
    file_name: Option<String>,
}

type Captures = Arc<Mutex<Vec<CapturedUpload>>>;

async fn capture_upload(
    State((captures, status, body)): State<(Captures, u16, &'static str)>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut upload = CapturedUpload {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string()),
        ..Default::default()
    };

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            upload.file_name = field.file_name().map(|n| n.to_string());
        }
        let data = field.bytes().await.unwrap();
        upload.fields.insert(name, data.to_vec());
    }
    captures.lock().unwrap().push(upload);

    (StatusCode::from_u16(status).unwrap(), body).into_response()
}

async fn start_mock_groq_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, Captures, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let captures: Captures = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route("/openai/v1/audio/transcriptions", post(capture_upload))
        .with_state((captures.clone(), response_status, response_body));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}/openai/v1", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, captures, shutdown_tx)
}

fn request(audio: &[u8]) -> ASRRequest {
    ASRRequest {
        audio_data: audio.to_vec(),
        file_name: "audio.wav".to_string(),
        model: "whisper-large-v3".to_string(),
        temperature: 0.0,
    }
}

#[tokio::test]
async fn given_valid_audio_when_groq_transcribes_then_returns_text() {
    let (base_url, captures, shutdown_tx) =
        start_mock_groq_server(200, r#"{"text": " Hello from Groq.", "x_groq": {"id": "req_1"}}"#)
            .await;
    let asr = GroqWhisperASR::new(base_url, "gsk_test".to_string());

    let response = asr.transcribe(request(b"fake wav bytes")).await.unwrap();

    assert_eq!(response.text, " Hello from Groq.");

    let captures = captures.lock().unwrap();
    assert_eq!(captures.len(), 1);
    let upload = &captures[0];
    assert_eq!(upload.authorization.as_deref(), Some("Bearer gsk_test"));
    assert_eq!(upload.file_name.as_deref(), Some("audio.wav"));
    assert_eq!(upload.fields["file"], b"fake wav bytes");
    assert_eq!(upload.fields["model"], b"whisper-large-v3");
    assert_eq!(upload.fields["response_format"], b"json");

    let temperature: f32 = std::str::from_utf8(&upload.fields["temperature"])
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(temperature, 0.0);
    drop(captures);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_groq_returns_error_status_when_transcribing_then_returns_api_error() {
    let (base_url, _captures, shutdown_tx) =
        start_mock_groq_server(401, r#"{"error": {"message": "Invalid API Key"}}"#).await;
    let asr = GroqWhisperASR::new(base_url, "gsk_bad".to_string());

    let result = asr.transcribe(request(b"audio")).await;

    match result {
        Err(ASRError::Api { status, body }) => {
            assert_eq!(status, 401);
            assert!(body.contains("Invalid API Key"));
        }
        other => panic!("expected api error, got {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_groq_returns_body_without_text_then_returns_invalid_response() {
    let (base_url, _captures, shutdown_tx) =
        start_mock_groq_server(200, r#"{"segments": []}"#).await;
    let asr = GroqWhisperASR::new(base_url, "gsk_test".to_string());

    let result = asr.transcribe(request(b"audio")).await;

    assert!(matches!(result, Err(ASRError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unreachable_backend_then_returns_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let asr = GroqWhisperASR::new(format!("http://{}", addr), "gsk_test".to_string());
    let result = asr.transcribe(request(b"audio")).await;

    assert!(matches!(result, Err(ASRError::Request(_))));
}
