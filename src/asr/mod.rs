pub mod interface;
pub mod groq_whisper;
pub mod factory;

pub use interface::{ASRError, ASRInterface, ASRRequest, ASRResponse};
pub use groq_whisper::GroqWhisperASR;
pub use factory::ASRFactory;
