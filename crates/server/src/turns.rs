//! Pipeline API endpoints
//!
//! Standalone operations (detect, classify, translate, transcribe, speak)
//! plus the conversation-turn handler that chains them against a session.
//!
//! Turn flow:
//! 1. Receive audio (base64) or typed text
//! 2. Transcribe when audio
//! 3. Detect the utterance language
//! 4. Resolve the translation target via the session's turn policy
//! 5. Classify style and translate
//! 6. Synthesize reply audio
//! 7. Append the turn to the session log and return per-phase timings

use axum::extract::{Json, Path, State};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use translate_agent_core::language::Language;
use translate_agent_core::outcome::{AudioFormat, Provenance};
use translate_agent_core::style::StyleLabels;

use crate::metrics::{
    record_llm_latency, record_request, record_stt_latency, record_total_latency,
    record_tts_latency,
};
use crate::state::AppState;
use crate::ServerError;

/// Request for language detection
#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    /// Text to inspect
    pub text: String,
}

/// Response with the detected language
#[derive(Debug, Serialize)]
pub struct DetectResponse {
    /// Detected language code
    pub language: Language,
}

/// Detect the language of a text
pub async fn detect_language(
    State(state): State<AppState>,
    Json(request): Json<DetectRequest>,
) -> Json<DetectResponse> {
    record_request("detect");
    let language = state.detector.detect(&request.text);
    Json(DetectResponse { language })
}

/// Request for style classification
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    /// Text to classify
    pub text: String,
    /// Language of the text; detected when absent
    pub language: Option<Language>,
}

/// Response with style labels
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    #[serde(flatten)]
    pub labels: StyleLabels,
    /// Whether the labels came from the model or the keyword fallback
    pub provenance: Provenance,
}

/// Classify formality, context, and tone
pub async fn classify_context(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Json<ClassifyResponse> {
    record_request("classify");

    let language = request
        .language
        .unwrap_or_else(|| state.detector.detect(&request.text));
    let analysis = state.classifier.classify(&request.text, language).await;

    Json(ClassifyResponse {
        labels: analysis.labels,
        provenance: analysis.provenance,
    })
}

/// Request for translation
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    /// Text to translate
    pub text: String,
    /// Source language; detected when absent
    pub source: Option<Language>,
    /// Destination language
    pub target: Language,
}

/// Response with the translation
#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    /// Translated text (or a degraded placeholder)
    pub text: String,
    /// Effective source after auto-resolution
    pub source: Language,
    /// Destination language
    pub target: Language,
    /// How the text was produced
    pub provenance: Provenance,
}

/// Translate a text
pub async fn translate_text(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Json<TranslateResponse> {
    record_request("translate");

    let start = std::time::Instant::now();
    let translation = state
        .translator
        .translate(&request.text, request.source, request.target)
        .await;
    record_llm_latency(start.elapsed().as_secs_f64());

    Json(TranslateResponse {
        text: translation.text,
        source: translation.src,
        target: translation.dst,
        provenance: translation.provenance,
    })
}

/// Request for transcription
#[derive(Debug, Deserialize)]
pub struct TranscribeRequest {
    /// Base64 encoded audio data
    pub audio: String,
    /// Optional language hint; forwarded only for supported hint languages
    pub language_hint: Option<Language>,
}

/// Response with the transcript
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    /// Trimmed transcript text
    pub text: String,
}

/// Transcribe recorded audio
pub async fn transcribe_audio(
    State(state): State<AppState>,
    Json(request): Json<TranscribeRequest>,
) -> Result<Json<TranscribeResponse>, ServerError> {
    record_request("transcribe");

    let audio_bytes = BASE64
        .decode(&request.audio)
        .map_err(|e| ServerError::InvalidRequest(format!("Invalid base64 audio: {}", e)))?;

    let start = std::time::Instant::now();
    let text = match state.stt.transcribe(&audio_bytes, request.language_hint).await {
        Ok(text) => text,
        Err(e) => {
            crate::metrics::record_error("transcribe");
            return Err(e.into());
        },
    };
    record_stt_latency(start.elapsed().as_secs_f64());

    Ok(Json(TranscribeResponse { text }))
}

/// Request for speech synthesis
#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    /// Text to synthesize
    pub text: String,
    /// Voice identifier; backend default when absent
    pub voice: Option<String>,
    /// Output format; mp3 when absent
    pub format: Option<AudioFormat>,
}

/// Response with synthesized audio
#[derive(Debug, Serialize)]
pub struct SpeakResponse {
    /// Base64 encoded audio bytes (empty when degraded)
    pub audio: String,
    /// MIME type of the audio
    pub mime: String,
    /// How the audio was produced
    pub provenance: Provenance,
}

/// Synthesize speech from text
pub async fn speak_text(
    State(state): State<AppState>,
    Json(request): Json<SpeakRequest>,
) -> Json<SpeakResponse> {
    record_request("speak");

    let voice = request
        .voice
        .unwrap_or_else(|| state.tts.default_voice().to_string());
    let format = request.format.unwrap_or_default();

    let start = std::time::Instant::now();
    let audio = state.tts.synthesize(&request.text, &voice, format).await;
    record_tts_latency(start.elapsed().as_secs_f64());

    Json(SpeakResponse {
        audio: BASE64.encode(&audio.bytes),
        mime: audio.mime.to_string(),
        provenance: audio.provenance,
    })
}

/// Request for one conversation turn
///
/// Exactly one of `audio` and `text` must be present; audio wins when both
/// are sent.
#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    /// Base64 encoded recorded audio
    pub audio: Option<String>,
    /// Typed utterance, used when no audio is sent
    pub text: Option<String>,
    /// Voice for the reply audio; backend default when absent
    pub voice: Option<String>,
    /// Reply audio format; mp3 when absent
    pub format: Option<AudioFormat>,
}

/// Response for one conversation turn
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    /// Speaker assigned by turn parity
    pub speaker: String,
    /// What was said, transcribed or typed
    pub transcript: String,
    /// The translation
    pub translation: String,
    /// Detected utterance language
    pub source: Language,
    /// Target resolved by the turn policy
    pub target: Language,
    /// How the translation was produced
    pub provenance: Provenance,
    /// Base64 encoded reply audio, absent when synthesis degraded to empty
    pub audio: Option<String>,
    /// MIME type of the reply audio
    pub mime: String,
    /// Per-phase timings
    pub timings: TurnTimings,
}

/// Per-phase timing breakdown for a turn
#[derive(Debug, Serialize, Default)]
pub struct TurnTimings {
    pub stt_ms: u64,
    pub llm_ms: u64,
    pub tts_ms: u64,
    pub total_ms: u64,
}

/// Process one conversation turn against a session
pub async fn process_turn(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, ServerError> {
    record_request("turns");

    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| ServerError::Session(format!("Unknown session: {}", id)))?;
    session.touch();

    let start = std::time::Instant::now();
    let mut timings = TurnTimings::default();

    // 1. Obtain the utterance, transcribing when audio was sent. The
    //    recognizer sees no hint here; the turn policy needs the detector's
    //    own verdict on the transcript.
    let transcript = if let Some(audio) = &request.audio {
        let audio_bytes = BASE64
            .decode(audio)
            .map_err(|e| ServerError::InvalidRequest(format!("Invalid base64 audio: {}", e)))?;

        let stt_start = std::time::Instant::now();
        let text = match state.stt.transcribe(&audio_bytes, None).await {
            Ok(text) => text,
            Err(e) => {
                crate::metrics::record_error("turns");
                return Err(e.into());
            },
        };
        timings.stt_ms = stt_start.elapsed().as_millis() as u64;
        record_stt_latency(stt_start.elapsed().as_secs_f64());
        text
    } else if let Some(text) = &request.text {
        text.clone()
    } else {
        return Err(ServerError::InvalidRequest(
            "Either audio or text is required".to_string(),
        ));
    };

    // 2. Detect the language and resolve the direction for this turn
    let detected = state.detector.detect(&transcript);
    let turn_pair = session.pair().resolve_turn(detected);

    tracing::info!(
        session_id = %session.id,
        detected = %detected,
        target = %turn_pair.dst,
        "Processing turn"
    );

    // 3. Translate (classification happens inside the translator)
    let llm_start = std::time::Instant::now();
    let translation = state
        .translator
        .translate(&transcript, Some(detected), turn_pair.dst)
        .await;
    timings.llm_ms = llm_start.elapsed().as_millis() as u64;
    record_llm_latency(llm_start.elapsed().as_secs_f64());

    // 4. Synthesize the reply
    let voice = request
        .voice
        .clone()
        .unwrap_or_else(|| state.tts.default_voice().to_string());
    let format = request.format.unwrap_or_default();

    let tts_start = std::time::Instant::now();
    let audio = state.tts.synthesize(&translation.text, &voice, format).await;
    timings.tts_ms = tts_start.elapsed().as_millis() as u64;
    record_tts_latency(tts_start.elapsed().as_secs_f64());

    // 5. Record the turn
    let turn = session.push_turn(
        transcript,
        translation.text.clone(),
        detected,
        turn_pair.dst,
    );

    timings.total_ms = start.elapsed().as_millis() as u64;
    record_total_latency(start.elapsed().as_secs_f64());

    Ok(Json(TurnResponse {
        speaker: turn.speaker.as_str().to_string(),
        transcript: turn.transcript,
        translation: turn.translation,
        source: detected,
        target: turn_pair.dst,
        provenance: translation.provenance,
        audio: if audio.is_empty() {
            None
        } else {
            Some(BASE64.encode(&audio.bytes))
        },
        mime: audio.mime.to_string(),
        timings,
    }))
}
