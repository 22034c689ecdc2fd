use crate::config::{AzureConfig, TranscriptionConfig};
use crate::error::{Result, ScribeError};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Azure short-audio recognition response (simple format).
#[derive(Debug, Deserialize)]
struct RecognitionResponse {
    #[serde(rename = "RecognitionStatus")]
    status: String,
    #[serde(rename = "DisplayText", default)]
    display_text: String,
}

/// Thin client for the Azure Speech-to-Text REST endpoint. One POST per
/// audio chunk; the recognition protocol itself is vendor-owned.
pub struct AzureSpeechClient {
    client: reqwest::Client,
    endpoint: String,
    speech_key: String,
}

impl AzureSpeechClient {
    pub fn new(azure: &AzureConfig, transcription: &TranscriptionConfig) -> Self {
        let endpoint = format!(
            "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1?language={}&format={}",
            azure.speech_region, transcription.language, transcription.output_format
        );

        Self {
            client: build_client(),
            endpoint,
            speech_key: azure.speech_key.clone(),
        }
    }

    /// Client against an explicit recognition endpoint URL, bypassing the
    /// region-derived one.
    pub fn with_endpoint(endpoint: impl Into<String>, speech_key: impl Into<String>) -> Self {
        Self {
            client: build_client(),
            endpoint: endpoint.into(),
            speech_key: speech_key.into(),
        }
    }

    /// Drop the connection pool and start fresh. Used as the one reconnect
    /// attempt after a transport error.
    pub fn reconnect(&mut self) {
        self.client = build_client();
    }

    /// Recognize one WAV chunk. Returns `None` when the service heard no
    /// speech in the chunk.
    pub async fn recognize(&self, wav: Vec<u8>, sample_rate: u32) -> Result<Option<String>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.speech_key)
            .header(
                "Content-Type",
                format!(
                    "audio/wav; codecs=audio/pcm; samplerate={}",
                    sample_rate
                ),
            )
            .header("Accept", "application/json")
            .body(wav)
            .send()
            .await
            .map_err(|e| ScribeError::Transport(format!("speech request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScribeError::Transport(format!(
                "speech service returned {}",
                status
            )));
        }

        let body: RecognitionResponse = response
            .json()
            .await
            .map_err(|e| ScribeError::Transport(format!("invalid speech response: {}", e)))?;

        debug!("Recognition status: {}", body.status);

        match body.status.as_str() {
            "Success" if !body.display_text.is_empty() => Ok(Some(body.display_text)),
            _ => Ok(None),
        }
    }
}

fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
