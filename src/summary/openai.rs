use crate::config::OpenAiConfig;
use crate::error::{Result, ScribeError};
use crate::note::MeetingNote;
use crate::summary::format_duration;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

const SYSTEM_PROMPT: &str = "You are a meeting assistant. Given the raw transcript of a \
meeting, produce two Markdown sections and nothing else:\n\
## Key Points\nA short bullet list of the main points discussed.\n\
## Action Items\nA checkbox list (- [ ]) of concrete follow-ups with owners where mentioned.";

// OpenAI chat-completions wire types
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

/// One summarization request per session, over the concatenated transcript.
/// Any failure here is non-fatal to the session: the caller omits the AI
/// section and logs a warning.
pub struct OpenAiService {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiService {
    /// Returns `None` when no API key is configured (summarization is
    /// simply disabled).
    pub fn from_config(config: &OpenAiConfig) -> Option<Self> {
        if config.api_key.is_empty() {
            return None;
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Some(Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Generate the Key Points / Action Items section for a finished note.
    pub async fn generate_summary(&self, meeting: &MeetingNote) -> Result<String> {
        info!("Requesting meeting summary from {}", self.model);

        let context = format!(
            "Meeting: {}\nDate: {}\nDuration: {}\nParticipants: {}\n\nTranscript:\n{}",
            meeting.title,
            meeting.start_time.format("%Y-%m-%d %H:%M"),
            meeting
                .duration()
                .map(format_duration)
                .unwrap_or_else(|| "unknown".to_string()),
            meeting.participants.join(", "),
            meeting.raw_text()
        );

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: context,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ScribeError::ExternalService(format!("completion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScribeError::ExternalService(format!(
                "completion API returned {}",
                status
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ScribeError::ExternalService(format!("invalid completion response: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                ScribeError::ExternalService("empty completion response".to_string())
            })?;

        info!("Summary generated ({} characters)", content.len());
        Ok(content)
    }
}
