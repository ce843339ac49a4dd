use async_trait::async_trait;

use crate::choices::Model;
use crate::error::GenerationError;

const ASSISTANT_PREAMBLE: &str = "You are a helpful assistant.";
const WRITER_PREAMBLE: &str = "You are an award-winning fiction writer who crafts vivid, emotionally resonant stories while strictly following the user's specifications.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One chat-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u16,
    pub n: u8,
}

/// A chat-completion backend. Returns the text of every candidate in order.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Vec<String>, GenerationError>;
}

/// Asks the model for a single story and returns its text untouched.
pub async fn generate_story(
    client: &dyn CompletionClient,
    model: Model,
    prompt: &str,
    temperature: f32,
    max_tokens: u16,
) -> Result<String, GenerationError> {
    let request = CompletionRequest {
        model: model.as_str().to_string(),
        messages: vec![
            ChatMessage::system(ASSISTANT_PREAMBLE),
            ChatMessage::system(WRITER_PREAMBLE),
            ChatMessage::user(prompt),
        ],
        temperature,
        max_tokens,
        n: 1,
    };

    log::info!("Prompt: {:?}", prompt);
    let start_time = std::time::Instant::now();

    let story = client
        .complete(request)
        .await?
        .into_iter()
        .next()
        .ok_or(GenerationError::NoCandidates)?;

    log::info!(
        "Response ({} characters, {}ms)",
        story.len(),
        start_time.elapsed().as_millis()
    );
    Ok(story)
}
