use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;

use crate::config::Credentials;
use crate::error::{AuthenticationError, GenerationError};
use crate::generate::{ChatMessage, CompletionClient, CompletionRequest, Role};

/// [`CompletionClient`] backed by the OpenAI chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiCompletions {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompletions {
    pub fn new(credentials: &Credentials) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(credentials.api_key());
        if let Some(api_base) = &credentials.api_base {
            config = config.with_api_base(api_base);
        }
        // A rate-limited request fails immediately instead of being retried.
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        Self {
            client: Client::with_config(config).with_backoff(no_retry),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletions {
    async fn complete(&self, request: CompletionRequest) -> Result<Vec<String>, GenerationError> {
        let messages = request
            .messages
            .iter()
            .map(message)
            .collect::<Result<Vec<_>, _>>()
            .map_err(generation_error)?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(request.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .n(request.n)
            .build()
            .map_err(generation_error)?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(generation_error)?;

        log::trace!("Completion usage: {:?}", response.usage);

        response
            .choices
            .into_iter()
            .map(|choice| {
                let index = choice.index;
                choice.message.content.ok_or_else(|| {
                    GenerationError::MalformedResponse(format!("candidate {} has no text", index))
                })
            })
            .collect()
    }
}

fn message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage, OpenAIError> {
    Ok(match message.role {
        Role::System => ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(message.content.as_str())
                .build()?,
        ),
        Role::User => ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(message.content.as_str())
                .build()?,
        ),
    })
}

fn generation_error(err: OpenAIError) -> GenerationError {
    match err {
        OpenAIError::ApiError(api_error) if is_rejected_key(&api_error) => {
            AuthenticationError::Rejected(api_error.message).into()
        }
        OpenAIError::JSONDeserialize(e) => GenerationError::MalformedResponse(e.to_string()),
        err => GenerationError::Request(err.into()),
    }
}

fn is_rejected_key(api_error: &ApiError) -> bool {
    let code = serde_json::to_value(&api_error.code).unwrap_or_default();
    matches!(
        code.as_str(),
        Some("invalid_api_key") | Some("invalid_organization")
    )
}
