//! Story generation from structured preferences.
//!
//! A [`StoryRequest`] is rendered into a prompt by [`build_prompt`], sized with
//! [`estimate_max_tokens`] and sent through a [`CompletionClient`] by
//! [`generate_story`].

pub mod budget;
pub mod choices;
pub mod config;
pub mod error;
pub mod export;
pub mod generate;
pub mod openai;
pub mod prompt;
pub mod request;
pub mod web;

pub use budget::estimate_max_tokens;
pub use choices::{Audience, Genre, Language, Model, PointOfView, Tone};
pub use config::{Config, Credentials};
pub use error::{AuthenticationError, GenerationError};
pub use generate::{generate_story, ChatMessage, CompletionClient, CompletionRequest, Role};
pub use openai::OpenAiCompletions;
pub use prompt::build_prompt;
pub use request::{GenerationSettings, StoryRequest};
