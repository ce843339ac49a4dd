use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::choices::{Audience, Genre, Language, Model, PointOfView, Tone};

pub const TARGET_WORDS_RANGE: RangeInclusive<u32> = 200..=4000;
pub const TARGET_WORDS_STEP: u32 = 50;
pub const DEFAULT_TARGET_WORDS: u32 = 900;

pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const TEMPERATURE_STEP: f32 = 0.1;
pub const DEFAULT_TEMPERATURE: f32 = 0.9;

/// Everything the user chose on the story form for a single submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryRequest {
    pub premise: String,
    pub genre: Genre,
    pub tone: Tone,
    pub pov: PointOfView,
    pub audience: Audience,
    pub language: Language,
    pub include_title: bool,
    pub include_dialogue: bool,
    pub themes: String,
    pub characters: String,
    pub setting: String,
    pub target_words: u32,
}

impl Default for StoryRequest {
    fn default() -> Self {
        Self {
            premise: String::new(),
            genre: Genre::default(),
            tone: Tone::default(),
            pov: PointOfView::default(),
            audience: Audience::default(),
            language: Language::default(),
            include_title: true,
            include_dialogue: true,
            themes: String::new(),
            characters: String::new(),
            setting: String::new(),
            target_words: DEFAULT_TARGET_WORDS,
        }
    }
}

/// Model-side knobs chosen alongside the story request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub model: Model,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Input rejected at the presentation boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("target length must be between 200 and 4000 words, got {0}")]
    TargetWords(u32),
    #[error("temperature must be between 0.0 and 2.0, got {0}")]
    Temperature(f32),
    #[error("{0:?} is not a number")]
    NotANumber(String),
}

pub fn check_target_words(words: u32) -> Result<u32, InputError> {
    if TARGET_WORDS_RANGE.contains(&words) {
        Ok(words)
    } else {
        Err(InputError::TargetWords(words))
    }
}

pub fn check_temperature(temperature: f32) -> Result<f32, InputError> {
    if TEMPERATURE_RANGE.contains(&temperature) {
        Ok(temperature)
    } else {
        Err(InputError::Temperature(temperature))
    }
}

/// clap value parser for `--target-words`.
pub fn parse_target_words(s: &str) -> Result<u32, InputError> {
    let words = s
        .trim()
        .parse::<u32>()
        .map_err(|_| InputError::NotANumber(s.to_owned()))?;
    check_target_words(words)
}

/// clap value parser for `--temperature`.
pub fn parse_temperature(s: &str) -> Result<f32, InputError> {
    let temperature = s
        .trim()
        .parse::<f32>()
        .map_err(|_| InputError::NotANumber(s.to_owned()))?;
    check_temperature(temperature)
}
