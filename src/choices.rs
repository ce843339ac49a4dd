//! Closed option sets offered by the story form.
//!
//! The display label of each variant is what appears in the prompt and what the
//! form submits over the wire.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! choices {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choices! {
    pub enum Genre {
        Fantasy => "Fantasy",
        ScienceFiction => "Science Fiction",
        MysteryThriller => "Mystery/Thriller",
        Horror => "Horror",
        Romance => "Romance",
        HistoricalFiction => "Historical Fiction",
        LiteraryFiction => "Literary Fiction",
        Adventure => "Adventure",
        YoungAdult => "Young Adult",
        Childrens => "Children's",
    }
    default = Fantasy;
}

choices! {
    pub enum Tone {
        Whimsical => "Whimsical",
        Dark => "Dark",
        Uplifting => "Uplifting",
        Melancholic => "Melancholic",
        Hopeful => "Hopeful",
        Suspenseful => "Suspenseful",
        Humorous => "Humorous",
        Epic => "Epic",
        Cozy => "Cozy",
    }
    default = Hopeful;
}

choices! {
    /// Narrative point of view.
    pub enum PointOfView {
        FirstPerson => "First person",
        SecondPerson => "Second person",
        ThirdPersonLimited => "Third person limited",
        ThirdPersonOmniscient => "Third person omniscient",
    }
    default = ThirdPersonLimited;
}

choices! {
    pub enum Audience {
        Children => "Children",
        YoungAdult => "Young Adult",
        General => "General",
        Adult => "Adult",
    }
    default = General;
}

choices! {
    /// Language the story is written in.
    pub enum Language {
        English => "English",
        Spanish => "Spanish",
        French => "French",
        German => "German",
        Italian => "Italian",
        Portuguese => "Portuguese",
        Hindi => "Hindi",
        Japanese => "Japanese",
        Korean => "Korean",
        Chinese => "Chinese",
    }
    default = English;
}

/// Chat models the form offers. Every model receives the same parameter shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum Model {
    #[default]
    #[serde(rename = "gpt-4")]
    #[value(name = "gpt-4")]
    Gpt4,
    #[serde(rename = "gpt-3.5-turbo")]
    #[value(name = "gpt-3.5-turbo")]
    Gpt35Turbo,
}

impl Model {
    pub const ALL: &'static [Model] = &[Model::Gpt4, Model::Gpt35Turbo];

    pub fn as_str(self) -> &'static str {
        match self {
            Model::Gpt4 => "gpt-4",
            Model::Gpt35Turbo => "gpt-3.5-turbo",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_form() {
        assert_eq!(Genre::default(), Genre::Fantasy);
        assert_eq!(Tone::default(), Tone::Hopeful);
        assert_eq!(PointOfView::default(), PointOfView::ThirdPersonLimited);
        assert_eq!(Audience::default(), Audience::General);
        assert_eq!(Language::default(), Language::English);
        assert_eq!(Model::default(), Model::Gpt4);
    }

    #[test]
    fn labels_are_wire_names() {
        assert_eq!(
            serde_json::to_string(&Genre::MysteryThriller).unwrap(),
            "\"Mystery/Thriller\""
        );
        let tone: Tone = serde_json::from_str("\"Melancholic\"").unwrap();
        assert_eq!(tone, Tone::Melancholic);
        let model: Model = serde_json::from_str("\"gpt-3.5-turbo\"").unwrap();
        assert_eq!(model, Model::Gpt35Turbo);
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!(serde_json::from_str::<Genre>("\"Western\"").is_err());
    }

    #[test]
    fn option_counts() {
        assert_eq!(Genre::ALL.len(), 10);
        assert_eq!(Tone::ALL.len(), 9);
        assert_eq!(PointOfView::ALL.len(), 4);
        assert_eq!(Audience::ALL.len(), 4);
        assert_eq!(Language::ALL.len(), 10);
        assert_eq!(Genre::Childrens.to_string(), "Children's");
    }

    #[test]
    fn model_cli_names() {
        assert_eq!(Model::from_str("gpt-4", false), Ok(Model::Gpt4));
        assert_eq!(
            PointOfView::from_str("third-person-limited", false),
            Ok(PointOfView::ThirdPersonLimited)
        );
    }
}
