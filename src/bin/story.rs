use clap::Parser;
use std::path::PathBuf;

use storycrafter::export::write_story;
use storycrafter::request::{
    parse_target_words, parse_temperature, DEFAULT_TARGET_WORDS, DEFAULT_TEMPERATURE,
};
use storycrafter::{
    build_prompt, estimate_max_tokens, generate_story, Audience, Credentials, Genre, Language,
    Model, OpenAiCompletions, PointOfView, StoryRequest, Tone,
};

/// Write a story from the command line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Premise or prompt. Left blank, the model invents one.
    #[arg(short, long, default_value = "")]
    premise: String,

    #[arg(long, value_enum, default_value_t = Genre::default())]
    genre: Genre,

    #[arg(long, value_enum, default_value_t = Tone::default())]
    tone: Tone,

    /// Point of view.
    #[arg(long, value_enum, default_value_t = PointOfView::default())]
    pov: PointOfView,

    #[arg(long, value_enum, default_value_t = Audience::default())]
    audience: Audience,

    #[arg(long, value_enum, default_value_t = Language::default())]
    language: Language,

    /// Ask for a story without a title line.
    #[arg(long)]
    no_title: bool,

    /// Ask for narration with little dialogue.
    #[arg(long)]
    no_dialogue: bool,

    /// Themes and motifs to emphasize.
    #[arg(long, default_value = "")]
    themes: String,

    /// Characters (names, roles, traits).
    #[arg(long, default_value = "")]
    characters: String,

    /// Setting (time, place, atmosphere).
    #[arg(long, default_value = "")]
    setting: String,

    /// Approximate story length, 200 to 4000 words.
    #[arg(short = 'w', long, value_parser = parse_target_words, default_value_t = DEFAULT_TARGET_WORDS)]
    target_words: u32,

    #[arg(short, long, value_enum, default_value_t = Model::default())]
    model: Model,

    /// Creativity, 0.0 to 2.0.
    #[arg(short, long, value_parser = parse_temperature, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Also write the story to this file (or to story.txt inside this directory).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the prompt and token budget without calling the API.
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    fn story_request(&self) -> StoryRequest {
        StoryRequest {
            premise: self.premise.clone(),
            genre: self.genre,
            tone: self.tone,
            pov: self.pov,
            audience: self.audience,
            language: self.language,
            include_title: !self.no_title,
            include_dialogue: !self.no_dialogue,
            themes: self.themes.clone(),
            characters: self.characters.clone(),
            setting: self.setting.clone(),
            target_words: self.target_words,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let prompt = build_prompt(&args.story_request());
    let max_tokens = estimate_max_tokens(args.target_words.into());

    if args.dry_run {
        println!("{}", prompt);
        println!();
        println!("Approx. max tokens: {}", max_tokens);
        return Ok(());
    }

    let completions = OpenAiCompletions::new(&Credentials::from_env()?);

    let story = match generate_story(
        &completions,
        args.model,
        &prompt,
        args.temperature,
        max_tokens,
    )
    .await
    {
        Ok(story) => story,
        Err(e) => anyhow::bail!("Failed to generate story: {}", e),
    };

    println!("{}", story);

    if let Some(output) = &args.output {
        let path = write_story(output, &story)?;
        eprintln!("Saved to {}", path.display());
    }

    Ok(())
}
