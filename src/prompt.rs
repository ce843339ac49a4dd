use crate::request::StoryRequest;

const FALLBACK_PREMISE: &str =
    "Create a compelling story from scratch inspired by the genre and tone.";

const FIXED_REQUIREMENTS: [&str; 4] = [
    "- Keep the narrative coherent with clear beginning, middle, and end.",
    "- Show, don't just tell. Use sensory details and vivid imagery.",
    "- Maintain consistent POV and tense, unless stylistically justified.",
    "- Avoid explicit content; keep it appropriate for the selected audience.",
];

const DIALOGUE_REQUIREMENT: &str = "- Use natural, character-revealing dialogue where relevant.";
const NARRATION_REQUIREMENT: &str = "- Minimize dialogue; focus on narration and description.";
const TITLE_REQUIREMENT: &str =
    "- If a title is requested, place it on the first line and then a blank line before the story.";
const NO_TITLE_REQUIREMENT: &str = "- Do not include a title line.";

/// Renders a story request as the user message sent to the model.
///
/// One labeled line per field, then a `Requirements:` block of six lines.
/// Blank themes, characters and setting are left out entirely; a blank premise
/// is replaced by an instruction to invent one.
pub fn build_prompt(request: &StoryRequest) -> String {
    let premise = match request.premise.trim() {
        "" => FALLBACK_PREMISE,
        premise => premise,
    };

    let mut lines = vec![
        "Task: Write an original, engaging story that follows these specifications.".to_string(),
        format!("Premise: {}", premise),
        format!("Genre: {}", request.genre),
        format!("Tone/Mood: {}", request.tone),
        format!("Point of View: {}", request.pov),
        format!("Intended Audience: {}", request.audience),
        format!("Primary Language: {}", request.language),
        format!("Target Length (approx.): {} words", request.target_words),
    ];

    let optional = [
        ("Key Themes and Motifs to Emphasize", &request.themes),
        ("Characters (names, roles, traits)", &request.characters),
        ("Setting (time/place/atmosphere)", &request.setting),
    ];
    for (label, value) in optional {
        if !value.trim().is_empty() {
            lines.push(format!("{}: {}", label, value));
        }
    }

    lines.push(format!("Include a Title: {}", yes_no(request.include_title)));
    lines.push(format!("Include Dialogue: {}", yes_no(request.include_dialogue)));
    lines.push("Requirements:".to_string());
    lines.extend(FIXED_REQUIREMENTS.iter().map(|line| line.to_string()));
    lines.push(
        if request.include_dialogue {
            DIALOGUE_REQUIREMENT
        } else {
            NARRATION_REQUIREMENT
        }
        .to_string(),
    );
    lines.push(
        if request.include_title {
            TITLE_REQUIREMENT
        } else {
            NO_TITLE_REQUIREMENT
        }
        .to_string(),
    );

    lines.join("\n")
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
