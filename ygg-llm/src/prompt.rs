//! Prompt templates for the perception collaborator.
//!
//! Three prompts drive a run: event encoding (sentence → structured event),
//! emotion tagging (event → ground-truth emotion) and entity extraction
//! (sentence → people, places and things). The built-in templates can be
//! overridden by a directory of TOML files.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{LlmError, Result};

/// Event encoding prompt: turns one sentence into a sensory event.
pub const EVENT_ENCODING_SYSTEM: &str = r"You are a Sensory-Event Intake system.

Given a text fragment, extract the fields below in JSON format.

Rules:
- Think like a human experiencing the moment. Focus on sensory details, emotional tone, and the setting.
- For temporal context, infer urgency and time of day if possible (e.g., running in the dark is Night + Urgent).
- Sensory features should be based on perceived experiences: physical, emotional, and social cues.
- Do not focus on abstract analysis or reasoning, only raw sensory experience and immediate emotional reaction.
- Respond ONLY with JSON. No explanation.";

/// User half of the event encoding prompt.
pub const EVENT_ENCODING_USER: &str = r#"Required Fields:
- Event ID: (given: {event_id})
- Sensory Features: key descriptors (e.g., ["dark room", "cold wind", "loud footsteps", "school environment", "feeling of isolation"])
- Temporal Context: {{"TimeOfDay": "Day" | "Night" | "Unknown", "Urgency": "Urgent" | "Peaceful" | "Neutral"}}
- Social Context: (Alone, With Family, With Strangers)
- Raw Text: (Original sentence)

Text:
"""{sentence}"""

Respond ONLY with valid JSON."#;

/// Emotion tagging prompt: assigns the ground-truth emotion of an event.
pub const EMOTION_TAGGING_SYSTEM: &str = r#"You are a primitive Emotional Tagging System that can ONLY output in exact JSON format.

Your response MUST be VALID JSON with EXACTLY these fields:
1. "Event ID": Copied directly from input
2. "Assigned Emotion": ONE value from ["Joy", "Sadness", "Fear", "Anger", "Curiosity", "Love/Attachment"]
3. "Emotion Intensity": Single decimal number between 0.0-1.0

DO NOT include ANY explanations, reasoning, or text that is not part of the valid JSON structure.
DO NOT add ANY additional fields or comments inside the JSON.

If you're tempted to use an emotion not in the list, choose the closest match from the allowed list ONLY."#;

/// User half of the emotion tagging prompt.
pub const EMOTION_TAGGING_USER: &str = r#"INPUT EVENT:
{event_json}

OUTPUT FORMAT (exactly this structure with no additional text):
{{
  "Event ID": "{event_id}",
  "Assigned Emotion": "<ONLY one of: Joy, Sadness, Fear, Anger, Curiosity, Love/Attachment>",
  "Emotion Intensity": <single decimal value between 0.0 and 1.0>
}}"#;

/// Entity extraction prompt: lists the emotionally relevant entities of a sentence.
pub const ENTITY_EXTRACTION_SYSTEM: &str = r#"You are an entity extraction assistant for a memory-based emotional brain simulation.

Extract only the following types of entities, exactly as they appear in the text:
People: Names, roles, or titles (e.g., "Father", "Margot", "the policeman", "the neighbor").
Emotionally significant objects: Tangible items with perceived importance (e.g., "diary", "ring", "letter").
Emotionally relevant places: Specific locations or rooms mentioned (e.g., "attic", "kitchen", "hiding place").
Emotionally charged events or actions: Specific concrete events or distinct actions that carry emotional weight (e.g., "doorbell rang", "a whispered voice", "crying", "celebrating").

Guidelines:
- Do not extract temporal references (e.g., "the moment when", "the time I", "quarter to seven") unless they describe a specific memorable event.
- Do not interpret meaning, infer relationships, or add context.
- Do not extract general items or locations unless explicitly named in the text.
- Return results as a list of plain strings, with each string matching the exact phrasing from the text.
- No explanations. No formatting. Only the list."#;

/// User half of the entity extraction prompt.
pub const ENTITY_EXTRACTION_USER: &str = r#"Text:
"{text}"

Example output:
["Father", "Margot", "diary", "attic", "doorbell rang"]"#;

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value and `{{` / `}}` with
/// literal braces, in a single pass so substituted values are never
/// re-interpreted. Unknown keys are left in place.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        if let Some(end) = tail.strip_prefix('{').and_then(|t| t.find('}')) {
            let key = &tail[1..=end];
            if let Some((_, value)) = vars.iter().find(|(k, _)| *k == key) {
                out.push_str(value);
                rest = &tail[end + 2..];
                continue;
            }
        }
        out.push_str(&tail[..1]);
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// PromptEngine: built-in templates with TOML overrides
// ---------------------------------------------------------------------------

/// Identifies a prompt template by purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptId {
    /// Sentence → structured event.
    EventEncoding,
    /// Event → emotion tag.
    EmotionTagging,
    /// Sentence → entity list.
    EntityExtraction,
}

impl PromptId {
    /// Returns the TOML filename (without path) for this prompt.
    #[must_use]
    pub fn filename(self) -> &'static str {
        match self {
            Self::EventEncoding => "event_encoding.toml",
            Self::EmotionTagging => "emotion_tagging.toml",
            Self::EntityExtraction => "entity_extraction.toml",
        }
    }

    /// All prompt IDs.
    #[must_use]
    pub fn all() -> &'static [PromptId] {
        &[Self::EventEncoding, Self::EmotionTagging, Self::EntityExtraction]
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EventEncoding => "event_encoding",
            Self::EmotionTagging => "emotion_tagging",
            Self::EntityExtraction => "entity_extraction",
        };
        write!(f, "{name}")
    }
}

impl FromStr for PromptId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "event_encoding" => Ok(Self::EventEncoding),
            "emotion_tagging" => Ok(Self::EmotionTagging),
            "entity_extraction" => Ok(Self::EntityExtraction),
            _ => Err(format!("unknown prompt id: '{s}'")),
        }
    }
}

/// `[prompt]` section of a TOML override file.
#[derive(Debug, Clone, Deserialize)]
struct TomlPromptFile {
    prompt: PromptTemplate,
}

/// A ready-to-render prompt template.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptTemplate {
    /// Template version string (e.g., "1.0").
    #[serde(default = "default_version")]
    pub version: String,
    /// System prompt template (contains `{key}` placeholders).
    pub system: String,
    /// User prompt template (contains `{key}` placeholders).
    pub user: String,
}

fn default_version() -> String {
    "1.0".into()
}

/// Holds one template per [`PromptId`] and renders them.
#[derive(Debug, Clone)]
pub struct PromptEngine {
    templates: HashMap<PromptId, PromptTemplate>,
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptEngine {
    /// Engine loaded with the compiled-in templates.
    #[must_use]
    pub fn builtin() -> Self {
        let builtin = |system: &str, user: &str| PromptTemplate {
            version: "builtin".into(),
            system: system.into(),
            user: user.into(),
        };
        let templates = HashMap::from([
            (
                PromptId::EventEncoding,
                builtin(EVENT_ENCODING_SYSTEM, EVENT_ENCODING_USER),
            ),
            (
                PromptId::EmotionTagging,
                builtin(EMOTION_TAGGING_SYSTEM, EMOTION_TAGGING_USER),
            ),
            (
                PromptId::EntityExtraction,
                builtin(ENTITY_EXTRACTION_SYSTEM, ENTITY_EXTRACTION_USER),
            ),
        ]);
        Self { templates }
    }

    /// Built-in templates, overridden by any matching TOML file in `dir`.
    ///
    /// Files that do not exist are skipped; unknown files are ignored.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] if a TOML file exists but cannot be
    /// read or parsed.
    pub fn with_overrides(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut engine = Self::builtin();

        for id in PromptId::all() {
            let path = dir.join(id.filename());
            if !path.exists() {
                continue;
            }
            let content = std::fs::read_to_string(&path).map_err(|e| {
                LlmError::ConfigError(format!("failed to read {}: {e}", path.display()))
            })?;
            let parsed: TomlPromptFile = toml::from_str(&content).map_err(|e| {
                LlmError::ConfigError(format!("failed to parse {}: {e}", path.display()))
            })?;
            engine.templates.insert(*id, parsed.prompt);
        }

        Ok(engine)
    }

    /// Get a loaded prompt template by ID.
    #[must_use]
    pub fn get(&self, id: PromptId) -> Option<&PromptTemplate> {
        self.templates.get(&id)
    }

    /// Render both system and user prompts for a given ID.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] if the prompt ID is not loaded.
    pub fn render(&self, id: PromptId, vars: &[(&str, &str)]) -> Result<(String, String)> {
        let tpl = self
            .get(id)
            .ok_or_else(|| LlmError::ConfigError(format!("prompt template '{id}' not loaded")))?;
        Ok((
            render_template(&tpl.system, vars),
            render_template(&tpl.user, vars),
        ))
    }
}
