pub mod prompts;
pub mod zodiac;

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;

use crate::models::chat::PersonaInfo;

/// Full-access responses granted before the paywall gates a freemium persona.
pub const FREE_MESSAGE_LIMIT: u32 = 3;

/// Everything that distinguishes one oracle from another. The engine itself
/// is persona-agnostic; all six features are rows of this record.
pub struct PersonaConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub specialty: &'static str,
    pub services: &'static [&'static str],
    pub system_prompt: &'static str,
    pub missing_data_code: &'static str,
    /// Upper bound on the user message, in Unicode scalar values.
    pub max_message_len: usize,
    pub full_words: (u32, u32),
    pub teaser_words: (u32, u32),
    pub full_max_tokens: u32,
    pub teaser_max_tokens: u32,
    /// Acceptance floor for generated text, in characters.
    pub full_min_len: usize,
    pub teaser_min_len: usize,
    /// Whether responses past FREE_MESSAGE_LIMIT degrade to teasers.
    pub freemium: bool,
    /// Ordered fallback list, tried strictly in sequence.
    pub models: &'static [&'static str],
    /// Emoji this persona is allowed to end a complete response with.
    pub completion_emojis: &'static [char],
    pub hook_block: &'static str,
    pub paywall_message: &'static str,
    pub temperature: f32,
    /// Renders the opaque persona descriptor into prompt context.
    pub context: fn(&Value) -> String,
}

impl PersonaConfig {
    pub fn info(&self) -> PersonaInfo {
        PersonaInfo {
            name: self.name.to_string(),
            title: self.title.to_string(),
            specialty: self.specialty.to_string(),
            services: self.services.iter().map(|s| s.to_string()).collect(),
            free_message_limit: if self.freemium { Some(FREE_MESSAGE_LIMIT) } else { None },
        }
    }
}

pub static ALL: &[&PersonaConfig] = &[
    &prompts::TAROT,
    &prompts::ZODIAC,
    &prompts::DREAM,
    &prompts::LOVE,
    &prompts::VOCATION,
    &prompts::TOTEM,
];

static REGISTRY: Lazy<HashMap<&'static str, &'static PersonaConfig>> = Lazy::new(|| {
    ALL.iter()
        .map(|persona| (persona.id, *persona))
        .collect()
});

pub fn get(id: &str) -> Option<&'static PersonaConfig> {
    REGISTRY.get(id).copied()
}
