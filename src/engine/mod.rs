pub mod fallback;
pub mod postprocess;

use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::error::ApiError;
use crate::llm::{ GenerationClient, GenerationParams };
use crate::models::chat::{ ChatRequest, ChatResponse, ConversationTurn, PersonaInfo };
use crate::personas::{ PersonaConfig, FREE_MESSAGE_LIMIT };

/// Whether the caller gets a complete answer or a teaser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    Full,
    Teaser,
}

#[derive(Debug, Clone)]
struct AccessDecision {
    mode: ResponseMode,
    free_messages_remaining: Option<u32>,
    show_paywall: bool,
}

/// The one request handler behind all six oracle endpoints. Persona
/// differences live entirely in the `PersonaConfig` passed per call.
pub struct OracleEngine {
    client: Arc<dyn GenerationClient>,
}

impl OracleEngine {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    pub fn persona_info(&self, persona: &PersonaConfig) -> PersonaInfo {
        persona.info()
    }

    pub async fn handle_chat(
        &self,
        persona: &'static PersonaConfig,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ApiError> {
        validate(persona, request)?;

        let access = decide_access(persona, request);
        let mode = access.mode;
        info!(
            "persona={} count={} premium={} mode={:?}",
            persona.id, request.message_count, request.is_premium_user, mode
        );

        let prompt = build_prompt(persona, request, mode);
        let min_len = match mode {
            ResponseMode::Full => persona.full_min_len,
            ResponseMode::Teaser => persona.teaser_min_len,
        };
        let params = generation_params(persona, mode);

        let raw = fallback::generate_with_fallback(
            self.client.as_ref(),
            persona.models,
            &prompt,
            &params,
            min_len,
        ).await?;

        let text = match mode {
            ResponseMode::Full => {
                postprocess::repair_completion(&raw, persona.completion_emojis, min_len)
            }
            ResponseMode::Teaser => postprocess::teaser(&raw, persona.hook_block),
        };

        if text.trim().chars().count() < min_len {
            return Err(ApiError::ResponseTooShort);
        }

        Ok(ChatResponse {
            success: true,
            response: text,
            timestamp: Utc::now().to_rfc3339(),
            free_messages_remaining: access.free_messages_remaining,
            show_paywall: Some(access.show_paywall),
            paywall_message: if access.show_paywall {
                Some(persona.paywall_message.to_string())
            } else {
                None
            },
            is_complete_response: Some(mode == ResponseMode::Full),
        })
    }
}

/// Fail fast, before any outbound call.
fn validate(persona: &PersonaConfig, request: &ChatRequest) -> Result<(), ApiError> {
    if request.persona_data.is_null() {
        return Err(ApiError::MissingPersonaData { code: persona.missing_data_code });
    }
    if request.user_message.trim().is_empty() {
        return Err(ApiError::MissingUserMessage);
    }
    if request.user_message.chars().count() > persona.max_message_len {
        return Err(ApiError::MessageTooLong { max: persona.max_message_len });
    }
    Ok(())
}

fn decide_access(persona: &PersonaConfig, request: &ChatRequest) -> AccessDecision {
    if !persona.freemium {
        return AccessDecision {
            mode: ResponseMode::Full,
            free_messages_remaining: None,
            show_paywall: false,
        };
    }

    let full = request.is_premium_user || request.message_count <= FREE_MESSAGE_LIMIT;
    AccessDecision {
        mode: if full { ResponseMode::Full } else { ResponseMode::Teaser },
        free_messages_remaining: Some(
            FREE_MESSAGE_LIMIT.saturating_sub(request.message_count)
        ),
        show_paywall: !full && request.message_count > FREE_MESSAGE_LIMIT,
    }
}

fn render_history(history: &[ConversationTurn]) -> String {
    if history.is_empty() {
        return String::new();
    }
    let mut out = String::from("Conversation précédente:\n");
    for turn in history {
        let label = match turn.role.as_str() {
            "user" => "Consultant",
            "assistant" => "Oracle",
            other => other,
        };
        out.push_str(&format!("{}: {}\n", label, turn.message));
    }
    out
}

fn build_prompt(
    persona: &PersonaConfig,
    request: &ChatRequest,
    mode: ResponseMode,
) -> String {
    let (min_words, max_words) = match mode {
        ResponseMode::Full => persona.full_words,
        ResponseMode::Teaser => persona.teaser_words,
    };

    let directive = match mode {
        ResponseMode::Full => format!(
            "Rédige une réponse complète et aboutie de {} à {} mots. Va \
             jusqu'au bout de l'analyse et livre la conclusion concrète. Ne \
             t'interromps jamais en cours de phrase et termine par une \
             ponctuation finale.",
            min_words, max_words
        ),
        ResponseMode::Teaser => format!(
            "Rédige un aperçu de {} à {} mots. Pose l'ambiance et amorce \
             l'analyse, mais garde la conclusion concrète pour toi: pas de \
             pourcentage exact, pas de liste de recommandations finales, pas \
             de verdict. Termine par une ponctuation finale.",
            min_words, max_words
        ),
    };

    let mut prompt = String::new();
    prompt.push_str(persona.system_prompt);
    prompt.push_str("\n\n");
    prompt.push_str(crate::personas::prompts::COMMON_RULES);
    prompt.push_str("\n\n");
    prompt.push_str(&(persona.context)(&request.persona_data));
    prompt.push_str("\n\n");
    let history = render_history(&request.conversation_history);
    if !history.is_empty() {
        prompt.push_str(&history);
        prompt.push('\n');
    }
    prompt.push_str(&directive);
    prompt.push_str("\n\nMessage du consultant: ");
    prompt.push_str(&request.user_message);
    prompt.push_str(&format!("\n\nRéponse de {}:", persona.name));
    prompt
}

fn generation_params(persona: &PersonaConfig, mode: ResponseMode) -> GenerationParams {
    GenerationParams {
        temperature: persona.temperature,
        max_output_tokens: match mode {
            ResponseMode::Full => persona.full_max_tokens,
            ResponseMode::Teaser => persona.teaser_max_tokens,
        },
        ..GenerationParams::default()
    }
}
