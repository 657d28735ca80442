use std::time::Duration;

use async_trait::async_trait;
use log::{ debug, info };
use serde::{ Deserialize, Serialize };

use super::{ GenerationClient, GenerationError, GenerationParams };

const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
    role: String,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: i32,
    top_p: f32,
    max_output_tokens: u32,
    candidate_count: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Thin client for the `generateContent` endpoint of the Google generative
/// language API. One instance is built at startup and shared by every
/// request; model selection happens per call.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        base_url: String,
        timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { http, api_key, base_url })
    }

    fn url_for(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            model,
            self.api_key
        )
    }
}

fn build_request(prompt: &str, params: &GenerationParams) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part { text: prompt.to_string() }],
            role: "user".to_string(),
        }],
        generation_config: GenerationConfig {
            temperature: params.temperature,
            top_k: params.top_k,
            top_p: params.top_p,
            max_output_tokens: params.max_output_tokens,
            candidate_count: params.candidate_count,
            stop_sequences: params.stop_sequences.clone(),
        },
        safety_settings: SAFETY_CATEGORIES.iter()
            .map(|category| SafetySetting { category, threshold: SAFETY_THRESHOLD })
            .collect(),
    }
}

fn classify_status(status: u16, body: String) -> GenerationError {
    match status {
        429 => GenerationError::RateLimited,
        401 | 403 => GenerationError::Unauthorized,
        503 => GenerationError::Overloaded,
        _ => GenerationError::Api { status, message: body },
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, GenerationError> {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            return Err(GenerationError::SafetyBlocked(reason.clone()));
        }
    }

    let candidate = response.candidates.into_iter().next().ok_or(GenerationError::Empty)?;

    if candidate.finish_reason.as_deref() == Some("SAFETY") {
        return Err(GenerationError::SafetyBlocked("SAFETY".to_string()));
    }

    let text: String = candidate.content
        .map(|content|
            content.parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        )
        .unwrap_or_default();

    if text.is_empty() {
        return Err(GenerationError::Empty);
    }
    Ok(text)
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        info!(
            "GeminiClient::generate() → model={} max_tokens={} temp={}",
            model,
            params.max_output_tokens,
            params.temperature
        );

        let payload = build_request(prompt, params);
        let resp = self.http.post(self.url_for(model)).json(&payload).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_else(|_| "unreadable error body".to_string());
            debug!("upstream returned {} for model {}: {}", status, model, body);
            return Err(classify_status(status.as_u16(), body));
        }

        let parsed: GenerateContentResponse = resp.json().await?;
        extract_text(parsed)
    }
}
