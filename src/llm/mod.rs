pub mod gemini;

use async_trait::async_trait;
use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

use crate::cli::Args;
use self::gemini::GeminiClient;

/// Fixed generation knobs for one upstream call. Values are constants per
/// persona and response mode, never user-controlled.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: i32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    pub candidate_count: u32,
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
            candidate_count: 1,
            stop_sequences: Vec::new(),
        }
    }
}

/// Upstream failure, classified at the client boundary.
///
/// The handler path never inspects error prose; the kind alone decides the
/// client-facing status code and whether the fallback loop keeps retrying.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("quota or rate limit exhausted upstream")]
    RateLimited,
    #[error("generation blocked by safety filter: {0}")]
    SafetyBlocked(String),
    #[error("upstream rejected the API credential")]
    Unauthorized,
    #[error("model overloaded")]
    Overloaded,
    #[error("upstream returned no completion text")]
    Empty,
    #[error("upstream error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl GenerationError {
    /// Retrying a quota, safety or credential failure on another model is
    /// pointless; everything else is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            GenerationError::RateLimited
                | GenerationError::SafetyBlocked(_)
                | GenerationError::Unauthorized
        )
    }
}

#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, GenerationError>;
}

pub fn new_client(args: &Args) -> Result<Arc<dyn GenerationClient>, Box<dyn StdError + Send + Sync>> {
    let client = GeminiClient::new(
        args.gemini_api_key.clone(),
        args.gemini_base_url.clone(),
        args.generation_timeout_secs,
    )?;
    Ok(Arc::new(client))
}
