//! Sequential model fallback: each candidate model gets up to three
//! attempts before the next one is tried; the first acceptable completion
//! wins. Waits are cooperative (`tokio::time::sleep`), never blocking.

use std::time::Duration;

use log::{ info, warn };
use tokio::time::sleep;

use crate::error::{ ApiError, ModelFailure };
use crate::llm::{ GenerationClient, GenerationParams };

const MAX_ATTEMPTS_PER_MODEL: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);
const MODEL_SWITCH_DELAY: Duration = Duration::from_millis(1000);

/// Try `models` strictly in order until one produces text of at least
/// `min_len` trimmed characters. Exhaustion yields `ALL_MODELS_UNAVAILABLE`
/// with the last failure recorded per model. Non-retryable upstream errors
/// (quota, safety, credentials) abort the loop immediately.
pub async fn generate_with_fallback(
    client: &dyn GenerationClient,
    models: &[&str],
    prompt: &str,
    params: &GenerationParams,
    min_len: usize,
) -> Result<String, ApiError> {
    let mut failures: Vec<ModelFailure> = Vec::with_capacity(models.len());

    for (model_index, model) in models.iter().enumerate() {
        // (description, true when the last attempt raised an error rather
        // than returning short text)
        let mut last_failure: (String, bool) = (String::from("aucune tentative"), false);

        for attempt in 1..=MAX_ATTEMPTS_PER_MODEL {
            info!("attempt {}/{} on model {}", attempt, MAX_ATTEMPTS_PER_MODEL, model);
            match client.generate(model, prompt, params).await {
                Ok(text) => {
                    let len = text.trim().chars().count();
                    if len >= min_len {
                        info!(
                            "model {} succeeded on attempt {} with {} chars",
                            model, attempt, len
                        );
                        return Ok(text);
                    }
                    warn!(
                        "model {} attempt {} returned {} chars, below floor {}",
                        model, attempt, len, min_len
                    );
                    last_failure = (format!("réponse trop courte ({} caractères)", len), false);
                }
                Err(e) if !e.is_retryable() => {
                    warn!("model {} attempt {} failed fatally: {}", model, attempt, e);
                    return Err(e.into());
                }
                Err(e) => {
                    warn!("model {} attempt {} failed: {}", model, attempt, e);
                    last_failure = (e.to_string(), true);
                }
            }
            if attempt < MAX_ATTEMPTS_PER_MODEL {
                sleep(RETRY_DELAY).await;
            }
        }

        let (description, was_error) = last_failure;
        warn!("model {} exhausted: {}", model, description);
        failures.push(ModelFailure {
            model: model.to_string(),
            error: description,
        });

        // Hard errors get a longer cool-down before the next model; models
        // that merely kept answering short move on immediately.
        if was_error && model_index + 1 < models.len() {
            sleep(MODEL_SWITCH_DELAY).await;
        }
    }

    Err(ApiError::AllModelsUnavailable { failures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GenerationError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{ AtomicUsize, Ordering };
    use tokio::time::Instant;

    struct ScriptedClient {
        script: Mutex<Vec<Result<String, GenerationError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(script: Vec<Result<String, GenerationError>>) -> Self {
            let mut script = script;
            script.reverse();
            Self { script: Mutex::new(script), calls: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationClient for ScriptedClient {
        async fn generate(
            &self,
            _model: &str,
            _prompt: &str,
            _params: &GenerationParams,
        ) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(GenerationError::Empty))
        }
    }

    fn params() -> GenerationParams {
        GenerationParams::default()
    }

    const LONG: &str = "Une réponse suffisamment longue pour franchir le seuil fixé.";

    #[tokio::test(start_paused = true)]
    async fn first_success_short_circuits() {
        let client = ScriptedClient::new(vec![Ok(LONG.to_string())]);
        let out = generate_with_fallback(&client, &["a", "b"], "p", &params(), 10).await;
        assert_eq!(out.unwrap(), LONG);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_second_attempt_skips_later_models() {
        let client = ScriptedClient::new(vec![
            Err(GenerationError::Overloaded),
            Ok(LONG.to_string()),
        ]);
        let out = generate_with_fallback(&client, &["a", "b", "c"], "p", &params(), 10).await;
        assert!(out.is_ok());
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn short_text_everywhere_exhausts_all_models() {
        let models = ["a", "b", "c"];
        let client = ScriptedClient::new((0..9).map(|_| Ok("court".to_string())).collect());
        let err = generate_with_fallback(&client, &models, "p", &params(), 50)
            .await
            .unwrap_err();
        assert_eq!(client.calls(), 9);
        match err {
            ApiError::AllModelsUnavailable { failures } => {
                assert_eq!(failures.len(), models.len());
                assert_eq!(failures[0].model, "a");
                assert!(failures.iter().all(|f| f.error.contains("trop courte")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_errors_abort_without_fallback() {
        let client = ScriptedClient::new(vec![Err(GenerationError::SafetyBlocked("SAFETY".into()))]);
        let err = generate_with_fallback(&client, &["a", "b"], "p", &params(), 10)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "SAFETY_FILTER");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn error_exhaustion_waits_longer_between_models_than_short_text() {
        // Two models, three short-text attempts each: only the four
        // intra-model 500 ms waits, no model-switch delay.
        let client = ScriptedClient::new((0..6).map(|_| Ok("court".to_string())).collect());
        let start = Instant::now();
        let _ = generate_with_fallback(&client, &["a", "b"], "p", &params(), 50).await;
        assert_eq!(start.elapsed(), Duration::from_millis(2000));

        // Same shape but erroring: the extra 1000 ms inter-model wait applies.
        let client = ScriptedClient::new(
            (0..6).map(|_| Err(GenerationError::Overloaded)).collect(),
        );
        let start = Instant::now();
        let _ = generate_with_fallback(&client, &["a", "b"], "p", &params(), 50).await;
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }
}
