//! End-to-end tests through the axum router with a scripted generation
//! client standing in for the upstream API.

use std::sync::Arc;
use std::sync::atomic::{ AtomicUsize, Ordering };

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{ Request, StatusCode };
use http_body_util::BodyExt;
use serde_json::{ json, Value };
use tower::ServiceExt;

use oracle_gateway::engine::OracleEngine;
use oracle_gateway::llm::{ GenerationClient, GenerationError, GenerationParams };
use oracle_gateway::personas;
use oracle_gateway::server::api::{ router, AppState };

const LONG_REPLY: &str = "Les arcanes dessinent une période charnière. La \
    Lune t'invite à écouter ton intuition plus que les conseils extérieurs. \
    Le Soleil qui la suit annonce une clarté nouvelle dans tes choix. \
    Avance avec confiance, le tirage t'est favorable.";

struct FixedClient {
    reply: &'static str,
    calls: AtomicUsize,
}

impl FixedClient {
    fn new(reply: &'static str) -> Arc<Self> {
        Arc::new(Self { reply, calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl GenerationClient for FixedClient {
    async fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_string())
    }
}

fn app(client: Arc<dyn GenerationClient>) -> Router {
    router(AppState { engine: Arc::new(OracleEngine::new(client)) })
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn chat_body(message: &str) -> Value {
    json!({
        "personaData": { "spreadType": "croix" },
        "userMessage": message
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get_json(app(FixedClient::new(LONG_REPLY)), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn info_serves_static_persona_metadata() {
    let (status, body) = get_json(app(FixedClient::new(LONG_REPLY)), "/api/tarot/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Madame Irma");
    assert_eq!(body["title"], "Tarologue");
    assert_eq!(body["freeMessageLimit"], 3);
    assert!(body["services"].as_array().unwrap().len() >= 3);
}

#[tokio::test]
async fn unknown_persona_is_404() {
    let (status, body) = get_json(app(FixedClient::new(LONG_REPLY)), "/api/runes/info").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNKNOWN_PERSONA");
}

#[tokio::test]
async fn blank_message_is_rejected_with_400() {
    let client = FixedClient::new(LONG_REPLY);
    let (status, body) = post_json(app(client.clone()), "/api/tarot/chat", chat_body("  ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "MISSING_USER_MESSAGE");
    assert!(body["timestamp"].is_string());
    assert_eq!(client.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_persona_data_uses_persona_specific_code() {
    let (status, body) = post_json(
        app(FixedClient::new(LONG_REPLY)),
        "/api/love/chat",
        json!({ "userMessage": "sommes-nous compatibles?" }),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_LOVE_DATA");
}

#[tokio::test]
async fn chat_returns_generated_reply() {
    let (status, body) = post_json(
        app(FixedClient::new(LONG_REPLY)),
        "/api/tarot/chat",
        chat_body("que disent les cartes?"),
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["showPaywall"], false);
    assert_eq!(body["isCompleteResponse"], true);
    assert!(body["response"].as_str().unwrap().contains("arcanes"));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn fourth_free_message_is_paywalled_teaser() {
    let mut request = chat_body("que disent les cartes?");
    request["messageCount"] = json!(4);
    let (status, body) = post_json(app(FixedClient::new(LONG_REPLY)), "/api/tarot/chat", request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["showPaywall"], true);
    assert_eq!(body["isCompleteResponse"], false);
    assert_eq!(body["freeMessagesRemaining"], 0);
    let hook = personas::get("tarot").unwrap().hook_block;
    assert!(body["response"].as_str().unwrap().ends_with(hook));
    assert!(body["paywallMessage"].is_string());
}

#[tokio::test(start_paused = true)]
async fn persistent_short_output_exhausts_every_model() {
    let client = FixedClient::new("court.");
    let (status, body) = post_json(
        app(client.clone()),
        "/api/tarot/chat",
        chat_body("que disent les cartes?"),
    ).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "ALL_MODELS_UNAVAILABLE");
    let models = personas::get("tarot").unwrap().models;
    let attempted = body["attemptedModels"].as_array().unwrap();
    assert_eq!(attempted.len(), models.len());
    assert_eq!(client.calls.load(Ordering::SeqCst), models.len() * 3);
}
