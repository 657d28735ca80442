use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    routing::{ get, post },
    Router,
    extract::{ Path, State },
    Json,
};
use governor::{ RateLimiter, Quota, state::{ InMemoryState, NotKeyed }, clock::DefaultClock };
use log::{ info, warn, error };
use once_cell::sync::Lazy;
use serde_json::json;
use tower_http::cors::{ Any, CorsLayer };
use uuid::Uuid;

use crate::cli::Args;
use crate::engine::OracleEngine;
use crate::error::ApiError;
use crate::models::chat::{ ChatRequest, ChatResponse, PersonaInfo };
use crate::personas;

// Instance-wide throttle on generation traffic; burst control only, the
// freemium quota is enforced per request in the engine.
static CHAT_LIMITER: Lazy<RateLimiter<NotKeyed, InMemoryState, DefaultClock>> =
    Lazy::new(|| RateLimiter::direct(Quota::per_second(NonZeroU32::new(20).unwrap())));

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<OracleEngine>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/{persona}/chat", post(chat_handler))
        .route("/api/{persona}/info", get(info_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_http_server(
    addr: &str,
    state: AppState,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;
    let app = router(state);

    if args.enable_tls && args.tls_cert_path.is_some() && args.tls_key_path.is_some() {
        let cert_path = args.tls_cert_path.as_deref().unwrap_or_default();
        let key_path = args.tls_key_path.as_deref().unwrap_or_default();
        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("Starting HTTPS server on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        info!("Starting HTTP server on: http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            e
        })?;
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn chat_handler(
    State(state): State<AppState>,
    Path(persona_id): Path<String>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if CHAT_LIMITER.check().is_err() {
        warn!("chat rate limit tripped for persona {}", persona_id);
        return Err(ApiError::QuotaExceeded);
    }

    let persona = personas::get(&persona_id)
        .ok_or_else(|| ApiError::UnknownPersona(persona_id.clone()))?;

    let request_id = Uuid::new_v4();
    info!("[{}] chat request for persona {}", request_id, persona.id);

    match state.engine.handle_chat(persona, &request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            warn!("[{}] chat request failed: {} ({})", request_id, e, e.code());
            Err(e)
        }
    }
}

async fn info_handler(
    State(state): State<AppState>,
    Path(persona_id): Path<String>,
) -> Result<Json<PersonaInfo>, ApiError> {
    let persona = personas::get(&persona_id)
        .ok_or_else(|| ApiError::UnknownPersona(persona_id.clone()))?;
    Ok(Json(state.engine.persona_info(persona)))
}
