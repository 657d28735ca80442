use axum::http::StatusCode;
use axum::response::{ IntoResponse, Response };
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::llm::GenerationError;

/// Last error recorded for one fallback model, carried by the exhaustion
/// payload so clients can see what was attempted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFailure {
    pub model: String,
    pub error: String,
}

/// Everything a handler can fail with. Each variant owns its HTTP status and
/// machine code; the display string is the localized client-facing message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Les informations de consultation sont manquantes.")]
    MissingPersonaData { code: &'static str },

    #[error("Veuillez écrire un message avant d'envoyer.")]
    MissingUserMessage,

    #[error("Votre message dépasse la limite de {max} caractères.")]
    MessageTooLong { max: usize },

    #[error("Cet oracle n'existe pas: {0}")]
    UnknownPersona(String),

    #[error("Le service est très sollicité en ce moment. Merci de patienter un instant.")]
    QuotaExceeded,

    #[error("Votre demande n'a pas pu être traitée. Reformulez votre message, s'il vous plaît.")]
    SafetyFilter,

    #[error("Le service de génération a refusé nos identifiants.")]
    AuthError,

    #[error("Le service de génération est momentanément surchargé.")]
    ServiceOverloaded,

    #[error("Aucun oracle n'a pu répondre pour le moment. Réessayez dans quelques instants.")]
    AllModelsUnavailable { failures: Vec<ModelFailure> },

    #[error("La réponse générée était incomplète. Réessayez, s'il vous plaît.")]
    ResponseTooShort,

    #[error("Une erreur interne est survenue.")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingPersonaData { .. }
            | ApiError::MissingUserMessage
            | ApiError::MessageTooLong { .. }
            | ApiError::SafetyFilter => StatusCode::BAD_REQUEST,
            ApiError::UnknownPersona(_) => StatusCode::NOT_FOUND,
            ApiError::AuthError => StatusCode::UNAUTHORIZED,
            ApiError::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ServiceOverloaded
            | ApiError::AllModelsUnavailable { .. }
            | ApiError::ResponseTooShort => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingPersonaData { code } => code,
            ApiError::MissingUserMessage => "MISSING_USER_MESSAGE",
            ApiError::MessageTooLong { .. } => "MESSAGE_TOO_LONG",
            ApiError::UnknownPersona(_) => "UNKNOWN_PERSONA",
            ApiError::QuotaExceeded => "QUOTA_EXCEEDED",
            ApiError::SafetyFilter => "SAFETY_FILTER",
            ApiError::AuthError => "AUTH_ERROR",
            ApiError::ServiceOverloaded => "SERVICE_OVERLOADED",
            ApiError::AllModelsUnavailable { .. } => "ALL_MODELS_UNAVAILABLE",
            ApiError::ResponseTooShort => "RESPONSE_TOO_SHORT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::RateLimited => ApiError::QuotaExceeded,
            GenerationError::SafetyBlocked(_) => ApiError::SafetyFilter,
            GenerationError::Unauthorized => ApiError::AuthError,
            GenerationError::Overloaded => ApiError::ServiceOverloaded,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "error": self.to_string(),
            "code": self.code(),
            "timestamp": Utc::now().to_rfc3339(),
        });
        if let ApiError::AllModelsUnavailable { failures } = &self {
            body["attemptedModels"] = json!(failures);
        }
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(ApiError::MissingUserMessage.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MessageTooLong { max: 1500 }.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::SafetyFilter.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::AuthError.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::QuotaExceeded.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ApiError::ServiceOverloaded.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            ApiError::AllModelsUnavailable { failures: vec![] }.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn persona_specific_missing_data_code_passes_through() {
        let err = ApiError::MissingPersonaData { code: "MISSING_TAROT_DATA" };
        assert_eq!(err.code(), "MISSING_TAROT_DATA");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn generation_errors_map_to_client_codes() {
        assert_eq!(ApiError::from(GenerationError::RateLimited).code(), "QUOTA_EXCEEDED");
        assert_eq!(
            ApiError::from(GenerationError::SafetyBlocked("SAFETY".into())).code(),
            "SAFETY_FILTER"
        );
        assert_eq!(ApiError::from(GenerationError::Unauthorized).code(), "AUTH_ERROR");
        assert_eq!(ApiError::from(GenerationError::Overloaded).code(), "SERVICE_OVERLOADED");
        assert_eq!(ApiError::from(GenerationError::Empty).code(), "INTERNAL_ERROR");
    }
}
