use serde::{ Serialize, Deserialize };
use serde_json::Value;

/// One turn of prior conversation, oldest first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub message: String,
}

fn default_message_count() -> u32 {
    1
}

/// Inbound body of `POST /api/{persona}/chat`.
///
/// Every field except the message itself is optional on the wire; missing
/// fields fall back to defaults so validation can produce domain errors
/// instead of deserialization failures.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Opaque persona-specific descriptor (spread type, birth date, ...).
    #[serde(default)]
    pub persona_data: Value,
    #[serde(default)]
    pub user_message: String,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
    /// How many messages the client has sent so far, client-tracked.
    #[serde(default = "default_message_count")]
    pub message_count: u32,
    #[serde(default)]
    pub is_premium_user: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_messages_remaining: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_paywall: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paywall_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_complete_response: Option<bool>,
}

/// Static metadata served by `GET /api/{persona}/info`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaInfo {
    pub name: String,
    pub title: String,
    pub specialty: String,
    pub services: Vec<String>,
    pub free_message_limit: Option<u32>,
}
