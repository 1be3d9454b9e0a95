//! Raw wire shapes shared by the REST, auth and GraphQL endpoints.
//! Domain methods unwrap these before handing data to callers.
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// REST envelope  {success, data, message}
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Pull a human-readable message out of an error body.
/// Servers send either `message` or `error`; anything else gets a generic text.
pub fn error_message(body: &Value, status: u16) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}

// ---------------------------------------------------------------------------
// GraphQL
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
    pub operation_name: Option<&'a str>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GraphqlResponse {
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlErrorItem>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GraphqlErrorItem {
    pub message: String,
}
