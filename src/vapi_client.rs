//! VAPI outbound call dispatch
//!
//! One best-effort POST per call. The outcome is logged and never returned.

use serde::Serialize;
use tracing::{error, info};

/// Request body for `POST /call`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    pub assistant_id: String,
    pub phone_number_id: String,
    pub assistant_overrides: AssistantOverrides,
    pub customers: Vec<Customer>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantOverrides {
    pub variable_values: VariableValues,
}

/// Per-call variables substituted into the assistant's script
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VariableValues {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Customer {
    pub name: String,
    pub number: String,
}

pub struct VapiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    assistant_id: String,
    phone_number_id: String,
}

impl VapiClient {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: &str,
        assistant_id: &str,
        phone_number_id: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            assistant_id: assistant_id.to_string(),
            phone_number_id: phone_number_id.to_string(),
        }
    }

    pub fn build_call_request(&self, name: &str, phone_number: &str) -> CallRequest {
        CallRequest {
            assistant_id: self.assistant_id.clone(),
            phone_number_id: self.phone_number_id.clone(),
            assistant_overrides: AssistantOverrides {
                variable_values: VariableValues { name: name.to_string() },
            },
            customers: vec![Customer {
                name: name.to_string(),
                number: phone_number.to_string(),
            }],
        }
    }

    /// Ask VAPI to call `phone_number`. No retry; failures are only logged.
    pub async fn dispatch_call(&self, name: &str, phone_number: &str) {
        let payload = self.build_call_request(name, phone_number);
        let url = format!("{}/call", self.base_url);

        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, %url, "VAPI call request failed");
                return;
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.is_success() {
            info!(%body, "VAPI call successful");
        } else {
            error!(status = status.as_u16(), %body, "VAPI call rejected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_stub, unreachable_url};
    use axum::{Json, Router, extract::State, http::{HeaderMap, StatusCode}, routing::post};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    fn client_for(base: &str) -> VapiClient {
        VapiClient::new(reqwest::Client::new(), base, "vapi-key", "asst-123", "phone-456")
    }

    fn router(seen: Captured, status: StatusCode) -> Router {
        Router::new()
            .route(
                "/call",
                post(move |State(seen): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    seen.lock().unwrap().push((auth, body));
                    (status, Json(json!({"id": "call-1", "status": "queued"})))
                }),
            )
            .with_state(seen)
    }

    #[test]
    fn test_call_request_wire_shape() {
        let payload = client_for("http://unused").build_call_request("Jane", "+15551234567");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "assistantId": "asst-123",
                "phoneNumberId": "phone-456",
                "assistantOverrides": {"variableValues": {"name": "Jane"}},
                "customers": [{"name": "Jane", "number": "+15551234567"}]
            })
        );
    }

    #[tokio::test]
    async fn test_dispatch_posts_payload_with_bearer_auth() {
        let seen: Captured = Arc::default();
        let base = spawn_stub(router(seen.clone(), StatusCode::CREATED)).await;

        client_for(&format!("{}/", base)).dispatch_call("Jane", "+15551234567").await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("Bearer vapi-key"));
        assert_eq!(seen[0].1["customers"][0]["number"], "+15551234567");
        assert_eq!(seen[0].1["assistantOverrides"]["variableValues"]["name"], "Jane");
    }

    #[tokio::test]
    async fn test_rejected_call_is_attempted_once() {
        let seen: Captured = Arc::default();
        let base = spawn_stub(router(seen.clone(), StatusCode::INTERNAL_SERVER_ERROR)).await;

        client_for(&base).dispatch_call("Jane", "+15551234567").await;
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_does_not_fail_caller() {
        let base = unreachable_url().await;
        client_for(&base).dispatch_call("Jane", "+15551234567").await;
    }
}
