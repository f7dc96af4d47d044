use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::agent::DEFAULT_MODEL;
use crate::config::ClientConfig;
use crate::tools::ToolWire;

pub mod error;

use error::ClientError;

/// All Gagiteck API keys start with this prefix.
pub const API_KEY_PREFIX: &str = "ggt_";

/// Main client for the Gagiteck REST API.
///
/// Credentials are validated at construction, before any network access.
/// The underlying HTTP client is a scoped resource released when the
/// `Client` is dropped.
///
/// ```no_run
/// # async fn demo() -> Result<(), gagiteck::client::error::ClientError> {
/// let client = gagiteck::Client::new("ggt_your_key_here")?;
/// let agents = client.agents().list(20, 0).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    http: reqwest::Client,
}

impl Client {
    /// Client with default base URL and timeout. Fails when the key is
    /// empty or does not carry the `ggt_` prefix.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_config(ClientConfig::new(api_key))
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        if config.api_key.is_empty() {
            return Err(ClientError::Authentication("API key is required".into()));
        }
        if !config.api_key.starts_with(API_KEY_PREFIX) {
            return Err(ClientError::Authentication(format!(
                "Invalid API key format. Key should start with '{API_KEY_PREFIX}'"
            )));
        }

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(|_| {
            ClientError::Authentication("API key contains invalid header characters".into())
        })?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("gagiteck-rust/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, http })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn agents(&self) -> AgentsApi<'_> {
        AgentsApi { client: self }
    }

    pub fn workflows(&self) -> WorkflowsApi<'_> {
        WorkflowsApi { client: self }
    }

    pub fn executions(&self) -> ExecutionsApi<'_> {
        ExecutionsApi { client: self }
    }

    /// Perform one API request and map the response onto the error
    /// taxonomy: 401 -> Authentication, 429 -> RateLimit, other non-2xx ->
    /// Api with the HTTP code, no response at all -> Api with code 0.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        query: Option<&[(&str, String)]>,
    ) -> Result<Value, ClientError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(%method, %url, "sending API request");

        let mut builder = self.http.request(method, &url);
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        if let Some(query) = query {
            builder = builder.query(query);
        }

        let response = builder.send().await.map_err(|e| ClientError::Api {
            code: 0,
            message: e.to_string(),
        })?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Authentication(
                "Invalid or expired API key".into(),
            ));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            let message = response.text().await.unwrap_or_default();
            warn!(retry_after, "rate limited by API");
            return Err(ClientError::RateLimit {
                retry_after,
                message,
            });
        }

        let text = response.text().await.map_err(|e| ClientError::Api {
            code: 0,
            message: e.to_string(),
        })?;
        if !status.is_success() {
            return Err(ClientError::Api {
                code: status.as_u16(),
                message: text,
            });
        }
        if text.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Body of `POST /agents`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAgent {
    pub name: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub tools: Vec<ToolWire>,
}

impl CreateAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: None,
            tools: Vec::new(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolWire>) -> Self {
        self.tools = tools;
        self
    }
}

/// API for managing agents.
pub struct AgentsApi<'a> {
    client: &'a Client,
}

impl AgentsApi<'_> {
    pub async fn list(&self, limit: u32, offset: u32) -> Result<Value, ClientError> {
        self.client
            .request(
                Method::GET,
                "/agents",
                None,
                Some(&[("limit", limit.to_string()), ("offset", offset.to_string())]),
            )
            .await
    }

    pub async fn get(&self, agent_id: &str) -> Result<Value, ClientError> {
        self.client
            .request(Method::GET, &format!("/agents/{agent_id}"), None, None)
            .await
    }

    pub async fn create(&self, agent: &CreateAgent) -> Result<Value, ClientError> {
        self.client
            .request(Method::POST, "/agents", Some(serde_json::to_value(agent)?), None)
            .await
    }

    pub async fn update(&self, agent_id: &str, fields: Value) -> Result<Value, ClientError> {
        self.client
            .request(
                Method::PATCH,
                &format!("/agents/{agent_id}"),
                Some(fields),
                None,
            )
            .await
    }

    pub async fn delete(&self, agent_id: &str) -> Result<(), ClientError> {
        self.client
            .request(Method::DELETE, &format!("/agents/{agent_id}"), None, None)
            .await?;
        Ok(())
    }

    /// Run a remote agent with a message and optional context object.
    pub async fn run(
        &self,
        agent_id: &str,
        message: &str,
        context: Option<Value>,
    ) -> Result<Value, ClientError> {
        let mut body = json!({ "message": message });
        if let Some(context) = context {
            body["context"] = context;
        }
        self.client
            .request(
                Method::POST,
                &format!("/agents/{agent_id}/run"),
                Some(body),
                None,
            )
            .await
    }
}

/// API for managing workflows.
pub struct WorkflowsApi<'a> {
    client: &'a Client,
}

impl WorkflowsApi<'_> {
    pub async fn list(&self, limit: u32, offset: u32) -> Result<Value, ClientError> {
        self.client
            .request(
                Method::GET,
                "/workflows",
                None,
                Some(&[("limit", limit.to_string()), ("offset", offset.to_string())]),
            )
            .await
    }

    pub async fn get(&self, workflow_id: &str) -> Result<Value, ClientError> {
        self.client
            .request(Method::GET, &format!("/workflows/{workflow_id}"), None, None)
            .await
    }

    pub async fn trigger(
        &self,
        workflow_id: &str,
        inputs: Option<Value>,
    ) -> Result<Value, ClientError> {
        let body = json!({ "inputs": inputs.unwrap_or_else(|| json!({})) });
        self.client
            .request(
                Method::POST,
                &format!("/workflows/{workflow_id}/trigger"),
                Some(body),
                None,
            )
            .await
    }
}

/// API for inspecting executions.
pub struct ExecutionsApi<'a> {
    client: &'a Client,
}

impl ExecutionsApi<'_> {
    pub async fn list(&self, limit: u32, offset: u32) -> Result<Value, ClientError> {
        self.client
            .request(
                Method::GET,
                "/executions",
                None,
                Some(&[("limit", limit.to_string()), ("offset", offset.to_string())]),
            )
            .await
    }

    pub async fn get(&self, execution_id: &str) -> Result<Value, ClientError> {
        self.client
            .request(Method::GET, &format!("/executions/{execution_id}"), None, None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> Client {
        Client::with_config(ClientConfig::new("ggt_test_key").with_base_url(server.url()))
            .expect("client construction failed")
    }

    #[test]
    fn missing_or_malformed_key_fails_before_any_network_access() {
        let err = Client::new("").unwrap_err();
        assert!(matches!(err, ClientError::Authentication(m) if m.contains("required")));

        let err = Client::new("sk-wrong-prefix").unwrap_err();
        assert!(matches!(err, ClientError::Authentication(m) if m.contains("ggt_")));
    }

    #[tokio::test]
    async fn list_agents_sends_pagination_and_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/agents")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "20".into()),
                Matcher::UrlEncoded("offset".into(), "0".into()),
            ]))
            .match_header("authorization", "Bearer ggt_test_key")
            .with_status(200)
            .with_body(r#"{"agents": [], "total": 0}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let got = client.agents().list(20, 0).await.unwrap();
        assert_eq!(got["total"], 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/agents/agt_1")
            .with_status(401)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.agents().get("agt_1").await.unwrap_err();
        assert!(matches!(err, ClientError::Authentication(_)));
    }

    #[tokio::test]
    async fn rate_limit_carries_retry_after_hint() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/workflows/wf_1")
            .with_status(429)
            .with_header("retry-after", "7")
            .with_body("slow down")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.workflows().get("wf_1").await.unwrap_err();
        match err {
            ClientError::RateLimit {
                retry_after,
                message,
            } => {
                assert_eq!(retry_after, 7);
                assert_eq!(message, "slow down");
            }
            other => panic!("expected RateLimit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_maps_to_api_error_with_code() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/executions/ex_1")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client.executions().get("ex_1").await.unwrap_err();
        assert!(matches!(err, ClientError::Api { code: 500, message } if message == "boom"));
    }

    #[tokio::test]
    async fn delete_tolerates_empty_response_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/agents/agt_1")
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        client.agents().delete("agt_1").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_agent_posts_wire_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/agents")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Research Assistant",
                "model": "claude-3-opus",
                "system_prompt": "Be thorough.",
                "tools": []
            })))
            .with_status(200)
            .with_body(r#"{"id": "agt_new"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let agent = CreateAgent::new("Research Assistant")
            .with_model("claude-3-opus")
            .with_system_prompt("Be thorough.");
        let got = client.agents().create(&agent).await.unwrap();
        assert_eq!(got["id"], "agt_new");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn run_remote_agent_includes_context_only_when_given() {
        let mut server = mockito::Server::new_async().await;
        let without = server
            .mock("POST", "/agents/agt_1/run")
            .match_body(Matcher::Json(serde_json::json!({"message": "hi"})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = client_for(&server);
        client.agents().run("agt_1", "hi", None).await.unwrap();
        without.assert_async().await;

        let with = server
            .mock("POST", "/agents/agt_1/run")
            .match_body(Matcher::Json(serde_json::json!({
                "message": "hi",
                "context": {"locale": "en"}
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        client
            .agents()
            .run("agt_1", "hi", Some(serde_json::json!({"locale": "en"})))
            .await
            .unwrap();
        with.assert_async().await;
    }

    #[tokio::test]
    async fn trigger_workflow_defaults_inputs_to_empty_object() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/workflows/wf_1/trigger")
            .match_body(Matcher::Json(serde_json::json!({"inputs": {}})))
            .with_status(200)
            .with_body(r#"{"execution_id": "ex_1"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let got = client.workflows().trigger("wf_1", None).await.unwrap();
        assert_eq!(got["execution_id"], "ex_1");
        mock.assert_async().await;
    }
}
