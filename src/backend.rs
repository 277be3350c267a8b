//! Analysis backend client
//!
//! The backend is an opaque collaborator: one request/response endpoint
//! that takes a natural-language message and answers with text, optional
//! rows, and optional chart descriptors. The [`AnalysisBackend`] trait is
//! the seam the coordinator depends on; [`HttpBackend`] is the production
//! implementation over reqwest.

use crate::charts::VisualizationInfo;
use crate::config::BackendConfig;
use crate::dataset::Row;
use crate::error::DatachatError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request body for the chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's natural-language message
    pub message: String,
    /// Session the request belongs to; progress events echo this id
    pub session_id: String,
}

/// One chart descriptor as delivered on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartInfo {
    /// Chart kind tag ("bar", "line", "histogram", "pie")
    #[serde(rename = "type")]
    pub chart_type: String,
    /// Rows this chart derives from
    #[serde(default)]
    pub chart_data: Vec<Row>,
    /// Kind-specific visualization fields
    #[serde(default)]
    pub visualization: VisualizationInfo,
}

/// Response body from the chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The bot's textual reply
    pub response: String,
    /// Row-set for the session dataset, when the query produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,
    /// Chart descriptors, when the backend suggested visualizations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts_info: Option<Vec<ChartInfo>>,
}

/// The request/response seam to the analysis backend
///
/// The coordinator depends only on this trait; tests substitute scripted
/// implementations.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Submit one message and await the full analysis response
    async fn analyze(&self, request: &ChatRequest) -> Result<ChatResponse, DatachatError>;
}

/// HTTP implementation of [`AnalysisBackend`]
pub struct HttpBackend {
    client: Client,
    chat_url: String,
}

impl HttpBackend {
    /// Create a backend client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: &BackendConfig) -> Result<Self, DatachatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("datachat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DatachatError::Http)?;

        let chat_url = format!(
            "{}{}",
            config.url.trim_end_matches('/'),
            config.chat_path
        );
        tracing::info!(url = %chat_url, "Initialized analysis backend client");

        Ok(Self { client, chat_url })
    }
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn analyze(&self, request: &ChatRequest) -> Result<ChatResponse, DatachatError> {
        tracing::debug!(
            session_id = %request.session_id,
            "Sending analysis request"
        );

        let response = self
            .client
            .post(&self.chat_url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Backend returned failure");
            return Err(DatachatError::Backend {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        tracing::debug!(
            has_data = parsed.data.is_some(),
            chart_count = parsed.charts_info.as_ref().map(|c| c.len()).unwrap_or(0),
            "Received analysis response"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatRequest {
            message: "show sales by region".to_string(),
            session_id: "abc-123".to_string(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"message\":\"show sales by region\""));
        assert!(json.contains("\"session_id\":\"abc-123\""));
    }

    #[test]
    fn test_chat_response_deserialization_full() {
        let json = r#"{
            "response": "Here are your sales.",
            "data": [{"region": "A", "sales": 10}],
            "charts_info": [{
                "type": "bar",
                "chart_data": [{"region": "A", "sales": 10}],
                "visualization": {
                    "chart_title": "Sales by Region",
                    "x_column": "region",
                    "y_column": "sales"
                }
            }]
        }"#;

        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.response, "Here are your sales.");
        assert_eq!(response.data.as_ref().unwrap().len(), 1);
        let charts = response.charts_info.as_ref().unwrap();
        assert_eq!(charts[0].chart_type, "bar");
        assert_eq!(
            charts[0].visualization.x_column.as_deref(),
            Some("region")
        );
    }

    #[test]
    fn test_chat_response_deserialization_text_only() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"response": "Hello!"}"#).unwrap();
        assert!(response.data.is_none());
        assert!(response.charts_info.is_none());
    }

    #[test]
    fn test_backend_new_builds_chat_url() {
        let config = BackendConfig {
            url: "http://localhost:5000/".to_string(),
            ..Default::default()
        };
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(backend.chat_url, "http://localhost:5000/chat");
    }
}
