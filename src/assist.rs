//! Content assist backed by a hosted generative model.
//!
//! Two one-shot requests: rewriting a free-text field and proposing a
//! nutrition table for a product. Neither retries nor streams. Callers keep
//! the previous content when a request fails.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::constants::GEMINI_BASE_URL;
use crate::http::with_timeout;
use crate::settings::GeminiSettings;
use crate::types::NutritionItem;

/// Errors from the content-assist service.
#[derive(Debug, Error)]
pub enum AssistError {
    /// The request did not complete
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service rejected the request
    #[error("service returned {status}: {message}")]
    Api {
        /// HTTP status
        status: u16,
        /// Error text from the service
        message: String,
    },
    /// The response envelope could not be read
    #[error("unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The endpoint URL could not be built
    #[error("invalid endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, all parts joined.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Prompt asking for a professional rewrite of a label text.
pub fn improve_prompt(topic: &str, current: &str) -> String {
    format!(
        "Melhore e profissionalize o seguinte texto para uma etiqueta de produto: \"{current}\". \
         O tópico é \"{topic}\". Seja conciso e profissional em português."
    )
}

/// Prompt asking for a nutrition table.
pub fn nutrition_prompt(product_name: &str) -> String {
    format!("Gere uma tabela nutricional realista para o produto \"{product_name}\" no formato JSON.")
}

/// Response schema for [`AssistClient::generate_nutrition`]: an array of complete rows.
pub fn nutrition_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "amount": { "type": "STRING" },
                "dailyValue": { "type": "STRING" }
            },
            "required": ["name", "amount", "dailyValue"]
        }
    })
}

/// Parses the model output of a nutrition request. Anything but a list of rows is `None`.
pub fn parse_nutrition(text: &str) -> Option<Vec<NutritionItem>> {
    match serde_json::from_str::<Vec<NutritionItem>>(text.trim()) {
        Ok(items) => Some(items),
        Err(err) => {
            log::error!("Failed to parse AI response: {err}");
            None
        }
    }
}

/// Client for the generative language API.
#[derive(Debug, Clone)]
pub struct AssistClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    timeout: Duration,
}

impl AssistClient {
    /// Client against the public endpoint.
    pub fn new(settings: &GeminiSettings, timeout: Duration) -> Result<Self, AssistError> {
        Self::with_base_url(GEMINI_BASE_URL, settings, timeout)
    }

    /// Client against an arbitrary base URL.
    pub fn with_base_url(base_url: &str, settings: &GeminiSettings, timeout: Duration) -> Result<Self, AssistError> {
        let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        let endpoint = base.join(&format!("v1beta/models/{}:generateContent", settings.model))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key: settings.api_key.clone(),
            timeout,
        })
    }

    /// Rewrites `current` for the given topic. An empty answer keeps `current`.
    pub async fn improve_text(&self, topic: &str, current: &str) -> Result<String, AssistError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": improve_prompt(topic, current) }] }]
        });
        let text = self.generate(body).await?;
        if text.trim().is_empty() {
            log::debug!("Empty improvement for {topic:?}, keeping current text");
            return Ok(current.to_string());
        }
        Ok(text)
    }

    /// Proposes nutrition rows for `product_name`. Malformed model output is `Ok(None)`.
    pub async fn generate_nutrition(&self, product_name: &str) -> Result<Option<Vec<NutritionItem>>, AssistError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": nutrition_prompt(product_name) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": nutrition_schema()
            }
        });
        let text = self.generate(body).await?;
        Ok(parse_nutrition(&text))
    }

    async fn generate(&self, body: Value) -> Result<String, AssistError> {
        let request = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body);
        let response = with_timeout(request, self.timeout).send().await?;
        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&raw)
                .ok()
                .and_then(|value| value["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(raw);
            log::warn!("Content assist failed ({status}): {message}");
            return Err(AssistError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let parsed: GenerateResponse = serde_json::from_str(&raw)?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const PATH: &str = "/v1beta/models/gemini-test:generateContent";

    fn client_for(server: &MockServer) -> AssistClient {
        let settings = GeminiSettings {
            api_key: "secret".into(),
            model: "gemini-test".into(),
        };
        AssistClient::with_base_url(&server.base_url(), &settings, Duration::from_secs(5)).expect("valid URL")
    }

    fn reply(text: &str) -> Value {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
    }

    #[tokio::test]
    async fn improve_text_returns_model_text() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(POST)
                .path(PATH)
                .header("x-goog-api-key", "secret")
                .body_includes("O tópico é \\\"Ingredientes\\\"");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(reply("Farinha de trigo enriquecida, água e sal."));
        }).await;

        let text = client_for(&server)
            .improve_text("Ingredientes", "farinha, agua, sal")
            .await
            .expect("request should succeed");
        mock.assert_async().await;
        assert_eq!(text, "Farinha de trigo enriquecida, água e sal.");
    }

    #[tokio::test]
    async fn empty_improvement_keeps_current_text() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).json_body(json!({ "candidates": [] }));
        }).await;

        let text = client_for(&server)
            .improve_text("Preparo", "Assar por 10 minutos")
            .await
            .expect("request should succeed");
        assert_eq!(text, "Assar por 10 minutos");
    }

    #[tokio::test]
    async fn generate_nutrition_sends_schema_and_parses_rows() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(POST)
                .path(PATH)
                .body_includes("\"responseMimeType\":\"application/json\"")
                .body_includes("\"dailyValue\"");
            then.status(200).json_body(reply(
                r#"[{"name":"Valor Energético","amount":"120 kcal","dailyValue":"6%"},{"name":"Sódio","amount":"80mg","dailyValue":"3%"}]"#,
            ));
        }).await;

        let rows = client_for(&server)
            .generate_nutrition("Biscoito")
            .await
            .expect("request should succeed")
            .expect("rows expected");
        mock.assert_async().await;
        assert_eq!(
            rows,
            vec![
                NutritionItem::new("Valor Energético", "120 kcal", "6%"),
                NutritionItem::new("Sódio", "80mg", "3%"),
            ]
        );
    }

    #[tokio::test]
    async fn malformed_nutrition_is_none() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(200).json_body(reply("Desculpe, não consigo."));
        }).await;

        let rows = client_for(&server)
            .generate_nutrition("Biscoito")
            .await
            .expect("request should succeed");
        assert!(rows.is_none());
    }

    #[tokio::test]
    async fn service_errors_carry_the_message() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(POST).path(PATH);
            then.status(403)
                .json_body(json!({ "error": { "code": 403, "message": "API key not valid" } }));
        }).await;

        let err = client_for(&server)
            .improve_text("Produto", "x")
            .await
            .expect_err("should fail");
        match err {
            AssistError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_nutrition_rejects_incomplete_rows() {
        assert!(parse_nutrition(r#"[{"name":"Sal","amount":"1g"}]"#).is_none());
        assert!(parse_nutrition(r#"{"name":"Sal"}"#).is_none());
        assert_eq!(parse_nutrition(" [] "), Some(Vec::new()));
    }

    #[test]
    fn prompts_quote_their_inputs() {
        assert!(improve_prompt("Ingredientes", "sal").contains("\"sal\""));
        assert!(nutrition_prompt("Pão").contains("\"Pão\""));
    }
}
