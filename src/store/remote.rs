//! Hosted template table, reached through the PostgREST API.

use std::time::Duration;

use chrono::{DateTime, FixedOffset, Local};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::constants::TEMPLATES_TABLE;
use crate::http::with_timeout;
use crate::settings::SupabaseSettings;
use crate::types::{format_display_date, LabelConfig, SavedTemplate, TemplateId};

/// PostgREST/Postgres codes meaning the table has not been created.
const TABLE_MISSING_CODES: [&str; 3] = ["PGRST116", "PGRST205", "42P01"];

/// Errors from the remote template store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The `templates` table does not exist yet
    #[error("Tabela \"templates\" não encontrada.")]
    TableMissing,
    /// The API rejected the request
    #[error("{message}")]
    Api {
        /// HTTP status
        status: u16,
        /// Message reported by the API
        message: String,
    },
    /// The request did not complete
    #[error("Erro de conexão: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body could not be read
    #[error("Resposta inválida: {0}")]
    Decode(#[from] serde_json::Error),
    /// The configured project URL is unusable
    #[error("URL inválida: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl StoreError {
    /// Whether the error means the table must be created first.
    pub fn is_table_missing(&self) -> bool {
        matches!(self, StoreError::TableMissing)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Maps a failed response to a [`StoreError`].
pub fn classify_error(status: StatusCode, body: &str) -> StoreError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    let code_missing = parsed
        .code
        .as_deref()
        .is_some_and(|code| TABLE_MISSING_CODES.contains(&code));
    let relation_missing = message.contains(&format!("relation \"{TEMPLATES_TABLE}\" does not exist"))
        || message.contains(&format!("relation \"public.{TEMPLATES_TABLE}\" does not exist"));

    if code_missing || relation_missing {
        StoreError::TableMissing
    } else {
        StoreError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TemplateRow {
    id: TemplateId,
    name: String,
    config: LabelConfig,
    created_at: DateTime<FixedOffset>,
}

impl From<TemplateRow> for SavedTemplate {
    fn from(row: TemplateRow) -> Self {
        SavedTemplate {
            id: row.id,
            name: row.name,
            date: format_display_date(row.created_at.with_timezone(&Local).date_naive()),
            config: row.config,
        }
    }
}

#[derive(Debug, Serialize)]
struct NewTemplateRow<'a> {
    id: TemplateId,
    name: &'a str,
    config: &'a LabelConfig,
}

/// Client for the `templates` table.
#[derive(Debug, Clone)]
pub struct RemoteTemplateStore {
    client: Client,
    endpoint: Url,
    anon_key: String,
    timeout: Duration,
}

impl RemoteTemplateStore {
    /// Creates a client for the given project.
    pub fn new(settings: &SupabaseSettings, timeout: Duration) -> Result<Self, StoreError> {
        let base = Url::parse(&format!("{}/", settings.url.trim_end_matches('/')))?;
        let endpoint = base.join(&format!("rest/v1/{TEMPLATES_TABLE}"))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            anon_key: settings.anon_key.clone(),
            timeout,
        })
    }

    /// All templates, newest first.
    pub async fn list(&self) -> Result<Vec<SavedTemplate>, StoreError> {
        let request = self
            .client
            .get(self.endpoint.clone())
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let response = self.send(request).await?;
        let body = response.text().await?;
        let rows: Vec<TemplateRow> = serde_json::from_str(&body)?;
        log::info!("Fetched {} remote templates", rows.len());
        Ok(rows.into_iter().map(SavedTemplate::from).collect())
    }

    /// Inserts a template row. The template id becomes the row id.
    pub async fn create(&self, template: &SavedTemplate) -> Result<(), StoreError> {
        let row = [NewTemplateRow {
            id: template.id,
            name: &template.name,
            config: &template.config,
        }];
        let request = self
            .client
            .post(self.endpoint.clone())
            .header("Prefer", "return=minimal")
            .json(&row);
        self.send(request).await?;
        log::info!("Saved template {} remotely", template.id);
        Ok(())
    }

    /// Deletes the row with `id`.
    pub async fn delete(&self, id: TemplateId) -> Result<(), StoreError> {
        let filter = format!("eq.{id}");
        let request = self
            .client
            .delete(self.endpoint.clone())
            .query(&[("id", filter.as_str())]);
        self.send(request).await?;
        log::info!("Deleted remote template {id}");
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let request = request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key);
        let response = with_timeout(request, self.timeout).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = classify_error(status, &body);
        log::warn!("Remote store request failed ({status}): {err}");
        Err(err)
    }
}
