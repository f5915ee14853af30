//! Sign-in against the hosted auth service.
//!
//! The OAuth dance itself happens in the browser: [`AuthClient::authorize_url`]
//! is opened, the provider redirects back with the session in the URL
//! fragment, [`parse_callback`] extracts the access token and
//! [`AuthClient::fetch_user`] turns it into an [`AppUser`].

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::http::with_timeout;
use crate::settings::SupabaseSettings;
use crate::types::{AppUser, AuthProvider};

/// Name shown when the provider does not report one.
pub const FALLBACK_USER_NAME: &str = "Usuário";

/// Errors from the auth service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No backend is configured
    #[error("Supabase não configurado")]
    NotConfigured,
    /// The request did not complete
    #[error("Erro de conexão: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service rejected the request
    #[error("{message}")]
    Api {
        /// HTTP status
        status: u16,
        /// Message from the service
        message: String,
    },
    /// The user payload could not be read
    #[error("Resposta inválida: {0}")]
    Decode(#[from] serde_json::Error),
    /// The project URL or redirect is unusable
    #[error("URL inválida: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Tokens delivered in the OAuth redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token for the user endpoints
    pub access_token: String,
    /// Token to renew the session, when provided
    pub refresh_token: Option<String>,
}

/// Extracts the session from a redirect URL or its fragment.
///
/// Accepts a full URL (`https://app/#access_token=...`), a bare fragment
/// with or without the leading `#`, or a query string.
pub fn parse_callback(input: &str) -> Option<Session> {
    let input = input.trim();
    let params = match input.find('#') {
        Some(index) => &input[index + 1..],
        None => match input.find('?') {
            Some(index) => &input[index + 1..],
            None => input,
        },
    };

    let mut access_token = None;
    let mut refresh_token = None;
    for (key, value) in url::form_urlencoded::parse(params.as_bytes()) {
        match key.as_ref() {
            "access_token" if !value.is_empty() => access_token = Some(value.into_owned()),
            "refresh_token" if !value.is_empty() => refresh_token = Some(value.into_owned()),
            _ => {}
        }
    }
    access_token.map(|access_token| Session {
        access_token,
        refresh_token,
    })
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AppMetadata {
    #[serde(default)]
    provider: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
    #[serde(default)]
    app_metadata: AppMetadata,
}

impl From<UserPayload> for AppUser {
    fn from(payload: UserPayload) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        let name = non_empty(payload.user_metadata.full_name)
            .or_else(|| non_empty(payload.user_metadata.name))
            .unwrap_or_else(|| FALLBACK_USER_NAME.to_string());
        let provider = match payload.app_metadata.provider.as_deref() {
            Some("github") => AuthProvider::Github,
            Some("email") => AuthProvider::Email,
            _ => AuthProvider::Google,
        };
        AppUser {
            id: payload.id,
            email: payload.email.unwrap_or_default(),
            name,
            avatar_url: payload.user_metadata.avatar_url.unwrap_or_default(),
            provider,
        }
    }
}

/// Parses the user object returned by the auth service.
pub fn user_from_json(json: &str) -> Result<AppUser, serde_json::Error> {
    serde_json::from_str::<UserPayload>(json).map(AppUser::from)
}

/// Identity used for the e-mail sign-in, which has no server side.
pub fn email_user(email: &str) -> Option<AppUser> {
    let email = email.trim();
    if email.is_empty() {
        return None;
    }
    let name = email.split('@').next().unwrap_or(email).to_string();
    Some(AppUser {
        id: email.to_string(),
        email: email.to_string(),
        name,
        avatar_url: String::new(),
        provider: AuthProvider::Email,
    })
}

/// Client for the auth endpoints of the hosted backend.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
    base: Url,
    anon_key: String,
    timeout: Duration,
}

impl AuthClient {
    /// Creates a client, or [`AuthError::NotConfigured`] without a backend.
    pub fn new(settings: Option<&SupabaseSettings>, timeout: Duration) -> Result<Self, AuthError> {
        let settings = settings.ok_or(AuthError::NotConfigured)?;
        let base = Url::parse(&format!("{}/", settings.url.trim_end_matches('/')))?;
        Ok(Self {
            client: Client::new(),
            base,
            anon_key: settings.anon_key.clone(),
            timeout,
        })
    }

    /// URL that starts the OAuth flow for `provider`, returning to `redirect_to`.
    pub fn authorize_url(&self, provider: AuthProvider, redirect_to: &str) -> Result<Url, AuthError> {
        let mut url = self.base.join("auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider.as_str())
            .append_pair("redirect_to", redirect_to);
        Ok(url)
    }

    /// The user owning `access_token`.
    pub async fn fetch_user(&self, access_token: &str) -> Result<AppUser, AuthError> {
        let url = self.base.join("auth/v1/user")?;
        let request = self.client.get(url);
        let body = self.send(request, access_token).await?;
        let user = user_from_json(&body)?;
        log::info!("Signed in as {} via {}", user.id, user.provider.as_str());
        Ok(user)
    }

    /// Ends the session of `access_token`.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let url = self.base.join("auth/v1/logout")?;
        let request = self.client.post(url);
        self.send(request, access_token).await?;
        log::info!("Signed out");
        Ok(())
    }

    async fn send(&self, request: RequestBuilder, access_token: &str) -> Result<String, AuthError> {
        let request = request
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token);
        let response = with_timeout(request, self.timeout).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| {
                ["msg", "message", "error_description"]
                    .iter()
                    .find_map(|key| value[*key].as_str().map(str::to_string))
            })
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        log::warn!("Auth request failed ({status}): {message}");
        Err(AuthError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
