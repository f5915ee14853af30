//! Runtime configuration for the remote integrations.
//!
//! Values come from environment variables. Web builds have no process
//! environment, so the same variables are also read at compile time and
//! used as a fallback.

use std::time::Duration;

use crate::constants::{DEFAULT_GEMINI_MODEL, DEFAULT_HTTP_TIMEOUT_SECS};

/// Supabase project URL.
pub const SUPABASE_URL_VAR: &str = "LABEL_DESIGNER_SUPABASE_URL";
/// Supabase anonymous key.
pub const SUPABASE_ANON_KEY_VAR: &str = "LABEL_DESIGNER_SUPABASE_ANON_KEY";
/// Generative API key.
pub const GEMINI_API_KEY_VAR: &str = "LABEL_DESIGNER_GEMINI_API_KEY";
/// Legacy name accepted for the generative API key.
pub const LEGACY_API_KEY_VAR: &str = "API_KEY";
/// Generative model name.
pub const GEMINI_MODEL_VAR: &str = "LABEL_DESIGNER_GEMINI_MODEL";
/// Request timeout in seconds.
pub const HTTP_TIMEOUT_VAR: &str = "LABEL_DESIGNER_HTTP_TIMEOUT_SECS";

/// Connection details of the hosted backend (remote templates and auth).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseSettings {
    /// Project URL, without trailing slash
    pub url: String,
    /// Anonymous API key
    pub anon_key: String,
}

/// Content-assist credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiSettings {
    /// API key
    pub api_key: String,
    /// Model name
    pub model: String,
}

/// All runtime settings. Missing sections disable the matching feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Remote store and auth backend, when both URL and key are set
    pub supabase: Option<SupabaseSettings>,
    /// Content assist, when an API key is set
    pub gemini: Option<GeminiSettings>,
    /// Timeout for every outbound request
    pub http_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            supabase: None,
            gemini: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment, then from values baked in at build time.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| compiled(key)))
    }

    /// Builds settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let supabase = match (get(SUPABASE_URL_VAR), get(SUPABASE_ANON_KEY_VAR)) {
            (Some(url), Some(anon_key)) => Some(SupabaseSettings {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            (None, None) => None,
            _ => {
                log::warn!(
                    "{SUPABASE_URL_VAR} and {SUPABASE_ANON_KEY_VAR} must both be set; remote templates disabled"
                );
                None
            }
        };

        let gemini = get(GEMINI_API_KEY_VAR)
            .or_else(|| get(LEGACY_API_KEY_VAR))
            .map(|api_key| GeminiSettings {
                api_key,
                model: get(GEMINI_MODEL_VAR).unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            });

        let http_timeout = match get(HTTP_TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    log::warn!("Invalid {HTTP_TIMEOUT_VAR} value {raw:?}, using {DEFAULT_HTTP_TIMEOUT_SECS}s");
                    Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)
                }
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Self {
            supabase,
            gemini,
            http_timeout,
        }
    }

    /// Whether the hosted backend is configured.
    pub fn remote_enabled(&self) -> bool {
        self.supabase.is_some()
    }

    /// Whether content assist is configured.
    pub fn assist_enabled(&self) -> bool {
        self.gemini.is_some()
    }
}

fn compiled(key: &str) -> Option<String> {
    let value = match key {
        SUPABASE_URL_VAR => option_env!("LABEL_DESIGNER_SUPABASE_URL"),
        SUPABASE_ANON_KEY_VAR => option_env!("LABEL_DESIGNER_SUPABASE_ANON_KEY"),
        GEMINI_API_KEY_VAR => option_env!("LABEL_DESIGNER_GEMINI_API_KEY"),
        GEMINI_MODEL_VAR => option_env!("LABEL_DESIGNER_GEMINI_MODEL"),
        HTTP_TIMEOUT_VAR => option_env!("LABEL_DESIGNER_HTTP_TIMEOUT_SECS"),
        _ => None,
    };
    value.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_disables_everything() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings, Settings::default());
        assert!(!settings.remote_enabled());
        assert!(!settings.assist_enabled());
    }

    #[test]
    fn test_supabase_needs_url_and_key() {
        let settings = Settings::from_lookup(lookup(&[(SUPABASE_URL_VAR, "https://x.supabase.co")]));
        assert!(settings.supabase.is_none());

        let settings = Settings::from_lookup(lookup(&[
            (SUPABASE_URL_VAR, "https://x.supabase.co/"),
            (SUPABASE_ANON_KEY_VAR, "anon"),
        ]));
        let supabase = settings.supabase.unwrap();
        assert_eq!(supabase.url, "https://x.supabase.co");
        assert_eq!(supabase.anon_key, "anon");
    }

    #[test]
    fn test_gemini_key_falls_back_to_legacy_name() {
        let settings = Settings::from_lookup(lookup(&[(LEGACY_API_KEY_VAR, "legacy")]));
        let gemini = settings.gemini.unwrap();
        assert_eq!(gemini.api_key, "legacy");
        assert_eq!(gemini.model, DEFAULT_GEMINI_MODEL);

        let settings = Settings::from_lookup(lookup(&[
            (LEGACY_API_KEY_VAR, "legacy"),
            (GEMINI_API_KEY_VAR, "primary"),
            (GEMINI_MODEL_VAR, "gemini-custom"),
        ]));
        let gemini = settings.gemini.unwrap();
        assert_eq!(gemini.api_key, "primary");
        assert_eq!(gemini.model, "gemini-custom");
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let settings = Settings::from_lookup(lookup(&[(GEMINI_API_KEY_VAR, "  ")]));
        assert!(settings.gemini.is_none());
    }

    #[test]
    fn test_timeout_parsing() {
        let settings = Settings::from_lookup(lookup(&[(HTTP_TIMEOUT_VAR, "5")]));
        assert_eq!(settings.http_timeout, Duration::from_secs(5));

        for bad in ["0", "abc", "-3"] {
            let settings = Settings::from_lookup(lookup(&[(HTTP_TIMEOUT_VAR, bad)]));
            assert_eq!(settings.http_timeout, Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
        }
    }
}
