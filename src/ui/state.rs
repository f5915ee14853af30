//! Application state structures.
//!
//! The editor keeps one working [`LabelConfig`], the template library mirror
//! and the signed-in identity. Everything else here is transient UI state
//! (open dialogs, in-flight requests, cached textures) that is rebuilt on
//! every start.

use std::sync::mpsc::{channel, Receiver, Sender};

use eframe::egui;
use serde::{Deserialize, Serialize};

use super::tasks::TaskResult;
use crate::assist::AssistClient;
use crate::auth::AuthClient;
use crate::constants::{EDITOR_PANEL_WIDTH, UI_PREFS_KEY};
use crate::settings::Settings;
use crate::store::{local, RemoteTemplateStore, StoreError, TemplateLibrary};
use crate::types::*;
use crate::validation::EditorTab;

/// Editor preferences kept between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiPrefs {
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Remembered width of the editor panel
    pub editor_panel_width: f32,
}

impl Default for UiPrefs {
    fn default() -> Self {
        Self {
            dark_mode: false,
            editor_panel_width: EDITOR_PANEL_WIDTH,
        }
    }
}

impl UiPrefs {
    /// Serializes the preferences to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes preferences, missing fields taking their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Failure of the remote template store, shown as a banner until retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbError {
    /// Message shown in the banner
    pub message: String,
    /// The table has to be created with the setup script
    pub table_missing: bool,
}

impl From<&StoreError> for DbError {
    fn from(err: &StoreError) -> Self {
        Self {
            message: err.to_string(),
            table_missing: err.is_table_missing(),
        }
    }
}

/// State of the template synchronisation with the remote store.
#[derive(Debug, Default)]
pub struct SyncState {
    /// Store requests started but not yet answered
    in_flight: usize,
    /// Last store failure, cleared by a retry
    pub db_error: Option<DbError>,
}

impl SyncState {
    /// Whether any store request is still in flight.
    pub fn syncing(&self) -> bool {
        self.in_flight > 0
    }

    /// Number of store requests awaiting an answer.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub(crate) fn start(&mut self) {
        self.in_flight += 1;
    }

    /// Marks one request answered. Extra calls never underflow.
    pub(crate) fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

/// An action waiting for the user to confirm it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirm {
    /// Replace the working configuration with a template
    LoadTemplate(TemplateId),
    /// Delete a template permanently
    DeleteTemplate(TemplateId),
}

/// Free-text fields the content assist can rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistField {
    /// Ingredient list
    Ingredients,
    /// Preparation hints
    Preparation,
}

impl AssistField {
    /// Topic sent along with the text.
    pub fn topic(self) -> &'static str {
        match self {
            AssistField::Ingredients => "lista de ingredientes técnica",
            AssistField::Preparation => "instruções de preparo",
        }
    }

    /// Current value of the field.
    pub fn value(self, config: &LabelConfig) -> &str {
        match self {
            AssistField::Ingredients => &config.ingredients,
            AssistField::Preparation => &config.preparation,
        }
    }

    /// Replaces the value of the field.
    pub fn set(self, config: &mut LabelConfig, value: String) {
        match self {
            AssistField::Ingredients => config.ingredients = value,
            AssistField::Preparation => config.preparation = value,
        }
    }
}

/// Remote integrations enabled by the settings.
#[derive(Debug, Default, Clone)]
pub struct Services {
    /// Remote template table
    pub remote: Option<RemoteTemplateStore>,
    /// Content assist
    pub assist: Option<AssistClient>,
    /// Hosted sign-in
    pub auth: Option<AuthClient>,
}

impl Services {
    /// Builds the clients for every configured integration.
    ///
    /// A client that cannot be built is logged and left disabled.
    pub fn from_settings(settings: &Settings) -> Self {
        let timeout = settings.http_timeout;
        let remote = settings.supabase.as_ref().and_then(|supabase| {
            RemoteTemplateStore::new(supabase, timeout)
                .map_err(|err| log::error!("Remote store disabled: {err}"))
                .ok()
        });
        let auth = settings.supabase.as_ref().and_then(|supabase| {
            AuthClient::new(Some(supabase), timeout)
                .map_err(|err| log::error!("Sign-in disabled: {err}"))
                .ok()
        });
        let assist = settings.gemini.as_ref().and_then(|gemini| {
            AssistClient::new(gemini, timeout)
                .map_err(|err| log::error!("Content assist disabled: {err}"))
                .ok()
        });
        Self { remote, assist, auth }
    }
}

/// Signed-in identity and the sign-in dialog.
#[derive(Debug, Default)]
pub struct AccountState {
    /// Cached identity
    pub user: Option<AppUser>,
    /// Bearer token of the current hosted session
    pub access_token: Option<String>,
    /// Whether the sign-in dialog is open
    pub show_login: bool,
    /// E-mail typed in the sign-in dialog
    pub login_email: String,
    /// Redirect URL pasted after an OAuth sign-in
    pub callback_input: String,
    /// A user lookup is in flight
    pub signing_in: bool,
}

/// Channel that carries finished background work back to the UI thread.
pub(crate) struct TaskChannel {
    pub(crate) sender: Sender<TaskResult>,
    pub(crate) receiver: Receiver<TaskResult>,
}

impl Default for TaskChannel {
    fn default() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }
}

/// Decoded logo texture, keyed by the logo source it was built from.
#[derive(Default)]
pub(crate) struct LogoCache {
    pub(crate) source: String,
    pub(crate) texture: Option<egui::TextureHandle>,
}

/// What was last written to local storage.
///
/// `None` means nothing is known to be stored and the next persist writes.
#[derive(Debug, Default)]
pub(crate) struct PersistedSnapshot {
    pub(crate) config: Option<LabelConfig>,
    pub(crate) library: Option<TemplateLibrary>,
    pub(crate) user: Option<Option<AppUser>>,
}

/// The main application structure.
///
/// Implements `eframe::App`; see the `ui` module for the frame layout.
pub struct LabelDesignerApp {
    /// The label being edited
    pub config: LabelConfig,
    /// Saved templates, newest first
    pub library: TemplateLibrary,
    /// Persisted editor preferences
    pub prefs: UiPrefs,
    /// Tab shown in the editor panel
    pub active_tab: EditorTab,
    /// Runtime settings the services were built from
    pub settings: Settings,
    /// Remote integrations
    pub services: Services,
    /// Identity and sign-in dialog
    pub account: AccountState,
    /// Remote template synchronisation
    pub sync: SyncState,
    /// A content-assist request is in flight
    pub busy: bool,
    /// Message shown in a blocking dialog
    pub notification: Option<String>,
    /// Name typed for the next saved template
    pub new_template_name: String,
    /// Action waiting for confirmation
    pub pending_confirm: Option<PendingConfirm>,
    pub(crate) tasks: TaskChannel,
    pub(crate) logo: LogoCache,
    pub(crate) persisted: PersistedSnapshot,
}

impl Default for LabelDesignerApp {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl LabelDesignerApp {
    /// Creates the app with nothing restored and no request started.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            config: LabelConfig::default(),
            library: TemplateLibrary::default(),
            prefs: UiPrefs::default(),
            active_tab: EditorTab::Dims,
            services: Services::from_settings(&settings),
            settings,
            account: AccountState::default(),
            sync: SyncState::default(),
            busy: false,
            notification: None,
            new_template_name: String::new(),
            pending_confirm: None,
            tasks: TaskChannel::default(),
            logo: LogoCache::default(),
            persisted: PersistedSnapshot::default(),
        }
    }

    /// Creates the app for a running window: restores the stored state and
    /// starts fetching the remote templates.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let mut app = Self::with_settings(settings);
        if let Some(storage) = cc.storage {
            app.restore(storage);
        }
        app.refresh_templates(&cc.egui_ctx);
        #[cfg(target_arch = "wasm32")]
        app.complete_sign_in_from_location(&cc.egui_ctx);
        app
    }

    /// Loads preferences, draft, template mirror and identity from `storage`.
    pub fn restore(&mut self, storage: &dyn eframe::Storage) {
        if let Some(json) = storage.get_string(UI_PREFS_KEY) {
            match UiPrefs::from_json(&json) {
                Ok(prefs) => self.prefs = prefs,
                Err(err) => log::error!("Failed to load editor preferences: {err}"),
            }
        }
        if let Some(draft) = local::load_draft(storage) {
            self.config = draft;
        }
        if let Some(templates) = local::load_templates(storage) {
            self.library = TemplateLibrary::new(templates);
        }
        self.account.user = local::load_user(storage);

        self.persisted = PersistedSnapshot {
            config: Some(self.config.clone()),
            library: Some(self.library.clone()),
            user: Some(self.account.user.clone()),
        };
        log::info!(
            "Restored draft, {} templates, user: {}",
            self.library.len(),
            self.account.user.is_some()
        );
    }

    /// Writes whatever changed since the last write.
    pub fn persist_changes(&mut self, storage: &mut dyn eframe::Storage) {
        if self.persisted.config.as_ref() != Some(&self.config) {
            local::save_draft(storage, &self.config);
            self.persisted.config = Some(self.config.clone());
        }
        if self.persisted.library.as_ref() != Some(&self.library) {
            local::save_templates(storage, self.library.templates());
            self.persisted.library = Some(self.library.clone());
        }
        if self.persisted.user.as_ref() != Some(&self.account.user) {
            local::save_user(storage, self.account.user.as_ref());
            self.persisted.user = Some(self.account.user.clone());
        }
    }

    /// Shows `message` in a blocking dialog.
    pub fn notify(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::debug!("Notification: {message}");
        self.notification = Some(message);
    }
}
