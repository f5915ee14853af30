//! Shared application-wide constants.
//! Centralizes tweakable values used across rendering, validation and persistence.

// Physical units
/// Pixels per millimetre used by the preview and every export (96 dpi).
pub const MM_TO_PX: f32 = 3.78;

// Validation
/// Narrowest printable label width in millimetres.
pub const MIN_LABEL_WIDTH_MM: f32 = 20.0;

// Text metrics
/// Average glyph advance as a fraction of the font size, used for wrapping.
pub const CHAR_WIDTH_FACTOR: f32 = 0.55;
/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.25;

// Nutrition table
/// Font size of the nutrition table title.
pub const NUTRITION_TITLE_SIZE: f32 = 8.0;
/// Font size of the nutrition table header and rows.
pub const NUTRITION_ROW_SIZE: f32 = 6.0;
/// Font size of the nutrition disclaimer line.
pub const NUTRITION_NOTE_SIZE: f32 = 5.0;
/// Inner padding of the nutrition frame.
pub const NUTRITION_PADDING: f32 = 4.0;

// Section captions ("Ingredientes", "Lote:" ...)
/// Font size of small section captions.
pub const CAPTION_SIZE: f32 = 8.0;
/// Font size of the batch/expiry captions.
pub const SMALL_CAPTION_SIZE: f32 = 7.0;

// Logo placeholder
/// Edge length of the square shown when no logo is configured.
pub const LOGO_PLACEHOLDER_SIZE: f32 = 48.0;

// Barcode
/// Font size of the human readable line under the bars.
pub const BARCODE_TEXT_SIZE: f32 = 8.0;

// Local storage keys
/// Working configuration, written on every edit.
pub const DRAFT_KEY: &str = "labelmaster_current_draft";
/// Saved template list (local mirror).
pub const TEMPLATES_KEY: &str = "labelmaster_templates";
/// Cached signed-in identity.
pub const USER_KEY: &str = "labelmaster_github_user";
/// Editor preferences (panel width, theme).
pub const UI_PREFS_KEY: &str = "app_state";

// Remote storage
/// Name of the remote template table.
pub const TEMPLATES_TABLE: &str = "templates";

/// Script that creates the remote template table with an open access policy.
pub const SQL_SETUP: &str = r#"-- Script SQL para Supabase
create table public.templates (
  id uuid primary key default gen_random_uuid(),
  name text not null,
  config jsonb not null,
  created_at timestamp with time zone default now()
);
alter table public.templates enable row level security;
create policy "Acesso público" on public.templates for all using (true) with check (true);"#;

// Content assist
/// Generative model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
/// Base URL of the generative language API.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// HTTP
/// Request timeout applied to every outbound call unless configured otherwise.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// Sign-in
/// Where the OAuth provider sends desktop users back; the resulting URL is pasted into the app.
pub const AUTH_REDIRECT_URL: &str = "http://localhost:3000/";

// Export
/// Raster scale of PNG exports relative to the 96 dpi preview.
pub const PNG_EXPORT_SCALE: f32 = 3.125;
/// File written for the platform print viewer.
pub const PRINT_FILE_NAME: &str = "etiqueta-impressao.html";
/// How long the browser print page's object URL stays alive, in milliseconds.
pub const PRINT_URL_LIFETIME_MS: i32 = 60_000;

// Editor panel
/// Default width of the editor side panel.
pub const EDITOR_PANEL_WIDTH: f32 = 450.0;
/// Narrowest the editor side panel may get.
pub const EDITOR_PANEL_MIN_WIDTH: f32 = 320.0;
