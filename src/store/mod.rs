//! Template and draft persistence.
//!
//! - `local` - draft, template mirror and identity in eframe's key-value storage
//! - `library` - the ordered in-memory template list shown in the editor
//! - `remote` - the hosted `templates` table, spoken to over PostgREST

mod library;
pub mod local;
mod remote;

pub use library::TemplateLibrary;
pub use remote::{classify_error, RemoteTemplateStore, StoreError};
