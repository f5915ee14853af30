//! Label file import/export and logo upload.
//!
//! Native builds go through `rfd` dialogs on the tokio runtime. Web builds
//! use a temporary `<input type="file">` for picking and a blob download
//! for saving.

use base64::Engine;
use eframe::egui;

use super::state::LabelDesignerApp;
use super::tasks::{spawn_task, TaskResult};
use crate::types::LabelConfig;

/// Builds a `data:` URI for an image, or `None` if the bytes are not a known image format.
pub(crate) fn encode_data_uri(bytes: &[u8]) -> Option<String> {
    let format = image::guess_format(bytes).ok()?;
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    Some(format!("data:{};base64,{payload}", format.to_mime_type()))
}

/// Payload bytes of a base64 `data:` URI.
pub(crate) fn decode_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.trim().strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .ok()
}

/// What a file picker should accept.
#[derive(Debug, Clone, Copy)]
pub(crate) enum FileKind {
    Json,
    Image,
    Svg,
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    Png,
}

impl FileKind {
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    fn filter_name(self) -> &'static str {
        match self {
            FileKind::Json => "JSON",
            FileKind::Image => "Imagem",
            FileKind::Svg => "SVG",
            FileKind::Png => "PNG",
        }
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            FileKind::Json => &["json"],
            FileKind::Image => &["png", "jpg", "jpeg", "gif", "webp"],
            FileKind::Svg => &["svg"],
            FileKind::Png => &["png"],
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn mime(self) -> &'static str {
        match self {
            FileKind::Json => "application/json",
            FileKind::Image => "image/*",
            FileKind::Svg => "image/svg+xml",
            FileKind::Png => "image/png",
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn accept(self) -> String {
        let mut accept: Vec<String> = self.extensions().iter().map(|ext| format!(".{ext}")).collect();
        accept.push(self.mime().to_string());
        accept.join(",")
    }
}

impl LabelDesignerApp {
    /// Replaces the working configuration with a label file's content.
    ///
    /// The document is merged over the defaults. Anything unreadable leaves
    /// the configuration untouched and shows "Erro no arquivo".
    pub fn import_config_json(&mut self, json: &str) -> bool {
        match LabelConfig::from_json(json) {
            Ok(config) => {
                self.config = config;
                log::info!("Imported label configuration");
                true
            }
            Err(err) => {
                log::error!("Failed to parse label file: {err}");
                self.notify("Erro no arquivo");
                false
            }
        }
    }

    /// Stores an uploaded image as the logo.
    pub fn set_logo_from_bytes(&mut self, bytes: &[u8]) -> bool {
        match encode_data_uri(bytes) {
            Some(uri) => {
                self.config.logo_url = uri;
                true
            }
            None => {
                log::error!("Unsupported logo image ({} bytes)", bytes.len());
                self.notify("Imagem não suportada.");
                false
            }
        }
    }

    /// Removes the logo, bringing back the placeholder.
    pub fn clear_logo(&mut self) {
        self.config.logo_url.clear();
    }

    /// Saves the working configuration as a JSON file.
    pub fn export_config(&mut self, ctx: &egui::Context) {
        match self.config.to_json() {
            Ok(json) => {
                let file_name = self.config.export_file_name();
                self.save_file(ctx, &file_name, FileKind::Json, json.into_bytes());
            }
            Err(err) => {
                log::error!("Failed to serialize label: {err}");
                self.notify(format!("Falha ao exportar: {err}"));
            }
        }
    }

    /// Lets the user pick a label file to import.
    pub fn import_config(&mut self, ctx: &egui::Context) {
        self.pick_file(ctx, FileKind::Json);
    }

    /// Lets the user pick a logo image.
    pub fn upload_logo(&mut self, ctx: &egui::Context) {
        self.pick_file(ctx, FileKind::Image);
    }

    /// Offers `bytes` for saving under `file_name`.
    #[cfg(not(target_arch = "wasm32"))]
    pub(crate) fn save_file(&mut self, ctx: &egui::Context, file_name: &str, kind: FileKind, bytes: Vec<u8>) {
        let file_name = file_name.to_string();
        spawn_task(ctx, self.tasks.sender.clone(), async move {
            let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter(kind.filter_name(), kind.extensions())
                .set_file_name(&file_name)
                .save_file()
                .await
            else {
                return TaskResult::DialogCancelled;
            };
            let path = handle.path();
            match std::fs::write(path, bytes) {
                Ok(()) => TaskResult::FileSaved(path.display().to_string()),
                Err(err) => TaskResult::FileFailed(format!("Falha ao salvar arquivo: {err}")),
            }
        });
    }

    /// Offers `bytes` for saving under `file_name`.
    #[cfg(target_arch = "wasm32")]
    pub(crate) fn save_file(&mut self, _ctx: &egui::Context, file_name: &str, kind: FileKind, bytes: Vec<u8>) {
        match Self::trigger_download(file_name, &bytes, kind.mime()) {
            Ok(()) => log::info!("Downloaded {file_name}"),
            Err(err) => {
                log::error!("Download failed: {err}");
                self.notify(format!("Falha ao salvar arquivo: {err}"));
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn pick_file(&mut self, ctx: &egui::Context, kind: FileKind) {
        spawn_task(ctx, self.tasks.sender.clone(), async move {
            let Some(handle) = rfd::AsyncFileDialog::new()
                .add_filter(kind.filter_name(), kind.extensions())
                .pick_file()
                .await
            else {
                return TaskResult::DialogCancelled;
            };
            match std::fs::read(handle.path()) {
                Ok(bytes) => picked_file_result(kind, bytes),
                Err(err) => TaskResult::FileFailed(format!("Falha ao ler arquivo: {err}")),
            }
        });
    }

    #[cfg(target_arch = "wasm32")]
    fn pick_file(&mut self, ctx: &egui::Context, kind: FileKind) {
        spawn_task(ctx, self.tasks.sender.clone(), async move {
            let Some(file) = Self::show_open_file_picker(&kind.accept()).await else {
                return TaskResult::DialogCancelled;
            };
            match Self::read_file(file).await {
                Ok(bytes) => picked_file_result(kind, bytes),
                Err(err) => TaskResult::FileFailed(err),
            }
        });
    }

    /// Downloads `content` through a temporary anchor and blob URL.
    #[cfg(target_arch = "wasm32")]
    pub(crate) fn trigger_download(filename: &str, content: &[u8], mime: &str) -> Result<(), String> {
        use wasm_bindgen::JsCast;

        let window = web_sys::window().ok_or("No window found")?;
        let document = window.document().ok_or("No document found")?;

        let url = Self::blob_url(content, mime)?;
        let anchor = document
            .create_element("a")
            .map_err(|_| "Failed to create anchor element")?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|_| "Failed to cast to anchor element")?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        let body = document.body().ok_or("No body found")?;
        body.append_child(&anchor).map_err(|_| "Failed to append anchor")?;
        anchor.click();
        body.remove_child(&anchor).map_err(|_| "Failed to remove anchor")?;

        web_sys::Url::revoke_object_url(&url).map_err(|_| "Failed to revoke object URL")?;
        Ok(())
    }

    /// Object URL of a blob holding `content`.
    #[cfg(target_arch = "wasm32")]
    pub(crate) fn blob_url(content: &[u8], mime: &str) -> Result<String, String> {
        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(content));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type(mime);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|_| "Failed to create blob")?;
        web_sys::Url::create_object_url_with_blob(&blob).map_err(|_| "Failed to create object URL".to_string())
    }

    /// Waits for the user to pick a file through a hidden input.
    #[cfg(target_arch = "wasm32")]
    async fn show_open_file_picker(accept: &str) -> Option<web_sys::File> {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?.document()?;
        let input = document
            .create_element("input")
            .ok()?
            .dyn_into::<web_sys::HtmlInputElement>()
            .ok()?;
        input.set_type("file");
        input.set_accept(accept);
        input.style().set_property("display", "none").ok()?;

        let (sender, receiver) = futures::channel::oneshot::channel::<Option<web_sys::File>>();
        let sender = std::rc::Rc::new(std::cell::RefCell::new(Some(sender)));
        let onchange = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let file = event
                .target()
                .and_then(|target| target.dyn_into::<web_sys::HtmlInputElement>().ok())
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(file);
            }
        }) as Box<dyn FnMut(_)>);
        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();

        let body = document.body()?;
        body.append_child(&input).ok()?;
        input.click();
        let file = receiver.await.ok().flatten();
        body.remove_child(&input).ok()?;
        file
    }

    /// Reads a picked file into memory.
    #[cfg(target_arch = "wasm32")]
    async fn read_file(file: web_sys::File) -> Result<Vec<u8>, String> {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::JsValue;

        let reader = web_sys::FileReader::new().map_err(|_| "Failed to create FileReader".to_string())?;
        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            let loaded = reader.clone();
            let onload = wasm_bindgen::closure::Closure::wrap(Box::new(move |_event: web_sys::ProgressEvent| {
                if let Ok(result) = loaded.result() {
                    let _ = resolve.call1(&JsValue::NULL, &result);
                }
            }) as Box<dyn FnMut(_)>);
            reader.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();

            let onerror = wasm_bindgen::closure::Closure::wrap(Box::new(move |_event: web_sys::ProgressEvent| {
                let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("Failed to read file"));
            }) as Box<dyn FnMut(_)>);
            reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        });

        reader
            .read_as_array_buffer(&file)
            .map_err(|_| "Failed to start reading file".to_string())?;
        let buffer = wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|err| format!("Failed to read file: {err:?}"))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

/// Turns the bytes of a picked file into the task result for its kind.
///
/// A label file that is not UTF-8 fails the same way as malformed JSON.
fn picked_file_result(kind: FileKind, bytes: Vec<u8>) -> TaskResult {
    match kind {
        FileKind::Json => match String::from_utf8(bytes) {
            Ok(content) => TaskResult::ConfigFileRead(content),
            Err(err) => {
                log::warn!("Label file is not UTF-8: {err}");
                TaskResult::FileFailed("Erro no arquivo".to_string())
            }
        },
        _ => TaskResult::LogoFileRead(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG: [u8; 67] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
        0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
        0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
        0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_png_becomes_a_png_data_uri() {
        let uri = encode_data_uri(&PNG).unwrap();
        assert!(uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
        assert_eq!(decode_data_uri(&uri).unwrap(), PNG.to_vec());
    }

    #[test]
    fn test_unknown_bytes_are_not_an_image() {
        assert!(encode_data_uri(b"just some text").is_none());
    }

    #[test]
    fn test_non_utf8_label_file_reports_file_error() {
        let result = picked_file_result(FileKind::Json, vec![0xff, 0xfe, b'{']);
        assert!(matches!(result, TaskResult::FileFailed(ref msg) if msg == "Erro no arquivo"));

        let result = picked_file_result(FileKind::Json, b"{}".to_vec());
        assert!(matches!(result, TaskResult::ConfigFileRead(ref json) if json == "{}"));
    }

    #[test]
    fn test_logo_bytes_pass_through_untouched() {
        let result = picked_file_result(FileKind::Image, PNG.to_vec());
        assert!(matches!(result, TaskResult::LogoFileRead(ref bytes) if bytes.as_slice() == PNG));
    }

    #[test]
    fn test_decode_rejects_other_uris() {
        assert!(decode_data_uri("https://empresa.com.br/logo.png").is_none());
        assert!(decode_data_uri("data:image/svg+xml,<svg/>").is_none());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_none());
    }
}
