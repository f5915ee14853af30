#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    // Set up logging; RUST_LOG controls the level
    env_logger::init();

    label_designer::run_app(label_designer::Settings::from_env())
}

// The browser build starts through `start_web`.
#[cfg(target_arch = "wasm32")]
fn main() {}
