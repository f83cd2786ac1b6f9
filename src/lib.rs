//! ScriptAssist — photograph a handwritten prescription, get structured
//! medicine details back.
//!
//! Domains:
//!   - capture       — file and camera acquisition into an `ImagePayload`
//!   - llm           — extraction prompt, schema, and the Gemini invoker
//!   - prescription  — the editable record, edits, and the text summary
//!   - session       — the screen state machine
//!   - export        — clipboard copy and share with fallback
//!   - pipeline      — `SessionController`, wiring the above together
//!   - settings      — config file, env overrides, credentials

pub mod capture;
pub mod error;
pub mod export;
pub mod llm;
pub mod notice;
pub mod pipeline;
pub mod prescription;
pub mod session;
pub mod settings;

use std::sync::Arc;

pub use pipeline::SessionController;

/// Initialise env_logger. `RUST_LOG` wins; otherwise `info`, or `debug`
/// when verbose.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_target(false)
        .try_init();
}

/// Controller with the production backends: Gemini, system clipboard, the
/// platform camera (`camera` feature) and no share sheet.
pub fn default_controller(config: &settings::AppConfig) -> SessionController {
    let api_key = settings::resolve_api_key();
    settings::warn_if_missing_api_key(api_key.as_deref());
    log::info!("[STARTUP] Model: {}", config.model);

    SessionController::new(
        config.session_options(),
        Arc::new(llm::GeminiExtractor::new(config, api_key)),
        capture::platform_camera(),
        Arc::new(export::SystemClipboard),
        Arc::new(export::NoShareSheet),
    )
}
