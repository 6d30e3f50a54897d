//! Valentine proposal core crate.
//!
//! The page runs an intro, hands a slot to the host's photo-pairing mini-game,
//! then plays the proposal: two timed messages, the question with its evasive
//! No button, and a fireworks finale. State machines (`page`, `proposal`) are
//! plain Rust driven by timestamps; the `app` layer mounts the DOM and drives
//! them from `requestAnimationFrame`.
//!
//! Host contract: call `start_valentine()`, mount the mini-game into `#vp-game`,
//! call `game_completed()` when it is solved, and listen for
//! `valentine:accepted` on `document`.

use wasm_bindgen::prelude::*;

mod app;
pub mod config;
pub mod error;
pub mod fireworks;
pub mod page;
pub mod proposal;
pub mod rng;

pub use config::{
    AppConfig, AssetConfig, DEFAULT_DECLINE_CAPTIONS, DEFAULT_INTRO_LINES, EvasionConfig,
    FlowConfig, FlowTexts, PageConfig, SafeArea,
};
pub use error::{ConfigError, Error};
pub use page::{PageEvent, PageFlow, Stage};
pub use proposal::{
    DeclineOutcome, EvasionPhase, EvasionState, FlowEvent, Position, ProposalFlow, Step,
};
pub use rng::{RandomSource, XorShift64};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) is harmless.
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_valentine() -> Result<(), JsValue> {
    app::start(AppConfig::default())?;
    Ok(())
}

/// Start with a JSON config; missing keys keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_valentine_with_config(json: &str) -> Result<(), JsValue> {
    let config = AppConfig::from_json(json).map_err(|err| {
        log::warn!("rejecting config: {err}");
        Error::from(err)
    })?;
    app::start(config)?;
    Ok(())
}

/// The host's mini-game was solved. Extra calls are ignored.
#[wasm_bindgen]
pub fn game_completed() {
    app::game_completed();
}

/// Cancel timers, stop the frame loop and remove the mounted DOM.
#[wasm_bindgen]
pub fn teardown() {
    app::teardown();
}

pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
