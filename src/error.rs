//! Error types. The state machines themselves cannot fail; these cover config
//! validation and the browser glue.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// A configuration constant that would break the flow.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("decline captions must not be empty")]
    EmptyCaptions,
    #[error("vanish threshold must be at least one click")]
    VanishThreshold,
    #[error("safe area {min}%..{max}% must satisfy 0 <= min < max <= 100")]
    SafeArea { min: f64, max: f64 },
    #[error("{step} dwell must be a positive duration, got {ms} ms")]
    Dwell { step: &'static str, ms: f64 },
    #[error("scale step {0} must be finite and non-negative")]
    ScaleStep(f64),
    #[error("decline scale floor {0} must be in (0, 1]")]
    DeclineFloor(f64),
    #[error("accept scale cap {0} must be at least 1")]
    AcceptCap(f64),
    #[error("settle window {0} ms must be finite and non-negative")]
    Settle(f64),
    #[error("invalid config JSON: {0}")]
    Json(String),
}

#[cfg(feature = "serde_json")]
impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}

/// Failures while mounting or driving the page in a browser.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("document has no body")]
    NoBody,
    #[error("2d canvas context unavailable")]
    NoCanvasContext,
    #[error("element #{0} has an unexpected type")]
    ElementType(&'static str),
    #[error("javascript error: {0}")]
    Js(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
