//! Configuration records for the page, the proposal flow and its assets.
//!
//! Every field has a default reproducing the original page, so
//! `AppConfig::default()` works out of the box. With the `serde` feature all
//! records (de)serialize with per-field defaults, so a JSON config only needs
//! the keys it changes.

use crate::error::ConfigError;
use crate::fireworks::FireworksConfig;

/// Decline captions shown during the shrink phase, indexed by click count.
pub const DEFAULT_DECLINE_CAPTIONS: &[&str] = &[
    "No",
    "Are you sure?",
    "Are you very sure?",
    "Don't you like me?",
    "Please?",
    "Pretty please?",
    "Say yes 😢",
    "I'll be so sad...",
];

/// Intro captions shown before the mini-game.
pub const DEFAULT_INTRO_LINES: &[&str] = &["Little foreplay first", "Pair the photos"];

/// Root configuration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct AppConfig {
    pub page: PageConfig,
    pub flow: FlowConfig,
    pub assets: AssetConfig,
    pub fireworks: FireworksConfig,
}

impl AppConfig {
    /// Reject constants that would break the flow's bounded-escape guarantee.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.page.validate()?;
        self.flow.validate()?;
        check_dwell("fireworks burst", self.fireworks.burst_interval_ms)?;
        check_dwell("fireworks particle", self.fireworks.particle_life_ms)
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Host page sequence before the proposal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct PageConfig {
    pub intro_lines: Vec<String>,
    pub intro_hold_ms: f64,
    /// Fade between the mini-game and the proposal.
    pub handoff_ms: f64,
    pub footer: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            intro_lines: DEFAULT_INTRO_LINES.iter().map(|s| s.to_string()).collect(),
            intro_hold_ms: 2_500.0,
            handoff_ms: 2_000.0,
            footer: "Fill the heart out".into(),
        }
    }
}

impl PageConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.intro_lines.is_empty() {
            check_dwell("intro", self.intro_hold_ms)?;
        }
        check_dwell("handoff", self.handoff_ms)
    }
}

/// Proposal step timing, evasion tunables and copy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct FlowConfig {
    pub celebration_dwell_ms: f64,
    pub surprise_dwell_ms: f64,
    /// `None` skips the transitional step: accept goes straight to the finale.
    pub transition_dwell_ms: Option<f64>,
    pub evasion: EvasionConfig,
    pub texts: FlowTexts,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            celebration_dwell_ms: 5_000.0,
            surprise_dwell_ms: 5_000.0,
            transition_dwell_ms: None,
            evasion: EvasionConfig::default(),
            texts: FlowTexts::default(),
        }
    }
}

impl FlowConfig {
    pub fn with_dwell_ms(mut self, celebration: f64, surprise: f64) -> Self {
        self.celebration_dwell_ms = celebration;
        self.surprise_dwell_ms = surprise;
        self
    }

    pub fn with_transition_ms(mut self, dwell: Option<f64>) -> Self {
        self.transition_dwell_ms = dwell;
        self
    }

    pub fn with_hover_relocates(mut self, on: bool) -> Self {
        self.evasion.hover_relocates = on;
        self
    }

    pub fn with_vanish_threshold(mut self, clicks: u32) -> Self {
        self.evasion.vanish_threshold = clicks;
        self
    }

    pub fn with_scale_steps(mut self, decline: f64, accept: f64) -> Self {
        self.evasion.decline_step = decline;
        self.evasion.accept_step = accept;
        self
    }

    pub fn with_settle_ms(mut self, settle: f64) -> Self {
        self.evasion.settle_ms = settle;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dwell("celebration", self.celebration_dwell_ms)?;
        check_dwell("surprise", self.surprise_dwell_ms)?;
        if let Some(ms) = self.transition_dwell_ms {
            check_dwell("transition", ms)?;
        }
        self.evasion.validate()
    }
}

/// Tunables of the relocate-then-shrink behaviour.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct EvasionConfig {
    pub max_moves: u32,
    /// Shrink-phase clicks after which the decline control disappears.
    pub vanish_threshold: u32,
    /// Whether pointer proximity relocates like a click does.
    pub hover_relocates: bool,
    /// Triggers within this window after a relocation are coalesced.
    pub settle_ms: f64,
    pub safe_area: SafeArea,
    pub decline_step: f64,
    pub decline_min_scale: f64,
    pub accept_step: f64,
    pub accept_max_scale: f64,
    pub initial_caption: String,
    pub captions: Vec<String>,
}

impl Default for EvasionConfig {
    fn default() -> Self {
        Self {
            max_moves: 10,
            vanish_threshold: 8,
            hover_relocates: true,
            settle_ms: 250.0,
            safe_area: SafeArea::default(),
            decline_step: 0.1,
            decline_min_scale: 0.2,
            accept_step: 0.1,
            accept_max_scale: 2.0,
            initial_caption: "No, I won't 😢".into(),
            captions: DEFAULT_DECLINE_CAPTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EvasionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.captions.is_empty() {
            return Err(ConfigError::EmptyCaptions);
        }
        if self.vanish_threshold == 0 {
            return Err(ConfigError::VanishThreshold);
        }
        self.safe_area.validate()?;
        for step in [self.decline_step, self.accept_step] {
            if !step.is_finite() || step < 0.0 {
                return Err(ConfigError::ScaleStep(step));
            }
        }
        if !(self.decline_min_scale > 0.0 && self.decline_min_scale <= 1.0) {
            return Err(ConfigError::DeclineFloor(self.decline_min_scale));
        }
        if !(self.accept_max_scale.is_finite() && self.accept_max_scale >= 1.0) {
            return Err(ConfigError::AcceptCap(self.accept_max_scale));
        }
        if !(self.settle_ms.is_finite() && self.settle_ms >= 0.0) {
            return Err(ConfigError::Settle(self.settle_ms));
        }
        Ok(())
    }
}

/// Percentage-of-viewport band used for both `top` and `left` of a relocated
/// control. The upper bound leaves room for the control itself.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SafeArea {
    pub min_pct: f64,
    pub max_pct: f64,
}

impl Default for SafeArea {
    fn default() -> Self {
        Self { min_pct: 0.0, max_pct: 80.0 }
    }
}

impl SafeArea {
    pub fn contains(&self, pct: f64) -> bool {
        pct >= self.min_pct && pct <= self.max_pct
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let ok = self.min_pct >= 0.0 && self.min_pct < self.max_pct && self.max_pct <= 100.0;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::SafeArea { min: self.min_pct, max: self.max_pct })
        }
    }
}

/// Copy shown on each proposal step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct FlowTexts {
    pub celebration: String,
    pub surprise: String,
    pub question: String,
    pub accept_label: String,
    pub transition: String,
    pub finale: String,
    pub finale_note: String,
}

impl Default for FlowTexts {
    fn default() -> Self {
        Self {
            celebration: "Congratulations! You have completed the game.".into(),
            surprise: "I have a surprise for you!".into(),
            question: "Will you be my Valentine?".into(),
            accept_label: "Yes, I will! 🥰".into(),
            transition: "Yay!!! 🎉".into(),
            finale: "Thank you for accepting, I love you! 💕".into(),
            finale_note: "For more information, write me!!! 💌".into(),
        }
    }
}

/// Logical asset paths and the sub-path the page is served from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct AssetConfig {
    /// e.g. `/Valentines` when hosted under a repository sub-path.
    pub base_path: String,
    pub question_image: String,
    pub finale_image: String,
    pub font_family: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            question_image: "/sad_hamster.png".into(),
            finale_image: "/game-photos/HereHere.gif".into(),
            font_family: "'Playfair Display', serif".into(),
        }
    }
}

impl AssetConfig {
    /// Resolve a logical path against `base_path`.
    pub fn url(&self, logical: &str) -> String {
        let base = self.base_path.trim_end_matches('/');
        let path = logical.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

fn check_dwell(step: &'static str, ms: f64) -> Result<(), ConfigError> {
    if ms.is_finite() && ms > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Dwell { step, ms })
    }
}
