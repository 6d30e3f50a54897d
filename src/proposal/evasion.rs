//! Evasive decline control.
//!
//! Two phases, both bounded so the player always escapes in a finite number
//! of steps:
//!
//! - relocation: each trigger (proximity or click) moves the control to a
//!   random spot inside the safe area, until `max_moves` is spent;
//! - shrink: each click shrinks the decline control, grows the accept control
//!   and swaps in a more plaintive caption, until `vanish_threshold` clicks
//!   remove the control for good.

use crate::config::EvasionConfig;
use crate::rng::RandomSource;

/// Relocated position as percentages of the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub top_pct: f64,
    pub left_pct: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvasionPhase {
    Relocating,
    Shrinking,
    Vanished,
}

/// What a single trigger did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeclineOutcome {
    Relocated(Position),
    /// Last relocation trigger: the control snaps back into the layout.
    RelocationExhausted,
    Shrunk { clicks: u32 },
    Vanished,
    /// Not a qualifying trigger (wrong phase, settling, or already gone).
    Ignored,
}

/// How the decline control should currently be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct DeclineView<'a> {
    pub caption: &'a str,
    pub scale: f64,
    pub position: Option<Position>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvasionState {
    move_count: u32,
    shrink_click_count: u32,
    position: Option<Position>,
    last_relocation_ms: Option<f64>,
}

impl EvasionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn shrink_click_count(&self) -> u32 {
        self.shrink_click_count
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn phase(&self, cfg: &EvasionConfig) -> EvasionPhase {
        if self.move_count < cfg.max_moves {
            EvasionPhase::Relocating
        } else if self.shrink_click_count < cfg.vanish_threshold {
            EvasionPhase::Shrinking
        } else {
            EvasionPhase::Vanished
        }
    }

    /// Pointer entered the decline control's bounds.
    pub fn on_proximity(
        &mut self,
        cfg: &EvasionConfig,
        rng: &mut impl RandomSource,
        now_ms: f64,
    ) -> DeclineOutcome {
        if !cfg.hover_relocates || self.phase(cfg) != EvasionPhase::Relocating {
            return DeclineOutcome::Ignored;
        }
        self.relocate(cfg, rng, now_ms)
    }

    /// Explicit click on the decline control. Never declines.
    pub fn on_click(
        &mut self,
        cfg: &EvasionConfig,
        rng: &mut impl RandomSource,
        now_ms: f64,
    ) -> DeclineOutcome {
        match self.phase(cfg) {
            EvasionPhase::Relocating => self.relocate(cfg, rng, now_ms),
            EvasionPhase::Shrinking => {
                self.shrink_click_count += 1;
                if self.shrink_click_count >= cfg.vanish_threshold {
                    log::info!("decline control gave up after {} clicks", self.shrink_click_count);
                    DeclineOutcome::Vanished
                } else {
                    DeclineOutcome::Shrunk { clicks: self.shrink_click_count }
                }
            }
            EvasionPhase::Vanished => DeclineOutcome::Ignored,
        }
    }

    fn relocate(
        &mut self,
        cfg: &EvasionConfig,
        rng: &mut impl RandomSource,
        now_ms: f64,
    ) -> DeclineOutcome {
        if let Some(last) = self.last_relocation_ms {
            if now_ms - last < cfg.settle_ms {
                return DeclineOutcome::Ignored;
            }
        }
        self.last_relocation_ms = Some(now_ms);
        self.move_count += 1;
        if self.move_count >= cfg.max_moves {
            self.position = None;
            log::debug!("relocation exhausted, entering shrink phase");
            return DeclineOutcome::RelocationExhausted;
        }
        let area = cfg.safe_area;
        let pos = Position {
            top_pct: rng.range(area.min_pct, area.max_pct),
            left_pct: rng.range(area.min_pct, area.max_pct),
        };
        self.position = Some(pos);
        DeclineOutcome::Relocated(pos)
    }

    /// Caption/scale index; both saturate at the last caption.
    fn shrink_index(&self, cfg: &EvasionConfig) -> u32 {
        let last = cfg.captions.len().saturating_sub(1) as u32;
        self.shrink_click_count.min(last)
    }

    pub fn decline_scale(&self, cfg: &EvasionConfig) -> f64 {
        if self.phase(cfg) == EvasionPhase::Relocating {
            return 1.0;
        }
        let i = self.shrink_index(cfg) as f64;
        (1.0 - i * cfg.decline_step).max(cfg.decline_min_scale)
    }

    pub fn accept_scale(&self, cfg: &EvasionConfig) -> f64 {
        if self.phase(cfg) == EvasionPhase::Relocating {
            return 1.0;
        }
        let i = self.shrink_index(cfg) as f64;
        (1.0 + i * cfg.accept_step).min(cfg.accept_max_scale)
    }

    pub fn caption<'a>(&self, cfg: &'a EvasionConfig) -> &'a str {
        match self.phase(cfg) {
            EvasionPhase::Relocating => &cfg.initial_caption,
            _ => cfg
                .captions
                .get(self.shrink_index(cfg) as usize)
                .map(String::as_str)
                .unwrap_or(&cfg.initial_caption),
        }
    }

    /// `None` once the control has been removed.
    pub fn view<'a>(&self, cfg: &'a EvasionConfig) -> Option<DeclineView<'a>> {
        if self.phase(cfg) == EvasionPhase::Vanished {
            return None;
        }
        Some(DeclineView {
            caption: self.caption(cfg),
            scale: self.decline_scale(cfg),
            position: self.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::XorShift64;

    fn cfg() -> EvasionConfig {
        EvasionConfig { settle_ms: 0.0, ..EvasionConfig::default() }
    }

    fn exhaust_relocation(st: &mut EvasionState, cfg: &EvasionConfig, rng: &mut XorShift64) {
        for i in 0..cfg.max_moves {
            st.on_proximity(cfg, rng, i as f64 * 1_000.0);
        }
    }

    #[test]
    fn test_proximity_relocates_inside_safe_area() {
        let cfg = cfg();
        let mut rng = XorShift64::new(11);
        let mut st = EvasionState::new();
        for i in 0..cfg.max_moves - 1 {
            match st.on_proximity(&cfg, &mut rng, i as f64) {
                DeclineOutcome::Relocated(p) => {
                    assert!(cfg.safe_area.contains(p.top_pct));
                    assert!(cfg.safe_area.contains(p.left_pct));
                    assert_eq!(st.position(), Some(p));
                }
                other => panic!("expected relocation, got {other:?}"),
            }
            assert_eq!(st.move_count(), i + 1);
        }
    }

    #[test]
    fn test_last_move_clears_position() {
        let cfg = cfg();
        let mut rng = XorShift64::new(5);
        let mut st = EvasionState::new();
        exhaust_relocation(&mut st, &cfg, &mut rng);
        assert_eq!(st.move_count(), 10);
        assert_eq!(st.position(), None);
        assert_eq!(st.phase(&cfg), EvasionPhase::Shrinking);
        assert_eq!(st.on_proximity(&cfg, &mut rng, 99_999.0), DeclineOutcome::Ignored);
        assert_eq!(st.move_count(), 10);
    }

    #[test]
    fn test_click_counts_like_proximity_while_relocating() {
        let cfg = cfg();
        let mut rng = XorShift64::new(9);
        let mut st = EvasionState::new();
        assert!(matches!(st.on_click(&cfg, &mut rng, 0.0), DeclineOutcome::Relocated(_)));
        assert_eq!(st.move_count(), 1);
        assert_eq!(st.shrink_click_count(), 0);
    }

    #[test]
    fn test_hover_policy_off_ignores_proximity() {
        let cfg = EvasionConfig { hover_relocates: false, ..cfg() };
        let mut rng = XorShift64::new(1);
        let mut st = EvasionState::new();
        assert_eq!(st.on_proximity(&cfg, &mut rng, 0.0), DeclineOutcome::Ignored);
        assert_eq!(st.move_count(), 0);
    }

    #[test]
    fn test_settle_window_coalesces_triggers() {
        let cfg = EvasionConfig::default();
        let mut rng = XorShift64::new(2);
        let mut st = EvasionState::new();
        assert!(matches!(st.on_proximity(&cfg, &mut rng, 1_000.0), DeclineOutcome::Relocated(_)));
        assert_eq!(st.on_proximity(&cfg, &mut rng, 1_100.0), DeclineOutcome::Ignored);
        assert_eq!(st.on_click(&cfg, &mut rng, 1_200.0), DeclineOutcome::Ignored);
        assert_eq!(st.move_count(), 1);
        assert!(matches!(st.on_proximity(&cfg, &mut rng, 1_250.0), DeclineOutcome::Relocated(_)));
        assert_eq!(st.move_count(), 2);
    }

    #[test]
    fn test_shrink_phase_captions_and_scales() {
        let cfg = cfg();
        let mut rng = XorShift64::new(3);
        let mut st = EvasionState::new();
        exhaust_relocation(&mut st, &cfg, &mut rng);

        let (mut prev_no, mut prev_yes) = (st.decline_scale(&cfg), st.accept_scale(&cfg));
        assert_eq!(st.caption(&cfg), "No");
        for click in 1..cfg.vanish_threshold {
            assert_eq!(st.on_click(&cfg, &mut rng, 0.0), DeclineOutcome::Shrunk { clicks: click });
            let idx = (click as usize).min(cfg.captions.len() - 1);
            assert_eq!(st.caption(&cfg), cfg.captions[idx]);
            let (no, yes) = (st.decline_scale(&cfg), st.accept_scale(&cfg));
            assert!(no <= prev_no && no >= cfg.decline_min_scale);
            assert!(yes >= prev_yes && yes <= cfg.accept_max_scale);
            (prev_no, prev_yes) = (no, yes);
        }
        assert_eq!(st.on_click(&cfg, &mut rng, 0.0), DeclineOutcome::Vanished);
        assert!(st.view(&cfg).is_none());
        assert_eq!(st.on_click(&cfg, &mut rng, 0.0), DeclineOutcome::Ignored);
        assert_eq!(st.shrink_click_count(), cfg.vanish_threshold);
    }

    #[test]
    fn test_scales_clamp_with_long_threshold() {
        let cfg = EvasionConfig {
            vanish_threshold: 18,
            decline_step: 0.15,
            accept_step: 0.3,
            ..cfg()
        };
        let mut rng = XorShift64::new(4);
        let mut st = EvasionState::new();
        exhaust_relocation(&mut st, &cfg, &mut rng);
        for _ in 0..17 {
            st.on_click(&cfg, &mut rng, 0.0);
        }
        assert!((st.decline_scale(&cfg) - cfg.decline_min_scale).abs() < 1e-9);
        assert!((st.accept_scale(&cfg) - cfg.accept_max_scale).abs() < 1e-9);
        assert_eq!(st.caption(&cfg), "I'll be so sad...");
        assert!(st.view(&cfg).is_some());
    }

    #[test]
    fn test_initial_view() {
        let cfg = cfg();
        let st = EvasionState::new();
        let view = st.view(&cfg).unwrap();
        assert_eq!(view.caption, "No, I won't 😢");
        assert_eq!(view.scale, 1.0);
        assert_eq!(view.position, None);
        assert_eq!(st.accept_scale(&cfg), 1.0);
    }
}
