//! Host page sequence around the proposal: timed intro captions, the
//! mini-game stage, and the fade hand-off that starts the proposal.

use crate::config::PageConfig;
use crate::proposal::StepTimer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Intro(usize),
    /// Host mini-game is visible; waiting for completion or skip.
    Game,
    /// Fading the game out.
    Handoff,
    Proposal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageEvent {
    IntroAdvanced(usize),
    GameShown,
    HandoffStarted,
    ProposalReady,
}

pub struct PageFlow {
    config: PageConfig,
    stage: Stage,
    timer: StepTimer,
    /// Completion reported before the game stage; honoured once it is shown.
    completion_pending: bool,
    torn_down: bool,
}

impl PageFlow {
    pub fn start(config: PageConfig, now_ms: f64) -> Self {
        let mut timer = StepTimer::new();
        let stage = if config.intro_lines.is_empty() {
            Stage::Game
        } else {
            timer.arm(now_ms, config.intro_hold_ms);
            Stage::Intro(0)
        };
        Self {
            config,
            stage,
            timer,
            completion_pending: false,
            torn_down: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Caption for the current intro stage.
    pub fn intro_line(&self) -> Option<&str> {
        match self.stage {
            Stage::Intro(i) => self.config.intro_lines.get(i).map(String::as_str),
            _ => None,
        }
    }

    pub fn tick(&mut self, now_ms: f64) -> Option<PageEvent> {
        if self.torn_down || !self.timer.poll(now_ms) {
            return None;
        }
        match self.stage {
            Stage::Intro(i) if i + 1 < self.config.intro_lines.len() => {
                self.stage = Stage::Intro(i + 1);
                self.timer.arm(now_ms, self.config.intro_hold_ms);
                Some(PageEvent::IntroAdvanced(i + 1))
            }
            Stage::Intro(_) => {
                self.stage = Stage::Game;
                if self.completion_pending {
                    // Hand off on the next tick so `GameShown` is still reported.
                    self.timer.arm(now_ms, 0.0);
                }
                Some(PageEvent::GameShown)
            }
            Stage::Game if self.completion_pending => {
                self.completion_pending = false;
                self.begin_handoff(now_ms)
            }
            Stage::Handoff => {
                self.stage = Stage::Proposal;
                log::info!("hand-off complete, starting proposal");
                Some(PageEvent::ProposalReady)
            }
            Stage::Game | Stage::Proposal => None,
        }
    }

    /// Mini-game finished, or the hidden skip control was pressed. Only the
    /// first call counts. A call during the intro is remembered and starts the
    /// hand-off right after the game stage is shown.
    pub fn game_completed(&mut self, now_ms: f64) -> Option<PageEvent> {
        match self.stage {
            _ if self.torn_down => None,
            Stage::Intro(_) => {
                if !self.completion_pending {
                    log::debug!("game completed during the intro, deferring hand-off");
                    self.completion_pending = true;
                }
                None
            }
            Stage::Game if !self.completion_pending => self.begin_handoff(now_ms),
            stage => {
                log::debug!("ignoring game completion in stage {stage:?}");
                None
            }
        }
    }

    fn begin_handoff(&mut self, now_ms: f64) -> Option<PageEvent> {
        self.stage = Stage::Handoff;
        self.timer.arm(now_ms, self.config.handoff_ms);
        Some(PageEvent::HandoffStarted)
    }

    /// Fade progress in `[0, 1]` during the hand-off.
    pub fn handoff_progress(&self, now_ms: f64) -> f64 {
        match (self.stage, self.timer.remaining_ms(now_ms)) {
            (Stage::Handoff, Some(rem)) => (1.0 - rem / self.config.handoff_ms).clamp(0.0, 1.0),
            (Stage::Proposal, _) => 1.0,
            _ => 0.0,
        }
    }

    /// Cancel the pending timer. Nothing fires afterwards.
    pub fn teardown(&mut self) {
        self.timer.cancel();
        self.completion_pending = false;
        self.torn_down = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intro_then_game() {
        let mut p = PageFlow::start(PageConfig::default(), 0.0);
        assert_eq!(p.stage(), Stage::Intro(0));
        assert_eq!(p.intro_line(), Some("Little foreplay first"));
        assert_eq!(p.tick(2_499.0), None);
        assert_eq!(p.tick(2_500.0), Some(PageEvent::IntroAdvanced(1)));
        assert_eq!(p.intro_line(), Some("Pair the photos"));
        assert_eq!(p.tick(5_000.0), Some(PageEvent::GameShown));
        assert_eq!(p.stage(), Stage::Game);
        assert_eq!(p.tick(1e9), None);
    }

    #[test]
    fn test_completion_during_intro_is_deferred() {
        let mut p = PageFlow::start(PageConfig::default(), 0.0);
        assert_eq!(p.game_completed(100.0), None);
        assert_eq!(p.game_completed(200.0), None);
        assert_eq!(p.stage(), Stage::Intro(0));

        assert_eq!(p.tick(2_500.0), Some(PageEvent::IntroAdvanced(1)));
        assert_eq!(p.tick(5_000.0), Some(PageEvent::GameShown));
        assert_eq!(p.tick(5_016.0), Some(PageEvent::HandoffStarted));
        assert_eq!(p.stage(), Stage::Handoff);
        // The skip control pressed during the fade changes nothing.
        assert_eq!(p.game_completed(5_100.0), None);
        assert_eq!(p.tick(7_015.0), None);
        assert_eq!(p.tick(7_016.0), Some(PageEvent::ProposalReady));
        assert_eq!(p.tick(20_000.0), None);
    }

    #[test]
    fn test_skip_and_completion_hand_off_once() {
        let cfg = PageConfig { intro_lines: vec![], ..PageConfig::default() };
        let mut p = PageFlow::start(cfg, 0.0);
        assert_eq!(p.stage(), Stage::Game);
        assert_eq!(p.game_completed(1_000.0), Some(PageEvent::HandoffStarted));
        assert_eq!(p.game_completed(1_500.0), None);
        assert!((p.handoff_progress(2_000.0) - 0.5).abs() < 1e-9);
        assert_eq!(p.tick(2_999.0), None);
        assert_eq!(p.tick(3_000.0), Some(PageEvent::ProposalReady));
        assert_eq!(p.tick(9_000.0), None);
        assert_eq!(p.stage(), Stage::Proposal);
        assert_eq!(p.handoff_progress(9_000.0), 1.0);
    }

    #[test]
    fn test_teardown_stops_intro() {
        let mut p = PageFlow::start(PageConfig::default(), 0.0);
        p.teardown();
        assert_eq!(p.tick(10_000.0), None);
        assert_eq!(p.stage(), Stage::Intro(0));
    }

    #[test]
    fn test_completion_after_teardown_does_nothing() {
        let cfg = PageConfig { intro_lines: vec![], ..PageConfig::default() };
        let mut p = PageFlow::start(cfg, 0.0);
        p.teardown();
        assert_eq!(p.game_completed(10.0), None);
        assert_eq!(p.tick(5_000.0), None);
        assert_eq!(p.stage(), Stage::Game);
    }

    #[test]
    fn test_teardown_cancels_deferred_completion() {
        let mut p = PageFlow::start(PageConfig::default(), 0.0);
        p.game_completed(100.0);
        p.teardown();
        assert_eq!(p.tick(60_000.0), None);
        assert_eq!(p.stage(), Stage::Intro(0));
    }
}
