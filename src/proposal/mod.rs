//! Proposal step sequence.
//!
//! `Celebration` and `Surprise` auto-advance on their dwell timers, `Question`
//! waits for the accept control, the optional `Transition` auto-advances again
//! and `Finale` is terminal. Steps only ever move forward. The flow is driven
//! entirely by explicit calls with a `performance.now()` timestamp, so it runs
//! the same under the browser frame loop and in native tests.

use crate::config::FlowConfig;
use crate::rng::{RandomSource, XorShift64};

pub mod evasion;
pub mod timer;

pub use evasion::{DeclineOutcome, DeclineView, EvasionPhase, EvasionState, Position};
pub use timer::StepTimer;

/// Proposal step. Discriminants are the step indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Celebration = 0,
    Surprise = 1,
    Question = 2,
    Transition = 3,
    Finale = 4,
}

impl Step {
    pub fn index(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowEvent {
    Advanced { from: Step, to: Step },
    /// Emitted once, when the accept control is activated.
    Accepted,
}

pub struct ProposalFlow<R: RandomSource = XorShift64> {
    config: FlowConfig,
    step: Step,
    timer: StepTimer,
    evasion: EvasionState,
    rng: R,
    accepted: bool,
    torn_down: bool,
}

impl<R: RandomSource> ProposalFlow<R> {
    /// Enter the first step and arm its dwell timer.
    pub fn start(config: FlowConfig, rng: R, now_ms: f64) -> Self {
        let mut flow = Self {
            config,
            step: Step::Celebration,
            timer: StepTimer::new(),
            evasion: EvasionState::new(),
            rng,
            accepted: false,
            torn_down: false,
        };
        flow.enter(Step::Celebration, now_ms);
        flow
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn evasion(&self) -> &EvasionState {
        &self.evasion
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub fn is_finished(&self) -> bool {
        self.step == Step::Finale
    }

    pub fn timer(&self) -> &StepTimer {
        &self.timer
    }

    fn dwell_ms(&self, step: Step) -> Option<f64> {
        match step {
            Step::Celebration => Some(self.config.celebration_dwell_ms),
            Step::Surprise => Some(self.config.surprise_dwell_ms),
            Step::Transition => self.config.transition_dwell_ms,
            Step::Question | Step::Finale => None,
        }
    }

    fn successor(&self, step: Step) -> Step {
        match step {
            Step::Celebration => Step::Surprise,
            Step::Surprise => Step::Question,
            Step::Question if self.config.transition_dwell_ms.is_some() => Step::Transition,
            Step::Question | Step::Transition | Step::Finale => Step::Finale,
        }
    }

    /// Switch step; the previous step's timer never survives the switch.
    fn enter(&mut self, step: Step, now_ms: f64) {
        self.timer.cancel();
        self.step = step;
        if let Some(dwell) = self.dwell_ms(step) {
            self.timer.arm(now_ms, dwell);
        }
        log::debug!("proposal step {} ({:?})", step.index(), step);
    }

    fn advance(&mut self, now_ms: f64) -> FlowEvent {
        let from = self.step;
        let to = self.successor(from);
        self.enter(to, now_ms);
        FlowEvent::Advanced { from, to }
    }

    /// Fire the pending dwell timer, advancing at most one step per call.
    pub fn tick(&mut self, now_ms: f64) -> Option<FlowEvent> {
        if self.torn_down || !self.timer.poll(now_ms) {
            return None;
        }
        Some(self.advance(now_ms))
    }

    /// Accept control activated. Only meaningful on the question step.
    pub fn accept(&mut self, now_ms: f64) -> Option<FlowEvent> {
        if self.torn_down || self.accepted || self.step != Step::Question {
            return None;
        }
        self.accepted = true;
        self.advance(now_ms);
        log::info!(
            "proposal accepted after {} moves / {} shrink clicks",
            self.evasion.move_count(),
            self.evasion.shrink_click_count()
        );
        Some(FlowEvent::Accepted)
    }

    pub fn pointer_near_decline(&mut self, now_ms: f64) -> DeclineOutcome {
        if self.torn_down || self.step != Step::Question {
            return DeclineOutcome::Ignored;
        }
        self.evasion.on_proximity(&self.config.evasion, &mut self.rng, now_ms)
    }

    pub fn click_decline(&mut self, now_ms: f64) -> DeclineOutcome {
        if self.torn_down || self.step != Step::Question {
            return DeclineOutcome::Ignored;
        }
        self.evasion.on_click(&self.config.evasion, &mut self.rng, now_ms)
    }

    /// Decline control as it should be drawn, or `None` when it is not shown.
    pub fn decline_view(&self) -> Option<DeclineView<'_>> {
        if self.step != Step::Question {
            return None;
        }
        self.evasion.view(&self.config.evasion)
    }

    pub fn accept_scale(&self) -> f64 {
        self.evasion.accept_scale(&self.config.evasion)
    }

    /// Cancel the pending timer; the flow goes inert.
    pub fn teardown(&mut self) {
        self.timer.cancel();
        self.torn_down = true;
    }
}
