//! Browser driver: owns the mounted page state, wires DOM listeners and runs
//! the `requestAnimationFrame` loop that ticks the page, the proposal and the
//! fireworks overlay.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::fireworks::Fireworks;
use crate::page::{PageEvent, PageFlow};
use crate::proposal::{DeclineOutcome, FlowEvent, ProposalFlow, Step};
use crate::rng::XorShift64;

mod view;

use view::{Listener, View};

/// Notifications for the host page, dispatched as `CustomEvent`s on `document`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outbound {
    ProposalReady,
    Accepted,
    Finale,
}

impl Outbound {
    fn event_name(self) -> &'static str {
        match self {
            Outbound::ProposalReady => "valentine:proposal-ready",
            Outbound::Accepted => "valentine:accepted",
            Outbound::Finale => "valentine:finale",
        }
    }

    /// Notifications owed for a flow event; `step` is the step after it.
    fn for_flow(event: FlowEvent, step: Step, out: &mut Vec<Outbound>) {
        match event {
            FlowEvent::Accepted => {
                out.push(Outbound::Accepted);
                if step == Step::Finale {
                    out.push(Outbound::Finale);
                }
            }
            FlowEvent::Advanced { to: Step::Finale, .. } => out.push(Outbound::Finale),
            FlowEvent::Advanced { .. } => {}
        }
    }
}

struct AppState {
    config: AppConfig,
    view: View,
    page: PageFlow,
    proposal: Option<ProposalFlow>,
    fireworks: Option<Fireworks>,
    fx_rng: XorShift64,
    last_frame_ms: Option<f64>,
}

impl AppState {
    fn render(&self, now: f64) {
        self.view.render_page(&self.page, now);
        if let Some(flow) = &self.proposal {
            self.view.render_proposal(flow);
        }
        if let Some(fw) = &self.fireworks {
            self.view.render_fireworks(fw);
        }
    }

    fn start_proposal(&mut self, now: f64, out: &mut Vec<Outbound>) {
        if self.proposal.is_some() {
            return;
        }
        let flow = ProposalFlow::start(self.config.flow.clone(), XorShift64::from_entropy(), now);
        self.proposal = Some(flow);
        out.push(Outbound::ProposalReady);
    }

    fn accept(&mut self, now: f64, out: &mut Vec<Outbound>) {
        let Some(flow) = self.proposal.as_mut() else { return };
        let Some(event) = flow.accept(now) else { return };
        Outbound::for_flow(event, flow.step(), out);
        let (w, h) = self.view.fit_canvas();
        self.fireworks = Some(Fireworks::new(self.config.fireworks, w, h));
    }

    fn game_completed(&mut self, now: f64) {
        if let Some(ev) = self.page.game_completed(now) {
            log::info!("mini-game done: {ev:?}");
        }
    }

    fn decline(&mut self, now: f64, click: bool) {
        let Some(flow) = self.proposal.as_mut() else { return };
        let outcome = if click {
            flow.click_decline(now)
        } else {
            flow.pointer_near_decline(now)
        };
        if outcome != DeclineOutcome::Ignored {
            log::debug!("decline {}: {outcome:?}", if click { "click" } else { "hover" });
        }
    }

    fn tick(&mut self, now: f64, out: &mut Vec<Outbound>) {
        let dt = self.last_frame_ms.map(|t| now - t).unwrap_or(16.0);
        self.last_frame_ms = Some(now);

        match self.page.tick(now) {
            Some(PageEvent::ProposalReady) => self.start_proposal(now, out),
            Some(ev) => log::debug!("page: {ev:?}"),
            None => {}
        }
        if let Some(flow) = self.proposal.as_mut() {
            if let Some(event) = flow.tick(now) {
                Outbound::for_flow(event, flow.step(), out);
            }
        }
        if let Some(fw) = self.fireworks.as_mut() {
            let (w, h) = self.view.fit_canvas();
            fw.resize(w, h);
            fw.update(dt, &mut self.fx_rng);
        }
        self.render(now);
    }

    fn teardown(&mut self) {
        self.page.teardown();
        if let Some(flow) = self.proposal.as_mut() {
            flow.teardown();
        }
        self.view.unmount();
    }
}

thread_local! {
    static APP_STATE: RefCell<Option<AppState>> = const { RefCell::new(None) };
    static LOOP_ACTIVE: Cell<bool> = const { Cell::new(false) };
}

/// Mount the page and start the intro. Replaces any running instance.
pub(crate) fn start(config: AppConfig) -> Result<()> {
    config.validate()?;
    let win = window().ok_or(Error::NoWindow)?;
    let doc = win.document().ok_or(Error::NoDocument)?;

    teardown();
    let mut view = View::mount(&doc, &config)?;
    let (accept, decline, skip) =
        (view.accept.clone(), view.decline.clone(), view.skip.clone());
    view.listen(&accept, "click", handler(|st, now, out| st.accept(now, out)))?;
    view.listen(&decline, "mouseenter", handler(|st, now, _| st.decline(now, false)))?;
    view.listen(&decline, "click", handler(|st, now, _| st.decline(now, true)))?;
    view.listen(&skip, "click", handler(|st, now, _| st.game_completed(now)))?;

    let now = crate::performance_now();
    let state = AppState {
        page: PageFlow::start(config.page.clone(), now),
        config,
        view,
        proposal: None,
        fireworks: None,
        fx_rng: XorShift64::from_entropy(),
        last_frame_ms: None,
    };
    APP_STATE.with(|cell| cell.replace(Some(state)));
    log::info!("valentine page mounted");

    if !LOOP_ACTIVE.with(Cell::get) {
        start_frame_loop();
    }
    Ok(())
}

/// Inbound signal from the host's mini-game.
pub(crate) fn game_completed() {
    with_state(|st, now, _| st.game_completed(now));
}

pub(crate) fn teardown() {
    // Take the state out first so DOM removal cannot re-enter a live borrow.
    let taken = APP_STATE.with(|cell| cell.borrow_mut().take());
    if let Some(mut st) = taken {
        st.teardown();
        log::info!("valentine page torn down");
    }
}

fn with_state(f: impl FnOnce(&mut AppState, f64, &mut Vec<Outbound>)) {
    let now = crate::performance_now();
    let out = APP_STATE.with(|cell| {
        let mut out = Vec::new();
        if let Some(st) = cell.borrow_mut().as_mut() {
            f(st, now, &mut out);
            st.render(now);
        }
        out
    });
    dispatch(&out);
}

type Handler = fn(&mut AppState, f64, &mut Vec<Outbound>);

fn handler(f: Handler) -> Listener {
    Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        with_state(f);
    }) as Box<dyn FnMut(_)>)
}

// Dispatch happens outside the state borrow so host listeners may call back in.
fn dispatch(events: &[Outbound]) {
    if events.is_empty() {
        return;
    }
    let Some(doc) = window().and_then(|w| w.document()) else { return };
    for ev in events {
        let name = ev.event_name();
        match web_sys::CustomEvent::new(name) {
            Ok(custom) => {
                if let Err(err) = doc.dispatch_event(&custom) {
                    log::warn!("dispatching {name} failed: {err:?}");
                }
            }
            Err(err) => log::warn!("creating {name} failed: {err:?}"),
        }
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    LOOP_ACTIVE.with(|active| active.set(true));
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let (alive, out) = APP_STATE.with(|cell| {
            let mut out = Vec::new();
            match cell.borrow_mut().as_mut() {
                Some(st) => {
                    st.tick(ts, &mut out);
                    (true, out)
                }
                None => (false, out),
            }
        });
        dispatch(&out);
        if !alive || !request_frame(&f) {
            LOOP_ACTIVE.with(|active| active.set(false));
        }
    }) as Box<dyn FnMut(f64)>));
    if !request_frame(&g) {
        LOOP_ACTIVE.with(|active| active.set(false));
    }
}

/// Queue the next frame; `false` when the browser refused.
fn request_frame(f: &FrameCallback) -> bool {
    let Some(w) = window() else { return false };
    let cb = f.borrow();
    let Some(cb) = cb.as_ref() else { return false };
    match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
        Ok(_) => true,
        Err(err) => {
            log::warn!("requestAnimationFrame failed: {err:?}");
            false
        }
    }
}
