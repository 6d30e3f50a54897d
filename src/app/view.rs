//! DOM for the page. Elements are created on mount, replacing any previous
//! mount, and updated from state on every frame.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::fireworks::Fireworks;
use crate::page::{PageFlow, Stage};
use crate::proposal::{ProposalFlow, Step};

pub(crate) const ROOT_ID: &str = "vp-root";
pub(crate) const GAME_SLOT_ID: &str = "vp-game";

const HIDDEN: &str = "display:none;";

pub(crate) type Listener = Closure<dyn FnMut(web_sys::MouseEvent)>;

pub(crate) struct View {
    root: Element,
    intro: Element,
    game: Element,
    pub skip: Element,
    proposal: Element,
    heading: Element,
    note: Element,
    image: Element,
    buttons: Element,
    pub accept: Element,
    pub decline: Element,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    question_src: String,
    finale_src: String,
    // Dropped with the view, which unregisters them on the JS side.
    listeners: Vec<Listener>,
}

fn child(doc: &Document, parent: &Element, tag: &str, id: &str, style: &str) -> Result<Element> {
    let el = doc.create_element(tag)?;
    el.set_id(id);
    el.set_attribute("style", style)?;
    parent.append_child(&el)?;
    Ok(el)
}

impl View {
    pub fn mount(doc: &Document, cfg: &AppConfig) -> Result<Self> {
        let body = doc.body().ok_or(Error::NoBody)?;
        // A previous mount is replaced wholesale.
        if let Some(old) = doc.get_element_by_id(ROOT_ID) {
            old.remove();
        }
        let root = doc.create_element("div")?;
        root.set_id(ROOT_ID);
        root.set_attribute("style", &format!(
            "position:fixed; inset:0; display:flex; align-items:center; justify-content:center; background:#000; color:#fff; overflow:hidden; text-align:center; font-family:{};",
            cfg.assets.font_family
        ))?;
        body.append_child(&root)?;

        let intro = child(doc, &root, "p", "vp-intro", "font-size:48px; font-weight:600; padding:0 24px; transition:opacity 0.8s;")?;

        let game = child(doc, &root, "div", "vp-game-stage", HIDDEN)?;
        // The host page mounts its mini-game into this slot.
        child(doc, &game, "div", GAME_SLOT_ID, "")?;
        let footer = child(doc, &game, "h1", "vp-footer", "position:absolute; left:50%; bottom:20px; transform:translateX(-50%); font-size:40px; font-weight:700;")?;
        footer.set_text_content(Some(cfg.page.footer.as_str()));
        let skip = child(doc, &game, "button", "vp-skip", "position:fixed; bottom:16px; right:16px; width:56px; height:56px; background:#000; border:0; cursor:pointer; z-index:10;")?;
        skip.set_attribute("type", "button")?;
        skip.set_attribute("aria-label", "Skip to proposal")?;

        let proposal = child(doc, &root, "div", "vp-proposal", HIDDEN)?;
        let heading = child(doc, &proposal, "h2", "vp-heading", "font-size:40px; font-weight:600; margin-bottom:16px;")?;
        let image = child(doc, &proposal, "img", "vp-image", HIDDEN)?;
        image.set_attribute("width", "200")?;
        image.set_attribute("height", "200")?;
        let note = child(doc, &proposal, "p", "vp-note", HIDDEN)?;
        let buttons = child(doc, &proposal, "div", "vp-buttons", HIDDEN)?;
        let accept = child(doc, &buttons, "button", "vp-accept", "")?;
        accept.set_text_content(Some(cfg.flow.texts.accept_label.as_str()));
        let decline = child(doc, &buttons, "button", "vp-decline", "")?;

        let canvas: HtmlCanvasElement = child(doc, &root, "canvas", "vp-fireworks", HIDDEN)?
            .dyn_into()
            .map_err(|_| Error::ElementType("vp-fireworks"))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(Error::NoCanvasContext)?
            .dyn_into()
            .map_err(|_| Error::NoCanvasContext)?;

        Ok(Self {
            root,
            intro,
            game,
            skip,
            proposal,
            heading,
            note,
            image,
            buttons,
            accept,
            decline,
            canvas,
            ctx,
            question_src: cfg.assets.url(&cfg.assets.question_image),
            finale_src: cfg.assets.url(&cfg.assets.finale_image),
            listeners: Vec::new(),
        })
    }

    /// Register `listener` for `event` on `target`, owned by this view.
    pub fn listen(&mut self, target: &Element, event: &str, listener: Listener) -> Result<()> {
        target.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())?;
        self.listeners.push(listener);
        Ok(())
    }

    pub fn unmount(&self) {
        self.root.remove();
    }

    pub fn render_page(&self, page: &PageFlow, now: f64) {
        match page.stage() {
            Stage::Intro(_) => {
                self.intro.set_text_content(page.intro_line());
                self.intro.set_attribute("style", "font-size:48px; font-weight:600; padding:0 24px;").ok();
                self.game.set_attribute("style", HIDDEN).ok();
            }
            Stage::Game | Stage::Handoff => {
                self.intro.set_attribute("style", HIDDEN).ok();
                let opacity = 1.0 - page.handoff_progress(now);
                self.game
                    .set_attribute("style", &format!("display:flex; flex-direction:column; align-items:center; opacity:{opacity:.3};"))
                    .ok();
            }
            Stage::Proposal => {
                self.intro.set_attribute("style", HIDDEN).ok();
                self.game.set_attribute("style", HIDDEN).ok();
            }
        }
    }

    pub fn render_proposal(&self, flow: &ProposalFlow) {
        let texts = &flow.config().texts;
        self.proposal
            .set_attribute("style", "display:flex; flex-direction:column; align-items:center;")
            .ok();

        let (heading, image, note) = match flow.step() {
            Step::Celebration => (&texts.celebration, None, None),
            Step::Surprise => (&texts.surprise, None, None),
            Step::Question => (&texts.question, Some(&self.question_src), None),
            Step::Transition => (&texts.transition, None, None),
            Step::Finale => (&texts.finale, Some(&self.finale_src), Some(&texts.finale_note)),
        };
        self.heading.set_text_content(Some(heading.as_str()));
        match image {
            Some(src) => {
                if self.image.get_attribute("src").as_deref() != Some(src.as_str()) {
                    self.image.set_attribute("src", src).ok();
                }
                self.image.set_attribute("style", "display:block; margin:16px auto;").ok();
            }
            None => {
                self.image.set_attribute("style", HIDDEN).ok();
            }
        }
        match note {
            Some(text) => {
                self.note.set_text_content(Some(text.as_str()));
                self.note.set_attribute("style", "font-size:14px; margin-top:16px;").ok();
            }
            None => {
                self.note.set_attribute("style", HIDDEN).ok();
            }
        }

        if flow.step() != Step::Question {
            self.buttons.set_attribute("style", HIDDEN).ok();
            return;
        }
        self.buttons
            .set_attribute("style", "display:flex; gap:16px; margin-top:40px; align-items:center; justify-content:center; flex-wrap:wrap;")
            .ok();
        self.accept
            .set_attribute("style", &format!(
                "padding:8px 24px; font-size:18px; font-weight:600; color:#fff; background:linear-gradient(90deg,#ec4899,#f43f5e); border:0; border-radius:12px; transform:scale({:.3}); transition:transform 0.25s;",
                flow.accept_scale()
            ))
            .ok();
        match flow.decline_view() {
            Some(view) => {
                let placement = match view.position {
                    Some(p) => format!("position:absolute; top:{:.2}%; left:{:.2}%;", p.top_pct, p.left_pct),
                    None => String::new(),
                };
                self.decline.set_text_content(Some(view.caption));
                self.decline
                    .set_attribute("style", &format!(
                        "{placement} padding:8px 24px; font-size:18px; font-weight:600; color:#fff; background:linear-gradient(90deg,#6b7280,#4b5563); border:0; border-radius:12px; flex-shrink:0; transform:scale({:.3}); transition:transform 0.5s, top 0.25s, left 0.25s;",
                        view.scale
                    ))
                    .ok();
            }
            None => {
                self.decline.set_attribute("style", HIDDEN).ok();
            }
        }
    }

    /// Size the overlay canvas to the viewport; returns the size in px.
    pub fn fit_canvas(&self) -> (f64, f64) {
        let (w, h) = web_sys::window()
            .map(|w| {
                let iw = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
                let ih = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
                (iw, ih)
            })
            .unwrap_or((800.0, 600.0));
        if self.canvas.width() != w as u32 || self.canvas.height() != h as u32 {
            self.canvas.set_width(w as u32);
            self.canvas.set_height(h as u32);
        }
        (w, h)
    }

    pub fn render_fireworks(&self, fireworks: &Fireworks) {
        self.canvas
            .set_attribute("style", "position:absolute; inset:0; width:100%; height:100%; pointer-events:none;")
            .ok();
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, self.canvas.width() as f64, self.canvas.height() as f64);
        for p in fireworks.particles() {
            ctx.set_fill_style(&JsValue::from_str(&format!(
                "hsla({:.0},100%,60%,{:.3})",
                p.hue,
                p.alpha()
            )));
            ctx.begin_path();
            if ctx.arc(p.x, p.y, 2.2, 0.0, std::f64::consts::TAU).is_ok() {
                ctx.fill();
            }
        }
    }
}
