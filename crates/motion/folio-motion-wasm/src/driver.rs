//! Browser driver: scans the document, feeds observations into a [`Stage`]
//! once per animation frame and writes its outputs back to the DOM.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, Window,
};

use folio_motion_core::{
    CoreEvent, Inputs, PointerSample, Rect, ScrollSample, SectionTop, Stage, TiltCard,
    VisibilityEntry,
};

use crate::dom::{self, ElementRegistry};
use crate::{config_from_js, logger};

struct Shared {
    stage: Stage,
    registry: ElementRegistry,
    pending: Inputs,
    scroll_dirty: bool,
    last_ts: Option<f64>,
    observer: Option<IntersectionObserver>,
}

type Frame = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Wire every animation on the current page and start the frame loop.
///
/// `config` may be undefined/null for defaults. `log_level` names the console
/// log level ("warn" when absent).
#[wasm_bindgen]
pub fn mount(config: JsValue, log_level: Option<String>) -> Result<(), JsError> {
    console_error_panic_hook::set_once();
    logger::init(logger::parse_level(log_level.as_deref()));

    let cfg = config_from_js(config)?;
    let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsError::new("no document"))?;

    let mut registry = ElementRegistry::default();
    let layout = dom::scan_page(&document, &mut registry);
    let tilt_cards = layout.tilt_cards.clone();
    let stage = Stage::new(cfg, layout).map_err(|e| JsError::new(&format!("config error: {e}")))?;
    log::info!(
        "mounted: {} observed elements, {} skill cards",
        stage.observed_elements().len(),
        stage.skill_card_count()
    );

    let shared = Rc::new(RefCell::new(Shared {
        stage,
        registry,
        pending: Inputs::default(),
        scroll_dirty: false,
        last_ts: None,
        observer: None,
    }));

    install_observer(&shared).map_err(|e| JsError::new(&format!("observer error: {e:?}")))?;
    install_scroll(&window, &shared).map_err(|e| JsError::new(&format!("scroll error: {e:?}")))?;
    for card in &tilt_cards {
        install_tilt(card, &shared).map_err(|e| JsError::new(&format!("tilt error: {e:?}")))?;
    }
    start_loop(window, shared);
    Ok(())
}

fn install_observer(shared: &Rc<RefCell<Shared>>) -> Result<(), JsValue> {
    let (elements, thresholds) = {
        let s = shared.borrow();
        (s.stage.observed_elements(), s.stage.thresholds())
    };
    if elements.is_empty() {
        return Ok(());
    }

    let sink = shared.clone();
    let callback = Closure::wrap(Box::new(move |entries: Array, _obs: IntersectionObserver| {
        let mut s = sink.borrow_mut();
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let Some(element) = s.registry.id_of(&entry.target()) else {
                continue;
            };
            s.pending.visibility.push(VisibilityEntry {
                element,
                ratio: entry.intersection_ratio() as f32,
                is_intersecting: entry.is_intersecting(),
            });
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    let steps: Array = thresholds.iter().map(|t| JsValue::from_f64(f64::from(*t))).collect();
    init.set_threshold(&steps);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();

    let mut s = shared.borrow_mut();
    for id in elements {
        if let Some(el) = s.registry.get(id) {
            observer.observe(el);
        }
    }
    s.observer = Some(observer);
    Ok(())
}

fn install_scroll(window: &Window, shared: &Rc<RefCell<Shared>>) -> Result<(), JsValue> {
    let sink = shared.clone();
    let on_scroll = Closure::wrap(Box::new(move || {
        sink.borrow_mut().scroll_dirty = true;
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    on_scroll.forget();
    Ok(())
}

fn install_tilt(card: &TiltCard, shared: &Rc<RefCell<Shared>>) -> Result<(), JsValue> {
    let el = match shared.borrow().registry.get(card.card) {
        Some(el) => el.clone(),
        None => return Ok(()),
    };
    let id = card.card;

    let sink = shared.clone();
    let target = el.clone();
    let on_move = Closure::wrap(Box::new(move |e: MouseEvent| {
        let r = target.get_bounding_client_rect();
        sink.borrow_mut().pending.pointer.push(PointerSample::Move {
            card: id,
            client_x: f64::from(e.client_x()),
            client_y: f64::from(e.client_y()),
            rect: Rect {
                left: r.left(),
                top: r.top(),
                width: r.width(),
                height: r.height(),
            },
        });
    }) as Box<dyn FnMut(MouseEvent)>);
    el.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
    on_move.forget();

    let sink = shared.clone();
    let on_leave = Closure::wrap(Box::new(move || {
        sink.borrow_mut()
            .pending
            .pointer
            .push(PointerSample::Leave { card: id });
    }) as Box<dyn FnMut()>);
    el.add_event_listener_with_callback("mouseleave", on_leave.as_ref().unchecked_ref())?;
    on_leave.forget();
    Ok(())
}

fn scroll_sample(window: &Window, s: &Shared) -> ScrollSample {
    let sections = s
        .stage
        .counter_section()
        .and_then(|element| {
            s.registry.get(element).map(|el| SectionTop {
                element,
                top: el.get_bounding_client_rect().top(),
            })
        })
        .into_iter()
        .collect();
    ScrollSample {
        scroll_y: window.scroll_y().unwrap_or_default(),
        viewport_height: window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or_default(),
        sections,
    }
}

fn request_frame(window: &Window, frame: &Frame) {
    let slot = frame.borrow();
    let Some(cb) = slot.as_ref() else {
        return;
    };
    if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {e:?}");
    }
}

fn start_loop(window: Window, shared: Rc<RefCell<Shared>>) {
    let frame: Frame = Rc::new(RefCell::new(None));
    let next = frame.clone();
    let win = window.clone();

    *frame.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        {
            let mut guard = shared.borrow_mut();
            let dt = guard.last_ts.map_or(0.0, |last| ts - last);
            guard.last_ts = Some(ts);

            let mut inputs = std::mem::take(&mut guard.pending);
            if std::mem::take(&mut guard.scroll_dirty) {
                inputs.scroll = Some(scroll_sample(&win, &guard));
            }

            let Shared {
                stage,
                registry,
                observer,
                ..
            } = &mut *guard;
            let out = stage.update(dt, inputs);
            dom::apply_outputs(registry, out);
            for event in &out.events {
                if let CoreEvent::Unobserved { element } = event {
                    if let (Some(obs), Some(el)) = (observer.as_ref(), registry.get(*element)) {
                        obs.unobserve(el);
                    }
                }
            }
        }
        request_frame(&win, &next);
    }) as Box<dyn FnMut(f64)>));

    request_frame(&window, &frame);
}
