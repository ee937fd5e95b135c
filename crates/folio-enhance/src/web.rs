//! Browser bindings and the wasm entry point.
//!
//! Only compiled for `wasm32`; see the crate docs for the `wasm-pack` build.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    EventTarget, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use crate::dom::{
    Disposer, Document, DomEvent, Element, EventKind, Intersection, IntersectionCallback,
    Listener, ScrollMetrics, TimerId, VisibilityObserver,
};
use crate::{Enhancer, SiteContent};

thread_local! {
    static ENHANCER: RefCell<Option<Enhancer<WebDocument>>> = const { RefCell::new(None) };
}

#[derive(Clone)]
pub struct WebElement(web_sys::Element);

impl WebElement {
    fn style(&self) -> Option<web_sys::CssStyleDeclaration> {
        self.0.dyn_ref::<web_sys::HtmlElement>().map(|e| e.style())
    }
}

fn collect_elements(list: web_sys::NodeList) -> Vec<WebElement> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(WebElement)
        .collect()
}

fn translate(kind: EventKind, event: &web_sys::Event) -> DomEvent<WebElement> {
    match kind {
        EventKind::Click => DomEvent::Click {
            target: event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
                .map(WebElement),
        },
        EventKind::KeyDown => DomEvent::KeyDown {
            key: event
                .dyn_ref::<web_sys::KeyboardEvent>()
                .map(|k| k.key())
                .unwrap_or_default(),
        },
        EventKind::Scroll => DomEvent::Scroll,
        EventKind::MouseEnter => DomEvent::MouseEnter,
        EventKind::MouseLeave => DomEvent::MouseLeave,
        EventKind::Load => DomEvent::Load,
        EventKind::Error => DomEvent::Error,
    }
}

fn add_listener(target: EventTarget, kind: EventKind, listener: Listener<WebElement>) -> Disposer {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        listener(&translate(kind, &event));
    });
    if let Err(e) =
        target.add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
    {
        tracing::warn!(event = kind.as_str(), error = ?e, "failed to add listener");
        return Disposer::default();
    }
    Disposer::new(move || {
        let _ = target
            .remove_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref());
        drop(closure);
    })
}

impl Element for WebElement {
    fn tag_name(&self) -> String {
        self.0.tag_name().to_ascii_lowercase()
    }

    fn is_same(&self, other: &Self) -> bool {
        self.0.is_same_node(Some(&other.0))
    }

    fn add_class(&self, class: &str) {
        let _ = self.0.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.0.class_list().remove_1(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = self.0.set_attribute(name, value);
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.style()
            .and_then(|s| s.get_property_value(name).ok())
            .filter(|v| !v.is_empty())
    }

    fn set_style_property(&self, name: &str, value: &str) {
        if let Some(style) = self.style() {
            let _ = style.set_property(name, value);
        }
    }

    fn text_content(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn set_inner_html(&self, html: &str) {
        self.0.set_inner_html(html);
    }

    fn append_child(&self, child: &Self) {
        let _ = self.0.append_child(&child.0);
    }

    fn insert_after(&self, sibling: &Self) {
        let _ = self.0.after_with_node_1(&sibling.0);
    }

    fn query_selector(&self, selector: &str) -> Option<Self> {
        self.0.query_selector(selector).ok().flatten().map(WebElement)
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Self> {
        self.0
            .query_selector_all(selector)
            .map(collect_elements)
            .unwrap_or_default()
    }

    fn listen(&self, kind: EventKind, listener: Listener<Self>) -> Disposer {
        add_listener(self.0.clone().unchecked_into(), kind, listener)
    }
}

type ObserverClosure = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

pub struct WebObserver {
    observer: Option<IntersectionObserver>,
    _callback: Option<Rc<ObserverClosure>>,
}

impl VisibilityObserver<WebElement> for WebObserver {
    fn observe(&self, element: &WebElement) {
        if let Some(observer) = &self.observer {
            observer.observe(&element.0);
        }
    }

    fn unobserve(&self, element: &WebElement) {
        if let Some(observer) = &self.observer {
            observer.unobserve(&element.0);
        }
    }

    fn disconnect(&self) {
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
    }
}

type TimerClosure = Closure<dyn FnMut()>;

/// Closures backing `setTimeout` handles.
///
/// A closure is never dropped while it runs: fired and cleared closures move
/// to `spent`, which is emptied on the next timer call made outside any
/// timer callback.
#[derive(Default)]
struct TimerSlots {
    pending: HashMap<i32, TimerClosure>,
    spent: Vec<TimerClosure>,
    depth: u32,
}

impl TimerSlots {
    fn retire(&mut self, handle: i32) {
        if let Some(closure) = self.pending.remove(&handle) {
            self.spent.push(closure);
        }
    }

    fn sweep(&mut self) {
        if self.depth == 0 {
            self.spent.clear();
        }
    }
}

#[derive(Clone)]
pub struct WebDocument {
    window: web_sys::Window,
    document: web_sys::Document,
    timers: Rc<RefCell<TimerSlots>>,
}

impl WebDocument {
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            timers: Rc::default(),
        })
    }
}

impl Document for WebDocument {
    type Element = WebElement;
    type Observer = WebObserver;

    fn head(&self) -> Option<WebElement> {
        self.document.head().map(|h| WebElement(h.into()))
    }

    fn body(&self) -> Option<WebElement> {
        self.document.body().map(|b| WebElement(b.into()))
    }

    fn get_element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement)
    }

    fn query_selector_all(&self, selector: &str) -> Vec<WebElement> {
        self.document
            .query_selector_all(selector)
            .map(collect_elements)
            .unwrap_or_default()
    }

    fn create_element(&self, tag: &str) -> Option<WebElement> {
        self.document.create_element(tag).ok().map(WebElement)
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            scroll_height: self
                .document
                .document_element()
                .map(|e| f64::from(e.scroll_height()))
                .unwrap_or(0.0),
            viewport_height: self
                .window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0),
        }
    }

    fn listen(&self, kind: EventKind, listener: Listener<WebElement>) -> Disposer {
        let target: EventTarget = match kind {
            EventKind::KeyDown => self.document.clone().into(),
            _ => self.window.clone().into(),
        };
        add_listener(target, kind, listener)
    }

    fn observe_visibility(
        &self,
        threshold: f64,
        callback: IntersectionCallback<WebElement>,
    ) -> WebObserver {
        let closure: ObserverClosure = Closure::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let entries: Vec<Intersection<WebElement>> = entries
                    .iter()
                    .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|e| Intersection {
                        target: WebElement(e.target()),
                        is_intersecting: e.is_intersecting(),
                        ratio: e.intersection_ratio(),
                    })
                    .collect();
                let observer = WebObserver {
                    observer: Some(observer),
                    _callback: None,
                };
                callback(&entries, &observer);
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        match IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &options) {
            Ok(observer) => WebObserver {
                observer: Some(observer),
                _callback: Some(Rc::new(closure)),
            },
            Err(e) => {
                tracing::error!(error = ?e, "intersection observer unavailable");
                WebObserver {
                    observer: None,
                    _callback: None,
                }
            }
        }
    }

    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId {
        self.timers.borrow_mut().sweep();

        let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let slots = Rc::downgrade(&self.timers);
        let own_handle = handle.clone();
        let mut task = Some(task);
        let closure: TimerClosure = Closure::new(move || {
            let Some(task) = task.take() else { return };
            let slots = slots.upgrade();
            if let Some(slots) = &slots {
                slots.borrow_mut().depth += 1;
            }
            task();
            if let Some(slots) = &slots {
                let mut slots = slots.borrow_mut();
                slots.depth -= 1;
                if let Some(handle) = own_handle.get() {
                    slots.retire(handle);
                }
            }
        });

        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), millis)
        {
            Ok(id) => {
                handle.set(Some(id));
                self.timers.borrow_mut().pending.insert(id, closure);
                TimerId(id as u64)
            }
            Err(e) => {
                tracing::error!(error = ?e, "failed to schedule timer");
                TimerId(0)
            }
        }
    }

    fn clear_timeout(&self, id: TimerId) {
        let handle = id.0 as i32;
        self.window.clear_timeout_with_handle(handle);
        let mut slots = self.timers.borrow_mut();
        slots.retire(handle);
        slots.sweep();
    }
}

fn run(doc: WebDocument) {
    let content = match SiteContent::bundled() {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(error = %e, "bundled site content is invalid");
            SiteContent::default()
        }
    };
    let enhancer = Enhancer::init(&doc, content);
    ENHANCER.with(|slot| *slot.borrow_mut() = Some(enhancer));
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let Some(doc) = WebDocument::current() else {
        return;
    };
    if doc.document.ready_state() == "loading" {
        let target = doc.document.clone();
        let on_ready = Closure::once_into_js(move || run(doc));
        let _ = target.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref());
    } else {
        run(doc);
    }
}

/// Open the modal for `project_id`, for inline `onclick` handlers.
#[wasm_bindgen(js_name = openModal)]
pub fn open_modal(project_id: &str) {
    ENHANCER.with(|slot| match slot.borrow().as_ref() {
        Some(enhancer) => {
            let _ = enhancer.open_modal(project_id);
        }
        None => tracing::error!("enhancer not initialized"),
    });
}

#[wasm_bindgen(js_name = closeModal)]
pub fn close_modal() {
    ENHANCER.with(|slot| match slot.borrow().as_ref() {
        Some(enhancer) => enhancer.close_modal(),
        None => tracing::error!("enhancer not initialized"),
    });
}
