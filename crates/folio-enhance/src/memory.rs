//! In-memory DOM.
//!
//! Parses markup with `scraper` into a mutable tree and simulates the
//! window services the enhancer needs: event dispatch, visibility reports,
//! timers on a manual clock, and scroll metrics. Used by the test suites and
//! by headless checks of a portfolio document.

use std::cell::{Cell, RefCell};
use std::iter::Peekable;
use std::rc::{Rc, Weak};
use std::str::Chars;
use std::time::Duration;

use scraper::{ElementRef, Html};

use crate::dom::{
    Disposer, Document, DomEvent, Element, EventKind, Intersection, IntersectionCallback,
    Listener, ScrollMetrics, TimerId, VisibilityObserver,
};

thread_local! {
    static NEXT_LISTENER: Cell<u64> = const { Cell::new(1) };
}

fn next_listener_id() -> u64 {
    NEXT_LISTENER.with(|n| {
        let id = n.get();
        n.set(id + 1);
        id
    })
}

enum NodeKind {
    Element(String),
    Text(String),
}

struct Node {
    kind: NodeKind,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    style: Vec<(String, String)>,
    children: Vec<MemoryElement>,
    parent: Weak<RefCell<Node>>,
    listeners: Vec<(u64, EventKind, Listener<MemoryElement>)>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: Vec::new(),
            classes: Vec::new(),
            style: Vec::new(),
            children: Vec::new(),
            parent: Weak::new(),
            listeners: Vec::new(),
        }
    }
}

/// Handle to a node of a [`MemoryDocument`].
#[derive(Clone)]
pub struct MemoryElement(Rc<RefCell<Node>>);

impl std::fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.0.borrow();
        match &node.kind {
            NodeKind::Element(tag) => write!(f, "<{} class={:?}>", tag, node.classes),
            NodeKind::Text(text) => write!(f, "{:?}", text),
        }
    }
}

impl MemoryElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(Node::new(NodeKind::Element(
            tag.to_ascii_lowercase(),
        )))))
    }

    fn text(text: &str) -> Self {
        Self(Rc::new(RefCell::new(Node::new(NodeKind::Text(
            text.to_string(),
        )))))
    }

    fn is_element(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Element(_))
    }

    fn parent(&self) -> Option<MemoryElement> {
        self.0.borrow().parent.upgrade().map(MemoryElement)
    }

    fn children(&self) -> Vec<MemoryElement> {
        self.0.borrow().children.clone()
    }

    /// Element children only.
    pub fn element_children(&self) -> Vec<MemoryElement> {
        self.children()
            .into_iter()
            .filter(|c| c.is_element())
            .collect()
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    fn detach(&self) {
        if let Some(parent) = self.parent() {
            parent
                .0
                .borrow_mut()
                .children
                .retain(|c| !Rc::ptr_eq(&c.0, &self.0));
        }
        self.0.borrow_mut().parent = Weak::new();
    }

    fn clear_children(&self) {
        let children = std::mem::take(&mut self.0.borrow_mut().children);
        for child in children {
            child.0.borrow_mut().parent = Weak::new();
        }
    }

    fn descendants(&self, out: &mut Vec<MemoryElement>) {
        for child in self.children() {
            if child.is_element() {
                out.push(child.clone());
                child.descendants(out);
            }
        }
    }

    fn listeners_for(&self, kind: EventKind) -> Vec<Listener<MemoryElement>> {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, l)| l.clone())
            .collect()
    }

    fn matches(&self, selector: &SelectorList) -> bool {
        selector.groups.iter().any(|chain| chain_matches(self, chain))
    }
}

impl Element for MemoryElement {
    fn tag_name(&self) -> String {
        match &self.0.borrow().kind {
            NodeKind::Element(tag) => tag.clone(),
            NodeKind::Text(_) => "#text".to_string(),
        }
    }

    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn add_class(&self, class: &str) {
        let mut node = self.0.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        let node = self.0.borrow();
        match name {
            "class" if !node.classes.is_empty() => Some(node.classes.join(" ")),
            "class" => None,
            "style" if !node.style.is_empty() => Some(
                node.style
                    .iter()
                    .map(|(k, v)| format!("{}: {};", k, v))
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            "style" => None,
            _ => node
                .attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
        }
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let mut node = self.0.borrow_mut();
        match name {
            "class" => {
                node.classes = value.split_whitespace().map(str::to_string).collect();
            }
            "style" => {
                node.style = parse_style(value);
            }
            _ => {
                if let Some(slot) = node.attrs.iter_mut().find(|(k, _)| k == name) {
                    slot.1 = value.to_string();
                } else {
                    node.attrs.push((name.to_string(), value.to_string()));
                }
            }
        }
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.0
            .borrow()
            .style
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_style_property(&self, name: &str, value: &str) {
        let mut node = self.0.borrow_mut();
        if let Some(slot) = node.style.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value.to_string();
        } else {
            node.style.push((name.to_string(), value.to_string()));
        }
    }

    fn text_content(&self) -> String {
        let node = self.0.borrow();
        match &node.kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element(_) => node.children.iter().map(|c| c.text_content()).collect(),
        }
    }

    fn set_text_content(&self, text: &str) {
        self.clear_children();
        if !text.is_empty() {
            self.append_child(&MemoryElement::text(text));
        }
    }

    fn set_inner_html(&self, html: &str) {
        self.clear_children();
        let fragment = Html::parse_fragment(html);
        append_converted_children(self, fragment.root_element());
    }

    fn append_child(&self, child: &Self) {
        child.detach();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    fn insert_after(&self, sibling: &Self) {
        let Some(parent) = self.parent() else {
            return;
        };
        sibling.detach();
        sibling.0.borrow_mut().parent = Rc::downgrade(&parent.0);
        let mut parent_node = parent.0.borrow_mut();
        let index = parent_node
            .children
            .iter()
            .position(|c| Rc::ptr_eq(&c.0, &self.0))
            .map(|i| i + 1)
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(index, sibling.clone());
    }

    fn query_selector(&self, selector: &str) -> Option<Self> {
        self.query_selector_all(selector).into_iter().next()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Self> {
        let selector = SelectorList::parse(selector);
        let mut all = Vec::new();
        self.descendants(&mut all);
        all.into_iter().filter(|e| e.matches(&selector)).collect()
    }

    fn listen(&self, kind: EventKind, listener: Listener<Self>) -> Disposer {
        let id = next_listener_id();
        self.0.borrow_mut().listeners.push((id, kind, listener));
        let node = Rc::downgrade(&self.0);
        Disposer::new(move || {
            if let Some(node) = node.upgrade() {
                node.borrow_mut().listeners.retain(|(i, _, _)| *i != id);
            }
        })
    }
}

fn append_converted_children(parent: &MemoryElement, source: ElementRef<'_>) {
    for child in source.children() {
        if let Some(element) = ElementRef::wrap(child) {
            let converted = MemoryElement::new(element.value().name());
            for (name, value) in element.value().attrs() {
                converted.set_attribute(name, value);
            }
            append_converted_children(&converted, element);
            parent.append_child(&converted);
        } else if let Some(text) = child.value().as_text() {
            parent.append_child(&MemoryElement::text(text));
        }
    }
}

fn parse_style(value: &str) -> Vec<(String, String)> {
    value
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

// Selector subset: type, #id, .class, [attr], [attr="v"], descendant
// combinator, and comma-separated groups.

#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

#[derive(Debug)]
struct SelectorList {
    groups: Vec<Vec<Compound>>,
}

impl SelectorList {
    fn parse(selector: &str) -> Self {
        let groups = selector
            .split(',')
            .map(|group| group.split_whitespace().map(parse_compound).collect())
            .filter(|chain: &Vec<Compound>| !chain.is_empty())
            .collect();
        Self { groups }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}

fn parse_compound(input: &str) -> Compound {
    let mut compound = Compound::default();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '.' => {
                chars.next();
                compound.classes.push(read_ident(&mut chars));
            }
            '#' => {
                chars.next();
                compound.id = Some(read_ident(&mut chars));
            }
            '[' => {
                chars.next();
                let body: String = chars.by_ref().take_while(|&c| c != ']').collect();
                match body.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
                        compound
                            .attrs
                            .push((name.trim().to_string(), Some(value.to_string())));
                    }
                    None => compound.attrs.push((body.trim().to_string(), None)),
                }
            }
            '*' => {
                chars.next();
            }
            _ if is_ident_char(c) => {
                compound.tag = Some(read_ident(&mut chars).to_ascii_lowercase());
            }
            _ => {
                chars.next();
            }
        }
    }
    compound
}

fn compound_matches(element: &MemoryElement, compound: &Compound) -> bool {
    if let Some(tag) = &compound.tag {
        if element.tag_name() != *tag {
            return false;
        }
    }
    if let Some(id) = &compound.id {
        if element.attribute("id").as_deref() != Some(id.as_str()) {
            return false;
        }
    }
    if !compound.classes.iter().all(|c| element.has_class(c)) {
        return false;
    }
    compound
        .attrs
        .iter()
        .all(|(name, expected)| match (element.attribute(name), expected) {
            (Some(actual), Some(expected)) => actual == *expected,
            (Some(_), None) => true,
            (None, _) => false,
        })
}

fn chain_matches(element: &MemoryElement, chain: &[Compound]) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    if !compound_matches(element, last) {
        return false;
    }
    let mut current = element.parent();
    for compound in ancestors.iter().rev() {
        loop {
            match current {
                Some(candidate) => {
                    current = candidate.parent();
                    if compound_matches(&candidate, compound) {
                        break;
                    }
                }
                None => return false,
            }
        }
    }
    true
}

struct ObserverState {
    threshold: f64,
    callback: IntersectionCallback<MemoryElement>,
    observed: RefCell<Vec<MemoryElement>>,
    connected: Cell<bool>,
}

/// Visibility observer driven by [`MemoryDocument::report_visibility`].
#[derive(Clone)]
pub struct MemoryObserver(Rc<ObserverState>);

impl MemoryObserver {
    pub fn observed_count(&self) -> usize {
        self.0.observed.borrow().len()
    }

    fn is_observing(&self, element: &MemoryElement) -> bool {
        self.0.connected.get() && self.0.observed.borrow().iter().any(|e| e.is_same(element))
    }
}

impl VisibilityObserver<MemoryElement> for MemoryObserver {
    fn observe(&self, element: &MemoryElement) {
        if self.0.observed.borrow().iter().any(|e| e.is_same(element)) {
            return;
        }
        self.0.connected.set(true);
        self.0.observed.borrow_mut().push(element.clone());
    }

    fn unobserve(&self, element: &MemoryElement) {
        self.0.observed.borrow_mut().retain(|e| !e.is_same(element));
    }

    fn disconnect(&self) {
        self.0.connected.set(false);
        self.0.observed.borrow_mut().clear();
    }
}

struct PendingTimer {
    id: TimerId,
    due: Duration,
    task: Box<dyn FnOnce()>,
}

struct DocState {
    root: MemoryElement,
    listeners: RefCell<Vec<(u64, EventKind, Listener<MemoryElement>)>>,
    observers: RefCell<Vec<MemoryObserver>>,
    timers: RefCell<Vec<PendingTimer>>,
    next_timer: Cell<u64>,
    now: Cell<Duration>,
    scroll: Cell<ScrollMetrics>,
}

/// A parsed page plus simulated window services.
#[derive(Clone)]
pub struct MemoryDocument(Rc<DocState>);

impl MemoryDocument {
    /// Parse a full HTML document.
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let root = MemoryElement::new("html");
        let source = parsed.root_element();
        for (name, value) in source.value().attrs() {
            root.set_attribute(name, value);
        }
        append_converted_children(&root, source);

        Self(Rc::new(DocState {
            root,
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            next_timer: Cell::new(1),
            now: Cell::new(Duration::ZERO),
            scroll: Cell::new(ScrollMetrics::default()),
        }))
    }

    /// Fire `event` at `target`. Clicks bubble through the ancestors and
    /// reach window listeners; other element events do not bubble.
    pub fn dispatch(&self, target: &MemoryElement, event: DomEvent<MemoryElement>) {
        let kind = event.kind();
        let mut chain = vec![target.clone()];
        if kind == EventKind::Click {
            let mut current = target.parent();
            while let Some(parent) = current {
                current = parent.parent();
                chain.push(parent);
            }
        }
        for element in chain {
            for listener in element.listeners_for(kind) {
                listener(&event);
            }
        }
        if kind == EventKind::Click {
            self.dispatch_window(event);
        }
    }

    pub fn click(&self, target: &MemoryElement) {
        self.dispatch(
            target,
            DomEvent::Click {
                target: Some(target.clone()),
            },
        );
    }

    pub fn key_down(&self, key: &str) {
        self.dispatch_window(DomEvent::KeyDown {
            key: key.to_string(),
        });
    }

    /// Fire an event at window/document listeners only.
    pub fn dispatch_window(&self, event: DomEvent<MemoryElement>) {
        let kind = event.kind();
        let listeners: Vec<_> = self
            .0
            .listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }

    pub fn set_scroll_metrics(&self, metrics: ScrollMetrics) {
        self.0.scroll.set(metrics);
    }

    /// Move the window to `scroll_y` and fire a scroll event.
    pub fn scroll_to(&self, scroll_y: f64) {
        let mut metrics = self.0.scroll.get();
        metrics.scroll_y = scroll_y;
        self.0.scroll.set(metrics);
        self.dispatch_window(DomEvent::Scroll);
    }

    /// Report `element` as visible at `ratio` to every observer watching it.
    ///
    /// Like a browser observer, an observer only hears about ratios at or
    /// above its threshold, plus the element leaving the viewport (ratio 0).
    pub fn report_visibility(&self, element: &MemoryElement, ratio: f64) {
        let observers: Vec<_> = self
            .0
            .observers
            .borrow()
            .iter()
            .filter(|o| o.is_observing(element))
            .filter(|o| ratio == 0.0 || ratio >= o.0.threshold)
            .cloned()
            .collect();
        for observer in observers {
            let entry = Intersection {
                target: element.clone(),
                is_intersecting: ratio > 0.0,
                ratio,
            };
            (observer.0.callback)(&[entry], &observer);
        }
    }

    /// Thresholds of the observers still connected, in creation order.
    pub fn observer_thresholds(&self) -> Vec<f64> {
        self.0
            .observers
            .borrow()
            .iter()
            .filter(|o| o.0.connected.get())
            .map(|o| o.0.threshold)
            .collect()
    }

    /// Number of elements currently watched by any observer.
    pub fn observed_count(&self) -> usize {
        self.0
            .observers
            .borrow()
            .iter()
            .filter(|o| o.0.connected.get())
            .map(|o| o.observed_count())
            .sum()
    }

    pub fn pending_timers(&self) -> usize {
        self.0.timers.borrow().len()
    }

    /// Advance the clock, running due timers in order of due time.
    pub fn advance(&self, by: Duration) {
        let target = self.0.now.get() + by;
        loop {
            let next = {
                let mut timers = self.0.timers.borrow_mut();
                let index = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.id))
                    .map(|(i, _)| i);
                index.map(|i| timers.remove(i))
            };
            match next {
                Some(timer) => {
                    self.0.now.set(timer.due);
                    (timer.task)();
                }
                None => break,
            }
        }
        self.0.now.set(target);
    }
}

impl Document for MemoryDocument {
    type Element = MemoryElement;
    type Observer = MemoryObserver;

    fn head(&self) -> Option<MemoryElement> {
        self.0.root.query_selector("head")
    }

    fn body(&self) -> Option<MemoryElement> {
        self.0.root.query_selector("body")
    }

    fn get_element_by_id(&self, id: &str) -> Option<MemoryElement> {
        let mut all = Vec::new();
        self.0.root.descendants(&mut all);
        all.into_iter()
            .find(|e| e.attribute("id").as_deref() == Some(id))
    }

    fn query_selector_all(&self, selector: &str) -> Vec<MemoryElement> {
        self.0.root.query_selector_all(selector)
    }

    fn create_element(&self, tag: &str) -> Option<MemoryElement> {
        Some(MemoryElement::new(tag))
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.0.scroll.get()
    }

    fn listen(&self, kind: EventKind, listener: Listener<MemoryElement>) -> Disposer {
        let id = next_listener_id();
        self.0.listeners.borrow_mut().push((id, kind, listener));
        let state = Rc::downgrade(&self.0);
        Disposer::new(move || {
            if let Some(state) = state.upgrade() {
                state.listeners.borrow_mut().retain(|(i, _, _)| *i != id);
            }
        })
    }

    fn observe_visibility(
        &self,
        threshold: f64,
        callback: IntersectionCallback<MemoryElement>,
    ) -> MemoryObserver {
        let observer = MemoryObserver(Rc::new(ObserverState {
            threshold,
            callback,
            observed: RefCell::new(Vec::new()),
            connected: Cell::new(true),
        }));
        self.0.observers.borrow_mut().push(observer.clone());
        observer
    }

    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.0.next_timer.get());
        self.0.next_timer.set(id.0 + 1);
        self.0.timers.borrow_mut().push(PendingTimer {
            id,
            due: self.0.now.get() + delay,
            task,
        });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.0.timers.borrow_mut().retain(|t| t.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>t</title></head>
<body>
  <section class="hero" id="home">
    <h1>Hello</h1>
    <p class="lead">Intro</p>
  </section>
  <div class="card" data-project="p1"><h1>Card</h1></div>
</body>
</html>"#;

    #[test]
    fn test_parse_and_query() {
        let doc = MemoryDocument::parse(PAGE);
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert_eq!(doc.query_selector_all("h1").len(), 2);
        assert_eq!(doc.query_selector_all(".hero h1").len(), 1);
        assert_eq!(doc.query_selector_all("section.hero p.lead").len(), 1);
        assert_eq!(doc.query_selector_all("[data-project]").len(), 1);
        assert_eq!(doc.query_selector_all("[data-project=\"p1\"]").len(), 1);
        assert_eq!(doc.query_selector_all("[data-project='p2']").len(), 0);
        assert_eq!(doc.query_selector_all("#home, .card").len(), 2);

        let home = doc.get_element_by_id("home").unwrap();
        assert_eq!(home.tag_name(), "section");
        assert!(home.text_content().contains("Intro"));
    }

    #[test]
    fn test_inner_html_and_insert_after() {
        let doc = MemoryDocument::parse(PAGE);
        let card = doc.query_selector_all(".card").remove(0);
        card.set_inner_html(r#"<span class="a">x</span><span class="b">y</span>"#);
        assert_eq!(card.element_children().len(), 2);
        assert_eq!(card.text_content(), "xy");

        let first = card.query_selector(".a").unwrap();
        let inserted = MemoryElement::new("em");
        first.insert_after(&inserted);
        let tags: Vec<_> = card
            .element_children()
            .iter()
            .map(|e| e.tag_name())
            .collect();
        assert_eq!(tags, vec!["span", "em", "span"]);
    }

    #[test]
    fn test_style_attribute_round_trip() {
        let el = MemoryElement::new("div");
        el.set_attribute("style", "width: 10%; opacity: 0");
        assert_eq!(el.style_property("width").as_deref(), Some("10%"));
        el.set_style_property("opacity", "1");
        assert_eq!(el.style_property("opacity").as_deref(), Some("1"));
    }

    #[test]
    fn test_timers_run_in_due_order_and_cancel() {
        let doc = MemoryDocument::parse(PAGE);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        doc.set_timeout(Duration::from_millis(300), Box::new(move || l.borrow_mut().push("late")));
        let l = log.clone();
        doc.set_timeout(Duration::from_millis(50), Box::new(move || l.borrow_mut().push("early")));
        let l = log.clone();
        let cancelled =
            doc.set_timeout(Duration::from_millis(100), Box::new(move || l.borrow_mut().push("x")));
        doc.clear_timeout(cancelled);

        doc.advance(Duration::from_millis(60));
        assert_eq!(*log.borrow(), vec!["early"]);
        doc.advance(Duration::from_millis(500));
        assert_eq!(*log.borrow(), vec!["early", "late"]);
        assert_eq!(doc.pending_timers(), 0);
    }

    #[test]
    fn test_visibility_below_threshold_not_delivered() {
        let doc = MemoryDocument::parse(PAGE);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        let observer = doc.observe_visibility(
            0.5,
            Rc::new(
                move |entries: &[Intersection<MemoryElement>],
                      _observer: &dyn VisibilityObserver<MemoryElement>| {
                    s.borrow_mut().extend(entries.iter().map(|e| e.ratio));
                },
            ),
        );
        let card = doc.query_selector_all(".card").remove(0);
        observer.observe(&card);

        doc.report_visibility(&card, 0.25);
        doc.report_visibility(&card, 0.5);
        doc.report_visibility(&card, 0.0);
        assert_eq!(*seen.borrow(), vec![0.5, 0.0]);
        assert_eq!(doc.observer_thresholds(), vec![0.5]);

        observer.disconnect();
        assert!(doc.observer_thresholds().is_empty());
    }

    #[test]
    fn test_click_bubbles_to_window() {
        let doc = MemoryDocument::parse(PAGE);
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let disposer = doc.listen(
            EventKind::Click,
            Rc::new(move |_event: &DomEvent<MemoryElement>| h.set(h.get() + 1)),
        );
        let heading = doc.query_selector_all(".card h1").remove(0);
        doc.click(&heading);
        assert_eq!(hits.get(), 1);

        disposer.dispose();
        doc.click(&heading);
        assert_eq!(hits.get(), 1);
    }
}
