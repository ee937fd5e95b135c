//! DOM primitives the enhancer is written against.
//!
//! Components never reach for a global document. They receive a [`Document`]
//! and the element handles they work on, and hand back a [`Disposer`] for
//! anything they registered.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Browser events the enhancer listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    Scroll,
    MouseEnter,
    MouseLeave,
    Load,
    Error,
}

impl EventKind {
    /// Name used by `addEventListener`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
            EventKind::Scroll => "scroll",
            EventKind::MouseEnter => "mouseenter",
            EventKind::MouseLeave => "mouseleave",
            EventKind::Load => "load",
            EventKind::Error => "error",
        }
    }
}

/// A dispatched event with the payload the enhancer reads.
#[derive(Clone)]
pub enum DomEvent<E> {
    Click { target: Option<E> },
    KeyDown { key: String },
    Scroll,
    MouseEnter,
    MouseLeave,
    Load,
    Error,
}

impl<E> DomEvent<E> {
    pub fn kind(&self) -> EventKind {
        match self {
            DomEvent::Click { .. } => EventKind::Click,
            DomEvent::KeyDown { .. } => EventKind::KeyDown,
            DomEvent::Scroll => EventKind::Scroll,
            DomEvent::MouseEnter => EventKind::MouseEnter,
            DomEvent::MouseLeave => EventKind::MouseLeave,
            DomEvent::Load => EventKind::Load,
            DomEvent::Error => EventKind::Error,
        }
    }
}

impl<E> fmt::Debug for DomEvent<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomEvent::KeyDown { key } => write!(f, "KeyDown({key})"),
            other => write!(f, "{}", other.kind().as_str()),
        }
    }
}

pub type Listener<E> = Rc<dyn Fn(&DomEvent<E>)>;

/// Handle returned by [`Document::set_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// Scroll position of the window and the size of the scrollable document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

/// One entry of a visibility report.
#[derive(Clone)]
pub struct Intersection<E> {
    pub target: E,
    pub is_intersecting: bool,
    pub ratio: f64,
}

pub trait VisibilityObserver<E> {
    fn observe(&self, element: &E);
    fn unobserve(&self, element: &E);
    fn disconnect(&self);
}

pub type IntersectionCallback<E> = Rc<dyn Fn(&[Intersection<E>], &dyn VisibilityObserver<E>)>;

/// A cheap, cloneable handle to a DOM element.
pub trait Element: Clone + 'static {
    fn tag_name(&self) -> String;
    /// Node identity, not structural equality.
    fn is_same(&self, other: &Self) -> bool;

    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);

    fn style_property(&self, name: &str) -> Option<String>;
    fn set_style_property(&self, name: &str, value: &str);

    fn text_content(&self) -> String;
    fn set_text_content(&self, text: &str);
    fn set_inner_html(&self, html: &str);

    fn append_child(&self, child: &Self);
    /// Insert `sibling` directly after this element.
    fn insert_after(&self, sibling: &Self);

    fn query_selector(&self, selector: &str) -> Option<Self>;
    fn query_selector_all(&self, selector: &str) -> Vec<Self>;

    fn listen(&self, kind: EventKind, listener: Listener<Self>) -> Disposer;
}

/// The page the enhancer runs in, including its window-level services.
pub trait Document: Clone + 'static {
    type Element: Element;
    type Observer: VisibilityObserver<Self::Element> + 'static;

    fn head(&self) -> Option<Self::Element>;
    fn body(&self) -> Option<Self::Element>;
    fn get_element_by_id(&self, id: &str) -> Option<Self::Element>;
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;
    fn create_element(&self, tag: &str) -> Option<Self::Element>;

    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Listen on the window (click, scroll) or document (keydown).
    fn listen(&self, kind: EventKind, listener: Listener<Self::Element>) -> Disposer;

    fn observe_visibility(
        &self,
        threshold: f64,
        callback: IntersectionCallback<Self::Element>,
    ) -> Self::Observer;

    fn set_timeout(&self, delay: Duration, task: Box<dyn FnOnce()>) -> TimerId;
    fn clear_timeout(&self, id: TimerId);
}

/// Undo actions collected while wiring a component.
#[derive(Default)]
pub struct Disposer {
    actions: Vec<Box<dyn FnOnce()>>,
}

impl Disposer {
    pub fn new(action: impl FnOnce() + 'static) -> Self {
        Self {
            actions: vec![Box::new(action)],
        }
    }

    pub fn push(&mut self, other: Disposer) {
        self.actions.extend(other.actions);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run every undo action, most recent first.
    pub fn dispose(self) {
        for action in self.actions.into_iter().rev() {
            action();
        }
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("actions", &self.actions.len())
            .finish()
    }
}

/// Append a `<style>` block with `css` to the document head.
pub fn inject_stylesheet<D: Document>(doc: &D, css: &str) -> Option<D::Element> {
    let head = doc.head()?;
    let style = doc.create_element("style")?;
    style.set_text_content(css);
    head.append_child(&style);
    Some(style)
}
