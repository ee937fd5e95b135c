//! Reveal-on-scroll animations.
//!
//! Each element matched by a binding is watched until it is at least 10%
//! visible, then receives its animation classes and is unobserved. An
//! element is animated at most once per page load.

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::{Document, Element, Intersection, VisibilityObserver};

/// Fraction of an element that must be visible before it is revealed.
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// Delay step, in the units of the `delay-*` classes, between consecutive
/// members of a staggered group.
pub const STAGGER_STEP: usize = 100;

/// Attribute recording the classes an element will receive.
pub const ANIMATION_ATTRIBUTE: &str = "data-animation";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationBinding {
    pub selector: &'static str,
    pub classes: &'static [&'static str],
    /// Repeated-content groups get an extra per-element delay class.
    pub stagger: bool,
}

const fn binding(
    selector: &'static str,
    classes: &'static [&'static str],
    stagger: bool,
) -> AnimationBinding {
    AnimationBinding {
        selector,
        classes,
        stagger,
    }
}

const FADE_IN_UP: &[&str] = &["animate-fadeInUp"];

pub const DEFAULT_BINDINGS: &[AnimationBinding] = &[
    binding(".hero-content", &["animate-fadeIn"], false),
    binding(".profile-image", &["animate-fadeInUp", "delay-100"], false),
    binding(".hero h1", &["animate-fadeInUp", "delay-200"], false),
    binding(".hero p", &["animate-fadeInUp", "delay-300"], false),
    binding(".hero-contact", &["animate-fadeInUp", "delay-400"], false),
    binding(".cta-button", &["animate-fadeInUp", "delay-500"], false),
    binding(".section-title", FADE_IN_UP, false),
    binding(".project-card", FADE_IN_UP, true),
    binding(".skill-category", FADE_IN_UP, true),
    binding(".timeline-item", FADE_IN_UP, true),
    binding(".certification-card", FADE_IN_UP, true),
    binding(".contact-form", FADE_IN_UP, false),
    binding(".contact-info", FADE_IN_UP, false),
];

/// Delay class for the element at `index` (0-based) within a staggered group.
pub fn stagger_class(index: usize) -> String {
    format!("delay-{}", (index + 1) * STAGGER_STEP)
}

/// Classes for the `index`th element matched by `binding`.
pub fn classes_for(binding: &AnimationBinding, index: usize) -> Vec<String> {
    let mut classes: Vec<String> = binding.classes.iter().map(|c| c.to_string()).collect();
    if binding.stagger {
        classes.push(stagger_class(index));
    }
    classes
}

struct Pending<E> {
    element: E,
    classes: Vec<String>,
}

type PendingList<E> = Rc<RefCell<Vec<Pending<E>>>>;

pub struct RevealAnimator<D: Document> {
    observer: D::Observer,
    pending: PendingList<D::Element>,
}

impl<D: Document> RevealAnimator<D> {
    /// Register every element currently matching `bindings`.
    pub fn attach(doc: &D, bindings: &[AnimationBinding]) -> Self {
        let pending: PendingList<D::Element> = Rc::new(RefCell::new(Vec::new()));

        let callback_pending = Rc::downgrade(&pending);
        let observer = doc.observe_visibility(
            REVEAL_THRESHOLD,
            Rc::new(
                move |entries: &[Intersection<D::Element>],
                      observer: &dyn VisibilityObserver<D::Element>| {
                    if let Some(pending) = callback_pending.upgrade() {
                        reveal(&pending, entries, observer);
                    }
                },
            ),
        );

        for binding in bindings {
            for (index, element) in doc.query_selector_all(binding.selector).into_iter().enumerate()
            {
                let classes = classes_for(binding, index);
                element.set_attribute(ANIMATION_ATTRIBUTE, &classes.join(" "));

                let mut list = pending.borrow_mut();
                match list.iter_mut().find(|p| p.element.is_same(&element)) {
                    // Later bindings win, as with a rewritten data attribute.
                    Some(existing) => existing.classes = classes,
                    None => {
                        observer.observe(&element);
                        list.push(Pending { element, classes });
                    }
                }
            }
        }

        tracing::debug!(elements = pending.borrow().len(), "reveal animations registered");
        Self { observer, pending }
    }

    /// Elements registered but not yet revealed.
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn dispose(self) {
        self.observer.disconnect();
        self.pending.borrow_mut().clear();
    }
}

fn reveal<E: Element>(
    pending: &RefCell<Vec<Pending<E>>>,
    entries: &[Intersection<E>],
    observer: &dyn VisibilityObserver<E>,
) {
    for entry in entries {
        if !entry.is_intersecting || entry.ratio < REVEAL_THRESHOLD {
            continue;
        }
        let revealed = {
            let mut list = pending.borrow_mut();
            list.iter()
                .position(|p| p.element.is_same(&entry.target))
                .map(|i| list.remove(i))
        };
        if let Some(Pending { element, classes }) = revealed {
            for class in &classes {
                element.add_class(class);
            }
            observer.unobserve(&element);
        }
    }
}
