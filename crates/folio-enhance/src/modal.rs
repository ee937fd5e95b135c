//! Project modal controller.
//!
//! The modal surface moves through `Closed → Opening → Open → Closing →
//! Closed`. Becoming visible and finishing the entrance animation are
//! separate steps, as are the exit animation and actually hiding. Each
//! deferred step is a cancellable timer owned by the controller; starting a
//! new transition cancels the previous one's pending step.

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use askama::Template;
use thiserror::Error;

use crate::content::{Catalog, Project};
use crate::dom::{inject_stylesheet, Disposer, Document, DomEvent, Element, EventKind, TimerId};

pub const MODAL_ID: &str = "projectModal";
pub const MODAL_CONTENT_ID: &str = "modalContent";
pub const CLOSE_SELECTOR: &str = ".modal-close";
pub const TRIGGER_ATTRIBUTE: &str = "data-project";

/// Presentation for the rendered modal body.
pub const MODAL_CSS: &str = include_str!("../styles/modal.css");

/// Delay between showing the modal and applying its entrance styles.
pub const ENTER_DELAY: Duration = Duration::from_millis(50);
/// Length of the exit animation before the modal is hidden.
pub const EXIT_DELAY: Duration = Duration::from_millis(300);

const SHOWN_TRANSFORM: &str = "scale(1) translateY(0)";
const HIDDEN_TRANSFORM: &str = "scale(0.95) translateY(20px)";

#[derive(Debug, Error)]
pub enum ModalError {
    #[error("project not found: {0}")]
    UnknownProject(String),

    #[error("modal elements not found")]
    MissingScaffold,

    #[error("failed to render project details: {0}")]
    Render(#[from] askama::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalPhase {
    Closed,
    Opening,
    Open,
    Closing,
}

#[derive(Template)]
#[template(path = "modal_body.html")]
struct ModalBody<'a> {
    project: &'a Project,
    live_url: Option<&'a str>,
    source_url: Option<&'a str>,
}

/// Render the modal body for `project`. Links appear only for the URLs the
/// project has.
pub fn render_project(project: &Project) -> Result<String, askama::Error> {
    ModalBody {
        project,
        live_url: project.live_url.as_deref(),
        source_url: project.source_url.as_deref(),
    }
    .render()
}

struct ModalState<D: Document> {
    doc: D,
    modal: D::Element,
    content: D::Element,
    catalog: Catalog,
    phase: Cell<ModalPhase>,
    transition: Cell<Option<TimerId>>,
}

impl<D: Document> ModalState<D> {
    fn finish_opening(&self) {
        if self.phase.get() != ModalPhase::Opening {
            return;
        }
        self.content.set_style_property("transform", SHOWN_TRANSFORM);
        self.content.set_style_property("opacity", "1");
        self.phase.set(ModalPhase::Open);
    }

    fn finish_closing(&self) {
        if self.phase.get() != ModalPhase::Closing {
            return;
        }
        self.modal.set_style_property("display", "none");
        if let Some(body) = self.doc.body() {
            body.set_style_property("overflow", "auto");
        }
        self.phase.set(ModalPhase::Closed);
    }

    fn cancel_transition(&self) {
        if let Some(pending) = self.transition.take() {
            self.doc.clear_timeout(pending);
        }
    }
}

/// Start `step` after `delay`, superseding any pending step.
fn schedule<D: Document>(state: &Rc<ModalState<D>>, delay: Duration, step: fn(&ModalState<D>)) {
    state.cancel_transition();
    let weak = Rc::downgrade(state);
    let id = state.doc.set_timeout(
        delay,
        Box::new(move || {
            if let Some(state) = weak.upgrade() {
                state.transition.set(None);
                step(&state);
            }
        }),
    );
    state.transition.set(Some(id));
}

pub struct ModalController<D: Document> {
    state: Rc<ModalState<D>>,
}

impl<D: Document> Clone for ModalController<D> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<D: Document> ModalController<D> {
    pub fn new(doc: &D, modal: D::Element, content: D::Element, catalog: Catalog) -> Self {
        Self {
            state: Rc::new(ModalState {
                doc: doc.clone(),
                modal,
                content,
                catalog,
                phase: Cell::new(ModalPhase::Closed),
                transition: Cell::new(None),
            }),
        }
    }

    /// Find the modal scaffold in `doc` and wire its dismissal and trigger
    /// listeners.
    pub fn attach(doc: &D, catalog: Catalog) -> Result<(Self, Disposer), ModalError> {
        let (Some(modal), Some(content)) = (
            doc.get_element_by_id(MODAL_ID),
            doc.get_element_by_id(MODAL_CONTENT_ID),
        ) else {
            return Err(ModalError::MissingScaffold);
        };

        let controller = Self::new(doc, modal, content, catalog);
        let disposer = controller.listen();
        inject_stylesheet(doc, MODAL_CSS);
        tracing::info!(
            projects = controller.state.catalog.len(),
            "project modals initialized"
        );
        Ok((controller, disposer))
    }

    /// Wire backdrop clicks, the Escape key, close buttons, and
    /// `data-project` triggers.
    pub fn listen(&self) -> Disposer {
        let state = &self.state;
        let mut disposer = Disposer::default();

        let weak = Rc::downgrade(state);
        disposer.push(state.doc.listen(
            EventKind::Click,
            Rc::new(move |event: &DomEvent<D::Element>| {
                let Some(state) = weak.upgrade() else { return };
                if let DomEvent::Click {
                    target: Some(target),
                } = event
                {
                    if target.is_same(&state.modal) {
                        Self::from_state(state).close();
                    }
                }
            }),
        ));

        let weak = Rc::downgrade(state);
        disposer.push(state.doc.listen(
            EventKind::KeyDown,
            Rc::new(move |event: &DomEvent<D::Element>| {
                let Some(state) = weak.upgrade() else { return };
                if let DomEvent::KeyDown { key } = event {
                    let shown = matches!(state.phase.get(), ModalPhase::Opening | ModalPhase::Open);
                    if key == "Escape" && shown {
                        Self::from_state(state).close();
                    }
                }
            }),
        ));

        for button in state.modal.query_selector_all(CLOSE_SELECTOR) {
            let weak = Rc::downgrade(state);
            disposer.push(button.listen(
                EventKind::Click,
                Rc::new(move |_event: &DomEvent<D::Element>| {
                    if let Some(state) = weak.upgrade() {
                        Self::from_state(state).close();
                    }
                }),
            ));
        }

        let selector = format!("[{}]", TRIGGER_ATTRIBUTE);
        for trigger in state.doc.query_selector_all(&selector) {
            let Some(id) = trigger.attribute(TRIGGER_ATTRIBUTE) else {
                continue;
            };
            let weak: Weak<ModalState<D>> = Rc::downgrade(state);
            disposer.push(trigger.listen(
                EventKind::Click,
                Rc::new(move |_event: &DomEvent<D::Element>| {
                    if let Some(state) = weak.upgrade() {
                        // Failures are logged by open().
                        let _ = Self::from_state(state).open(&id);
                    }
                }),
            ));
        }

        disposer
    }

    fn from_state(state: Rc<ModalState<D>>) -> Self {
        Self { state }
    }

    pub fn phase(&self) -> ModalPhase {
        self.state.phase.get()
    }

    pub fn is_visible(&self) -> bool {
        self.state.modal.style_property("display").as_deref() == Some("block")
    }

    /// Show the details of project `id`. An unknown id is logged and leaves
    /// the modal untouched.
    pub fn open(&self, id: &str) -> Result<(), ModalError> {
        let state = &self.state;
        let Some(project) = state.catalog.get(id) else {
            tracing::error!(project = id, "project not found, modal not opened");
            return Err(ModalError::UnknownProject(id.to_string()));
        };
        let html = render_project(project).map_err(|e| {
            tracing::error!(project = id, error = %e, "failed to render project details");
            e
        })?;

        state.content.set_inner_html(&html);
        state.modal.set_style_property("display", "block");
        if let Some(body) = state.doc.body() {
            body.set_style_property("overflow", "hidden");
        }
        state.phase.set(ModalPhase::Opening);
        schedule(state, ENTER_DELAY, ModalState::finish_opening);

        tracing::debug!(project = id, "modal opening");
        Ok(())
    }

    /// Play the exit animation, then hide. Redundant while closing or closed.
    pub fn close(&self) {
        let state = &self.state;
        if matches!(state.phase.get(), ModalPhase::Closed | ModalPhase::Closing) {
            return;
        }
        state.content.set_style_property("transform", HIDDEN_TRANSFORM);
        state.content.set_style_property("opacity", "0");
        state.phase.set(ModalPhase::Closing);
        schedule(state, EXIT_DELAY, ModalState::finish_closing);

        tracing::debug!("modal closing");
    }
}
