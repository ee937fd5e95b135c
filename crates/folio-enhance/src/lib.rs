//! folio-enhance - view enhancer for the folio portfolio page.
//!
//! Runs once per page load and wires:
//! - Reveal-on-scroll animations with per-group stagger
//! - Contact form augmentation
//! - A scroll-progress bar
//! - Cosmetic stylesheets for the skills, footer, and about sections
//! - The about-section profile photo
//! - The project modal
//!
//! Components are written against the [`dom`] traits. In the browser they
//! run on `web-sys` (see `web`); natively on the in-memory DOM in [`memory`].
//!
//! # Building for the browser
//!
//! The page loads the enhancer from `/pkg/folio_enhance.js`. Build it into
//! the site root from the workspace root with:
//!
//! ```text
//! wasm-pack build crates/folio-enhance --target web --out-dir ../../site/pkg
//! ```
//!
//! `--out-dir` is relative to the crate, so the output lands in `site/pkg`,
//! which the server's catch-all serves as static files.

pub mod about;
pub mod animator;
pub mod contact_form;
pub mod content;
pub mod dom;
#[cfg(not(target_arch = "wasm32"))]
pub mod memory;
pub mod modal;
pub mod progress;
pub mod styles;
#[cfg(target_arch = "wasm32")]
mod web;

pub use content::{Catalog, ContentError, Profile, Project, SiteContent};
pub use dom::{Disposer, Document, Element};
pub use modal::{ModalController, ModalError, ModalPhase};

use about::AboutSection;
use animator::{RevealAnimator, DEFAULT_BINDINGS};
use progress::ProgressIndicator;

pub const CONTACT_FORM_ID: &str = "contactForm";

/// All enhancements wired into one page.
pub struct Enhancer<D: Document> {
    animator: RevealAnimator<D>,
    modal: Option<ModalController<D>>,
    progress: Option<ProgressIndicator<D::Element>>,
    about: Option<AboutSection<D::Element>>,
    disposer: Disposer,
}

impl<D: Document> Enhancer<D> {
    /// Run every enhancement against `doc`. Missing page sections are
    /// skipped; a missing modal scaffold is logged.
    pub fn init(doc: &D, content: SiteContent) -> Self {
        let SiteContent { profile, projects } = content;
        let mut disposer = Disposer::default();

        let animator = RevealAnimator::attach(doc, DEFAULT_BINDINGS);

        if let Some(form) = doc.get_element_by_id(CONTACT_FORM_ID) {
            contact_form::enhance(doc, &form, &profile.form_endpoint);
        }

        let progress = ProgressIndicator::install(doc).map(|(indicator, listener)| {
            disposer.push(listener);
            indicator
        });

        styles::enhance_skills_section(doc);
        styles::darken_footer(doc);

        let about = AboutSection::enhance(doc, &profile).map(|(section, listeners)| {
            disposer.push(listeners);
            section
        });

        let modal = match ModalController::attach(doc, projects) {
            Ok((controller, listeners)) => {
                disposer.push(listeners);
                Some(controller)
            }
            Err(e) => {
                tracing::error!(error = %e, "project modals unavailable");
                None
            }
        };

        tracing::info!("portfolio enhancements loaded");
        Self {
            animator,
            modal,
            progress,
            about,
            disposer,
        }
    }

    pub fn open_modal(&self, id: &str) -> Result<(), ModalError> {
        match &self.modal {
            Some(modal) => modal.open(id),
            None => {
                tracing::error!(project = id, "modal elements not found");
                Err(ModalError::MissingScaffold)
            }
        }
    }

    pub fn close_modal(&self) {
        match &self.modal {
            Some(modal) => modal.close(),
            None => tracing::error!("modal elements not found"),
        }
    }

    /// Current modal phase, or `None` without a modal scaffold.
    pub fn modal_phase(&self) -> Option<ModalPhase> {
        self.modal.as_ref().map(|m| m.phase())
    }

    pub fn pending_reveals(&self) -> usize {
        self.animator.pending()
    }

    pub fn progress(&self) -> Option<&ProgressIndicator<D::Element>> {
        self.progress.as_ref()
    }

    pub fn about(&self) -> Option<&AboutSection<D::Element>> {
        self.about.as_ref()
    }

    /// Remove every listener and stop watching for reveals.
    pub fn dispose(self) {
        self.disposer.dispose();
        self.animator.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Portfolio</title></head>
<body>
  <section class="hero"><div class="hero-content"><h1>Hi</h1></div></section>
  <section id="about"><div class="about-image">🧑</div></section>
  <section class="projects">
    <div class="project-card" data-project="project1"></div>
    <div class="project-card" data-project="project2"></div>
  </section>
  <form id="contactForm" class="contact-form">
    <div class="form-group"><input name="email"></div>
    <button class="submit-btn">Send</button>
  </form>
  <footer class="footer"></footer>
  <div id="projectModal"><div id="modalContent"></div></div>
</body></html>"#;

    #[test]
    fn test_init_wires_everything() {
        let doc = MemoryDocument::parse(PAGE);
        let enhancer = Enhancer::init(&doc, SiteContent::bundled().unwrap());

        // progress, skills, footer, about, modal
        assert_eq!(doc.query_selector_all("head style").len(), 5);
        assert_eq!(doc.query_selector_all(".progress-bar").len(), 1);
        assert_eq!(doc.query_selector_all(".form-checkbox").len(), 1);
        assert_eq!(doc.query_selector_all(".about-image img").len(), 1);
        // hero-content, h1, two cards, contact form
        assert_eq!(enhancer.pending_reveals(), 5);
        assert_eq!(enhancer.modal_phase(), Some(ModalPhase::Closed));

        enhancer.open_modal("project2").unwrap();
        assert_eq!(enhancer.modal_phase(), Some(ModalPhase::Opening));
        enhancer.close_modal();
        assert_eq!(enhancer.modal_phase(), Some(ModalPhase::Closing));
    }

    #[test]
    fn test_without_modal_scaffold() {
        let doc = MemoryDocument::parse("<html><head></head><body></body></html>");
        let enhancer = Enhancer::init(&doc, SiteContent::default());
        assert_eq!(enhancer.modal_phase(), None);
        assert!(matches!(
            enhancer.open_modal("project1"),
            Err(ModalError::MissingScaffold)
        ));
        enhancer.close_modal();
        assert!(enhancer.about().is_none());
    }

    #[test]
    fn test_dispose_removes_listeners() {
        let doc = MemoryDocument::parse(PAGE);
        doc.set_scroll_metrics(dom::ScrollMetrics {
            scroll_y: 0.0,
            scroll_height: 2000.0,
            viewport_height: 1000.0,
        });
        let enhancer = Enhancer::init(&doc, SiteContent::bundled().unwrap());
        let bar = enhancer.progress().unwrap().bar().clone();
        enhancer.dispose();

        doc.scroll_to(500.0);
        assert_eq!(bar.style_property("width"), None);
        assert_eq!(doc.observed_count(), 0);
    }
}
