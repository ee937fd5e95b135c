//! About section: profile photo with hover zoom and a load/error lifecycle.

use std::cell::Cell;
use std::rc::Rc;

use crate::content::Profile;
use crate::dom::{inject_stylesheet, Disposer, Document, DomEvent, Element, EventKind};

pub const ABOUT_CSS: &str = include_str!("../styles/about.css");

pub const LOADING_CLASS: &str = "loading";

const HOVER_SCALE: &str = "scale(1.05)";
const REST_SCALE: &str = "scale(1)";

const IMAGE_STYLE: &[(&str, &str)] = &[
    ("width", "100%"),
    ("height", "100%"),
    ("object-fit", "cover"),
    ("border-radius", "20px"),
    ("transition", "transform 0.5s ease"),
];

const FALLBACK_HTML: &str = r#"<div class="about-fallback" style="display: flex; align-items: center; justify-content: center; height: 100%; background: linear-gradient(45deg, var(--primary), #7b2cbf); color: white; font-size: 4rem; border-radius: 20px;">👨‍💻</div>"#;

/// Terminal state of the profile image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Loading,
    Loaded,
    Failed,
}

pub struct AboutSection<E> {
    container: Option<E>,
    state: Rc<Cell<ImageState>>,
}

impl<E: Element> AboutSection<E> {
    /// Enhance `#about` if the page has one.
    pub fn enhance<D>(doc: &D, profile: &Profile) -> Option<(Self, Disposer)>
    where
        D: Document<Element = E>,
    {
        let about = doc.get_element_by_id("about")?;
        let state = Rc::new(Cell::new(ImageState::Loading));
        let mut disposer = Disposer::default();

        let container = about.query_selector(".about-image");
        if let Some(container) = &container {
            if let Some(image) = mount_image(doc, container, profile) {
                disposer.push(hover_zoom(container));
                container.add_class(LOADING_CLASS);
                disposer.push(track_loading(container, &image, &state));
            }
        }

        inject_stylesheet(doc, ABOUT_CSS);

        Some((Self { container, state }, disposer))
    }

    pub fn container(&self) -> Option<&E> {
        self.container.as_ref()
    }

    pub fn image_state(&self) -> ImageState {
        self.state.get()
    }
}

fn mount_image<D: Document>(doc: &D, container: &D::Element, profile: &Profile) -> Option<D::Element> {
    let image = doc.create_element("img")?;
    image.set_attribute("src", &profile.profile_image);
    image.set_attribute("alt", &profile.owner_name);
    for (name, value) in IMAGE_STYLE {
        image.set_style_property(name, value);
    }
    container.set_inner_html("");
    container.append_child(&image);
    Some(image)
}

fn hover_zoom<E: Element>(container: &E) -> Disposer {
    let scale = |container: E, transform: &'static str| {
        Rc::new(move |_event: &DomEvent<E>| {
            if let Some(img) = container.query_selector("img") {
                img.set_style_property("transform", transform);
            }
        })
    };

    let mut disposer = container.listen(EventKind::MouseEnter, scale(container.clone(), HOVER_SCALE));
    disposer.push(container.listen(EventKind::MouseLeave, scale(container.clone(), REST_SCALE)));
    disposer
}

/// Load and error are mutually exclusive; the first one to fire wins.
fn track_loading<E: Element>(container: &E, image: &E, state: &Rc<Cell<ImageState>>) -> Disposer {
    let on_load = {
        let container = container.clone();
        let state = state.clone();
        Rc::new(move |_event: &DomEvent<E>| {
            if state.get() != ImageState::Loading {
                return;
            }
            state.set(ImageState::Loaded);
            container.remove_class(LOADING_CLASS);
        })
    };

    let on_error = {
        let container = container.clone();
        let state = state.clone();
        Rc::new(move |_event: &DomEvent<E>| {
            if state.get() != ImageState::Loading {
                return;
            }
            state.set(ImageState::Failed);
            container.remove_class(LOADING_CLASS);
            container.set_inner_html(FALLBACK_HTML);
            tracing::warn!("profile image failed to load, showing fallback");
        })
    };

    let mut disposer = image.listen(EventKind::Load, on_load);
    disposer.push(image.listen(EventKind::Error, on_error));
    disposer
}
