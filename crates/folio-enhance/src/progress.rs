//! Scroll-progress bar pinned to the top of the viewport.

use std::rc::Rc;

use crate::dom::{inject_stylesheet, Disposer, Document, DomEvent, Element, EventKind, ScrollMetrics};

pub const PROGRESS_CSS: &str = include_str!("../styles/progress.css");

/// Percentage of the page scrolled, in `[0, 100]`. A page that cannot
/// scroll reports 0.
pub fn progress_percent(metrics: &ScrollMetrics) -> f64 {
    let scrollable = metrics.scroll_height - metrics.viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (metrics.scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

pub struct ProgressIndicator<E> {
    bar: E,
}

impl<E: Element> ProgressIndicator<E> {
    /// Insert the bar and its stylesheet and follow window scrolling.
    ///
    /// There is no guard against a second install; each call adds a bar.
    pub fn install<D>(doc: &D) -> Option<(Self, Disposer)>
    where
        D: Document<Element = E>,
    {
        let body = doc.body()?;
        let bar = doc.create_element("div")?;
        bar.set_attribute("class", "progress-bar");
        body.append_child(&bar);
        inject_stylesheet(doc, PROGRESS_CSS);

        let listener_doc = doc.clone();
        let listener_bar = bar.clone();
        let disposer = doc.listen(
            EventKind::Scroll,
            Rc::new(move |_event: &DomEvent<E>| {
                let percent = progress_percent(&listener_doc.scroll_metrics());
                listener_bar.set_style_property("width", &format!("{}%", percent));
            }),
        );

        Some((Self { bar }, disposer))
    }

    pub fn bar(&self) -> &E {
        &self.bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDocument;

    fn metrics(scroll_y: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_y,
            scroll_height: 3000.0,
            viewport_height: 1000.0,
        }
    }

    #[test]
    fn test_progress_bounds() {
        assert_eq!(progress_percent(&metrics(0.0)), 0.0);
        assert_eq!(progress_percent(&metrics(2000.0)), 100.0);
        assert_eq!(progress_percent(&metrics(500.0)), 25.0);
    }

    #[test]
    fn test_progress_clamped_and_unscrollable() {
        assert_eq!(progress_percent(&metrics(2500.0)), 100.0);
        assert_eq!(progress_percent(&metrics(-10.0)), 0.0);
        let flat = ScrollMetrics {
            scroll_y: 0.0,
            scroll_height: 800.0,
            viewport_height: 800.0,
        };
        assert_eq!(progress_percent(&flat), 0.0);
    }

    #[test]
    fn test_bar_tracks_scroll() {
        let doc = MemoryDocument::parse("<html><head></head><body></body></html>");
        doc.set_scroll_metrics(metrics(0.0));
        let (indicator, _disposer) = ProgressIndicator::install(&doc).unwrap();

        assert_eq!(doc.query_selector_all(".progress-bar").len(), 1);
        assert_eq!(doc.query_selector_all("head style").len(), 1);

        doc.scroll_to(1000.0);
        assert_eq!(indicator.bar().style_property("width").as_deref(), Some("50%"));
        doc.scroll_to(2000.0);
        assert_eq!(indicator.bar().style_property("width").as_deref(), Some("100%"));
        doc.scroll_to(0.0);
        assert_eq!(indicator.bar().style_property("width").as_deref(), Some("0%"));
    }

    #[test]
    fn test_install_twice_adds_two_bars() {
        let doc = MemoryDocument::parse("<html><head></head><body></body></html>");
        let _first = ProgressIndicator::install(&doc).unwrap();
        let _second = ProgressIndicator::install(&doc).unwrap();
        assert_eq!(doc.query_selector_all(".progress-bar").len(), 2);
    }

    #[test]
    fn test_dispose_stops_tracking() {
        let doc = MemoryDocument::parse("<html><head></head><body></body></html>");
        doc.set_scroll_metrics(metrics(0.0));
        let (indicator, disposer) = ProgressIndicator::install(&doc).unwrap();
        disposer.dispose();
        doc.scroll_to(1000.0);
        assert_eq!(indicator.bar().style_property("width"), None);
    }
}
