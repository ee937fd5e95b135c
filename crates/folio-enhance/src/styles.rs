//! Cosmetic stylesheets appended to the page head.
//!
//! Each injector adds one `<style>` block unconditionally. Nothing is
//! deduplicated or removed.

use crate::dom::{inject_stylesheet, Document};

pub const SKILLS_CSS: &str = include_str!("../styles/skills.css");
pub const FOOTER_CSS: &str = include_str!("../styles/footer.css");

pub fn enhance_skills_section<D: Document>(doc: &D) -> Option<D::Element> {
    inject_stylesheet(doc, SKILLS_CSS)
}

pub fn darken_footer<D: Document>(doc: &D) -> Option<D::Element> {
    inject_stylesheet(doc, FOOTER_CSS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::memory::MemoryDocument;

    #[test]
    fn test_injectors_append_without_dedup() {
        let doc = MemoryDocument::parse("<html><head></head><body></body></html>");
        enhance_skills_section(&doc).unwrap();
        darken_footer(&doc).unwrap();
        enhance_skills_section(&doc).unwrap();

        let styles = doc.query_selector_all("head style");
        assert_eq!(styles.len(), 3);
        assert!(styles[0].text_content().contains(".skill-category"));
        assert!(styles[1].text_content().contains(".footer"));
    }
}
