//! Contact form augmentation. Safe to run any number of times.

use crate::dom::{Document, Element};

pub const SUBMIT_ICON: &str = "→";
pub const CONSENT_LABEL: &str = "I agree to be contacted regarding this message";

/// Give `form` a submission target, an icon on its submit button, and a
/// single consent checkbox group.
pub fn enhance<D: Document>(doc: &D, form: &D::Element, endpoint: &str) {
    if form.attribute("action").map_or(true, |a| a.is_empty()) {
        form.set_attribute("action", endpoint);
        form.set_attribute("method", "POST");
    }

    if let Some(button) = form.query_selector(".submit-btn") {
        if button.query_selector(".btn-icon").is_none() {
            let label = button.text_content();
            button.set_inner_html(&format!(
                r#"<span class="btn-text">{}</span><span class="btn-icon">{}</span>"#,
                escape_html(label.trim()),
                SUBMIT_ICON
            ));
        }
    }

    if form.query_selector(".form-checkbox").is_none() {
        add_consent_group(doc, form);
    }
}

fn add_consent_group<D: Document>(doc: &D, form: &D::Element) {
    let Some(group) = doc.create_element("div") else {
        return;
    };
    group.set_attribute("class", "form-group form-checkbox");
    group.set_inner_html(&format!(
        r#"<input type="checkbox" id="consent" name="consent" required><label for="consent">{}</label>"#,
        CONSENT_LABEL
    ));

    match form.query_selector_all(".form-group").pop() {
        Some(last) => last.insert_after(&group),
        None => form.append_child(&group),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
