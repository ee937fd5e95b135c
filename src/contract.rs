//! Checks that a portfolio document provides the elements the enhancer binds to.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use folio_enhance::Catalog;
use regex::Regex;
use scraper::{Html, Selector};

/// Elements every portfolio document must contain, by selector.
pub const REQUIRED_ELEMENTS: &[&str] = &[
    "#contactForm",
    "#projectModal",
    "#modalContent",
    "#about",
    ".about-image",
];

static OPEN_MODAL_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"openModal\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

static PROJECT_TRIGGER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-project]").unwrap());

static ONCLICK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("[onclick]").unwrap());

/// A mismatch between the document and the enhancer's expectations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContractIssue {
    /// A required element is absent.
    MissingElement(String),
    /// A catalog project has no element that opens it.
    MissingTrigger(String),
    /// An element opens a project the catalog does not know.
    UnknownTrigger(String),
}

impl fmt::Display for ContractIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement(selector) => write!(f, "missing required element {}", selector),
            Self::MissingTrigger(id) => write!(f, "project {} has no trigger", id),
            Self::UnknownTrigger(id) => write!(f, "trigger opens unknown project {}", id),
        }
    }
}

/// Project ids referenced by `data-project` attributes or `openModal('..')` calls.
pub fn trigger_ids(document: &Html) -> BTreeSet<String> {
    let mut ids: BTreeSet<String> = document
        .select(&PROJECT_TRIGGER)
        .filter_map(|el| el.value().attr("data-project"))
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    for el in document.select(&ONCLICK) {
        if let Some(handler) = el.value().attr("onclick") {
            ids.extend(
                OPEN_MODAL_CALL
                    .captures_iter(handler)
                    .map(|caps| caps[1].to_string()),
            );
        }
    }
    ids
}

/// Check a portfolio document against the catalog. Issues come back sorted.
pub fn check_document(html: &str, catalog: &Catalog) -> Vec<ContractIssue> {
    let document = Html::parse_document(html);
    let mut issues = Vec::new();

    for selector_str in REQUIRED_ELEMENTS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if document.select(&selector).next().is_none() {
                issues.push(ContractIssue::MissingElement(selector_str.to_string()));
            }
        }
    }

    let triggers = trigger_ids(&document);
    for id in catalog.ids() {
        if !triggers.contains(id) {
            issues.push(ContractIssue::MissingTrigger(id.to_string()));
        }
    }
    for id in &triggers {
        if !catalog.contains(id) {
            issues.push(ContractIssue::UnknownTrigger(id.clone()));
        }
    }

    issues.sort();
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_enhance::Project;

    fn catalog(ids: &[&str]) -> Catalog {
        Catalog::new(
            ids.iter()
                .map(|id| Project {
                    id: id.to_string(),
                    title: format!("Project {}", id),
                    ..Project::default()
                })
                .collect(),
        )
        .unwrap()
    }

    const COMPLETE: &str = r#"<html><body>
        <section id="about"><div class="about-image"></div></section>
        <div class="project-card" data-project="alpha"></div>
        <button onclick="openModal('beta')">Beta</button>
        <form id="contactForm"></form>
        <div id="projectModal"><div id="modalContent"></div></div>
    </body></html>"#;

    #[test]
    fn test_complete_document_passes() {
        assert!(check_document(COMPLETE, &catalog(&["alpha", "beta"])).is_empty());
    }

    #[test]
    fn test_trigger_ids_from_both_forms() {
        let doc = Html::parse_document(
            r#"<div data-project=" one "></div><a onclick='openModal("two"); return false'></a>"#,
        );
        let ids: Vec<String> = trigger_ids(&doc).into_iter().collect();
        assert_eq!(ids, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_missing_elements_reported() {
        let issues = check_document("<html><body></body></html>", &catalog(&[]));
        assert_eq!(issues.len(), REQUIRED_ELEMENTS.len());
        assert!(issues.contains(&ContractIssue::MissingElement("#projectModal".to_string())));
        assert!(issues.contains(&ContractIssue::MissingElement(".about-image".to_string())));
    }

    #[test]
    fn test_trigger_mismatches() {
        let issues = check_document(COMPLETE, &catalog(&["alpha", "gamma"]));
        assert_eq!(
            issues,
            vec![
                ContractIssue::MissingTrigger("gamma".to_string()),
                ContractIssue::UnknownTrigger("beta".to_string()),
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ContractIssue::MissingTrigger("p1".to_string()).to_string(),
            "project p1 has no trigger"
        );
    }
}
