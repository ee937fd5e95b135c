//! The shipped site: contract, serving, and enhancement of the real page.

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use folio::config::Settings;
use folio::contract::check_document;
use folio::server::{create_router, AppState};
use folio_enhance::memory::MemoryDocument;
use folio_enhance::{Document, Element, Enhancer, ModalPhase, SiteContent};

fn site_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("site")
}

fn portfolio_html() -> String {
    std::fs::read_to_string(site_dir().join("portfolio.html")).unwrap()
}

#[test]
fn test_shipped_page_satisfies_contract() {
    let content = SiteContent::bundled().unwrap();
    let issues = check_document(&portfolio_html(), &content.projects);
    assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
}

#[tokio::test]
async fn test_shipped_site_served_for_any_path() {
    let app = create_router(AppState::new(&Settings::with_site_dir(site_dir())));
    let expected = portfolio_html();

    for uri in ["/", "/nonexistent-path", "/projects/project1"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(body.to_vec()).unwrap(), expected);
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/assets/css/style.css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/css");
}

#[test]
fn test_enhancer_on_shipped_page() {
    let doc = MemoryDocument::parse(&portfolio_html());
    let enhancer = Enhancer::init(&doc, SiteContent::bundled().unwrap());

    assert_eq!(doc.query_selector_all(".progress-bar").len(), 1);
    assert_eq!(doc.query_selector_all("#contactForm .form-checkbox").len(), 1);
    assert!(enhancer.pending_reveals() > 0);

    let card = doc.query_selector_all("[data-project=\"project3\"]").remove(0);
    doc.click(&card);
    assert_eq!(enhancer.modal_phase(), Some(ModalPhase::Opening));

    let content = doc.get_element_by_id("modalContent").unwrap();
    assert!(content
        .text_content()
        .contains("Forest Fire Detection & Risk Assessment Web Application"));
}
