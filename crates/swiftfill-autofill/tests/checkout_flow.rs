//! End-to-end adapter flow: keystrokes drive a session, the session's
//! effects hit a mock search endpoint, and the selection fills a form.

use std::time::Duration;

use swiftfill_autofill::{
    fill_selection, Effect, FormField, Key, MemoryForm, SearchEndpoint, SelectOption,
    SessionConfig, SessionRegistry, SessionState,
};
use swiftfill_core::SearchContext;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn checkout_form() -> MemoryForm {
    MemoryForm::new(vec![
        FormField::input("checkout[shipping_address][address1]"),
        FormField::input("checkout[shipping_address][city]"),
        FormField::input("checkout[shipping_address][province]"),
        FormField::input("checkout[shipping_address][zip]"),
        FormField::select(
            "checkout[shipping_address][country]",
            vec![
                SelectOption::new("Canada", "Canada"),
                SelectOption::new("United States", "United States"),
            ],
        ),
    ])
}

#[tokio::test]
async fn typing_searching_and_selecting_fills_the_form() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("q", "addison"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "results": [{
                "primary": {"text": "Addison Ave"},
                "secondary": {"text": "Niagara Falls"},
                "container": "V1;Addison Ave|Niagara Falls|ON|L2J;43.128025;-79.091698",
                "countryCode": "CA"
            }]
        })))
        .mount(&server)
        .await;

    let endpoint = SearchEndpoint::new(
        &format!("{}/api/address-autocomplete/search", server.uri()),
        "demo.myshopify.com",
        Some(SearchContext::Checkout),
        Duration::from_secs(5),
    )
    .expect("endpoint");

    let mut form = checkout_form();
    let origin = form
        .position("checkout[shipping_address][address1]")
        .expect("address1");
    let mut registry = SessionRegistry::new(SessionConfig::default());

    let session = registry.enhance(origin);
    session.on_focus();
    session.on_input("addison");
    let effects = session.on_debounce_elapsed();
    let Some(Effect::Search { seq, query }) = effects.last().cloned() else {
        panic!("expected a search effect, got {effects:?}");
    };

    let outcome = endpoint.search(&query).await;
    let session = registry.get_mut(&origin).expect("session");
    let rendered = session.on_response(seq, outcome);
    assert!(matches!(
        rendered.as_slice(),
        [Effect::RenderResults { items, active: Some(0) }] if items.len() == 1
    ));

    let effects = session.on_key(Key::Enter);
    assert_eq!(session.state(), SessionState::Idle);
    let Some(Effect::Apply(address)) = effects.last() else {
        panic!("expected an apply effect, got {effects:?}");
    };

    let report = fill_selection(&mut form, origin, address);
    assert!(report.skipped.is_empty());
    assert_eq!(
        form.value_of("checkout[shipping_address][address1]"),
        Some("Addison Ave")
    );
    assert_eq!(
        form.value_of("checkout[shipping_address][city]"),
        Some("Niagara Falls")
    );
    assert_eq!(form.value_of("checkout[shipping_address][province]"), Some("ON"));
    assert_eq!(form.value_of("checkout[shipping_address][zip]"), Some("L2J"));
    assert_eq!(
        form.value_of("checkout[shipping_address][country]"),
        Some("Canada")
    );

    registry.detach(&origin);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn endpoint_failure_renders_inline_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "success": false,
            "results": [],
            "error": "Failed to fetch addresses"
        })))
        .mount(&server)
        .await;

    let endpoint = SearchEndpoint::new(
        &format!("{}/search", server.uri()),
        "demo.myshopify.com",
        None,
        Duration::from_secs(5),
    )
    .expect("endpoint");

    let mut registry = SessionRegistry::new(SessionConfig::default());
    let session = registry.enhance("address1");
    session.on_input("main street");
    let Some(Effect::Search { seq, query }) = session.on_debounce_elapsed().pop() else {
        panic!("expected a search effect");
    };

    let outcome = endpoint.search(&query).await;
    let session = registry.get_mut(&"address1").expect("session");
    assert_eq!(
        session.on_response(seq, outcome),
        vec![Effect::RenderError("Failed to load address suggestions")]
    );
    assert_eq!(session.state(), SessionState::Error);
}
