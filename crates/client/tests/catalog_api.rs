//! Integration tests for categories, product search and site settings.

mod common;

use std::io::Write as _;

use assert_matches::assert_matches;
use atelier_client::forms::{CategoryForm, SettingsForm};
use atelier_client::ClientError;
use atelier_core::error::CoreError;
use atelier_core::listing::SearchQuery;
use atelier_core::routes::Route;
use common::MockBackend;
use serde_json::json;

fn categories_body() -> serde_json::Value {
    json!({"data": [
        {"id": 1, "name": "Dresses", "image": "http://cdn/d.jpg"},
        {"id": 2, "name": "Abayas"}
    ]})
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lists_categories_from_envelope() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/categories", 200, categories_body());
    let (api, _session) = backend.client(None);

    let list = api.categories().await.unwrap();

    assert_eq!(list.len(), 2);
    assert_eq!(list[0].name, "Dresses");
    assert_eq!(list[1].id, 2);
    assert_eq!(backend.last_request().authorization, None);
}

#[tokio::test]
async fn editing_unknown_category_routes_to_list() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/categories", 200, categories_body());
    let (api, _session) = backend.client(Some("tok"));

    let err = CategoryForm::edit(api, 99).await.unwrap_err();

    assert_matches!(err, ClientError::Core(CoreError::NotFound { entity: "category", .. }));
    assert_eq!(err.redirect(), Some(Route::CategoryList));
}

#[tokio::test]
async fn category_update_sends_name_and_new_image() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/categories", 200, categories_body());
    backend.on("POST", "/dashboard/category/1/update", 200, json!({}));
    let (api, _session) = backend.client(Some("tok"));

    let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

    let mut form = CategoryForm::edit(api, 1).await.unwrap();
    assert_eq!(form.image_url(), Some("http://cdn/d.jpg"));
    form.draft.name = "Evening Dresses".to_string();
    form.choose_image(file.path()).await.unwrap();
    assert!(form.image_url().unwrap().starts_with("data:image/png;base64,"));

    let route = form.submit().await.unwrap();
    assert_eq!(route, Route::CategoryList);

    let req = backend.last_request();
    assert_eq!(req.path, "/dashboard/category/1/update");
    assert_eq!(req.texts("name"), vec!["Evening Dresses"]);
    assert_eq!(req.files("image").len(), 1);
}

#[tokio::test]
async fn category_update_without_new_image_omits_it() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/categories", 200, categories_body());
    backend.on("POST", "/dashboard/category/2/update", 200, json!({}));
    let (api, _session) = backend.client(Some("tok"));

    let mut form = CategoryForm::edit(api, 2).await.unwrap();
    form.submit().await.unwrap();

    let req = backend.last_request();
    assert_eq!(req.texts("name"), vec!["Abayas"]);
    assert!(!req.has_field("image"));
}

#[tokio::test]
async fn blank_category_name_is_rejected_locally() {
    let backend = MockBackend::start().await;
    let (api, _session) = backend.client(Some("tok"));

    let mut form = CategoryForm::create(api);
    form.draft.name = "   ".to_string();
    let err = form.submit().await.unwrap_err();

    assert_matches!(err, ClientError::Core(CoreError::Validation(_)));
    assert_eq!(form.error(), Some("category name is required"));
    assert!(backend.requests().is_empty());
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_sends_filters_and_page() {
    let backend = MockBackend::start().await;
    backend.on(
        "POST",
        "/search",
        200,
        json!({"products": {
            "data": [
                {"id": 7, "name": "Dress A", "price": "100", "is_active": 1, "images": ["http://cdn/a.jpg"]},
                {"name": "no id"}
            ],
            "meta": {"last_page": 3}
        }}),
    );
    let (api, _session) = backend.client(Some("tok"));

    let mut query = SearchQuery::default();
    query.set_filters(Some("dress".to_string()), Some(1));
    query.go_to(2, 3).unwrap();

    let page = api.search_products(&query).await.unwrap();

    assert_eq!(page.last_page, 3);
    assert_eq!(page.products.len(), 1);
    assert_eq!(page.products[0].id, 7);
    assert_eq!(page.products[0].cover.as_deref(), Some("http://cdn/a.jpg"));

    let req = backend.last_request();
    assert_eq!(req.query.as_deref(), Some("page=2"));
    assert_eq!(req.texts("search"), vec!["dress"]);
    assert_eq!(req.texts("category"), vec!["1"]);
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn settings_round_trip_through_form() {
    let backend = MockBackend::start().await;
    backend.on(
        "GET",
        "/settings",
        200,
        json!({"data": {"facebook": "fb.com/atelier", "contact_us_email": "hi@atelier.test", "wholesale_at": "12"}}),
    );
    backend.on("POST", "/dashboard/settings/update", 200, json!({}));
    let (api, _session) = backend.client(Some("tok"));

    let mut form = SettingsForm::load(api).await.unwrap();
    assert_eq!(form.settings.wholesale_at, 12);
    assert_eq!(form.settings.instagram, "");

    form.settings.instagram = "@atelier".to_string();
    form.save().await.unwrap();

    let body = backend.last_request().json.unwrap();
    assert_eq!(body["instagram"], "@atelier");
    assert_eq!(body["facebook"], "fb.com/atelier");
    assert_eq!(body["wholesale_at"], 12);
}

#[tokio::test]
async fn invalid_contact_email_is_rejected_before_sending() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/settings", 200, json!({}));
    let (api, _session) = backend.client(Some("tok"));

    let mut form = SettingsForm::load(api).await.unwrap();
    form.settings.contact_us_email = "not-an-email".to_string();
    let err = form.save().await.unwrap_err();

    assert_matches!(err, ClientError::Core(CoreError::Validation(_)));
    assert!(form.error().is_some());
    assert_eq!(backend.requests().len(), 1, "only the initial load was sent");
}
