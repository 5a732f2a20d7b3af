//! Integration tests for the REST client against a mock HTTP server.
//!
//! ```bash
//! cargo test -p tally-api --test client
//! ```

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::json;
use tally_api::error::NETWORK_ERROR_MESSAGE;
use tally_api::{
    ApiClient, ApiError, AuthToken, ClientConfig, DraftEditor, EditorState, InvoiceBackend,
    RecordingNotifier, Session,
};
use tally_core::listing::{DateRange, InvoiceFilter};
use tally_core::types::{InvoicePayload, ItemPayload, PayloadLine, SignupRequest};
use tally_core::Money;
use wiremock::matchers::{
    body_json, body_partial_json, body_string_contains, header, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

struct Harness {
    server: MockServer,
    client: ApiClient,
    notifier: Arc<RecordingNotifier>,
}

async fn harness(session: Session) -> Harness {
    let server = MockServer::start().await;
    let notifier = Arc::new(RecordingNotifier::new());
    let config = ClientConfig {
        base_url: format!("{}/api/", server.uri()),
        ..ClientConfig::default()
    };
    let client = ApiClient::new(&config, session, notifier.clone()).unwrap();
    Harness {
        server,
        client,
        notifier,
    }
}

async fn logged_in() -> Harness {
    harness(Session::with_token(AuthToken::new("test-token"))).await
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn payload(invoice_id: Option<i64>) -> InvoicePayload {
    InvoicePayload {
        invoice_id,
        invoice_no: Some("0008".into()),
        invoice_date: date(2024, 3, 15),
        customer_name: "Acme".into(),
        address: None,
        city: None,
        tax_percentage: dec!(10),
        notes: None,
        lines: vec![PayloadLine {
            row_no: 1,
            item_id: 1,
            description: "Widget".into(),
            quantity: dec!(3),
            rate: dec!(10),
            discount_pct: Some(dec!(10)),
        }],
    }
}

fn items_json() -> serde_json::Value {
    json!([
        { "itemID": 1, "itemName": "Widget", "salesRate": 10.0, "discountPct": null },
        { "itemID": 2, "itemName": "Gadget", "salesRate": 25.5, "description": "Blue" }
    ])
}

// =============================================================================
// Authorization
// =============================================================================

#[tokio::test]
async fn test_requests_carry_bearer_token() {
    let h = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/Item/GetList"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items_json()))
        .expect(1)
        .mount(&h.server)
        .await;

    let items = h.client.list_items().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].sales_rate, dec!(25.5));
    assert!(h.notifier.errors().is_empty());
}

#[tokio::test]
async fn test_no_token_no_header() {
    let h = harness(Session::new()).await;

    Mock::given(method("GET"))
        .and(path("/api/Item/GetList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&h.server)
        .await;

    h.client.list_items().await.unwrap();

    let requests = h.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_login_trims_email_and_stores_token() {
    let h = harness(Session::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "owner@example.com", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "fresh-token",
            "userID": 5,
            "companyID": 9,
            "email": "owner@example.com",
            "firstName": "Olga",
            "companyName": "Acme",
            "currencySymbol": "$"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let response = h.client.login("  owner@example.com ", "secret").await.unwrap();
    assert_eq!(response.user_id, 5);
    assert_eq!(
        h.client.session().bearer().await.as_deref(),
        Some("Bearer fresh-token")
    );

    h.client.logout().await;
    assert!(!h.client.session().is_authenticated().await);
}

#[tokio::test]
async fn test_failed_login_leaves_session_empty() {
    let h = harness(Session::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&h.server)
        .await;

    let err = h.client.login("owner@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(h.notifier.errors(), vec!["Invalid credentials"]);
    assert!(h.client.session().current().await.is_none());
}

// =============================================================================
// Failure Reporting
// =============================================================================

#[tokio::test]
async fn test_error_message_from_json_body() {
    let h = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/Invoice/7"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Invoice not found",
            "title": "Not Found"
        })))
        .mount(&h.server)
        .await;

    let err = h.client.get_invoice(7).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
    assert_eq!(err.to_string(), "Invoice not found");
    assert_eq!(h.notifier.errors(), vec!["Invoice not found"]);
}

#[tokio::test]
async fn test_error_message_from_title() {
    let h = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/Invoice"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "title": "One or more validation errors occurred.",
            "errors": { "CustomerName": ["Required"] }
        })))
        .mount(&h.server)
        .await;

    let err = h.client.save_invoice(&payload(None)).await.unwrap_err();
    assert_eq!(err.user_message(), "One or more validation errors occurred.");
}

#[tokio::test]
async fn test_error_message_falls_back_to_status_text() {
    let h = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/Item/GetList"))
        .respond_with(ResponseTemplate::new(500).set_body_string("{\"message\":\"hidden\"}"))
        .mount(&h.server)
        .await;

    // Not labelled JSON, so the body is not inspected.
    let err = h.client.list_items().await.unwrap_err();
    assert_eq!(err.user_message(), "Internal Server Error");
    assert_eq!(h.notifier.errors().len(), 1);
}

#[tokio::test]
async fn test_network_error_wording() {
    let notifier = Arc::new(RecordingNotifier::new());
    let config = ClientConfig {
        base_url: "http://127.0.0.1:1/api".into(),
        timeout_secs: 2,
        ..ClientConfig::default()
    };
    let client = ApiClient::new(&config, Session::new(), notifier.clone()).unwrap();

    let err = client.list_items().await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(notifier.errors(), vec![NETWORK_ERROR_MESSAGE]);
}

#[tokio::test]
async fn test_local_validation_sends_nothing() {
    let h = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/itemcategories"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = h.client.create_category("   ").await.unwrap_err();
    assert!(matches!(err, ApiError::Core(_)));
    assert!(h.notifier.errors().is_empty());
}

// =============================================================================
// Invoices
// =============================================================================

#[tokio::test]
async fn test_list_invoices_sends_date_filter() {
    let h = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/Invoice/GetList"))
        .and(query_param("fromDate", "2024-03-01"))
        .and(query_param("toDate", "2024-03-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "invoiceID": 1,
                "invoiceNo": 3,
                "invoiceDate": "2024-03-02T00:00:00",
                "customerName": "Acme",
                "totalItems": 1,
                "subTotal": 27.0,
                "taxPercentage": 10,
                "taxAmount": 2.7,
                "invoiceAmount": 29.7
            }
        ])))
        .expect(1)
        .mount(&h.server)
        .await;

    let filter = InvoiceFilter::from_range(DateRange::Month, date(2024, 3, 15));
    let rows = h.client.list_invoices(&filter).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].invoice_no.as_deref(), Some("3"));
    assert_eq!(rows[0].invoice_date, date(2024, 3, 2));
    assert_eq!(rows[0].invoice_amount, Money::from_cents(2970));
}

#[tokio::test]
async fn test_next_invoice_number_from_list() {
    let h = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/Invoice/GetList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "invoiceID": 1, "invoiceNo": 3, "invoiceDate": "2024-01-01" },
            { "invoiceID": 2, "invoiceNo": "7", "invoiceDate": "2024-01-02" },
            { "invoiceID": 3, "invoiceNo": "bad", "invoiceDate": "2024-01-03" },
            { "invoiceID": 4, "invoiceNo": null, "invoiceDate": "2024-01-04" }
        ])))
        .mount(&h.server)
        .await;

    assert_eq!(h.client.next_invoice_number().await.unwrap(), 8);
}

#[tokio::test]
async fn test_new_invoice_is_posted() {
    let h = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/Invoice"))
        .and(body_partial_json(json!({
            "invoiceNo": "0008",
            "invoiceDate": "2024-03-15",
            "customerName": "Acme",
            "address": null,
            "taxPercentage": 10.0,
            "lines": [{
                "rowNo": 1,
                "itemID": 1,
                "quantity": 3.0,
                "rate": 10.0,
                "discountPct": 10.0
            }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    let saved = h.client.save_invoice(&payload(None)).await.unwrap();
    assert_eq!(saved, None);

    let requests = h.server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("invoiceID").is_none());
}

#[tokio::test]
async fn test_existing_invoice_is_put() {
    let h = logged_in().await;

    Mock::given(method("PUT"))
        .and(path("/api/Invoice"))
        .and(body_partial_json(json!({ "invoiceID": 42 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "invoiceID": 42,
            "invoiceNo": "0008",
            "invoiceDate": "2024-03-15T00:00:00",
            "customerName": "Acme",
            "taxPercentage": 10,
            "invoiceAmount": 29.7
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let saved = h.client.save_invoice(&payload(Some(42))).await.unwrap().unwrap();
    assert_eq!(saved.invoice_id, 42);
    assert_eq!(saved.invoice_amount, Money::from_cents(2970));
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let h = logged_in().await;

    Mock::given(method("DELETE"))
        .and(path("/api/Invoice/42"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    h.client.delete_invoice(42).await.unwrap();
    assert!(h.notifier.errors().is_empty());
}

#[tokio::test]
async fn test_delete_accepts_plain_text_body() {
    let h = logged_in().await;

    Mock::given(method("DELETE"))
        .and(path("/api/Invoice/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Invoice deleted"))
        .expect(1)
        .mount(&h.server)
        .await;

    h.client.delete_invoice(42).await.unwrap();
    assert!(h.notifier.errors().is_empty());
}

#[tokio::test]
async fn test_save_accepts_plain_text_body() {
    let h = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/api/Invoice"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("Invoice saved", "text/plain; charset=utf-8"),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let saved = h.client.save_invoice(&payload(None)).await.unwrap();
    assert_eq!(saved, None);
    assert!(h.notifier.errors().is_empty());
}

// =============================================================================
// Items and Categories
// =============================================================================

#[tokio::test]
async fn test_item_update_is_put() {
    let h = logged_in().await;

    Mock::given(method("PUT"))
        .and(path("/api/Item"))
        .and(body_partial_json(json!({ "itemID": 2, "itemName": "Gadget", "salesRate": 30.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "itemID": 2, "itemName": "Gadget", "salesRate": 30.0
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let body = ItemPayload::new(Some(2), "Gadget", None, dec!(30), None).unwrap();
    let item = h.client.save_item(&body).await.unwrap();
    assert_eq!(item.sales_rate, dec!(30));
}

#[tokio::test]
async fn test_category_rename() {
    let h = logged_in().await;

    Mock::given(method("PUT"))
        .and(path("/api/itemcategories/3"))
        .and(body_json(json!({ "categoryName": "Hardware" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "categoryID": 3, "categoryName": "Hardware"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let category = h.client.update_category(3, " Hardware ").await.unwrap();
    assert_eq!(category.category_name, "Hardware");
}

// =============================================================================
// Editor over HTTP
// =============================================================================

#[tokio::test]
async fn test_editor_round_trip_over_http() {
    let h = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/api/Item/GetList"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items_json()))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/Invoice/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "invoiceID": 42,
            "invoiceNo": 12,
            "invoiceDate": "2024-03-01T00:00:00",
            "customerName": "Acme",
            "address": "",
            "taxPercentage": 5,
            "lines": [
                {
                    "rowNo": 2,
                    "itemID": 2,
                    "description": "Gadget",
                    "quantity": 1,
                    "rate": 25.5,
                    "discountPct": null
                },
                {
                    "rowNo": 1,
                    "itemID": 1,
                    "description": "Widget",
                    "quantity": 2,
                    "rate": 10,
                    "discountPct": 5
                }
            ]
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/Invoice"))
        .and(body_partial_json(json!({
            "invoiceID": 42,
            "invoiceNo": "12",
            "invoiceDate": "2024-03-01",
            "customerName": "Acme",
            "address": null,
            "taxPercentage": 5.0,
            "lines": [
                { "rowNo": 1, "itemID": 1, "description": "Widget", "discountPct": 5.0 },
                { "rowNo": 2, "itemID": 2, "description": "Gadget", "discountPct": null }
            ]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut editor = DraftEditor::new(h.client.clone());
    editor.open_existing(42).await.unwrap();
    assert_eq!(editor.state(), EditorState::Ready);
    assert_eq!(editor.draft().unwrap().number().display(), "INV-0012");

    editor.save().await.unwrap();
    assert_eq!(editor.state(), EditorState::Saved);
}

// =============================================================================
// Sign-up
// =============================================================================

fn signup_request() -> SignupRequest {
    SignupRequest {
        first_name: "Olga".into(),
        last_name: "Owner".into(),
        email: " owner@example.com ".into(),
        password: "secret".into(),
        company_name: "Acme".into(),
        address: "1 Main St".into(),
        city: "Springfield".into(),
        zip_code: "560001".into(),
        industry: Some("Retail".into()),
        currency_symbol: "$".into(),
    }
}

#[tokio::test]
async fn test_signup_posts_multipart_form() {
    let h = harness(Session::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .and(body_string_contains("name=\"ZipCode\""))
        .and(body_string_contains("name=\"CurrencySymbol\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "new-account-token",
            "userID": 11,
            "companyID": 4,
            "email": "owner@example.com",
            "companyName": "Acme",
            "currencySymbol": "$"
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let response = h.client.signup(&signup_request()).await.unwrap().unwrap();
    assert_eq!(response.company_id, 4);
    assert!(!h.client.session().is_authenticated().await);

    let requests = h.server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8_lossy(&requests[0].body);
    for name in [
        "FirstName",
        "LastName",
        "Email",
        "Password",
        "CompanyName",
        "Address",
        "City",
        "ZipCode",
        "Industry",
        "CurrencySymbol",
    ] {
        assert!(body.contains(&format!("name=\"{}\"", name)), "missing {}", name);
    }
    assert!(body.contains("\r\n\r\nowner@example.com\r\n"));
}

#[tokio::test]
async fn test_signup_accepts_empty_body() {
    let h = harness(Session::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Registered"))
        .mount(&h.server)
        .await;

    assert_eq!(h.client.signup(&signup_request()).await.unwrap(), None);
    assert!(h.notifier.errors().is_empty());
}

#[tokio::test]
async fn test_invalid_signup_sends_nothing() {
    let h = harness(Session::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let mut request = signup_request();
    request.zip_code = "12345".into();

    let err = h.client.signup(&request).await.unwrap_err();
    assert!(matches!(err, ApiError::Core(_)));
    assert!(h.notifier.errors().is_empty());
}

#[tokio::test]
async fn test_signup_conflict_is_reported_once() {
    let h = harness(Session::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/signup"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "User already exists" })),
        )
        .mount(&h.server)
        .await;

    let err = h.client.signup(&signup_request()).await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(h.notifier.errors(), vec!["User already exists"]);
}
