#![allow(clippy::unwrap_used)]
// Integration tests for `Transport` + `ResourceClient` using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request as MockRequest, ResponseTemplate};

use backoffice_api::{
    Anonymous, CouponApi, Coupons, CredentialProvider, CredentialStore, CrudApi, ExportFormat,
    Faqs, ListQuery, MediaUpload, MessageApi, MessageStatus, Messages, RecordId, ResourceClient,
    ReviewCreate, Reviews, SortOrder, Transport,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn transport(server: &MockServer, credentials: Arc<dyn CredentialProvider>) -> Transport {
    let base = Url::parse(&format!("{}/api", server.uri())).unwrap();
    Transport::with_client(reqwest::Client::new(), base, credentials)
}

async fn setup<R: backoffice_api::Resource>() -> (MockServer, ResourceClient<R>) {
    let server = MockServer::start().await;
    let client = ResourceClient::new(&transport(&server, Arc::new(Anonymous))).unwrap();
    (server, client)
}

fn coupon_json(id: &str, active: bool) -> serde_json::Value {
    json!({
        "_id": id,
        "code": format!("CODE-{id}"),
        "discountType": "percentage",
        "discountValue": 10,
        "active": active
    })
}

/// Matches requests that carry no `Authorization` header.
struct NoAuthorization;

impl Match for NoAuthorization {
    fn matches(&self, request: &MockRequest) -> bool {
        !request.headers.contains_key("authorization")
    }
}

// ── Credentials ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_injected_and_rotated() {
    let server = MockServer::start().await;
    let store = Arc::new(CredentialStore::new());
    store.set_token("first".to_owned());
    let client: ResourceClient<Faqs> =
        ResourceClient::new(&transport(&server, store.clone())).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/faqs"))
        .and(header("authorization", "Bearer first"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/faqs"))
        .and(header("authorization", "Bearer second"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client.list(&ListQuery::new()).await.unwrap();
    store.set_token("second".to_owned());
    client.list(&ListQuery::new()).await.unwrap();
}

#[tokio::test]
async fn test_missing_token_sends_anonymous_request() {
    let server = MockServer::start().await;
    let store = Arc::new(CredentialStore::new());
    let client: ResourceClient<Faqs> = ResourceClient::new(&transport(&server, store)).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/faqs"))
        .and(NoAuthorization)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.list(&ListQuery::new()).await.unwrap();
    assert!(page.records.is_empty());
    assert_eq!(page.total_pages, 1);
}

// ── CRUD ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_passes_query_through() {
    let (server, client) = setup::<Coupons>().await;

    let data: Vec<_> = (0..10).map(|i| coupon_json(&format!("c{i}"), true)).collect();
    Mock::given(method("GET"))
        .and(path("/api/coupons"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(query_param("sort", "createdAt"))
        .and(query_param("order", "desc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": data, "count": 35 })),
        )
        .mount(&server)
        .await;

    let query = ListQuery::new()
        .page(2)
        .limit(10)
        .sort("createdAt")
        .order(SortOrder::Desc);
    let page = client.list(&query).await.unwrap();

    assert_eq!(page.records.len(), 10);
    assert_eq!(page.total_count, 35);
    assert_eq!(page.total_pages, 4);
    assert_eq!(page.records[0].id, RecordId::from("c0"));
}

#[tokio::test]
async fn test_get_not_found_surfaces_server_message() {
    let (server, client) = setup::<Faqs>().await;

    Mock::given(method("GET"))
        .and(path("/api/faqs/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "FAQ not found" })))
        .mount(&server)
        .await;

    let err = client.get(&RecordId::from("missing")).await.unwrap_err();
    assert_eq!(err.to_string(), "FAQ not found");
}

#[tokio::test]
async fn test_error_without_message_uses_fallback() {
    let (server, client) = setup::<Coupons>().await;

    Mock::given(method("GET"))
        .and(path("/api/coupons"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = client.list(&ListQuery::new()).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch coupons.");
}

#[tokio::test]
async fn test_malformed_success_body_uses_fallback() {
    let (server, client) = setup::<Coupons>().await;

    Mock::given(method("GET"))
        .and(path("/api/coupons/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "nope": 1 } })))
        .mount(&server)
        .await;

    let err = client.get(&RecordId::from("c1")).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to fetch coupon.");
}

#[tokio::test]
async fn test_network_failure_uses_fallback() {
    let server = MockServer::start().await;
    let transport = transport(&server, Arc::new(Anonymous));
    drop(server);

    let client: ResourceClient<Faqs> = ResourceClient::new(&transport).unwrap();
    let err = client.delete(&RecordId::from("f1")).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to delete FAQ.");
}

#[tokio::test]
async fn test_create_update_delete_round() {
    let (server, client) = setup::<Coupons>().await;

    Mock::given(method("POST"))
        .and(path("/api/coupons"))
        .and(body_json(json!({
            "code": "NEW",
            "discountType": "fixed",
            "discountValue": 5.0,
            "active": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": coupon_json("c9", true),
            "message": "Coupon created"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/coupons/c9"))
        .and(body_json(json!({ "discountValue": 7.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": coupon_json("c9", true),
            "message": "Coupon updated"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/coupons/c9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Coupon deleted" })))
        .mount(&server)
        .await;

    let created = client
        .create(backoffice_api::CouponCreate {
            code: "NEW".into(),
            description: None,
            discount_type: backoffice_api::DiscountType::Fixed,
            discount_value: 5.0,
            min_order_amount: None,
            max_uses: None,
            expiry_date: None,
            active: true,
        })
        .await
        .unwrap();
    assert_eq!(created.record.id, RecordId::from("c9"));
    assert_eq!(created.message.as_deref(), Some("Coupon created"));

    let patch = backoffice_api::CouponUpdate {
        discount_value: Some(7.5),
        ..Default::default()
    };
    let updated = client.update(&RecordId::from("c9"), &patch).await.unwrap();
    assert_eq!(updated.message.as_deref(), Some("Coupon updated"));

    let deleted = client.delete(&RecordId::from("c9")).await.unwrap();
    assert_eq!(deleted.message.as_deref(), Some("Coupon deleted"));
}

#[tokio::test]
async fn test_delete_with_empty_body() {
    let (server, client) = setup::<Faqs>().await;

    Mock::given(method("DELETE"))
        .and(path("/api/faqs/f1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let deleted = client.delete(&RecordId::from("f1")).await.unwrap();
    assert_eq!(deleted.message, None);
}

#[tokio::test]
async fn test_record_id_is_a_single_path_segment() {
    let (server, client) = setup::<Faqs>().await;

    Mock::given(method("DELETE"))
        .and(path("/api/faqs/a%2Fb"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete(&RecordId::from("a/b")).await.unwrap();
}

#[tokio::test]
async fn test_dot_record_id_never_reaches_the_collection() {
    let (server, client) = setup::<Faqs>().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.delete(&RecordId::from("..")).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to delete FAQ.");
}

// ── Resource-specific verbs ─────────────────────────────────────────

#[tokio::test]
async fn test_coupon_deactivate_failure_message() {
    let (server, client) = setup::<Coupons>().await;

    Mock::given(method("POST"))
        .and(path("/api/coupons/c1/deactivate"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Coupon already inactive" })),
        )
        .mount(&server)
        .await;

    let err = client.deactivate(&RecordId::from("c1")).await.unwrap_err();
    assert_eq!(err.to_string(), "Coupon already inactive");
}

#[tokio::test]
async fn test_apply_coupon() {
    let (server, client) = setup::<Coupons>().await;

    Mock::given(method("POST"))
        .and(path("/api/coupons/apply"))
        .and(body_json(json!({ "code": "SPRING10", "orderTotal": 80.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "discount": 8.0, "finalTotal": 72.0 },
            "message": "Coupon applied"
        })))
        .mount(&server)
        .await;

    let applied = client.apply_coupon("SPRING10", 80.0).await.unwrap();
    assert!((applied.discount.discount - 8.0).abs() < f64::EPSILON);
    assert_eq!(applied.discount.final_total, Some(72.0));
    assert_eq!(applied.message.as_deref(), Some("Coupon applied"));
}

#[tokio::test]
async fn test_message_status_patch() {
    let (server, client) = setup::<Messages>().await;

    Mock::given(method("PATCH"))
        .and(path("/api/contact/m1/status"))
        .and(body_json(json!({ "status": "in-progress" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "_id": "m1",
                "name": "Ada",
                "email": "ada@example.com",
                "message": "Hello",
                "status": "in-progress"
            },
            "message": "Status updated"
        })))
        .mount(&server)
        .await;

    let saved = client
        .set_status(&RecordId::from("m1"), MessageStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(saved.record.status, MessageStatus::InProgress);
}

#[tokio::test]
async fn test_export_csv_returns_bytes() {
    let (server, client) = setup::<Messages>().await;

    Mock::given(method("GET"))
        .and(path("/api/contact/export"))
        .and(query_param("format", "csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_bytes(b"id,name\nm1,Ada\n".to_vec()),
        )
        .mount(&server)
        .await;

    let export = client.export(ExportFormat::Csv).await.unwrap();
    assert_eq!(export.content_type, "text/csv");
    assert_eq!(&export.bytes[..], b"id,name\nm1,Ada\n");
    assert_eq!(export.file_name(), "messages.csv");
}

#[tokio::test]
async fn test_export_json_envelope_is_an_error() {
    let (server, client) = setup::<Messages>().await;

    Mock::given(method("GET"))
        .and(path("/api/contact/export"))
        .and(query_param("format", "excel"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "message": "No messages to export" })),
        )
        .mount(&server)
        .await;

    let err = client.export(ExportFormat::Excel).await.unwrap_err();
    assert_eq!(err.to_string(), "No messages to export");
}

#[tokio::test]
async fn test_review_create_is_multipart() {
    let (server, client) = setup::<Reviews>().await;

    Mock::given(method("POST"))
        .and(path("/api/reviews"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "_id": "r1", "name": "Grace", "rating": 5, "media": ["/uploads/r1.jpg"] },
            "message": "Review submitted"
        })))
        .mount(&server)
        .await;

    let saved = client
        .create(ReviewCreate {
            product_id: Some(RecordId::from("p1")),
            name: "Grace".into(),
            email: None,
            rating: 5,
            comment: "Great".into(),
            media: vec![MediaUpload {
                file_name: "r1.jpg".into(),
                content_type: "image/jpeg".into(),
                bytes: bytes::Bytes::from_static(b"\xff\xd8\xff"),
            }],
        })
        .await
        .unwrap();
    assert_eq!(saved.record.media, vec!["/uploads/r1.jpg".to_owned()]);

    let received = server.received_requests().await.unwrap();
    let content_type = received[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_owned();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");
    let body = String::from_utf8_lossy(&received[0].body);
    assert!(body.contains("name=\"rating\""));
    assert!(body.contains("filename=\"r1.jpg\""));
}
