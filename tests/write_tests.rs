//! Integration tests for fan-out updates and creates.
//!
//! These tests verify the request bodies, the rate-limit rounds, and that
//! per-item failures come back inline rather than as errors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use placements_io::jsonapi::{NewResource, PayloadSource};
use placements_io::{ApiToken, BaseUrl, JsonApiError, PlacementsConfig, PlacementsIo};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Creates a client pointed at the mock server with a short rate-limit wait.
fn create_client(server: &MockServer) -> PlacementsIo {
    let config = PlacementsConfig::builder()
        .base_url(BaseUrl::new(format!("{}/v1", server.uri())).unwrap())
        .token(ApiToken::new("test-token").unwrap())
        .rate_limit_wait(Duration::from_millis(50))
        .build()
        .unwrap();
    PlacementsIo::new(&config).unwrap()
}

fn body_of(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap()
}

/// Matches requests whose `data.attributes.name` equals the given value.
struct AttributeName(&'static str);

impl Match for AttributeName {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|body| body.pointer("/data/attributes/name").cloned())
            == Some(json!(self.0))
    }
}

// === Update ===

#[tokio::test]
async fn test_update_with_resolver_sends_per_id_attributes() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/line_items/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"type": "line-items", "id": "2"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolver = PayloadSource::resolver(|id| async move {
        let id: i64 = id.parse().unwrap();
        json!({"foo": "bar", "baz": {"nested": id * 5}})
    });

    let results = create_client(&server)
        .line_items()
        .update([2], Some(resolver), None)
        .await
        .unwrap();
    assert_eq!(results, vec![json!({"type": "line-items", "id": "2"})]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = body_of(&requests[0]);
    assert_eq!(
        body["data"]["attributes"],
        json!({"foo": "bar", "baz": {"nested": 10}})
    );
    assert_eq!(body["data"]["id"], json!("2"));
    assert_eq!(body["data"]["type"], json!("line_items"));
    assert!(body["data"].get("relationships").is_none());
}

#[tokio::test]
async fn test_update_with_fixed_relationships() {
    let server = MockServer::start().await;
    let relationships = json!({"product": {"data": {"type": "products", "id": 1}}});

    for id in ["5", "6"] {
        Mock::given(method("PATCH"))
            .and(path(format!("/v1/product_rates/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"type": "product-rates", "id": id}
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let results = create_client(&server)
        .product_rates()
        .update(["5", "6"], None, Some(relationships.clone().into()))
        .await
        .unwrap();
    assert_eq!(results.len(), 2);

    for request in server.received_requests().await.unwrap() {
        assert_eq!(body_of(&request)["data"]["relationships"], relationships);
    }
}

#[tokio::test]
async fn test_update_without_payload_fails_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pio = create_client(&server);

    let result = pio.line_items().update([1, 2], None, None).await;
    assert!(matches!(result, Err(JsonApiError::MissingUpdatePayload)));

    let result = pio
        .line_items()
        .update([1], Some(json!({}).into()), None)
        .await;
    assert!(matches!(result, Err(JsonApiError::MissingUpdatePayload)));
}

#[tokio::test]
async fn test_update_rate_limited_once_completes_in_two_rounds() {
    let server = MockServer::start().await;

    for id in ["1", "2"] {
        Mock::given(method("PATCH"))
            .and(path(format!("/v1/campaigns/{id}")))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PATCH"))
            .and(path(format!("/v1/campaigns/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"type": "campaigns", "id": id}
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let resolver = PayloadSource::resolver(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { json!({"archived": true}) }
    });

    let started = Instant::now();
    let results = create_client(&server)
        .campaigns()
        .update(["1", "2"], Some(resolver), None)
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(50));
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        results,
        vec![
            json!({"type": "campaigns", "id": "1"}),
            json!({"type": "campaigns", "id": "2"}),
        ]
    );
}

#[tokio::test]
async fn test_update_returns_item_errors_inline() {
    let server = MockServer::start().await;
    let error_body = json!({"errors": [{"status": "400", "title": "Invalid attribute"}]});

    Mock::given(method("PATCH"))
        .and(path("/v1/accounts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"type": "accounts", "id": "1"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/v1/accounts/2"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body.clone()))
        .mount(&server)
        .await;

    let results = create_client(&server)
        .accounts()
        .update([1, 2], Some(json!({"bogus": 1}).into()), None)
        .await
        .unwrap();

    assert_eq!(results[0], json!({"type": "accounts", "id": "1"}));
    assert_eq!(results[1], error_body);
}

#[tokio::test]
async fn test_update_keeps_plain_text_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/v1/accounts/3"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let results = create_client(&server)
        .accounts()
        .update([3], Some(json!({"name": "Renamed"}).into()), None)
        .await
        .unwrap();

    assert_eq!(results, vec![json!({"raw_body": "Forbidden"})]);
}

#[tokio::test]
async fn test_update_sends_each_distinct_id_once() {
    let server = MockServer::start().await;

    for id in ["1", "2"] {
        Mock::given(method("PATCH"))
            .and(path(format!("/v1/campaigns/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"type": "campaigns", "id": id}
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let results = create_client(&server)
        .campaigns()
        .update([2, 1, 2], Some(json!({"archived": true}).into()), None)
        .await
        .unwrap();

    assert_eq!(
        results,
        vec![
            json!({"type": "campaigns", "id": "2"}),
            json!({"type": "campaigns", "id": "1"}),
        ]
    );
}

// === Create ===

#[tokio::test]
async fn test_create_returns_results_in_input_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/creatives"))
        .and(AttributeName("Banner"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"type": "creatives", "id": "77", "attributes": {"name": "Banner"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/creatives"))
        .and(AttributeName(""))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": [{"status": "422", "title": "Name can't be blank"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let account = json!({"account": {"data": {"type": "accounts", "id": 7}}});
    let objects = vec![
        NewResource::new()
            .attributes(json!({"name": ""}))
            .relationships(account.clone()),
        NewResource::new()
            .attributes(json!({"name": "Banner"}))
            .relationships(account.clone()),
    ];

    let results = create_client(&server)
        .creatives()
        .create(objects)
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert!(results[0].get("errors").is_some());
    assert_eq!(results[1]["id"], json!("77"));

    for request in server.received_requests().await.unwrap() {
        let body = body_of(&request);
        assert_eq!(body["data"]["type"], json!("creatives"));
        assert!(body["data"].get("id").is_none());
        assert_eq!(body["data"]["relationships"], account);
    }
}

#[tokio::test]
async fn test_create_retries_only_rate_limited_objects() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/contacts"))
        .and(AttributeName("second"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    for name in ["first", "second"] {
        Mock::given(method("POST"))
            .and(path("/v1/contacts"))
            .and(AttributeName(name))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": {"type": "contacts", "attributes": {"name": name}}
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let objects = ["first", "second"]
        .into_iter()
        .map(|name| NewResource::new().attributes(json!({"name": name})))
        .collect();

    let started = Instant::now();
    let results = create_client(&server)
        .contacts()
        .create(objects)
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(50));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
    assert_eq!(results[0]["attributes"]["name"], json!("first"));
    assert_eq!(results[1]["attributes"]["name"], json!("second"));
}
