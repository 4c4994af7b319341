use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use eo_data::load_order_in;
use eo_fetch::{display_executive_orders, save_executive_order, RegistryClient};

/// In-process stand-in for the Federal Register API.
#[derive(Default)]
struct MockRegistry {
    /// Page bodies, page 1 first. Pages past the end return no results.
    pages: Vec<Value>,
    /// Page number that answers with `failing_status` (500 when unset).
    failing_page: Option<u32>,
    failing_status: Option<StatusCode>,
    details: HashMap<String, Value>,
    queries: Mutex<Vec<HashMap<String, String>>>,
    detail_requests: Mutex<Vec<String>>,
}

async fn documents(
    State(mock): State<Arc<MockRegistry>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let page: u32 = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    mock.queries.lock().unwrap().push(params);

    if mock.failing_page == Some(page) {
        return Err(mock
            .failing_status
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));
    }
    let body = mock
        .pages
        .get(page as usize - 1)
        .cloned()
        .unwrap_or_else(|| json!({"results": [], "count": 0}));
    Ok(Json(body))
}

async fn document_detail(
    State(mock): State<Arc<MockRegistry>>,
    Path(file): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let id = file.strip_suffix(".json").unwrap_or(&file).to_string();
    mock.detail_requests.lock().unwrap().push(id.clone());
    mock.details
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn start_mock(mock: MockRegistry) -> (SocketAddr, Arc<MockRegistry>) {
    let mock = Arc::new(mock);
    let app = Router::new()
        .route("/documents.json", get(documents))
        .route("/documents/{file}", get(document_detail))
        .with_state(mock.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, mock)
}

fn client_for(addr: SocketAddr) -> RegistryClient {
    RegistryClient::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap()
}

fn order(n: u32) -> Value {
    json!({
        "document_number": format!("2025-{:05}", n),
        "executive_order_number": 14000 + n,
        "title": format!("Order {}", n),
        "publication_date": "2025-01-28"
    })
}

fn page_of(range: std::ops::Range<u32>, count: u32) -> Value {
    let results: Vec<Value> = range.map(order).collect();
    json!({"results": results, "count": count})
}

#[tokio::test]
async fn test_paginates_until_count_reached() {
    let (addr, mock) = start_mock(MockRegistry {
        pages: vec![page_of(0..20, 25), page_of(20..25, 25)],
        ..Default::default()
    })
    .await;

    let orders = client_for(addr).fetch_all_executive_orders("2025-01-20").await;

    assert_eq!(orders.len(), 25);
    let queries = mock.queries.lock().unwrap();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0]["page"], "1");
    assert_eq!(queries[1]["page"], "2");
    assert_eq!(queries[0]["per_page"], "20");
    assert_eq!(queries[0]["conditions[signing_date][gte]"], "2025-01-20");
    assert_eq!(
        queries[0]["conditions[presidential_document_type][]"],
        "executive_order"
    );
}

#[tokio::test]
async fn test_stops_on_empty_page() {
    let (addr, mock) = start_mock(MockRegistry {
        pages: vec![page_of(0..20, 100)],
        ..Default::default()
    })
    .await;

    let orders = client_for(addr).fetch_all_executive_orders("2025-01-20").await;

    assert_eq!(orders.len(), 20);
    assert_eq!(mock.queries.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_page_returns_partial_results() {
    let (addr, mock) = start_mock(MockRegistry {
        pages: vec![page_of(0..20, 60), page_of(20..40, 60), page_of(40..60, 60)],
        failing_page: Some(2),
        ..Default::default()
    })
    .await;

    let orders = client_for(addr).fetch_all_executive_orders("2025-01-20").await;

    assert_eq!(orders.len(), 20);
    assert_eq!(mock.queries.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_non_200_success_status_stops_pagination() {
    let (addr, mock) = start_mock(MockRegistry {
        pages: vec![page_of(0..20, 40), page_of(20..40, 40)],
        failing_page: Some(1),
        failing_status: Some(StatusCode::ACCEPTED),
        ..Default::default()
    })
    .await;

    let orders = client_for(addr).fetch_all_executive_orders("2025-01-20").await;

    assert!(orders.is_empty());
    assert_eq!(mock.queries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_count_stops_after_first_page() {
    let (addr, mock) = start_mock(MockRegistry {
        pages: vec![json!({"results": [order(1), order(2)]}), page_of(3..5, 4)],
        ..Default::default()
    })
    .await;

    let orders = client_for(addr).fetch_all_executive_orders("2025-01-20").await;

    assert_eq!(orders.len(), 2);
    assert_eq!(mock.queries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreachable_registry_returns_empty() {
    // Bind then drop a listener so the port is closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let orders = client_for(addr).fetch_all_executive_orders("2025-01-20").await;
    assert!(orders.is_empty());
}

#[tokio::test]
async fn test_details_missing_returns_empty_map() {
    let (addr, _) = start_mock(MockRegistry::default()).await;
    let details = client_for(addr).fetch_executive_order_details("nope").await;
    assert!(details.is_empty());
}

#[tokio::test]
async fn test_save_writes_three_groups() {
    let mut details = HashMap::new();
    details.insert(
        "14001".to_string(),
        json!({"signing_date": "2025-01-20", "explanation": "Why it matters"}),
    );
    let (addr, mock) = start_mock(MockRegistry {
        details,
        ..Default::default()
    })
    .await;
    let cache = tempfile::tempdir().unwrap();
    let record = order(1).as_object().cloned().unwrap();

    let path = save_executive_order(&client_for(addr), &record, cache.path())
        .await
        .unwrap()
        .expect("record has an identifier");

    assert_eq!(path, cache.path().join("14001.json"));
    assert_eq!(*mock.detail_requests.lock().unwrap(), vec!["14001"]);

    let saved = load_order_in(cache.path(), "14001").unwrap();
    assert_eq!(saved.data, record);
    assert_eq!(saved.content["signing_date"], "2025-01-20");
    assert!(!saved.metadata.saved_at.is_empty());
    assert_eq!(saved.metadata.saved_at, saved.metadata.last_updated);
}

#[tokio::test]
async fn test_save_without_identifier_is_noop() {
    let (addr, mock) = start_mock(MockRegistry::default()).await;
    let cache = tempfile::tempdir().unwrap();
    let record = json!({"title": "Anonymous"}).as_object().cloned().unwrap();

    let saved = save_executive_order(&client_for(addr), &record, cache.path())
        .await
        .unwrap();

    assert!(saved.is_none());
    assert!(mock.detail_requests.lock().unwrap().is_empty());
    assert_eq!(std::fs::read_dir(cache.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_display_saves_each_order_and_reports() {
    let (addr, _) = start_mock(MockRegistry::default()).await;
    let cache = tempfile::tempdir().unwrap();
    let records: Vec<_> = (1..=3)
        .map(|n| order(n).as_object().cloned().unwrap())
        .collect();

    let mut out = Vec::new();
    display_executive_orders(&client_for(addr), &records, cache.path(), &mut out)
        .await
        .unwrap();
    let report = String::from_utf8(out).unwrap();

    assert!(report.contains("EXECUTIVE ORDERS"));
    assert!(report.contains("14001: Order 1 (Published: 2025-01-28)"));
    assert!(report.contains("14003: Order 3 (Published: 2025-01-28)"));
    assert!(report.trim_end().ends_with("Total executive orders: 3"));
    for n in 1..=3 {
        assert!(cache.path().join(format!("{}.json", 14000 + n)).exists());
    }

    // Details were unavailable, so content is empty rather than an error.
    let saved = load_order_in(cache.path(), "14002").unwrap();
    assert!(saved.content.is_empty());
}

#[tokio::test]
async fn test_display_empty_prints_nothing() {
    let (addr, _) = start_mock(MockRegistry::default()).await;
    let cache = tempfile::tempdir().unwrap();

    let mut out = Vec::new();
    display_executive_orders(&client_for(addr), &[], cache.path(), &mut out)
        .await
        .unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_display_aborts_on_save_failure() {
    let (addr, _) = start_mock(MockRegistry::default()).await;
    let cache = tempfile::tempdir().unwrap();
    // A regular file where the cache directory should be makes every save fail.
    let blocked = cache.path().join("blocked");
    std::fs::write(&blocked, "not a directory").unwrap();
    let records = vec![order(1).as_object().cloned().unwrap()];

    let mut out = Vec::new();
    let result = display_executive_orders(&client_for(addr), &records, &blocked, &mut out).await;

    assert!(result.is_err());
    let report = String::from_utf8(out).unwrap();
    assert!(!report.contains("Total executive orders"));
}
