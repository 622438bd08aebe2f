use monst_dex::catalog::QueryState;
use monst_dex::config::RemoteConfig;
use monst_dex::domain::{ListParams, Partition};
use monst_dex::source::{MonsterSource, RemoteSource};
use monst_dex::CatalogError;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn monster(id: u64, attribute: &str) -> Value {
    json!({
        "id": id,
        "number": id,
        "name": format!("モンスター{id}"),
        "rarity": { "value": 6, "maxLevel": 120 },
        "attribute": { "name": attribute },
        "tribe": "ドラゴン",
        "friendshipCombo": { "main": { "name": "爆発" } }
    })
}

fn source(server: &MockServer, fetch_page_size: usize) -> RemoteSource {
    let config = RemoteConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
        fetch_page_size,
        owned_ids: vec![2],
    };
    RemoteSource::new(&config).expect("client builds")
}

async fn mount_page(server: &MockServer, page: u64, items: Vec<Value>, total: u64) {
    Mock::given(method("GET"))
        .and(path("/monster/select/all"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": items,
            "page": page,
            "size": 2,
            "total": total
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_documents_walks_every_page() {
    let server = MockServer::start().await;
    mount_page(&server, 0, vec![monster(1, "火"), monster(2, "水")], 5).await;
    mount_page(&server, 1, vec![monster(3, "木"), monster(4, "光")], 5).await;
    mount_page(&server, 2, vec![monster(5, "闇")], 5).await;

    let remote = source(&server, 2);
    let documents = remote.documents().await.unwrap();
    let ids: Vec<u64> = documents.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);

    let owned = remote.collection(Partition::Owned).await.unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, 2);
}

#[tokio::test]
async fn test_documents_stops_on_empty_page() {
    let server = MockServer::start().await;
    mount_page(&server, 0, vec![monster(1, "火")], 10).await;
    mount_page(&server, 1, vec![], 10).await;

    let documents = source(&server, 2).documents().await.unwrap();
    assert_eq!(documents.len(), 1);
}

#[tokio::test]
async fn test_list_sends_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/monster/select/all"))
        .and(query_param("attributeId", "1"))
        .and(query_param("size", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [monster(3, "火")],
            "page": 0,
            "size": 20,
            "total": 1
        })))
        .mount(&server)
        .await;

    let params = ListParams {
        attribute_id: Some(1),
        ..ListParams::page(0, 20)
    };
    let listing = source(&server, 20).list(&params).await.unwrap();
    assert_eq!(listing.total, 1);
    assert_eq!(listing.items[0].id, 3);
}

#[tokio::test]
async fn test_detail_not_found_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/monster/select/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "NOT_FOUND",
            "message": "Monster not found: 42",
            "details": []
        })))
        .mount(&server)
        .await;

    assert!(source(&server, 20).detail(42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_error_message_comes_from_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/monster/select/all"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "VALIDATION_ERROR",
            "message": "Validation failed",
            "details": [{ "field": "size", "message": "must be greater than 0" }]
        })))
        .mount(&server)
        .await;

    let err = source(&server, 20).documents().await.unwrap_err();
    match err {
        CatalogError::Api {
            status,
            message,
            payload,
        } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Validation failed");
            assert_eq!(payload.unwrap()["code"], "VALIDATION_ERROR");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_error_message_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/monster/select/all"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = source(&server, 20).documents().await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed: 503");
}

#[tokio::test]
async fn test_remote_collection_feeds_the_engine() {
    let server = MockServer::start().await;
    mount_page(&server, 0, vec![monster(1, "火"), monster(2, "水")], 2).await;

    let records = source(&server, 2).collection(Partition::All).await.unwrap();
    let page = monst_dex::query(&records, &QueryState::default().with_text("モンスター2"));
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, 2);
}
