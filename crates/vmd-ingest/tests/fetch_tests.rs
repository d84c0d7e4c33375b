//! Integration tests for the collections API client
//!
//! These run against a wiremock server and validate pagination
//! parameters, nested person fan-out, and per-record rejection of
//! structurally broken documents.

use std::path::Path;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vmd_ingest::collections::pipeline::{category_map, tag_page};
use vmd_ingest::collections::CollectionsClient;
use vmd_ingest::config::ApiConfig;

fn client_for(server: &MockServer, dump_dir: &Path) -> CollectionsClient {
    CollectionsClient::new(&ApiConfig {
        base_url: server.uri(),
        timeout_secs: 5,
        fetch_concurrency: 4,
        dump_dir: dump_dir.to_path_buf(),
    })
    .expect("client should build")
}

fn person_doc(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "attributes": {
            "name": [{"primary": true, "value": name}]
        },
        "links": {"self": format!("https://api.example/people/{id}")}
    })
}

async fn mount_person(server: &MockServer, id: &str, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/people/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": person_doc(id, name)})))
        .mount(server)
        .await;
}

fn object_doc(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "attributes": {
            "title": [{"primary": true, "value": format!("Object {id}")}],
            "identifier": [{"primary": true, "value": format!("ACC-{id}")}]
        },
        "links": {"self": format!("https://api.example/objects/{id}")}
    })
}

fn dump_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test]
async fn fetch_person_parses_document() {
    let server = MockServer::start().await;
    let dump_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/people/cp1"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "cp1",
                "attributes": {
                    "name": [{"primary": true, "value": "Charles Babbage"}],
                    "lifecycle": {
                        "birth": [{"date": [{"primary": true, "value": "1791-12-26"}]}],
                        "death": [{"date": [{"primary": true, "value": "1871-10-18"}]}]
                    },
                    "nationality": ["english"]
                },
                "links": {"self": "https://api.example/people/cp1"}
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, dump_dir.path());
    let person = client.fetch_person("cp1").await.unwrap();

    assert_eq!(person.id, "cp1");
    assert_eq!(person.name.as_deref(), Some("Charles Babbage"));
    assert_eq!(person.nationality.as_deref(), Some("English"));
    assert_eq!(
        person.birth_date.unwrap().to_string(),
        "1791-12-26".to_string()
    );
    assert_eq!(person.url.as_deref(), Some("https://api.example/people/cp1"));
}

#[tokio::test]
async fn fetch_person_dumps_structurally_broken_document() {
    let server = MockServer::start().await;
    let dump_dir = TempDir::new().unwrap();

    // No links block, so the transform cannot resolve the source URL.
    Mock::given(method("GET"))
        .and(path("/people/cp9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "cp9", "attributes": {}}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, dump_dir.path());
    let err = client.fetch_person("cp9").await.unwrap_err();

    assert!(err.is_structural());
    assert_eq!(dump_count(dump_dir.path()), 1);
}

#[tokio::test]
async fn fetch_objects_sends_pagination_parameters() {
    let server = MockServer::start().await;
    let dump_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search/objects"))
        .and(query_param("filter[categories]", "Art"))
        .and(query_param("page[number]", "3"))
        .and(query_param("page[size]", "100"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, dump_dir.path());
    let objects = client.fetch_objects("Art", 3, 100).await.unwrap();

    assert!(objects.is_empty());
}

#[tokio::test]
async fn fetched_objects_carry_the_positional_category_id() {
    let server = MockServer::start().await;
    let dump_dir = TempDir::new().unwrap();

    // Each category search returns its own object; the documents
    // themselves say nothing about categories.
    Mock::given(method("GET"))
        .and(path("/search/objects"))
        .and(query_param("filter[categories]", "Art"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [object_doc("co_art")]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/objects"))
        .and(query_param("filter[categories]", "Surgery"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [object_doc("co_surg")]})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, dump_dir.path());
    let categories = vec!["Art".to_string(), "Surgery".to_string()];

    let mut tagged = std::collections::HashMap::new();
    for (category_id, category) in category_map(&categories) {
        let mut objects = client.fetch_objects(&category, 0, 100).await.unwrap();
        tag_page(&mut objects, category_id);
        tagged.extend(objects);
    }

    assert_eq!(tagged["co_art"].category, Some(0));
    assert_eq!(tagged["co_surg"].category, Some(1));
}

#[tokio::test]
async fn fetch_objects_resolves_people_in_reference_order() {
    let server = MockServer::start().await;
    let dump_dir = TempDir::new().unwrap();

    let mut object = object_doc("co1");
    object["attributes"]["lifecycle"] = json!({
        "creation": [{
            "maker": [
                {"admin": {"uid": "cp1"}},
                {"admin": {"uid": "cp2"}},
                {"admin": {"uid": "cp3"}}
            ]
        }]
    });
    object["relationships"] = json!({"people": {"data": [{"id": "cp2"}]}});

    Mock::given(method("GET"))
        .and(path("/search/objects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [object, object_doc("co2")]})),
        )
        .mount(&server)
        .await;

    mount_person(&server, "cp1", "First Maker").await;
    mount_person(&server, "cp2", "Second Maker").await;
    mount_person(&server, "cp3", "Third Maker").await;

    let client = client_for(&server, dump_dir.path());
    let objects = client.fetch_objects("Art", 0, 100).await.unwrap();

    assert_eq!(objects.len(), 2);

    let resolved = &objects["co1"];
    let maker_ids: Vec<&str> = resolved
        .creation_makers
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(maker_ids, vec!["cp1", "cp2", "cp3"]);

    // Same person may also be related; the relation stays separate.
    let related_ids: Vec<&str> = resolved
        .people_relations
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(related_ids, vec!["cp2"]);

    assert!(objects["co2"].creation_makers.is_empty());
    assert_eq!(dump_count(dump_dir.path()), 0);
}

#[tokio::test]
async fn malformed_record_is_dumped_and_rest_of_page_survives() {
    let server = MockServer::start().await;
    let dump_dir = TempDir::new().unwrap();

    // co_bad is missing links.self and must be rejected.
    let mut broken = object_doc("co_bad");
    broken.as_object_mut().unwrap().remove("links");

    Mock::given(method("GET"))
        .and(path("/search/objects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [broken, object_doc("co_ok")]})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, dump_dir.path());
    let objects = client.fetch_objects("Art", 0, 100).await.unwrap();

    assert_eq!(objects.len(), 1);
    assert!(objects.contains_key("co_ok"));
    assert_eq!(dump_count(dump_dir.path()), 1);
}

#[tokio::test]
async fn broken_person_reference_rejects_only_that_object() {
    let server = MockServer::start().await;
    let dump_dir = TempDir::new().unwrap();

    let mut object = object_doc("co1");
    object["attributes"]["lifecycle"] = json!({
        "creation": [{"maker": [{"admin": {"uid": "cp_broken"}}]}]
    });

    Mock::given(method("GET"))
        .and(path("/search/objects"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [object, object_doc("co2")]})),
        )
        .mount(&server)
        .await;

    // The referenced person document lacks its links block.
    Mock::given(method("GET"))
        .and(path("/people/cp_broken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": "cp_broken", "attributes": {}}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, dump_dir.path());
    let objects = client.fetch_objects("Art", 0, 100).await.unwrap();

    assert_eq!(objects.len(), 1);
    assert!(objects.contains_key("co2"));
    // Both the person document and the enclosing object are dumped.
    assert_eq!(dump_count(dump_dir.path()), 2);
}

#[tokio::test]
async fn server_error_fails_the_page() {
    let server = MockServer::start().await;
    let dump_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/search/objects"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server, dump_dir.path());
    let err = client.fetch_objects("Art", 0, 100).await.unwrap_err();

    assert!(!err.is_structural());
    assert_eq!(dump_count(dump_dir.path()), 0);
}
