//! Loading document sets from disk and over HTTP.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use oasgen_core::{DocumentLoader, LoaderConfig, OasError, Resolver};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write(dir: &Path, name: &str, content: &str) {
    let file = dir.join(name);
    if let Some(parent) = file.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(file, content).expect("Failed to write fixture");
}

fn file_uri(dir: &Path, name: &str) -> String {
    Url::from_file_path(dir.join(name)).unwrap().to_string()
}

fn fast_loader() -> DocumentLoader {
    DocumentLoader::new(LoaderConfig {
        initial_retry_delay_ms: 1,
        ..LoaderConfig::default()
    })
    .expect("Failed to build loader")
}

const ENTRY: &str = r##"
openapi: 3.1.0
info: { title: Pets, version: "1" }
paths: {}
components:
  schemas:
    Pet:
      $ref: "pets.yaml#/Pet"
    Error:
      $ref: "common/errors.json#/Error"
    Again:
      $ref: "pets.yaml#/Pet"
"##;

const PETS: &str = r##"
Pet:
  type: object
  properties:
    name: { type: string }
    failure:
      $ref: "./common/errors.json#/Error"
"##;

const ERRORS: &str = r#"{ "Error": { "type": "object", "properties": { "code": { "type": "integer" } } } }"#;

#[tokio::test]
async fn test_loads_referenced_files_once() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "api.yaml", ENTRY);
    write(dir.path(), "pets.yaml", PETS);
    write(dir.path(), "common/errors.json", ERRORS);

    let entry = dir.path().join("api.yaml");
    let spec = fast_loader().load(entry.to_str().unwrap()).await.unwrap();

    assert_eq!(spec.entry_uri, file_uri(dir.path(), "api.yaml"));
    assert_eq!(spec.cache.documents().len(), 3);
    assert!(spec.cache.contains(&file_uri(dir.path(), "pets.yaml")));
    assert!(spec.cache.contains(&file_uri(dir.path(), "common/errors.json")));

    let resolver = Resolver::for_spec(&spec);
    let pet = resolver.resolve_pointer("/components/schemas/Pet").unwrap();
    assert_eq!(pet.value()["properties"]["name"]["type"], "string");

    let failure = pet.get("properties").unwrap().get("failure").unwrap();
    let error = resolver.resolve(&failure).unwrap();
    assert_eq!(error.value()["properties"]["code"]["type"], "integer");
}

#[tokio::test]
async fn test_self_alias_prevents_refetch() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "api.yaml",
        r##"
openapi: 3.2.0
components:
  schemas:
    Local: { $ref: "pets.yaml#/Pet" }
    Remote: { $ref: "https://schemas.example.com/pets.yaml#/Pet" }
"##,
    );
    write(
        dir.path(),
        "pets.yaml",
        r#"
$self: https://schemas.example.com/pets.yaml
Pet: { type: string }
"#,
    );

    let spec = fast_loader()
        .load(dir.path().join("api.yaml").to_str().unwrap())
        .await
        .unwrap();

    assert_eq!(spec.cache.documents().len(), 2);
    let aliased = spec.cache.get("https://schemas.example.com/pets.yaml").unwrap();
    let local = spec.cache.get(&file_uri(dir.path(), "pets.yaml")).unwrap();
    assert!(aliased.same_node(local));

    let resolver = Resolver::for_spec(&spec);
    let remote = resolver.resolve_pointer("/components/schemas/Remote").unwrap();
    assert_eq!(remote.value()["type"], "string");
}

#[tokio::test]
async fn test_missing_referenced_file_is_skipped() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "api.json",
        r##"{
            "openapi": "3.0.3",
            "components": { "schemas": { "Gone": { "$ref": "missing.yaml#/Gone" } } }
        }"##,
    );

    let spec = fast_loader()
        .load(dir.path().join("api.json").to_str().unwrap())
        .await
        .unwrap();
    assert_eq!(spec.cache.documents().len(), 1);

    let resolver = Resolver::for_spec(&spec);
    assert!(resolver.resolve_pointer("/components/schemas/Gone").is_none());
}

#[tokio::test]
async fn test_duplicate_operation_id_across_files() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "api.yaml",
        r##"
openapi: 3.1.0
paths:
  /pets:
    get: { operationId: listPets }
x-admin: { $ref: "admin.yaml" }
"##,
    );
    write(
        dir.path(),
        "admin.yaml",
        r#"
openapi: 3.1.0
paths:
  /admin/pets:
    get: { operationId: listPets }
"#,
    );

    let err = fast_loader()
        .load(dir.path().join("api.yaml").to_str().unwrap())
        .await
        .unwrap_err();
    match err {
        OasError::DuplicateOperationId {
            operation_id,
            locations,
        } => {
            assert_eq!(operation_id, "listPets");
            assert_eq!(locations.len(), 2);
        }
        other => unreachable!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_unparseable_reference_is_fatal() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "api.yaml",
        "openapi: 3.1.0\nx-broken: { $ref: \"broken.json\" }\n",
    );
    write(dir.path(), "broken.json", "{ not json");

    let err = fast_loader()
        .load(dir.path().join("api.yaml").to_str().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, OasError::Parse { .. }));
}

#[tokio::test]
async fn test_http_documents_fetched_once() {
    let server = MockServer::start().await;
    let entry = format!("{}/api.json", server.uri());

    Mock::given(method("GET"))
        .and(path("/api.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r##"{
                "openapi": "3.1.0",
                "components": { "schemas": {
                    "A": { "$ref": "schemas.json#/A" },
                    "B": { "$ref": "schemas.json#/B" },
                    "Gone": { "$ref": "gone.json#/Gone" }
                } }
            }"##,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/schemas.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{ "A": { "type": "string" }, "B": { "type": "integer" } }"#),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let spec = fast_loader().load(&entry).await.unwrap();
    assert_eq!(spec.cache.documents().len(), 2);

    let resolver = Resolver::for_spec(&spec);
    let b = resolver.resolve_pointer("/components/schemas/B").unwrap();
    assert_eq!(b.value()["type"], "integer");
    assert!(resolver.resolve_pointer("/components/schemas/Gone").is_none());
}

#[tokio::test]
async fn test_http_retries_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api.yaml"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api.yaml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("openapi: 3.1.0\npaths: {}\n"))
        .mount(&server)
        .await;

    let spec = fast_loader()
        .load(&format!("{}/api.yaml", server.uri()))
        .await
        .unwrap();
    assert_eq!(spec.entry.value()["openapi"], "3.1.0");
}

#[tokio::test]
async fn test_http_gives_up_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.yaml"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let loader = DocumentLoader::new(LoaderConfig {
        max_retries: 2,
        initial_retry_delay_ms: 1,
        ..LoaderConfig::default()
    })
    .unwrap();
    let err = loader
        .load(&format!("{}/api.yaml", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, OasError::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_http_client_error_on_reference_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{ "openapi": "3.1.0", "x-private": { "$ref": "private.json" } }"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private.json"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let err = fast_loader()
        .load(&format!("{}/api.json", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, OasError::HttpStatus { status: 403, .. }));
}
