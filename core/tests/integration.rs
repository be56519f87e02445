//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `ApiClient` over real
//! HTTP through `UreqTransport`. Covers every body kind (none, JSON,
//! multipart), the error envelope mapping, raw non-JSON bodies and
//! validation short-circuiting.

#![cfg(feature = "ureq-transport")]

use std::io::Write;
use std::net::SocketAddr;

use cloud_sdk_core::{
    ApiClient, ClientConfig, Decoded, Error, Parameters, TransportError, ValidationError,
};
use serde_json::{json, Value};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client(addr: SocketAddr) -> ApiClient {
    ApiClient::with_ureq(ClientConfig::new(&format!("http://{addr}")))
}

fn params(value: Value) -> Parameters {
    value.as_object().cloned().unwrap()
}

#[test]
fn server_lifecycle() {
    let client = client(start_server());
    let servers = client.servers();

    // Step 1: list, should be empty.
    let page = servers.list(&Parameters::new()).unwrap();
    assert_eq!(page["servers"], json!([]));

    // Step 2: create two servers.
    let web = servers
        .create(&params(json!({"name": "web.prod", "image": "debian-12"})))
        .unwrap();
    assert_eq!(web["name"], "web.prod");
    let id = web["id"].as_str().unwrap().to_string();
    servers.create(&params(json!({"name": "worker"}))).unwrap();

    // Step 3: get by name; the dot goes over the wire as %2E.
    let fetched = servers.get("web.prod").unwrap();
    assert_eq!(fetched, web);

    // Step 4: paginate.
    let page = servers
        .list(&params(json!({"page": 2, "per_page": 1})))
        .unwrap();
    assert_eq!(page["servers"][0]["name"], "worker");
    assert_eq!(page["meta"]["total"], 2);

    // Step 5: update.
    let updated = servers
        .update(&id, &params(json!({"status": "stopped"})))
        .unwrap();
    assert_eq!(updated["status"], "stopped");

    // Step 6: delete, then get is a typed not-found.
    servers.delete(&id).unwrap();
    let err = servers.get(&id).unwrap_err();
    let api = err.as_api().unwrap();
    assert_eq!(api.status, 404);
    assert_eq!(api.code.as_deref(), Some("not_found"));
    assert_eq!(api.message, format!("server {id} not found"));
}

#[test]
fn volume_validation_error_from_server() {
    let client = client(start_server());
    let err = client
        .volumes()
        .create(&params(json!({"name": "data", "size": 0})))
        .unwrap_err();
    let api = err.as_api().unwrap();
    assert_eq!(api.status, 422);
    assert_eq!(api.code.as_deref(), Some("invalid_request"));
    assert_eq!(api.message, "size must be positive");
}

#[test]
fn image_upload_is_multipart() {
    let client = client(start_server());
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logo.png");
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];
    std::fs::File::create(&path).unwrap().write_all(&png).unwrap();

    let image = client
        .images()
        .upload(&params(json!({"name": "logo", "tags": ["a", "b"]})), &path)
        .unwrap();
    assert_eq!(image["filename"], "logo.png");
    assert_eq!(image["content_type"], "image/png");
    assert_eq!(image["size"], 12);
    assert_eq!(
        image["fields"],
        json!([
            {"name": "name", "value": "logo"},
            {"name": "tags[]", "value": "a"},
            {"name": "tags[]", "value": "b"},
        ])
    );

    let fetched = client.images().get(image["id"].as_str().unwrap()).unwrap();
    assert_eq!(fetched, image);
}

#[test]
fn plain_text_success_is_raw() {
    let client = client(start_server());
    let decoded = client.get("/health", &Parameters::new()).unwrap();
    assert_eq!(decoded, Decoded::Raw(bytes::Bytes::from_static(b"ok")));
}

#[test]
fn plain_text_error_is_generic() {
    let client = client(start_server());
    let err = client.get("/boom", &Parameters::new()).unwrap_err();
    let api = err.as_api().unwrap();
    assert_eq!(api.status, 500);
    assert_eq!(api.code, None);
    assert_eq!(api.message, "Internal Server Error");
    assert_eq!(api.body_text(), "upstream exploded");
}

#[test]
fn invalid_options_fail_before_network() {
    // Nothing listens here; reaching the network would be a transport error.
    let client = ApiClient::with_ureq(ClientConfig::new("http://127.0.0.1:1"));
    let err = client
        .servers()
        .list(&params(json!({"page": 0})))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::OutOfRange { .. })
    ));

    let err = client.servers().list(&Parameters::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::Transport(TransportError::Connection(_) | TransportError::Other(_))
    ));
}
