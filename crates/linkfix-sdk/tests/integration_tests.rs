//! Integration tests for the Linkfix SDK
//!
//! A tiny HTTP/1.1 stub on a local socket stands in for the REST API, so the
//! real request building, paging and error mapping are exercised.

use linkfix_domain::{ItemId, ItemRepository, LockConflict, PatchOperation, ProjectId, UserId};
use linkfix_sdk::{ClientOptions, Credentials, RestClient, SdkError};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Recorded request: request line and body
type Recorded = Arc<Mutex<Vec<(String, String)>>>;

/// Start a stub server answering with `route(request_line, body) -> (status, body)`
fn start_stub<F>(route: F) -> (String, Recorded)
where
    F: Fn(&str, &str) -> (u16, String) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&recorded);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let (line, body) = read_request(&mut stream);
            log.lock().unwrap().push((line.clone(), body.clone()));
            let (status, response) = route(&line, &body);
            let reply = format!(
                "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                response.len(),
                response
            );
            let _ = stream.write_all(reply.as_bytes());
            let _ = stream.flush();
        }
    });

    (format!("http://{}", addr), recorded)
}

fn read_request(stream: &mut TcpStream) -> (String, String) {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            return (String::new(), String::new());
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buffer, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buffer.len() < header_end + content_length {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }

    let line = head.lines().next().unwrap_or_default().to_string();
    let body = String::from_utf8_lossy(&buffer[header_end..]).to_string();
    (line, body)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn client(url: &str) -> RestClient {
    let options = ClientOptions {
        page_size: 2,
        ..ClientOptions::default()
    };
    RestClient::new(
        url,
        Credentials::Basic {
            username: "alice".to_string(),
            password: "secret".to_string(),
        },
        options,
    )
    .unwrap()
}

fn item_json(id: u64, project: u64) -> String {
    format!(
        r#"{{"id": {id}, "documentKey": "REQ-{id}", "project": {project}, "fields": {{"name": "Item {id}"}}}}"#
    )
}

#[test]
fn test_list_items_follows_pages() {
    let (url, recorded) = start_stub(|line, _| {
        let (start, items) = if line.contains("startAt=0") {
            (0, format!("{},{}", item_json(1, 7), item_json(2, 7)))
        } else {
            (2, item_json(3, 7))
        };
        let count = if start == 0 { 2 } else { 1 };
        let body = format!(
            r#"{{"meta": {{"status": "OK", "pageInfo": {{"startIndex": {start}, "resultCount": {count}, "totalResults": 3}}}}, "data": [{items}]}}"#
        );
        (200, body)
    });

    let items = client(&url).list_items(ProjectId::new(7)).unwrap();

    let ids: Vec<u64> = items.iter().map(|item| item.id.value()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let requests = recorded.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].0.starts_with("GET /rest/v1/items?project=7&startAt=0&maxResults=2"));
    assert!(requests[1].0.contains("startAt=2"));
}

#[test]
fn test_patch_sends_replace_operations() {
    let (url, recorded) = start_stub(|_, _| (200, r#"{"meta": {"status": "OK"}}"#.to_string()));

    client(&url)
        .patch_item(
            ItemId::new(42),
            &[PatchOperation::replace_field("description", "<p>fixed</p>")],
        )
        .unwrap();

    let requests = recorded.lock().unwrap();
    assert!(requests[0].0.starts_with("PATCH /rest/v1/items/42"));
    let body: serde_json::Value = serde_json::from_str(&requests[0].1).unwrap();
    assert_eq!(
        body,
        serde_json::json!([{"op": "replace", "path": "/fields/description", "value": "<p>fixed</p>"}])
    );
}

#[test]
fn test_patch_error_carries_api_message() {
    let (url, _) = start_stub(|_, _| {
        (
            400,
            r#"{"meta": {"status": "Bad Request", "message": "Item is locked by another user"}}"#
                .to_string(),
        )
    });

    let err = client(&url)
        .patch_item(ItemId::new(1), &[PatchOperation::replace_field("name", "x")])
        .unwrap_err();

    assert!(matches!(err, SdkError::Api { status: 400, .. }));
    assert!(err.is_lock_conflict());
}

#[test]
fn test_unauthorized_maps_to_auth_error() {
    let (url, _) = start_stub(|_, _| (401, String::new()));

    let err = client(&url).connect().unwrap_err();
    assert!(matches!(err, SdkError::AuthError(_)));
}

#[test]
fn test_get_user_and_synced_items() {
    let (url, _) = start_stub(|line, _| {
        if line.contains("/users/9") {
            (
                200,
                r#"{"meta": {"status": "OK"}, "data": {"id": 9, "firstName": "Grace", "lastName": "Hopper"}}"#
                    .to_string(),
            )
        } else {
            (
                200,
                format!(
                    r#"{{"meta": {{"status": "OK", "pageInfo": {{"startIndex": 0, "resultCount": 2, "totalResults": 2}}}}, "data": [{},{}]}}"#,
                    item_json(200, 7),
                    item_json(300, 8)
                ),
            )
        }
    });

    let client = client(&url);
    let user = client.get_user(UserId::new(9)).unwrap();
    assert_eq!(user.display_name(), "Grace Hopper");

    let synced = client.get_synced_items(ItemId::new(100)).unwrap();
    assert_eq!(synced.len(), 2);
    assert_eq!(synced[0].project, ProjectId::new(7));
}
