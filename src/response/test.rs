use super::Response;
use crate::{Config, Error};

fn response() -> Response {
    Response::new(&Config::default())
}

fn plain_response() -> Response {
    Response::new(&Config {
        server_header: false,
        ..Config::default()
    })
}

#[test]
fn test_end_wire_format() {
    let mut res = plain_response();
    // pin the date so the head is deterministic
    res.set("Date", "Sun, 06 Nov 1994 08:49:37 GMT");
    res.send("hello");

    let mut wire = Vec::new();
    res.end(&mut wire).unwrap();

    let wire = String::from_utf8(wire).unwrap();
    assert!(wire.starts_with("HTTP/1.1 200\r\n"), "status line: {wire}");
    assert!(wire.contains("Connection: close\r\n"));
    assert!(wire.contains("Date: Sun, 06 Nov 1994 08:49:37 GMT\r\n"));
    assert!(wire.ends_with("content-length: 5\r\n\r\nhello"));
}

#[test]
fn test_end_twice_fails() {
    let mut res = response();
    res.send("once");

    let mut wire = Vec::new();
    res.end(&mut wire).unwrap();
    let sent = wire.len();

    assert!(matches!(res.end(&mut wire), Err(Error::ResponseCompleted)));
    assert_eq!(wire.len(), sent, "second end must not write");
}

#[test]
fn test_end_rejects_bad_code() {
    let mut res = response();
    res.set_status(42);

    let mut wire = Vec::new();
    assert!(matches!(res.end(&mut wire), Err(Error::BadResponseCode)));
    assert!(wire.is_empty());
    assert!(!res.completed());
}

#[test]
fn test_server_header_toggle() {
    let mut wire = Vec::new();
    response().end(&mut wire).unwrap();
    assert!(String::from_utf8(wire).unwrap().contains("Server: loam\r\n"));

    let mut wire = Vec::new();
    plain_response().end(&mut wire).unwrap();
    assert!(!String::from_utf8(wire).unwrap().contains("Server:"));
}

#[test]
fn test_body_replace_and_append() {
    let mut res = plain_response();
    res.send("first");
    res.send("second");
    res.append(format_args!(" and {}", "third"));

    let mut wire = Vec::new();
    res.end(&mut wire).unwrap();

    let wire = String::from_utf8(wire).unwrap();
    assert!(wire.ends_with("content-length: 16\r\n\r\nsecond and third"));
}

#[test]
fn test_user_content_length_is_overridden() {
    let mut res = plain_response();
    res.set("Content-Length", "999");
    res.send("abc");

    let mut wire = Vec::new();
    res.end(&mut wire).unwrap();

    let wire = String::from_utf8(wire).unwrap();
    assert!(!wire.contains("999"));
    assert!(wire.contains("content-length: 3\r\n"));
}

#[cfg(feature = "json")]
#[test]
fn test_json_body() {
    let mut res = plain_response();
    res.json(&serde_json::json!({ "ok": true })).unwrap();

    assert_eq!(res.get("content-type"), Some("application/json; charset=utf-8"));

    let mut wire = Vec::new();
    res.end(&mut wire).unwrap();
    assert!(String::from_utf8(wire).unwrap().ends_with("{\"ok\":true}"));
}
