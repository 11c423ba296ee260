use std::io::Cursor;
use std::net::SocketAddr;

use super::{Error, ErrorKind, parse};
use crate::{Method, Request, Version};

fn peer() -> SocketAddr {
    "127.0.0.1:9000".parse().unwrap()
}

fn parsed(input: &[u8], check: impl FnOnce(&mut Request)) {
    let mut io = Cursor::new(input.to_vec());
    let mut req = Request::new(&mut io, peer());

    parse(&mut req).unwrap();
    check(&mut req);
}

fn parse_err(input: &[u8]) -> Error {
    let mut io = Cursor::new(input.to_vec());
    let mut req = Request::new(&mut io, peer());

    parse(&mut req).unwrap_err()
}

#[test]
fn test_parse_minimal() {
    parsed(b"GET / HTTP/1.1\r\n\r\n", |req| {
        assert_eq!(req.method(), Method::Get);
        assert_eq!(req.path(), "/");
        assert_eq!(req.version(), Version::HTTP_11);
        assert_eq!(req.body_size(), 0);
        assert_eq!(req.headers().len(), 0);
    });

    // bare LF line endings are accepted as well
    parsed(b"GET / HTTP/1.0\n\n", |req| {
        assert_eq!(req.version(), Version::HTTP_10);
    });
}

#[test]
fn test_parse_headers() {
    let input = b"GET /index HTTP/1.1\r\nHost: localhost\r\nAccept: */*\r\n\r\n";

    parsed(input, |req| {
        assert_eq!(req.get("host"), Some("localhost"));
        assert_eq!(req.get("HOST"), Some("localhost"));
        assert_eq!(req.get("accept"), Some("*/*"));
        assert_eq!(req.get("missing"), None);
    });
}

#[test]
fn test_parse_invalid_method() {
    let err = parse_err(b"G#T / HTTP/1.1\r\n\r\n");
    assert!(matches!(err.kind(), ErrorKind::InvalidByte));
    assert!(err.is_protocol());

    let err = parse_err(b"BREW / HTTP/1.1\r\n\r\n");
    assert!(matches!(err.kind(), ErrorKind::UnknownMethod));
}

#[test]
fn test_parse_invalid_version() {
    let err = parse_err(b"GET / HTTP/2.0\r\n\r\n");
    assert!(matches!(err.kind(), ErrorKind::UnsupportedVersion));

    let err = parse_err(b"GET / HTTP/1.11\r\n\r\n");
    assert!(matches!(err.kind(), ErrorKind::FieldTooLong));
}

#[test]
fn test_parse_query_split() {
    parsed(b"GET /search?q=rust&lang=en HTTP/1.1\r\n\r\n", |req| {
        assert_eq!(req.path(), "/search");
        assert_eq!(req.raw_query(), Some("q=rust&lang=en"));

        #[cfg(feature = "form")]
        {
            assert_eq!(req.query("q"), Some("rust"));
            assert_eq!(req.query("lang"), Some("en"));
            assert_eq!(req.query("missing"), None);
        }
    });
}

#[test]
fn test_parse_percent_decoded_path() {
    parsed(b"GET /a%20b/c HTTP/1.1\r\n\r\n", |req| {
        assert_eq!(req.path(), "/a b/c");
        assert_eq!(req.target(), "/a%20b/c");
    });
}

#[test]
fn test_parse_body_is_lazy() {
    let input = b"POST /submit HTTP/1.1\r\ncontent-length: 11\r\n\r\nhello world";

    parsed(input, |req| {
        assert_eq!(req.body_size(), 11);

        let mut buf = [0u8; 5];
        assert_eq!(req.body(&mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");

        let mut buf = [0u8; 32];
        assert_eq!(req.body(&mut buf).unwrap(), 6, "short copy only at end of body");
        assert_eq!(&buf[..6], b" world");

        assert_eq!(req.body(&mut buf).unwrap(), 0);
    });
}

#[test]
fn test_parse_body_rules() {
    // a method that disallows a body ignores content-length
    parsed(b"GET / HTTP/1.1\r\ncontent-length: 5\r\n\r\nhello", |req| {
        assert_eq!(req.body_size(), 0);
    });

    // a method that requires a body must announce one
    let err = parse_err(b"POST /submit HTTP/1.1\r\n\r\n");
    assert!(matches!(err.kind(), ErrorKind::MissingBody));

    let err = parse_err(b"POST /submit HTTP/1.1\r\ncontent-length: nope\r\n\r\n");
    assert!(matches!(err.kind(), ErrorKind::BadContentLength));
}

#[test]
fn test_parse_rejects_obs_fold() {
    let err = parse_err(b"GET / HTTP/1.1\r\nA: b\r\n c\r\n\r\n");
    assert!(matches!(err.kind(), ErrorKind::InvalidByte));
}

#[test]
fn test_parse_rejects_missing_value_space() {
    let err = parse_err(b"GET / HTTP/1.1\r\nHost:localhost\r\n\r\n");
    assert!(matches!(err.kind(), ErrorKind::InvalidSeparator));
}

#[test]
fn test_parse_oversized_field() {
    let mut input = b"GET / HTTP/1.1\r\nbig: ".to_vec();
    input.extend(std::iter::repeat_n(b'a', crate::limits::header_value_max() + 1));
    input.extend(b"\r\n\r\n");

    let err = parse_err(&input);
    assert!(matches!(err.kind(), ErrorKind::FieldTooLong));
}

#[test]
fn test_parse_truncated_is_not_protocol() {
    let err = parse_err(b"GET / HT");
    assert!(matches!(err.kind(), ErrorKind::UnexpectedEof));
    assert!(!err.is_protocol());
}

#[cfg(feature = "form")]
#[test]
fn test_form_body() {
    let input =
        b"POST /login HTTP/1.1\r\ncontent-type: application/x-www-form-urlencoded\r\ncontent-length: 18\r\n\r\nuser=joe&pass=1234";

    parsed(input, |req| {
        let pairs = req.form().unwrap();
        assert_eq!(
            pairs,
            [
                ("user".to_owned(), "joe".to_owned()),
                ("pass".to_owned(), "1234".to_owned()),
            ],
        );
    });
}

#[cfg(feature = "form")]
#[test]
fn test_form_requires_content_type() {
    let input = b"POST /login HTTP/1.1\r\ncontent-length: 4\r\n\r\nabcd";

    parsed(input, |req| {
        assert!(matches!(req.form(), Err(crate::Error::BadContentType)));
    });
}

#[cfg(feature = "json")]
#[test]
fn test_json_body() {
    let input =
        b"POST /api HTTP/1.1\r\ncontent-type: application/json\r\ncontent-length: 13\r\n\r\n{\"name\":\"jo\"}";

    parsed(input, |req| {
        let value = req.json().unwrap();
        assert_eq!(value["name"], "jo");
    });
}
