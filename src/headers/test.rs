use super::HeaderTable;

#[test]
fn test_set_get_casing() {
    let mut headers = HeaderTable::new();
    headers.set("Content-Type", "text/html");

    assert_eq!(headers.get("Content-Type"), Some("text/html"));
    assert_eq!(headers.get("content-type"), Some("text/html"));
    assert_eq!(headers.get("CONTENT-TYPE"), Some("text/html"));
    assert_eq!(headers.get("cOnTeNt-TyPe"), Some("text/html"));
    assert_eq!(headers.len(), 1);
}

#[test]
fn test_set_upserts() {
    let mut headers = HeaderTable::new();
    headers.set("x-token", "one");
    headers.set("X-Token", "two");

    assert_eq!(headers.get("x-token"), Some("two"));
    assert_eq!(headers.len(), 1);
}

#[test]
fn test_del_casing() {
    let mut headers = HeaderTable::new();
    headers.set("X-Forwarded-For", "10.0.0.1");

    assert_eq!(headers.del("x-forwarded-for"), Some("10.0.0.1".to_owned()));
    assert_eq!(headers.get("X-Forwarded-For"), None);
    assert_eq!(headers.del("x-forwarded-for"), None);
    assert!(headers.is_empty());
}

#[test]
fn test_iter_total() {
    let mut headers = HeaderTable::new();
    headers.set("host", "localhost");
    headers.set("accept", "*/*");
    headers.set("user-agent", "curl");

    let mut pairs = headers.iter().collect::<Vec<_>>();
    pairs.sort();
    assert_eq!(
        pairs,
        [("accept", "*/*"), ("host", "localhost"), ("user-agent", "curl")],
    );
}

#[test]
fn test_clear() {
    let mut headers = HeaderTable::new();
    headers.set("host", "localhost");
    headers.set("accept", "*/*");

    headers.clear();
    assert!(headers.is_empty());
    assert_eq!(headers.iter().count(), 0);
}
