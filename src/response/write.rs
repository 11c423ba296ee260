use bytes::{BufMut, BytesMut};

use super::Response;

/// Serialize the response head: status line, headers, computed
/// `content-length` and the terminating blank line.
pub(super) fn write_head(res: &Response) -> BytesMut {
    let mut buf = BytesMut::with_capacity(256);
    let mut itoa = itoa::Buffer::new();

    buf.put_slice(res.version.as_str().as_bytes());
    buf.put_slice(b" ");
    buf.put_slice(itoa.format(res.status).as_bytes());
    buf.put_slice(b"\r\n");

    for (name, value) in res.headers.iter() {
        buf.put_slice(name.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(value.as_bytes());
        buf.put_slice(b"\r\n");
    }

    buf.put_slice(b"content-length: ");
    buf.put_slice(itoa.format(res.body.size()).as_bytes());
    buf.put_slice(b"\r\n\r\n");

    buf
}
