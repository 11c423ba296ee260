//! Incremental HTTP/1.x request parser.
//!
//! Operates directly on the connection in blocking mode, strictly sequential:
//!
//! ```text
//! METHOD -> PATH -> VERSION -> (NAME -> VALUE)* -> done
//! ```
//!
//! Headers loop until an empty line. Body bytes are not consumed here, they
//! are pulled on demand through [`Request::body`][crate::Request::body].

mod error;
mod matches;

pub(crate) mod reader;

#[cfg(test)]
mod test;

pub(crate) use error::{Error, ErrorKind};

use crate::{
    headers,
    http::{Method, Version},
    limits,
    request::Request,
};

/// Parse the request line and all headers, then derive the body length.
///
/// On a protocol error the caller answers `400` without further dispatch; on
/// a transport error it tears the connection down silently.
pub(crate) fn parse(req: &mut Request<'_>) -> Result<(), Error> {
    // ===== Request line =====

    let token = req.io.token(b' ', limits::method_max(), matches::is_method_byte)?;
    req.method = Method::from_bytes(&token).ok_or(ErrorKind::UnknownMethod)?;

    let target = req.io.token(b' ', limits::target_max(), matches::is_target_byte)?;
    if target.is_empty() {
        return Err(ErrorKind::InvalidTarget.into());
    }

    let token = req.io.line(limits::VERSION_LEN, matches::is_version_byte)?;
    req.version = Version::from_bytes(&token).ok_or(ErrorKind::UnsupportedVersion)?;

    // ===== Headers =====

    loop {
        match req.io.next()? {
            b'\n' => break,
            b'\r' => match req.io.next()? {
                b'\n' => break,
                _ => return Err(ErrorKind::InvalidSeparator.into()),
            },
            byte => req.io.unread(byte),
        }

        let name = req.io.token(b':', limits::header_name_max(), headers::is_name_byte)?;
        if name.is_empty() {
            return Err(ErrorKind::EmptyHeaderName.into());
        }

        // a single space between the colon and the value
        if req.io.next()? != b' ' {
            return Err(ErrorKind::InvalidSeparator.into());
        }

        let value = req.io.line(limits::header_value_max(), headers::is_value_byte)?;

        req.headers.set(
            String::from_utf8_lossy(&name).into_owned(),
            String::from_utf8_lossy(&value).into_owned(),
        );
    }

    // ===== Target =====

    // the byte class already restricts the target to ASCII
    let target = String::from_utf8_lossy(&target).into_owned();

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query.to_owned())),
        None => (target.as_str(), None),
    };

    let decoded = urlencoding::decode_binary(path.as_bytes()).into_owned();
    req.path = String::from_utf8(decoded).map_err(|_| ErrorKind::InvalidEncoding)?;

    #[cfg(feature = "form")]
    if let Some(query) = &query {
        match crate::codec::form_pairs(query.as_bytes()) {
            Ok(pairs) => req.queries = pairs,
            Err(err) => {
                crate::log::debug!("failed to decode the query string: {err}");
            }
        }
    }

    req.raw_query = query;
    req.target = target;

    // ===== Body length =====

    let size = if !req.method.allows_body() {
        0
    } else {
        match req.headers.get("content-length") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ErrorKind::BadContentLength)?,
            None => 0,
        }
    };

    if req.method.requires_body() && size == 0 {
        return Err(ErrorKind::MissingBody.into());
    }

    req.body_size = size;
    req.remaining = size;

    Ok(())
}
