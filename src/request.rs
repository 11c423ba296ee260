//! HTTP Request.

use std::io::Read;
use std::net::SocketAddr;

use crate::{
    codec,
    error::Error,
    headers::HeaderTable,
    http::{Method, Version},
    parser::reader::TokenReader,
};

/// An incoming HTTP request.
///
/// Handed to every middleware and route handler together with the
/// [`Response`][crate::Response] being built. Headers are fully parsed before
/// dispatch, the body stays on the socket until pulled with [`body`].
///
/// [`body`]: Request::body
#[derive(Debug)]
pub struct Request<'a> {
    pub(crate) io: TokenReader<'a>,
    pub(crate) peer: SocketAddr,
    pub(crate) method: Method,
    pub(crate) target: String,
    pub(crate) path: String,
    pub(crate) version: Version,
    pub(crate) headers: HeaderTable,
    pub(crate) queries: Vec<(String, String)>,
    pub(crate) raw_query: Option<String>,
    pub(crate) params: Vec<(String, String)>,
    pub(crate) locals: Vec<(String, String)>,
    pub(crate) body_size: u64,
    pub(crate) remaining: u64,
    pub(crate) cancel: bool,
}

impl<'a> Request<'a> {
    pub(crate) fn new(io: &'a mut dyn Read, peer: SocketAddr) -> Self {
        Self {
            io: TokenReader::new(io),
            peer,
            method: Method::Get,
            target: String::new(),
            path: String::new(),
            version: Version::default(),
            headers: HeaderTable::new(),
            queries: Vec::new(),
            raw_query: None,
            params: Vec::new(),
            locals: Vec::new(),
            body_size: 0,
            remaining: 0,
            cancel: false,
        }
    }

    /// Request method.
    #[inline]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Decoded request path, without the query string.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw request target as received, including the query string.
    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Request HTTP version.
    #[inline]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Peer address of the underlying connection.
    #[inline]
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Request headers.
    #[inline]
    pub fn headers(&self) -> &HeaderTable {
        &self.headers
    }

    /// Returns a request header value.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    // ===== Query =====

    /// Returns a query value by key, e.g. `name` in `/search?name=joe`.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.queries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Decoded query key/value pairs, in wire order.
    #[inline]
    pub fn queries(&self) -> &[(String, String)] {
        &self.queries
    }

    /// Raw query string, if the target had one.
    #[inline]
    pub fn raw_query(&self) -> Option<&str> {
        self.raw_query.as_deref()
    }

    // ===== Path parameters =====

    /// Returns a path parameter captured by the matched route.
    ///
    /// A route registered as `/user/:id` receiving `/user/42` captures
    /// `id = "42"`. Parameters reflect only the currently matched route.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// All captured path parameters, in pattern order.
    #[inline]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    // ===== Locals =====

    /// Returns a request local by name.
    ///
    /// Locals start as a copy of the application locals and can be extended
    /// by middlewares, typically to pass data to the route handler.
    pub fn local(&self, name: &str) -> Option<&str> {
        self.locals
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set a request local, replacing any previous value for `name`.
    pub fn set_local(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.locals.iter_mut().find(|(key, _)| *key == name) {
            Some(local) => local.1 = value,
            None => self.locals.push((name, value)),
        }
    }

    // ===== Cancellation =====

    /// Cancel the request.
    ///
    /// Only meaningful from a middleware: no further middleware or route
    /// handler runs, anything already written to the response is preserved
    /// and sent.
    #[inline]
    pub fn cancel(&mut self) {
        self.cancel = true;
    }

    /// Returns `true` if a middleware cancelled the request.
    #[inline]
    pub fn cancelled(&self) -> bool {
        self.cancel
    }

    // ===== Body =====

    /// Total body size announced by the request.
    #[inline]
    pub fn body_size(&self) -> u64 {
        self.body_size
    }

    /// Copy up to `buf.len()` body bytes from the connection.
    ///
    /// Returns the number of bytes copied, which is less than requested only
    /// at the end of the body. Bytes are consumed once, subsequent calls
    /// continue where the previous one stopped.
    pub fn body(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let want = self.remaining.min(buf.len() as u64) as usize;

        if want == 0 {
            return Ok(0);
        }

        self.io.read_full(&mut buf[..want]).map_err(Error::Recv)?;
        self.remaining -= want as u64;

        Ok(want)
    }

    fn body_all(&mut self) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0u8; self.remaining as usize];
        self.body(&mut buf)?;
        Ok(buf)
    }

    /// Decode an `application/x-www-form-urlencoded` body into ordered
    /// key/value pairs.
    ///
    /// Fails with [`Error::BadContentType`] for any other content type,
    /// [`Error::EmptyBody`] when there is no body left to decode, and
    /// [`Error::NoFormSupport`] when built without the `form` feature.
    pub fn form(&mut self) -> Result<Vec<(String, String)>, Error> {
        let content_type = self.get("content-type").unwrap_or_default();

        if !content_type.starts_with("application/x-www-form-urlencoded") {
            return Err(Error::BadContentType);
        }
        if self.remaining == 0 {
            return Err(Error::EmptyBody);
        }

        let body = self.body_all()?;
        codec::form_pairs(&body)
    }

    /// Decode an `application/json` body.
    ///
    /// Fails with [`Error::BadContentType`] for any other content type and
    /// [`Error::EmptyBody`] when there is no body left to decode.
    #[cfg(feature = "json")]
    pub fn json(&mut self) -> Result<serde_json::Value, Error> {
        let content_type = self.get("content-type").unwrap_or_default();

        if !content_type.starts_with("application/json") {
            return Err(Error::BadContentType);
        }
        if self.remaining == 0 {
            return Err(Error::EmptyBody);
        }

        let body = self.body_all()?;
        codec::json_decode(&body)
    }
}
