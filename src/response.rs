//! HTTP Response.

use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::{
    config::Config,
    error::Error,
    headers::HeaderTable,
    http::{self, Version, httpdate_now},
};

mod write;

#[cfg(test)]
mod test;

/// An outgoing HTTP response.
///
/// Handlers mutate the response during dispatch; serialization to the wire
/// happens exactly once after dispatch finishes. Body-setting operations
/// replace any previous body, only [`append`][Response::append] extends it.
#[derive(Debug)]
pub struct Response {
    version: Version,
    status: u16,
    headers: HeaderTable,
    body: Body,
    completed: bool,
}

#[derive(Debug)]
enum Body {
    Empty,
    Buffer(Vec<u8>),
    File { file: File, size: u64 },
}

impl Body {
    fn size(&self) -> u64 {
        match self {
            Body::Empty => 0,
            Body::Buffer(buf) => buf.len() as u64,
            Body::File { size, .. } => *size,
        }
    }
}

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

impl Response {
    pub(crate) fn new(config: &Config) -> Self {
        let mut headers = HeaderTable::new();

        if config.server_header {
            headers.set("Server", "loam");
        }
        headers.set("Connection", "close");
        headers.set("Date", httpdate_now().as_str());

        Self {
            version: Version::default(),
            status: 200,
            headers,
            body: Body::Empty,
            completed: false,
        }
    }

    /// Response status code.
    #[inline]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Set the response status code.
    ///
    /// The code is validated at serialization, a value outside `100..=599`
    /// fails the response transfer.
    #[inline]
    pub fn set_status(&mut self, code: u16) {
        self.status = code;
    }

    #[inline]
    pub(crate) fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    /// Response headers.
    #[inline]
    pub fn headers(&self) -> &HeaderTable {
        &self.headers
    }

    /// Set a response header.
    #[inline]
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    /// Returns a response header value.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Delete a response header.
    #[inline]
    pub fn del(&mut self, name: &str) -> Option<String> {
        self.headers.del(name)
    }

    /// Returns `true` once the response has been serialized to the wire.
    #[inline]
    pub fn completed(&self) -> bool {
        self.completed
    }

    // ===== Body =====

    /// Set the response body, replacing any previous body.
    pub fn send(&mut self, body: impl Into<Vec<u8>>) {
        self.body = Body::Buffer(body.into());
    }

    /// Set the response body from format arguments, replacing any previous
    /// body and setting a plain-text content type.
    ///
    /// ```ignore
    /// res.send_fmt(format_args!("hello {name}"));
    /// ```
    pub fn send_fmt(&mut self, args: fmt::Arguments) {
        self.set("Content-Type", TEXT_PLAIN);
        self.body = Body::Buffer(fmt::format(args).into_bytes());
    }

    /// Extend the in-memory body with format arguments.
    ///
    /// Unlike the other body operations this does not replace the previous
    /// body. A file body is dropped first.
    pub fn append(&mut self, args: fmt::Arguments) {
        match &mut self.body {
            Body::Buffer(buf) => buf.extend_from_slice(fmt::format(args).as_bytes()),
            _ => {
                self.set("Content-Type", TEXT_PLAIN);
                self.body = Body::Buffer(fmt::format(args).into_bytes());
            }
        }
    }

    /// Clear the response body.
    pub fn clear(&mut self) {
        self.body = Body::Empty;
    }

    /// Set the `Location` header and a `301` status to redirect the client.
    pub fn redirect(&mut self, url: impl Into<String>) {
        self.status = 301;
        self.set("Location", url);
    }

    /// Serialize `value` as the JSON response body, replacing any previous
    /// body and setting the content type.
    #[cfg(feature = "json")]
    pub fn json<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        let body = crate::codec::json_encode(value)?;
        self.set("Content-Type", "application/json; charset=utf-8");
        self.body = Body::Buffer(body);
        Ok(())
    }

    /// Send a file as the response body, replacing any previous body.
    ///
    /// The content type is inferred from the file extension. The file is not
    /// read here, it is streamed to the socket in fixed-size chunks at
    /// serialization.
    pub fn sendfile(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|err| match err.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound,
            std::io::ErrorKind::PermissionDenied => Error::NoReadPerm,
            _ => Error::File(err),
        })?;

        let size = file.metadata().map_err(Error::File)?.len();

        let content_type = match path.extension().and_then(|ext| ext.to_str()) {
            Some("html") => "text/html; charset=utf-8",
            Some("json") => "application/json; charset=utf-8",
            Some("css") => "text/css; charset=utf-8",
            Some("js") => "text/javascript; charset=utf-8",
            _ => TEXT_PLAIN,
        };

        self.set("Content-Type", content_type);
        self.body = Body::File { file, size };

        Ok(())
    }

    // ===== Serialization =====

    /// Serialize the response to the wire.
    ///
    /// Writes the status line, all headers, a computed `content-length`, a
    /// blank line and the body. A second attempt on the same response fails
    /// with [`Error::ResponseCompleted`] without touching the wire.
    pub(crate) fn end(&mut self, io: &mut dyn Write) -> Result<(), Error> {
        if self.completed {
            return Err(Error::ResponseCompleted);
        }
        if !http::code_is_valid(self.status) {
            return Err(Error::BadResponseCode);
        }

        self.completed = true;

        // content-length is always the computed one
        self.headers.del("content-length");

        let head = write::write_head(self);
        io.write_all(&head).map_err(Error::Send)?;

        match &mut self.body {
            Body::Empty => {}
            Body::Buffer(buf) => io.write_all(buf).map_err(Error::Send)?,
            Body::File { file, .. } => {
                let mut chunk = [0u8; 8192];

                loop {
                    let read = file.read(&mut chunk).map_err(Error::File)?;
                    if read == 0 {
                        break;
                    }
                    io.write_all(&chunk[..read]).map_err(Error::Send)?;
                }
            }
        }

        io.flush().map_err(Error::Send)
    }
}
