//! Error types reported by the library.
//!
//! Protocol errors on a single connection are handled internally by mapping
//! them to a `400` response, see [`parser`][crate::parser]. Everything the
//! embedding application can observe goes through [`Error`].

use std::io;

/// An error that can occur while building, running or serving an [`App`].
///
/// [`App`]: crate::App
#[derive(Debug)]
pub enum Error {
    /// Worker pool size is zero.
    BadPoolSize,
    /// Max connection count is zero.
    BadMaxConnCount,
    /// Host address cannot be parsed or resolved.
    BadHost,
    /// Route or static path does not start with `/`.
    BadPath,
    /// Response code is outside the `100..=599` range.
    BadResponseCode,
    /// Body is not using the requested content type.
    BadContentType,
    /// Body is empty.
    EmptyBody,
    /// The response has already been serialized.
    ResponseCompleted,
    /// Work submitted after the pool stopped.
    PoolClosed,
    /// File does not exist.
    NotFound,
    /// Missing read permission.
    NoReadPerm,
    /// Library built without the `json` feature.
    NoJsonSupport,
    /// Library built without the `form` feature.
    NoFormSupport,

    /// Failed to spawn a worker thread.
    Pool(io::Error),
    /// Failed to install the interrupt handler.
    Signal(io::Error),
    /// Failed to create the listening socket.
    Socket(io::Error),
    /// Failed to set socket options.
    SocketOpt(io::Error),
    /// Failed to bind on the interface.
    Bind(io::Error),
    /// Failed to listen on the interface.
    Listen(io::Error),
    /// Failed to accept a connection.
    Accept(io::Error),
    /// Failed to receive from the peer.
    Recv(io::Error),
    /// Failed to send to the peer.
    Send(io::Error),
    /// Failed to read a file while serving it.
    File(io::Error),

    /// Form decoding failed.
    #[cfg(feature = "form")]
    Form(serde_urlencoded::de::Error),
    /// JSON encoding or decoding failed.
    #[cfg(feature = "json")]
    Json(serde_json::Error),
}

impl Error {
    /// Returns a short description of the error, without the underlying cause.
    pub const fn description(&self) -> &'static str {
        match self {
            Error::BadPoolSize => "invalid pool size",
            Error::BadMaxConnCount => "invalid max connection count",
            Error::BadHost => "invalid host address",
            Error::BadPath => "invalid path (should start with /)",
            Error::BadResponseCode => "specified response code is invalid",
            Error::BadContentType => "body is not using the requested content type",
            Error::EmptyBody => "body is empty",
            Error::ResponseCompleted => "response is already completed",
            Error::PoolClosed => "worker pool is stopped",
            Error::NotFound => "file does not exist",
            Error::NoReadPerm => "missing read permission",
            Error::NoJsonSupport => "library built without JSON support",
            Error::NoFormSupport => "library built without form support",
            Error::Pool(_) => "failed to create worker pool",
            Error::Signal(_) => "failed to install the interrupt handler",
            Error::Socket(_) => "failed to create socket",
            Error::SocketOpt(_) => "failed to set socket options",
            Error::Bind(_) => "failed to bind on the interface",
            Error::Listen(_) => "failed to listen on the interface",
            Error::Accept(_) => "failed to accept connection",
            Error::Recv(_) => "failed to receive request data",
            Error::Send(_) => "failed to send response data",
            Error::File(_) => "failed to read the file",
            #[cfg(feature = "form")]
            Error::Form(_) => "failed to decode form data",
            #[cfg(feature = "json")]
            Error::Json(_) => "failed to decode JSON data",
        }
    }

    fn cause(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Pool(err)
            | Error::Signal(err)
            | Error::Socket(err)
            | Error::SocketOpt(err)
            | Error::Bind(err)
            | Error::Listen(err)
            | Error::Accept(err)
            | Error::Recv(err)
            | Error::Send(err)
            | Error::File(err) => Some(err),
            #[cfg(feature = "form")]
            Error::Form(err) => Some(err),
            #[cfg(feature = "json")]
            Error::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause()
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.cause() {
            Some(cause) => write!(f, "{}: {cause}", self.description()),
            None => f.write_str(self.description()),
        }
    }
}
