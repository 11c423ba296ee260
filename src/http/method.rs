use std::fmt;

/// HTTP Method.
///
/// This API follows the request methods of [RFC9110]. Arbitrary methods are
/// not supported, an unknown token on the wire is a parse failure.
///
/// [RFC9110]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-methods>
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// The [GET] method requests transfer of a current selected
    /// representation for the target resource.
    ///
    /// [GET]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-get>
    Get,
    /// The [HEAD] method is identical to GET except that the server MUST NOT
    /// send content in the response.
    ///
    /// [HEAD]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-head>
    Head,
    /// The [POST] method requests that the target resource process the
    /// representation enclosed in the request.
    ///
    /// [POST]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-post>
    Post,
    /// The [PUT] method requests that the state of the target resource be
    /// created or replaced with the enclosed representation.
    ///
    /// [PUT]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-put>
    Put,
    /// The [DELETE] method requests that the origin server remove the
    /// association between the target resource and its functionality.
    ///
    /// [DELETE]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-delete>
    Delete,
    /// The [CONNECT] method requests that the recipient establish a tunnel to
    /// the destination origin server.
    ///
    /// [CONNECT]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-connect>
    Connect,
    /// The [OPTIONS] method requests information about the communication
    /// options available for the target resource.
    ///
    /// [OPTIONS]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-options>
    Options,
    /// The [TRACE] method requests a remote, application-level loop-back of
    /// the request message.
    ///
    /// [TRACE]: <https://www.rfc-editor.org/rfc/rfc9110.html#name-trace>
    Trace,
}

struct Props {
    value: &'static str,
    allows_body: bool,
    requires_body: bool,
}

impl Method {
    const fn props(&self) -> Props {
        match self {
            Method::Get => Props { value: "GET", allows_body: false, requires_body: false },
            Method::Head => Props { value: "HEAD", allows_body: false, requires_body: false },
            Method::Post => Props { value: "POST", allows_body: true, requires_body: true },
            Method::Put => Props { value: "PUT", allows_body: true, requires_body: true },
            Method::Delete => Props { value: "DELETE", allows_body: true, requires_body: false },
            Method::Connect => Props { value: "CONNECT", allows_body: false, requires_body: false },
            Method::Options => Props { value: "OPTIONS", allows_body: true, requires_body: false },
            Method::Trace => Props { value: "TRACE", allows_body: false, requires_body: false },
        }
    }

    /// Parse a method from its wire token.
    pub const fn from_bytes(bytes: &[u8]) -> Option<Method> {
        match bytes {
            b"GET" => Some(Method::Get),
            b"HEAD" => Some(Method::Head),
            b"POST" => Some(Method::Post),
            b"PUT" => Some(Method::Put),
            b"DELETE" => Some(Method::Delete),
            b"CONNECT" => Some(Method::Connect),
            b"OPTIONS" => Some(Method::Options),
            b"TRACE" => Some(Method::Trace),
            _ => None,
        }
    }

    /// Returns string representation of the method.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.props().value
    }

    /// Returns `true` if a request with this method may carry a body.
    #[inline]
    pub const fn allows_body(&self) -> bool {
        self.props().allows_body
    }

    /// Returns `true` if a request with this method must carry a body.
    #[inline]
    pub const fn requires_body(&self) -> bool {
        self.props().requires_body
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error returned when parsing an unknown method token.
#[derive(Debug)]
pub struct UnknownMethod;

impl std::error::Error for UnknownMethod {}
impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("unknown method")
    }
}

impl std::str::FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes()).ok_or(UnknownMethod)
    }
}
