use std::fmt;

/// HTTP Version.
///
/// Only `HTTP/1.0` and `HTTP/1.1` are accepted on the wire.
#[derive(Copy, Clone, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub struct Version(Inner);

impl Version {
    /// [`HTTP/1.0`](https://developer.mozilla.org/en-US/docs/Web/HTTP/Guides/Evolution_of_HTTP#http1.0_%E2%80%93_building_extensibility)
    pub const HTTP_10: Version = Version(Inner::Http10);

    /// [`HTTP/1.1`](https://developer.mozilla.org/en-US/docs/Web/HTTP/Guides/Evolution_of_HTTP#http1.1_%E2%80%93_the_standardized_protocol)
    pub const HTTP_11: Version = Version(Inner::Http11);

    /// Parse a version from its wire representation.
    pub const fn from_bytes(bytes: &[u8]) -> Option<Version> {
        match bytes {
            b"HTTP/1.0" => Some(Version::HTTP_10),
            b"HTTP/1.1" => Some(Version::HTTP_11),
            _ => None,
        }
    }

    /// Returns string representation of the version.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self.0 {
            Inner::Http10 => "HTTP/1.0",
            Inner::Http11 => "HTTP/1.1",
        }
    }
}

#[derive(PartialEq, PartialOrd, Copy, Clone, Eq, Ord, Hash)]
enum Inner {
    Http10,
    Http11,
}

impl Default for Version {
    #[inline]
    fn default() -> Version {
        Version::HTTP_11
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
