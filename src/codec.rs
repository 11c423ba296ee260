//! Boundary to the URL-form and JSON codecs.
//!
//! Both codecs are optional at build time. Their absence is reported through
//! [`Error::NoFormSupport`] / [`Error::NoJsonSupport`] wherever the calling
//! surface allows it, instead of failing at a distance.

use crate::error::Error;

/// Decode URL-form encoded data into ordered key/value pairs.
#[cfg(feature = "form")]
pub(crate) fn form_pairs(raw: &[u8]) -> Result<Vec<(String, String)>, Error> {
    serde_urlencoded::from_bytes(raw).map_err(Error::Form)
}

#[cfg(not(feature = "form"))]
pub(crate) fn form_pairs(_raw: &[u8]) -> Result<Vec<(String, String)>, Error> {
    Err(Error::NoFormSupport)
}

/// Decode a JSON document into a generic tree value.
#[cfg(feature = "json")]
pub(crate) fn json_decode(raw: &[u8]) -> Result<serde_json::Value, Error> {
    serde_json::from_slice(raw).map_err(Error::Json)
}

/// Encode a value as JSON.
#[cfg(feature = "json")]
pub(crate) fn json_encode<T: serde::Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(value).map_err(Error::Json)
}
