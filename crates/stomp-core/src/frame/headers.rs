//! Ordered frame headers

use serde::Serialize;

/// Header carrying the destination of SUBSCRIBE, SEND and MESSAGE frames
pub const DESTINATION: &str = "destination";

/// Header carrying the body's media type
pub const CONTENT_TYPE: &str = "content-type";

/// Header carrying the protocol version on CONNECTED
pub const VERSION: &str = "version";

/// Header carrying a short summary on ERROR frames
pub const MESSAGE: &str = "message";

/// Ordered mapping of header names to values
///
/// Keys are unique: inserting an existing key replaces its value but keeps
/// its original position. Iteration follows insertion order, which is the
/// order headers are written on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Create an empty header set
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a header, replacing the value of an existing key
    ///
    /// Returns the previous value if the key was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        if let Some((_, existing)) = self.0.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }

        self.0.push((key, value));
        None
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up a header value
    ///
    /// An absent header is `None`; a present header with an empty value is `Some("")`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate headers in wire order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no headers
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}
