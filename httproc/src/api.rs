//! API table entries.
//!
//! Each entry maps a call name to `"<METHOD> <path-pattern>"`, for example
//! `"GET /plus"` or `"post /items/{id}"`.

use http::Method;

use crate::ClientError;

/// Everything the adapter and wrapper know about one API entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInfo {
    name: String,
    method: Method,
    path_pattern: String,
}

impl CallInfo {
    pub fn new<N, P>(name: N, method: Method, path_pattern: P) -> Self
    where
        N: Into<String>,
        P: Into<String>,
    {
        Self {
            name: name.into(),
            method,
            path_pattern: path_pattern.into(),
        }
    }

    /// Parse an API table entry.
    ///
    /// The entry must start with ASCII letters (the method, upper-cased here),
    /// then whitespace, then a path pattern without whitespace. Anything after
    /// the path pattern is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MalformedApiEntry`] if the entry does not match.
    pub fn parse(name: &str, entry: &str) -> Result<Self, ClientError> {
        let malformed = || ClientError::MalformedApiEntry {
            name: name.to_string(),
            entry: entry.to_string(),
        };

        let method_len = entry
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(entry.len());
        let (method, rest) = entry.split_at(method_len);

        let path = rest.trim_start();
        if method.is_empty() || path.len() == rest.len() {
            return Err(malformed());
        }

        let path = path.split(char::is_whitespace).next().unwrap_or_default();
        if path.is_empty() {
            return Err(malformed());
        }

        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| malformed())?;

        Ok(Self::new(name, method, path))
    }

    /// The call name this entry is exposed under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The upper-cased HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The path with `{placeholder}` tokens.
    pub fn path_pattern(&self) -> &str {
        &self.path_pattern
    }
}
