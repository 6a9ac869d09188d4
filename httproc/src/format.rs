//! `{name}` placeholder substitution for path templates.
//!
//! Tokens are `{` followed by one or more ASCII word characters
//! (`[A-Za-z0-9_]`) and `}`. A token whose key is missing from the value
//! source, or maps to null, is copied to the output unchanged. There is no
//! escape for literal braces.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::Value;

/// A keyed source of placeholder values.
pub trait ValueSource {
    /// String form of the value stored under `key`, or `None` when the key is
    /// absent or null.
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>>;
}

impl ValueSource for Value {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(Cow::Borrowed(s)),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

impl<S: BuildHasher> ValueSource for HashMap<String, String, S> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl ValueSource for BTreeMap<String, String> {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Borrowed(v.as_str()))
    }
}

impl<T: ValueSource + ?Sized> ValueSource for &T {
    fn lookup(&self, key: &str) -> Option<Cow<'_, str>> {
        (**self).lookup(key)
    }
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Replace every `{key}` token in `template` with its value from `vars`.
///
/// # Example
///
/// ```
/// use httproc::format::format;
///
/// let vars = serde_json::json!({ "id": 5 });
/// assert_eq!(format("/x/{id}", &vars), "/x/5");
/// assert_eq!(format("/x/{id}", &serde_json::json!({})), "/x/{id}");
/// ```
pub fn format<V: ValueSource + ?Sized>(template: &str, vars: &V) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let token = after
            .find('}')
            .map(|close| (&after[..close], &after[close + 1..]))
            .filter(|(key, _)| is_word(key));

        match token {
            Some((key, tail)) => {
                match vars.lookup(key) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = tail;
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
