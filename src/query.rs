//! Query-string helpers.
//!
//! Values are inserted verbatim: nothing here percent-encodes. Existing
//! consumers depend on that exact request shape, so callers that need
//! encoding must encode values before inserting them.

use std::fmt::Display;

/// Ordered key/value query parameters for a single call.
///
/// Keys keep their insertion order. Inserting an existing key replaces its
/// value without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pairs: Vec<(String, String)>,
}

impl RequestOptions {
    /// Create an empty set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) -> &mut Self {
        let key = key.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert only when `value` is present.
    #[must_use]
    pub fn with_opt<V: Display>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.insert(key, v);
        }
        self
    }

    /// Look up a parameter's value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for RequestOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (k, v) in iter {
            options.insert(k, v);
        }
        options
    }
}

/// Serialize options into `?k=v&k=v`.
///
/// Returns an empty string when `options` is absent or empty.
pub fn construct_options(options: Option<&RequestOptions>) -> String {
    let Some(options) = options.filter(|o| !o.is_empty()) else {
        return String::new();
    };

    let mut query = String::new();
    for (i, (key, value)) in options.iter().enumerate() {
        query.push(if i == 0 { '?' } else { '&' });
        query.push_str(key);
        query.push('=');
        query.push_str(value);
    }
    query
}

/// Join values with `,`. Returns `None` for an empty sequence.
pub fn construct_comma_list<I>(items: I) -> Option<String>
where
    I: IntoIterator,
    I::Item: Display,
{
    let parts: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(","))
    }
}
