//! `application/x-www-form-urlencoded` pairs, shared by query strings and
//! form bodies.

use serde_json::{Map, Value};
use url::form_urlencoded;

use super::tree;

/// Decoded key/value pairs in arrival order.
#[derive(Debug, Clone, Default)]
pub(crate) struct FormPairs {
    pairs: Vec<(String, String)>,
}

impl FormPairs {
    pub(crate) fn parse(input: &[u8]) -> Self {
        Self {
            pairs: form_urlencoded::parse(input)
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
        }
    }

    /// Every value for `name`, including bracketed `name[]` keys.
    pub(crate) fn values<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        let plain = name.to_owned();
        let bracketed = format!("{name}[]");
        self.pairs
            .iter()
            .filter(move |(key, _)| *key == plain || *key == bracketed)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn first(&self, name: &str) -> Option<&str> {
        self.values(name).next()
    }

    /// The pairs as a nested tree.
    pub(crate) fn tree(&self) -> Map<String, Value> {
        tree::build(
            self.pairs
                .iter()
                .map(|(key, value)| (key.as_str(), Value::String(value.clone()))),
        )
    }
}
