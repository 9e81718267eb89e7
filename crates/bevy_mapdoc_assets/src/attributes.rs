//! Typed, fallback-chained attribute extraction.
//!
//! Map documents are a tolerant format: most attributes are optional, several
//! have alternate spellings (`o` / `object` / `obj`), and a value that fails to
//! parse is treated the same as a missing one. Every lookup here walks its key
//! list in order and reports whether the value came from the document or from
//! the default.

use std::str::FromStr;

use crate::document::Element;

/// A resolved attribute value plus whether the document supplied it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    /// `true` when one of the keys was present and parsed successfully.
    pub explicit: bool,
}

impl<T> Resolved<T> {
    pub fn explicit(value: T) -> Self {
        Self {
            value,
            explicit: true,
        }
    }

    pub fn defaulted(value: T) -> Self {
        Self {
            value,
            explicit: false,
        }
    }

    /// `Some(value)` only when the value was present in the document.
    pub fn into_explicit(self) -> Option<T> {
        self.explicit.then_some(self.value)
    }
}

/// Attribute lookups with fallback keys and defaults.
///
/// Implemented for [`Element`]; lookups never fail.
pub trait AttributeResolver {
    /// Raw string value of the first present key.
    fn first_attribute(&self, keys: &[&str]) -> Option<&str>;

    /// Parse the first key whose value is present and parses as `T`.
    ///
    /// Keys that are absent or fail to parse fall through to the next key.
    fn query<T: FromStr>(&self, keys: &[&str]) -> Option<T>;

    /// Like [`AttributeResolver::query`] but yields `default` when no key resolves.
    fn resolve<T: FromStr>(&self, keys: &[&str], default: T) -> Resolved<T> {
        match self.query(keys) {
            Some(value) => Resolved::explicit(value),
            None => Resolved::defaulted(default),
        }
    }

    /// Integer flag (`0` / non-zero), `false` when absent.
    fn flag(&self, key: &str) -> bool {
        self.query::<i64>(&[key]).is_some_and(|value| value != 0)
    }
}

impl AttributeResolver for Element {
    fn first_attribute(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.attribute(key))
    }

    fn query<T: FromStr>(&self, keys: &[&str]) -> Option<T> {
        keys.iter()
            .filter_map(|key| self.attribute(key))
            .find_map(|raw| raw.trim().parse().ok())
    }
}
