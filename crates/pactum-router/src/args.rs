//! Raw path argument extraction and storage.
//!
//! This module provides efficient storage for raw (uncast) path arguments
//! using a small-vector optimization to avoid heap allocations for common
//! cases (1-4 arguments). Casting to declared types happens later, in the
//! pipeline's argument stage.

use smallvec::SmallVec;

/// Maximum number of arguments stored inline (stack allocated).
const INLINE_ARGS: usize = 4;

/// Raw path arguments extracted from a route match.
///
/// Arguments are stored as (name, value) pairs in path order, values still
/// in their raw string form.
///
/// # Example
///
/// ```rust
/// use pactum_router::RawArgs;
///
/// let mut args = RawArgs::new();
/// args.push("userId", "123");
///
/// assert_eq!(args.get("userId"), Some("123"));
/// assert_eq!(args.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawArgs {
    inner: SmallVec<[(String, String); INLINE_ARGS]>,
}

impl RawArgs {
    /// Creates a new empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument to the set.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the raw value for an argument by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the arguments.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_args_push_and_get() {
        let mut args = RawArgs::new();
        args.push("id", "123");
        args.push("slug", "intro");

        assert_eq!(args.get("id"), Some("123"));
        assert_eq!(args.get("slug"), Some("intro"));
        assert_eq!(args.get("unknown"), None);
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_raw_args_iter_preserves_order() {
        let mut args = RawArgs::new();
        args.push("a", "1");
        args.push("b", "2");

        let pairs: Vec<_> = args.iter().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_raw_args_spill_past_inline() {
        let mut args = RawArgs::new();
        for i in 0..10 {
            args.push(format!("key{i}"), format!("value{i}"));
        }
        assert_eq!(args.len(), 10);
        assert_eq!(args.get("key7"), Some("value7"));
    }
}
