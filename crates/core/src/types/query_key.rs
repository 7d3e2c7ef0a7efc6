//! Query keys identifying cached fetch results.

use serde::{Deserialize, Serialize};

/// Ordered sequence of strings identifying one cached fetch result.
///
/// Two keys are equal only when every segment matches in order, so
/// `["product", "1"]` and `["product"]` name different queries.
///
/// # Example
///
/// ```rust
/// # use shopfront_core::QueryKey;
/// let key = QueryKey::new(["product", "1"]);
/// assert_eq!(key.to_string(), "product:1");
/// assert_eq!(key.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Build a key from its segments.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Return a new key with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// The key's segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether `self` is `prefix` or one of its descendants.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(":"))
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for QueryKey {
    fn from(segments: [S; N]) -> Self {
        Self::new(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_matters() {
        assert_ne!(QueryKey::new(["a", "b"]), QueryKey::new(["b", "a"]));
        assert_eq!(QueryKey::new(["a", "b"]), QueryKey::from(["a", "b"]));
    }

    #[test]
    fn test_child_and_prefix() {
        let root = QueryKey::new(["product"]);
        let child = root.child("1");
        assert_eq!(child.segments(), ["product", "1"]);
        assert!(child.starts_with(&root));
        assert!(!root.starts_with(&child));
        assert_ne!(root, child);
    }

    #[test]
    fn test_display() {
        assert_eq!(QueryKey::new(["products", "10"]).to_string(), "products:10");
        assert_eq!(QueryKey::new(Vec::<String>::new()).to_string(), "");
    }
}
