//! Anchor identifiers embedded in rendered markup

use serde::{Deserialize, Serialize};

/// Opaque identifier the remote service accepts as a mutation target.
///
/// Anchors come from the `id` attribute of rendered elements. They are stable
/// across reads of the same document version and unique within a document,
/// but a mutation may invalidate any of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(String);

impl AnchorId {
    /// Create an anchor from its raw string form
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the anchor, returning the raw string
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for AnchorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnchorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AnchorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for AnchorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_display_and_conversions() {
        let anchor = AnchorId::from("temp:C:abc123");
        assert_eq!(anchor.to_string(), "temp:C:abc123");
        assert_eq!(anchor.as_str(), "temp:C:abc123");
        assert_eq!(AnchorId::new(String::from("x")), AnchorId::from("x"));
        assert_eq!(AnchorId::from("y").into_string(), "y");
    }

    #[test]
    fn test_anchor_ordering_is_lexical() {
        let mut anchors = vec![AnchorId::from("b"), AnchorId::from("a")];
        anchors.sort();
        assert_eq!(anchors[0].as_str(), "a");
    }
}
