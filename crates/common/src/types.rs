use serde::{Deserialize, Serialize};

/// Business-facing order identifier.
///
/// Assigned once at creation and never reassigned. Wraps a string to keep
/// consignment IDs from being mixed up with merchant references or other
/// free-text fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsignmentId(String);

impl ConsignmentId {
    /// Wraps an existing consignment ID string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the consignment ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ConsignmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ConsignmentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConsignmentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ConsignmentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consignment_id_preserves_value() {
        let id = ConsignmentId::new("DA251018aB3xY9");
        assert_eq!(id.as_str(), "DA251018aB3xY9");
        assert_eq!(id.to_string(), "DA251018aB3xY9");
    }

    #[test]
    fn consignment_id_serializes_as_plain_string() {
        let id = ConsignmentId::from("DA251018aB3xY9");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"DA251018aB3xY9\"");
    }
}
