//! IRI Interner
//!
//! Every resource identifier and property name that passes through the
//! store is interned once in a global `lasso` rodeo. The resulting `Iri`
//! handle is `Copy`, hashes as a single integer and compares in O(1), which
//! keeps subscription tables and segment sets cheap.

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// Global interner instance
static INTERNER: OnceLock<ThreadedRodeo> = OnceLock::new();

/// Get the global interner, initializing it if necessary
fn interner() -> &'static ThreadedRodeo {
    INTERNER.get_or_init(ThreadedRodeo::default)
}

/// Prefix that marks a blank node identifier.
pub const BLANK_PREFIX: &str = "_:";

/// Interned identifier of a linked-data resource or property.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Iri(Spur);

impl Iri {
    /// Intern `s`, returning the existing handle if it was seen before.
    pub fn new(s: &str) -> Self {
        Iri(interner().get_or_intern(s))
    }

    /// Look up an already interned string without interning it.
    pub fn existing(s: &str) -> Option<Self> {
        interner().get(s).map(Iri)
    }

    /// Resolve back to the original string. The interner keeps strings
    /// alive forever, hence the static lifetime.
    pub fn as_str(&self) -> &'static str {
        interner().resolve(&self.0)
    }

    /// Blank nodes have no global identity (`_:b0`).
    pub fn is_blank(&self) -> bool {
        self.as_str().starts_with(BLANK_PREFIX)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        !prefix.is_empty() && self.as_str().starts_with(prefix)
    }

    /// Last path or fragment segment of the identifier.
    pub fn local_name(&self) -> &'static str {
        let id = self.as_str();
        let index = id.rfind('#').or_else(|| id.rfind('/'));
        match index {
            Some(i) => &id[i + 1..],
            None => id,
        }
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Iri::new(s)
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Iri::new(&s)
    }
}

impl fmt::Debug for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.as_str())
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Iri {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Iri {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Iri::new(&s))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_roundtrip() {
        let input = "http://example.org/item/1";
        let iri = Iri::new(input);
        assert_eq!(iri.as_str(), input, "Resolved string should match original");
    }

    #[test]
    fn test_intern_dedup() {
        let a = Iri::new("http://example.org/dedup");
        let b = Iri::from(String::from("http://example.org/dedup"));
        assert_eq!(a, b, "Identical strings should produce identical handles");
        assert_eq!(a.as_str().as_ptr(), b.as_str().as_ptr());
    }

    #[test]
    fn test_existing_does_not_intern() {
        let s = "http://example.org/never-interned-before";
        assert!(Iri::existing(s).is_none());
        let iri = Iri::new(s);
        assert_eq!(Iri::existing(s), Some(iri));
    }

    #[test]
    fn test_blank_and_local_name() {
        assert!(Iri::new("_:b12").is_blank());
        assert!(!Iri::new("http://example.org/x").is_blank());
        assert_eq!(Iri::new("http://example.org/ontology#Reader").local_name(), "Reader");
        assert_eq!(Iri::new("http://example.org/item/100").local_name(), "100");
        assert_eq!(Iri::new("_:b0").local_name(), "_:b0");
    }

    #[test]
    fn test_empty_prefix_never_matches() {
        assert!(!Iri::new("http://example.org/x").starts_with(""));
    }
}
