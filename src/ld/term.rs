//! Property values: node references and literals

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::intern::Iri;

/// A literal value as it appears in expanded JSON-LD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Literal {
    /// Plain or language-tagged string
    Text {
        value: String,
        language: Option<String>,
    },
    Integer(i64),
    Boolean(bool),
    DateTime(DateTime<FixedOffset>),
    /// Any other datatype, kept lexically
    Typed { value: String, datatype: Iri },
}

impl Literal {
    pub fn text(value: impl Into<String>) -> Self {
        Literal::Text {
            value: value.into(),
            language: None,
        }
    }

    /// Language-tagged string.
    pub fn tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Literal::Text {
            value: value.into(),
            language: Some(language.into()),
        }
    }

    pub fn language(&self) -> Option<&str> {
        match self {
            Literal::Text { language, .. } => language.as_deref(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Literal::Text { value, .. } => Some(value),
            Literal::Typed { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Integers, including lexical forms of integer-like typed literals.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Literal::Integer(n) => Some(*n),
            Literal::Text { value, .. } | Literal::Typed { value, .. } => value.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Boolean(b) => Some(*b),
            Literal::Typed { value, .. } => match value.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            Literal::DateTime(d) => Some(*d),
            _ => None,
        }
    }
}

/// One value of a resource property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Term {
    Node(Iri),
    Literal(Literal),
}

impl Term {
    pub fn node(iri: impl Into<Iri>) -> Self {
        Term::Node(iri.into())
    }

    pub fn as_node(&self) -> Option<Iri> {
        match self {
            Term::Node(iri) => Some(*iri),
            Term::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Node(_) => None,
            Term::Literal(literal) => Some(literal),
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Node(iri)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

impl From<i64> for Term {
    fn from(n: i64) -> Self {
        Term::Literal(Literal::Integer(n))
    }
}

impl From<bool> for Term {
    fn from(b: bool) -> Self {
        Term::Literal(Literal::Boolean(b))
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::Literal(Literal::text(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_coercion() {
        assert_eq!(Literal::Integer(15).as_integer(), Some(15));
        assert_eq!(Literal::text(" 34 ").as_integer(), Some(34));
        assert_eq!(Literal::text("abc").as_integer(), None);
        assert_eq!(Literal::Boolean(true).as_integer(), None);
    }

    #[test]
    fn test_term_accessors() {
        let node = Term::node("http://example.org/a");
        assert_eq!(node.as_node(), Some(Iri::new("http://example.org/a")));
        assert!(node.as_literal().is_none());
        let lit = Term::from("hello");
        assert_eq!(lit.as_literal().and_then(Literal::as_text), Some("hello"));
    }
}
