//! Resource roles
//!
//! The type of the underlying resource decides, once, which branch of the
//! dependency graph a flat item walks and which completion bits it can
//! assume up front because the corresponding fields will never arrive.

use serde::Serialize;

use super::field::{CompletionFlags, Field};
use crate::ld::ns::{oa, owl, rdf, rdfs};
use crate::ld::{Namespaces, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceRole {
    Annotation,
    Target,
    PositionSelector,
    QuoteSelector,
    OntologyClassOrProperty,
    BareItem,
}

const CLASS_TYPES: [&str; 5] = [
    owl::CLASS,
    rdfs::CLASS,
    rdf::PROPERTY,
    owl::OBJECT_PROPERTY,
    owl::DATATYPE_PROPERTY,
];

impl ResourceRole {
    /// Decide the role of `resource`. `None` while its type is unknown.
    pub fn classify(resource: &Resource, namespaces: &Namespaces) -> Option<Self> {
        if resource.types().next().is_none() {
            return None;
        }
        let role = if resource.has_type(oa::ANNOTATION) {
            ResourceRole::Annotation
        } else if resource.has_type(oa::SPECIFIC_RESOURCE) {
            ResourceRole::Target
        } else if resource.has_type(oa::TEXT_POSITION_SELECTOR) {
            ResourceRole::PositionSelector
        } else if resource.has_type(oa::TEXT_QUOTE_SELECTOR) {
            ResourceRole::QuoteSelector
        } else if CLASS_TYPES.iter().any(|t| resource.has_type(*t))
            || namespaces.is_ontology(resource.id())
            || namespaces.is_nlp(resource.id())
        {
            ResourceRole::OntologyClassOrProperty
        } else {
            ResourceRole::BareItem
        };
        Some(role)
    }

    /// Bits that are fulfilled by assumption when this role is taken.
    pub fn assumed(self) -> CompletionFlags {
        let all = CompletionFlags::all();
        match self {
            ResourceRole::Annotation => CompletionFlags::CSS_CLASS | CompletionFlags::LABEL,
            ResourceRole::Target => all - CompletionFlags::TARGET,
            ResourceRole::PositionSelector => all - CompletionFlags::POSITION,
            ResourceRole::QuoteSelector => all - CompletionFlags::TEXT,
            ResourceRole::OntologyClassOrProperty => all - CompletionFlags::CSS_CLASS,
            ResourceRole::BareItem => CompletionFlags::TARGET,
        }
    }

    /// Field that receives the underlying resource itself.
    pub fn field(self) -> Field {
        match self {
            ResourceRole::Annotation => Field::Annotation,
            ResourceRole::Target => Field::Target,
            ResourceRole::PositionSelector => Field::PositionSelector,
            ResourceRole::QuoteSelector => Field::QuoteSelector,
            ResourceRole::OntologyClassOrProperty => Field::Class,
            ResourceRole::BareItem => Field::Item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_waits_for_type() {
        let ns = Namespaces::default();
        let untyped = Resource::new("http://example.org/role/untyped");
        assert_eq!(ResourceRole::classify(&untyped, &ns), None);
    }

    #[test]
    fn test_classify_by_type_and_namespace() {
        let ns = Namespaces::default();
        let cases = [
            (Resource::new("http://example.org/role/a").with_type(oa::ANNOTATION), ResourceRole::Annotation),
            (Resource::new("http://example.org/role/t").with_type(oa::SPECIFIC_RESOURCE), ResourceRole::Target),
            (Resource::new("_:role-sel").with_type(oa::TEXT_QUOTE_SELECTOR), ResourceRole::QuoteSelector),
            (Resource::new("http://example.org/role/p").with_type(owl::OBJECT_PROPERTY), ResourceRole::OntologyClassOrProperty),
            (Resource::new(ns.nlp("time")).with_type("http://example.org/Anything"), ResourceRole::OntologyClassOrProperty),
            (Resource::new(ns.item("7")).with_type(ns.ontology("Reader")), ResourceRole::BareItem),
        ];
        for (resource, expected) in cases {
            assert_eq!(ResourceRole::classify(&resource, &ns), Some(expected), "{:?}", resource.id());
        }
    }

    #[test]
    fn test_own_field_is_never_assumed() {
        let roles = [
            ResourceRole::Target,
            ResourceRole::PositionSelector,
            ResourceRole::QuoteSelector,
            ResourceRole::OntologyClassOrProperty,
        ];
        for role in roles {
            assert!(!role.assumed().is_all(), "{role:?} would complete without data");
        }
    }
}
