//! Vocabularies
//!
//! Standard vocabularies are hardcoded as string constants. Only the terms
//! this crate reads are listed; keep each block in alphabetical order.
//! Application namespaces (ontology, items, NLP ontology, ...) hang off a
//! configurable root and live in [`Namespaces`].

use serde::{Deserialize, Serialize};

use super::intern::Iri;

/// Pseudo-property under which a resource's types are stored.
pub const TYPE: &str = "@type";

/// RDF Schema 1.1 (rdf namespace)
pub mod rdf {
    pub const PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
}

/// RDF Schema 1.1 (rdfs namespace)
pub mod rdfs {
    pub const CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

/// XML Schema datatypes
pub mod xsd {
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const NON_NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
}

/// OWL 2
pub mod owl {
    pub const CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    pub const DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    pub const OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
}

/// SKOS
pub mod skos {
    pub const ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    pub const RELATED: &str = "http://www.w3.org/2004/02/skos/core#related";
}

/// Web Annotation Vocabulary
pub mod oa {
    pub const ANNOTATION: &str = "http://www.w3.org/ns/oa#Annotation";
    pub const END: &str = "http://www.w3.org/ns/oa#end";
    pub const EXACT: &str = "http://www.w3.org/ns/oa#exact";
    pub const HAS_BODY: &str = "http://www.w3.org/ns/oa#hasBody";
    pub const HAS_SELECTOR: &str = "http://www.w3.org/ns/oa#hasSelector";
    pub const HAS_SOURCE: &str = "http://www.w3.org/ns/oa#hasSource";
    pub const HAS_TARGET: &str = "http://www.w3.org/ns/oa#hasTarget";
    pub const PREFIX: &str = "http://www.w3.org/ns/oa#prefix";
    pub const SPECIFIC_RESOURCE: &str = "http://www.w3.org/ns/oa#SpecificResource";
    pub const START: &str = "http://www.w3.org/ns/oa#start";
    pub const SUFFIX: &str = "http://www.w3.org/ns/oa#suffix";
    pub const TEXT_POSITION_SELECTOR: &str = "http://www.w3.org/ns/oa#TextPositionSelector";
    pub const TEXT_QUOTE_SELECTOR: &str = "http://www.w3.org/ns/oa#TextQuoteSelector";
}

/// DCMI Metadata Terms
pub mod dcterms {
    pub const CREATED: &str = "http://purl.org/dc/terms/created";
    pub const CREATOR: &str = "http://purl.org/dc/terms/creator";
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
}

/// Default root of the application namespaces.
pub const DEFAULT_ROOT: &str = "http://localhost:8000/";

/// Application namespaces derived from a single root IRI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespaces {
    /// Ontology classes and properties (`<root>ontology#`)
    pub ontology: String,
    /// Annotation items and bodies (`<root>item/`)
    pub item: String,
    /// Classes produced by NLP pre-annotation (`<root>nlp-ontology#`)
    pub nlp: String,
    /// Application specific terms (`<root>vocab#`)
    pub vocab: String,
    /// Users (`<root>staff#`)
    pub staff: String,
    /// Source texts (`<root>source/`)
    pub source: String,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::from_root(DEFAULT_ROOT)
    }
}

impl Namespaces {
    pub fn from_root(root: &str) -> Self {
        Self {
            ontology: format!("{root}ontology#"),
            item: format!("{root}item/"),
            nlp: format!("{root}nlp-ontology#"),
            vocab: format!("{root}vocab#"),
            staff: format!("{root}staff#"),
            source: format!("{root}source/"),
        }
    }

    /// `<ontology>term`
    pub fn ontology(&self, term: &str) -> Iri {
        Iri::new(&format!("{}{term}", self.ontology))
    }

    /// `<item>serial`
    pub fn item(&self, serial: &str) -> Iri {
        Iri::new(&format!("{}{serial}", self.item))
    }

    /// `<nlp>term`
    pub fn nlp(&self, term: &str) -> Iri {
        Iri::new(&format!("{}{term}", self.nlp))
    }

    /// `<vocab>term`
    pub fn vocab(&self, term: &str) -> Iri {
        Iri::new(&format!("{}{term}", self.vocab))
    }

    /// `<staff>name`
    pub fn staff(&self, name: &str) -> Iri {
        Iri::new(&format!("{}{name}", self.staff))
    }

    /// `<source>serial`
    pub fn source(&self, serial: &str) -> Iri {
        Iri::new(&format!("{}{serial}", self.source))
    }

    /// Property that flags an annotation for review.
    pub fn needs_verification(&self) -> Iri {
        self.vocab("needsVerification")
    }

    pub fn is_ontology(&self, iri: Iri) -> bool {
        iri.starts_with(&self.ontology)
    }

    pub fn is_item(&self, iri: Iri) -> bool {
        iri.starts_with(&self.item)
    }

    pub fn is_nlp(&self, iri: Iri) -> bool {
        iri.starts_with(&self.nlp)
    }
}
