//! Labels and css class names of linked-data resources

use regex::Regex;
use std::sync::OnceLock;

use crate::config::AnnoConfig;
use crate::ld::ns::{dcterms, rdfs, skos};
use crate::ld::{Iri, Literal, Namespaces, Store, Term};

static NORMALIZE: OnceLock<Regex> = OnceLock::new();

/// Characters dropped from a label before it becomes part of a css name.
fn normalize_pattern() -> &'static Regex {
    NORMALIZE.get_or_init(|| Regex::new(r"[ ()/]").expect("static pattern"))
}

/// Human readable label of `id`: the first of `skos:prefLabel`,
/// `rdfs:label`, `skos:altLabel`, `<ontology>name`, `dcterms:title`, or the
/// local name of the identifier when none is present. Within a property,
/// a text in one of `languages` (in order of preference) wins over the
/// first text.
pub fn get_label(store: &Store, namespaces: &Namespaces, languages: &[String], id: Iri) -> String {
    let keys = [
        Iri::new(skos::PREF_LABEL),
        Iri::new(rdfs::LABEL),
        Iri::new(skos::ALT_LABEL),
        namespaces.ontology("name"),
        Iri::new(dcterms::TITLE),
    ];
    keys.iter()
        .find_map(|key| {
            let texts: Vec<&Literal> = store
                .get(id, *key)
                .iter()
                .filter_map(Term::as_literal)
                .filter(|literal| literal.as_text().is_some())
                .collect();
            languages
                .iter()
                .find_map(|wanted| {
                    texts.iter().find(|literal| {
                        literal
                            .language()
                            .is_some_and(|language| language.eq_ignore_ascii_case(wanted))
                    })
                })
                .or_else(|| texts.first())
                .copied()
                .and_then(Literal::as_text)
        })
        .map(str::to_string)
        .unwrap_or_else(|| id.local_name().to_string())
}

/// Css class name for a class with the given label: `is-nlp-<label>` inside
/// the NLP namespace, `is-<css_prefix>-<label>` elsewhere. `None` when the
/// normalized label is empty.
pub fn css_class_name(
    id: Iri,
    label: &str,
    namespaces: &Namespaces,
    config: &AnnoConfig,
) -> Option<String> {
    let normalized = normalize_pattern().replace_all(label, "").to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    if namespaces.is_nlp(id) {
        Some(format!("is-nlp-{normalized}"))
    } else {
        Some(format!("is-{}-{normalized}", config.css_prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ld::Resource;

    #[test]
    fn test_label_priority() {
        let ns = Namespaces::default();
        let mut store = Store::new();
        let id = Iri::new("http://example.org/labels/a");
        store.merge(
            Resource::new(id)
                .with(skos::ALT_LABEL, "altLabel")
                .with(skos::PREF_LABEL, "prefLabel"),
        );
        assert_eq!(get_label(&store, &ns, &[], id), "prefLabel");
    }

    #[test]
    fn test_label_prefers_configured_languages() {
        let ns = Namespaces::default();
        let mut store = Store::new();
        let id = Iri::new("http://example.org/labels/tagged");
        store.merge(
            Resource::new(id)
                .with(skos::PREF_LABEL, Literal::tagged("Lezer", "nl"))
                .with(skos::PREF_LABEL, Literal::tagged("Reader", "en"))
                .with(rdfs::LABEL, Literal::tagged("Leser", "de")),
        );
        let english = vec!["en".to_string()];
        assert_eq!(get_label(&store, &ns, &english, id), "Reader");
        let dutch = vec!["nl-BE".to_string(), "NL".to_string()];
        assert_eq!(get_label(&store, &ns, &dutch, id), "Lezer");

        // No preferred language: first text of the first label property.
        let german = vec!["de".to_string()];
        assert_eq!(get_label(&store, &ns, &german, id), "Lezer");
    }

    #[test]
    fn test_label_falls_back_to_local_name() {
        let ns = Namespaces::default();
        let store = Store::new();
        assert_eq!(get_label(&store, &ns, &[], ns.ontology("Reader")), "Reader");
    }

    #[test]
    fn test_css_class_name() {
        let ns = Namespaces::default();
        let config = AnnoConfig::default();
        let class = ns.ontology("Capitalized");
        assert_eq!(
            css_class_name(class, "A Capitalized (Label)/With Spaces", &ns, &config).as_deref(),
            Some("is-readit-acapitalizedlabelwithspaces")
        );
        assert_eq!(
            css_class_name(ns.nlp("time"), "Time", &ns, &config).as_deref(),
            Some("is-nlp-time")
        );
        assert_eq!(css_class_name(class, " ( ) ", &ns, &config), None);
    }
}
