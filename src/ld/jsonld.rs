//! Expanded JSON-LD import
//!
//! Loads documents in JSON-LD *expanded* form into the [`Store`]. Nested node
//! objects become resources of their own and are referenced from their
//! parent, which is exactly the shape the flattener walks. Node objects
//! without `@id` receive a fresh blank node identifier.
//!
//! ```ignore
//! let ids = jsonld::load(&mut store, &serde_json::json!([{
//!     "@id": "http://localhost:8000/item/100",
//!     "@type": ["http://www.w3.org/ns/oa#Annotation"],
//! }]))?;
//! ```

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

use super::intern::{Iri, BLANK_PREFIX};
use super::ns::xsd;
use super::store::{Resource, Store};
use super::term::{Literal, Term};
use crate::error::{AnnoError, Result};

/// Source of fresh blank node labels, shared by all loads so that labels
/// never collide between documents.
static BLANK_COUNTER: AtomicU64 = AtomicU64::new(0);

fn fresh_blank() -> Iri {
    let n = BLANK_COUNTER.fetch_add(1, Ordering::Relaxed);
    Iri::new(&format!("{BLANK_PREFIX}b{n}"))
}

/// Load an expanded JSON-LD document (a node object, an array of node
/// objects, or an object with `@graph`) into `store`. Returns the ids of the
/// top-level nodes in document order.
///
/// The whole document is parsed before anything is merged, so an error
/// leaves `store` and its queued events untouched.
pub fn load(store: &mut Store, document: &Value) -> Result<Vec<Iri>> {
    let (ids, resources) = parse(document)?;
    let merged = resources.len();
    for resource in resources {
        store.merge(resource);
    }
    trace!(count = ids.len(), merged, "loaded JSON-LD nodes");
    Ok(ids)
}

/// Parse `text` as JSON and [`load`] it.
pub fn load_str(store: &mut Store, text: &str) -> Result<Vec<Iri>> {
    let document: Value = serde_json::from_str(text)?;
    load(store, &document)
}

/// Parse a document into its top-level ids and every resource it describes,
/// nested nodes included, without touching a store.
fn parse(document: &Value) -> Result<(Vec<Iri>, Vec<Resource>)> {
    let nodes = top_level_nodes(document)?;
    let mut ids = Vec::with_capacity(nodes.len());
    let mut resources = Vec::new();
    for (index, node) in nodes.iter().enumerate() {
        let path = format!("$[{index}]");
        let object = node.as_object().ok_or_else(|| shape(&path, "node object", node))?;
        ids.push(parse_node(&mut resources, object, &path)?);
    }
    Ok((ids, resources))
}

fn top_level_nodes(document: &Value) -> Result<Vec<&Value>> {
    match document {
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(object) => {
            if object.contains_key("@context") {
                return Err(AnnoError::NotExpanded { path: "$".into() });
            }
            match object.get("@graph") {
                Some(Value::Array(items)) => Ok(items.iter().collect()),
                Some(other) => Err(shape("$.@graph", "array", other)),
                None => Ok(vec![document]),
            }
        }
        other => Err(shape("$", "object or array", other)),
    }
}

fn parse_node(resources: &mut Vec<Resource>, object: &Map<String, Value>, path: &str) -> Result<Iri> {
    if object.contains_key("@context") {
        return Err(AnnoError::NotExpanded { path: path.into() });
    }
    let id = match object.get("@id") {
        Some(Value::String(id)) => Iri::new(id),
        Some(other) => return Err(shape(&format!("{path}.@id"), "string", other)),
        None => fresh_blank(),
    };

    let mut resource = Resource::new(id);
    for (key, value) in object {
        let key_path = format!("{path}.{key}");
        match key.as_str() {
            "@id" => {}
            "@type" => {
                for class in string_list(value, &key_path)? {
                    resource = resource.with_type(class);
                }
            }
            k if k.starts_with('@') => {}
            property => {
                for term in property_values(resources, value, &key_path)? {
                    resource = resource.with(property, term);
                }
            }
        }
    }
    resources.push(resource);
    Ok(id)
}

fn string_list<'a>(value: &'a Value, path: &str) -> Result<Vec<&'a str>> {
    match value {
        Value::String(s) => Ok(vec![s]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| shape(path, "string", item)))
            .collect(),
        other => Err(shape(path, "string or array of strings", other)),
    }
}

fn property_values(resources: &mut Vec<Resource>, value: &Value, path: &str) -> Result<Vec<Term>> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    };
    let mut terms = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let item_path = format!("{path}[{index}]");
        match item {
            Value::Object(object) if object.contains_key("@value") => {
                terms.push(Term::Literal(value_object(object, &item_path)?));
            }
            Value::Object(object) if object.contains_key("@list") => {
                let list = object.get("@list").unwrap_or(&Value::Null);
                terms.extend(property_values(resources, list, &item_path)?);
            }
            Value::Object(object) => {
                let id = match (object.len(), object.get("@id")) {
                    (1, Some(Value::String(id))) => Iri::new(id),
                    _ => parse_node(resources, object, &item_path)?,
                };
                terms.push(Term::Node(id));
            }
            Value::Null => {}
            scalar => terms.push(Term::Literal(native_literal(scalar, &item_path)?)),
        }
    }
    Ok(terms)
}

fn native_literal(value: &Value, path: &str) -> Result<Literal> {
    match value {
        Value::String(s) => Ok(Literal::text(s.clone())),
        Value::Bool(b) => Ok(Literal::Boolean(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Ok(Literal::Integer(i)),
            None => Ok(Literal::Typed {
                value: n.to_string(),
                datatype: Iri::new("http://www.w3.org/2001/XMLSchema#double"),
            }),
        },
        other => Err(shape(path, "literal", other)),
    }
}

fn value_object(object: &Map<String, Value>, path: &str) -> Result<Literal> {
    let raw = object.get("@value").unwrap_or(&Value::Null);
    let language = object.get("@language").and_then(Value::as_str);
    let datatype = match object.get("@type") {
        Some(Value::String(t)) => Some(t.as_str()),
        Some(other) => return Err(shape(&format!("{path}.@type"), "string", other)),
        None => None,
    };

    match datatype {
        None => match (raw, language) {
            (Value::String(s), Some(lang)) => Ok(Literal::Text {
                value: s.clone(),
                language: Some(lang.to_string()),
            }),
            _ => native_literal(raw, path),
        },
        Some(xsd::STRING) => Ok(Literal::text(lexical(raw))),
        Some(xsd::INTEGER) | Some(xsd::NON_NEGATIVE_INTEGER) => {
            let text = lexical(raw);
            text.trim()
                .parse()
                .map(Literal::Integer)
                .map_err(|_| invalid(path, "integer", text))
        }
        Some(xsd::BOOLEAN) => match raw {
            Value::Bool(b) => Ok(Literal::Boolean(*b)),
            _ => {
                let text = lexical(raw);
                match text.as_str() {
                    "true" | "1" => Ok(Literal::Boolean(true)),
                    "false" | "0" => Ok(Literal::Boolean(false)),
                    _ => Err(invalid(path, "boolean", text)),
                }
            }
        },
        Some(xsd::DATE_TIME) => {
            let text = lexical(raw);
            parse_date_time(&text)
                .map(Literal::DateTime)
                .ok_or_else(|| invalid(path, "dateTime", text))
        }
        Some(other) => Ok(Literal::Typed {
            value: lexical(raw),
            datatype: Iri::new(other),
        }),
    }
}

/// RFC 3339, or ISO 8601 with a colon-less offset (`+0100`).
fn parse_date_time(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

fn lexical(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn shape(path: &str, expected: &'static str, found: &Value) -> AnnoError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    AnnoError::UnexpectedShape {
        path: path.to_string(),
        expected,
        found: found.to_string(),
    }
}

fn invalid(path: &str, datatype: &'static str, value: String) -> AnnoError {
    AnnoError::InvalidLiteral {
        path: path.to_string(),
        datatype,
        value,
    }
}
