//! Linked-data layer
//!
//! The minimal data layer the flattening core reads from:
//! - `intern.rs` - Interned `Iri` handles (lasso)
//! - `ns.rs` - Vocabularies and configurable application namespaces
//! - `term.rs` - Literals and property values
//! - `store.rs` - Resources with change notifications
//! - `graph.rs` - Ordered resource collections with membership notifications
//! - `jsonld.rs` - Expanded JSON-LD import

pub mod intern;
pub mod ns;
pub mod term;
pub mod store;
pub mod graph;
pub mod jsonld;

pub use intern::Iri;
pub use ns::Namespaces;
pub use term::{Literal, Term};
pub use store::{Resource, Store, StoreEvent};
pub use graph::{Graph, GraphEvent};
