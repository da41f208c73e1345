//! AnnoCore: Linked-Data Annotation Flattener + Text Segment Index
//!
//! A Rust/WASM implementation of the annotation core of a text highlighting
//! application: linked-data annotations are flattened into observable view
//! models and partitioned into highlight segments.
//!
//! # Architecture
//!
//! ## Data Layer
//! - `ld/` - Interned IRIs, vocabularies, resource store, graphs, JSON-LD import
//! - `config.rs` - Namespace root, css/category prefixes, label languages
//! - `error.rs` - Import and configuration errors
//!
//! ## Flattening
//! - `flat/item.rs` - FlatItem: bitmask completion tracking over a resource graph
//! - `flat/collection.rs` - FlatItemCollection: flat items mirrored from a graph,
//!   aggregate completion, focus; restricted to annotations in the typed variant
//!
//! ## Segmentation
//! - `segment/index.rs` - SegmentIndex: incremental partition of the text by
//!   annotation coverage
//!
//! ## Glue
//! - `pipeline.rs` - AnnotationPipeline: store -> annotations -> segments
//! - `wasm.rs` - AnnotationWorkspace: JS bindings
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { AnnotationWorkspace } from 'annocore';
//!
//! await init();
//!
//! const workspace = new AnnotationWorkspace(null, 'http://localhost:8000/staff/alice');
//! workspace.load(JSON.stringify(expandedJsonLd));
//!
//! // Propagate: annotation events first, then segment events
//! const events = workspace.pump();
//!
//! console.log(workspace.isComplete());   // every annotation has its data
//! console.log(workspace.segments());     // [{ start, end, annotations }]
//! console.log(workspace.flatItem(id));   // { id, role, complete, fields, filterClasses }
//! ```

pub mod config;
pub mod error;
pub mod ld;
pub mod flat;
pub mod segment;
pub mod pipeline;
pub mod wasm;

// Public exports
pub use config::AnnoConfig;
pub use error::{AnnoError, Result};
pub use flat::{
    Admission, ClassResolver, CollectionEvent, CompletionFlags, DirectClassResolver, Field,
    FlatContext, FlatEvent, FlatItem, FlatItemCollection, FlatValue, IdentityProvider,
    ResourceRole,
};
pub use ld::{Graph, GraphEvent, Iri, Namespaces, Resource, Store, StoreEvent, Term};
pub use pipeline::{AnnotationPipeline, PipelineEvent};
pub use segment::{Bound, Segment, SegmentEvent, SegmentIndex};
pub use wasm::AnnotationWorkspace;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("annocore v{}", env!("CARGO_PKG_VERSION"))
}
