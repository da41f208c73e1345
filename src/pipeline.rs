//! AnnotationPipeline: store, graph, annotation index and segment index
//!
//! Data enters through [`AnnotationPipeline::load_jsonld`] or direct store
//! and graph mutation. Nothing reacts until [`AnnotationPipeline::pump`],
//! which delivers queued graph events, then queued store events, applies the
//! deferred sort and finally lets the segment index follow the collection.

use serde_json::Value;
use tracing::{debug, trace};

use crate::config::AnnoConfig;
use crate::error::Result;
use crate::flat::{ClassResolver, CollectionEvent, DirectClassResolver, FlatContext, FlatItemCollection};
use crate::ld::{jsonld, Graph, Iri, Namespaces, Store};
use crate::segment::{SegmentEvent, SegmentIndex};

/// Downstream notification of one pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    Collection(CollectionEvent),
    Segment(SegmentEvent),
}

pub struct AnnotationPipeline {
    config: AnnoConfig,
    namespaces: Namespaces,
    current_user: Option<Iri>,
    resolver: Box<dyn ClassResolver>,
    store: Store,
    graph: Graph,
    annotations: FlatItemCollection,
    segments: SegmentIndex,
}

impl AnnotationPipeline {
    pub fn new(config: AnnoConfig, current_user: Option<Iri>) -> Self {
        Self {
            namespaces: config.namespaces(),
            config,
            current_user,
            resolver: Box::new(DirectClassResolver),
            store: Store::new(),
            graph: Graph::new(),
            annotations: FlatItemCollection::annotations(),
            segments: SegmentIndex::new(),
        }
    }

    /// Replace the class resolver used for items without annotation.
    pub fn with_resolver(mut self, resolver: impl ClassResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn config(&self) -> &AnnoConfig {
        &self.config
    }

    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    pub fn current_user(&self) -> Option<Iri> {
        self.current_user
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn annotations(&self) -> &FlatItemCollection {
        &self.annotations
    }

    pub fn segments(&self) -> &SegmentIndex {
        &self.segments
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Import an expanded JSON-LD document and add its top-level nodes to
    /// the graph. Nodes that turn out not to be annotations are filtered by
    /// the annotation index. A document that fails to import changes nothing.
    pub fn load_jsonld(&mut self, document: &Value) -> Result<Vec<Iri>> {
        let ids = jsonld::load(&mut self.store, document)?;
        Ok(self.admit(ids))
    }

    /// Like [`Self::load_jsonld`], from JSON text.
    pub fn load_str(&mut self, text: &str) -> Result<Vec<Iri>> {
        let ids = jsonld::load_str(&mut self.store, text)?;
        Ok(self.admit(ids))
    }

    fn admit(&mut self, ids: Vec<Iri>) -> Vec<Iri> {
        let added = self.graph.add_all(ids.iter().copied());
        debug!(nodes = ids.len(), added, "document loaded");
        ids
    }

    pub fn remove(&mut self, id: Iri) -> bool {
        self.graph.remove(id)
    }

    /// Replace the graph membership.
    pub fn reset(&mut self, ids: impl IntoIterator<Item = Iri>) {
        self.graph.reset(ids);
    }

    // =========================================================================
    // Propagation
    // =========================================================================

    /// Deliver everything queued since the last pump.
    pub fn pump(&mut self) -> Vec<PipelineEvent> {
        let graph_events = self.graph.drain_events();
        let store_events = self.store.drain_events();
        let ctx = FlatContext::new(
            &self.store,
            &self.namespaces,
            &self.config,
            &self.current_user,
            self.resolver.as_ref(),
        );

        let mut collection_events = Vec::new();
        for event in &graph_events {
            self.annotations
                .handle_graph_event(event, &self.graph, &ctx, &mut collection_events);
        }
        for event in &store_events {
            self.annotations
                .handle_store_event(event, &ctx, &mut collection_events);
        }
        self.annotations.flush(&mut collection_events);

        let mut out = Vec::with_capacity(collection_events.len());
        let mut segment_events = Vec::new();
        for event in collection_events {
            out.push(PipelineEvent::Collection(event));
            self.segments
                .handle(&event, &self.annotations, &mut segment_events);
            out.extend(segment_events.drain(..).map(PipelineEvent::Segment));
        }
        trace!(
            graph = graph_events.len(),
            store = store_events.len(),
            out = out.len(),
            "pumped"
        );
        out
    }

    // =========================================================================
    // Focus
    // =========================================================================

    pub fn focus(&mut self, id: Iri) -> Vec<PipelineEvent> {
        let mut events = Vec::new();
        self.annotations.focus(id, &mut events);
        events.into_iter().map(PipelineEvent::Collection).collect()
    }

    pub fn blur(&mut self, id: Iri) -> Vec<PipelineEvent> {
        let mut events = Vec::new();
        self.annotations.blur(id, &mut events);
        events.into_iter().map(PipelineEvent::Collection).collect()
    }
}
