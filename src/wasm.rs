//! JS bindings for the annotation pipeline
//!
//! Identifiers cross the boundary as strings. Events, segments and flat items
//! are returned as plain JS objects.

use serde::Serialize;
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

use crate::config::AnnoConfig;
use crate::flat::{CollectionEvent, FlatItem, FlatValue, ResourceRole};
use crate::ld::Iri;
use crate::pipeline::{AnnotationPipeline, PipelineEvent};
use crate::segment::{Segment, SegmentEvent};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventView {
    layer: &'static str,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Iri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
}

impl EventView {
    fn new(layer: &'static str, kind: &'static str) -> Self {
        Self {
            layer,
            kind,
            id: None,
            field: None,
            index: None,
            count: None,
        }
    }

    fn with_id(mut self, id: Iri) -> Self {
        self.id = Some(id);
        self
    }
}

impl From<PipelineEvent> for EventView {
    fn from(event: PipelineEvent) -> Self {
        match event {
            PipelineEvent::Collection(event) => {
                let view = |kind| EventView::new("annotations", kind);
                match event {
                    CollectionEvent::Add(id) => view("add").with_id(id),
                    CollectionEvent::Remove(id) => view("remove").with_id(id),
                    CollectionEvent::Reset => view("reset"),
                    CollectionEvent::Sort => view("sort"),
                    CollectionEvent::Changed { id, field } => EventView {
                        field: Some(field.as_str()),
                        ..view("change").with_id(id)
                    },
                    CollectionEvent::Complete(id) => view("complete").with_id(id),
                    CollectionEvent::AllComplete { count } => EventView {
                        count: Some(count),
                        ..view("allComplete")
                    },
                    CollectionEvent::Focus(id) => view("focus").with_id(id),
                    CollectionEvent::Blur(id) => view("blur").with_id(id),
                }
            }
            PipelineEvent::Segment(event) => {
                let view = |kind, index| EventView {
                    index,
                    ..EventView::new("segments", kind)
                };
                match event {
                    SegmentEvent::Add { index } => view("add", Some(index)),
                    SegmentEvent::Change { index } => view("change", Some(index)),
                    SegmentEvent::Reset => view("reset", None),
                }
            }
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SegmentView {
    start: u64,
    /// `None` for the last, unbounded segment.
    end: Option<u64>,
    annotations: Vec<Iri>,
}

impl From<&Segment> for SegmentView {
    fn from(segment: &Segment) -> Self {
        Self {
            start: segment.start,
            end: segment.end.position(),
            annotations: segment.annotations.iter().copied().collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlatItemView<'a> {
    id: Iri,
    role: Option<ResourceRole>,
    complete: bool,
    fields: BTreeMap<&'static str, &'a FlatValue>,
    filter_classes: Vec<String>,
}

impl<'a> From<&'a FlatItem> for FlatItemView<'a> {
    fn from(item: &'a FlatItem) -> Self {
        Self {
            id: item.underlying(),
            role: item.role(),
            complete: item.is_complete(),
            fields: item.fields().map(|(field, value)| (field.as_str(), value)).collect(),
            filter_classes: item.filter_classes().to_vec(),
        }
    }
}

/// Serialize `value` as plain JS objects, logging failures to the console.
fn to_js<T: Serialize>(value: &T, what: &str) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    match value.serialize(&serializer) {
        Ok(v) => v,
        Err(e) => {
            web_sys::console::error_1(&format!("[AnnotationWorkspace] Serializing {} failed: {:?}", what, e).into());
            JsValue::NULL
        }
    }
}

fn events_to_js(events: Vec<PipelineEvent>) -> JsValue {
    let views: Vec<EventView> = events.into_iter().map(EventView::from).collect();
    to_js(&views, "events")
}

#[wasm_bindgen]
pub struct AnnotationWorkspace {
    inner: AnnotationPipeline,
}

#[wasm_bindgen]
impl AnnotationWorkspace {
    /// `config` is an optional JSON object (`namespaceRoot`, `cssPrefix`,
    /// `categoryPrefix`, `languages`); `current_user` the IRI of the
    /// signed-in user.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>, current_user: Option<String>) -> Result<AnnotationWorkspace, JsValue> {
        let config = match config {
            Some(text) => AnnoConfig::from_json(&text).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => AnnoConfig::default(),
        };
        let user = current_user.as_deref().map(Iri::new);
        Ok(AnnotationWorkspace {
            inner: AnnotationPipeline::new(config, user),
        })
    }

    /// Load an expanded JSON-LD document. Returns the top-level ids.
    #[wasm_bindgen]
    pub fn load(&mut self, jsonld: &str) -> Result<js_sys::Array, JsValue> {
        let ids = self
            .inner
            .load_str(jsonld)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(ids.into_iter().map(|id| JsValue::from_str(id.as_str())).collect())
    }

    #[wasm_bindgen]
    pub fn remove(&mut self, id: &str) -> bool {
        self.inner.remove(Iri::new(id))
    }

    /// Drop every member.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.inner.reset(std::iter::empty());
    }

    /// Propagate queued changes and return the resulting events.
    #[wasm_bindgen]
    pub fn pump(&mut self) -> JsValue {
        let events = self.inner.pump();
        events_to_js(events)
    }

    #[wasm_bindgen]
    pub fn focus(&mut self, id: &str) -> JsValue {
        events_to_js(self.inner.focus(Iri::new(id)))
    }

    #[wasm_bindgen]
    pub fn blur(&mut self, id: &str) -> JsValue {
        events_to_js(self.inner.blur(Iri::new(id)))
    }

    #[wasm_bindgen]
    pub fn segments(&self) -> JsValue {
        let views: Vec<SegmentView> = self.inner.segments().iter().map(SegmentView::from).collect();
        to_js(&views, "segments")
    }

    /// Flat view of a member annotation, or `null`.
    #[wasm_bindgen(js_name = flatItem)]
    pub fn flat_item(&self, id: &str) -> JsValue {
        let Some(iri) = Iri::existing(id) else {
            return JsValue::NULL;
        };
        match self.inner.annotations().get(iri) {
            Some(item) => to_js(&FlatItemView::from(item), "flat item"),
            None => JsValue::NULL,
        }
    }

    /// Whether every member annotation is complete.
    #[wasm_bindgen(js_name = isComplete)]
    pub fn is_complete(&self) -> bool {
        self.inner.annotations().is_all_complete()
    }

    #[wasm_bindgen(js_name = annotationCount)]
    pub fn annotation_count(&self) -> usize {
        self.inner.annotations().len()
    }

    #[wasm_bindgen(js_name = focusedId)]
    pub fn focused_id(&self) -> Option<String> {
        self.inner.annotations().focused().map(|id| id.as_str().to_string())
    }
}
