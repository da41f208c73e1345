//! Resource Store
//!
//! In-memory home of every linked-data resource the core can see. The store
//! is the source of truth; flat items only read from it. Every mutation that
//! actually changes a property queues a [`StoreEvent`] which the owner drains
//! and forwards to whoever subscribed to that resource.

use indexmap::IndexMap;

use super::intern::Iri;
use super::ns;
use super::term::{Literal, Term};

// =============================================================================
// Resource
// =============================================================================

/// An addressable node with named, multi-valued properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    id: Iri,
    properties: IndexMap<Iri, Vec<Term>>,
}

impl Resource {
    pub fn new(id: impl Into<Iri>) -> Self {
        Self {
            id: id.into(),
            properties: IndexMap::new(),
        }
    }

    /// Builder: append a value to `property`.
    pub fn with(mut self, property: impl Into<Iri>, value: impl Into<Term>) -> Self {
        let value = value.into();
        let values = self.properties.entry(property.into()).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
        self
    }

    /// Builder: add a type.
    pub fn with_type(self, class: impl Into<Iri>) -> Self {
        let class: Iri = class.into();
        self.with(ns::TYPE, Term::Node(class))
    }

    pub fn id(&self) -> Iri {
        self.id
    }

    /// Values of `property`; empty if absent.
    pub fn get(&self, property: impl Into<Iri>) -> &[Term] {
        self.properties
            .get(&property.into())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has(&self, property: impl Into<Iri>) -> bool {
        !self.get(property).is_empty()
    }

    pub fn has_value(&self, property: impl Into<Iri>, value: &Term) -> bool {
        self.get(property).contains(value)
    }

    pub fn types(&self) -> impl Iterator<Item = Iri> + '_ {
        self.get(ns::TYPE).iter().filter_map(Term::as_node)
    }

    pub fn has_type(&self, class: impl Into<Iri>) -> bool {
        let class = class.into();
        self.types().any(|t| t == class)
    }

    /// Node references of `property`, in order.
    pub fn nodes(&self, property: impl Into<Iri>) -> Vec<Iri> {
        self.get(property).iter().filter_map(Term::as_node).collect()
    }

    pub fn first_node(&self, property: impl Into<Iri>) -> Option<Iri> {
        self.get(property).iter().find_map(Term::as_node)
    }

    pub fn first_literal(&self, property: impl Into<Iri>) -> Option<&Literal> {
        self.get(property).iter().find_map(Term::as_literal)
    }

    pub fn properties(&self) -> impl Iterator<Item = (Iri, &[Term])> {
        self.properties.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.properties.values().all(Vec::is_empty)
    }
}

// =============================================================================
// Store
// =============================================================================

/// Change notification for a single property of a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Changed { id: Iri, property: Iri },
}

impl StoreEvent {
    pub fn id(&self) -> Iri {
        match self {
            StoreEvent::Changed { id, .. } => *id,
        }
    }

    pub fn property(&self) -> Iri {
        match self {
            StoreEvent::Changed { property, .. } => *property,
        }
    }
}

/// All known resources, keyed by identity.
#[derive(Debug, Default)]
pub struct Store {
    resources: IndexMap<Iri, Resource>,
    events: Vec<StoreEvent>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn resource(&self, id: Iri) -> Option<&Resource> {
        self.resources.get(&id)
    }

    pub fn contains(&self, id: Iri) -> bool {
        self.resources.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Values of `property` on `id`; empty for unknown resources.
    pub fn get(&self, id: Iri, property: impl Into<Iri>) -> &[Term] {
        match self.resources.get(&id) {
            Some(resource) => resource.get(property),
            None => &[],
        }
    }

    /// Replace all values of a property. An empty list unsets it.
    /// Returns whether anything changed.
    pub fn set(&mut self, id: Iri, property: impl Into<Iri>, values: Vec<Term>) -> bool {
        let property = property.into();
        let resource = self
            .resources
            .entry(id)
            .or_insert_with(|| Resource::new(id));
        let current = resource.properties.get(&property);
        if current.map(Vec::as_slice).unwrap_or(&[]) == values.as_slice() {
            return false;
        }
        if values.is_empty() {
            resource.properties.shift_remove(&property);
        } else {
            resource.properties.insert(property, values);
        }
        self.events.push(StoreEvent::Changed { id, property });
        true
    }

    /// Append one value, ignoring duplicates.
    pub fn add_value(&mut self, id: Iri, property: impl Into<Iri>, value: impl Into<Term>) -> bool {
        let property = property.into();
        let value = value.into();
        let mut values = self.get(id, property).to_vec();
        if values.contains(&value) {
            return false;
        }
        values.push(value);
        self.set(id, property, values)
    }

    pub fn remove_value(&mut self, id: Iri, property: impl Into<Iri>, value: &Term) -> bool {
        let property = property.into();
        let mut values = self.get(id, property).to_vec();
        let before = values.len();
        values.retain(|v| v != value);
        if values.len() == before {
            return false;
        }
        self.set(id, property, values)
    }

    pub fn unset(&mut self, id: Iri, property: impl Into<Iri>) -> bool {
        self.set(id, property, Vec::new())
    }

    /// Merge the properties of `incoming` into the stored resource with the
    /// same id. Properties present in `incoming` replace the stored values;
    /// properties it does not mention are left alone.
    pub fn merge(&mut self, incoming: Resource) -> usize {
        let id = incoming.id;
        self.resources.entry(id).or_insert_with(|| Resource::new(id));
        incoming
            .properties
            .into_iter()
            .filter(|(property, values)| self.set(id, *property, values.clone()))
            .count()
    }

    /// Drop every property of `id`. Subscribers see each property vanish.
    pub fn clear_resource(&mut self, id: Iri) {
        let properties: Vec<Iri> = match self.resources.get(&id) {
            Some(resource) => resource.properties.keys().copied().collect(),
            None => return,
        };
        for property in properties {
            self.unset(id, property);
        }
    }

    /// Forget `id` entirely, after notifying subscribers of every property.
    pub fn remove_resource(&mut self, id: Iri) -> Option<Resource> {
        self.clear_resource(id);
        self.resources.shift_remove(&id)
    }

    pub fn drain_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}
