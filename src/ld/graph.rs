//! Resource Collections
//!
//! A `Graph` is an ordered selection of resources from the [`Store`]
//! (for instance "all annotations on this source"). It holds identities only;
//! the data lives in the store. Membership changes queue [`GraphEvent`]s that
//! flat collections mirror.
//!
//! [`Store`]: super::store::Store

use indexmap::IndexSet;
use std::cmp::Ordering;

use super::intern::Iri;

/// Membership notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEvent {
    Add(Iri),
    Remove(Iri),
    /// Membership was replaced wholesale; read the new members from the graph.
    Reset,
    /// Order changed; read the new order from the graph.
    Sort,
}

/// Ordered, duplicate-free collection of resource identities.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    members: IndexSet<Iri>,
    events: Vec<GraphEvent>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph whose initial members do not generate events.
    pub fn with_members(ids: impl IntoIterator<Item = Iri>) -> Self {
        Self {
            members: ids.into_iter().collect(),
            events: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: Iri) -> bool {
        self.members.contains(&id)
    }

    pub fn position(&self, id: Iri) -> Option<usize> {
        self.members.get_index_of(&id)
    }

    pub fn at(&self, index: usize) -> Option<Iri> {
        self.members.get_index(index).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = Iri> + '_ {
        self.members.iter().copied()
    }

    pub fn add(&mut self, id: Iri) -> bool {
        if !self.members.insert(id) {
            return false;
        }
        self.events.push(GraphEvent::Add(id));
        true
    }

    pub fn add_all(&mut self, ids: impl IntoIterator<Item = Iri>) -> usize {
        ids.into_iter().filter(|id| self.add(*id)).count()
    }

    pub fn remove(&mut self, id: Iri) -> bool {
        if !self.members.shift_remove(&id) {
            return false;
        }
        self.events.push(GraphEvent::Remove(id));
        true
    }

    pub fn reset(&mut self, ids: impl IntoIterator<Item = Iri>) {
        self.members = ids.into_iter().collect();
        self.events.push(GraphEvent::Reset);
    }

    pub fn clear(&mut self) {
        self.reset(std::iter::empty());
    }

    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(Iri, Iri) -> Ordering,
    {
        self.members.sort_by(|a, b| compare(*a, *b));
        self.events.push(GraphEvent::Sort);
    }

    pub fn sort_by_key<K, F>(&mut self, mut key: F)
    where
        K: Ord,
        F: FnMut(Iri) -> K,
    {
        self.sort_by(|a, b| key(a).cmp(&key(b)));
    }

    /// Put the members listed in `order` first, in that order; unlisted
    /// members keep their relative order after them.
    pub fn reorder(&mut self, order: &[Iri]) {
        self.sort_by_key(|id| order.iter().position(|o| *o == id).unwrap_or(usize::MAX));
    }

    /// Sort lexicographically by identifier.
    pub fn sort_by_id(&mut self) {
        self.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    }

    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}
