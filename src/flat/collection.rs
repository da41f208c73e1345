//! FlatItemCollection: flat items mirrored 1:1 from a [`Graph`]
//!
//! The collection follows the membership of its upstream graph, forwards
//! item notifications, keeps a tally of complete items and fires
//! `AllComplete` each time it enters the state where every member is
//! complete. At most one member is in focus at any time.
//!
//! The annotation variant ([`FlatItemCollection::annotations`]) only admits
//! resources of a given type. Resources whose type is still unknown are kept
//! pending; aggregate completion waits for them. It orders its members by
//! `(startPosition, endPosition)` instead of following the upstream order;
//! the sort is deferred with a dirty flag until [`flush`](FlatItemCollection::flush).

use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use tracing::{debug, trace};

use super::context::FlatContext;
use super::field::Field;
use super::item::{FlatEvent, FlatItem};
use crate::ld::ns::oa;
use crate::ld::{Graph, GraphEvent, Iri, StoreEvent};

/// Which upstream resources become members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Every upstream resource.
    All,
    /// Only resources carrying this type; the decision waits for the type.
    Typed(Iri),
}

/// Notification emitted by a flat item collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEvent {
    Add(Iri),
    Remove(Iri),
    Reset,
    Sort,
    Changed { id: Iri, field: Field },
    Complete(Iri),
    AllComplete { count: usize },
    Focus(Iri),
    Blur(Iri),
}

#[derive(Debug)]
pub struct FlatItemCollection {
    admission: Admission,
    items: IndexMap<Iri, FlatItem>,
    /// Watched resource -> members listening to it.
    listeners: HashMap<Iri, IndexSet<Iri>>,
    /// Member -> resources it was last seen listening to.
    subscriptions: HashMap<Iri, Vec<Iri>>,
    /// Upstream resources waiting for their type.
    pending: IndexSet<Iri>,
    complete: usize,
    all_complete: bool,
    focus: Option<Iri>,
    sort_dirty: bool,
}

impl FlatItemCollection {
    pub fn new(admission: Admission) -> Self {
        Self {
            admission,
            items: IndexMap::new(),
            listeners: HashMap::new(),
            subscriptions: HashMap::new(),
            pending: IndexSet::new(),
            complete: 0,
            all_complete: false,
            focus: None,
            sort_dirty: false,
        }
    }

    /// Collection restricted to `oa:Annotation` resources.
    pub fn annotations() -> Self {
        Self::new(Admission::Typed(Iri::new(oa::ANNOTATION)))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn admission(&self) -> Admission {
        self.admission
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: Iri) -> Option<&FlatItem> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: Iri) -> bool {
        self.items.contains_key(&id)
    }

    pub fn at(&self, index: usize) -> Option<&FlatItem> {
        self.items.get_index(index).map(|(_, item)| item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlatItem> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = Iri> + '_ {
        self.items.keys().copied()
    }

    pub fn complete_count(&self) -> usize {
        self.complete
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: Iri) -> bool {
        self.pending.contains(&id)
    }

    pub fn is_all_complete(&self) -> bool {
        self.all_complete
    }

    pub fn focused(&self) -> Option<Iri> {
        self.focus
    }

    pub fn is_sort_dirty(&self) -> bool {
        self.sort_dirty
    }

    // =========================================================================
    // Upstream membership
    // =========================================================================

    pub fn handle_graph_event(
        &mut self,
        event: &GraphEvent,
        graph: &Graph,
        ctx: &FlatContext<'_>,
        events: &mut Vec<CollectionEvent>,
    ) {
        match event {
            GraphEvent::Add(id) => self.proxy_add(*id, ctx, events),
            GraphEvent::Remove(id) => self.proxy_remove(*id, events),
            GraphEvent::Reset => self.proxy_reset(graph.ids(), ctx, events),
            GraphEvent::Sort => self.proxy_sort(graph, events),
        }
    }

    pub fn proxy_add(&mut self, id: Iri, ctx: &FlatContext<'_>, events: &mut Vec<CollectionEvent>) {
        if self.items.contains_key(&id) {
            return;
        }
        if self.admit(id, ctx) {
            self.insert(id, ctx, events);
        }
        self.refresh_all_complete(events);
    }

    pub fn proxy_remove(&mut self, id: Iri, events: &mut Vec<CollectionEvent>) {
        if self.pending.shift_remove(&id) {
            trace!(%id, "pending resource removed");
        }
        if let Some(item) = self.items.get(&id) {
            let was_complete = item.is_complete();
            if self.focus == Some(id) {
                self.focus = None;
                events.push(CollectionEvent::Blur(id));
            }
            self.items.shift_remove(&id);
            self.unsubscribe(id);
            if was_complete {
                self.complete -= 1;
            }
            events.push(CollectionEvent::Remove(id));
        }
        self.refresh_all_complete(events);
    }

    /// Rebuild from scratch. Pending watches are dropped and focus is
    /// cleared without a blur.
    pub fn proxy_reset(
        &mut self,
        ids: impl IntoIterator<Item = Iri>,
        ctx: &FlatContext<'_>,
        events: &mut Vec<CollectionEvent>,
    ) {
        self.items.clear();
        self.listeners.clear();
        self.subscriptions.clear();
        self.pending.clear();
        self.complete = 0;
        self.all_complete = false;
        self.focus = None;
        self.sort_dirty = false;

        for id in ids {
            if self.items.contains_key(&id) || !self.admit(id, ctx) {
                continue;
            }
            let mut scratch = Vec::new();
            let item = FlatItem::new(id, ctx, &mut scratch);
            self.adopt(item);
        }
        debug!(members = self.items.len(), pending = self.pending.len(), "collection reset");
        events.push(CollectionEvent::Reset);
        self.refresh_all_complete(events);
    }

    /// Mirror the upstream order. The annotation variant keeps its own order.
    pub fn proxy_sort(&mut self, graph: &Graph, events: &mut Vec<CollectionEvent>) {
        if self.admission != Admission::All {
            return;
        }
        self.items
            .sort_by_cached_key(|id, _| graph.position(*id).unwrap_or(usize::MAX));
        events.push(CollectionEvent::Sort);
    }

    /// Apply a deferred content sort. Returns whether a sort happened.
    pub fn flush(&mut self, events: &mut Vec<CollectionEvent>) -> bool {
        if !self.sort_dirty {
            return false;
        }
        self.sort_dirty = false;
        self.items.sort_by_cached_key(|_, item| {
            (
                item.start_position().unwrap_or(u64::MAX),
                item.end_position().unwrap_or(u64::MAX),
            )
        });
        events.push(CollectionEvent::Sort);
        true
    }

    // =========================================================================
    // Store intake
    // =========================================================================

    /// Route a store change to pending resources and to every member that
    /// listens to the changed resource.
    pub fn handle_store_event(
        &mut self,
        event: &StoreEvent,
        ctx: &FlatContext<'_>,
        events: &mut Vec<CollectionEvent>,
    ) {
        let id = event.id();
        let members: Vec<Iri> = self
            .listeners
            .get(&id)
            .map(|keys| keys.iter().copied().collect())
            .unwrap_or_default();

        if self.pending.contains(&id) {
            self.resolve_pending(id, ctx, events);
        }

        for key in members {
            let Some(item) = self.items.get_mut(&key) else {
                continue;
            };
            let mut flat_events = Vec::new();
            item.handle_store_event(event, ctx, &mut flat_events);
            self.resubscribe(key);
            for flat_event in flat_events {
                match flat_event {
                    FlatEvent::Changed(field) => {
                        events.push(CollectionEvent::Changed { id: key, field })
                    }
                    FlatEvent::Complete => {
                        self.complete += 1;
                        events.push(CollectionEvent::Complete(key));
                    }
                }
            }
        }
        self.refresh_all_complete(events);
    }

    fn resolve_pending(&mut self, id: Iri, ctx: &FlatContext<'_>, events: &mut Vec<CollectionEvent>) {
        let Admission::Typed(required) = self.admission else {
            return;
        };
        let Some(resource) = ctx.store.resource(id) else {
            return;
        };
        if resource.types().next().is_none() {
            return;
        }
        self.pending.shift_remove(&id);
        if resource.has_type(required) {
            trace!(%id, "pending resource admitted");
            self.insert(id, ctx, events);
        } else {
            trace!(%id, "pending resource excluded");
        }
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Focus `id`, blurring the previous focus first. Returns false for
    /// non-members.
    pub fn focus(&mut self, id: Iri, events: &mut Vec<CollectionEvent>) -> bool {
        if !self.items.contains_key(&id) {
            return false;
        }
        if self.focus == Some(id) {
            return true;
        }
        if let Some(previous) = self.focus.take() {
            events.push(CollectionEvent::Blur(previous));
        }
        self.focus = Some(id);
        events.push(CollectionEvent::Focus(id));
        true
    }

    /// Blur `id` if it is in focus.
    pub fn blur(&mut self, id: Iri, events: &mut Vec<CollectionEvent>) -> bool {
        if self.focus != Some(id) {
            return false;
        }
        self.focus = None;
        events.push(CollectionEvent::Blur(id));
        true
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Decide membership of `id` now, or park it as pending.
    fn admit(&mut self, id: Iri, ctx: &FlatContext<'_>) -> bool {
        let Admission::Typed(required) = self.admission else {
            return true;
        };
        let resource = ctx.store.resource(id);
        match resource {
            Some(resource) if resource.types().next().is_some() => resource.has_type(required),
            _ => {
                self.pending.insert(id);
                false
            }
        }
    }

    fn insert(&mut self, id: Iri, ctx: &FlatContext<'_>, events: &mut Vec<CollectionEvent>) {
        // Construction notifications are summarized by `Add`.
        let mut scratch = Vec::new();
        let item = FlatItem::new(id, ctx, &mut scratch);
        self.adopt(item);
        events.push(CollectionEvent::Add(id));
    }

    fn adopt(&mut self, item: FlatItem) {
        let id = item.underlying();
        if item.is_complete() {
            self.complete += 1;
        }
        self.items.insert(id, item);
        self.resubscribe(id);
    }

    fn resubscribe(&mut self, key: Iri) {
        self.unsubscribe(key);
        let Some(item) = self.items.get(&key) else {
            return;
        };
        let watched = item.watched();
        for id in &watched {
            self.listeners.entry(*id).or_default().insert(key);
        }
        self.subscriptions.insert(key, watched);
    }

    fn unsubscribe(&mut self, key: Iri) {
        let Some(watched) = self.subscriptions.remove(&key) else {
            return;
        };
        for id in watched {
            if let Some(keys) = self.listeners.get_mut(&id) {
                keys.shift_remove(&key);
                if keys.is_empty() {
                    self.listeners.remove(&id);
                }
            }
        }
    }

    fn refresh_all_complete(&mut self, events: &mut Vec<CollectionEvent>) {
        let now = self.complete == self.items.len() && self.pending.is_empty();
        if now && !self.all_complete {
            debug!(count = self.complete, "all complete");
            events.push(CollectionEvent::AllComplete { count: self.complete });
            if self.admission != Admission::All {
                self.sort_dirty = true;
            }
        }
        self.all_complete = now;
    }
}
