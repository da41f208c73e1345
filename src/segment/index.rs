//! SegmentIndex: incremental partition of `[0, +inf)` by annotation coverage
//!
//! The index keeps a sorted, contiguous list of segments. Inserting an
//! annotation `[s, e)` splits the segment containing `s` (if `s` is strictly
//! inside it) and the segment containing `e` (likewise), then adds the
//! annotation to every segment in between. Splits at existing boundaries are
//! no-ops, so the final partition does not depend on insertion order.
//!
//! Ejecting an annotation removes it from the segments it covered but never
//! merges segments back together: boundaries are sticky until a reset.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use tracing::{debug, trace};

use super::model::{Bound, Segment};
use crate::flat::{CollectionEvent, FlatItem, FlatItemCollection};
use crate::ld::Iri;

/// Notification emitted by a segment index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentEvent {
    /// A segment was split off and now lives at `index`.
    Add { index: usize },
    /// The annotation set of the segment at `index` changed.
    Change { index: usize },
    /// The index was rebuilt.
    Reset,
}

#[derive(Debug, Clone)]
pub struct SegmentIndex {
    segments: Vec<Segment>,
    /// Span of every inserted annotation, as it was when inserted.
    spans: HashMap<Iri, (u64, u64)>,
}

impl Default for SegmentIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentIndex {
    pub fn new() -> Self {
        Self {
            segments: vec![Segment::whole()],
            spans: HashMap::new(),
        }
    }

    /// Build an index over the members of `collection` that are already
    /// complete.
    pub fn from_collection(collection: &FlatItemCollection) -> Self {
        let mut index = Self::new();
        let mut scratch = Vec::new();
        for item in collection.iter() {
            index.insert_item(item, &mut scratch);
        }
        index
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Never true: the index always holds at least `[0, +inf)`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Index of the segment containing `position`.
    pub fn find_start(&self, position: u64) -> usize {
        self.segments
            .partition_point(|s| s.start <= position)
            .saturating_sub(1)
    }

    /// Index of the last segment touched by a range ending at `position`
    /// (exclusive), i.e. the segment containing `position - 1`.
    pub fn find_end(&self, position: u64) -> usize {
        self.segments
            .partition_point(|s| s.end < Bound::At(position))
            .min(self.segments.len() - 1)
    }

    /// The segment containing `position`.
    pub fn segment_at(&self, position: u64) -> &Segment {
        &self.segments[self.find_start(position)]
    }

    pub fn contains(&self, id: Iri) -> bool {
        self.spans.contains_key(&id)
    }

    /// Span `[start, end)` of an inserted annotation.
    pub fn span_of(&self, id: Iri) -> Option<(u64, u64)> {
        self.spans.get(&id).copied()
    }

    /// Indices of the segments covered by an inserted annotation.
    pub fn range_of(&self, id: Iri) -> Option<RangeInclusive<usize>> {
        let (start, end) = self.span_of(id)?;
        Some(self.find_start(start)..=self.find_end(end))
    }

    /// Segment boundaries, ending with `Bound::Unbounded`.
    pub fn boundaries(&self) -> Vec<Bound> {
        let mut bounds: Vec<Bound> = self.segments.iter().map(|s| Bound::At(s.start)).collect();
        bounds.push(Bound::Unbounded);
        bounds
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Add annotation `id` covering `[start, end)`. Degenerate spans and
    /// annotations that are already present are ignored.
    pub fn insert(&mut self, id: Iri, start: u64, end: u64, events: &mut Vec<SegmentEvent>) -> bool {
        if start >= end {
            debug!(%id, start, end, "degenerate span ignored");
            return false;
        }
        if self.spans.contains_key(&id) {
            return false;
        }

        let mut first = self.find_start(start);
        if let Some(back) = self.segments[first].split_off(start) {
            first += 1;
            self.segments.insert(first, back);
            events.push(SegmentEvent::Add { index: first });
        }

        let last = self.find_end(end);
        if let Some(back) = self.segments[last].split_off(end) {
            self.segments.insert(last + 1, back);
            events.push(SegmentEvent::Add { index: last + 1 });
        }

        for index in first..=last {
            self.segments[index].annotations.insert(id);
            events.push(SegmentEvent::Change { index });
        }
        self.spans.insert(id, (start, end));
        trace!(%id, start, end, segments = self.segments.len(), "annotation inserted");
        true
    }

    /// Insert a flat annotation if it is complete and positioned.
    pub fn insert_item(&mut self, item: &FlatItem, events: &mut Vec<SegmentEvent>) -> bool {
        if !item.is_complete() {
            return false;
        }
        match (item.start_position(), item.end_position()) {
            (Some(start), Some(end)) => self.insert(item.underlying(), start, end, events),
            _ => false,
        }
    }

    /// Remove annotation `id` from every segment it covered. Segments are
    /// left in place.
    pub fn eject(&mut self, id: Iri, events: &mut Vec<SegmentEvent>) -> bool {
        let Some((start, end)) = self.spans.remove(&id) else {
            return false;
        };
        for index in self.find_start(start)..=self.find_end(end) {
            if self.segments[index].annotations.shift_remove(&id) {
                events.push(SegmentEvent::Change { index });
            }
        }
        trace!(%id, "annotation ejected");
        true
    }

    /// Start over from `[0, +inf)` and insert the complete members of
    /// `items`. Only `Reset` is emitted.
    pub fn reset<'a>(
        &mut self,
        items: impl IntoIterator<Item = &'a FlatItem>,
        events: &mut Vec<SegmentEvent>,
    ) {
        self.segments = vec![Segment::whole()];
        self.spans.clear();
        let mut scratch = Vec::new();
        for item in items {
            self.insert_item(item, &mut scratch);
        }
        debug!(segments = self.segments.len(), annotations = self.spans.len(), "segments reset");
        events.push(SegmentEvent::Reset);
    }

    /// Follow a flat annotation collection.
    pub fn handle(
        &mut self,
        event: &CollectionEvent,
        collection: &FlatItemCollection,
        events: &mut Vec<SegmentEvent>,
    ) {
        match *event {
            CollectionEvent::Add(id) | CollectionEvent::Complete(id) => {
                if let Some(item) = collection.get(id) {
                    self.insert_item(item, events);
                }
            }
            CollectionEvent::Remove(id) => {
                self.eject(id, events);
            }
            CollectionEvent::Reset => self.reset(collection.iter(), events),
            _ => {}
        }
    }
}
