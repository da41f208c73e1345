//! Tests for SegmentIndex following a flat annotation collection

use proptest::prelude::*;

use super::{assert_partition, snapshot};
use crate::flat::tests::fixtures::*;
use crate::flat::FlatItemCollection;
use crate::ld::{Iri, Resource};
use crate::segment::{Bound, SegmentEvent, SegmentIndex};

const SCENARIO: [(&str, i64, i64); 4] = [("100", 15, 34), ("101", 77, 98), ("102", 77, 107), ("103", 0, 16)];

/// Pump the harness and feed every collection event to `index`.
fn follow(h: &mut Harness, index: &mut SegmentIndex) -> Vec<SegmentEvent> {
    let mut out = Vec::new();
    for event in h.pump() {
        index.handle(&event, &h.collection, &mut out);
    }
    out
}

/// Load an annotation without its quote selector and return the quote.
fn load_without_quote(h: &mut Harness, serial: &str, start: i64, end: i64) -> (AnnotationIds, Resource) {
    let ids = AnnotationIds::new(&h.fx.ns, serial);
    let mut parts = annotation_parts(&ids, h.fx.ns.ontology("Content"), start, end);
    let quote = parts.remove(3);
    h.load(parts);
    h.graph.add(ids.annotation);
    (ids, quote)
}

fn expected_spans(h: &Harness) -> Vec<(Iri, u64, u64)> {
    SCENARIO
        .iter()
        .map(|(serial, start, end)| (h.fx.ns.item(serial), *start as u64, *end as u64))
        .collect()
}

#[test]
fn test_complete_members_are_inserted_on_add() {
    let mut h = Harness::new(FlatItemCollection::annotations());
    let mut index = SegmentIndex::new();
    for (serial, start, end) in SCENARIO {
        let ids = AnnotationIds::new(&h.fx.ns, serial);
        h.load(annotation_parts(&ids, h.fx.ns.ontology("Content"), start, end));
        h.graph.add(ids.annotation);
    }
    let events = follow(&mut h, &mut index);
    assert!(!events.is_empty());
    assert_eq!(index.len(), 7);
    assert_partition(&index, &expected_spans(&h));
}

#[test]
fn test_incomplete_member_waits_for_completion() {
    let mut h = Harness::new(FlatItemCollection::annotations());
    let mut index = SegmentIndex::new();
    let (ids, quote) = load_without_quote(&mut h, "110", 5, 9);
    assert!(follow(&mut h, &mut index).is_empty());
    assert!(h.collection.contains(ids.annotation));
    assert_eq!(index.len(), 1);

    h.fx.store.merge(quote);
    let events = follow(&mut h, &mut index);
    assert!(events.contains(&SegmentEvent::Change { index: 1 }));
    assert!(index.contains(ids.annotation));
    assert_eq!(index.span_of(ids.annotation), Some((5, 9)));
}

#[test]
fn test_remove_and_reset() {
    let mut h = Harness::new(FlatItemCollection::annotations());
    let mut index = SegmentIndex::new();
    let mut serials = Vec::new();
    for (serial, start, end) in SCENARIO {
        let ids = AnnotationIds::new(&h.fx.ns, serial);
        h.load(annotation_parts(&ids, h.fx.ns.ontology("Content"), start, end));
        h.graph.add(ids.annotation);
        serials.push(ids.annotation);
    }
    follow(&mut h, &mut index);

    h.graph.remove(serials[1]);
    follow(&mut h, &mut index);
    assert!(!index.contains(serials[1]));
    assert_eq!(index.len(), 7, "boundaries survive removal");

    // After a reset only the remaining members define boundaries.
    h.graph.reset([serials[0], serials[3]]);
    let events = follow(&mut h, &mut index);
    assert_eq!(events, vec![SegmentEvent::Reset]);
    assert_eq!(
        index.boundaries(),
        vec![Bound::At(0), Bound::At(15), Bound::At(16), Bound::At(34), Bound::Unbounded]
    );
    let spans = expected_spans(&h);
    assert_partition(&index, &[spans[0], spans[3]]);
}

#[test]
fn test_from_collection_skips_incomplete_members() {
    let mut h = Harness::new(FlatItemCollection::annotations());
    let complete = AnnotationIds::new(&h.fx.ns, "120");
    h.load(annotation_parts(&complete, h.fx.ns.ontology("Content"), 2, 4));
    h.graph.add(complete.annotation);
    let (partial, _) = load_without_quote(&mut h, "121", 3, 8);
    h.pump();

    let index = SegmentIndex::from_collection(&h.collection);
    assert!(index.contains(complete.annotation));
    assert!(!index.contains(partial.annotation));
    assert_eq!(index.len(), 3);
}

proptest! {
    #[test]
    fn prop_completion_order_does_not_matter(order in Just(vec![0usize, 1, 2, 3]).prop_shuffle()) {
        let mut h = Harness::new(FlatItemCollection::annotations());
        let mut index = SegmentIndex::new();
        let quotes: Vec<Resource> = SCENARIO
            .iter()
            .map(|(serial, start, end)| load_without_quote(&mut h, serial, *start, *end).1)
            .collect();
        follow(&mut h, &mut index);
        prop_assert_eq!(index.len(), 1);

        for i in order {
            h.fx.store.merge(quotes[i].clone());
            follow(&mut h, &mut index);
        }

        let spans = expected_spans(&h);
        let mut reference = SegmentIndex::new();
        let mut scratch = Vec::new();
        for (id, start, end) in &spans {
            reference.insert(*id, *start, *end, &mut scratch);
        }
        assert_partition(&index, &spans);
        prop_assert_eq!(snapshot(&index), snapshot(&reference));
        prop_assert!(h.collection.is_all_complete());
    }
}
