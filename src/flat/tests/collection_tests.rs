//! Tests for FlatItemCollection
//!
//! Membership mirroring, aggregate completion, the annotation variant and focus.

use super::fixtures::*;
use crate::flat::{Admission, CollectionEvent, FlatItemCollection};
use crate::ld::ns::oa;
use crate::ld::{Iri, Resource, Term};

fn annotation_harness() -> Harness {
    Harness::new(FlatItemCollection::annotations())
}

/// Load a complete annotation and add it to the graph.
fn add_annotation(h: &mut Harness, serial: &str, start: i64, end: i64) -> AnnotationIds {
    let ids = AnnotationIds::new(&h.fx.ns, serial);
    let class = h.fx.ns.ontology("Content");
    h.load(annotation_parts(&ids, class, start, end));
    h.graph.add(ids.annotation);
    ids
}

/// Add an annotation whose quote selector has not arrived yet.
fn add_partial_annotation(h: &mut Harness, serial: &str) -> (AnnotationIds, Resource) {
    let ids = AnnotationIds::new(&h.fx.ns, serial);
    let class = h.fx.ns.ontology("Content");
    let mut parts = annotation_parts(&ids, class, 0, 10);
    let quote = parts.remove(3);
    h.load(parts);
    h.graph.add(ids.annotation);
    (ids, quote)
}

// ============================================================================
// Membership
// ============================================================================

#[test]
fn test_base_collection_mirrors_graph() {
    let mut h = Harness::new(FlatItemCollection::new(Admission::All));
    let ids: Vec<Iri> = ["a", "b", "c"].iter().map(|s| h.fx.ns.item(s)).collect();
    h.graph.add_all(ids.clone());
    let events = h.pump();
    assert_eq!(h.collection.len(), 3);
    assert_eq!(&events[..3], &ids.iter().map(|id| CollectionEvent::Add(*id)).collect::<Vec<_>>()[..]);

    h.graph.remove(ids[1]);
    let events = h.pump();
    assert!(events.contains(&CollectionEvent::Remove(ids[1])));
    assert!(!h.collection.contains(ids[1]));

    h.graph.reorder(&[ids[2], ids[0]]);
    let events = h.pump();
    assert_eq!(events, vec![CollectionEvent::Sort]);
    assert_eq!(h.collection.ids().collect::<Vec<_>>(), vec![ids[2], ids[0]]);
}

#[test]
fn test_removed_members_stop_listening() {
    let mut h = annotation_harness();
    let ids = add_annotation(&mut h, "300", 0, 5);
    h.pump();
    h.graph.remove(ids.annotation);
    h.pump();

    h.fx.store.set(ids.position, oa::START, vec![Term::from(2i64)]);
    let events = h.pump();
    assert!(events.is_empty(), "unexpected {events:?}");
}

#[test]
fn test_store_changes_are_forwarded() {
    let mut h = annotation_harness();
    let ids = add_annotation(&mut h, "301", 0, 5);
    h.pump();
    h.fx.store.set(ids.position, oa::END, vec![Term::from(7i64)]);
    let events = h.pump();
    assert_eq!(
        events,
        vec![CollectionEvent::Changed {
            id: ids.annotation,
            field: crate::flat::Field::EndPosition,
        }]
    );
    assert_eq!(h.collection.get(ids.annotation).and_then(|i| i.end_position()), Some(7));
}

// ============================================================================
// Aggregate completion
// ============================================================================

#[test]
fn test_all_complete_fires_on_each_transition() {
    let mut h = annotation_harness();
    add_annotation(&mut h, "310", 0, 5);
    assert_eq!(all_complete_count(&h.pump()), 1);
    let (_, quote) = add_partial_annotation(&mut h, "311");
    let events = h.pump();
    assert_eq!(all_complete_count(&events), 0);
    assert_eq!(h.collection.complete_count(), 1);
    assert!(!h.collection.is_all_complete());

    h.fx.store.merge(quote);
    let events = h.pump();
    assert!(events.contains(&CollectionEvent::Complete(h.fx.ns.item("311"))));
    assert_eq!(
        events.last(),
        Some(&CollectionEvent::AllComplete { count: 2 }),
    );

    // Entering the state again fires again.
    let (partial, _) = add_partial_annotation(&mut h, "312");
    let events = h.pump();
    assert_eq!(all_complete_count(&events), 0);
    assert!(!h.collection.is_all_complete());

    h.graph.remove(partial.annotation);
    let events = h.pump();
    assert_eq!(
        events,
        vec![
            CollectionEvent::Remove(partial.annotation),
            CollectionEvent::AllComplete { count: 2 },
        ]
    );
}

#[test]
fn test_all_complete_is_not_repeated_while_state_holds() {
    let mut h = annotation_harness();
    add_annotation(&mut h, "313", 0, 5);
    let events = h.pump();
    assert_eq!(all_complete_count(&events), 1);
    add_annotation(&mut h, "314", 5, 9);
    let events = h.pump();
    assert_eq!(all_complete_count(&events), 0);
    assert_eq!(h.collection.complete_count(), 2);
}

// ============================================================================
// Annotation variant
// ============================================================================

#[test]
fn test_untyped_resources_are_pending() {
    let mut h = annotation_harness();
    add_annotation(&mut h, "320", 0, 5);
    h.pump();
    let late = h.fx.ns.item("321");
    h.graph.add(late);
    let events = h.pump();
    assert_eq!(h.collection.pending_count(), 1);
    assert_eq!(h.collection.len(), 1);
    assert_eq!(all_complete_count(&events), 0, "pending resources block completion");

    // The type arrives and proves it is not an annotation.
    h.fx.store.merge(Resource::new(late).with_type(oa::SPECIFIC_RESOURCE));
    let events = h.pump();
    assert_eq!(h.collection.pending_count(), 0);
    assert!(!h.collection.contains(late));
    assert_eq!(events, vec![CollectionEvent::AllComplete { count: 1 }]);
}

#[test]
fn test_pending_annotation_is_admitted_once_typed() {
    let mut h = annotation_harness();
    let ids = AnnotationIds::new(&h.fx.ns, "322");
    h.graph.add(ids.annotation);
    h.pump();
    assert!(h.collection.is_pending(ids.annotation));

    h.load(annotation_parts(&ids, h.fx.ns.ontology("Content"), 3, 6));
    let events = h.pump();
    assert_eq!(events.first(), Some(&CollectionEvent::Add(ids.annotation)));
    assert_eq!(events.last(), Some(&CollectionEvent::AllComplete { count: 1 }));
    assert!(h.collection.get(ids.annotation).is_some_and(|i| i.is_complete()));
}

#[test]
fn test_reset_cancels_pending_watches() {
    let mut h = annotation_harness();
    let stale = h.fx.ns.item("323");
    h.graph.add(stale);
    h.pump();
    assert_eq!(h.collection.pending_count(), 1);

    let ids = AnnotationIds::new(&h.fx.ns, "324");
    h.load(annotation_parts(&ids, h.fx.ns.ontology("Content"), 0, 3));
    h.graph.reset([ids.annotation]);
    let events = h.pump();
    assert_eq!(h.collection.pending_count(), 0);
    assert_eq!(
        events,
        vec![CollectionEvent::Reset, CollectionEvent::AllComplete { count: 1 }]
    );

    // The stale resource becoming an annotation does not sneak in.
    h.fx.store.merge(Resource::new(stale).with_type(oa::ANNOTATION));
    let events = h.pump();
    assert!(events.is_empty());
    assert!(!h.collection.contains(stale));
}

#[test]
fn test_removing_pending_resource_releases_completion() {
    let mut h = annotation_harness();
    add_annotation(&mut h, "325", 0, 5);
    let pending = h.fx.ns.item("326");
    h.graph.add(pending);
    h.pump();
    assert!(!h.collection.is_all_complete());

    h.graph.remove(pending);
    let events = h.pump();
    assert_eq!(h.collection.pending_count(), 0);
    assert_eq!(events, vec![CollectionEvent::AllComplete { count: 1 }]);

    h.fx.store.merge(Resource::new(pending).with_type(oa::ANNOTATION));
    assert!(h.pump().is_empty());
}

#[test]
fn test_annotation_variant_sorts_by_position_after_completion() {
    let mut h = annotation_harness();
    let late = add_annotation(&mut h, "330", 50, 60);
    let early = add_annotation(&mut h, "331", 10, 20);
    let middle = add_annotation(&mut h, "332", 10, 15);
    h.pump();
    assert!(h.collection.is_sort_dirty());

    // Upstream order is ignored.
    h.graph.sort_by_id();
    assert!(!h.pump().contains(&CollectionEvent::Sort));

    let mut events = Vec::new();
    assert!(h.collection.flush(&mut events));
    assert_eq!(events, vec![CollectionEvent::Sort]);
    assert_eq!(
        h.collection.ids().collect::<Vec<_>>(),
        vec![middle.annotation, early.annotation, late.annotation]
    );
    assert!(!h.collection.flush(&mut events));
}

#[test]
fn test_annotation_variant_ignores_other_types() {
    let mut h = annotation_harness();
    let ids = AnnotationIds::new(&h.fx.ns, "333");
    h.load(annotation_parts(&ids, h.fx.ns.ontology("Content"), 0, 3));
    h.graph.add_all([ids.annotation, ids.target, ids.position, ids.quote]);
    h.pump();
    assert_eq!(h.collection.ids().collect::<Vec<_>>(), vec![ids.annotation]);
    assert_eq!(h.collection.pending_count(), 0);
}

// ============================================================================
// Focus
// ============================================================================

#[test]
fn test_focus_is_exclusive() {
    let mut h = annotation_harness();
    let a = add_annotation(&mut h, "340", 0, 5).annotation;
    let b = add_annotation(&mut h, "341", 5, 9).annotation;
    h.pump();

    let mut events = Vec::new();
    assert!(h.collection.focus(a, &mut events));
    assert_eq!(events, vec![CollectionEvent::Focus(a)]);

    events.clear();
    h.collection.focus(b, &mut events);
    assert_eq!(events, vec![CollectionEvent::Blur(a), CollectionEvent::Focus(b)]);
    assert_eq!(h.collection.focused(), Some(b));

    events.clear();
    h.collection.focus(a, &mut events);
    assert_eq!(events, vec![CollectionEvent::Blur(b), CollectionEvent::Focus(a)]);

    events.clear();
    h.collection.focus(a, &mut events);
    assert!(events.is_empty(), "refocusing is a no-op");
}

#[test]
fn test_blur_and_non_members() {
    let mut h = annotation_harness();
    let a = add_annotation(&mut h, "342", 0, 5).annotation;
    h.pump();
    let mut events = Vec::new();
    assert!(!h.collection.focus(h.fx.ns.item("nobody"), &mut events));
    assert!(!h.collection.blur(a, &mut events));
    h.collection.focus(a, &mut events);
    assert!(h.collection.blur(a, &mut events));
    assert_eq!(events, vec![CollectionEvent::Focus(a), CollectionEvent::Blur(a)]);
    assert_eq!(h.collection.focused(), None);
}

#[test]
fn test_removing_focused_member_blurs_once() {
    let mut h = annotation_harness();
    let a = add_annotation(&mut h, "343", 0, 5).annotation;
    h.pump();
    let mut events = Vec::new();
    h.collection.focus(a, &mut events);

    h.graph.remove(a);
    let events = h.pump();
    assert_eq!(
        events,
        vec![CollectionEvent::Blur(a), CollectionEvent::Remove(a)]
    );
    assert_eq!(h.collection.focused(), None);
}

#[test]
fn test_reset_clears_focus_silently() {
    let mut h = annotation_harness();
    let a = add_annotation(&mut h, "344", 0, 5).annotation;
    h.pump();
    let mut events = Vec::new();
    h.collection.focus(a, &mut events);
    h.graph.reset([a]);
    let events = h.pump();
    assert!(!events.iter().any(|e| matches!(e, CollectionEvent::Blur(_))));
    assert_eq!(h.collection.focused(), None);
}
