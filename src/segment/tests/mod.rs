mod follow_tests;

use std::collections::{BTreeSet, HashSet};

use crate::ld::Iri;
use crate::segment::{Bound, SegmentIndex};

/// Segments as plain values, comparable across indices.
pub type Snapshot = Vec<(u64, Bound, BTreeSet<&'static str>)>;

pub fn snapshot(index: &SegmentIndex) -> Snapshot {
    index
        .iter()
        .map(|s| (s.start, s.end, s.annotations.iter().map(|id| id.as_str()).collect()))
        .collect()
}

/// Check that the segments partition `[0, +inf)` and that each annotation in
/// `spans` is listed by exactly the segments intersecting its span.
pub fn assert_partition(index: &SegmentIndex, spans: &[(Iri, u64, u64)]) {
    let segments = index.segments();
    assert_eq!(segments.first().map(|s| s.start), Some(0));
    assert_eq!(segments.last().map(|s| s.end), Some(Bound::Unbounded));
    for pair in segments.windows(2) {
        assert!(Bound::At(pair[0].start) < pair[0].end, "empty segment {:?}", pair[0]);
        assert_eq!(pair[0].end, Bound::At(pair[1].start), "gap or overlap");
    }
    for &(id, start, end) in spans {
        for segment in segments {
            let overlaps = segment.start < end && Bound::At(start) < segment.end;
            assert_eq!(segment.has(id), overlaps, "{id} in [{}, {:?})", segment.start, segment.end);
        }
    }
    let listed: HashSet<Iri> = segments.iter().flat_map(|s| s.annotations.iter().copied()).collect();
    for id in listed {
        assert!(spans.iter().any(|(known, _, _)| *known == id), "stray annotation {id}");
    }
}

/// Boundaries produced by inserting `spans` into a fresh index.
pub fn expected_boundaries(spans: &[(Iri, u64, u64)]) -> Vec<Bound> {
    let mut points: BTreeSet<u64> = BTreeSet::from([0]);
    for &(_, start, end) in spans {
        points.insert(start);
        points.insert(end);
    }
    let mut bounds: Vec<Bound> = points.into_iter().map(Bound::At).collect();
    bounds.push(Bound::Unbounded);
    bounds
}
