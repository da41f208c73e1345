//! Segment: a range of text positions and the annotations covering it

use indexmap::IndexSet;
use serde::Serialize;

use crate::ld::Iri;

/// Upper bound of a segment. Only the last segment is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Bound {
    At(u64),
    Unbounded,
}

impl Bound {
    pub fn position(self) -> Option<u64> {
        match self {
            Bound::At(at) => Some(at),
            Bound::Unbounded => None,
        }
    }
}

impl From<u64> for Bound {
    fn from(at: u64) -> Self {
        Bound::At(at)
    }
}

/// Half-open range `[start, end)` with the set of annotations that cover
/// all of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start: u64,
    pub end: Bound,
    pub annotations: IndexSet<Iri>,
}

impl Segment {
    pub fn new(start: u64, end: impl Into<Bound>) -> Self {
        Self {
            start,
            end: end.into(),
            annotations: IndexSet::new(),
        }
    }

    /// The whole text, `[0, +inf)`.
    pub fn whole() -> Self {
        Self::new(0, Bound::Unbounded)
    }

    /// Number of covering annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn has(&self, id: Iri) -> bool {
        self.annotations.contains(&id)
    }

    /// Whether `at` lies strictly inside the segment.
    pub fn envelops(&self, at: u64) -> bool {
        self.start < at && Bound::At(at) < self.end
    }

    /// Whether `at` lies in `[start, end)`.
    pub fn contains(&self, at: u64) -> bool {
        self.start <= at && Bound::At(at) < self.end
    }

    /// Truncate the segment at `at` and return the back part, which inherits
    /// the current annotations. `None` unless `at` is strictly inside.
    pub fn split_off(&mut self, at: u64) -> Option<Segment> {
        if !self.envelops(at) {
            return None;
        }
        let back = Segment {
            start: at,
            end: self.end,
            annotations: self.annotations.clone(),
        };
        self.end = Bound::At(at);
        Some(back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_ordering() {
        assert!(Bound::At(u64::MAX) < Bound::Unbounded);
        assert!(Bound::At(3) < Bound::At(4));
        assert_eq!(Bound::Unbounded.position(), None);
    }

    #[test]
    fn test_envelops_excludes_bounds() {
        let segment = Segment::new(10, 20);
        assert!(!segment.envelops(10));
        assert!(segment.envelops(11));
        assert!(!segment.envelops(20));
        assert!(segment.contains(10));
        assert!(!segment.contains(20));
        assert!(Segment::whole().envelops(u64::MAX));
    }

    #[test]
    fn test_split_off_inherits_annotations() {
        let id = Iri::new("urn:test:a");
        let mut front = Segment::whole();
        front.annotations.insert(id);

        assert!(front.split_off(0).is_none());
        let back = front.split_off(42).unwrap();
        assert_eq!(front.end, Bound::At(42));
        assert_eq!(back.start, 42);
        assert_eq!(back.end, Bound::Unbounded);
        assert!(back.has(id));
        assert_eq!(back.len(), 1);
    }
}
