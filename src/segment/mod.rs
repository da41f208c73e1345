//! Text segmentation by annotation coverage
//!
//! - `model.rs` - Segment and its upper Bound
//! - `index.rs` - SegmentIndex: sorted, contiguous segments kept in sync with
//!   a flat annotation collection

pub mod model;
pub mod index;

pub use model::{Bound, Segment};
pub use index::{SegmentEvent, SegmentIndex};

#[cfg(test)]
mod tests;
