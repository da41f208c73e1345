//! Flattening of linked-data resources
//!
//! - `field.rs` - Field names, values and the completion bitmask
//! - `role.rs` - Resource roles decided from the underlying type
//! - `labels.rs` - Labels and css class names
//! - `context.rs` - Store access and injected services
//! - `item.rs` - FlatItem: one resource and its dependency graph
//! - `collection.rs` - FlatItemCollection: flat items mirrored from a graph

pub mod field;
pub mod role;
pub mod labels;
pub mod context;
pub mod item;
pub mod collection;

pub use field::{CompletionFlags, Field, FlatValue};
pub use role::ResourceRole;
pub use context::{ClassResolver, DirectClassResolver, FlatContext, IdentityProvider};
pub use item::{FlatEvent, FlatItem};
pub use collection::{Admission, CollectionEvent, FlatItemCollection};

#[cfg(test)]
pub(crate) mod tests;
