//! Collaborators a flat item reads from
//!
//! Flat items never own their inputs. Every call into an item receives a
//! `FlatContext` borrowing the store plus the injected identity and class
//! resolution services.

use crate::config::AnnoConfig;
use crate::ld::{Iri, Namespaces, Store};

/// Who is using the application right now; decides `isOwn`.
pub trait IdentityProvider {
    fn current_user(&self) -> Option<Iri>;
}

impl IdentityProvider for Option<Iri> {
    fn current_user(&self) -> Option<Iri> {
        *self
    }
}

impl IdentityProvider for Iri {
    fn current_user(&self) -> Option<Iri> {
        Some(*self)
    }
}

/// Maps the type of a bare item to the resource describing that class.
/// The returned class may not have any data in the store yet.
pub trait ClassResolver {
    fn obtain(&self, class_type: Iri) -> Iri;
}

/// Resolves every type to itself: classes are stored under their own IRI.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectClassResolver;

impl ClassResolver for DirectClassResolver {
    fn obtain(&self, class_type: Iri) -> Iri {
        class_type
    }
}

impl<F> ClassResolver for F
where
    F: Fn(Iri) -> Iri,
{
    fn obtain(&self, class_type: Iri) -> Iri {
        self(class_type)
    }
}

#[derive(Clone, Copy)]
pub struct FlatContext<'a> {
    pub store: &'a Store,
    pub namespaces: &'a Namespaces,
    pub config: &'a AnnoConfig,
    pub identity: &'a dyn IdentityProvider,
    pub resolver: &'a dyn ClassResolver,
}

impl<'a> FlatContext<'a> {
    pub fn new(
        store: &'a Store,
        namespaces: &'a Namespaces,
        config: &'a AnnoConfig,
        identity: &'a dyn IdentityProvider,
        resolver: &'a dyn ClassResolver,
    ) -> Self {
        Self {
            store,
            namespaces,
            config,
            identity,
            resolver,
        }
    }
}
