//! FlatItem: live flat projection of one linked-data resource
//!
//! A flat item walks a fixed dependency graph starting at its underlying
//! resource:
//!
//! ```text
//! annotation --(oa:hasBody)----> class | item
//! annotation --(oa:hasTarget)--> target
//! target -----(oa:hasSource)---> source
//! target -----(oa:hasSelector)-> positionSelector | quoteSelector
//! positionSelector --(oa:start, oa:end)--> startPosition, endPosition
//! quoteSelector --(oa:exact, oa:prefix, oa:suffix)--> text, prefix, suffix
//! class --(skos:related)--> relatedClass ; (labels)--> classLabel, cssClass
//! item --(labels)--> label
//! underlying --(dcterms:creator, dcterms:created)--> creator, created, isOwn
//! ```
//!
//! Each arrow is a named [`Slot`] holding the resource it currently watches.
//! When the upstream field changes the slot is replaced, which drops the old
//! subscription. The owning collection routes store events to the item by
//! looking at [`FlatItem::watched`].
//!
//! Completion is tracked with two bitmasks. `fulfilled` bits are set when a
//! tracked field receives its first value and are never cleared. `assumed`
//! bits are granted by the role for fields that will never arrive, and are
//! withdrawn when the graph proves such a field applicable after all. The
//! item completes once `fulfilled | assumed` covers every bit.

use indexmap::IndexMap;
use std::cell::OnceCell;
use std::rc::Rc;
use tracing::{debug, trace};

use super::context::FlatContext;
use super::field::{CompletionFlags, Field, FlatValue};
use super::labels::{css_class_name, get_label};
use super::role::ResourceRole;
use crate::ld::ns::{dcterms, oa, skos};
use crate::ld::{Iri, Literal, Store, StoreEvent, Term};

/// Notification emitted by a flat item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlatEvent {
    Changed(Field),
    /// Fired at most once per item.
    Complete,
}

/// Subscription slot of the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
    Underlying,
    Annotation,
    Class,
    RelatedClass,
    Item,
    Target,
    /// Selector listed by the target whose type has not arrived yet.
    PendingSelector(Iri),
    PositionSelector,
    QuoteSelector,
}

#[derive(Debug)]
pub struct FlatItem {
    underlying: Iri,
    role: Option<ResourceRole>,
    fields: [Option<FlatValue>; Field::COUNT],
    fulfilled: CompletionFlags,
    assumed: CompletionFlags,
    completed: bool,
    slots: IndexMap<Slot, Iri>,
    nlp_class: bool,
    related_css: Option<String>,
    category_prefix: Rc<str>,
    filter_cache: OnceCell<Rc<[String]>>,
}

impl FlatItem {
    /// Start flattening `underlying`. Whatever the store already knows is
    /// picked up immediately; the rest arrives through
    /// [`handle_store_event`](Self::handle_store_event).
    pub fn new(underlying: Iri, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) -> Self {
        let mut item = Self {
            underlying,
            role: None,
            fields: std::array::from_fn(|_| None),
            fulfilled: CompletionFlags::empty(),
            assumed: CompletionFlags::empty(),
            completed: false,
            slots: IndexMap::new(),
            nlp_class: false,
            related_css: None,
            category_prefix: Rc::from(ctx.config.category_prefix.as_str()),
            filter_cache: OnceCell::new(),
        };
        item.slots.insert(Slot::Underlying, underlying);
        item.set(Field::Id, Some(FlatValue::Node(underlying)), ctx, events);
        item.refresh(Slot::Underlying, ctx, events);
        item.check_completion(events);
        item
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn underlying(&self) -> Iri {
        self.underlying
    }

    pub fn role(&self) -> Option<ResourceRole> {
        self.role
    }

    pub fn get(&self, field: Field) -> Option<&FlatValue> {
        self.fields[field.index()].as_ref()
    }

    pub fn has(&self, field: Field) -> bool {
        self.fields[field.index()].is_some()
    }

    /// All fields that currently hold a value, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &FlatValue)> {
        Field::ALL
            .iter()
            .filter_map(|f| self.get(*f).map(|value| (*f, value)))
    }

    pub fn node(&self, field: Field) -> Option<Iri> {
        self.get(field).and_then(FlatValue::as_node)
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FlatValue::as_text)
    }

    pub fn start_position(&self) -> Option<u64> {
        self.get(Field::StartPosition).and_then(FlatValue::as_position)
    }

    pub fn end_position(&self) -> Option<u64> {
        self.get(Field::EndPosition).and_then(FlatValue::as_position)
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Bits counted toward completion so far.
    pub fn completion_flags(&self) -> CompletionFlags {
        self.fulfilled | self.assumed
    }

    /// Resources this item currently listens to, without duplicates.
    pub fn watched(&self) -> Vec<Iri> {
        let mut ids: Vec<Iri> = Vec::with_capacity(self.slots.len());
        for id in self.slots.values() {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }

    pub fn watches(&self, id: Iri) -> bool {
        self.slots.values().any(|watched| *watched == id)
    }

    // =========================================================================
    // Filter classes
    // =========================================================================

    /// Category tags for filtering views. The same `Rc` is returned until a
    /// field the tags depend on changes.
    pub fn filter_classes(&self) -> Rc<[String]> {
        self.filter_cache
            .get_or_init(|| self.compute_filter_classes())
            .clone()
    }

    fn compute_filter_classes(&self) -> Rc<[String]> {
        let Some(css) = self.text(Field::CssClass) else {
            return Rc::from(Vec::new());
        };
        let category = |tag: &str| format!("{}{tag}", self.category_prefix);
        if self.nlp_class {
            return Rc::from(vec![css.to_string(), category("is-nlp")]);
        }
        let mut classes = vec![css.to_string(), category("is-semantic")];
        if let Some(related) = &self.related_css {
            classes.push(related.clone());
        }
        if self.has(Field::Annotation) {
            let unverified = self
                .get(Field::NeedsVerification)
                .and_then(FlatValue::as_flag)
                .unwrap_or(false);
            classes.push(category(if unverified { "unverified" } else { "verified" }));
            if let Some(own) = self.get(Field::IsOwn).and_then(FlatValue::as_flag) {
                classes.push(category(if own { "self-made" } else { "other-made" }));
            }
        }
        Rc::from(classes)
    }

    // =========================================================================
    // Event intake
    // =========================================================================

    /// React to a property change of any resource this item watches.
    pub fn handle_store_event(
        &mut self,
        event: &StoreEvent,
        ctx: &FlatContext<'_>,
        events: &mut Vec<FlatEvent>,
    ) {
        let id = event.id();
        let slots: Vec<Slot> = self
            .slots
            .iter()
            .filter(|(_, watched)| **watched == id)
            .map(|(slot, _)| *slot)
            .collect();
        for slot in slots {
            // An earlier refresh may have replaced this slot.
            if self.slots.get(&slot) != Some(&id) {
                continue;
            }
            trace!(item = %self.underlying, ?slot, property = %event.property(), "refresh");
            self.refresh(slot, ctx, events);
        }
        self.check_completion(events);
    }

    fn refresh(&mut self, slot: Slot, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        match slot {
            Slot::Underlying => self.refresh_underlying(ctx, events),
            Slot::Annotation => self.refresh_annotation(ctx, events),
            Slot::Class => self.refresh_class(ctx, events),
            Slot::RelatedClass => self.refresh_related(ctx),
            Slot::Item => self.refresh_item(ctx, events),
            Slot::Target | Slot::PendingSelector(_) => self.refresh_target(ctx, events),
            Slot::PositionSelector => self.refresh_position(ctx, events),
            Slot::QuoteSelector => self.refresh_quote(ctx, events),
        }
    }

    // =========================================================================
    // Field updates
    // =========================================================================

    fn set(
        &mut self,
        field: Field,
        value: Option<FlatValue>,
        ctx: &FlatContext<'_>,
        events: &mut Vec<FlatEvent>,
    ) {
        if self.fields[field.index()] == value {
            return;
        }
        let present = value.is_some();
        self.fields[field.index()] = value;
        if present {
            self.fulfil(field.completion_flag());
        }
        if field.affects_filter() {
            self.filter_cache.take();
        }
        events.push(FlatEvent::Changed(field));
        self.on_changed(field, ctx, events);
    }

    fn clear(&mut self, fields: &[Field], ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        for field in fields {
            self.set(*field, None, ctx, events);
        }
    }

    /// Rewire the dependency graph after `field` changed.
    fn on_changed(&mut self, field: Field, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        let node = self.node(field);
        match field {
            Field::Annotation => {
                self.watch(Slot::Annotation, node);
                match node {
                    Some(_) => self.refresh_annotation(ctx, events),
                    None => self.clear(
                        &[Field::Class, Field::Item, Field::Target, Field::NeedsVerification],
                        ctx,
                        events,
                    ),
                }
            }
            Field::Class => {
                self.watch(Slot::Class, node);
                self.nlp_class = node.is_some_and(|class| ctx.namespaces.is_nlp(class));
                match node {
                    Some(_) => {
                        self.revoke(CompletionFlags::CSS_CLASS);
                        self.refresh_class(ctx, events);
                    }
                    None => self.clear(
                        &[Field::ClassLabel, Field::CssClass, Field::RelatedClass],
                        ctx,
                        events,
                    ),
                }
            }
            Field::RelatedClass => {
                self.watch(Slot::RelatedClass, node);
                self.refresh_related(ctx);
            }
            Field::Item => {
                self.watch(Slot::Item, node);
                match node {
                    Some(_) => {
                        self.revoke(CompletionFlags::LABEL);
                        self.refresh_item(ctx, events);
                    }
                    None => self.clear(&[Field::Label], ctx, events),
                }
            }
            Field::Target => {
                self.watch(Slot::Target, node);
                match node {
                    Some(_) => {
                        self.revoke(CompletionFlags::TARGET);
                        self.refresh_target(ctx, events);
                    }
                    None => {
                        self.slots.retain(|slot, _| !matches!(slot, Slot::PendingSelector(_)));
                        self.clear(
                            &[Field::Source, Field::PositionSelector, Field::QuoteSelector],
                            ctx,
                            events,
                        );
                    }
                }
            }
            Field::PositionSelector => {
                self.watch(Slot::PositionSelector, node);
                match node {
                    Some(_) => {
                        self.revoke(CompletionFlags::POSITION);
                        self.refresh_position(ctx, events);
                    }
                    None => self.clear(&[Field::StartPosition, Field::EndPosition], ctx, events),
                }
            }
            Field::QuoteSelector => {
                self.watch(Slot::QuoteSelector, node);
                match node {
                    Some(_) => {
                        self.revoke(CompletionFlags::TEXT);
                        self.refresh_quote(ctx, events);
                    }
                    None => self.clear(&[Field::Text, Field::Prefix, Field::Suffix], ctx, events),
                }
            }
            Field::Creator => self.refresh_ownership(ctx, events),
            _ => {}
        }
    }

    fn watch(&mut self, slot: Slot, target: Option<Iri>) {
        match target {
            Some(id) => {
                self.slots.insert(slot, id);
            }
            None => {
                self.slots.shift_remove(&slot);
            }
        }
    }

    // =========================================================================
    // Slot refreshers
    // =========================================================================

    fn refresh_underlying(&mut self, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        let store = ctx.store;
        let id = self.underlying;
        let creator = store.get(id, dcterms::CREATOR).iter().find_map(Term::as_node);
        self.set(Field::Creator, creator.map(FlatValue::Node), ctx, events);
        let created = first_literal(store, id, dcterms::CREATED).and_then(created_value);
        self.set(Field::Created, created, ctx, events);

        match self.role {
            None => {
                let role = store
                    .resource(id)
                    .and_then(|resource| ResourceRole::classify(resource, ctx.namespaces));
                if let Some(role) = role {
                    self.take_role(role, ctx, events);
                }
            }
            Some(ResourceRole::BareItem) => self.resolve_item_class(ctx, events),
            Some(_) => {}
        }
    }

    fn take_role(&mut self, role: ResourceRole, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        debug!(item = %self.underlying, ?role, "classified");
        self.role = Some(role);
        // Assume first so that the walk below can withdraw what it disproves.
        self.assume(role.assumed());
        self.set(role.field(), Some(FlatValue::Node(self.underlying)), ctx, events);
        if role == ResourceRole::BareItem {
            self.resolve_item_class(ctx, events);
        }
    }

    fn resolve_item_class(&mut self, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        let class_type = ctx
            .store
            .resource(self.underlying)
            .and_then(|resource| resource.types().next());
        if let Some(class_type) = class_type {
            let class = ctx.resolver.obtain(class_type);
            self.set(Field::Class, Some(FlatValue::Node(class)), ctx, events);
        }
    }

    fn refresh_annotation(&mut self, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        let Some(annotation) = self.node(Field::Annotation) else {
            return;
        };
        let store = ctx.store;
        let mut class = None;
        let mut item = None;
        for body in store.get(annotation, oa::HAS_BODY).iter().filter_map(Term::as_node) {
            if body.is_blank() || ctx.namespaces.is_item(body) {
                item.get_or_insert(body);
            } else {
                class.get_or_insert(body);
            }
        }
        self.set(Field::Class, class.map(FlatValue::Node), ctx, events);
        self.set(Field::Item, item.map(FlatValue::Node), ctx, events);

        let needs_verification = first_literal(store, annotation, ctx.namespaces.needs_verification())
            .and_then(Literal::as_bool);
        self.set(
            Field::NeedsVerification,
            needs_verification.map(FlatValue::Flag),
            ctx,
            events,
        );

        let target = store.get(annotation, oa::HAS_TARGET).iter().find_map(Term::as_node);
        self.set(Field::Target, target.map(FlatValue::Node), ctx, events);
    }

    fn refresh_class(&mut self, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        let Some(class) = self.node(Field::Class) else {
            return;
        };
        let label = get_label(ctx.store, ctx.namespaces, &ctx.config.languages, class);
        let css = css_class_name(class, &label, ctx.namespaces, ctx.config);
        let related = ctx.store.get(class, skos::RELATED).iter().find_map(Term::as_node);
        self.set(Field::ClassLabel, Some(FlatValue::Text(label)), ctx, events);
        self.set(Field::CssClass, css.map(FlatValue::Text), ctx, events);
        self.set(Field::RelatedClass, related.map(FlatValue::Node), ctx, events);
    }

    fn refresh_related(&mut self, ctx: &FlatContext<'_>) {
        let css = self.node(Field::RelatedClass).and_then(|related| {
            let label = get_label(ctx.store, ctx.namespaces, &ctx.config.languages, related);
            css_class_name(related, &label, ctx.namespaces, ctx.config)
        });
        if css != self.related_css {
            self.related_css = css;
            self.filter_cache.take();
        }
    }

    fn refresh_item(&mut self, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        let Some(item) = self.node(Field::Item) else {
            return;
        };
        let label = get_label(ctx.store, ctx.namespaces, &ctx.config.languages, item);
        self.set(Field::Label, Some(FlatValue::Text(label)), ctx, events);
    }

    fn refresh_target(&mut self, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        let Some(target) = self.node(Field::Target) else {
            return;
        };
        let store = ctx.store;
        let source = store.get(target, oa::HAS_SOURCE).iter().find_map(Term::as_node);
        self.set(Field::Source, source.map(FlatValue::Node), ctx, events);

        let mut position = None;
        let mut quote = None;
        let mut pending = Vec::new();
        for selector in store.get(target, oa::HAS_SELECTOR).iter().filter_map(Term::as_node) {
            match store.resource(selector) {
                Some(r) if r.has_type(oa::TEXT_POSITION_SELECTOR) => {
                    position.get_or_insert(selector);
                }
                Some(r) if r.has_type(oa::TEXT_QUOTE_SELECTOR) => {
                    quote.get_or_insert(selector);
                }
                // Selector kinds without flat fields.
                Some(r) if r.types().next().is_some() => {}
                _ => pending.push(selector),
            }
        }
        self.slots.retain(|slot, _| !matches!(slot, Slot::PendingSelector(_)));
        for selector in pending {
            self.slots.insert(Slot::PendingSelector(selector), selector);
        }
        self.set(Field::PositionSelector, position.map(FlatValue::Node), ctx, events);
        self.set(Field::QuoteSelector, quote.map(FlatValue::Node), ctx, events);
    }

    fn refresh_position(&mut self, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        let Some(selector) = self.node(Field::PositionSelector) else {
            return;
        };
        let start = position_of(ctx.store, selector, oa::START);
        let end = position_of(ctx.store, selector, oa::END);
        self.set(Field::StartPosition, start.map(FlatValue::Position), ctx, events);
        self.set(Field::EndPosition, end.map(FlatValue::Position), ctx, events);
    }

    fn refresh_quote(&mut self, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        let Some(selector) = self.node(Field::QuoteSelector) else {
            return;
        };
        for (property, field) in [
            (oa::EXACT, Field::Text),
            (oa::PREFIX, Field::Prefix),
            (oa::SUFFIX, Field::Suffix),
        ] {
            let value = first_literal(ctx.store, selector, property)
                .and_then(Literal::as_text)
                .map(|text| FlatValue::Text(text.to_string()));
            self.set(field, value, ctx, events);
        }
    }

    fn refresh_ownership(&mut self, ctx: &FlatContext<'_>, events: &mut Vec<FlatEvent>) {
        let own = self
            .node(Field::Creator)
            .map(|creator| ctx.identity.current_user() == Some(creator));
        self.set(Field::IsOwn, own.map(FlatValue::Flag), ctx, events);
    }

    // =========================================================================
    // Completion
    // =========================================================================

    fn fulfil(&mut self, flags: CompletionFlags) {
        if !self.completed {
            self.fulfilled |= flags;
        }
    }

    fn assume(&mut self, flags: CompletionFlags) {
        if !self.completed {
            self.assumed |= flags;
        }
    }

    fn revoke(&mut self, flags: CompletionFlags) {
        if !self.completed {
            self.assumed.remove(flags);
        }
    }

    fn check_completion(&mut self, events: &mut Vec<FlatEvent>) {
        if self.completed || !self.completion_flags().is_all() {
            return;
        }
        self.completed = true;
        debug!(item = %self.underlying, "complete");
        events.push(FlatEvent::Complete);
    }
}

fn first_literal(store: &Store, id: Iri, property: impl Into<Iri>) -> Option<&Literal> {
    store.get(id, property).iter().find_map(Term::as_literal)
}

fn position_of(store: &Store, selector: Iri, property: &str) -> Option<u64> {
    first_literal(store, selector, property)
        .and_then(Literal::as_integer)
        .and_then(|n| u64::try_from(n).ok())
}

fn created_value(literal: &Literal) -> Option<FlatValue> {
    match literal.as_date() {
        Some(date) => Some(FlatValue::Date(date)),
        None => literal.as_text().map(|text| FlatValue::Text(text.to_string())),
    }
}
