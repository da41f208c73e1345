//! Flat fields, their values and the completion bitmask

use bitflags::bitflags;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::ld::Iri;

/// Named output field of a flat item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    Class,
    ClassLabel,
    CssClass,
    Item,
    Label,
    Annotation,
    Target,
    Source,
    PositionSelector,
    StartPosition,
    EndPosition,
    QuoteSelector,
    Text,
    Prefix,
    Suffix,
    Creator,
    Created,
    IsOwn,
    RelatedClass,
    NeedsVerification,
}

impl Field {
    pub const COUNT: usize = 21;

    pub const ALL: [Field; Field::COUNT] = [
        Field::Id,
        Field::Class,
        Field::ClassLabel,
        Field::CssClass,
        Field::Item,
        Field::Label,
        Field::Annotation,
        Field::Target,
        Field::Source,
        Field::PositionSelector,
        Field::StartPosition,
        Field::EndPosition,
        Field::QuoteSelector,
        Field::Text,
        Field::Prefix,
        Field::Suffix,
        Field::Creator,
        Field::Created,
        Field::IsOwn,
        Field::RelatedClass,
        Field::NeedsVerification,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Class => "class",
            Field::ClassLabel => "classLabel",
            Field::CssClass => "cssClass",
            Field::Item => "item",
            Field::Label => "label",
            Field::Annotation => "annotation",
            Field::Target => "target",
            Field::Source => "source",
            Field::PositionSelector => "positionSelector",
            Field::StartPosition => "startPosition",
            Field::EndPosition => "endPosition",
            Field::QuoteSelector => "quoteSelector",
            Field::Text => "text",
            Field::Prefix => "prefix",
            Field::Suffix => "suffix",
            Field::Creator => "creator",
            Field::Created => "created",
            Field::IsOwn => "isOwn",
            Field::RelatedClass => "relatedClass",
            Field::NeedsVerification => "needsVerification",
        }
    }

    pub fn parse(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    /// Completion bit fulfilled by the first value of this field.
    pub fn completion_flag(self) -> CompletionFlags {
        match self {
            Field::Id => CompletionFlags::ID,
            Field::CssClass => CompletionFlags::CSS_CLASS,
            Field::Label => CompletionFlags::LABEL,
            Field::Source => CompletionFlags::SOURCE,
            Field::StartPosition => CompletionFlags::START_POSITION,
            Field::EndPosition => CompletionFlags::END_POSITION,
            Field::Text => CompletionFlags::TEXT,
            _ => CompletionFlags::empty(),
        }
    }

    /// Whether a change of this field can alter the filter classes.
    pub fn affects_filter(self) -> bool {
        matches!(
            self,
            Field::Annotation
                | Field::Class
                | Field::CssClass
                | Field::RelatedClass
                | Field::NeedsVerification
                | Field::IsOwn
        )
    }
}

bitflags! {
    /// One bit per field tracked for completion.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CompletionFlags: u8 {
        const ID             = 1 << 0;
        const CSS_CLASS      = 1 << 1;
        const LABEL          = 1 << 2;
        const SOURCE         = 1 << 3;
        const START_POSITION = 1 << 4;
        const END_POSITION   = 1 << 5;
        const TEXT           = 1 << 6;

        const POSITION = Self::START_POSITION.bits() | Self::END_POSITION.bits();
        const TARGET   = Self::SOURCE.bits() | Self::POSITION.bits() | Self::TEXT.bits();
    }
}

/// Derived value of a flat field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FlatValue {
    Node(Iri),
    Text(String),
    Position(u64),
    Date(DateTime<FixedOffset>),
    Flag(bool),
}

impl FlatValue {
    pub fn as_node(&self) -> Option<Iri> {
        match self {
            FlatValue::Node(iri) => Some(*iri),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FlatValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_position(&self) -> Option<u64> {
        match self {
            FlatValue::Position(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FlatValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            FlatValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}
