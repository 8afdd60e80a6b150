use crate::types::S7Type;
use std::result::Result as StdResult;
use thiserror::Error as ThisError;

/// Unified result type for layout resolution
pub type Result<T> = StdResult<T, Error>;

#[derive(Debug, ThisError)]
pub enum Error {
    /// A field's protocol tag has no entry in the serializer registry.
    /// Resolution aborts as a whole; no partial layout is produced.
    #[error("no serializer registered for S7 type {tag:?}")]
    UnknownType { tag: S7Type },

    /// The registry recognized the tag but its factory could not produce
    /// a serializer instance.
    #[error("failed to construct serializer for S7 type {tag:?}: {context}")]
    SerializerConstruction {
        tag: S7Type,
        context: &'static str,
    },

    /// A field is tagged `Struct` but its declared kind carries no nested
    /// structural type to recurse into.
    #[error("field `{field}` is tagged Struct but declares no nested structural type")]
    MissingNestedType { field: String },

    /// Structural nesting exceeded the resolver's depth bound. A type
    /// graph that nests itself (directly or indirectly) lands here
    /// instead of exhausting the stack.
    #[error("structural type nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}
