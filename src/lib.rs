//! Layout resolution for declarative S7 structural types.
//!
//! A structural type is an ordered field table in which each field may
//! carry S7 layout metadata (protocol tag, byte offset, bit offset,
//! declared size, array length). [`LayoutResolver`] walks that table in
//! declaration order and produces a flat [`LayoutResult`]: the total
//! byte-block size plus one [`FieldDescriptor`] per annotated field,
//! reproducing the device's in-memory layout rules — nested structs
//! embedded by value or replicated as arrays, and single-bit flags
//! packed into a shared byte.
//!
//! The byte-level read/write codec and the transport that exchanges the
//! block with a controller are separate collaborators; they consume the
//! resolved layout and the per-field [`Serializer`] bindings.
//!
//! ```
//! use s7_layout::{
//!     ElementType, FieldKind, FieldMetadata, LayoutResolver, S7Type, StructType,
//! };
//!
//! let ty = StructType::builder("Pump")
//!     .field(
//!         "running",
//!         FieldKind::Scalar(ElementType::Bool),
//!         FieldMetadata::new(S7Type::Bool, 0),
//!     )
//!     .field(
//!         "pressure",
//!         FieldKind::Scalar(ElementType::Real),
//!         FieldMetadata::new(S7Type::Real, 1),
//!     )
//!     .build();
//!
//! let layout = LayoutResolver::new().resolve(&ty)?;
//! assert_eq!(layout.block_size, 5);
//! assert_eq!(layout.entries.len(), 2);
//! # Ok::<(), s7_layout::Error>(())
//! ```

mod error;
mod resolver;
mod schema;
mod serializer;
mod types;

pub use error::{Error, Result};
pub use resolver::{FieldDescriptor, LayoutResolver, LayoutResult, MAX_NESTING_DEPTH};
pub use schema::{
    FieldDef, FieldKind, FieldMetadata, S7Described, StructType, StructTypeBuilder,
};
pub use serializer::{
    ResolvedSerializer, Serializer, SerializerFactory, SerializerRegistry, TypeFootprint,
};
pub use types::{ElementType, S7Type};
