use crate::types::{ElementType, S7Type};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Layout metadata attached to a field of a structural type.
///
/// Mirrors the declaration site of the external device description:
/// protocol tag, byte offset, bit offset (0..=7), explicit size in bytes
/// (0 when the size is derived) and array length (1 for scalar fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    /// S7 protocol tag
    pub s7_type: S7Type,
    /// Byte offset within the enclosing block
    pub byte_offset: u32,
    /// Bit index 0..=7 for bit-level access, else 0
    #[serde(default)]
    pub bit_offset: u8,
    /// Explicit size in bytes, 0 when derived
    #[serde(default)]
    pub size: u32,
    /// Number of array elements, 1 for scalar fields
    #[serde(default = "FieldMetadata::default_array_size")]
    pub array_size: u32,
}

impl FieldMetadata {
    fn default_array_size() -> u32 {
        1
    }

    /// Metadata with defaults: bit offset 0, no explicit size, scalar.
    pub fn new(s7_type: S7Type, byte_offset: u32) -> Self {
        Self {
            s7_type,
            byte_offset,
            bit_offset: 0,
            size: 0,
            array_size: 1,
        }
    }

    /// Configure the bit index for bit-level fields.
    #[inline]
    pub fn with_bit_offset(mut self, bit_offset: u8) -> Self {
        self.bit_offset = bit_offset;
        self
    }

    /// Configure an explicit size in bytes.
    #[inline]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Configure the array length.
    #[inline]
    pub fn with_array_size(mut self, array_size: u32) -> Self {
        self.array_size = array_size;
        self
    }
}

/// Declared shape of a field: a single element or an array of elements.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Scalar(ElementType),
    Array(ElementType),
}

impl FieldKind {
    /// The element type, unwrapped for arrays.
    #[inline]
    pub fn element(&self) -> &ElementType {
        match self {
            FieldKind::Scalar(e) | FieldKind::Array(e) => e,
        }
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, FieldKind::Array(_))
    }
}

/// One field of a structural type. Only fields carrying metadata
/// participate in layout resolution; the rest are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    name: String,
    kind: FieldKind,
    metadata: Option<FieldMetadata>,
}

impl FieldDef {
    /// Field name, diagnostic only.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[inline]
    pub fn metadata(&self) -> Option<&FieldMetadata> {
        self.metadata.as_ref()
    }
}

/// A structural type: an ordered field table built once and shared.
///
/// This is the statically-declared replacement for runtime type
/// introspection: the declaration site registers each field exactly once
/// through [`StructType::builder`], and the resolver walks the table in
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    name: String,
    fields: Vec<FieldDef>,
}

impl StructType {
    /// Start declaring a structural type.
    pub fn builder(name: impl Into<String>) -> StructTypeBuilder {
        StructTypeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Type name, diagnostic only.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

/// Registration-call builder for [`StructType`]. Declaration order of
/// `field`/`unannotated` calls is the order the resolver walks.
#[derive(Debug)]
pub struct StructTypeBuilder {
    name: String,
    fields: Vec<FieldDef>,
}

impl StructTypeBuilder {
    /// Declare a field that participates in layout resolution.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind, metadata: FieldMetadata) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            kind,
            metadata: Some(metadata),
        });
        self
    }

    /// Declare a field with no layout metadata. The resolver skips it.
    pub fn unannotated(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            kind,
            metadata: None,
        });
        self
    }

    pub fn build(self) -> Arc<StructType> {
        Arc::new(StructType {
            name: self.name,
            fields: self.fields,
        })
    }
}

/// Host types that expose a structural description, built once per type.
///
/// Implementations typically keep the table in a `LazyLock` (or build it
/// in a generated registration function) and hand out clones of the
/// shared `Arc`.
pub trait S7Described {
    fn struct_type() -> Arc<StructType>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_declaration_order_and_skips() {
        let ty = StructType::builder("Mixed")
            .field(
                "flag",
                FieldKind::Scalar(ElementType::Bool),
                FieldMetadata::new(S7Type::Bool, 0),
            )
            .unannotated("scratch", FieldKind::Scalar(ElementType::DInt))
            .field(
                "count",
                FieldKind::Scalar(ElementType::Int),
                FieldMetadata::new(S7Type::Int, 1),
            )
            .build();

        let names: Vec<&str> = ty.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["flag", "scratch", "count"]);
        assert!(ty.fields()[1].metadata().is_none());
    }

    #[test]
    fn metadata_deserializes_from_camel_case_with_defaults() {
        let meta: FieldMetadata =
            serde_json::from_str(r#"{"s7Type":"word","byteOffset":4}"#).unwrap();
        assert_eq!(meta.s7_type, S7Type::Word);
        assert_eq!(meta.byte_offset, 4);
        assert_eq!(meta.bit_offset, 0);
        assert_eq!(meta.size, 0);
        assert_eq!(meta.array_size, 1);
    }
}
