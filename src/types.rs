use crate::schema::StructType;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// S7 protocol data types a field may be declared with (closed set).
///
/// Each tag carries a fixed wire footprint. `Bool` is the single
/// bit-sized tag: it occupies a fraction of a byte and may share that
/// byte with sibling `Bool` fields declared at the same byte offset.
/// `Struct` and `String` have no intrinsic byte footprint; their size is
/// derived (recursively resolved sub-block) or declared explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum S7Type {
    Bool,
    Byte,
    Char,
    Word,
    Int,
    DWord,
    DInt,
    Real,
    Date,
    TimeOfDay,
    Time,
    S5Time,
    DateTime,
    String,
    Struct,
}

impl S7Type {
    /// Intrinsic number of bytes one element of this type occupies on
    /// the wire. Zero for the derived-size tags (`Struct`, `String`) and
    /// for the bit-sized `Bool`.
    #[inline]
    pub fn byte_size(self) -> u32 {
        match self {
            S7Type::Bool | S7Type::String | S7Type::Struct => 0,
            S7Type::Byte | S7Type::Char => 1,
            S7Type::Word | S7Type::Int | S7Type::Date | S7Type::S5Time => 2,
            S7Type::DWord | S7Type::DInt | S7Type::Real | S7Type::TimeOfDay | S7Type::Time => 4,
            S7Type::DateTime => 8,
        }
    }

    /// Intrinsic number of bits for the bit-sized tag, zero otherwise.
    #[inline]
    pub fn bit_size(self) -> u8 {
        match self {
            S7Type::Bool => 1,
            _ => 0,
        }
    }
}

/// Resolved host-side element kind of a field.
///
/// For array fields this is the *element* kind. Nested structural types
/// carry their full description so the downstream codec can recurse.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    Bool,
    Byte,
    Char,
    Word,
    Int,
    DWord,
    DInt,
    Real,
    Date,
    TimeOfDay,
    Time,
    S5Time,
    DateTime,
    String,
    Struct(Arc<StructType>),
}

impl ElementType {
    /// The nested structural type, if this element is one.
    #[inline]
    pub fn as_struct(&self) -> Option<&Arc<StructType>> {
        match self {
            ElementType::Struct(ty) => Some(ty),
            _ => None,
        }
    }
}
