use crate::error::{Error, Result};
use crate::types::S7Type;
use std::collections::HashMap;
use std::result::Result as StdResult;

/// Serializer instance bound to a resolved field.
///
/// This is the boundary handed to the downstream read/write codec: a
/// closed variant per protocol tag, dispatched by pattern matching. The
/// byte/bit conversion bodies live with the codec, not here; the layout
/// resolver only consumes the footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Serializer {
    Bit,
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
    S7String,
    Struct,
}

impl Serializer {
    /// Wire footprint in bytes per element. Zero for the bit serializer
    /// (byte reservation is handled by the resolver's bit packing) and
    /// for derived-size serializers.
    #[inline]
    pub fn size_in_bytes(self) -> u32 {
        match self {
            Serializer::Bit | Serializer::S7String | Serializer::Struct => 0,
            Serializer::Byte | Serializer::Char => 1,
            Serializer::Word | Serializer::Int | Serializer::Date | Serializer::S5Time => 2,
            Serializer::DWord
            | Serializer::DInt
            | Serializer::Real
            | Serializer::TimeOfDay
            | Serializer::Time => 4,
            Serializer::DateTime => 8,
        }
    }

    /// Wire footprint in bits; non-zero only for the bit serializer.
    #[inline]
    pub fn size_in_bits(self) -> u8 {
        match self {
            Serializer::Bit => 1,
            _ => 0,
        }
    }
}

/// Factory producing a fresh serializer instance for one field.
/// Construction may fail for misconfigured custom registrations.
pub type SerializerFactory = fn() -> StdResult<Serializer, &'static str>;

/// Fixed wire footprint a registry entry declares for its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeFootprint {
    /// Bytes per element, 0 when derived
    pub byte_size: u32,
    /// Bits per element, non-zero only for the bit-sized tag
    pub bit_size: u8,
}

#[derive(Debug, Clone, Copy)]
struct RegistryEntry {
    footprint: TypeFootprint,
    factory: SerializerFactory,
}

/// Serializer resolved for one field, together with its footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSerializer {
    pub serializer: Serializer,
    pub byte_size: u32,
    pub bit_size: u8,
}

/// Registry mapping each protocol tag to a serializer factory and its
/// fixed footprint.
///
/// Populate fully before resolution starts; the registry is read-only
/// during resolution and safe to share across threads (factories are
/// plain `fn` pointers).
#[derive(Debug, Clone)]
pub struct SerializerRegistry {
    entries: HashMap<S7Type, RegistryEntry>,
}

impl SerializerRegistry {
    /// Empty registry; every tag resolves to `Error::UnknownType` until
    /// registered.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry carrying the full closed protocol type set with its
    /// intrinsic footprints.
    pub fn with_defaults() -> Self {
        let mut reg = Self::empty();
        for (tag, factory) in DEFAULT_FACTORIES {
            reg.register(*tag, tag.byte_size(), tag.bit_size(), *factory);
        }
        reg
    }

    /// Register or replace the entry for `tag`.
    pub fn register(
        &mut self,
        tag: S7Type,
        byte_size: u32,
        bit_size: u8,
        factory: SerializerFactory,
    ) {
        self.entries.insert(
            tag,
            RegistryEntry {
                footprint: TypeFootprint {
                    byte_size,
                    bit_size,
                },
                factory,
            },
        );
    }

    /// Produce a fresh serializer instance for `tag` along with its
    /// registered footprint. One instance is allocated per call; fields
    /// never share serializers.
    pub fn resolve_for(&self, tag: S7Type) -> Result<ResolvedSerializer> {
        let entry = self
            .entries
            .get(&tag)
            .ok_or(Error::UnknownType { tag })?;
        let serializer =
            (entry.factory)().map_err(|context| Error::SerializerConstruction { tag, context })?;
        Ok(ResolvedSerializer {
            serializer,
            byte_size: entry.footprint.byte_size,
            bit_size: entry.footprint.bit_size,
        })
    }
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

const DEFAULT_FACTORIES: &[(S7Type, SerializerFactory)] = &[
    (S7Type::Bool, || Ok(Serializer::Bit)),
    (S7Type::Byte, || Ok(Serializer::Byte)),
    (S7Type::Char, || Ok(Serializer::Char)),
    (S7Type::Word, || Ok(Serializer::Word)),
    (S7Type::Int, || Ok(Serializer::Int)),
    (S7Type::DWord, || Ok(Serializer::DWord)),
    (S7Type::DInt, || Ok(Serializer::DInt)),
    (S7Type::Real, || Ok(Serializer::Real)),
    (S7Type::Date, || Ok(Serializer::Date)),
    (S7Type::TimeOfDay, || Ok(Serializer::TimeOfDay)),
    (S7Type::Time, || Ok(Serializer::Time)),
    (S7Type::S5Time, || Ok(Serializer::S5Time)),
    (S7Type::DateTime, || Ok(Serializer::DateTime)),
    (S7Type::String, || Ok(Serializer::S7String)),
    (S7Type::Struct, || Ok(Serializer::Struct)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_tag_with_intrinsic_footprint() {
        let reg = SerializerRegistry::with_defaults();
        for (tag, _) in DEFAULT_FACTORIES {
            let r = reg.resolve_for(*tag).unwrap();
            assert_eq!(r.byte_size, tag.byte_size());
            assert_eq!(r.bit_size, tag.bit_size());
            assert_eq!(r.serializer.size_in_bytes(), tag.byte_size());
            assert_eq!(r.serializer.size_in_bits(), tag.bit_size());
        }
    }

    #[test]
    fn unknown_tag_fails() {
        let reg = SerializerRegistry::empty();
        assert!(matches!(
            reg.resolve_for(S7Type::Word),
            Err(Error::UnknownType { tag: S7Type::Word })
        ));
    }

    #[test]
    fn failing_factory_surfaces_construction_error() {
        let mut reg = SerializerRegistry::empty();
        reg.register(S7Type::Real, 4, 0, || Err("abstract serializer"));
        assert!(matches!(
            reg.resolve_for(S7Type::Real),
            Err(Error::SerializerConstruction {
                tag: S7Type::Real,
                context: "abstract serializer",
            })
        ));
    }
}
