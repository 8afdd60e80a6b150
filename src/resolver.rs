use crate::error::{Error, Result};
use crate::schema::{S7Described, StructType};
use crate::serializer::{Serializer, SerializerRegistry};
use crate::types::{ElementType, S7Type};
use tracing::trace;

/// Depth bound on structural nesting. A type graph that nests itself
/// (directly or indirectly) hits this limit instead of exhausting the
/// stack.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Location and shape of one resolved field within the byte block.
///
/// Created and owned by the resolver during a single pass; read-only for
/// the downstream codec afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Declared field name, diagnostic only
    pub name: String,
    /// Byte offset within the block
    pub byte_offset: u32,
    /// Bit index 0..=7 for bit-level fields, else 0
    pub bit_offset: u8,
    /// Resolved host-side element kind (unwrapped for arrays)
    pub element: ElementType,
    /// Size in bytes: the declared size, or the recursively derived
    /// sub-block size for struct fields with no explicit size
    pub size: u32,
    /// S7 protocol tag
    pub s7_type: S7Type,
    /// Whether the field was declared as an array
    pub is_array: bool,
    /// Number of array elements, 1 for scalar fields
    pub array_size: u32,
    /// Serializer bound to this field, one fresh instance per field
    pub serializer: Serializer,
}

/// Resolved flat layout of a structural type: total block size plus one
/// descriptor per annotated field, in declaration order (never sorted by
/// offset).
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    /// Total number of bytes the block occupies
    pub block_size: u32,
    /// Descriptors in field declaration order
    pub entries: Vec<FieldDescriptor>,
}

/// Resolves structural type descriptions into flat wire layouts.
///
/// Resolution is a pure synchronous walk over the declared field table:
/// it recurses into nested structural types, expands arrays, packs
/// sibling bit fields sharing a byte and binds a serializer per field.
/// Each call produces an independent [`LayoutResult`]; re-resolving the
/// same type yields an identical result, so callers may cache by type
/// identity.
#[derive(Debug, Clone, Default)]
pub struct LayoutResolver {
    registry: SerializerRegistry,
}

impl LayoutResolver {
    /// Resolver over the default protocol type registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver over a caller-provided registry. The registry must be
    /// fully populated before resolution starts.
    pub fn with_registry(registry: SerializerRegistry) -> Self {
        Self { registry }
    }

    /// Resolve a structural type into its flat layout.
    pub fn resolve(&self, ty: &StructType) -> Result<LayoutResult> {
        self.resolve_at(ty, 0)
    }

    /// Resolve the structural type a host type describes.
    pub fn resolve_described<T: S7Described>(&self) -> Result<LayoutResult> {
        self.resolve(&T::struct_type())
    }

    /// Convenience: resolve the structural type of an instance.
    pub fn resolve_instance<T: S7Described>(&self, _value: &T) -> Result<LayoutResult> {
        self.resolve_described::<T>()
    }

    fn resolve_at(&self, ty: &StructType, depth: usize) -> Result<LayoutResult> {
        if depth > MAX_NESTING_DEPTH {
            return Err(Error::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        trace!(ty = ty.name(), depth, "resolving structural type");

        let mut block_size: u32 = 0;
        let mut entries: Vec<FieldDescriptor> = Vec::new();

        for field in ty.fields() {
            // Only annotated fields participate
            let Some(meta) = field.metadata() else {
                continue;
            };
            trace!(
                field = field.name(),
                s7_type = ?meta.s7_type,
                byte_offset = meta.byte_offset,
                bit_offset = meta.bit_offset,
                size = meta.size,
                array_size = meta.array_size,
                "resolving field"
            );

            // Explicit offsets may deliberately skip padding: raise the
            // running size to at least the highest offset seen so far.
            block_size = block_size.max(meta.byte_offset);

            // Recurse into nested structural types; only the sub-block
            // size flows into the parent, the sub-entries stay with the
            // nested resolution.
            let sub = if meta.s7_type == S7Type::Struct {
                let nested =
                    field
                        .kind()
                        .element()
                        .as_struct()
                        .ok_or_else(|| Error::MissingNestedType {
                            field: field.name().to_owned(),
                        })?;
                let sub = self.resolve_at(nested, depth + 1)?;
                if field.kind().is_array() {
                    block_size =
                        block_size.saturating_add(sub.block_size.saturating_mul(meta.array_size));
                } else {
                    block_size = block_size.saturating_add(sub.block_size);
                }
                trace!(block_size, "nested type resolved");
                Some(sub)
            } else {
                None
            };

            // Explicitly declared size
            block_size = block_size.saturating_add(meta.size);

            // Struct fields with neither an intrinsic footprint nor an
            // explicit size take the derived sub-block size.
            let size = match &sub {
                Some(sub) if meta.s7_type.byte_size() == 0 && meta.size == 0 => sub.block_size,
                _ => meta.size,
            };

            let resolved = self.registry.resolve_for(meta.s7_type)?;
            block_size =
                block_size.saturating_add(resolved.byte_size.saturating_mul(meta.array_size));

            // Sibling bit fields at the same byte offset share one
            // reserved byte: only the first one grows the block.
            if resolved.bit_size > 0 && !byte_offset_reserved(meta.byte_offset, &entries) {
                block_size = block_size.saturating_add(1);
            }

            entries.push(FieldDescriptor {
                name: field.name().to_owned(),
                byte_offset: meta.byte_offset,
                bit_offset: meta.bit_offset,
                element: field.kind().element().clone(),
                size,
                s7_type: meta.s7_type,
                is_array: field.kind().is_array(),
                array_size: meta.array_size,
                serializer: resolved.serializer,
            });
        }

        trace!(ty = ty.name(), block_size, "resolution complete");
        Ok(LayoutResult {
            block_size,
            entries,
        })
    }
}

/// Whether a descriptor already emitted in the current pass occupies the
/// given byte offset.
#[inline]
fn byte_offset_reserved(byte_offset: u32, entries: &[FieldDescriptor]) -> bool {
    entries.iter().any(|e| e.byte_offset == byte_offset)
}
