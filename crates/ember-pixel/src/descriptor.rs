//! Static descriptor table for every supported pixel format.
//!
//! The table is read-only after process start; all format queries in
//! [`crate::format`] resolve through it. Masks and shifts are only meaningful
//! for formats carrying [`FormatFlags::NATIVE_ENDIAN`], where each channel is
//! a contiguous bit range inside a little-endian element.

use bitflags::bitflags;

bitflags! {
    /// Capability flags of a pixel format.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FormatFlags: u32 {
        /// The format carries an alpha channel.
        const HAS_ALPHA = 1 << 0;
        /// Block-compressed; the minimum addressable unit is a block record.
        const COMPRESSED = 1 << 1;
        /// Channels are floating point.
        const FLOAT = 1 << 2;
        /// Depth (and possibly stencil) rather than colour.
        const DEPTH = 1 << 3;
        /// Channels are bit ranges inside a machine-order integer element;
        /// shift/mask arithmetic applies.
        const NATIVE_ENDIAN = 1 << 4;
        /// Single-channel luminance (replicated to RGB on unpack).
        const LUMINANCE = 1 << 5;
        /// Non-normalised integer channels.
        const INTEGER = 1 << 6;
    }
}

/// Storage type of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    /// Unsigned normalised byte
    Byte,
    /// Unsigned normalised 16-bit
    Short,
    /// Signed normalised byte
    Snorm8,
    /// Signed normalised 16-bit
    Snorm16,
    /// Half-precision float
    Float16,
    /// Single-precision float
    Float32,
    /// Unsigned 8-bit integer
    Uint8,
    /// Unsigned 16-bit integer
    Uint16,
    /// Unsigned 32-bit integer
    Uint32,
    /// Signed 8-bit integer
    Sint8,
    /// Signed 16-bit integer
    Sint16,
    /// Signed 32-bit integer
    Sint32,
}

/// Full description of one pixel format.
///
/// Channel arrays are ordered `[r, g, b, a]`. For compressed formats
/// `elem_bytes` is the block-record size, for introspection only.
#[derive(Debug, Clone, Copy)]
pub struct FormatDescriptor {
    /// Canonical format name.
    pub name: &'static str,
    /// Bytes per element (block record for compressed formats).
    pub elem_bytes: u8,
    /// Capability flags.
    pub flags: FormatFlags,
    /// Channel storage type.
    pub component_type: ComponentType,
    /// Number of channels.
    pub component_count: u8,
    /// Bits per channel.
    pub bits: [u8; 4],
    /// Bit shift of each channel inside the element (`NATIVE_ENDIAN` only).
    pub shifts: [u8; 4],
    /// Bit mask of each channel inside the element (`NATIVE_ENDIAN` only).
    pub masks: [u64; 4],
}

const fn mask(bits: u8, shift: u8) -> u64 {
    if bits == 0 {
        0
    } else {
        ((1u64 << bits) - 1) << shift
    }
}

impl FormatDescriptor {
    /// A `NATIVE_ENDIAN` format; masks are derived from bits and shifts.
    const fn native(
        name: &'static str,
        elem_bytes: u8,
        extra: FormatFlags,
        component_type: ComponentType,
        component_count: u8,
        bits: [u8; 4],
        shifts: [u8; 4],
    ) -> Self {
        Self {
            name,
            elem_bytes,
            flags: extra.union(FormatFlags::NATIVE_ENDIAN),
            component_type,
            component_count,
            bits,
            shifts,
            masks: [
                mask(bits[0], shifts[0]),
                mask(bits[1], shifts[1]),
                mask(bits[2], shifts[2]),
                mask(bits[3], shifts[3]),
            ],
        }
    }

    /// An uncompressed format read and written by format-specific code.
    const fn plain(
        name: &'static str,
        elem_bytes: u8,
        flags: FormatFlags,
        component_type: ComponentType,
        component_count: u8,
        bits: [u8; 4],
    ) -> Self {
        Self {
            name,
            elem_bytes,
            flags,
            component_type,
            component_count,
            bits,
            shifts: [0; 4],
            masks: [0; 4],
        }
    }

    /// A block-compressed format; `block_bytes` is the block-record size.
    const fn block(
        name: &'static str,
        block_bytes: u8,
        extra: FormatFlags,
        component_type: ComponentType,
        component_count: u8,
    ) -> Self {
        Self {
            name,
            elem_bytes: block_bytes,
            flags: extra.union(FormatFlags::COMPRESSED),
            component_type,
            component_count,
            bits: [0; 4],
            shifts: [0; 4],
            masks: [0; 4],
        }
    }
}

const NONE: FormatFlags = FormatFlags::empty();
const ALPHA: FormatFlags = FormatFlags::HAS_ALPHA;
const FLOAT: FormatFlags = FormatFlags::FLOAT;
const DEPTH: FormatFlags = FormatFlags::DEPTH;
const LUM: FormatFlags = FormatFlags::LUMINANCE;
const INT: FormatFlags = FormatFlags::INTEGER;

use ComponentType::{
    Byte, Float16, Float32, Short, Sint16, Sint32, Sint8, Snorm16, Snorm8, Uint16, Uint32, Uint8,
};

/// Number of formats in the table.
pub(crate) const FORMAT_COUNT: usize = 111;

/// The descriptor table, indexed by `PixelFormat as usize`.
///
/// Entry order must match the variant order of [`crate::format::PixelFormat`];
/// the table tests sweep the whole enum against it.
pub(crate) const TABLE: [FormatDescriptor; FORMAT_COUNT] = [
    FormatDescriptor::plain("UNKNOWN", 0, NONE, Byte, 0, [0; 4]),
    FormatDescriptor::native("L8", 1, LUM, Byte, 1, [8, 0, 0, 0], [0; 4]),
    FormatDescriptor::native("L16", 2, LUM, Short, 1, [16, 0, 0, 0], [0; 4]),
    FormatDescriptor::native("A8", 1, ALPHA, Byte, 1, [0, 0, 0, 8], [0; 4]),
    FormatDescriptor::native("A4L4", 1, ALPHA.union(LUM), Byte, 2, [4, 0, 0, 4], [0, 0, 0, 4]),
    FormatDescriptor::plain("BYTE_LA", 2, ALPHA.union(LUM), Byte, 2, [8, 0, 0, 8]),
    FormatDescriptor::native("R5G6B5", 2, NONE, Byte, 3, [5, 6, 5, 0], [11, 5, 0, 0]),
    FormatDescriptor::native("B5G6R5", 2, NONE, Byte, 3, [5, 6, 5, 0], [0, 5, 11, 0]),
    FormatDescriptor::native("R3G3B2", 1, NONE, Byte, 3, [3, 3, 2, 0], [5, 2, 0, 0]),
    FormatDescriptor::native("A4R4G4B4", 2, ALPHA, Byte, 4, [4, 4, 4, 4], [8, 4, 0, 12]),
    FormatDescriptor::native("A1R5G5B5", 2, ALPHA, Byte, 4, [5, 5, 5, 1], [10, 5, 0, 15]),
    FormatDescriptor::native("R8G8B8", 3, NONE, Byte, 3, [8, 8, 8, 0], [16, 8, 0, 0]),
    FormatDescriptor::native("B8G8R8", 3, NONE, Byte, 3, [8, 8, 8, 0], [0, 8, 16, 0]),
    FormatDescriptor::native("A8R8G8B8", 4, ALPHA, Byte, 4, [8, 8, 8, 8], [16, 8, 0, 24]),
    FormatDescriptor::native("A8B8G8R8", 4, ALPHA, Byte, 4, [8, 8, 8, 8], [0, 8, 16, 24]),
    FormatDescriptor::native("B8G8R8A8", 4, ALPHA, Byte, 4, [8, 8, 8, 8], [8, 16, 24, 0]),
    FormatDescriptor::native("R8G8B8A8", 4, ALPHA, Byte, 4, [8, 8, 8, 8], [24, 16, 8, 0]),
    FormatDescriptor::native("X8R8G8B8", 4, NONE, Byte, 3, [8, 8, 8, 0], [16, 8, 0, 0]),
    FormatDescriptor::native("X8B8G8R8", 4, NONE, Byte, 3, [8, 8, 8, 0], [0, 8, 16, 0]),
    FormatDescriptor::native("A2R10G10B10", 4, ALPHA, Byte, 4, [10, 10, 10, 2], [20, 10, 0, 30]),
    FormatDescriptor::plain("A2B10G10R10", 4, ALPHA, Byte, 4, [10, 10, 10, 2]),
    FormatDescriptor::block("DXT1", 8, ALPHA, Byte, 3),
    FormatDescriptor::block("DXT2", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("DXT3", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("DXT4", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("DXT5", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("BC4_UNORM", 8, NONE, Byte, 1),
    FormatDescriptor::block("BC4_SNORM", 8, NONE, Snorm8, 1),
    FormatDescriptor::block("BC5_UNORM", 16, NONE, Byte, 2),
    FormatDescriptor::block("BC5_SNORM", 16, NONE, Snorm8, 2),
    FormatDescriptor::block("BC6H_UF16", 16, FLOAT, Float16, 3),
    FormatDescriptor::block("BC6H_SF16", 16, FLOAT, Float16, 3),
    FormatDescriptor::block("BC7", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ETC1_RGB8", 8, NONE, Byte, 3),
    FormatDescriptor::block("ETC2_RGB8", 8, NONE, Byte, 3),
    FormatDescriptor::block("ETC2_RGBA8", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ETC2_RGB8A1", 8, ALPHA, Byte, 4),
    FormatDescriptor::block("ATC_RGB", 8, NONE, Byte, 3),
    FormatDescriptor::block("ATC_RGBA_EXPLICIT_ALPHA", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ATC_RGBA_INTERPOLATED_ALPHA", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("PVRTC_RGB2", 8, NONE, Byte, 3),
    FormatDescriptor::block("PVRTC_RGBA2", 8, ALPHA, Byte, 4),
    FormatDescriptor::block("PVRTC_RGB4", 8, NONE, Byte, 3),
    FormatDescriptor::block("PVRTC_RGBA4", 8, ALPHA, Byte, 4),
    FormatDescriptor::block("PVRTC2_2BPP", 8, ALPHA, Byte, 4),
    FormatDescriptor::block("PVRTC2_4BPP", 8, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_4X4_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_5X4_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_5X5_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_6X5_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_6X6_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_8X5_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_8X6_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_8X8_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_10X5_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_10X6_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_10X8_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_10X10_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_12X10_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::block("ASTC_RGBA_12X12_LDR", 16, ALPHA, Byte, 4),
    FormatDescriptor::plain("FLOAT16_R", 2, FLOAT, Float16, 1, [16, 0, 0, 0]),
    FormatDescriptor::plain("FLOAT16_GR", 4, FLOAT, Float16, 2, [16, 16, 0, 0]),
    FormatDescriptor::plain("FLOAT16_RGB", 6, FLOAT, Float16, 3, [16, 16, 16, 0]),
    FormatDescriptor::plain("FLOAT16_RGBA", 8, FLOAT.union(ALPHA), Float16, 4, [16, 16, 16, 16]),
    FormatDescriptor::plain("FLOAT32_R", 4, FLOAT, Float32, 1, [32, 0, 0, 0]),
    FormatDescriptor::plain("FLOAT32_GR", 8, FLOAT, Float32, 2, [32, 32, 0, 0]),
    FormatDescriptor::plain("FLOAT32_RGB", 12, FLOAT, Float32, 3, [32, 32, 32, 0]),
    FormatDescriptor::plain("FLOAT32_RGBA", 16, FLOAT.union(ALPHA), Float32, 4, [32, 32, 32, 32]),
    FormatDescriptor::plain("R11G11B10_FLOAT", 4, FLOAT, Float32, 3, [11, 11, 10, 0]),
    FormatDescriptor::plain("R9G9B9E5_SHAREDEXP", 4, FLOAT, Float32, 3, [9, 9, 9, 0]),
    FormatDescriptor::plain("SHORT_GR", 4, NONE, Short, 2, [16, 16, 0, 0]),
    FormatDescriptor::plain("SHORT_RGB", 6, NONE, Short, 3, [16, 16, 16, 0]),
    FormatDescriptor::plain("SHORT_RGBA", 8, ALPHA, Short, 4, [16, 16, 16, 16]),
    FormatDescriptor::native("R8", 1, NONE, Byte, 1, [8, 0, 0, 0], [0; 4]),
    FormatDescriptor::native("RG8", 2, NONE, Byte, 2, [8, 8, 0, 0], [0, 8, 0, 0]),
    FormatDescriptor::plain("R8_SNORM", 1, NONE, Snorm8, 1, [8, 0, 0, 0]),
    FormatDescriptor::plain("R8G8_SNORM", 2, NONE, Snorm8, 2, [8, 8, 0, 0]),
    FormatDescriptor::plain("R8G8B8_SNORM", 3, NONE, Snorm8, 3, [8, 8, 8, 0]),
    FormatDescriptor::plain("R8G8B8A8_SNORM", 4, ALPHA, Snorm8, 4, [8, 8, 8, 8]),
    FormatDescriptor::plain("R16_SNORM", 2, NONE, Snorm16, 1, [16, 0, 0, 0]),
    FormatDescriptor::plain("R16G16_SNORM", 4, NONE, Snorm16, 2, [16, 16, 0, 0]),
    FormatDescriptor::plain("R16G16B16_SNORM", 6, NONE, Snorm16, 3, [16, 16, 16, 0]),
    FormatDescriptor::plain("R16G16B16A16_SNORM", 8, ALPHA, Snorm16, 4, [16, 16, 16, 16]),
    FormatDescriptor::plain("R8_UINT", 1, INT, Uint8, 1, [8, 0, 0, 0]),
    FormatDescriptor::plain("R8G8_UINT", 2, INT, Uint8, 2, [8, 8, 0, 0]),
    FormatDescriptor::plain("R8G8B8_UINT", 3, INT, Uint8, 3, [8, 8, 8, 0]),
    FormatDescriptor::plain("R8G8B8A8_UINT", 4, INT.union(ALPHA), Uint8, 4, [8, 8, 8, 8]),
    FormatDescriptor::plain("R16_UINT", 2, INT, Uint16, 1, [16, 0, 0, 0]),
    FormatDescriptor::plain("R16G16_UINT", 4, INT, Uint16, 2, [16, 16, 0, 0]),
    FormatDescriptor::plain("R16G16B16_UINT", 6, INT, Uint16, 3, [16, 16, 16, 0]),
    FormatDescriptor::plain("R16G16B16A16_UINT", 8, INT.union(ALPHA), Uint16, 4, [16, 16, 16, 16]),
    FormatDescriptor::plain("R32_UINT", 4, INT, Uint32, 1, [32, 0, 0, 0]),
    FormatDescriptor::plain("R32G32_UINT", 8, INT, Uint32, 2, [32, 32, 0, 0]),
    FormatDescriptor::plain("R32G32B32_UINT", 12, INT, Uint32, 3, [32, 32, 32, 0]),
    FormatDescriptor::plain("R32G32B32A32_UINT", 16, INT.union(ALPHA), Uint32, 4, [32, 32, 32, 32]),
    FormatDescriptor::plain("R8_SINT", 1, INT, Sint8, 1, [8, 0, 0, 0]),
    FormatDescriptor::plain("R8G8_SINT", 2, INT, Sint8, 2, [8, 8, 0, 0]),
    FormatDescriptor::plain("R8G8B8_SINT", 3, INT, Sint8, 3, [8, 8, 8, 0]),
    FormatDescriptor::plain("R8G8B8A8_SINT", 4, INT.union(ALPHA), Sint8, 4, [8, 8, 8, 8]),
    FormatDescriptor::plain("R16_SINT", 2, INT, Sint16, 1, [16, 0, 0, 0]),
    FormatDescriptor::plain("R16G16_SINT", 4, INT, Sint16, 2, [16, 16, 0, 0]),
    FormatDescriptor::plain("R16G16B16_SINT", 6, INT, Sint16, 3, [16, 16, 16, 0]),
    FormatDescriptor::plain("R16G16B16A16_SINT", 8, INT.union(ALPHA), Sint16, 4, [16, 16, 16, 16]),
    FormatDescriptor::plain("R32_SINT", 4, INT, Sint32, 1, [32, 0, 0, 0]),
    FormatDescriptor::plain("R32G32_SINT", 8, INT, Sint32, 2, [32, 32, 0, 0]),
    FormatDescriptor::plain("R32G32B32_SINT", 12, INT, Sint32, 3, [32, 32, 32, 0]),
    FormatDescriptor::plain("R32G32B32A32_SINT", 16, INT.union(ALPHA), Sint32, 4, [32, 32, 32, 32]),
    FormatDescriptor::plain("DEPTH16", 2, DEPTH, Short, 1, [0; 4]),
    FormatDescriptor::plain("DEPTH24_STENCIL8", 4, DEPTH, Uint32, 1, [0; 4]),
    FormatDescriptor::plain("DEPTH32", 4, DEPTH, Uint32, 1, [0; 4]),
    FormatDescriptor::plain("DEPTH32F", 4, DEPTH.union(FLOAT), Float32, 1, [0; 4]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_masks_match_bits_and_shifts() {
        for desc in &TABLE {
            if !desc.flags.contains(FormatFlags::NATIVE_ENDIAN) {
                continue;
            }
            for c in 0..4 {
                if desc.bits[c] == 0 {
                    assert_eq!(desc.masks[c], 0, "{}", desc.name);
                    continue;
                }
                let mask = desc.masks[c];
                let shift = desc.shifts[c];
                assert_eq!(
                    (mask >> shift) + 1,
                    1u64 << desc.bits[c],
                    "{} channel {}",
                    desc.name,
                    c
                );
            }
        }
    }

    #[test]
    fn test_native_channels_are_disjoint() {
        for desc in &TABLE {
            if !desc.flags.contains(FormatFlags::NATIVE_ENDIAN) {
                continue;
            }
            for a in 0..4 {
                for b in (a + 1)..4 {
                    assert_eq!(
                        desc.masks[a] & desc.masks[b],
                        0,
                        "{} channels {} and {} overlap",
                        desc.name,
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn test_native_bits_fit_in_element() {
        for desc in &TABLE {
            if !desc.flags.contains(FormatFlags::NATIVE_ENDIAN) {
                continue;
            }
            let total: u32 = desc.masks.iter().map(|m| m.count_ones()).sum();
            assert!(
                total <= u32::from(desc.elem_bytes) * 8,
                "{} uses more bits than its element holds",
                desc.name
            );
        }
    }

    #[test]
    fn test_compressed_never_native() {
        for desc in &TABLE {
            if desc.flags.contains(FormatFlags::COMPRESSED) {
                assert!(
                    !desc.flags.contains(FormatFlags::NATIVE_ENDIAN),
                    "{}",
                    desc.name
                );
            }
        }
    }

    #[test]
    fn test_names_are_unique() {
        for (i, a) in TABLE.iter().enumerate() {
            for b in &TABLE[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }
}
