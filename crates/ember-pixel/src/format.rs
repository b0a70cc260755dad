//! The pixel format enumeration and its query API.

use crate::descriptor::{ComponentType, FormatDescriptor, FormatFlags, FORMAT_COUNT, TABLE};

/// Every pixel layout the engine can describe.
///
/// Variant order matches the descriptor table in [`crate::descriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
#[allow(missing_docs)]
pub enum PixelFormat {
    Unknown = 0,
    L8,
    L16,
    A8,
    A4L4,
    ByteLA,
    R5G6B5,
    B5G6R5,
    R3G3B2,
    A4R4G4B4,
    A1R5G5B5,
    R8G8B8,
    B8G8R8,
    A8R8G8B8,
    A8B8G8R8,
    B8G8R8A8,
    R8G8B8A8,
    X8R8G8B8,
    X8B8G8R8,
    A2R10G10B10,
    A2B10G10R10,
    Dxt1,
    Dxt2,
    Dxt3,
    Dxt4,
    Dxt5,
    Bc4Unorm,
    Bc4Snorm,
    Bc5Unorm,
    Bc5Snorm,
    Bc6hUf16,
    Bc6hSf16,
    Bc7,
    Etc1Rgb8,
    Etc2Rgb8,
    Etc2Rgba8,
    Etc2Rgb8A1,
    AtcRgb,
    AtcRgbaExplicitAlpha,
    AtcRgbaInterpolatedAlpha,
    PvrtcRgb2,
    PvrtcRgba2,
    PvrtcRgb4,
    PvrtcRgba4,
    Pvrtc2Bpp2,
    Pvrtc2Bpp4,
    Astc4x4,
    Astc5x4,
    Astc5x5,
    Astc6x5,
    Astc6x6,
    Astc8x5,
    Astc8x6,
    Astc8x8,
    Astc10x5,
    Astc10x6,
    Astc10x8,
    Astc10x10,
    Astc12x10,
    Astc12x12,
    Float16R,
    Float16Gr,
    Float16Rgb,
    Float16Rgba,
    Float32R,
    Float32Gr,
    Float32Rgb,
    Float32Rgba,
    R11G11B10Float,
    R9G9B9E5,
    ShortGr,
    ShortRgb,
    ShortRgba,
    R8,
    Rg8,
    R8Snorm,
    R8G8Snorm,
    R8G8B8Snorm,
    R8G8B8A8Snorm,
    R16Snorm,
    R16G16Snorm,
    R16G16B16Snorm,
    R16G16B16A16Snorm,
    R8Uint,
    R8G8Uint,
    R8G8B8Uint,
    R8G8B8A8Uint,
    R16Uint,
    R16G16Uint,
    R16G16B16Uint,
    R16G16B16A16Uint,
    R32Uint,
    R32G32Uint,
    R32G32B32Uint,
    R32G32B32A32Uint,
    R8Sint,
    R8G8Sint,
    R8G8B8Sint,
    R8G8B8A8Sint,
    R16Sint,
    R16G16Sint,
    R16G16B16Sint,
    R16G16B16A16Sint,
    R32Sint,
    R32G32Sint,
    R32G32B32Sint,
    R32G32B32A32Sint,
    Depth16,
    Depth24Stencil8,
    Depth32,
    Depth32F,
}

impl PixelFormat {
    /// All formats, in table order.
    pub const ALL: [PixelFormat; FORMAT_COUNT] = [
        Self::Unknown,
        Self::L8,
        Self::L16,
        Self::A8,
        Self::A4L4,
        Self::ByteLA,
        Self::R5G6B5,
        Self::B5G6R5,
        Self::R3G3B2,
        Self::A4R4G4B4,
        Self::A1R5G5B5,
        Self::R8G8B8,
        Self::B8G8R8,
        Self::A8R8G8B8,
        Self::A8B8G8R8,
        Self::B8G8R8A8,
        Self::R8G8B8A8,
        Self::X8R8G8B8,
        Self::X8B8G8R8,
        Self::A2R10G10B10,
        Self::A2B10G10R10,
        Self::Dxt1,
        Self::Dxt2,
        Self::Dxt3,
        Self::Dxt4,
        Self::Dxt5,
        Self::Bc4Unorm,
        Self::Bc4Snorm,
        Self::Bc5Unorm,
        Self::Bc5Snorm,
        Self::Bc6hUf16,
        Self::Bc6hSf16,
        Self::Bc7,
        Self::Etc1Rgb8,
        Self::Etc2Rgb8,
        Self::Etc2Rgba8,
        Self::Etc2Rgb8A1,
        Self::AtcRgb,
        Self::AtcRgbaExplicitAlpha,
        Self::AtcRgbaInterpolatedAlpha,
        Self::PvrtcRgb2,
        Self::PvrtcRgba2,
        Self::PvrtcRgb4,
        Self::PvrtcRgba4,
        Self::Pvrtc2Bpp2,
        Self::Pvrtc2Bpp4,
        Self::Astc4x4,
        Self::Astc5x4,
        Self::Astc5x5,
        Self::Astc6x5,
        Self::Astc6x6,
        Self::Astc8x5,
        Self::Astc8x6,
        Self::Astc8x8,
        Self::Astc10x5,
        Self::Astc10x6,
        Self::Astc10x8,
        Self::Astc10x10,
        Self::Astc12x10,
        Self::Astc12x12,
        Self::Float16R,
        Self::Float16Gr,
        Self::Float16Rgb,
        Self::Float16Rgba,
        Self::Float32R,
        Self::Float32Gr,
        Self::Float32Rgb,
        Self::Float32Rgba,
        Self::R11G11B10Float,
        Self::R9G9B9E5,
        Self::ShortGr,
        Self::ShortRgb,
        Self::ShortRgba,
        Self::R8,
        Self::Rg8,
        Self::R8Snorm,
        Self::R8G8Snorm,
        Self::R8G8B8Snorm,
        Self::R8G8B8A8Snorm,
        Self::R16Snorm,
        Self::R16G16Snorm,
        Self::R16G16B16Snorm,
        Self::R16G16B16A16Snorm,
        Self::R8Uint,
        Self::R8G8Uint,
        Self::R8G8B8Uint,
        Self::R8G8B8A8Uint,
        Self::R16Uint,
        Self::R16G16Uint,
        Self::R16G16B16Uint,
        Self::R16G16B16A16Uint,
        Self::R32Uint,
        Self::R32G32Uint,
        Self::R32G32B32Uint,
        Self::R32G32B32A32Uint,
        Self::R8Sint,
        Self::R8G8Sint,
        Self::R8G8B8Sint,
        Self::R8G8B8A8Sint,
        Self::R16Sint,
        Self::R16G16Sint,
        Self::R16G16B16Sint,
        Self::R16G16B16A16Sint,
        Self::R32Sint,
        Self::R32G32Sint,
        Self::R32G32B32Sint,
        Self::R32G32B32A32Sint,
        Self::Depth16,
        Self::Depth24Stencil8,
        Self::Depth32,
        Self::Depth32F,
    ];

    /// The descriptor for this format.
    #[must_use]
    pub fn descriptor(self) -> &'static FormatDescriptor {
        &TABLE[self as usize]
    }

    /// Canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Looks a format up by its canonical name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Bytes per element. For compressed formats this is the block-record
    /// size, for introspection only.
    #[must_use]
    pub fn bytes_per_element(self) -> usize {
        self.descriptor().elem_bytes as usize
    }

    /// Bits per channel as `[r, g, b, a]`. Non-colour formats report zeros.
    #[must_use]
    pub fn bits_per_channel(self) -> [u8; 4] {
        self.descriptor().bits
    }

    /// Channel masks as `[r, g, b, a]`. Valid only when
    /// [`FormatFlags::NATIVE_ENDIAN`] is set.
    #[must_use]
    pub fn channel_masks(self) -> [u64; 4] {
        self.descriptor().masks
    }

    /// Channel shifts as `[r, g, b, a]`. Valid only when
    /// [`FormatFlags::NATIVE_ENDIAN`] is set.
    #[must_use]
    pub fn channel_shifts(self) -> [u8; 4] {
        self.descriptor().shifts
    }

    /// Capability flags.
    #[must_use]
    pub fn flags(self) -> FormatFlags {
        self.descriptor().flags
    }

    /// Channel storage type.
    #[must_use]
    pub fn component_type(self) -> ComponentType {
        self.descriptor().component_type
    }

    /// Number of channels.
    #[must_use]
    pub fn component_count(self) -> usize {
        self.descriptor().component_count as usize
    }

    /// Whether the format carries alpha.
    #[must_use]
    pub fn has_alpha(self) -> bool {
        self.flags().contains(FormatFlags::HAS_ALPHA)
    }

    /// Whether the format is block-compressed.
    #[must_use]
    pub fn is_compressed(self) -> bool {
        self.flags().contains(FormatFlags::COMPRESSED)
    }

    /// Whether channels are floating point.
    #[must_use]
    pub fn is_float(self) -> bool {
        self.flags().contains(FormatFlags::FLOAT)
    }

    /// Whether this is a depth format.
    #[must_use]
    pub fn is_depth(self) -> bool {
        self.flags().contains(FormatFlags::DEPTH)
    }

    /// Whether this is a luminance format.
    #[must_use]
    pub fn is_luminance(self) -> bool {
        self.flags().contains(FormatFlags::LUMINANCE)
    }

    /// Whether channels are non-normalised integers.
    #[must_use]
    pub fn is_integer(self) -> bool {
        self.flags().contains(FormatFlags::INTEGER)
    }

    /// Whether shift/mask arithmetic applies to this format.
    #[must_use]
    pub fn is_native_endian(self) -> bool {
        self.flags().contains(FormatFlags::NATIVE_ENDIAN)
    }

    /// Whether single pixels of this format can be packed and unpacked.
    ///
    /// Compressed, depth, and non-normalised integer formats are not
    /// accessible; neither are the packed-exponent float layouts.
    #[must_use]
    pub fn is_accessible(self) -> bool {
        if self.is_compressed() || self.is_depth() || self.is_integer() {
            return false;
        }
        !matches!(
            self,
            Self::Unknown | Self::R11G11B10Float | Self::R9G9B9E5
        ) && !matches!(
            self.component_type(),
            ComponentType::Snorm8 | ComponentType::Snorm16
        )
    }

    /// Block width and height for a compressed format, `(1, 1)` otherwise.
    #[must_use]
    pub fn block_extent(self) -> (u32, u32) {
        match self {
            Self::Dxt1
            | Self::Dxt2
            | Self::Dxt3
            | Self::Dxt4
            | Self::Dxt5
            | Self::Bc4Unorm
            | Self::Bc4Snorm
            | Self::Bc5Unorm
            | Self::Bc5Snorm
            | Self::Bc6hUf16
            | Self::Bc6hSf16
            | Self::Bc7
            | Self::Etc1Rgb8
            | Self::Etc2Rgb8
            | Self::Etc2Rgba8
            | Self::Etc2Rgb8A1
            | Self::AtcRgb
            | Self::AtcRgbaExplicitAlpha
            | Self::AtcRgbaInterpolatedAlpha
            | Self::Astc4x4 => (4, 4),
            Self::PvrtcRgb2 | Self::PvrtcRgba2 | Self::Pvrtc2Bpp2 => (8, 4),
            Self::PvrtcRgb4 | Self::PvrtcRgba4 | Self::Pvrtc2Bpp4 => (4, 4),
            Self::Astc5x4 => (5, 4),
            Self::Astc5x5 => (5, 5),
            Self::Astc6x5 => (6, 5),
            Self::Astc6x6 => (6, 6),
            Self::Astc8x5 => (8, 5),
            Self::Astc8x6 => (8, 6),
            Self::Astc8x8 => (8, 8),
            Self::Astc10x5 => (10, 5),
            Self::Astc10x6 => (10, 6),
            Self::Astc10x8 => (10, 8),
            Self::Astc10x10 => (10, 10),
            Self::Astc12x10 => (12, 10),
            Self::Astc12x12 => (12, 12),
            _ => (1, 1),
        }
    }

    /// Memory consumed by a `width` x `height` x `depth` image of this format.
    ///
    /// Block-compressed families round dimensions up to whole blocks; the
    /// PVRTC1/2 families additionally floor the addressable area at the
    /// minimum their standard demands.
    #[must_use]
    pub fn memory_size(self, width: u32, height: u32, depth: u32) -> usize {
        let (w, h, d) = (width as usize, height as usize, depth as usize);
        match self {
            Self::PvrtcRgb2 | Self::PvrtcRgba2 | Self::Pvrtc2Bpp2 => {
                // 2 bpp with a 16x8 floor on the addressable area.
                d * ((w.max(16) * h.max(8) * 2 + 7) / 8)
            }
            Self::PvrtcRgb4 | Self::PvrtcRgba4 | Self::Pvrtc2Bpp4 => {
                // 4 bpp with an 8x8 floor on the addressable area.
                d * ((w.max(8) * h.max(8) * 4 + 7) / 8)
            }
            _ if self.is_compressed() => {
                let (bw, bh) = self.block_extent();
                let blocks_x = (w + bw as usize - 1) / bw as usize;
                let blocks_y = (h + bh as usize - 1) / bh as usize;
                blocks_x * blocks_y * d * self.bytes_per_element()
            }
            _ => w * h * d * self.bytes_per_element(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matches_table_order() {
        for (i, format) in PixelFormat::ALL.iter().enumerate() {
            assert_eq!(*format as usize, i);
            assert_eq!(format.descriptor().name, format.name());
        }
    }

    #[test]
    fn test_from_name_round_trips() {
        for format in PixelFormat::ALL {
            assert_eq!(PixelFormat::from_name(format.name()), Some(format));
        }
    }

    #[test]
    fn test_uncompressed_memory_size() {
        assert_eq!(PixelFormat::A8R8G8B8.memory_size(16, 16, 1), 1024);
        assert_eq!(PixelFormat::R8G8B8.memory_size(3, 2, 2), 36);
        assert_eq!(PixelFormat::Float32Rgba.memory_size(2, 2, 1), 64);
    }

    #[test]
    fn test_dxt_memory_size_rounds_to_blocks() {
        // 4x4 is exactly one 8-byte DXT1 block; 5x5 needs 2x2 blocks.
        assert_eq!(PixelFormat::Dxt1.memory_size(4, 4, 1), 8);
        assert_eq!(PixelFormat::Dxt1.memory_size(5, 5, 1), 32);
        assert_eq!(PixelFormat::Dxt5.memory_size(8, 8, 1), 64);
    }

    #[test]
    fn test_astc_memory_size_uses_block_dims() {
        assert_eq!(PixelFormat::Astc4x4.memory_size(4, 4, 1), 16);
        assert_eq!(PixelFormat::Astc12x12.memory_size(12, 12, 1), 16);
        assert_eq!(PixelFormat::Astc8x6.memory_size(16, 12, 1), 64);
    }

    #[test]
    fn test_pvrtc_memory_size_floors_area() {
        // 4x4 at 2 bpp floors to a 16x8 area: 32 bytes.
        assert_eq!(PixelFormat::PvrtcRgb2.memory_size(4, 4, 1), 32);
        // 4x4 at 4 bpp floors to 8x8: 32 bytes.
        assert_eq!(PixelFormat::PvrtcRgba4.memory_size(4, 4, 1), 32);
        assert_eq!(PixelFormat::PvrtcRgba2.memory_size(32, 32, 1), 256);
    }

    #[test]
    fn test_accessibility_classes() {
        assert!(PixelFormat::A8R8G8B8.is_accessible());
        assert!(PixelFormat::Float16Rgba.is_accessible());
        assert!(PixelFormat::ByteLA.is_accessible());
        assert!(!PixelFormat::Dxt1.is_accessible());
        assert!(!PixelFormat::Depth16.is_accessible());
        assert!(!PixelFormat::R32Uint.is_accessible());
        assert!(!PixelFormat::R8Snorm.is_accessible());
    }

    #[test]
    fn test_flag_queries() {
        assert!(PixelFormat::L8.is_luminance());
        assert!(PixelFormat::Dxt3.is_compressed());
        assert!(PixelFormat::Dxt3.has_alpha());
        assert!(PixelFormat::Float32R.is_float());
        assert!(PixelFormat::Depth32F.is_depth());
        assert!(PixelFormat::R16Uint.is_integer());
        assert!(PixelFormat::A1R5G5B5.is_native_endian());
    }
}
