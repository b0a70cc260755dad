//! In-memory views over typed pixel data.
//!
//! A [`PixelBox`] pairs a 3-D extent with row/slice pitches (in elements) and
//! a borrowed byte buffer. The extent's `left/top/front` offset into the
//! buffer, so sub-views share storage with their parent.

use ember_common::{EmberError, EmberResult};

use crate::format::PixelFormat;

/// A half-open 3-D extent: `left <= x < right`, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Inclusive left edge.
    pub left: u32,
    /// Inclusive top edge.
    pub top: u32,
    /// Inclusive front slice.
    pub front: u32,
    /// Exclusive right edge.
    pub right: u32,
    /// Exclusive bottom edge.
    pub bottom: u32,
    /// Exclusive back slice.
    pub back: u32,
}

impl Region {
    /// A 2-D region at depth 1.
    #[must_use]
    pub const fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            front: 0,
            right,
            bottom,
            back: 1,
        }
    }

    /// A full 3-D region.
    #[must_use]
    pub const fn new_3d(left: u32, top: u32, front: u32, right: u32, bottom: u32, back: u32) -> Self {
        Self {
            left,
            top,
            front,
            right,
            bottom,
            back,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.right - self.left
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Depth in slices.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.back - self.front
    }

    /// Whether `other` lies entirely inside this region.
    #[must_use]
    pub const fn contains(&self, other: &Region) -> bool {
        self.left <= other.left
            && self.top <= other.top
            && self.front <= other.front
            && other.right <= self.right
            && other.bottom <= self.bottom
            && other.back <= self.back
    }

    /// Whether two regions have the same width, height, and depth.
    #[must_use]
    pub const fn same_size(&self, other: &Region) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.depth() == other.depth()
    }
}

/// Pitches and format shared by the two view types.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Layout {
    pub extent: Region,
    pub row_pitch: usize,
    pub slice_pitch: usize,
    pub format: PixelFormat,
}

impl Layout {
    fn consecutive(width: u32, height: u32, depth: u32, format: PixelFormat) -> Self {
        Self {
            extent: Region::new_3d(0, 0, 0, width, height, depth),
            row_pitch: width as usize,
            slice_pitch: (width * height) as usize,
            format,
        }
    }

    pub fn is_consecutive(&self) -> bool {
        self.row_pitch == self.extent.width() as usize
            && self.slice_pitch == (self.extent.width() * self.extent.height()) as usize
    }

    /// Byte offset of the pixel at box-relative coordinates.
    pub fn byte_offset(&self, x: u32, y: u32, z: u32) -> usize {
        let elem = self.format.bytes_per_element();
        ((z + self.extent.front) as usize * self.slice_pitch
            + (y + self.extent.top) as usize * self.row_pitch
            + (x + self.extent.left) as usize)
            * elem
    }
}

/// A read-only view over pixel memory.
#[derive(Debug, Clone, Copy)]
pub struct PixelBox<'a> {
    pub(crate) layout: Layout,
    pub(crate) data: &'a [u8],
}

/// A mutable view over pixel memory.
#[derive(Debug)]
pub struct PixelBoxMut<'a> {
    pub(crate) layout: Layout,
    pub(crate) data: &'a mut [u8],
}

impl<'a> PixelBox<'a> {
    /// A consecutive view over a whole `width` x `height` x `depth` image.
    #[must_use]
    pub fn new(width: u32, height: u32, depth: u32, format: PixelFormat, data: &'a [u8]) -> Self {
        Self {
            layout: Layout::consecutive(width, height, depth, format),
            data,
        }
    }

    /// A view with explicit extent and pitches (in elements).
    #[must_use]
    pub fn with_layout(
        extent: Region,
        row_pitch: usize,
        slice_pitch: usize,
        format: PixelFormat,
        data: &'a [u8],
    ) -> Self {
        Self {
            layout: Layout {
                extent,
                row_pitch,
                slice_pitch,
                format,
            },
            data,
        }
    }

    /// The extent of this view.
    #[must_use]
    pub fn extent(&self) -> Region {
        self.layout.extent
    }

    /// Row pitch in elements.
    #[must_use]
    pub fn row_pitch(&self) -> usize {
        self.layout.row_pitch
    }

    /// Slice pitch in elements.
    #[must_use]
    pub fn slice_pitch(&self) -> usize {
        self.layout.slice_pitch
    }

    /// The pixel format.
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.layout.format
    }

    /// Width of the view.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.layout.extent.width()
    }

    /// Height of the view.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.layout.extent.height()
    }

    /// Depth of the view.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.layout.extent.depth()
    }

    /// Whether rows and slices are packed with no padding.
    #[must_use]
    pub fn is_consecutive(&self) -> bool {
        self.layout.is_consecutive()
    }

    /// The underlying bytes.
    #[must_use]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// A view restricted to `region` (absolute coordinates within this
    /// view's extent), sharing the same buffer and pitches.
    ///
    /// Compressed formats only support the full extent; anything smaller
    /// cannot be addressed below block granularity.
    pub fn sub_volume(&self, region: Region) -> EmberResult<PixelBox<'a>> {
        if !self.layout.extent.contains(&region) {
            return Err(EmberError::InvalidParameters(
                "sub-volume region outside the parent extent".to_string(),
            ));
        }
        if self.format().is_compressed() && region != self.layout.extent {
            return Err(EmberError::InvalidParameters(format!(
                "cannot take a sub-volume of compressed format {}",
                self.format().name()
            )));
        }
        Ok(PixelBox {
            layout: Layout {
                extent: region,
                ..self.layout
            },
            data: self.data,
        })
    }
}

impl<'a> PixelBoxMut<'a> {
    /// A consecutive mutable view over a whole image.
    #[must_use]
    pub fn new(
        width: u32,
        height: u32,
        depth: u32,
        format: PixelFormat,
        data: &'a mut [u8],
    ) -> Self {
        Self {
            layout: Layout::consecutive(width, height, depth, format),
            data,
        }
    }

    /// A mutable view with explicit extent and pitches (in elements).
    #[must_use]
    pub fn with_layout(
        extent: Region,
        row_pitch: usize,
        slice_pitch: usize,
        format: PixelFormat,
        data: &'a mut [u8],
    ) -> Self {
        Self {
            layout: Layout {
                extent,
                row_pitch,
                slice_pitch,
                format,
            },
            data,
        }
    }

    /// A read-only view of the same memory.
    #[must_use]
    pub fn as_view(&self) -> PixelBox<'_> {
        PixelBox {
            layout: self.layout,
            data: self.data,
        }
    }

    /// The extent of this view.
    #[must_use]
    pub fn extent(&self) -> Region {
        self.layout.extent
    }

    /// The pixel format.
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.layout.format
    }

    /// Width of the view.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.layout.extent.width()
    }

    /// Height of the view.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.layout.extent.height()
    }

    /// Depth of the view.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.layout.extent.depth()
    }

    /// Whether rows and slices are packed with no padding.
    #[must_use]
    pub fn is_consecutive(&self) -> bool {
        self.layout.is_consecutive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_dimensions() {
        let r = Region::new_3d(2, 4, 1, 10, 8, 3);
        assert_eq!(r.width(), 8);
        assert_eq!(r.height(), 4);
        assert_eq!(r.depth(), 2);
    }

    #[test]
    fn test_consecutive_detection() {
        let data = vec![0u8; 4 * 4 * 4];
        let full = PixelBox::new(4, 4, 1, PixelFormat::A8R8G8B8, &data);
        assert!(full.is_consecutive());

        let padded = PixelBox::with_layout(
            Region::new(0, 0, 2, 4),
            4,
            16,
            PixelFormat::A8R8G8B8,
            &data,
        );
        assert!(!padded.is_consecutive());
    }

    #[test]
    fn test_byte_offset_honours_pitches() {
        let layout = Layout {
            extent: Region::new_3d(1, 2, 0, 5, 6, 2),
            row_pitch: 8,
            slice_pitch: 64,
            format: PixelFormat::A8R8G8B8,
        };
        // (x=0,y=0,z=0) maps to element (left=1, top=2): (2*8 + 1) * 4.
        assert_eq!(layout.byte_offset(0, 0, 0), 68);
        assert_eq!(layout.byte_offset(1, 1, 1), (64 + 3 * 8 + 2) * 4);
    }

    #[test]
    fn test_sub_volume_of_compressed_rejected() {
        let data = vec![0u8; 32];
        let pb = PixelBox::new(8, 4, 1, PixelFormat::Dxt1, &data);
        assert!(pb.sub_volume(Region::new(0, 0, 4, 4)).is_err());
        assert!(pb.sub_volume(Region::new(0, 0, 8, 4)).is_ok());
    }

    #[test]
    fn test_sub_volume_outside_parent_rejected() {
        let data = vec![0u8; 64];
        let pb = PixelBox::new(4, 4, 1, PixelFormat::A8R8G8B8, &data);
        assert!(pb.sub_volume(Region::new(2, 2, 6, 4)).is_err());
    }
}
