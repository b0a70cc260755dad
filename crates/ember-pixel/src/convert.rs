//! Bulk pixel region conversion.
//!
//! Conversion policy, in order:
//! 1. same compressed format, packed views: straight byte copy
//! 2. any other conversion touching a compressed format: `NotImplemented`
//! 3. same format, both consecutive: single copy
//! 4. same format, padded: per-row copy honouring both pitches
//! 5/6. optimised per-pixel swizzles for the common 8-bit layouts
//! 7. fallback through the float RGBA intermediate

use ember_common::{ColourValue, EmberError, EmberResult};
use tracing::trace;

use crate::format::PixelFormat;
use crate::packing::{fixed_to_fixed, pack, unpack};
use crate::pixel_box::{PixelBox, PixelBoxMut};

/// Converts the pixels of `src` into `dst`.
///
/// The two views must have equal width, height, and depth. Conversions that
/// cross a compression boundary, or between two different compressed
/// formats, fail with [`EmberError::NotImplemented`].
pub fn convert(src: &PixelBox<'_>, dst: &mut PixelBoxMut<'_>) -> EmberResult<()> {
    if !src.extent().same_size(&dst.extent()) {
        return Err(EmberError::InvalidParameters(format!(
            "cannot convert between regions of different size ({}x{}x{} vs {}x{}x{})",
            src.width(),
            src.height(),
            src.depth(),
            dst.width(),
            dst.height(),
            dst.depth()
        )));
    }

    let (sf, df) = (src.format(), dst.format());

    if sf.is_compressed() || df.is_compressed() {
        if sf == df && packed_full_view(src) && dst.is_consecutive() && zero_origin_mut(dst) {
            let size = sf.memory_size(src.width(), src.height(), src.depth());
            dst.data[..size].copy_from_slice(&src.data()[..size]);
            return Ok(());
        }
        return Err(EmberError::NotImplemented(format!(
            "conversion between {} and {}",
            sf.name(),
            df.name()
        )));
    }

    if sf == df {
        copy_same_format(src, dst);
        return Ok(());
    }

    if try_swizzle(src, dst) {
        return Ok(());
    }

    trace!(src = sf.name(), dst = df.name(), "unoptimised pixel conversion");
    fallback_convert(src, dst)
}

fn packed_full_view(b: &PixelBox<'_>) -> bool {
    let e = b.extent();
    b.is_consecutive() && e.left == 0 && e.top == 0 && e.front == 0
}

fn zero_origin_mut(b: &PixelBoxMut<'_>) -> bool {
    let e = b.extent();
    e.left == 0 && e.top == 0 && e.front == 0
}

fn copy_same_format(src: &PixelBox<'_>, dst: &mut PixelBoxMut<'_>) {
    let elem = src.format().bytes_per_element();
    if src.is_consecutive()
        && dst.is_consecutive()
        && packed_full_view(src)
        && zero_origin_mut(dst)
    {
        let size = src
            .format()
            .memory_size(src.width(), src.height(), src.depth());
        dst.data[..size].copy_from_slice(&src.data()[..size]);
        return;
    }
    let row_bytes = src.width() as usize * elem;
    for z in 0..src.depth() {
        for y in 0..src.height() {
            let s = src.layout.byte_offset(0, y, z);
            let d = dst.layout.byte_offset(0, y, z);
            dst.data[d..d + row_bytes].copy_from_slice(&src.data()[s..s + row_bytes]);
        }
    }
}

/// Applies a per-pixel byte transform over both views, honouring pitches.
fn map_pixels<const S: usize, const D: usize>(
    src: &PixelBox<'_>,
    dst: &mut PixelBoxMut<'_>,
    f: impl Fn([u8; S]) -> [u8; D],
) {
    let width = src.width() as usize;
    for z in 0..src.depth() {
        for y in 0..src.height() {
            let s = src.layout.byte_offset(0, y, z);
            let d = dst.layout.byte_offset(0, y, z);
            let src_row = &src.data()[s..s + width * S];
            let dst_row = &mut dst.data[d..d + width * D];
            for (sp, dp) in src_row.chunks_exact(S).zip(dst_row.chunks_exact_mut(D)) {
                let mut bytes = [0u8; S];
                bytes.copy_from_slice(sp);
                dp.copy_from_slice(&f(bytes));
            }
        }
    }
}

/// Channel bit positions `(a, r, g, b)` inside a 32-bit element, for the
/// layouts the optimised swizzles cover.
const fn shifts32(format: PixelFormat) -> Option<(u32, u32, u32, u32)> {
    match format {
        PixelFormat::A8R8G8B8 | PixelFormat::X8R8G8B8 => Some((24, 16, 8, 0)),
        PixelFormat::A8B8G8R8 | PixelFormat::X8B8G8R8 => Some((24, 0, 8, 16)),
        PixelFormat::B8G8R8A8 => Some((0, 8, 16, 24)),
        PixelFormat::R8G8B8A8 => Some((0, 24, 16, 8)),
        _ => None,
    }
}

/// Byte positions `(r, g, b)` inside a 24-bit element.
const fn offsets24(format: PixelFormat) -> Option<(usize, usize, usize)> {
    match format {
        PixelFormat::R8G8B8 => Some((2, 1, 0)),
        PixelFormat::B8G8R8 => Some((0, 1, 2)),
        _ => None,
    }
}

/// Tries the optimised swizzle paths; returns false when no fast path
/// covers the pair.
#[allow(clippy::too_many_lines)]
fn try_swizzle(src: &PixelBox<'_>, dst: &mut PixelBoxMut<'_>) -> bool {
    use PixelFormat::{L16, L8, R8};
    let (sf, df) = (src.format(), dst.format());

    // 32-bit permutations, including the X8 sources whose destination alpha
    // is forced opaque.
    if let (Some((sa, sr, sg, sb)), Some((da, dr, dg, db))) = (shifts32(sf), shifts32(df)) {
        let opaque = !sf.has_alpha();
        map_pixels::<4, 4>(src, dst, |p| {
            let x = u32::from_le_bytes(p);
            let a = if opaque { 0xff } else { (x >> sa) & 0xff };
            let r = (x >> sr) & 0xff;
            let g = (x >> sg) & 0xff;
            let b = (x >> sb) & 0xff;
            ((a << da) | (r << dr) | (g << dg) | (b << db)).to_le_bytes()
        });
        return true;
    }

    // 24-bit component orders, and 24-bit to 32-bit widening.
    if let (Some((sr, sg, sb)), Some((dr, dg, db))) = (offsets24(sf), offsets24(df)) {
        map_pixels::<3, 3>(src, dst, |p| {
            let mut out = [0u8; 3];
            out[dr] = p[sr];
            out[dg] = p[sg];
            out[db] = p[sb];
            out
        });
        return true;
    }
    if let (Some((sr, sg, sb)), Some((da, dr, dg, db))) = (offsets24(sf), shifts32(df)) {
        map_pixels::<3, 4>(src, dst, |p| {
            ((0xffu32 << da)
                | (u32::from(p[sr]) << dr)
                | (u32::from(p[sg]) << dg)
                | (u32::from(p[sb]) << db))
                .to_le_bytes()
        });
        return true;
    }
    if let (Some((_, sr, sg, sb)), Some((dr, dg, db))) = (shifts32(sf), offsets24(df)) {
        map_pixels::<4, 3>(src, dst, |p| {
            let x = u32::from_le_bytes(p);
            let mut out = [0u8; 3];
            out[dr] = ((x >> sr) & 0xff) as u8;
            out[dg] = ((x >> sg) & 0xff) as u8;
            out[db] = ((x >> sb) & 0xff) as u8;
            out
        });
        return true;
    }

    // Single-channel fast paths.
    match (sf, df) {
        (L8 | R8, _) if shifts32(df).is_some() => {
            let Some((da, dr, dg, db)) = shifts32(df) else {
                return false;
            };
            let replicate = sf == L8;
            map_pixels::<1, 4>(src, dst, |p| {
                let v = u32::from(p[0]);
                let (g, b) = if replicate { (v, v) } else { (0, 0) };
                ((0xffu32 << da) | (v << dr) | (g << dg) | (b << db)).to_le_bytes()
            });
            true
        }
        (_, L8 | R8) if shifts32(sf).is_some() => {
            let Some((_, sr, _, _)) = shifts32(sf) else {
                return false;
            };
            map_pixels::<4, 1>(src, dst, |p| {
                [((u32::from_le_bytes(p) >> sr) & 0xff) as u8]
            });
            true
        }
        (L8, R8) | (R8, L8) => {
            map_pixels::<1, 1>(src, dst, |p| p);
            true
        }
        (L8, L16) => {
            map_pixels::<1, 2>(src, dst, |p| {
                (fixed_to_fixed(u64::from(p[0]), 8, 16) as u16).to_le_bytes()
            });
            true
        }
        (L16, L8) => {
            map_pixels::<2, 1>(src, dst, |p| {
                [fixed_to_fixed(u64::from(u16::from_le_bytes(p)), 16, 8) as u8]
            });
            true
        }
        _ => false,
    }
}

fn fallback_convert(src: &PixelBox<'_>, dst: &mut PixelBoxMut<'_>) -> EmberResult<()> {
    let selem = src.format().bytes_per_element();
    let delem = dst.format().bytes_per_element();
    let (sf, df) = (src.format(), dst.format());
    for z in 0..src.depth() {
        for y in 0..src.height() {
            for x in 0..src.width() {
                let s = src.layout.byte_offset(x, y, z);
                let d = dst.layout.byte_offset(x, y, z);
                let colour = unpack(sf, &src.data()[s..s + selem])?;
                pack(colour, df, &mut dst.data[d..d + delem])?;
            }
        }
    }
    Ok(())
}

/// Flips a view upside down in place, slice by slice.
///
/// Fails on compressed formats; rows below block granularity cannot be
/// exchanged.
pub fn vertical_flip(image: &mut PixelBoxMut<'_>) -> EmberResult<()> {
    if image.format().is_compressed() {
        return Err(EmberError::InvalidParameters(format!(
            "cannot flip compressed format {}",
            image.format().name()
        )));
    }
    let elem = image.format().bytes_per_element();
    let row_bytes = image.width() as usize * elem;
    let mut scratch = vec![0u8; row_bytes];
    for z in 0..image.depth() {
        let height = image.height();
        for y in 0..height / 2 {
            let top = image.layout.byte_offset(0, y, z);
            let bottom = image.layout.byte_offset(0, height - 1 - y, z);
            scratch.copy_from_slice(&image.data[top..top + row_bytes]);
            image.data.copy_within(bottom..bottom + row_bytes, top);
            image.data[bottom..bottom + row_bytes].copy_from_slice(&scratch);
        }
    }
    Ok(())
}

/// Reads the colour at box-relative coordinates.
pub fn colour_at(image: &PixelBox<'_>, x: u32, y: u32, z: u32) -> EmberResult<ColourValue> {
    let in_bounds = x < image.width() && y < image.height() && z < image.depth();
    check_coords(image.format(), in_bounds)?;
    let elem = image.format().bytes_per_element();
    let offset = image.layout.byte_offset(x, y, z);
    unpack(image.format(), &image.data()[offset..offset + elem])
}

/// Writes the colour at box-relative coordinates.
pub fn set_colour_at(
    image: &mut PixelBoxMut<'_>,
    x: u32,
    y: u32,
    z: u32,
    colour: ColourValue,
) -> EmberResult<()> {
    let in_bounds = x < image.width() && y < image.height() && z < image.depth();
    check_coords(image.format(), in_bounds)?;
    let elem = image.format().bytes_per_element();
    let offset = image.layout.byte_offset(x, y, z);
    pack(colour, image.format(), &mut image.data[offset..offset + elem])
}

fn check_coords(format: PixelFormat, in_bounds: bool) -> EmberResult<()> {
    if format.is_compressed() {
        return Err(EmberError::InvalidParameters(format!(
            "single texels of compressed format {} are not addressable",
            format.name()
        )));
    }
    if !in_bounds {
        return Err(EmberError::InvalidParameters(
            "coordinate outside the view extent".to_string(),
        ));
    }
    Ok(())
}
