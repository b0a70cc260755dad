//! Single-pixel packing and unpacking through a float RGBA intermediate.
//!
//! `NATIVE_ENDIAN` formats go through shift/mask arithmetic with
//! fixed-to-fixed scaling; the float, short, byte-LA, and 10-bit packed
//! layouts have format-specific writers and readers. Formats with neither
//! path fail with `NotImplemented` naming the format.

use ember_common::{ColourValue, EmberError, EmberResult};

use crate::descriptor::FormatFlags;
use crate::format::PixelFormat;
use crate::half::{float_to_half, half_to_float};

/// Scales an `n`-bit fixed-point value to `p` bits.
///
/// Widening maps `0 -> 0` and `max -> max` exactly, everything else as
/// `value * 2^p / (2^n - 1)`. Narrowing drops low bits.
#[must_use]
pub fn fixed_to_fixed(value: u64, n: u8, p: u8) -> u64 {
    if n == p {
        value
    } else if n > p {
        value >> (n - p)
    } else if value == 0 {
        0
    } else if value == (1 << n) - 1 {
        (1 << p) - 1
    } else {
        value * (1 << p) / ((1 << n) - 1)
    }
}

/// Converts a float in `[0, 1]` to an `bits`-bit fixed-point value,
/// clamping out-of-range inputs.
#[must_use]
pub fn float_to_fixed(value: f32, bits: u8) -> u64 {
    if value <= 0.0 {
        0
    } else if value >= 1.0 {
        (1 << bits) - 1
    } else {
        #[allow(clippy::cast_sign_loss)]
        let fixed = (value * (1u64 << bits) as f32) as u64;
        fixed
    }
}

/// Converts an `bits`-bit fixed-point value to a float in `[0, 1]`.
#[must_use]
pub fn fixed_to_float(value: u64, bits: u8) -> f32 {
    if bits == 0 {
        0.0
    } else {
        value as f32 / ((1u64 << bits) - 1) as f32
    }
}

/// Reads a little-endian integer element of 1 to 4 bytes.
#[must_use]
pub(crate) fn int_read(src: &[u8], bytes: usize) -> u64 {
    let mut value = 0u64;
    for (i, byte) in src[..bytes].iter().enumerate() {
        value |= u64::from(*byte) << (i * 8);
    }
    value
}

/// Writes a little-endian integer element of 1 to 4 bytes.
pub(crate) fn int_write(dest: &mut [u8], bytes: usize, value: u64) {
    for (i, byte) in dest[..bytes].iter_mut().enumerate() {
        *byte = (value >> (i * 8)) as u8;
    }
}

fn write_u16s(dest: &mut [u8], values: &[u16]) {
    for (chunk, v) in dest.chunks_exact_mut(2).zip(values) {
        chunk.copy_from_slice(&v.to_le_bytes());
    }
}

fn read_u16(src: &[u8], index: usize) -> u16 {
    u16::from_le_bytes([src[index * 2], src[index * 2 + 1]])
}

fn write_f32s(dest: &mut [u8], values: &[f32]) {
    for (chunk, v) in dest.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&v.to_le_bytes());
    }
}

fn read_f32(src: &[u8], index: usize) -> f32 {
    f32::from_le_bytes([
        src[index * 4],
        src[index * 4 + 1],
        src[index * 4 + 2],
        src[index * 4 + 3],
    ])
}

/// Packs a colour into `dest` in the given format.
///
/// `dest` must hold at least `format.bytes_per_element()` bytes.
pub fn pack(colour: ColourValue, format: PixelFormat, dest: &mut [u8]) -> EmberResult<()> {
    let desc = format.descriptor();
    debug_assert!(dest.len() >= desc.elem_bytes as usize);

    if desc.flags.contains(FormatFlags::NATIVE_ENDIAN) {
        let mut value = 0u64;
        for c in 0..4 {
            if desc.bits[c] == 0 {
                continue;
            }
            let channel = float_to_fixed(colour.channel(c), desc.bits[c]);
            value |= (channel << desc.shifts[c]) & desc.masks[c];
        }
        int_write(dest, desc.elem_bytes as usize, value);
        return Ok(());
    }

    match format {
        PixelFormat::ByteLA => {
            dest[0] = (float_to_fixed(colour.r, 8)) as u8;
            dest[1] = (float_to_fixed(colour.a, 8)) as u8;
        }
        PixelFormat::A2B10G10R10 => {
            // Clamp before scaling; the 2-bit alpha saturates hard.
            let c = colour.saturated();
            let value = (float_to_fixed(c.a, 2) << 30)
                | (float_to_fixed(c.b, 10) << 20)
                | (float_to_fixed(c.g, 10) << 10)
                | float_to_fixed(c.r, 10);
            int_write(dest, 4, value);
        }
        PixelFormat::Float16R => write_u16s(dest, &[float_to_half(colour.r)]),
        PixelFormat::Float16Gr => {
            write_u16s(dest, &[float_to_half(colour.g), float_to_half(colour.r)]);
        }
        PixelFormat::Float16Rgb => write_u16s(
            dest,
            &[
                float_to_half(colour.r),
                float_to_half(colour.g),
                float_to_half(colour.b),
            ],
        ),
        PixelFormat::Float16Rgba => write_u16s(
            dest,
            &[
                float_to_half(colour.r),
                float_to_half(colour.g),
                float_to_half(colour.b),
                float_to_half(colour.a),
            ],
        ),
        PixelFormat::Float32R => write_f32s(dest, &[colour.r]),
        PixelFormat::Float32Gr => write_f32s(dest, &[colour.g, colour.r]),
        PixelFormat::Float32Rgb => write_f32s(dest, &[colour.r, colour.g, colour.b]),
        PixelFormat::Float32Rgba => {
            write_f32s(dest, &[colour.r, colour.g, colour.b, colour.a]);
        }
        PixelFormat::ShortGr => write_u16s(
            dest,
            &[
                float_to_fixed(colour.g, 16) as u16,
                float_to_fixed(colour.r, 16) as u16,
            ],
        ),
        PixelFormat::ShortRgb => write_u16s(
            dest,
            &[
                float_to_fixed(colour.r, 16) as u16,
                float_to_fixed(colour.g, 16) as u16,
                float_to_fixed(colour.b, 16) as u16,
            ],
        ),
        PixelFormat::ShortRgba => write_u16s(
            dest,
            &[
                float_to_fixed(colour.r, 16) as u16,
                float_to_fixed(colour.g, 16) as u16,
                float_to_fixed(colour.b, 16) as u16,
                float_to_fixed(colour.a, 16) as u16,
            ],
        ),
        _ => {
            return Err(EmberError::NotImplemented(format!(
                "pack into format {}",
                format.name()
            )));
        }
    }
    Ok(())
}

/// Unpacks a colour from `src` in the given format.
///
/// `src` must hold at least `format.bytes_per_element()` bytes.
pub fn unpack(format: PixelFormat, src: &[u8]) -> EmberResult<ColourValue> {
    let desc = format.descriptor();
    debug_assert!(src.len() >= desc.elem_bytes as usize);

    if desc.flags.contains(FormatFlags::NATIVE_ENDIAN) {
        let value = int_read(src, desc.elem_bytes as usize);
        let mut out = ColourValue::ZERO;
        for c in 0..3 {
            if desc.bits[c] > 0 {
                out.set_channel(
                    c,
                    fixed_to_float((value & desc.masks[c]) >> desc.shifts[c], desc.bits[c]),
                );
            }
        }
        if desc.flags.contains(FormatFlags::LUMINANCE) {
            out.g = out.r;
            out.b = out.r;
        }
        out.a = if desc.bits[3] > 0 {
            fixed_to_float((value & desc.masks[3]) >> desc.shifts[3], desc.bits[3])
        } else {
            1.0
        };
        return Ok(out);
    }

    let colour = match format {
        PixelFormat::ByteLA => {
            let l = fixed_to_float(u64::from(src[0]), 8);
            ColourValue::new(l, l, l, fixed_to_float(u64::from(src[1]), 8))
        }
        PixelFormat::A2B10G10R10 => {
            let value = int_read(src, 4);
            ColourValue::new(
                fixed_to_float(value & 0x3ff, 10),
                fixed_to_float((value >> 10) & 0x3ff, 10),
                fixed_to_float((value >> 20) & 0x3ff, 10),
                fixed_to_float((value >> 30) & 0x3, 2),
            )
        }
        PixelFormat::Float16R => {
            ColourValue::new(half_to_float(read_u16(src, 0)), 0.0, 0.0, 1.0)
        }
        PixelFormat::Float16Gr => ColourValue::new(
            half_to_float(read_u16(src, 1)),
            half_to_float(read_u16(src, 0)),
            0.0,
            1.0,
        ),
        PixelFormat::Float16Rgb => ColourValue::new(
            half_to_float(read_u16(src, 0)),
            half_to_float(read_u16(src, 1)),
            half_to_float(read_u16(src, 2)),
            1.0,
        ),
        PixelFormat::Float16Rgba => ColourValue::new(
            half_to_float(read_u16(src, 0)),
            half_to_float(read_u16(src, 1)),
            half_to_float(read_u16(src, 2)),
            half_to_float(read_u16(src, 3)),
        ),
        PixelFormat::Float32R => ColourValue::new(read_f32(src, 0), 0.0, 0.0, 1.0),
        PixelFormat::Float32Gr => {
            ColourValue::new(read_f32(src, 1), read_f32(src, 0), 0.0, 1.0)
        }
        PixelFormat::Float32Rgb => {
            ColourValue::new(read_f32(src, 0), read_f32(src, 1), read_f32(src, 2), 1.0)
        }
        PixelFormat::Float32Rgba => ColourValue::new(
            read_f32(src, 0),
            read_f32(src, 1),
            read_f32(src, 2),
            read_f32(src, 3),
        ),
        PixelFormat::ShortGr => ColourValue::new(
            fixed_to_float(u64::from(read_u16(src, 1)), 16),
            fixed_to_float(u64::from(read_u16(src, 0)), 16),
            0.0,
            1.0,
        ),
        PixelFormat::ShortRgb => ColourValue::new(
            fixed_to_float(u64::from(read_u16(src, 0)), 16),
            fixed_to_float(u64::from(read_u16(src, 1)), 16),
            fixed_to_float(u64::from(read_u16(src, 2)), 16),
            1.0,
        ),
        PixelFormat::ShortRgba => ColourValue::new(
            fixed_to_float(u64::from(read_u16(src, 0)), 16),
            fixed_to_float(u64::from(read_u16(src, 1)), 16),
            fixed_to_float(u64::from(read_u16(src, 2)), 16),
            fixed_to_float(u64::from(read_u16(src, 3)), 16),
        ),
        _ => {
            return Err(EmberError::NotImplemented(format!(
                "unpack from format {}",
                format.name()
            )));
        }
    };
    Ok(colour)
}
