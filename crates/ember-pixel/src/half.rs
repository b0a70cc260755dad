//! Half-precision float conversion following the OpenEXR reference:
//! denormals are renormalised, infinities and NaNs keep their sign and the
//! high mantissa bit, and mantissas round to nearest even.

/// Converts a single-precision float to its 16-bit half representation.
#[must_use]
pub fn float_to_half(value: f32) -> u16 {
    float_bits_to_half(value.to_bits())
}

/// Converts a 16-bit half to single precision.
#[must_use]
pub fn half_to_float(half: u16) -> f32 {
    f32::from_bits(half_to_float_bits(half))
}

/// Bit-level float32 -> float16 conversion.
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub fn float_bits_to_half(bits: u32) -> u16 {
    let sign = ((bits >> 16) & 0x8000) as i32;
    let mut exponent = (((bits >> 23) & 0xff) as i32) - (127 - 15);
    let mut mantissa = (bits & 0x007f_ffff) as i32;

    if exponent <= 0 {
        if exponent < -10 {
            // Magnitude too small for even a half denormal: signed zero.
            return sign as u16;
        }
        // Denormalise: restore the implicit leading bit, then shift with
        // round-to-nearest-even.
        mantissa |= 0x0080_0000;
        let shift = 14 - exponent;
        let round = (1 << (shift - 1)) - 1;
        let odd = (mantissa >> shift) & 1;
        mantissa = (mantissa + round + odd) >> shift;
        (sign | mantissa) as u16
    } else if exponent == 0xff - (127 - 15) {
        if mantissa == 0 {
            // Infinity keeps its sign.
            (sign | 0x7c00) as u16
        } else {
            // NaN: preserve the high mantissa bits; never collapse to inf.
            mantissa >>= 13;
            (sign | 0x7c00 | mantissa | i32::from(mantissa == 0)) as u16
        }
    } else {
        // Normalised: round mantissa to nearest even, handling carry into
        // the exponent.
        mantissa = mantissa + 0x0fff + ((mantissa >> 13) & 1);
        if mantissa & 0x0080_0000 != 0 {
            mantissa = 0;
            exponent += 1;
        }
        if exponent > 30 {
            // Exponent overflow: infinity.
            return (sign | 0x7c00) as u16;
        }
        (sign | (exponent << 10) | (mantissa >> 13)) as u16
    }
}

/// Bit-level float16 -> float32 conversion.
#[must_use]
pub fn half_to_float_bits(half: u16) -> u32 {
    let sign = (u32::from(half) & 0x8000) << 16;
    let mut exponent = i32::from((half >> 10) & 0x1f);
    let mut mantissa = u32::from(half & 0x03ff);

    if exponent == 0 {
        if mantissa == 0 {
            // Signed zero.
            return sign;
        }
        // Denormal: renormalise.
        while mantissa & 0x0400 == 0 {
            mantissa <<= 1;
            exponent -= 1;
        }
        exponent += 1;
        mantissa &= !0x0400;
    } else if exponent == 31 {
        // Infinity or NaN.
        return sign | 0x7f80_0000 | (mantissa << 13);
    }

    #[allow(clippy::cast_sign_loss)]
    let exponent = (exponent + (127 - 15)) as u32;
    sign | (exponent << 23) | (mantissa << 13)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_values_round_trip() {
        for v in [0.0f32, 1.0, -1.0, 0.5, 2.0, 65504.0, -0.25, 1024.0] {
            assert_eq!(half_to_float(float_to_half(v)), v, "{v}");
        }
    }

    #[test]
    fn test_signed_zero() {
        assert_eq!(float_to_half(-0.0), 0x8000);
        assert_eq!(half_to_float(0x8000).to_bits(), (-0.0f32).to_bits());
    }

    #[test]
    fn test_infinities() {
        assert_eq!(float_to_half(f32::INFINITY), 0x7c00);
        assert_eq!(float_to_half(f32::NEG_INFINITY), 0xfc00);
        assert_eq!(half_to_float(0x7c00), f32::INFINITY);
        assert!(half_to_float(0xfc00).is_infinite());
    }

    #[test]
    fn test_nan_stays_nan() {
        let h = float_to_half(f32::NAN);
        assert_eq!(h & 0x7c00, 0x7c00);
        assert_ne!(h & 0x03ff, 0);
        assert!(half_to_float(h).is_nan());
    }

    #[test]
    fn test_overflow_saturates_to_infinity() {
        assert_eq!(float_to_half(1.0e9), 0x7c00);
        assert_eq!(float_to_half(-1.0e9), 0xfc00);
    }

    #[test]
    fn test_denormal_half_round_trips() {
        // Smallest positive half denormal: 2^-24.
        let tiny = half_to_float(0x0001);
        assert!((tiny - 2.0f32.powi(-24)).abs() < f32::EPSILON);
        assert_eq!(float_to_half(tiny), 0x0001);
    }

    #[test]
    fn test_half_precision_error_bound() {
        // Values representable to 11 bits of precision survive a round trip
        // within half an ULP at that precision.
        let mut v = 0.001f32;
        while v < 1000.0 {
            let back = half_to_float(float_to_half(v));
            let rel = ((back - v) / v).abs();
            assert!(rel < 1.0 / 1024.0, "{v} -> {back}");
            v *= 1.37;
        }
    }
}
