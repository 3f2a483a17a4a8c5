//! HSL → RGB color conversion and sRGB transfer functions.
//!
//! Material colors are picked on the HSL wheel in sRGB space and converted to
//! linear RGB before upload, since shading and tone mapping happen in linear
//! space and the surface applies the sRGB encode on write.

/// Wrap a hue onto the color wheel, `[0, 1)`.
///
/// Negative and out-of-range hues wrap rather than clamp, so `1.25` and
/// `-0.75` both map to `0.25`.
#[inline]
pub fn wrap_hue(h: f32) -> f32 {
    let wrapped = h.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Convert HSL (hue wraps, saturation/lightness clamp to `[0, 1]`) into
/// sRGB components in `[0, 1]`.
pub fn hsl_to_srgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = wrap_hue(h);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let q = 2.0 * l - p;

    // Rounding can land a hair outside [0, 1] (e.g. green at h = 0.5)
    [
        hue_to_channel(q, p, h + 1.0 / 3.0),
        hue_to_channel(q, p, h),
        hue_to_channel(q, p, h - 1.0 / 3.0),
    ]
    .map(|c| c.clamp(0.0, 1.0))
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * 6.0 * (2.0 / 3.0 - t);
    }
    p
}

/// sRGB electro-optical transfer: encoded component → linear.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c < 0.04045 {
        c * 0.077_399_38
    } else {
        (c * 0.947_867_3 + 0.052_132_7).powf(2.4)
    }
}

/// HSL → linear RGB, ready for a shader uniform.
pub fn hsl_to_linear(h: f32, s: f32, l: f32) -> [f32; 3] {
    hsl_to_srgb(h, s, l).map(|c| srgb_to_linear(c).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgb(actual: [f32; 3], expected: [f32; 3]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn primary_hues() {
        assert_rgb(hsl_to_srgb(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]);
        assert_rgb(hsl_to_srgb(1.0 / 3.0, 1.0, 0.5), [0.0, 1.0, 0.0]);
        assert_rgb(hsl_to_srgb(2.0 / 3.0, 1.0, 0.5), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn hue_wraps_instead_of_clamping() {
        assert_rgb(hsl_to_srgb(1.5, 1.0, 0.5), hsl_to_srgb(0.5, 1.0, 0.5));
        assert_rgb(hsl_to_srgb(-0.25, 1.0, 0.5), hsl_to_srgb(0.75, 1.0, 0.5));
        assert_eq!(wrap_hue(1.0), 0.0);
        assert!((wrap_hue(1.4) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert_rgb(hsl_to_srgb(0.3, 0.0, 0.25), [0.25, 0.25, 0.25]);
    }

    #[test]
    fn full_saturation_half_lightness_stays_in_range() {
        for step in 0..100 {
            let h = 0.5 + step as f32 / 100.0 + 0.9;
            for c in hsl_to_srgb(h, 1.0, 0.5) {
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn cyan_hue_does_not_overshoot() {
        // h = 0.5 is the lowest base hue, so ring 0 can land on it exactly
        let rgb = hsl_to_srgb(0.5, 1.0, 0.5);
        assert!(rgb.iter().all(|c| (0.0..=1.0).contains(c)), "{rgb:?}");
        assert_rgb(rgb, [0.0, 1.0, 1.0]);
        assert_eq!(hsl_to_srgb(1.5, 1.0, 0.5), rgb);

        let linear = hsl_to_linear(0.5, 1.0, 0.5);
        assert!(linear.iter().all(|c| (0.0..=1.0).contains(c)), "{linear:?}");
    }

    #[test]
    fn srgb_transfer_endpoints() {
        assert_eq!(srgb_to_linear(0.0), 0.0);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-5);
        assert!((srgb_to_linear(0.5) - 0.214_041).abs() < 1e-4);
    }
}
