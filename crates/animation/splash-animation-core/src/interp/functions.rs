//! Interpolation helpers:
//! - lerp_f32 (scalar blend)
//! - back_out (overshooting settle)
//! - cubic_out / cubic_in_out (power curves)

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Overshoots past 1 before settling; `strength` controls how far.
#[inline]
pub fn back_out(t: f32, strength: f32) -> f32 {
    let u = t - 1.0;
    1.0 + (strength + 1.0) * u * u * u + strength * u * u
}

#[inline]
pub fn cubic_out(t: f32) -> f32 {
    let u = 1.0 - t;
    1.0 - u * u * u
}

#[inline]
pub fn cubic_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}
