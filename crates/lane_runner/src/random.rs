//! Uniform draws on top of an injected [`RngCore`].
//!
//! Every random decision in level generation goes through these helpers so a
//! seeded generator reproduces the same level bit for bit.
use rand::RngCore;

const UNIT_SCALE: f32 = 1.0 / (1u32 << 24) as f32;

/// Generate a random float in the range [0, 1).
///
/// Uses the upper 24 bits of a `u32` draw so the result is exactly
/// representable and never rounds up to 1.0.
#[inline]
pub fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() >> 8) as f32 * UNIT_SCALE
}

/// Uniform float in `[min, max)`. Returns `min` when the range is empty or inverted.
#[inline]
pub fn range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    let u = rand01(rng);
    if max <= min {
        return min;
    }
    min + u * (max - min)
}

/// Uniform index in `[0, len)`. `len` must be non-zero.
#[inline]
pub fn index(rng: &mut dyn RngCore, len: usize) -> usize {
    debug_assert!(len > 0, "index requires a non-empty range");
    let i = (rand01(rng) * len as f32) as usize;
    i.min(len.saturating_sub(1))
}

/// Uniform index in `[start, end)`. Falls back to `start` when the range is empty.
#[inline]
pub fn index_in(rng: &mut dyn RngCore, start: usize, end: usize) -> usize {
    if end <= start {
        return start;
    }
    start + index(rng, end - start)
}

/// Roll against a percentage in `[0, 100]`.
#[inline]
pub fn percent(rng: &mut dyn RngCore, chance: f32) -> bool {
    range(rng, 0.0, 100.0) < chance
}
