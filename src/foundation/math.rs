#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Normalized progress of `t` through the window `[start, start + duration]`.
///
/// Exactly 0 at or before `start` and exactly 1 at or after `start + duration`; zero-length
/// windows step from 0 to 1 just after `start`.
pub(crate) fn window_progress(t: f64, start: f64, duration: f64) -> f64 {
    if t <= start {
        return 0.0;
    }
    if duration <= 0.0 || t >= start + duration {
        return 1.0;
    }
    ((t - start) / duration).clamp(0.0, 1.0)
}

pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
