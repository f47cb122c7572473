//! Pseudo-random number source.
//!
//! Arrival offsets, burst durations, block sizes and generated owner labels all
//! come from a [`RandomSource`]. The models own it as a boxed trait object so tests
//! can inject scripted or mocked sources. The default [`XorShift64`] generator is a
//! small xorshift LFSR, seeded explicitly so whole sessions replay exactly.

/// Seed substituted for zero, which would lock xorshift at zero forever.
const FALLBACK_SEED: u64 = 123_456_789;

/// Trait for the randomness consumed by the simulation models.
pub trait RandomSource: Send {
    /// Returns the next raw 64-bit value.
    fn next_u64(&mut self) -> u64;

    /// Returns a value in `[0, bound)`; always 0 when `bound` is 0.
    fn below(&mut self, bound: u64) -> u64 {
        if bound == 0 { 0 } else { self.next_u64() % bound }
    }

    /// Returns a value in `[low, high]` (inclusive). Swapped bounds are reordered.
    fn between(&mut self, low: u64, high: u64) -> u64 {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        match (high - low).checked_add(1) {
            Some(span) => low + self.below(span),
            None => self.next_u64(),
        }
    }
}

/// Xorshift64 generator.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a generator from `seed`. A zero seed is replaced by a fixed constant.
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { FALLBACK_SEED } else { seed },
        }
    }
}

impl Default for XorShift64 {
    fn default() -> Self {
        Self::new(FALLBACK_SEED)
    }
}

impl RandomSource for XorShift64 {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}
