//! Seeded generator behind the hand-drawn jitter.

const MODULUS: u64 = 2_147_483_647;
const MULTIPLIER: u64 = 16_807;

/// Park-Miller minimal standard generator.
///
/// The same seed always yields the same sequence, so an unchanged element
/// renders identically on every frame.
#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    /// Seed 0 (and any multiple of the modulus) is treated as 1.
    pub fn new(seed: u32) -> Self {
        let state = u64::from(seed) % MODULUS;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    /// Generator for fill passes of an element.
    pub fn for_fill(seed: u32) -> Self {
        Self::new(seed)
    }

    /// Generator for stroke passes of an element.
    pub fn for_stroke(seed: u32) -> Self {
        Self::new(seed.wrapping_add(1))
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = self.state * MULTIPLIER % MODULUS;
        (self.state - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Symmetric jitter in `[-roughness, roughness)`.
    pub fn jitter(&mut self, roughness: f64) -> f64 {
        (self.next_f64() - 0.5) * roughness * 2.0
    }
}
