//! Deterministic sine-hash generator

/// Default multiplier for integer draws
pub const SEED1: f64 = 49823.3232;

/// Default multiplier for float draws
pub const SEED2: f64 = 92733.112;

/// Reproducible pseudo-random sequence
///
/// Each draw hashes an accumulator through `sin`, then adds the drawn value
/// back into the accumulator, so the same seeds and call order always yield
/// the same city.
#[derive(Clone, Debug)]
pub struct SeededRng {
    c1: f64,
    seed1: f64,
    seed2: f64,
}

impl Default for SeededRng {
    fn default() -> Self {
        Self::new(SEED1, SEED2)
    }
}

impl SeededRng {
    pub fn new(seed1: f64, seed2: f64) -> Self {
        Self { c1: 0.0, seed1, seed2 }
    }

    /// Integer in `[from, to)`, reaching `to` only when the hash peaks
    pub fn int(&mut self, from: i32, to: i32) -> i32 {
        let t = 0.5 + 0.5 * (self.c1 * self.seed1).sin();
        let value = from + (t * (to - from) as f64).floor() as i32;
        self.c1 += value as f64;
        value
    }

    /// Float in `[from, to]`
    pub fn float(&mut self, from: f32, to: f32) -> f32 {
        let (from, to) = (from as f64, to as f64);
        let value = from + (0.5 + 0.5 * (self.c1 * self.seed2).sin()) * (to - from);
        self.c1 += value;
        value as f32
    }
}
