//! xorshift64* random stream
//!
//! xorshift64* keeps 64 bits of state and passes BigCrush, which is more
//! than enough for per-individual Bernoulli trials. The state is a plain
//! `u64`, so checkpointing the stream is trivial.

use serde::{Deserialize, Serialize};

/// Seeded random stream shared by all transitions of one run
///
/// # Example
/// ```
/// use disease_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let selected = rng.bernoulli_mask(4, 0.5);
/// assert_eq!(selected.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    /// Create a stream from `seed`
    ///
    /// xorshift cannot leave the all-zero state, so a zero seed is mapped
    /// to 1.
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Next raw 64-bit value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform value in `[min, max)`
    ///
    /// # Panics
    /// Panics if `min >= max`.
    pub fn range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "min must be less than max");

        let range_size = (max - min) as u64;
        min + (self.next() % range_size) as i64
    }

    /// Uniform `f64` in `[0.0, 1.0)` built from the top 53 bits
    pub fn next_f64(&mut self) -> f64 {
        (self.next() >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// One Bernoulli trial with success probability `p`
    ///
    /// Consumes exactly one draw regardless of `p`. Because
    /// `next_f64` never returns 1.0, `p = 1.0` always succeeds and
    /// `p = 0.0` never does.
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// `n` independent Bernoulli trials, drawn in order
    ///
    /// # Example
    /// ```
    /// use disease_simulator_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// assert!(rng.bernoulli_mask(10, 1.0).iter().all(|&hit| hit));
    /// assert!(rng.bernoulli_mask(10, 0.0).iter().all(|&hit| !hit));
    /// ```
    pub fn bernoulli_mask(&mut self, n: usize, p: f64) -> Vec<bool> {
        (0..n).map(|_| self.bernoulli(p)).collect()
    }

    /// Current internal state, for checkpoints
    pub fn get_state(&self) -> u64 {
        self.state
    }
}
