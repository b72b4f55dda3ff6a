//! Deterministic randomness for shuffles.
//!
//! The engine never reaches for a global RNG. Callers hand it a 64-bit
//! entropy value; every draw is derived from that value with [`compute_seed`]
//! and fed through an [`RngOracle`], so a shuffle can be replayed exactly from
//! its entropy.

/// Source of pseudo-random numbers keyed by an explicit seed.
///
/// Implementations must be deterministic: the same seed yields the same value.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Uniform value in `0..bound`. Returns 0 when `bound` is 0.
    ///
    /// Uses rejection sampling so small bounds are not biased towards low values.
    fn below(&self, seed: u64, bound: u32) -> u32 {
        if bound <= 1 {
            return 0;
        }
        let zone = u32::MAX - (u32::MAX % bound);
        let mut draw_seed = seed;
        loop {
            let value = self.next_u32(draw_seed);
            if value < zone {
                return value % bound;
            }
            draw_seed = draw_seed.wrapping_add(0x9e3779b97f4a7c15);
        }
    }
}

/// PCG-XSH-RR generator: 64-bit state, 32-bit output.
///
/// Single multiply, xorshift and rotate; passes PractRand and TestU01.
/// See <https://www.pcg-random.org/>.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Derive the seed for one draw of a mutation.
///
/// * `entropy` - caller-supplied randomness for this mutation
/// * `deck` - deck piece index being shuffled
/// * `draw` - position of the draw within the shuffle
pub fn compute_seed(entropy: u64, deck: u32, draw: u32) -> u64 {
    // SplitMix64 / FxHash style mixing.
    let mut hash = entropy;
    hash ^= (deck as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (draw as u64).wrapping_mul(0x9e3779b97f4a7c15);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xc4ceb9fe1a85ec53);
    hash ^= hash >> 33;

    hash
}
