//! RNG module - seeded sequence generation and 7-bag piece queue
//!
//! Both sides of a match construct a [`SeededRng`] from the same seed, which
//! keeps piece queues and ability randomness identical between an authoritative
//! host and a client, or between two peers simulating independently.
//!
//! Randomness is always passed explicitly. Code that consumes it is generic
//! over [`RandomSource`]; practice mode hands in an [`AmbientRng`] instead of a
//! seeded one.

use rand::Rng;

use crate::types::PieceKind;

/// A source of uniform randomness.
///
/// Only [`RandomSource::next_f64`] is required; every other helper derives from
/// it so seeded and ambient sources produce values the same way.
pub trait RandomSource {
    /// Next value in `[0, 1)`
    fn next_f64(&mut self) -> f64;

    /// Next integer in `[0, max)`; returns 0 when `max` is 0
    fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        let v = (self.next_f64() * max as f64).floor() as u32;
        v.min(max - 1)
    }

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniformly chosen piece kind
    fn choose_kind(&mut self) -> PieceKind {
        PieceKind::ALL[self.next_int(PieceKind::ALL.len() as u32) as usize]
    }

    /// Shuffle a slice using Fisher-Yates
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_int((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Linear congruential generator with Numerical Recipes constants.
///
/// `state' = state * 1664525 + 1013904223 (mod 2^32)` and every output is
/// `state' / 2^32`. The 32-bit state is the whole generator, so two instances
/// built from the same seed agree forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state (equal to the seed before the first draw)
    pub fn seed(&self) -> u32 {
        self.state
    }

    /// Advance and return the raw 32-bit state
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }
}

impl RandomSource for SeededRng {
    fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

/// Non-deterministic randomness for local practice mode.
#[derive(Debug, Default)]
pub struct AmbientRng {
    inner: rand::rngs::ThreadRng,
}

impl AmbientRng {
    pub fn new() -> Self {
        Self {
            inner: rand::thread_rng(),
        }
    }
}

impl RandomSource for AmbientRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// 7-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceQueue {
    bag: [PieceKind; 7],
    bag_index: usize,
    rng: SeededRng,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32) -> Self {
        let mut queue = Self {
            bag: PieceKind::ALL,
            bag_index: 0,
            rng: SeededRng::new(seed),
        };
        queue.refill_bag();
        queue
    }

    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next piece from the queue
    pub fn draw(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }
        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// Current RNG state
    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SeededRng::new(12345);
        let mut rng2 = SeededRng::new(12345);

        for _ in 0..10_000 {
            assert_eq!(rng1.next_f64(), rng2.next_f64());
            assert_eq!(rng1.next_int(97), rng2.next_int(97));
        }
    }

    #[test]
    fn test_rng_first_value_matches_formula() {
        let mut rng = SeededRng::new(0);
        assert_eq!(rng.next_u32(), 1013904223);

        let mut rng = SeededRng::new(1);
        let expected = 1664525u32.wrapping_add(1013904223) as f64 / 4_294_967_296.0;
        assert_eq!(rng.next_f64(), expected);
    }

    #[test]
    fn test_next_int_stays_in_range() {
        let mut rng = SeededRng::new(42);
        for max in 1..50 {
            for _ in 0..20 {
                assert!(rng.next_int(max) < max);
            }
        }
        assert_eq!(rng.next_int(0), 0);
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SeededRng::new(12345);
        let mut rng2 = SeededRng::new(54321);
        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_piece_queue_draws_all_seven() {
        let mut queue = PieceQueue::new(1);

        let drawn: Vec<_> = (0..7).map(|_| queue.draw()).collect();
        for kind in PieceKind::ALL {
            assert!(drawn.contains(&kind), "Missing piece: {:?}", kind);
        }
    }

    #[test]
    fn test_piece_queue_same_seed_same_sequence() {
        let mut a = PieceQueue::new(99);
        let mut b = PieceQueue::new(99);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_ambient_rng_in_range() {
        let mut rng = AmbientRng::new();
        for _ in 0..100 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
