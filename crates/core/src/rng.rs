//! RNG module - 7-bag random piece generation
//!
//! Each bag holds one of each piece (I, O, T, S, Z, J, L), shuffled, and is
//! drained completely before the next bag is shuffled. The same seed always
//! yields the same infinite sequence, which is what lets every client in a
//! room rebuild identical piece orders from a single integer.
//!
//! Also provides a simple LCG used for shuffling and garbage holes.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, QUEUE_LOOKAHEAD};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Scales the full 32-bit output instead of taking a modulus; the low
    /// bits of an LCG cycle with a short period.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// 7-bag piece generator with a bounded lookahead
#[derive(Debug, Clone)]
pub struct PieceQueue {
    /// Pieces left in the current bag, in draw order
    bag: ArrayVec<PieceKind, 7>,
    /// Index into current bag
    bag_index: usize,
    /// RNG for shuffling
    rng: SimpleRng,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32) -> Self {
        let mut queue = Self {
            bag: ArrayVec::new(),
            bag_index: 0,
            rng: SimpleRng::new(seed),
        };
        queue.refill_bag();
        queue
    }

    fn shuffled_bag(rng: &mut SimpleRng) -> ArrayVec<PieceKind, 7> {
        let mut bag = ArrayVec::from(PieceKind::ALL);
        rng.shuffle(&mut bag);
        bag
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        self.bag = Self::shuffled_bag(&mut self.rng);
        self.bag_index = 0;
    }

    /// Pull the next piece, refilling the bag when it runs dry
    pub fn next_piece(&mut self) -> PieceKind {
        if self.bag_index >= self.bag.len() {
            self.refill_bag();
        }

        let piece = self.bag[self.bag_index];
        self.bag_index += 1;
        piece
    }

    /// The next `QUEUE_LOOKAHEAD` pieces, in draw order.
    ///
    /// Stack-only. Pieces past the current bag are previewed from a copy of
    /// the RNG, so the preview always matches what `next_piece` will return.
    pub fn upcoming(&self) -> [PieceKind; QUEUE_LOOKAHEAD] {
        let mut out = [PieceKind::I; QUEUE_LOOKAHEAD];
        let mut preview_rng = self.rng.clone();
        let mut bag = self.bag.clone();
        let mut idx = self.bag_index;

        for slot in out.iter_mut() {
            if idx >= bag.len() {
                bag = Self::shuffled_bag(&mut preview_rng);
                idx = 0;
            }
            *slot = bag[idx];
            idx += 1;
        }

        out
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> PieceKind {
        self.upcoming()[0]
    }

    /// Pieces left in the current bag
    pub fn remaining_in_bag(&self) -> usize {
        self.bag.len() - self.bag_index
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_next_range_in_bounds() {
        let mut rng = SimpleRng::new(7);
        let mut seen = [false; 10];
        for _ in 0..1000 {
            let v = rng.next_range(10);
            assert!(v < 10);
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_piece_queue_draws_all_seven() {
        let mut queue = PieceQueue::new(1);
        assert_eq!(queue.remaining_in_bag(), 7);

        let mut drawn = Vec::new();
        for _ in 0..7 {
            drawn.push(queue.next_piece());
        }

        for kind in PieceKind::ALL {
            assert!(drawn.contains(&kind), "Missing piece: {:?}", kind);
        }
        assert_eq!(queue.remaining_in_bag(), 0);
    }

    #[test]
    fn test_every_aligned_window_is_a_permutation() {
        let mut queue = PieceQueue::new(42);
        for _ in 0..20 {
            let mut window: Vec<PieceKind> = (0..7).map(|_| queue.next_piece()).collect();
            window.sort_by_key(|k| k.as_str());
            let mut all = PieceKind::ALL.to_vec();
            all.sort_by_key(|k| k.as_str());
            assert_eq!(window, all);
        }
    }

    #[test]
    fn test_upcoming_matches_draws_across_bag_boundary() {
        let mut queue = PieceQueue::new(99);
        for _ in 0..5 {
            queue.next_piece();
        }

        let preview = queue.upcoming();
        let drawn: Vec<PieceKind> = (0..QUEUE_LOOKAHEAD).map(|_| queue.next_piece()).collect();
        assert_eq!(preview.to_vec(), drawn);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut queue = PieceQueue::new(3);
        let peeked = queue.peek();
        assert_eq!(queue.peek(), peeked);
        assert_eq!(queue.next_piece(), peeked);
    }
}
