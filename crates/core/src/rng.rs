//! RNG module - piece sequence providers
//!
//! The engine never draws pieces itself; it reads the head of a sequence that a
//! [`PieceSource`] produces. Two providers live here:
//!
//! - [`BagGenerator`]: the "7-bag" randomizer. Each bag holds one of each standard piece,
//!   shuffled. A difficulty I-piece weight above 1.0 occasionally adds a second I to a
//!   bag, below 1.0 occasionally removes the I; a weight of exactly 1.0 never skews.
//! - [`ScriptedSource`]: a fixed, finite sequence for tests and replays.
//!
//! Randomness is always injected (`R: Rng`), so the same seed reproduces the same match.

use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::types::{PieceKind, NEXT_QUEUE_LEN};

/// Upcoming pieces as seen by the game state
pub type NextQueue = ArrayVec<PieceKind, NEXT_QUEUE_LEN>;

/// A bag of pieces (7 standard, 8 with an extra I, 6 without the I)
type Bag = ArrayVec<PieceKind, 8>;

/// Producer of the piece sequence
pub trait PieceSource {
    /// Look at the next `count` pieces without consuming them
    ///
    /// At most [`NEXT_QUEUE_LEN`] pieces are returned; fewer if a finite source is
    /// running out.
    fn peek(&self, count: usize) -> NextQueue;

    /// Advance the sequence, returning the piece that was at its head
    fn consume_next(&mut self) -> Option<PieceKind>;
}

/// 7-bag piece generator with optional difficulty skew
#[derive(Debug, Clone)]
pub struct BagGenerator<R: Rng = ChaCha8Rng> {
    rng: R,
    i_piece_weight: f64,
    current: Bag,
    cursor: usize,
    upcoming: Bag,
}

impl BagGenerator<ChaCha8Rng> {
    /// Unskewed generator seeded deterministically
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed), 1.0)
    }
}

impl<R: Rng> BagGenerator<R> {
    /// Create a generator around an injected RNG
    ///
    /// `i_piece_weight` comes from the difficulty preset (1.0 = pure 7-bag).
    pub fn new(rng: R, i_piece_weight: f64) -> Self {
        let mut generator = Self {
            rng,
            i_piece_weight,
            current: Bag::new(),
            cursor: 0,
            upcoming: Bag::new(),
        };
        generator.current = generator.deal_bag();
        generator.upcoming = generator.deal_bag();
        generator
    }

    fn deal_bag(&mut self) -> Bag {
        let mut bag: Bag = PieceKind::STANDARD.iter().copied().collect();

        let skew = (self.i_piece_weight - 1.0).abs().min(1.0);
        if skew > 0.0 && self.rng.gen_bool(skew) {
            if self.i_piece_weight > 1.0 {
                bag.push(PieceKind::I);
            } else {
                bag.retain(|kind| *kind != PieceKind::I);
            }
        }

        bag.shuffle(&mut self.rng);
        bag
    }

    /// Pieces left in the bag currently being dealt
    pub fn remaining_in_bag(&self) -> &[PieceKind] {
        &self.current[self.cursor..]
    }
}

impl<R: Rng> PieceSource for BagGenerator<R> {
    fn peek(&self, count: usize) -> NextQueue {
        self.current[self.cursor..]
            .iter()
            .chain(self.upcoming.iter())
            .copied()
            .take(count.min(NEXT_QUEUE_LEN))
            .collect()
    }

    fn consume_next(&mut self) -> Option<PieceKind> {
        let piece = self.current.get(self.cursor).copied()?;
        self.cursor += 1;

        // Roll over eagerly so that peek always sees at least one full bag ahead.
        if self.cursor >= self.current.len() {
            let next = self.deal_bag();
            self.current = std::mem::replace(&mut self.upcoming, next);
            self.cursor = 0;
        }

        Some(piece)
    }
}

/// A fixed, finite piece sequence
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    pieces: Vec<PieceKind>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(pieces: impl IntoIterator<Item = PieceKind>) -> Self {
        Self {
            pieces: pieces.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Number of pieces not yet consumed
    pub fn remaining(&self) -> usize {
        self.pieces.len() - self.cursor
    }
}

impl PieceSource for ScriptedSource {
    fn peek(&self, count: usize) -> NextQueue {
        self.pieces[self.cursor..]
            .iter()
            .copied()
            .take(count.min(NEXT_QUEUE_LEN))
            .collect()
    }

    fn consume_next(&mut self) -> Option<PieceKind> {
        let piece = self.pieces.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(piece)
    }
}
