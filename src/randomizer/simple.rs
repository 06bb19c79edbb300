//! Implements a memoryless randomizer.

use piece::PieceType;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// A generic memoryless randomizer.
///
/// This generates a completely arbitrary sequence of pieces with no
/// history or bag constraints.
#[derive(Clone, Default)]
pub struct SimpleRandomizer;

impl SimpleRandomizer {
    /// Return a new `SimpleRandomizer` instance.
    pub fn new() -> SimpleRandomizer {
        SimpleRandomizer
    }

    /// Generate the next piece in the sequence.
    pub fn next_piece(&mut self, rng: &mut StdRng) -> PieceType {
        *PieceType::VARIANTS.choose(rng).unwrap()
    }
}
