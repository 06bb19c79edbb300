//! Implements the TGM1 randomizer.

use piece::PieceType;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use randomizer::SZO;

/// A TGM1 randomizer.
///
/// Keeps a history of the last 4 pieces and rerolls up to 4 times to avoid
/// dealing a piece still in history, accepting the final roll regardless.
/// The history starts saturated with Z so early repeats are suppressed,
/// and the first piece of a game is rerolled away from S, Z and O.
#[derive(Clone)]
pub struct Tgm1Randomizer {
    /// History of recently dealt pieces, most recent first.
    history: [PieceType; 4],

    /// How many rolls are performed per draw.
    rolls: usize,

    /// Is this the first piece?
    first: bool,
}

impl Tgm1Randomizer {
    /// Return a new `Tgm1Randomizer` instance.
    pub fn new() -> Tgm1Randomizer {
        Tgm1Randomizer {
            history: [PieceType::Z; 4],
            rolls: 4,
            first: true,
        }
    }

    /// Generate the next piece in the sequence.
    pub fn next_piece(&mut self, rng: &mut StdRng) -> PieceType {
        let mut piece = PieceType::None;

        if self.first {
            for _ in 0..self.rolls {
                piece = *PieceType::VARIANTS.choose(rng).unwrap();
                if !SZO.contains(&piece) {
                    break;
                }
            }
            self.first = false;
        } else {
            for _ in 0..self.rolls {
                piece = *PieceType::VARIANTS.choose(rng).unwrap();
                if !self.history.contains(&piece) {
                    break;
                }
            }
        }

        for i in (1..self.history.len()).rev() {
            self.history[i] = self.history[i - 1];
        }
        self.history[0] = piece;

        piece
    }
}

impl Default for Tgm1Randomizer {
    fn default() -> Tgm1Randomizer {
        Tgm1Randomizer::new()
    }
}
