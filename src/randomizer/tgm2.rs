//! Implements the TGM2 randomizer.

use piece::PieceType;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use randomizer::SZO;

/// A TGM2 randomizer.
///
/// The same shape as TGM1 but with the later history policy: 6 rolls per
/// draw instead of 4, and the history primed with alternating S and Z.
#[derive(Clone)]
pub struct Tgm2Randomizer {
    /// History of recently dealt pieces, most recent first.
    history: [PieceType; 4],

    /// How many rolls are performed per draw.
    rolls: usize,

    /// Is this the first piece?
    first: bool,
}

impl Tgm2Randomizer {
    /// Return a new `Tgm2Randomizer` instance.
    pub fn new() -> Tgm2Randomizer {
        Tgm2Randomizer {
            history: [PieceType::S, PieceType::Z, PieceType::S, PieceType::Z],
            rolls: 6,
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

impl Default for Tgm2Randomizer {
    fn default() -> Tgm2Randomizer {
        Tgm2Randomizer::new()
    }
}
