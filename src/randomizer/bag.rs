//! Implements a 7-element bag randomizer.

use piece::{PieceType, PIECE_COUNT};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use randomizer::SZO;

/// A bag randomizer.
///
/// This randomizer deals successive shuffled permutations of the 7 pieces,
/// bounding the distance between sightings of the same piece by 13. The
/// first draw of the first bag is additionally constrained to not be S, Z
/// or O; later bags are plain shuffles.
#[derive(Clone)]
pub struct BagRandomizer {
    /// The pieces in the bag.
    data: [PieceType; PIECE_COUNT],

    /// The current index into the bag.
    head: usize,

    /// Has the first bag been dealt yet?
    first: bool,
}

impl BagRandomizer {
    /// Generate a new `BagRandomizer` instance.
    ///
    /// The bag is dealt lazily so that no RNG state is consumed before the
    /// first draw.
    pub fn new() -> BagRandomizer {
        BagRandomizer {
            data: PieceType::VARIANTS,
            head: PIECE_COUNT,
            first: true,
        }
    }

    /// Generate the next piece in the sequence.
    pub fn next_piece(&mut self, rng: &mut StdRng) -> PieceType {
        if self.head == self.data.len() {
            self.data.shuffle(rng);

            if self.first {
                // Move the first acceptable opener to the front. Four of
                // the seven pieces qualify so one always exists.
                let at = self.data.iter().position(|p| !SZO.contains(p)).unwrap();
                self.data.swap(0, at);
                self.first = false;
            }

            self.head = 0;
        }

        let id = self.data[self.head];
        self.head += 1;
        id
    }
}

impl Default for BagRandomizer {
    fn default() -> BagRandomizer {
        BagRandomizer::new()
    }
}
