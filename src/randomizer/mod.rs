//! Piece randomizers.
//!
//! A randomizer produces the next piece identity on demand. It owns only
//! its per-variant scratch state; the RNG itself belongs to the engine and
//! is passed in on every draw, which keeps the whole game reproducible
//! from a single seed.
//!
//! The engine re-instantiates the variant whenever its configured selector
//! changes, so a randomizer can be swapped mid-game.

use piece::PieceType;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

pub use self::bag::BagRandomizer;
pub use self::simple::SimpleRandomizer;
pub use self::tgm1::Tgm1Randomizer;
pub use self::tgm2::Tgm2Randomizer;

pub mod bag;
pub mod simple;
pub mod tgm1;
pub mod tgm2;

/// Pieces that are unwelcome as the very first piece of a game.
///
/// An S, Z or O opener forces an overhang or a hole on an empty field, so
/// most variants reroll them at the start.
pub const SZO: [PieceType; 3] = [PieceType::S, PieceType::Z, PieceType::O];

/// Selector for the available randomizer variants.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum RandomizerKind {
    Simple,
    NoSzoBag7,
    Tgm1,
    Tgm2,
}

/// A randomizer variant together with its scratch state.
#[derive(Clone)]
pub enum Randomizer {
    /// Uniform independent draws.
    Simple(SimpleRandomizer),

    /// Shuffled 7-bags whose first game draw avoids S, Z and O.
    NoSzoBag7(BagRandomizer),

    /// History-based rerolls, 4 deep, 4 rolls.
    Tgm1(Tgm1Randomizer),

    /// History-based rerolls, 4 deep, 6 rolls.
    Tgm2(Tgm2Randomizer),
}

impl Randomizer {
    /// Construct fresh scratch state for the given variant.
    pub fn new(kind: RandomizerKind) -> Randomizer {
        match kind {
            RandomizerKind::Simple => Randomizer::Simple(SimpleRandomizer::new()),
            RandomizerKind::NoSzoBag7 => Randomizer::NoSzoBag7(BagRandomizer::new()),
            RandomizerKind::Tgm1 => Randomizer::Tgm1(Tgm1Randomizer::new()),
            RandomizerKind::Tgm2 => Randomizer::Tgm2(Tgm2Randomizer::new()),
        }
    }

    /// The selector this state was built for.
    pub fn kind(&self) -> RandomizerKind {
        match *self {
            Randomizer::Simple(_) => RandomizerKind::Simple,
            Randomizer::NoSzoBag7(_) => RandomizerKind::NoSzoBag7,
            Randomizer::Tgm1(_) => RandomizerKind::Tgm1,
            Randomizer::Tgm2(_) => RandomizerKind::Tgm2,
        }
    }

    /// Draw the next piece.
    pub fn next_piece(&mut self, rng: &mut StdRng) -> PieceType {
        match *self {
            Randomizer::Simple(ref mut r) => r.next_piece(rng),
            Randomizer::NoSzoBag7(ref mut r) => r.next_piece(rng),
            Randomizer::Tgm1(ref mut r) => r.next_piece(rng),
            Randomizer::Tgm2(ref mut r) => r.next_piece(rng),
        }
    }
}
