//! Piece identities and their static block offsets.
//!
//! Offsets are defined once, in SRS-relative form. Alternate rotation
//! systems compensate through their entry thetas and kick tables instead of
//! duplicating offset tables (see the `rotation` module).

use serde::{Deserialize, Serialize};

/// Number of distinct piece types.
pub const PIECE_COUNT: usize = 7;

/// Number of rotation states.
pub const ROTATION_COUNT: usize = 4;

/// Number of blocks in a piece.
pub const BLOCKS_PER_PIECE: usize = 4;

/// The identity of a piece.
///
/// `None` is a sentinel used whenever no piece is active, e.g. during entry
/// delay after a lock.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum PieceType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
    None,
}

impl PieceType {
    /// All pieces, in table-index order.
    pub const VARIANTS: [PieceType; PIECE_COUNT] = [
        PieceType::I,
        PieceType::J,
        PieceType::L,
        PieceType::O,
        PieceType::S,
        PieceType::T,
        PieceType::Z,
    ];

    /// Index of this piece into the static tables.
    ///
    /// # Panics
    ///
    /// Panics if called on `PieceType::None`, which never has table data.
    pub fn index(self) -> usize {
        assert!(self != PieceType::None, "no table data for PieceType::None");
        self as usize
    }
}

/// Cell colour tag written into the field when a piece locks, by piece
/// index. Cell values 0 (empty) and 1 (reserved) are never colours; the
/// occupancy test is `> 1`.
pub const PIECE_COLORS: [u8; PIECE_COUNT] = [0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70];

/// Colour tag used for cells that did not come from a piece, e.g. garbage
/// rows set up by tests.
pub const GARBAGE_COLOR: u8 = 0x80;

/// Per-piece, per-rotation block offsets relative to the piece position.
///
/// Coordinates extend right and down with the origin at the upper-left of
/// the field.
pub static PIECE_OFFSETS: [[[(i32, i32); BLOCKS_PER_PIECE]; ROTATION_COUNT]; PIECE_COUNT] = [
    // I
    [
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
        [(1, 0), (1, 1), (1, 2), (1, 3)],
    ],
    // J
    [
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 0)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(0, 2), (1, 0), (1, 1), (1, 2)],
    ],
    // L
    [
        [(0, 1), (1, 1), (2, 0), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (0, 2), (1, 1), (2, 1)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
    // O
    [
        [(1, 0), (1, 1), (2, 0), (2, 1)],
        [(1, 0), (1, 1), (2, 0), (2, 1)],
        [(1, 0), (1, 1), (2, 0), (2, 1)],
        [(1, 0), (1, 1), (2, 0), (2, 1)],
    ],
    // S
    [
        [(0, 1), (1, 0), (1, 1), (2, 0)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(0, 2), (1, 1), (1, 2), (2, 1)],
        [(0, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // T
    [
        [(0, 1), (1, 0), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 1)],
        [(0, 1), (1, 1), (1, 2), (2, 1)],
        [(0, 1), (1, 0), (1, 1), (1, 2)],
    ],
    // Z
    [
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(1, 1), (1, 2), (2, 0), (2, 1)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (0, 2), (1, 0), (1, 1)],
    ],
];
