//! Rotation systems: entry thetas and wallkick tables.
//!
//! A rotation system is comprised of two parts:
//!
//!  - Entry thetas, added to the raw rotation state before block offsets
//!    are looked up. This lets every system share the SRS-relative offset
//!    tables in `piece` while spawning pieces in its own orientation.
//!
//!  - Kick tables, one per piece and turn direction. A kick table holds an
//!    ordered row of `(x, y)` offsets per rotation state which are tested
//!    in order until one fits or every test has been tried.
//!
//! All tables are static, read-only data. A piece without a table for some
//! direction uses the empty table, which tests only `(0, 0)`.

use piece::{PieceType, PIECE_COUNT, ROTATION_COUNT};
use serde::{Deserialize, Serialize};

/// Kick offsets tried on rotation, one row per current rotation state.
///
/// Offsets extend right and down, so a negative `y` kicks the piece
/// upwards (a floorkick).
pub type KickTable = [&'static [(i32, i32)]; ROTATION_COUNT];

/// The kick row used when a piece has no table for a direction.
pub static EMPTY_KICKS: [(i32, i32); 1] = [(0, 0)];

/// A single rotation system definition.
pub struct RotationSystem {
    /// Initial theta offset per piece.
    pub entry_theta: [u8; PIECE_COUNT],

    /// Kick tables for clockwise turns.
    pub kicks_cw: [Option<&'static KickTable>; PIECE_COUNT],

    /// Kick tables for anticlockwise turns.
    pub kicks_ccw: [Option<&'static KickTable>; PIECE_COUNT],

    /// Kick tables for half turns.
    pub kicks_half: [Option<&'static KickTable>; PIECE_COUNT],
}

impl RotationSystem {
    /// Return the kick row to test for the given piece, turn direction and
    /// current rotation state.
    ///
    /// Directions follow the input encoding: `1` clockwise, `-1`
    /// anticlockwise, `2` half turn. Any other value is a programming
    /// error and falls back to the empty row.
    pub fn kick_tests(&self, piece: PieceType, direction: i8, theta: u8) -> &'static [(i32, i32)] {
        let table = match direction {
            1 => self.kicks_cw[piece.index()],
            -1 => self.kicks_ccw[piece.index()],
            2 => self.kicks_half[piece.index()],
            _ => {
                debug_assert!(false, "invalid rotation direction: {}", direction);
                None
            }
        };

        match table {
            Some(table) => table[theta as usize & 3],
            None => &EMPTY_KICKS[..],
        }
    }
}

/// Selector for the available rotation systems.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum RotationSystemKind {
    Simple,
    Sega,
    Srs,
    ArikaSrs,
    Tgm12,
    Tgm3,
    Dtet,
}

impl RotationSystemKind {
    /// Return the static definition for this system.
    pub fn def(self) -> &'static RotationSystem {
        match self {
            RotationSystemKind::Simple => &SIMPLE,
            RotationSystemKind::Sega => &SEGA,
            RotationSystemKind::Srs => &SRS,
            RotationSystemKind::ArikaSrs => &ARIKA_SRS,
            RotationSystemKind::Tgm12 => &TGM12,
            RotationSystemKind::Tgm3 => &TGM3,
            RotationSystemKind::Dtet => &DTET,
        }
    }
}

// Piece table order is I, J, L, O, S, T, Z throughout.

/// Spawn orientations used by the Sega lineage (J, L and T flat side down).
const FLAT_ENTRY: [u8; PIECE_COUNT] = [0, 2, 2, 0, 0, 2, 0];

static SIMPLE_TABLE: KickTable = [
    &[(0, 0), (1, 0), (-1, 0)],
    &[(0, 0), (1, 0), (-1, 0)],
    &[(0, 0), (1, 0), (-1, 0)],
    &[(0, 0), (1, 0), (-1, 0)],
];

static SIMPLE: RotationSystem = RotationSystem {
    entry_theta: [0; PIECE_COUNT],
    kicks_cw: [Some(&SIMPLE_TABLE); PIECE_COUNT],
    kicks_ccw: [Some(&SIMPLE_TABLE); PIECE_COUNT],
    kicks_half: [None; PIECE_COUNT],
};

static SEGA: RotationSystem = RotationSystem {
    entry_theta: FLAT_ENTRY,
    kicks_cw: [None; PIECE_COUNT],
    kicks_ccw: [None; PIECE_COUNT],
    kicks_half: [None; PIECE_COUNT],
};

static SRS_CW_JLSTZ: KickTable = [
    &[(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    &[(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    &[(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    &[(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

static SRS_CCW_JLSTZ: KickTable = [
    &[(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    &[(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    &[(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    &[(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

static SRS_CW_I: KickTable = [
    &[(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    &[(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    &[(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    &[(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
];

static SRS_CCW_I: KickTable = [
    &[(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    &[(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    &[(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    &[(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
];

static SRS: RotationSystem = RotationSystem {
    entry_theta: [0; PIECE_COUNT],
    kicks_cw: [
        Some(&SRS_CW_I),
        Some(&SRS_CW_JLSTZ),
        Some(&SRS_CW_JLSTZ),
        None,
        Some(&SRS_CW_JLSTZ),
        Some(&SRS_CW_JLSTZ),
        Some(&SRS_CW_JLSTZ),
    ],
    kicks_ccw: [
        Some(&SRS_CCW_I),
        Some(&SRS_CCW_JLSTZ),
        Some(&SRS_CCW_JLSTZ),
        None,
        Some(&SRS_CCW_JLSTZ),
        Some(&SRS_CCW_JLSTZ),
        Some(&SRS_CCW_JLSTZ),
    ],
    kicks_half: [None; PIECE_COUNT],
};

// Arika's SRS variant differs from SRS only in the I tables, which keep
// the floorkicks symmetric between left- and right-handed turns.

static ARIKA_CW_I: KickTable = [
    &[(0, 0), (-2, 0), (1, 0), (1, -2), (-2, 1)],
    &[(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    &[(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    &[(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
];

static ARIKA_CCW_I: KickTable = [
    &[(0, 0), (2, 0), (-1, 0), (-1, -2), (2, 1)],
    &[(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    &[(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    &[(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
];

static ARIKA_SRS: RotationSystem = RotationSystem {
    entry_theta: [0; PIECE_COUNT],
    kicks_cw: [
        Some(&ARIKA_CW_I),
        Some(&SRS_CW_JLSTZ),
        Some(&SRS_CW_JLSTZ),
        None,
        Some(&SRS_CW_JLSTZ),
        Some(&SRS_CW_JLSTZ),
        Some(&SRS_CW_JLSTZ),
    ],
    kicks_ccw: [
        Some(&ARIKA_CCW_I),
        Some(&SRS_CCW_JLSTZ),
        Some(&SRS_CCW_JLSTZ),
        None,
        Some(&SRS_CCW_JLSTZ),
        Some(&SRS_CCW_JLSTZ),
        Some(&SRS_CCW_JLSTZ),
    ],
    kicks_half: [None; PIECE_COUNT],
};

// TGM kicks one column right, then one left, and never kicks I or O.

static TGM_TABLE: KickTable = [
    &[(0, 0), (1, 0), (-1, 0)],
    &[(0, 0), (1, 0), (-1, 0)],
    &[(0, 0), (1, 0), (-1, 0)],
    &[(0, 0), (1, 0), (-1, 0)],
];

static TGM12: RotationSystem = RotationSystem {
    entry_theta: FLAT_ENTRY,
    kicks_cw: [
        None,
        Some(&TGM_TABLE),
        Some(&TGM_TABLE),
        None,
        Some(&TGM_TABLE),
        Some(&TGM_TABLE),
        Some(&TGM_TABLE),
    ],
    kicks_ccw: [
        None,
        Some(&TGM_TABLE),
        Some(&TGM_TABLE),
        None,
        Some(&TGM_TABLE),
        Some(&TGM_TABLE),
        Some(&TGM_TABLE),
    ],
    kicks_half: [None; PIECE_COUNT],
};

// TGM3 extends TGM12 with I kicks and single-cell floorkicks for I and T.

static TGM3_IT_TABLE: KickTable = [
    &[(0, 0), (1, 0), (-1, 0), (0, -1)],
    &[(0, 0), (1, 0), (-1, 0), (0, -1)],
    &[(0, 0), (1, 0), (-1, 0), (0, -1)],
    &[(0, 0), (1, 0), (-1, 0), (0, -1)],
];

static TGM3: RotationSystem = RotationSystem {
    entry_theta: FLAT_ENTRY,
    kicks_cw: [
        Some(&TGM3_IT_TABLE),
        Some(&TGM_TABLE),
        Some(&TGM_TABLE),
        None,
        Some(&TGM_TABLE),
        Some(&TGM3_IT_TABLE),
        Some(&TGM_TABLE),
    ],
    kicks_ccw: [
        Some(&TGM3_IT_TABLE),
        Some(&TGM_TABLE),
        Some(&TGM_TABLE),
        None,
        Some(&TGM_TABLE),
        Some(&TGM3_IT_TABLE),
        Some(&TGM_TABLE),
    ],
    kicks_half: [None; PIECE_COUNT],
};

// The DTET wallkick is symmetric and generous, kicking towards the turn
// direction first and allowing single-cell downward slips.

static DTET_CW_TABLE: KickTable = [
    &[(0, 0), (1, 0), (-1, 0), (1, 1), (-1, 1)],
    &[(0, 0), (1, 0), (-1, 0), (1, 1), (-1, 1)],
    &[(0, 0), (1, 0), (-1, 0), (1, 1), (-1, 1)],
    &[(0, 0), (1, 0), (-1, 0), (1, 1), (-1, 1)],
];

static DTET_CCW_TABLE: KickTable = [
    &[(0, 0), (-1, 0), (1, 0), (-1, 1), (1, 1)],
    &[(0, 0), (-1, 0), (1, 0), (-1, 1), (1, 1)],
    &[(0, 0), (-1, 0), (1, 0), (-1, 1), (1, 1)],
    &[(0, 0), (-1, 0), (1, 0), (-1, 1), (1, 1)],
];

static DTET: RotationSystem = RotationSystem {
    entry_theta: FLAT_ENTRY,
    kicks_cw: [Some(&DTET_CW_TABLE); PIECE_COUNT],
    kicks_ccw: [Some(&DTET_CCW_TABLE); PIECE_COUNT],
    kicks_half: [None; PIECE_COUNT],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_row_starts_at_origin() {
        let kinds = [
            RotationSystemKind::Simple,
            RotationSystemKind::Sega,
            RotationSystemKind::Srs,
            RotationSystemKind::ArikaSrs,
            RotationSystemKind::Tgm12,
            RotationSystemKind::Tgm3,
            RotationSystemKind::Dtet,
        ];

        for &kind in kinds.iter() {
            for &piece in PieceType::VARIANTS.iter() {
                for &direction in [1i8, -1, 2].iter() {
                    for theta in 0..ROTATION_COUNT as u8 {
                        let tests = kind.def().kick_tests(piece, direction, theta);
                        assert!(!tests.is_empty());
                        assert_eq!(tests[0], (0, 0));
                    }
                }
            }
        }
    }

    #[test]
    fn test_o_piece_never_kicks() {
        let tests = RotationSystemKind::Srs
            .def()
            .kick_tests(PieceType::O, 1, 0);
        assert_eq!(tests, &EMPTY_KICKS[..]);
    }

    #[test]
    fn test_empty_table_on_halfturn() {
        let tests = RotationSystemKind::Srs
            .def()
            .kick_tests(PieceType::T, 2, 3);
        assert_eq!(tests, &EMPTY_KICKS[..]);
    }
}
