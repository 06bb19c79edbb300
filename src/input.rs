//! The per-tick input snapshot consumed by the engine.
//!
//! The engine never sees keys. A host (see `controller`) translates
//! whatever raw input it captures into one `Input` per tick; the engine
//! reads it during dispatch and stores it as `last_input` for debugging.

use serde::{Deserialize, Serialize};

/// Rotation input: no rotation.
pub const ROTATE_NONE: i8 = 0;

/// Rotation input: one clockwise turn.
pub const ROTATE_CW: i8 = 1;

/// Rotation input: one anticlockwise turn.
pub const ROTATE_CCW: i8 = -1;

/// Rotation input: a half turn.
pub const ROTATE_HALF: i8 = 2;

/// `extra` bit: request a hold.
pub const IN_HOLD: u8 = 0x01;

/// `extra` bit: hard drop. The host pairs this with an instant `gravity`
/// contribution so the piece reaches `hard_drop_y` in the same tick.
pub const IN_HARD_DROP: u8 = 0x02;

/// `extra` bit: a fresh directional keypress occurred this tick.
pub const IN_FINESSE_DIRECTION: u8 = 0x04;

/// `extra` bit: a fresh rotational keypress occurred this tick.
pub const IN_FINESSE_ROTATION: u8 = 0x08;

/// `extra` bit: lock a landed piece immediately without dropping it.
pub const IN_LOCK: u8 = 0x10;

/// A gravity contribution large enough to drop any piece to the floor in
/// one tick. Used by hosts to implement hard drops.
pub const INSTANT_GRAVITY: i32 = 1 << 24;

/// Input state applied over a single game tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Net cells of horizontal movement to attempt; sign is direction.
    pub movement: i32,

    /// Rotation to attempt: one of the `ROTATE_*` values.
    pub rotation: i8,

    /// Soft-drop contribution added to the piece's fractional row this
    /// tick, in cells. Pre-computed by the host from `soft_drop_gravity`
    /// and the held keys.
    pub gravity: i32,

    /// Bitset of the `IN_*` flags.
    pub extra: u8,
}

impl Input {
    /// An idle tick.
    pub fn none() -> Input {
        Input::default()
    }

    /// Does this snapshot carry any action at all?
    pub fn is_idle(&self) -> bool {
        self.movement == 0 && self.rotation == 0 && self.gravity == 0 && self.extra == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle() {
        assert!(Input::none().is_idle());
        assert!(!Input {
            extra: IN_HOLD,
            ..Input::default()
        }
        .is_idle());
    }

    #[test]
    fn test_flags_are_distinct() {
        let flags = [
            IN_HOLD,
            IN_HARD_DROP,
            IN_FINESSE_DIRECTION,
            IN_FINESSE_ROTATION,
            IN_LOCK,
        ];
        let mut seen = 0u8;
        for &flag in flags.iter() {
            assert_eq!(seen & flag, 0);
            seen |= flag;
        }
    }
}
