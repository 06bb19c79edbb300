//! Convenience module providing default imports.
//!
//! This imports the common structs into the current scope, and the other
//! modules namespaced by their base name.
//!
//! ## Examples
//!
//! ```
//! use faststack::import::*;
//!
//! // Engine and Options are in scope
//! let mut engine = Engine::new(Options::default());
//! engine.tick(&Input::default());
//! ```
//!
//! This would otherwise require the following imports.
//!
//! ```
//! use faststack::engine::Engine;
//! use faststack::options::Options;
//! use faststack::input::Input;
//! ```

pub use controller::{self, Controller, Keymap, VirtualKey};
pub use engine::{Engine, GameState};
pub use field::Field;
pub use ini;
pub use input::{self, Input};
pub use options::{InitialActionStyle, LockStyle, OptionError, Options};
pub use piece::PieceType;
pub use randomizer::{self, Randomizer, RandomizerKind};
pub use replay::{Replay, ReplayError};
pub use rotation::{self, RotationSystemKind};
pub use schema::Schema;
