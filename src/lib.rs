#![warn(missing_docs)]

//! The faststack library implements the deterministic core of a
//! falling-block stacking game. It advances a single player's game one
//! logic tick at a time in response to an input snapshot: spawning,
//! gravity, movement, rotation with wallkicks, lock delay, line clearing,
//! hold, entry delay and finesse accounting.
//!
//! The crate is headless. It owns no rendering, input capture, audio or
//! I/O; frontends translate raw keys into per-tick [`input::Input`]
//! snapshots (usually through [`controller::Controller`]) and present the
//! engine's public state between ticks.
//!
//! ## Examples
//!
//! ```
//! use faststack::import::*;
//!
//! let mut engine = Engine::new(Options::default());
//!
//! // One logic step; a real frontend calls this every ms_per_tick
//! engine.tick(&Input::default());
//!
//! assert_eq!(engine.total_ticks, 1);
//! ```
//!
//! Intra-module dependencies are as reduced in scope as possible: the
//! field knows nothing of pieces beyond their colour tags, the rotation
//! tables are plain data, and the randomizers draw from an engine-owned
//! seeded RNG so whole games replay from a seed and an input stream.

#[macro_use]
extern crate log;
extern crate itertools;
extern crate rand;
extern crate serde;
extern crate serde_json;
extern crate thiserror;

#[cfg(test)]
extern crate env_logger;

pub mod controller;
pub mod engine;
pub mod field;
pub mod import;
pub mod ini;
pub mod input;
pub mod options;
pub mod piece;
pub mod randomizer;
pub mod replay;
pub mod rotation;
pub mod schema;
