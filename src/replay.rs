//! Recording and replaying of games.
//!
//! A game is fully determined by its options, the randomizer seed drawn
//! at reset and the sequence of input snapshots, so a replay is exactly
//! those three things. Replays serialise to JSON.

use engine::Engine;
use input::Input;
use options::Options;

use serde::{Deserialize, Serialize};
use serde_json;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Error raised while saving or loading a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The file could not be read or written.
    #[error("replay io error: {0}")]
    Io(#[from] io::Error),

    /// The file contents were not a valid replay.
    #[error("replay format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// A recorded game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Replay {
    /// The options the game was played under.
    pub options: Options,

    /// The seed the engine drew at reset.
    pub seed: u64,

    /// One input snapshot per tick, in order.
    inputs: Vec<Input>,
}

impl Replay {
    /// Start a recording for the given engine.
    ///
    /// Captures the engine's options and drawn seed; call `push` with
    /// every input that is fed to `tick`.
    pub fn start(engine: &Engine) -> Replay {
        Replay {
            options: engine.options.clone(),
            seed: engine.seed,
            inputs: Vec::new(),
        }
    }

    /// Record one tick's input.
    pub fn push(&mut self, input: Input) {
        self.inputs.push(input);
    }

    /// Number of recorded ticks.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Is the recording empty?
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Iterate over the recorded inputs in tick order.
    pub fn inputs(&self) -> ::std::slice::Iter<Input> {
        self.inputs.iter()
    }

    /// Construct an engine primed to replay this recording: same options,
    /// same seed. Feeding `inputs()` to it tick by tick reproduces the
    /// game.
    pub fn engine(&self) -> Engine {
        let mut options = self.options.clone();
        options.seed = Some(self.seed);
        Engine::new(options)
    }

    /// Serialise to a JSON string.
    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialise from a JSON string.
    pub fn from_json(source: &str) -> Result<Replay, ReplayError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Write this replay to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ReplayError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a replay from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Replay, ReplayError> {
        Replay::from_json(&fs::read_to_string(path)?)
    }
}
