//! Defines the typed options which parameterise an engine.
//!
//! Options are consumed at reset and read at tick boundaries. The engine
//! never parses text itself: collaborators push typed values, either
//! directly or through the string assignment surface used by the INI
//! layer. Every rejected assignment is reported through the logging
//! façade and leaves the previous value in place.

use controller::{Keymap, VirtualKey};
use field;
use ini;
use randomizer::RandomizerKind;
use rotation::RotationSystemKind;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Maximum number of pieces held in the preview queue.
pub const PREVIEW_MAX: usize = 4;

/// Lock delay reset style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockStyle {
    /// Lock delay is reset only on entry of a new piece.
    Entry,

    /// Lock delay is reset on entry and on any downwards movement.
    Step,

    /// Lock delay is reset on entry and on any successful movement.
    Move,
}

/// How rotation/hold input held during the pre-game countdown is treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialActionStyle {
    /// Pre-game input is ignored.
    None,

    /// Input still held when the countdown ends applies to the first
    /// spawned piece.
    Persistent,

    /// Unimplemented; the assignment surface refuses the token and the
    /// engine treats the value as `None`.
    Trigger,
}

/// Error raised by the string assignment surface.
///
/// These are reported as warnings by `apply` and never stop processing;
/// the engine keeps running on the previous (or default) value.
#[derive(Debug, Error)]
pub enum OptionError {
    /// The key does not name any known option.
    #[error("unknown option `{0}`")]
    UnknownKey(String),

    /// The value failed to parse as the expected type.
    #[error("invalid value `{value}` for `{key}`")]
    BadValue {
        #[allow(missing_docs)]
        key: String,
        #[allow(missing_docs)]
        value: String,
    },

    /// The value parsed but lies outside the accepted range.
    #[error("value `{value}` for `{key}` is out of range")]
    OutOfRange {
        #[allow(missing_docs)]
        key: String,
        #[allow(missing_docs)]
        value: String,
    },

    /// The value names a feature that is not implemented.
    #[error("`{key}` does not support `{value}`")]
    Unsupported {
        #[allow(missing_docs)]
        key: String,
        #[allow(missing_docs)]
        value: String,
    },
}

/// Stores every option consumed by the engine at tick time.
///
/// All durations are integer milliseconds; the two gravities are in
/// blocks per millisecond.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Options {
    /// Field width in cells.
    pub field_width: usize,

    /// Field height in cells.
    pub field_height: usize,

    /// Milliseconds between each game logic update.
    pub ms_per_tick: u32,

    /// Milliseconds between each draw update. Stored for frontends; the
    /// engine itself never reads it.
    pub ms_per_draw: u32,

    /// Length of the entry delay between a lock and the next spawn.
    pub are_delay: u32,

    /// Can the entry delay be cancelled by input?
    pub are_cancellable: bool,

    /// Lock delay reset style in use.
    pub lock_style: LockStyle,

    /// How long a landed piece can be manipulated before locking.
    pub lock_delay: u32,

    /// Rotation system in use.
    pub rotation_system: RotationSystemKind,

    /// How many blocks a piece falls per millisecond.
    pub gravity: f64,

    /// How many blocks a piece falls per millisecond while soft dropping.
    pub soft_drop_gravity: f64,

    /// Randomizer in use.
    pub randomizer: RandomizerKind,

    /// Number of preview pieces exposed to the frontend.
    pub next_piece_count: usize,

    /// Target number of lines to clear.
    pub goal: u32,

    /// How long the "Ready" phase countdown lasts.
    pub ready_phase_length: u32,

    /// How long the "Go" phase countdown lasts.
    pub go_phase_length: u32,

    /// Whether hold is free (does not consume the slot) during the
    /// pre-game countdown.
    pub infinite_ready_go_hold: bool,

    /// Number of upward kicks allowed per piece; 0 means unlimited.
    pub floorkick_limit: u32,

    /// Treatment of input held during the pre-game countdown.
    pub initial_action_style: InitialActionStyle,

    /// Whether a soft drop key contributes gravity only on its initial
    /// press. Read by the keymap collaborator, not by the engine.
    pub one_shot_soft_drop: bool,

    /// Fixed randomizer seed. `None` seeds from process entropy at reset.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            field_width: 10,
            field_height: 20,
            ms_per_tick: 16,
            ms_per_draw: 33,
            are_delay: 0,
            are_cancellable: false,
            lock_style: LockStyle::Move,
            lock_delay: 150,
            rotation_system: RotationSystemKind::Srs,
            gravity: 0.000_625,
            soft_drop_gravity: 0.125,
            randomizer: RandomizerKind::NoSzoBag7,
            next_piece_count: PREVIEW_MAX,
            goal: 40,
            ready_phase_length: 833,
            go_phase_length: 833,
            infinite_ready_go_hold: true,
            floorkick_limit: 0,
            initial_action_style: InitialActionStyle::None,
            one_shot_soft_drop: false,
            seed: None,
        }
    }
}

impl Options {
    /// Construct a new `Options` value with every field defaulted.
    pub fn new() -> Options {
        Options::default()
    }

    /// Assign a single option from its string form.
    ///
    /// `key` is the bare option name (no `game.` prefix), matched
    /// case-insensitively.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), OptionError> {
        let key = key.to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "fieldwidth" => self.field_width = parse_int(&key, value, 4, field::MAX_WIDTH as i64)? as usize,
            "fieldheight" => self.field_height = parse_int(&key, value, 4, field::MAX_HEIGHT as i64)? as usize,
            "mspertick" => self.ms_per_tick = parse_int(&key, value, 1, 100)? as u32,
            "msperdraw" => self.ms_per_draw = parse_int(&key, value, 1, 1000)? as u32,
            "aredelay" => self.are_delay = parse_int(&key, value, 0, 60_000)? as u32,
            "arecancellable" => self.are_cancellable = parse_bool(&key, value)?,
            "lockstyle" => {
                self.lock_style = match value.to_ascii_lowercase().as_str() {
                    "entry" => LockStyle::Entry,
                    "step" => LockStyle::Step,
                    "move" => LockStyle::Move,
                    _ => return Err(bad_value(&key, value)),
                }
            }
            "lockdelay" => self.lock_delay = parse_int(&key, value, 0, 60_000)? as u32,
            "rotationsystem" => {
                self.rotation_system = match value.to_ascii_lowercase().as_str() {
                    "simple" => RotationSystemKind::Simple,
                    "sega" => RotationSystemKind::Sega,
                    "srs" => RotationSystemKind::Srs,
                    "arikasrs" => RotationSystemKind::ArikaSrs,
                    "tgm12" => RotationSystemKind::Tgm12,
                    "tgm3" => RotationSystemKind::Tgm3,
                    "dtet" => RotationSystemKind::Dtet,
                    _ => return Err(bad_value(&key, value)),
                }
            }
            "gravity" => self.gravity = parse_float(&key, value, 0.0, field::MAX_HEIGHT as f64)?,
            "softdropgravity" => {
                self.soft_drop_gravity = parse_float(&key, value, 0.0, field::MAX_HEIGHT as f64)?
            }
            "randomizer" => {
                self.randomizer = match value.to_ascii_lowercase().as_str() {
                    "simple" => RandomizerKind::Simple,
                    "noszobag7" | "bag7" => RandomizerKind::NoSzoBag7,
                    "tgm1" => RandomizerKind::Tgm1,
                    "tgm2" => RandomizerKind::Tgm2,
                    _ => return Err(bad_value(&key, value)),
                }
            }
            "nextpiececount" => {
                self.next_piece_count = parse_int(&key, value, 0, PREVIEW_MAX as i64)? as usize
            }
            "goal" => self.goal = parse_int(&key, value, 1, 100_000)? as u32,
            "readyphaselength" => {
                self.ready_phase_length = parse_int(&key, value, 0, 60_000)? as u32
            }
            "gophaselength" => self.go_phase_length = parse_int(&key, value, 0, 60_000)? as u32,
            "infinitereadygohold" => self.infinite_ready_go_hold = parse_bool(&key, value)?,
            "floorkicklimit" => self.floorkick_limit = parse_int(&key, value, 0, 16)? as u32,
            "initialactionstyle" => {
                self.initial_action_style = match value.to_ascii_lowercase().as_str() {
                    "none" => InitialActionStyle::None,
                    "persistent" => InitialActionStyle::Persistent,
                    "trigger" => {
                        return Err(OptionError::Unsupported {
                            key: key.clone(),
                            value: value.to_string(),
                        })
                    }
                    _ => return Err(bad_value(&key, value)),
                }
            }
            "oneshotsoftdrop" => self.one_shot_soft_drop = parse_bool(&key, value)?,
            "seed" => self.seed = Some(parse_int(&key, value, 0, i64::max_value())? as u64),
            _ => return Err(OptionError::UnknownKey(key.clone())),
        }

        Ok(())
    }
}

fn bad_value(key: &str, value: &str) -> OptionError {
    OptionError::BadValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_int(key: &str, value: &str, min: i64, max: i64) -> Result<i64, OptionError> {
    let parsed: i64 = value.parse().map_err(|_| bad_value(key, value))?;

    if parsed < min || parsed > max {
        return Err(OptionError::OutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    Ok(parsed)
}

fn parse_float(key: &str, value: &str, min: f64, max: f64) -> Result<f64, OptionError> {
    let parsed: f64 = value.parse().map_err(|_| bad_value(key, value))?;

    if !parsed.is_finite() || parsed < min || parsed > max {
        return Err(OptionError::OutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    Ok(parsed)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, OptionError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(bad_value(key, value)),
    }
}

/// Route one `group.key` assignment to the structure that owns it.
///
/// `game.*` assignments land in `options`, `keybind.*` in `keymap`, and
/// `frontend.<name>.*` pairs are returned unchanged for the caller to
/// forward to the named frontend. Anything else is warned about and
/// dropped. Errors never propagate: the previous value stands.
pub fn apply<'a>(
    options: &mut Options,
    keymap: &mut Keymap,
    key: &'a str,
    value: &'a str,
) -> Option<(&'a str, &'a str)> {
    if let Some(game_key) = strip_prefix(key, "game.") {
        if let Err(err) = options.set(game_key, value) {
            warn!("ignoring option: {}", err);
        }
    } else if let Some(bind_key) = strip_prefix(key, "keybind.") {
        match VirtualKey::from_name(bind_key) {
            Some(virtual_key) => keymap.bind(virtual_key, value),
            None => warn!("ignoring binding for unknown virtual key `{}`", bind_key),
        }
    } else if strip_prefix(key, "frontend.").is_some() {
        return Some((key, value));
    } else {
        warn!("ignoring option `{}` in unknown group", key);
    }

    None
}

fn strip_prefix<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    if key.starts_with(prefix) {
        Some(&key[prefix.len()..])
    } else {
        None
    }
}

/// Load a configuration file, applying assignments in document order.
///
/// A missing or unreadable file is a warning, not an error: the caller
/// continues with whatever values it already had. Returns the opaque
/// `frontend.*` pairs in document order.
pub fn load_ini<P: AsRef<Path>>(
    path: P,
    options: &mut Options,
    keymap: &mut Keymap,
) -> Vec<(String, String)> {
    let source = match fs::read_to_string(path.as_ref()) {
        Ok(source) => source,
        Err(err) => {
            warn!(
                "could not read config file {}: {}",
                path.as_ref().display(),
                err
            );
            return Vec::new();
        }
    };

    let mut frontend = Vec::new();
    ini::parse(&source, |key, value| {
        if let Some((key, value)) = apply(options, keymap, key, value) {
            frontend.push((key.to_string(), value.to_string()));
        }
    });

    frontend
}
