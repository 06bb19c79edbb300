//! The host-side bridge between raw key events and engine input.
//!
//! A frontend reports presses and releases of *virtual keys*; the
//! controller tracks how long each has been held and, once per tick,
//! collapses the key state into the engine's `Input` snapshot. Key repeat
//! (DAS) and soft-drop gravity both live here, on purpose: the engine is
//! blind to time-over-keys and only ever sees per-tick intent.

use input::{self, Input};
use options::Options;

/// Number of virtual keys.
pub const KEY_COUNT: usize = 10;

/// The virtual keys understood by the controller.
#[repr(usize)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum VirtualKey {
    RotR,
    RotL,
    RotH,
    Left,
    Right,
    Down,
    Up,
    Hold,
    Quit,
    Restart,
}

impl VirtualKey {
    /// All virtual keys, in slot order.
    pub const VARIANTS: [VirtualKey; KEY_COUNT] = [
        VirtualKey::RotR,
        VirtualKey::RotL,
        VirtualKey::RotH,
        VirtualKey::Left,
        VirtualKey::Right,
        VirtualKey::Down,
        VirtualKey::Up,
        VirtualKey::Hold,
        VirtualKey::Quit,
        VirtualKey::Restart,
    ];

    /// Parse a virtual key from its configuration name.
    pub fn from_name(name: &str) -> Option<VirtualKey> {
        match name.to_ascii_lowercase().as_str() {
            "rotr" => Some(VirtualKey::RotR),
            "rotl" => Some(VirtualKey::RotL),
            "roth" => Some(VirtualKey::RotH),
            "left" => Some(VirtualKey::Left),
            "right" => Some(VirtualKey::Right),
            "down" => Some(VirtualKey::Down),
            "up" => Some(VirtualKey::Up),
            "hold" => Some(VirtualKey::Hold),
            "quit" => Some(VirtualKey::Quit),
            "restart" => Some(VirtualKey::Restart),
            _ => None,
        }
    }
}

/// Maps frontend key names onto virtual keys.
///
/// Bindings are many-to-one: several physical names may drive the same
/// virtual key, which is what the multi-valued `keybind.*` configuration
/// produces.
#[derive(Clone, Debug, Default)]
pub struct Keymap {
    binds: Vec<(String, VirtualKey)>,
}

impl Keymap {
    /// Construct an empty keymap.
    pub fn new() -> Keymap {
        Keymap::default()
    }

    /// Bind a frontend key name to a virtual key. Rebinding a name moves
    /// it to the new virtual key.
    pub fn bind(&mut self, key: VirtualKey, name: &str) {
        let name = name.to_ascii_lowercase();
        self.binds.retain(|&(ref bound, _)| *bound != name);
        self.binds.push((name, key));
    }

    /// Look up the virtual key bound to a frontend key name.
    pub fn find(&self, name: &str) -> Option<VirtualKey> {
        let name = name.to_ascii_lowercase();
        self.binds
            .iter()
            .find(|&&(ref bound, _)| *bound == name)
            .map(|&(_, key)| key)
    }
}

/// Tracks the held state of every virtual key over time.
///
/// At its simplest this parallels the keystate of a keyboard: `activate`
/// on key-down, `deactivate` on key-up and one `update` per tick.
#[derive(Clone, Debug)]
pub struct Controller {
    /// How long each key has been held, in ticks. Zero means released.
    pub time: [u32; KEY_COUNT],

    /// Which keys are currently held.
    pub active: [bool; KEY_COUNT],

    /// Delayed auto-shift: how long Left/Right must be held before they
    /// begin repeating, in milliseconds.
    pub das_delay: u32,
}

impl Default for Controller {
    fn default() -> Controller {
        Controller {
            time: [0; KEY_COUNT],
            active: [false; KEY_COUNT],
            das_delay: 150,
        }
    }
}

impl Controller {
    /// Return a new controller with all keys released.
    pub fn new() -> Controller {
        Controller::default()
    }

    /// Mark the specified key held. Activating a held key has no effect.
    pub fn activate(&mut self, key: VirtualKey) {
        self.active[key as usize] = true;
    }

    /// Mark the specified key released.
    pub fn deactivate(&mut self, key: VirtualKey) {
        self.active[key as usize] = false;
    }

    /// Release every key without resetting held times.
    ///
    /// Useful for frontends that re-derive the active set from a keyboard
    /// snapshot every tick rather than from events.
    pub fn deactivate_all(&mut self) {
        for state in self.active.iter_mut() {
            *state = false;
        }
    }

    /// How long the specified key has been held, in ticks.
    pub fn time(&self, key: VirtualKey) -> u32 {
        self.time[key as usize]
    }

    /// Advance held times by one tick.
    pub fn update(&mut self) {
        for (time, &active) in self.time.iter_mut().zip(self.active.iter()) {
            *time = if active { *time + 1 } else { 0 };
        }
    }

    /// Was this key freshly pressed this tick?
    fn pressed(&self, key: VirtualKey) -> bool {
        self.time(key) == 1
    }

    /// Is this key pressed or repeating under DAS?
    fn repeating(&self, key: VirtualKey, options: &Options) -> bool {
        let das_ticks = self.das_delay / options.ms_per_tick.max(1);
        self.pressed(key) || self.time(key) > das_ticks
    }

    /// Collapse the current key state into one engine input snapshot.
    ///
    /// Call once per tick, after `update`.
    pub fn input(&self, options: &Options) -> Input {
        let mut snapshot = Input::default();

        if self.repeating(VirtualKey::Left, options) {
            snapshot.movement -= 1;
        }
        if self.repeating(VirtualKey::Right, options) {
            snapshot.movement += 1;
        }

        snapshot.rotation = if self.pressed(VirtualKey::RotR) {
            input::ROTATE_CW
        } else if self.pressed(VirtualKey::RotL) {
            input::ROTATE_CCW
        } else if self.pressed(VirtualKey::RotH) {
            input::ROTATE_HALF
        } else {
            input::ROTATE_NONE
        };

        let soft_dropping = if options.one_shot_soft_drop {
            self.pressed(VirtualKey::Down)
        } else {
            self.time(VirtualKey::Down) >= 1
        };
        if soft_dropping {
            snapshot.gravity =
                (options.soft_drop_gravity * f64::from(options.ms_per_tick)) as i32;
        }

        if self.pressed(VirtualKey::Up) {
            snapshot.gravity = input::INSTANT_GRAVITY;
            snapshot.extra |= input::IN_HARD_DROP;
        }

        if self.pressed(VirtualKey::Hold) {
            snapshot.extra |= input::IN_HOLD;
        }

        if self.pressed(VirtualKey::Left) || self.pressed(VirtualKey::Right) {
            snapshot.extra |= input::IN_FINESSE_DIRECTION;
        }
        if self.pressed(VirtualKey::RotR)
            || self.pressed(VirtualKey::RotL)
            || self.pressed(VirtualKey::RotH)
        {
            snapshot.extra |= input::IN_FINESSE_ROTATION;
        }

        snapshot
    }
}
