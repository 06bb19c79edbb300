//! Implements the engine which composes all the components into one
//! abstract structure.
//!
//! The engine is a pure state machine: a host calls `tick` once per
//! `ms_per_tick` of wall time with an input snapshot, and reads whatever
//! public state it wants to present between calls. Nothing here blocks,
//! sleeps or measures time.
//!
//! Several transitions are serviced within a single `tick` call by
//! re-entering the dispatcher: a finished entry delay spawns its piece and
//! that piece falls in the same tick, and a locking piece clears its lines
//! in the tick it locks. This keeps the engine responsive at any tick
//! rate.

use field::Field;
use input::{self, Input};
use options::{InitialActionStyle, LockStyle, Options, PREVIEW_MAX};
use piece::{PieceType, BLOCKS_PER_PIECE, PIECE_COLORS, PIECE_OFFSETS};
use randomizer::Randomizer;

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::mem;

/// Which part of the game we are in.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum GameState {
    /// The pre-game countdown is showing "Ready".
    Ready,

    /// The pre-game countdown is showing "Go".
    Go,

    /// A piece is in flight with nothing beneath it.
    Falling,

    /// A piece has hit the top of the stack or the floor.
    Landed,

    /// Waiting out the entry delay before the next spawn.
    Are,

    /// A new piece needs to be spawned. Never observed between ticks.
    NewPiece,

    /// A locked piece is being written and its lines cleared. Never
    /// observed between ticks.
    Lines,

    /// A user-specified quit occurred. Set by the host, never internally.
    Quit,

    /// The game ended, either by top-out or by reaching the goal.
    GameOver,
}

/// A single game instance.
///
/// All the externally interesting state is public and safe to read
/// between ticks; the host mutates it only through `tick`, `reset` and
/// the options.
#[derive(Clone)]
pub struct Engine {
    /// The options in play. Read at tick boundaries; changing mid-game is
    /// safe for most fields but the field dimensions only apply on reset.
    pub options: Options,

    /// The field which the game is played on.
    pub field: Field,

    /// The active piece, or `None` outside FALLING/LANDED.
    pub piece: PieceType,

    /// X position of the active piece.
    pub x: i32,

    /// Y position of the active piece.
    pub y: i32,

    /// Y position with sub-cell precision. Gravity accumulates here and
    /// the integer `y` is its floor.
    pub actual_y: f64,

    /// Greatest `y` the active piece can occupy at its current `x` and
    /// rotation without collision. Accurate whenever a piece is active.
    pub hard_drop_y: i32,

    /// Rotation state of the active piece, 0..3.
    pub theta: u8,

    /// Upcoming pieces. Always full; `preview()` applies the configured
    /// visible count.
    pub next_pieces: [PieceType; PREVIEW_MAX],

    /// The piece in the hold slot.
    pub hold_piece: Option<PieceType>,

    /// Can a hold be performed for the current piece?
    pub hold_available: bool,

    /// Current state of the machine.
    pub state: GameState,

    /// State the machine was in when the previous tick was entered.
    pub last_state: GameState,

    /// Input applied during the last tick, kept for frontend debugging.
    pub last_input: Input,

    /// Number of ticks elapsed this game.
    pub total_ticks: u64,

    /// Number of lines cleared this game.
    pub lines_cleared: u32,

    /// Number of pieces locked this game.
    pub blocks_placed: u32,

    /// Number of wasted keypresses this game.
    pub finesse: u32,

    /// Directional keypresses during the current piece's lifetime.
    pub finesse_piece_direction: u32,

    /// Rotational keypresses during the current piece's lifetime.
    pub finesse_piece_rotation: u32,

    /// The seed the RNG was primed with at the last reset. Recording this
    /// alongside the inputs is enough to replay the game.
    pub seed: u64,

    are_timer: u32,
    lock_timer: u32,
    ready_go_timer: u32,
    floorkicks: u32,
    initial_hold: bool,
    initial_rotation: i8,
    randomizer: Randomizer,
    rng: StdRng,
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new(Options::default())
    }
}

impl Engine {
    /// Construct an engine with the given options, ready to be ticked.
    pub fn new(options: Options) -> Engine {
        let mut engine = Engine {
            field: Field::new(options.field_width, options.field_height),
            randomizer: Randomizer::new(options.randomizer),
            rng: StdRng::seed_from_u64(0),
            options,
            piece: PieceType::None,
            x: 0,
            y: 0,
            actual_y: 0.0,
            hard_drop_y: 0,
            theta: 0,
            next_pieces: [PieceType::None; PREVIEW_MAX],
            hold_piece: None,
            hold_available: true,
            state: GameState::Ready,
            last_state: GameState::Ready,
            last_input: Input::default(),
            total_ticks: 0,
            lines_cleared: 0,
            blocks_placed: 0,
            finesse: 0,
            finesse_piece_direction: 0,
            finesse_piece_rotation: 0,
            seed: 0,
            are_timer: 0,
            lock_timer: 0,
            ready_go_timer: 0,
            floorkicks: 0,
            initial_hold: false,
            initial_rotation: 0,
        };

        engine.reset();
        engine
    }

    /// Reset to a fresh game.
    ///
    /// Keeps the options (a host typically mutates them between games and
    /// resets), zeroes every piece of dynamic state, reseeds the RNG and
    /// refills the preview queue.
    pub fn reset(&mut self) {
        self.seed = self.options.seed.unwrap_or_else(rand::random);
        self.rng = StdRng::seed_from_u64(self.seed);
        self.randomizer = Randomizer::new(self.options.randomizer);
        self.field = Field::new(self.options.field_width, self.options.field_height);

        self.piece = PieceType::None;
        self.x = 0;
        self.y = 0;
        self.actual_y = 0.0;
        self.hard_drop_y = 0;
        self.theta = 0;
        self.hold_piece = None;
        self.hold_available = true;
        self.state = GameState::Ready;
        self.last_state = GameState::Ready;
        self.last_input = Input::default();
        self.total_ticks = 0;
        self.lines_cleared = 0;
        self.blocks_placed = 0;
        self.finesse = 0;
        self.finesse_piece_direction = 0;
        self.finesse_piece_rotation = 0;
        self.are_timer = 0;
        self.lock_timer = 0;
        self.ready_go_timer = 0;
        self.floorkicks = 0;
        self.initial_hold = false;
        self.initial_rotation = 0;

        for i in 0..PREVIEW_MAX {
            self.next_pieces[i] = self.next_random_piece();
        }
    }

    /// The visible part of the preview queue.
    pub fn preview(&self) -> &[PieceType] {
        &self.next_pieces[..self.options.next_piece_count.min(PREVIEW_MAX)]
    }

    /// Project a piece into its four field cells.
    ///
    /// The rotation system's entry theta is applied here, so every system
    /// shares the same SRS-relative offset tables.
    pub fn piece_blocks(
        &self,
        piece: PieceType,
        x: i32,
        y: i32,
        theta: u8,
    ) -> [(i32, i32); BLOCKS_PER_PIECE] {
        let rs = self.options.rotation_system.def();
        let calc = usize::from((theta + rs.entry_theta[piece.index()]) & 3);

        let mut blocks = [(0, 0); BLOCKS_PER_PIECE];
        for (dst, &(dx, dy)) in blocks.iter_mut().zip(PIECE_OFFSETS[piece.index()][calc].iter()) {
            *dst = (x + dx, y + dy);
        }
        blocks
    }

    /// Would the active piece collide at the given position and rotation?
    fn is_collision(&self, x: i32, y: i32, theta: u8) -> bool {
        self.piece_blocks(self.piece, x, y, theta)
            .iter()
            .any(|&(bx, by)| self.field.occupied(bx, by))
    }

    /// Recompute the greatest `y` the active piece can occupy.
    ///
    /// Must be called after anything that changes the piece, its `x` or
    /// its rotation.
    fn update_hard_drop_y(&mut self) {
        let mut y = self.y;
        while !self.is_collision(self.x, y, self.theta) {
            y += 1;
        }

        self.hard_drop_y = y - 1;
    }

    /// Convert a millisecond option into whole ticks at the current rate.
    fn ticks(&self, ms: u32) -> u32 {
        ms / self.options.ms_per_tick.max(1)
    }

    /// Try to rotate the active piece in the specified direction using the
    /// configured rotation system.
    ///
    /// Kicks are tested in table order; the first offset that fits is
    /// committed. Upward kicks count against the floorkick limit and are
    /// skipped once it is exhausted. The fractional `actual_y` is left
    /// alone on success: the integer move is authoritative there.
    fn try_rotate(&mut self, direction: i8) -> bool {
        let new_theta = ((i32::from(self.theta) + 4 + i32::from(direction)) & 3) as u8;
        let rs = self.options.rotation_system.def();
        let limit = self.options.floorkick_limit;

        for &(dx, dy) in rs.kick_tests(self.piece, direction, self.theta) {
            if dy < 0 && limit > 0 && self.floorkicks >= limit {
                continue;
            }

            let kick_x = self.x + dx;
            let kick_y = self.y + dy;

            if !self.is_collision(kick_x, kick_y, new_theta) {
                if dy < 0 {
                    self.floorkicks += 1;
                }
                self.x = kick_x;
                self.y = kick_y;
                self.theta = new_theta;
                return true;
            }
        }

        false
    }

    /// Draw from the randomizer, re-instantiating it first if the
    /// configured selector changed since the last draw.
    fn next_random_piece(&mut self) -> PieceType {
        if self.randomizer.kind() != self.options.randomizer {
            self.randomizer = Randomizer::new(self.options.randomizer);
        }

        self.randomizer.next_piece(&mut self.rng)
    }

    /// Take the next piece from the queue and spawn it.
    fn new_piece(&mut self) {
        self.x = self.field.width as i32 / 2 - 1;
        self.y = 0;
        self.actual_y = 0.0;
        self.theta = 0;
        self.lock_timer = 0;
        self.floorkicks = 0;
        self.finesse_piece_rotation = 0;
        self.finesse_piece_direction = 0;

        self.piece = self.next_pieces[0];
        for i in 1..PREVIEW_MAX {
            self.next_pieces[i - 1] = self.next_pieces[i];
        }
        self.next_pieces[PREVIEW_MAX - 1] = self.next_random_piece();

        self.hold_available = true;
    }

    /// Apply this tick's gravity to the piece.
    ///
    /// `input_gravity` is the soft-drop contribution for the tick; config
    /// gravity accumulates on top of it.
    fn apply_gravity(&mut self, input_gravity: i32) {
        self.actual_y +=
            f64::from(self.options.ms_per_tick) * self.options.gravity + f64::from(input_gravity);

        if self.actual_y >= f64::from(self.hard_drop_y) {
            // Landing: the fractional accumulator snaps to the resting row
            self.actual_y = f64::from(self.hard_drop_y);
            self.y = self.hard_drop_y;

            if self.state == GameState::Falling {
                self.state = GameState::Landed;
            }
        } else {
            if (self.options.lock_style == LockStyle::Step
                || self.options.lock_style == LockStyle::Move)
                && self.actual_y as i32 > self.y
            {
                self.lock_timer = 0;
            }

            self.y = self.actual_y as i32;
            self.state = GameState::Falling;
        }
    }

    /// Write the active piece into the field and account its finesse.
    fn lock_piece(&mut self) {
        let blocks = self.piece_blocks(self.piece, self.x, self.y, self.theta);
        let color = PIECE_COLORS[self.piece.index()];
        self.blocks_placed += 1;

        for &(bx, by) in blocks.iter() {
            self.field.fill(bx as usize, by as usize, color);
        }

        // Every column is reachable in at most 2 direction presses under
        // DAS, so use that as the upper bound. Rotation waste is only
        // scored exactly for the O piece; for the rest any rotational
        // press counts, which overestimates overhang placements.
        let wasted_direction = self.finesse_piece_direction.saturating_sub(2);

        let rotation_look: [u32; 4] = [0, 1, 2, 1];
        let wasted_rotation = if self.piece == PieceType::O {
            self.finesse_piece_rotation
                .saturating_sub(rotation_look[usize::from(self.theta & 3)])
        } else {
            self.finesse_piece_rotation
        };

        self.finesse += wasted_direction + wasted_rotation;
    }

    /// Perform a single game update.
    ///
    /// Dispatches on the current state; the explicit `continue`s are the
    /// transitions that must complete within one tick.
    pub fn tick(&mut self, input: &Input) {
        self.last_state = self.state;
        self.last_input = *input;

        loop {
            match self.state {
                GameState::Ready | GameState::Go => {
                    // Input during the countdown only buffers initial
                    // actions; the piece does not exist yet.
                    if input.extra & input::IN_HOLD != 0 {
                        self.initial_hold = true;
                    }
                    if self.options.initial_action_style == InitialActionStyle::Persistent
                        && input.rotation != 0
                    {
                        self.initial_rotation = input.rotation;
                    }

                    let ready = self.ticks(self.options.ready_phase_length);
                    let go = self.ticks(self.options.go_phase_length);

                    self.ready_go_timer += 1;
                    if self.ready_go_timer > ready + go {
                        self.state = GameState::NewPiece;
                        continue;
                    }
                    if self.ready_go_timer > ready {
                        self.state = GameState::Go;
                    }
                }

                GameState::Are => {
                    let cancelled = self.options.are_cancellable
                        && self.last_state == GameState::Are
                        && !input.is_idle();
                    let elapsed = self.are_timer > self.ticks(self.options.are_delay);

                    self.are_timer += 1;
                    if elapsed || cancelled {
                        self.are_timer = 0;
                        self.state = GameState::NewPiece;
                        continue;
                    }
                }

                GameState::NewPiece => {
                    self.new_piece();

                    // Lockout: spawning into the stack ends the game
                    if self.is_collision(self.x, self.y, self.theta) {
                        debug!("spawn blocked at x={} theta={}; game over", self.x, self.theta);
                        self.state = GameState::GameOver;
                        continue;
                    }

                    if self.initial_hold {
                        self.initial_hold = false;
                        self.hold_piece = Some(self.piece);
                        self.new_piece();
                        if !self.options.infinite_ready_go_hold {
                            self.hold_available = false;
                        }
                    }

                    if self.initial_rotation != 0 {
                        let direction = self.initial_rotation;
                        self.initial_rotation = 0;
                        self.try_rotate(direction);
                    }

                    self.update_hard_drop_y();
                    self.state = GameState::Falling;

                    // Fall through so the spawn tick also moves the piece
                    continue;
                }

                GameState::Falling | GameState::Landed => {
                    let mut moved = false;

                    if input.extra & input::IN_HOLD != 0 && self.hold_available {
                        match self.hold_piece {
                            None => {
                                self.hold_piece = Some(self.piece);
                                self.new_piece();
                            }
                            Some(held) => {
                                self.x = self.field.width as i32 / 2 - 1;
                                self.y = 0;
                                self.actual_y = 0.0;
                                self.theta = 0;
                                self.lock_timer = 0;
                                self.hold_piece = Some(mem::replace(&mut self.piece, held));
                            }
                        }
                        self.hold_available = false;
                        self.update_hard_drop_y();
                    }

                    // Finesse counters track raw keypresses, not outcomes
                    if input.extra & input::IN_FINESSE_DIRECTION != 0 {
                        self.finesse_piece_direction += 1;
                    }
                    if input.extra & input::IN_FINESSE_ROTATION != 0 {
                        self.finesse_piece_rotation += 1;
                    }

                    if input.rotation != 0 && self.try_rotate(input.rotation) {
                        moved = true;
                    }

                    // Horizontal movement steps one gated cell at a time
                    // towards the sign and stops at the first collision
                    let mut distance = input.movement;
                    while distance < 0 && !self.is_collision(self.x - 1, self.y, self.theta) {
                        self.x -= 1;
                        moved = true;
                        distance += 1;
                    }
                    while distance > 0 && !self.is_collision(self.x + 1, self.y, self.theta) {
                        self.x += 1;
                        moved = true;
                        distance -= 1;
                    }

                    if moved {
                        self.update_hard_drop_y();

                        if self.options.lock_style == LockStyle::Move {
                            self.lock_timer = 0;
                        }
                    }

                    self.apply_gravity(input.gravity);

                    // A hard drop or manual lock bypasses the lock timer
                    if input.extra & (input::IN_HARD_DROP | input::IN_LOCK) != 0
                        || self.lock_timer > self.ticks(self.options.lock_delay)
                    {
                        self.state = GameState::Lines;
                    }

                    if self.state == GameState::Landed {
                        self.lock_timer += 1;
                    }

                    if self.state == GameState::Lines {
                        // Lock and clear in the same tick
                        continue;
                    }
                }

                GameState::Lines => {
                    self.lock_piece();
                    self.piece = PieceType::None;
                    self.lines_cleared += self.field.clear_lines();

                    self.state = if self.lines_cleared < self.options.goal {
                        GameState::Are
                    } else {
                        debug!("goal reached after {} ticks", self.total_ticks + 1);
                        GameState::GameOver
                    };
                    continue;
                }

                GameState::Quit | GameState::GameOver => {}
            }

            break;
        }

        self.total_ticks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::{
        IN_HARD_DROP, IN_HOLD, INSTANT_GRAVITY, ROTATE_CCW, ROTATE_CW,
    };
    use piece::GARBAGE_COLOR;
    use rand::Rng;

    /// Deterministic options with no countdown, no entry delay and no
    /// gravity so tests control every movement themselves.
    fn test_options() -> Options {
        Options {
            ready_phase_length: 0,
            go_phase_length: 0,
            are_delay: 0,
            gravity: 0.0,
            lock_delay: 500,
            lock_style: LockStyle::Step,
            seed: Some(0xfa57),
            ..Options::default()
        }
    }

    fn engine_with_piece(piece: PieceType) -> Engine {
        let mut engine = Engine::new(test_options());
        engine.next_pieces[0] = piece;
        engine
    }

    fn hard_drop() -> Input {
        Input {
            gravity: INSTANT_GRAVITY,
            extra: IN_HARD_DROP,
            ..Input::default()
        }
    }

    fn floor_drop() -> Input {
        Input {
            gravity: INSTANT_GRAVITY,
            ..Input::default()
        }
    }

    fn prefill_row_except(engine: &mut Engine, y: usize, skip: &[usize]) {
        for x in 0..engine.field.width {
            if !skip.contains(&x) {
                engine.field.fill(x, y, GARBAGE_COLOR);
            }
        }
    }

    #[test]
    fn test_hard_drop_i_from_spawn() {
        let mut engine = engine_with_piece(PieceType::I);
        engine.tick(&hard_drop());

        // The I spawns at x = width/2 - 1 and locks flat on the floor
        for x in 4..8 {
            assert!(engine.field.occupied(x, 19));
        }
        assert!(!engine.field.occupied(3, 19));
        assert!(!engine.field.occupied(8, 19));

        assert_eq!(engine.lines_cleared, 0);
        assert_eq!(engine.blocks_placed, 1);
        assert_eq!(engine.piece, PieceType::None);
        assert!(engine.state == GameState::Are || engine.state == GameState::NewPiece);
    }

    #[test]
    fn test_single_line_clear() {
        let mut engine = engine_with_piece(PieceType::J);
        prefill_row_except(&mut engine, 19, &[0]);

        // Rotate the J upright and hook it into the open left column
        engine.tick(&Input {
            rotation: ROTATE_CW,
            movement: -10,
            gravity: INSTANT_GRAVITY,
            extra: IN_HARD_DROP,
        });

        assert_eq!(engine.lines_cleared, 1);
        assert!(!engine.field.row_full(19));

        // The remainder of the piece shifted down one row
        assert!(engine.field.occupied(0, 18));
        assert!(engine.field.occupied(0, 19));
        assert!(engine.field.occupied(1, 18));
        assert!(!engine.field.occupied(1, 19));
    }

    #[test]
    fn test_tetris_clears_field() {
        let mut engine = engine_with_piece(PieceType::I);
        for y in 16..20 {
            prefill_row_except(&mut engine, y, &[9]);
        }

        engine.tick(&Input {
            rotation: ROTATE_CW,
            movement: 10,
            gravity: INSTANT_GRAVITY,
            extra: IN_HARD_DROP,
        });

        assert_eq!(engine.lines_cleared, 4);
        for y in 0..20 {
            for x in 0..10 {
                assert!(!engine.field.occupied(x, y));
            }
        }
    }

    #[test]
    fn test_hold_swap() {
        let mut engine = engine_with_piece(PieceType::I);
        engine.next_pieces[1] = PieceType::T;

        engine.tick(&Input::none());
        assert_eq!(engine.piece, PieceType::I);
        assert_eq!(engine.next_pieces[0], PieceType::T);

        engine.tick(&Input {
            extra: IN_HOLD,
            ..Input::default()
        });

        assert_eq!(engine.hold_piece, Some(PieceType::I));
        assert_eq!(engine.piece, PieceType::T);
        assert!(!engine.hold_available);

        // A second hold in the same piece lifetime is refused
        engine.tick(&Input {
            extra: IN_HOLD,
            ..Input::default()
        });
        assert_eq!(engine.piece, PieceType::T);

        // Locking restores the hold, and holding now swaps back
        engine.tick(&hard_drop());
        engine.tick(&Input::none());
        assert!(engine.hold_available);

        let active = engine.piece;
        engine.tick(&Input {
            extra: IN_HOLD,
            ..Input::default()
        });
        assert_eq!(engine.piece, PieceType::I);
        assert_eq!(engine.hold_piece, Some(active));
    }

    #[test]
    fn test_srs_wallkick_at_right_wall() {
        let mut engine = engine_with_piece(PieceType::J);

        // Park the J flat against the right wall on the floor
        engine.tick(&Input {
            movement: 10,
            gravity: INSTANT_GRAVITY,
            ..Input::default()
        });
        assert_eq!((engine.x, engine.y), (7, 18));
        assert_eq!(engine.state, GameState::Landed);

        // Upright J does not fit at the wall; the kick walks it up-left
        engine.tick(&Input {
            rotation: ROTATE_CW,
            ..Input::default()
        });

        assert_eq!(engine.theta, 1);
        assert_eq!((engine.x, engine.y), (6, 17));
    }

    #[test]
    fn test_rotation_round_trip_in_open_space() {
        let mut engine = engine_with_piece(PieceType::T);
        engine.tick(&Input::none());

        let before = (engine.x, engine.y, engine.theta);

        engine.tick(&Input {
            rotation: ROTATE_CW,
            ..Input::default()
        });
        assert_eq!(engine.theta, 1);
        assert_eq!((engine.x, engine.y), (before.0, before.1));

        engine.tick(&Input {
            rotation: ROTATE_CCW,
            ..Input::default()
        });
        assert_eq!((engine.x, engine.y, engine.theta), before);
    }

    #[test]
    fn test_floorkick_limit_exhausts() {
        let mut options = test_options();
        options.floorkick_limit = 1;
        let mut engine = Engine::new(options);
        engine.next_pieces[0] = PieceType::J;

        engine.tick(&Input {
            movement: 10,
            gravity: INSTANT_GRAVITY,
            ..Input::default()
        });

        // First upright rotation consumes the floorkick allowance
        engine.tick(&Input {
            rotation: ROTATE_CW,
            ..Input::default()
        });
        assert_eq!(engine.theta, 1);

        // Rebuild the same wall configuration by hand; with the allowance
        // spent the same rotation now fails outright.
        engine.x = 7;
        engine.y = 18;
        engine.actual_y = 18.0;
        engine.theta = 0;
        engine.update_hard_drop_y();

        assert!(!engine.try_rotate(1));
        assert_eq!(engine.theta, 0);
    }

    #[test]
    fn test_move_lock_style_keeps_piece_alive() {
        let mut options = test_options();
        options.lock_style = LockStyle::Move;
        options.lock_delay = 100; // 6 ticks at 16ms
        let mut engine = Engine::new(options);
        engine.next_pieces[0] = PieceType::T;

        engine.tick(&floor_drop());
        assert_eq!(engine.state, GameState::Landed);

        // Wiggling within every lock window staves the lock off forever
        for i in 0..30 {
            let input = if i % 2 == 0 {
                Input {
                    movement: if i % 4 == 0 { 1 } else { -1 },
                    ..Input::default()
                }
            } else {
                Input::none()
            };
            engine.tick(&input);
            assert_eq!(engine.blocks_placed, 0);
        }

        // Left alone, the piece finally locks
        for _ in 0..8 {
            engine.tick(&Input::none());
        }
        assert_eq!(engine.blocks_placed, 1);
    }

    #[test]
    fn test_step_lock_style_ignores_sideways_movement() {
        let mut options = test_options();
        options.lock_delay = 100; // 6 ticks at 16ms
        let mut engine = Engine::new(options);
        engine.next_pieces[0] = PieceType::T;

        engine.tick(&floor_drop());
        assert_eq!(engine.state, GameState::Landed);

        // Under STEP, sideways wiggling does not reset the timer
        for i in 0..8 {
            engine.tick(&Input {
                movement: if i % 2 == 0 { 1 } else { -1 },
                ..Input::default()
            });
        }
        assert_eq!(engine.blocks_placed, 1);
    }

    /// Land a piece on a three-high platform, accumulate most of the lock
    /// delay, slide off and re-land. Returns how many pieces locked after
    /// a few post-landing ticks, which separates ENTRY from STEP.
    fn run_relock_sequence(style: LockStyle) -> u32 {
        let mut options = test_options();
        options.lock_style = style;
        options.lock_delay = 100; // 6 ticks at 16ms
        let mut engine = Engine::new(options);
        engine.next_pieces[0] = PieceType::T;

        for x in 4..7 {
            for y in 17..20 {
                engine.field.fill(x, y, GARBAGE_COLOR);
            }
        }

        // Land on the platform and burn 5 ticks of lock delay
        engine.tick(&floor_drop());
        assert_eq!(engine.state, GameState::Landed);
        for _ in 0..4 {
            engine.tick(&Input::none());
        }
        assert_eq!(engine.blocks_placed, 0);

        // Slide right off the platform and descend one cell per tick
        engine.tick(&Input {
            movement: 3,
            ..Input::default()
        });
        for _ in 0..3 {
            engine.tick(&Input {
                gravity: 1,
                ..Input::default()
            });
        }
        assert_eq!(engine.state, GameState::Landed);

        // ENTRY kept the timer across the fall; STEP cleared it
        engine.tick(&Input::none());
        engine.tick(&Input::none());
        engine.blocks_placed
    }

    #[test]
    fn test_entry_lock_style_keeps_timer_across_falls() {
        assert_eq!(run_relock_sequence(LockStyle::Entry), 1);
        assert_eq!(run_relock_sequence(LockStyle::Step), 0);
    }

    #[test]
    fn test_are_delay_holds_spawn_back() {
        let mut options = test_options();
        options.are_delay = 96; // 6 ticks at 16ms
        let mut engine = Engine::new(options);

        engine.tick(&hard_drop());
        assert_eq!(engine.state, GameState::Are);

        // The next piece appears only after the delay runs out
        for _ in 0..6 {
            engine.tick(&Input::none());
            assert_eq!(engine.piece, PieceType::None);
        }

        engine.tick(&Input::none());
        assert!(engine.piece != PieceType::None);
        assert_eq!(engine.state, GameState::Falling);
    }

    #[test]
    fn test_cancellable_are_spawns_on_input() {
        let mut options = test_options();
        options.are_delay = 500;
        options.are_cancellable = true;
        let mut engine = Engine::new(options);

        engine.tick(&hard_drop());
        assert_eq!(engine.state, GameState::Are);

        // The cancelling input also drives the freshly spawned piece
        engine.tick(&Input {
            movement: 1,
            ..Input::default()
        });
        assert!(engine.piece != PieceType::None);
        assert_eq!(engine.x, 5);
    }

    #[test]
    fn test_spawn_collision_is_game_over() {
        let mut engine = engine_with_piece(PieceType::I);
        prefill_row_except(&mut engine, 1, &[]);

        engine.tick(&Input::none());
        assert_eq!(engine.state, GameState::GameOver);
        assert_eq!(engine.blocks_placed, 0);
    }

    #[test]
    fn test_goal_reached_ends_game() {
        let mut options = test_options();
        options.goal = 1;
        let mut engine = Engine::new(options);
        engine.next_pieces[0] = PieceType::I;
        prefill_row_except(&mut engine, 19, &[4, 5, 6, 7]);

        engine.tick(&hard_drop());
        assert_eq!(engine.lines_cleared, 1);
        assert_eq!(engine.state, GameState::GameOver);
    }

    #[test]
    fn test_ready_go_countdown() {
        let mut options = test_options();
        options.ready_phase_length = 32; // 2 ticks
        options.go_phase_length = 32; // 2 ticks
        let mut engine = Engine::new(options);

        engine.tick(&Input::none());
        assert_eq!(engine.state, GameState::Ready);
        engine.tick(&Input::none());
        assert_eq!(engine.state, GameState::Ready);
        engine.tick(&Input::none());
        assert_eq!(engine.state, GameState::Go);
        engine.tick(&Input::none());
        assert_eq!(engine.state, GameState::Go);

        engine.tick(&Input::none());
        assert_eq!(engine.state, GameState::Falling);
        assert!(engine.piece != PieceType::None);
    }

    #[test]
    fn test_ready_go_hold_buffering() {
        let mut options = test_options();
        options.ready_phase_length = 32;
        options.infinite_ready_go_hold = true;
        let mut engine = Engine::new(options);
        engine.next_pieces[0] = PieceType::L;
        engine.next_pieces[1] = PieceType::S;

        engine.tick(&Input {
            extra: IN_HOLD,
            ..Input::default()
        });
        assert_eq!(engine.state, GameState::Ready);
        assert_eq!(engine.hold_piece, None);

        engine.tick(&Input::none());
        engine.tick(&Input::none());

        // The buffered hold stashed the first piece and, being free
        // during the countdown, left the slot available.
        assert_eq!(engine.hold_piece, Some(PieceType::L));
        assert_eq!(engine.piece, PieceType::S);
        assert!(engine.hold_available);
    }

    #[test]
    fn test_persistent_initial_rotation() {
        let mut options = test_options();
        options.ready_phase_length = 32;
        options.initial_action_style = InitialActionStyle::Persistent;
        let mut engine = Engine::new(options);
        engine.next_pieces[0] = PieceType::T;

        engine.tick(&Input {
            rotation: ROTATE_CW,
            ..Input::default()
        });
        engine.tick(&Input::none());
        engine.tick(&Input::none());

        assert_eq!(engine.piece, PieceType::T);
        assert_eq!(engine.theta, 1);
    }

    #[test]
    fn test_sub_cell_gravity_tracks_floor() {
        let mut options = test_options();
        options.gravity = 0.03125; // half a cell per 16ms tick
        let mut engine = Engine::new(options);

        engine.tick(&Input::none()); // spawn tick also applies gravity
        let mut last_y = engine.y;

        for _ in 0..40 {
            engine.tick(&Input::none());
            assert_eq!(engine.y, engine.actual_y as i32);
            assert!(engine.y >= last_y);
            last_y = engine.y;
            if engine.state == GameState::Landed {
                break;
            }
        }

        assert_eq!(engine.state, GameState::Landed);
        assert_eq!(engine.y, engine.hard_drop_y);
    }

    #[test]
    fn test_preview_respects_visible_count() {
        let mut options = test_options();
        options.next_piece_count = 2;
        let engine = Engine::new(options);

        assert_eq!(engine.preview().len(), 2);
        assert!(engine.preview().iter().all(|&p| p != PieceType::None));
    }

    #[test]
    fn test_seeded_games_are_identical() {
        let mut a = Engine::new(test_options());
        let mut b = Engine::new(test_options());

        assert_eq!(a.seed, b.seed);
        assert_eq!(a.next_pieces, b.next_pieces);

        for i in 0..200 {
            let input = Input {
                movement: (i % 3) as i32 - 1,
                rotation: if i % 7 == 0 { ROTATE_CW } else { 0 },
                gravity: 1,
                extra: if i % 11 == 0 { IN_HARD_DROP } else { 0 },
            };
            a.tick(&input);
            b.tick(&input);

            assert_eq!(a.piece, b.piece);
            assert_eq!((a.x, a.y, a.theta), (b.x, b.y, b.theta));
            assert_eq!(a.lines_cleared, b.lines_cleared);
        }
    }

    #[test]
    fn test_randomizer_swap_mid_game() {
        let mut engine = Engine::new(test_options());
        engine.tick(&Input::none());

        engine.options.randomizer = ::randomizer::RandomizerKind::Simple;
        for _ in 0..6 {
            engine.tick(&hard_drop());
            engine.tick(&Input::none());
        }

        // The swap re-instantiates the variant on the next draw and play
        // continues; stacking straight down may top out near the end.
        assert!(engine.blocks_placed >= 5);
    }

    #[test]
    fn test_invariants_over_scripted_game() {
        let mut options = test_options();
        options.goal = 1000;
        options.gravity = 0.01;
        options.lock_delay = 64;
        let mut engine = Engine::new(options);

        let mut rng = StdRng::seed_from_u64(0xdead);
        let mut last_lines = 0;

        for i in 0..3000u64 {
            let input = Input {
                movement: rng.gen_range(-2..3),
                rotation: *[0, 1, -1, 2].iter().nth(rng.gen_range(0..4)).unwrap(),
                gravity: rng.gen_range(0..3),
                extra: match rng.gen_range(0..20) {
                    0 => IN_HARD_DROP,
                    1 => IN_HOLD,
                    _ => 0,
                },
            };
            engine.tick(&input);

            assert_eq!(engine.total_ticks, i + 1);
            assert!(engine.lines_cleared >= last_lines);
            last_lines = engine.lines_cleared;

            // No full row survives a completed tick
            for y in 0..engine.field.height {
                assert!(!engine.field.row_full(y));
            }

            if engine.piece != PieceType::None {
                assert!(engine.hard_drop_y >= engine.y);

                let blocks =
                    engine.piece_blocks(engine.piece, engine.x, engine.y, engine.theta);
                for &(bx, by) in blocks.iter() {
                    assert!(bx >= 0 && bx < engine.field.width as i32);
                    assert!(by >= 0 && by < engine.field.height as i32);
                }

                if engine.state == GameState::Falling || engine.state == GameState::Landed {
                    assert_eq!(engine.y, engine.actual_y as i32);
                }
            }

            if engine.state == GameState::GameOver {
                break;
            }
        }
    }
}
