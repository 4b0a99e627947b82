//! Game session - per-participant piece lifecycle
//!
//! Composes the local board replica, the active piece, the shape supply, the
//! hold slot, and the four timers (gravity, lock delay, max-piece ceiling,
//! horizontal auto-shift). Everything is single-threaded and cooperative:
//! callers feed typed commands and key transitions in, call
//! `tick(elapsed_ms)` at their own cadence, and forward the returned events
//! to the relay.

use arrayvec::ArrayVec;

use crate::core::board::{Board, GridCells};
use crate::core::piece::{Piece, PiecePose};
use crate::core::rng::ShapeGenerator;
use crate::core::timer::{AutoShift, Countdown, Ticker};
use crate::types::{
    MoveDir, ShapeId, Tile, GRAVITY_INTERVAL_MS, LOCK_DELAY_MS, MAX_PIECE_MS,
};

/// Typed session inputs. Key capture and bindings are the caller's concern;
/// held directional keys go through `key_down`/`key_up` instead so the
/// auto-shift timers own the repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Rotate180,
    Hold,
}

/// Result of merging the active piece into the local replica.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub tiles: [Tile; 4],
    pub lines_cleared: u32,
}

/// Outcomes the caller forwards to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The live piece changed pose; worth a `movePiece` report.
    Moved,
    /// A piece merged into the replica; report `placePiece` (plus
    /// `clearedLines` when lines were cleared).
    Placed(Placement),
    /// The session hit its terminal condition; report `playerLost`.
    Lost,
}

pub type SessionEvents = ArrayVec<SessionEvent, 8>;

/// Per-participant orchestrator of the falling-piece lifecycle.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    piece: Piece,
    generator: ShapeGenerator,
    symbol: ShapeId,
    held: Option<ShapeId>,
    can_hold: bool,
    lines_cleared: u32,
    pieces_placed: u32,
    game_over: bool,
    gravity: Ticker,
    lock_delay: Countdown,
    max_piece: Countdown,
    auto_shift: AutoShift,
}

impl GameSession {
    /// Create a session playing under the given symbol.
    pub fn new(symbol: ShapeId) -> Self {
        Self::with_generator(symbol, ShapeGenerator::new())
    }

    /// Create a session with a caller-supplied shape supply (deterministic
    /// tests).
    pub fn with_generator(symbol: ShapeId, mut generator: ShapeGenerator) -> Self {
        let board = Board::new();
        let mut piece = Piece::new(generator.next());
        // The board is empty at construction, so the lift always succeeds.
        piece.lift_to_valid(&board);

        let mut gravity = Ticker::new(GRAVITY_INTERVAL_MS);
        gravity.restart();
        let mut max_piece = Countdown::default();
        max_piece.arm(MAX_PIECE_MS);

        Self {
            board,
            piece,
            generator,
            symbol,
            held: None,
            can_hold: true,
            lines_cleared: 0,
            pieces_placed: 0,
            game_over: false,
            gravity,
            lock_delay: Countdown::default(),
            max_piece,
            auto_shift: AutoShift::new(),
        }
    }

    pub fn symbol(&self) -> ShapeId {
        self.symbol
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn held(&self) -> Option<ShapeId> {
        self.held
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn pieces_placed(&self) -> u32 {
        self.pieces_placed
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Upcoming shapes for the preview strip.
    pub fn preview(&mut self, n: usize) -> Vec<ShapeId> {
        self.generator.peek(n)
    }

    /// Snapshot of the active piece for later `check_moved` comparison.
    pub fn current_pose(&self) -> PiecePose {
        self.piece.pose()
    }

    /// True when the active piece differs from the snapshot in x, y,
    /// rotation state, or shape - i.e. when a network update is warranted.
    pub fn check_moved(&self, prior: PiecePose) -> bool {
        self.piece.pose() != prior
    }

    /// True when the active piece rests at its computed drop position.
    pub fn at_final_position(&self) -> bool {
        self.piece.at_final_position(&self.board)
    }

    /// Ghost cells for the active piece.
    pub fn ghost_tiles(&self) -> [Tile; 4] {
        self.piece.final_tiles(&self.board)
    }

    /// Apply one typed command. Rejected mutations are silent; the returned
    /// events describe what actually happened.
    pub fn command(&mut self, command: SessionCommand) -> SessionEvents {
        let mut events = SessionEvents::new();
        if self.game_over {
            return events;
        }

        match command {
            SessionCommand::HardDrop => return self.place_and_report(),
            SessionCommand::Hold => return self.hold_and_report(),
            _ => {}
        }

        let prior = self.piece.pose();
        match command {
            SessionCommand::MoveLeft => {
                self.piece.translate(&self.board, MoveDir::Left);
            }
            SessionCommand::MoveRight => {
                self.piece.translate(&self.board, MoveDir::Right);
            }
            SessionCommand::SoftDrop => {
                self.piece.drop_to_rest(&self.board);
            }
            SessionCommand::RotateCw => {
                self.piece.rotate(&self.board, true);
            }
            SessionCommand::RotateCcw => {
                self.piece.rotate(&self.board, false);
            }
            SessionCommand::Rotate180 => {
                self.piece.rotate_180(&self.board);
            }
            SessionCommand::HardDrop | SessionCommand::Hold => unreachable!("handled above"),
        }

        if self.check_moved(prior) {
            self.refresh_lock_delay();
            events.push(SessionEvent::Moved);
        }
        events
    }

    /// Directional key press: one immediate shift, then auto-repeat owned by
    /// the DAS/ARR pair. `Down` is the soft-drop key.
    pub fn key_down(&mut self, dir: MoveDir) -> SessionEvents {
        if self.game_over {
            self.auto_shift.cancel();
            return SessionEvents::new();
        }

        match dir {
            MoveDir::Down => self.command(SessionCommand::SoftDrop),
            MoveDir::Left | MoveDir::Right => {
                if !self.auto_shift.key_down(dir) {
                    return SessionEvents::new();
                }
                let mut events = SessionEvents::new();
                let prior = self.piece.pose();
                self.piece.translate(&self.board, dir);
                if self.check_moved(prior) {
                    self.refresh_lock_delay();
                    events.push(SessionEvent::Moved);
                }
                events
            }
        }
    }

    /// Directional key release; cancels the auto-shift (or hands it to the
    /// opposing held key).
    pub fn key_up(&mut self, dir: MoveDir) {
        self.auto_shift.key_up(dir);
    }

    /// Advance all armed timers by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u32) -> SessionEvents {
        let mut events = SessionEvents::new();
        if self.game_over {
            return events;
        }

        let prior = self.piece.pose();

        // Horizontal auto-shift repeats.
        for dir in self.auto_shift.advance(elapsed_ms) {
            self.piece.translate(&self.board, dir);
        }

        // Gravity; after a fire the lock delay is armed iff the piece rests.
        let gravity_fires = self.gravity.advance(elapsed_ms);
        for _ in 0..gravity_fires {
            self.piece.translate(&self.board, MoveDir::Down);
        }

        if gravity_fires > 0 || self.check_moved(prior) {
            self.refresh_lock_delay();
        }
        if self.check_moved(prior) {
            events.push(SessionEvent::Moved);
        }

        // Lock delay: place only if the piece still rests when it fires.
        if self.lock_delay.advance(elapsed_ms) && self.at_final_position() {
            events_extend(&mut events, self.place_and_report());
            return events;
        }

        // Max-piece ceiling: force the placement regardless of lock state.
        if self.max_piece.advance(elapsed_ms) {
            events_extend(&mut events, self.place_and_report());
        }

        events
    }

    /// Drop the active piece to rest, merge it into the local replica, clear
    /// lines, and spawn the next piece. Returns what was placed.
    pub fn place_piece(&mut self, symbol: ShapeId) -> Placement {
        self.piece.drop_to_rest(&self.board);
        let tiles = self.piece.tiles();
        self.board.set_tiles(&tiles, symbol);

        let lines_cleared = self.board.clear_lines();
        self.lines_cleared += lines_cleared;

        self.spawn_next();
        self.can_hold = true;
        self.pieces_placed += 1;

        Placement {
            tiles,
            lines_cleared,
        }
    }

    /// Swap the active piece with the hold slot; the first hold banks the
    /// current shape and pulls a fresh one from the supply. Disabled until
    /// the next placement.
    pub fn hold(&mut self) -> bool {
        if !self.can_hold || self.game_over {
            return false;
        }

        let banked = self.piece.shape;
        let replacement = match self.held.take() {
            Some(held) => held,
            None => self.generator.next(),
        };

        let mut piece = Piece::new(replacement);
        if !piece.lift_to_valid(&self.board) {
            self.game_over = true;
        }
        self.piece = piece;
        self.held = Some(banked);
        self.can_hold = false;
        self.rearm_piece_timers();
        true
    }

    /// Overwrite the board replica wholesale from an authoritative broadcast
    /// and push the active piece back to a valid position if the new grid
    /// swallowed it.
    pub fn sync_board(&mut self, grid: &GridCells) -> SessionEvents {
        let mut events = SessionEvents::new();
        self.board.set_grid_cells(grid);
        if self.game_over {
            return events;
        }

        let prior = self.piece.pose();
        let survived = self.piece.lift_to_valid(&self.board);
        if self.check_moved(prior) {
            self.refresh_lock_delay();
            events.push(SessionEvent::Moved);
        }
        if !survived {
            self.game_over = true;
            events.push(SessionEvent::Lost);
        }
        events
    }

    /// Start a fresh round from an authoritative board: terminal flag drops,
    /// the piece returns to spawn, and all piece timers re-arm.
    pub fn reset_round(&mut self, grid: &GridCells) -> SessionEvents {
        let mut events = SessionEvents::new();
        self.game_over = false;
        self.board.set_grid_cells(grid);
        self.piece.reset_position();
        self.piece.lift_to_valid(&self.board);
        self.auto_shift.cancel();
        self.rearm_piece_timers();
        // Announce the fresh spawn position to peers.
        events.push(SessionEvent::Moved);
        events
    }

    fn place_and_report(&mut self) -> SessionEvents {
        let mut events = SessionEvents::new();
        let placement = self.place_piece(self.symbol);
        events.push(SessionEvent::Placed(placement));
        if self.game_over {
            events.push(SessionEvent::Lost);
        } else {
            // The freshly spawned piece is a pose change worth reporting.
            events.push(SessionEvent::Moved);
        }
        events
    }

    fn hold_and_report(&mut self) -> SessionEvents {
        let mut events = SessionEvents::new();
        if !self.hold() {
            return events;
        }
        if self.game_over {
            events.push(SessionEvent::Lost);
        } else {
            events.push(SessionEvent::Moved);
        }
        events
    }

    fn spawn_next(&mut self) {
        let mut piece = Piece::new(self.generator.next());
        if !piece.lift_to_valid(&self.board) {
            self.game_over = true;
        }
        self.piece = piece;
        self.rearm_piece_timers();
    }

    /// The one re-arm path for piece-scoped timers: respawn restarts gravity
    /// and the max-piece ceiling; the lock delay starts disarmed.
    fn rearm_piece_timers(&mut self) {
        self.gravity.restart();
        self.max_piece.arm(MAX_PIECE_MS);
        self.lock_delay.cancel();
    }

    /// The one re-arm path for the lock delay: armed (restarted) whenever
    /// the piece rests at its final position, cancelled the moment a
    /// mutation lifts it off.
    fn refresh_lock_delay(&mut self) {
        if self.at_final_position() {
            self.lock_delay.arm(LOCK_DELAY_MS);
        } else {
            self.lock_delay.cancel();
        }
    }
}

fn events_extend(events: &mut SessionEvents, more: SessionEvents) {
    for event in more {
        if events.try_push(event).is_err() {
            break;
        }
    }
}
