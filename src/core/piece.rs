//! Live falling piece
//!
//! A piece is position + rotation state; its occupied cells are the current
//! rotation's mino offsets translated by the position. Every mutating
//! operation validates against the board passed in as a parameter and leaves
//! the piece untouched on failure - rejected moves are silent, not errors.

use crate::core::board::Board;
use crate::core::pieces::{get_shape, try_rotate, try_rotate_180, PieceShape};
use crate::types::{MoveDir, Rotation, ShapeId, Tile, FATAL_ROW, SPAWN_X, SPAWN_Y};

/// Placement snapshot used to decide whether a mutation changed anything
/// (and therefore whether a network update is worth sending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PiecePose {
    pub shape: ShapeId,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub shape: ShapeId,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a piece at the spawn cell in its spawn orientation. Call
    /// `lift_to_valid` afterwards to resolve spawn overlaps.
    pub fn new(shape: ShapeId) -> Self {
        Self {
            shape,
            rotation: Rotation::North,
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    pub fn pose(&self) -> PiecePose {
        PiecePose {
            shape: self.shape,
            rotation: self.rotation,
            x: self.x,
            y: self.y,
        }
    }

    /// Mino offsets of the current rotation state.
    pub fn current_shape(&self) -> PieceShape {
        get_shape(self.shape, self.rotation)
    }

    /// Absolute cells occupied right now.
    pub fn tiles(&self) -> [Tile; 4] {
        self.tiles_at(self.y)
    }

    fn tiles_at(&self, y: i8) -> [Tile; 4] {
        self.current_shape()
            .map(|(dx, dy)| (self.x + dx, y + dy))
    }

    /// All-or-nothing validity: every occupied cell of `rotation` at (x, y)
    /// must be inside the grid and empty.
    fn fits(&self, board: &Board, x: i8, y: i8, rotation: Rotation) -> bool {
        get_shape(self.shape, rotation)
            .iter()
            .all(|&(dx, dy)| board.is_free(x + dx, y + dy))
    }

    pub fn is_valid(&self, board: &Board) -> bool {
        self.fits(board, self.x, self.y, self.rotation)
    }

    /// Move to (x, y) if that position is valid; otherwise the position is
    /// unchanged. Returns whether the piece moved.
    pub fn move_to(&mut self, board: &Board, x: i8, y: i8) -> bool {
        if self.fits(board, x, y, self.rotation) {
            self.x = x;
            self.y = y;
            true
        } else {
            false
        }
    }

    /// Translate one cell toward the given direction.
    pub fn translate(&mut self, board: &Board, dir: MoveDir) -> bool {
        let (dx, dy) = dir.delta();
        self.move_to(board, self.x + dx, self.y + dy)
    }

    /// Quarter-turn rotation with wall kicks. State and position update
    /// atomically on the first offset that fits; O never rotates.
    pub fn rotate(&mut self, board: &Board, clockwise: bool) -> bool {
        if self.shape == ShapeId::O {
            return false;
        }

        match try_rotate(self.shape, self.rotation, self.x, self.y, clockwise, |x, y| {
            board.is_free(x, y)
        }) {
            Some((rotation, (dx, dy))) => {
                self.rotation = rotation;
                self.x += dx;
                self.y += dy;
                true
            }
            None => false,
        }
    }

    /// 180-degree rotation through the dedicated kick table.
    pub fn rotate_180(&mut self, board: &Board) -> bool {
        if self.shape == ShapeId::O {
            return false;
        }

        match try_rotate_180(self.shape, self.rotation, self.x, self.y, |x, y| {
            board.is_free(x, y)
        }) {
            Some((rotation, (dx, dy))) => {
                self.rotation = rotation;
                self.x += dx;
                self.y += dy;
                true
            }
            None => false,
        }
    }

    /// The lowest y this piece can rest at from its current position.
    pub fn final_y(&self, board: &Board) -> i8 {
        let mut y = self.y;
        while self.fits(board, self.x, y + 1, self.rotation) {
            y += 1;
        }
        y
    }

    /// The cells this piece would occupy after a drop, without mutating it
    /// (ghost preview).
    pub fn final_tiles(&self, board: &Board) -> [Tile; 4] {
        self.tiles_at(self.final_y(board))
    }

    /// Hard drop: move straight down to the rest position.
    pub fn drop_to_rest(&mut self, board: &Board) {
        self.y = self.final_y(board);
    }

    /// True when the piece cannot fall any further.
    pub fn at_final_position(&self, board: &Board) -> bool {
        self.final_y(board) == self.y
    }

    /// Spawn lift: while the current position is invalid and above the fatal
    /// boundary, shift up one row. Returns false when the piece is still
    /// invalid at the fatal boundary - the owner must treat that as terminal.
    pub fn lift_to_valid(&mut self, board: &Board) -> bool {
        while !self.is_valid(board) && self.y > FATAL_ROW {
            self.y -= 1;
        }
        self.is_valid(board)
    }

    /// Return to the spawn cell (fresh round); rotation state is kept.
    pub fn reset_position(&mut self) {
        self.x = SPAWN_X;
        self.y = SPAWN_Y;
    }
}
