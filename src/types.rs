//! Core types shared across the application
//! This module contains pure data types and the fixed game configuration

use serde::{Deserialize, Serialize};

/// Board dimensions. Row 0 is the topmost row; the first `HIDDEN_ROWS` rows
/// are the non-visible spawn buffer above the playable area.
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 24;
pub const HIDDEN_ROWS: usize = 4;

/// Rows at or above this index are fatal: a piece or tile set that is still
/// conflicting once it reaches them counts as a loss.
pub const FATAL_ROW: i8 = 1;

/// Spawn cell for new pieces (matrix origin).
pub const SPAWN_X: i8 = (BOARD_WIDTH as i8) / 2 - 2;
pub const SPAWN_Y: i8 = HIDDEN_ROWS as i8;

/// Game timing constants (in milliseconds)
pub const GRAVITY_INTERVAL_MS: u32 = 1000;
pub const LOCK_DELAY_MS: u32 = 500;
pub const MAX_PIECE_MS: u32 = 10_000;

/// DAS/ARR timing (milliseconds)
pub const DAS_MS: u32 = 133;
pub const ARR_MS: u32 = 10;

/// Delay before the relay starts a fresh round after a loss.
pub const RESET_DELAY_MS: u64 = 5000;

/// Identity the relay assigns to a connected participant.
pub type ParticipantId = u64;

/// The seven shape families. A participant's symbol is also a `ShapeId`,
/// so merged tiles carry the color of whoever placed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeId {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl ShapeId {
    pub const ALL: [ShapeId; 7] = [
        ShapeId::I,
        ShapeId::O,
        ShapeId::T,
        ShapeId::S,
        ShapeId::Z,
        ShapeId::J,
        ShapeId::L,
    ];

    /// Stable index used for the wire grid encoding (`index() + 1`).
    pub fn index(&self) -> usize {
        match self {
            ShapeId::I => 0,
            ShapeId::O => 1,
            ShapeId::T => 2,
            ShapeId::S => 3,
            ShapeId::Z => 4,
            ShapeId::J => 5,
            ShapeId::L => 6,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Rotation states (North = spawn orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotate 180 degrees
    pub fn flip(&self) -> Self {
        match self {
            Rotation::North => Rotation::South,
            Rotation::East => Rotation::West,
            Rotation::South => Rotation::North,
            Rotation::West => Rotation::East,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Unit translation directions for the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDir {
    Left,
    Right,
    Down,
}

impl MoveDir {
    pub fn delta(&self) -> (i8, i8) {
        match self {
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
            MoveDir::Down => (0, 1),
        }
    }
}

/// Cell on the board (None = empty, Some = filled with a shape symbol)
pub type Cell = Option<ShapeId>;

/// Absolute board coordinate of one occupied cell.
pub type Tile = (i8, i8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_index_roundtrip() {
        for shape in ShapeId::ALL {
            assert_eq!(ShapeId::from_index(shape.index()), Some(shape));
        }
        assert_eq!(ShapeId::from_index(7), None);
    }

    #[test]
    fn test_rotation_cycles() {
        let mut rotation = Rotation::North;
        for _ in 0..4 {
            rotation = rotation.rotate_cw();
        }
        assert_eq!(rotation, Rotation::North);

        assert_eq!(Rotation::East.flip(), Rotation::West);
        assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    }

    #[test]
    fn test_spawn_inside_hidden_band() {
        assert_eq!(SPAWN_X, 3);
        assert_eq!(SPAWN_Y as usize, HIDDEN_ROWS);
        assert!((FATAL_ROW as usize) < HIDDEN_ROWS);
    }
}
