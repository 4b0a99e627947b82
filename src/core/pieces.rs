//! Pieces module - shape geometry and SRS rotation tables
//!
//! Implements the Standard Rotation System (SRS) wall kick tables, plus the
//! SRS+ style 180-degree kick tables used by the dedicated `rotate180` path.
//! Reference: https://tetris.wiki/SRS

use crate::types::{Rotation, ShapeId};

/// Offset of a single mino relative to the piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the piece origin
pub type PieceShape = [MinoOffset; 4];

/// Get the shape (mino offsets) for a shape family and rotation state
pub fn get_shape(shape: ShapeId, rotation: Rotation) -> PieceShape {
    match shape {
        ShapeId::I => get_i_shape(rotation),
        ShapeId::O => get_o_shape(rotation),
        ShapeId::T => get_t_shape(rotation),
        ShapeId::S => get_s_shape(rotation),
        ShapeId::Z => get_z_shape(rotation),
        ShapeId::J => get_j_shape(rotation),
        ShapeId::L => get_l_shape(rotation),
    }
}

/// I piece shapes
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// O piece shapes (same for all rotations)
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

/// T piece shapes
fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// S piece shapes
fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// Z piece shapes
fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

/// J piece shapes
fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

/// L piece shapes
fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// SRS wall kick data for quarter turns
/// Each entry is a (dx, dy) offset to try when the direct rotation fails
pub type KickTable = [[(i8, i8); 5]; 8];

/// Kick data for 180-degree turns, indexed by the from-state
pub type KickTable180 = [[(i8, i8); 6]; 4];

/// Get the quarter-turn kick table for a shape family
pub fn get_kick_table(shape: ShapeId) -> &'static KickTable {
    match shape {
        ShapeId::O => &O_KICKS,
        ShapeId::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

/// Get the 180-degree kick table for a shape family
pub fn get_kick_table_180(shape: ShapeId) -> &'static KickTable180 {
    match shape {
        ShapeId::O => &O_KICKS_180,
        ShapeId::I => &I_KICKS_180,
        _ => &JLSTZ_KICKS_180,
    }
}

/// O piece has no kicks (always returns 0,0)
const O_KICKS: KickTable = [[(0, 0); 5]; 8];
const O_KICKS_180: KickTable180 = [[(0, 0); 6]; 4];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    // 0->1 (N->E, clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0->3 (N->W, counter-clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->0 (E->N, counter-clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2 (E->S, clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1 (S->E, counter-clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3 (S->W, clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2 (W->S, counter-clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0 (W->N, clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 0->3 (N->W)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 1->0 (E->N)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2 (E->S)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1 (S->E)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3 (S->W)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2 (W->S)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0 (W->N)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// JLSTZ 180-degree kicks (SRS+ extension, 6 trials per transition)
const JLSTZ_KICKS_180: KickTable180 = [
    // 0->2 (N->S)
    [(0, 0), (0, 1), (1, 1), (-1, 1), (1, 0), (-1, 0)],
    // 1->3 (E->W)
    [(0, 0), (1, 0), (1, 2), (1, 1), (0, 2), (0, 1)],
    // 2->0 (S->N)
    [(0, 0), (0, -1), (-1, -1), (1, -1), (-1, 0), (1, 0)],
    // 3->1 (W->E)
    [(0, 0), (-1, 0), (-1, 2), (-1, 1), (0, 2), (0, 1)],
];

/// I piece 180-degree kicks
const I_KICKS_180: KickTable180 = [
    // 0->2 (N->S)
    [(1, -1), (1, 0), (2, 0), (0, 0), (2, -1), (0, -1)],
    // 1->3 (E->W)
    [(-1, -1), (0, -1), (0, 1), (0, 0), (-1, 1), (-1, 0)],
    // 2->0 (S->N)
    [(-1, 1), (-1, 0), (-2, 0), (0, 0), (-2, 1), (0, 1)],
    // 3->1 (W->E)
    [(1, 1), (0, 1), (0, 3), (0, 2), (1, 3), (1, 2)],
];

/// Get the kick table row for a quarter-turn transition
fn get_kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,  // N->E
        (Rotation::North, false) => 1, // N->W
        (Rotation::East, false) => 2,  // E->N
        (Rotation::East, true) => 3,   // E->S
        (Rotation::South, false) => 4, // S->E
        (Rotation::South, true) => 5,  // S->W
        (Rotation::West, false) => 6,  // W->S
        (Rotation::West, true) => 7,   // W->N
    }
}

/// Try to rotate a piece a quarter turn with wall kicks.
/// Returns the new rotation and the accepted kick offset, or None if every
/// trial offset fails.
pub fn try_rotate(
    shape: ShapeId,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
    is_free: impl Fn(i8, i8) -> bool,
) -> Option<(Rotation, (i8, i8))> {
    let target = if clockwise {
        rotation.rotate_cw()
    } else {
        rotation.rotate_ccw()
    };

    let target_shape = get_shape(shape, target);
    let kicks = &get_kick_table(shape)[get_kick_index(rotation, clockwise)];

    first_fitting_kick(kicks.as_slice(), &target_shape, x, y, is_free).map(|kick| (target, kick))
}

/// Try to rotate a piece 180 degrees using the dedicated kick table.
pub fn try_rotate_180(
    shape: ShapeId,
    rotation: Rotation,
    x: i8,
    y: i8,
    is_free: impl Fn(i8, i8) -> bool,
) -> Option<(Rotation, (i8, i8))> {
    let target = rotation.flip();
    let target_shape = get_shape(shape, target);
    let kicks = &get_kick_table_180(shape)[rotation.index()];

    first_fitting_kick(kicks.as_slice(), &target_shape, x, y, is_free).map(|kick| (target, kick))
}

/// Try each kick offset in order; the first one where every mino lands on a
/// free cell wins.
fn first_fitting_kick(
    kicks: &[(i8, i8)],
    target_shape: &PieceShape,
    x: i8,
    y: i8,
    is_free: impl Fn(i8, i8) -> bool,
) -> Option<(i8, i8)> {
    kicks.iter().copied().find(|&(dx, dy)| {
        target_shape
            .iter()
            .all(|&(mx, my)| is_free(x + dx + mx, y + dy + my))
    })
}
