//! Pieces tests - shape tables and the SRS rotation state machine

use shared_tetris::core::board::Board;
use shared_tetris::core::piece::Piece;
use shared_tetris::core::pieces::{
    get_kick_table, get_kick_table_180, get_shape, try_rotate, try_rotate_180,
};
use shared_tetris::types::{MoveDir, Rotation, ShapeId, BOARD_WIDTH};

const ROTATIONS: [Rotation; 4] = [
    Rotation::North,
    Rotation::East,
    Rotation::South,
    Rotation::West,
];

// ============== Shape Tests ==============

#[test]
fn test_i_piece_shapes() {
    assert_eq!(
        get_shape(ShapeId::I, Rotation::North),
        [(0, 1), (1, 1), (2, 1), (3, 1)]
    );
    assert_eq!(
        get_shape(ShapeId::I, Rotation::East),
        [(2, 0), (2, 1), (2, 2), (2, 3)]
    );
}

#[test]
fn test_t_piece_shapes() {
    assert_eq!(
        get_shape(ShapeId::T, Rotation::North),
        [(1, 0), (0, 1), (1, 1), (2, 1)]
    );
    assert_eq!(
        get_shape(ShapeId::T, Rotation::South),
        [(0, 1), (1, 1), (2, 1), (1, 2)]
    );
}

#[test]
fn test_o_piece_shape_is_identical_across_states() {
    let north = get_shape(ShapeId::O, Rotation::North);
    for rotation in ROTATIONS {
        assert_eq!(get_shape(ShapeId::O, rotation), north);
    }
}

#[test]
fn test_all_shapes_have_4_minos_in_matrix_bounds() {
    for shape in ShapeId::ALL {
        for rotation in ROTATIONS {
            let minos = get_shape(shape, rotation);
            assert_eq!(minos.len(), 4);
            for (x, y) in minos {
                assert!((0..4).contains(&x), "{:?} {:?} x out of matrix", shape, rotation);
                assert!((0..4).contains(&y), "{:?} {:?} y out of matrix", shape, rotation);
            }
        }
    }
}

// ============== Kick Table Tests ==============

#[test]
fn test_kick_table_families() {
    // JLSTZ share one table; I differs; O never kicks.
    let j = get_kick_table(ShapeId::J);
    for shape in [ShapeId::L, ShapeId::S, ShapeId::T, ShapeId::Z] {
        assert_eq!(get_kick_table(shape), j);
    }
    assert_ne!(get_kick_table(ShapeId::I), j);

    for kicks in get_kick_table(ShapeId::O) {
        assert!(kicks.iter().all(|&k| k == (0, 0)));
    }
}

#[test]
fn test_180_tables_distinct_from_quarter_turns() {
    let t_180 = get_kick_table_180(ShapeId::T);
    assert_ne!(t_180, get_kick_table_180(ShapeId::I));
    // Every transition starts with the direct (0,0) trial for JLSTZ.
    for kicks in t_180 {
        assert_eq!(kicks[0], (0, 0));
    }
}

// ============== Rotation Resolution Tests ==============

#[test]
fn test_rotation_on_open_board_needs_no_kick() {
    for shape in [ShapeId::T, ShapeId::J, ShapeId::L, ShapeId::S, ShapeId::Z] {
        let result = try_rotate(shape, Rotation::North, 3, 10, true, |_, _| true);
        assert_eq!(result, Some((Rotation::East, (0, 0))));
    }
}

#[test]
fn test_rotation_uses_first_fitting_kick() {
    // Block the direct target position so a later trial must win.
    let blocked = get_shape(ShapeId::T, Rotation::East)
        .map(|(dx, dy)| (3 + dx, 10 + dy));
    let result = try_rotate(ShapeId::T, Rotation::North, 3, 10, true, |x, y| {
        !blocked.contains(&(x, y))
    });

    let (rotation, kick) = result.expect("a kick should resolve the rotation");
    assert_eq!(rotation, Rotation::East);
    assert_ne!(kick, (0, 0));
}

#[test]
fn test_rotation_fails_when_everything_is_blocked() {
    assert_eq!(
        try_rotate(ShapeId::Z, Rotation::East, 3, 10, false, |_, _| false),
        None
    );
    assert_eq!(
        try_rotate_180(ShapeId::Z, Rotation::East, 3, 10, |_, _| false),
        None
    );
}

#[test]
fn test_rotate_180_targets_opposite_state() {
    for (from, to) in [
        (Rotation::North, Rotation::South),
        (Rotation::East, Rotation::West),
        (Rotation::South, Rotation::North),
        (Rotation::West, Rotation::East),
    ] {
        let result = try_rotate_180(ShapeId::J, from, 3, 10, |_, _| true);
        assert_eq!(result.map(|(rotation, _)| rotation), Some(to));
    }
}

// ============== Piece-Level Invariants ==============

#[test]
fn test_cw_then_ccw_returns_to_origin_for_all_states() {
    let board = Board::new();

    for shape in ShapeId::ALL {
        let mut piece = Piece::new(shape);
        piece.move_to(&board, 4, 10);

        for _ in 0..4 {
            let before = piece.pose();
            let rotated = piece.rotate(&board, true);
            let restored = piece.rotate(&board, false);
            // Either both succeed or both were no-ops; never a third state.
            assert_eq!(rotated, restored);
            assert_eq!(piece.pose(), before);
            piece.rotate(&board, true);
        }
    }
}

#[test]
fn test_rejected_rotation_leaves_piece_untouched() {
    let mut board = Board::new();
    // Encase the piece so every kick trial collides.
    for y in 8..16 {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Some(ShapeId::L));
        }
    }
    // Carve out exactly the piece's current cells.
    let mut piece = Piece::new(ShapeId::S);
    piece.x = 3;
    piece.y = 10;
    for (x, y) in get_shape(ShapeId::S, Rotation::North).map(|(dx, dy)| (3 + dx, 10 + dy)) {
        board.set(x, y, None);
    }

    assert!(piece.is_valid(&board));
    let before = piece.pose();
    assert!(!piece.rotate(&board, true));
    assert!(!piece.rotate(&board, false));
    assert!(!piece.rotate_180(&board));
    assert_eq!(piece.pose(), before);
}

#[test]
fn test_wall_kick_keeps_piece_in_bounds() {
    let board = Board::new();

    // A vertical I hugging the left wall kicks inward when rotated.
    let mut piece = Piece::new(ShapeId::I);
    piece.rotate(&board, true);
    while piece.translate(&board, MoveDir::Left) {}

    if piece.rotate(&board, true) {
        for (x, y) in piece.tiles() {
            assert!(board.get(x, y).is_some(), "({}, {}) left the grid", x, y);
        }
    }
}
