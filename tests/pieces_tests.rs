//! Pieces tests - shapes and SRS rotation with wall kicks

use blockfall::core::pieces::{
    get_shape, kick_offsets, mino_count, try_rotate, SPAWN_POSITION,
};
use blockfall::core::Board;
use blockfall::types::{PieceKind, Rotation};

const ROTATIONS: [Rotation; 4] = [
    Rotation::North,
    Rotation::East,
    Rotation::South,
    Rotation::West,
];

fn sorted(kind: PieceKind, rotation: Rotation) -> Vec<(i8, i8)> {
    let mut cells = get_shape(kind, rotation).to_vec();
    cells.sort();
    cells
}

// ============== Shape Tests ==============

#[test]
fn test_i_piece_shapes() {
    assert_eq!(sorted(PieceKind::I, Rotation::North), [(0, 1), (1, 1), (2, 1), (3, 1)]);
    assert_eq!(sorted(PieceKind::I, Rotation::East), [(2, 0), (2, 1), (2, 2), (2, 3)]);
    assert_eq!(sorted(PieceKind::I, Rotation::South), [(0, 2), (1, 2), (2, 2), (3, 2)]);
    assert_eq!(sorted(PieceKind::I, Rotation::West), [(1, 0), (1, 1), (1, 2), (1, 3)]);
}

#[test]
fn test_t_piece_shapes() {
    assert_eq!(sorted(PieceKind::T, Rotation::North), [(0, 1), (1, 0), (1, 1), (2, 1)]);
    assert_eq!(sorted(PieceKind::T, Rotation::East), [(1, 0), (1, 1), (1, 2), (2, 1)]);
    assert_eq!(sorted(PieceKind::T, Rotation::South), [(0, 1), (1, 1), (1, 2), (2, 1)]);
    assert_eq!(sorted(PieceKind::T, Rotation::West), [(0, 1), (1, 0), (1, 1), (1, 2)]);
}

#[test]
fn test_o_piece_never_turns() {
    let north = get_shape(PieceKind::O, Rotation::North);
    for rotation in ROTATIONS {
        assert_eq!(get_shape(PieceKind::O, rotation), north);
    }
}

#[test]
fn test_every_shape_keeps_its_mino_count() {
    for kind in PieceKind::STANDARD {
        for rotation in ROTATIONS {
            assert_eq!(get_shape(kind, rotation).len(), mino_count(kind));
        }
    }
    assert_eq!(mino_count(PieceKind::Item), 1);
    assert_eq!(mino_count(PieceKind::Weight), 4);
}

#[test]
fn test_spawn_position() {
    assert_eq!(SPAWN_POSITION, (3, 0));
}

// ============== Rotation Tests ==============

#[test]
fn test_rotation_in_open_space_uses_no_kick() {
    let board = Board::new();
    let (x, y) = (3, 5);
    for kind in PieceKind::STANDARD.into_iter().filter(|k| *k != PieceKind::O) {
        for rotation in ROTATIONS {
            let result = try_rotate(kind, rotation, x, y, true, true, |x, y| {
                board.accepts_mino(x, y)
            });
            let result = result.unwrap_or_else(|| panic!("{kind:?} {rotation:?} should turn"));
            assert_eq!(result.rotation, rotation.rotate_cw());
            assert_eq!((result.x, result.y, result.kick_index), (x, y, 0));
        }
    }
}

#[test]
fn test_four_turns_come_back_home() {
    let mut rotation = Rotation::North;
    for _ in 0..4 {
        let result = try_rotate(PieceKind::J, rotation, 4, 4, false, true, |_, _| true);
        rotation = result.map(|r| r.rotation).unwrap_or(rotation);
    }
    assert_eq!(rotation, Rotation::North);
}

#[test]
fn test_square_rotation_is_rejected() {
    assert!(try_rotate(PieceKind::O, Rotation::North, 3, 0, true, true, |_, _| true).is_none());
}

#[test]
fn test_wall_kick_off_left_wall() {
    // I standing vertically against the left wall (West, minos in box column 1).
    let board = Board::new();
    let result = try_rotate(PieceKind::I, Rotation::West, -1, 5, true, true, |x, y| {
        board.accepts_mino(x, y)
    });
    let result = result.expect("kick should free the I piece");
    assert_eq!(result.rotation, Rotation::North);
    assert!(result.kick_index > 0);
    assert!(get_shape(PieceKind::I, Rotation::North)
        .iter()
        .all(|&(mx, my)| board.accepts_mino(result.x + mx, result.y + my)));
}

#[test]
fn test_first_valid_offset_wins_over_later_ones() {
    let offsets = kick_offsets(PieceKind::T, Rotation::North, Rotation::East)
        .expect("quarter turn has kicks");
    let (ox, oy) = (4, 4);
    let target = get_shape(PieceKind::T, Rotation::East);

    // Only placements at offsets 3 and 4 fit.
    let allowed: Vec<(i8, i8)> = [offsets[3], offsets[4]]
        .iter()
        .flat_map(|&(dx, dy)| target.iter().map(move |&(mx, my)| (ox + dx + mx, oy + dy + my)))
        .collect();
    let fits = |x, y| allowed.contains(&(x, y));

    let result = try_rotate(PieceKind::T, Rotation::North, ox, oy, true, true, fits);
    assert_eq!(result.map(|r| r.kick_index), Some(3));
}

#[test]
fn test_without_srs_only_the_pivot_position_counts() {
    let offsets = kick_offsets(PieceKind::T, Rotation::North, Rotation::East)
        .expect("quarter turn has kicks");
    let target = get_shape(PieceKind::T, Rotation::East);
    let (dx, dy) = offsets[1];
    let allowed: Vec<(i8, i8)> = target.iter().map(|&(mx, my)| (4 + dx + mx, 4 + dy + my)).collect();

    let with_srs = try_rotate(PieceKind::T, Rotation::North, 4, 4, true, true, |x, y| {
        allowed.contains(&(x, y))
    });
    assert_eq!(with_srs.map(|r| r.kick_index), Some(1));

    let without = try_rotate(PieceKind::T, Rotation::North, 4, 4, true, false, |x, y| {
        allowed.contains(&(x, y))
    });
    assert!(without.is_none());
}
