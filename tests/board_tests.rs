//! Board tests - grid access, line clears and gravity

use blockfall::core::{Board, Cell};
use blockfall::types::{BlockColor, ItemKind, BOARD_HEIGHT, BOARD_WIDTH};

fn block() -> Cell {
    Cell::filled(BlockColor::Gray)
}

fn fill_row(board: &mut Board, y: i8) {
    for x in 0..BOARD_WIDTH as i8 {
        board.set(x, y, block());
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);

    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert!(board.is_valid(x, y), "Cell ({}, {}) should be valid", x, y);
            assert_eq!(board.get(x, y), Some(Cell::EMPTY));
        }
    }
    assert!(board.is_empty());
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();

    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
    assert!(board.is_out_of_bounds(0, BOARD_HEIGHT as i8));
}

#[test]
fn test_board_set_and_clear() {
    let mut board = Board::new();

    assert!(board.set(5, 10, block()));
    assert!(board.is_occupied(5, 10));
    assert!(!board.is_valid(5, 10));

    assert!(board.clear_cell(5, 10));
    assert!(!board.clear_cell(5, 10), "second clear finds nothing");
    assert!(!board.set(-1, 0, block()));
}

#[test]
fn test_minos_may_hang_above_the_board() {
    let board = Board::new();
    assert!(board.accepts_mino(4, -2));
    assert!(!board.is_valid(4, -2));
    assert!(!board.accepts_mino(-1, -2));
    assert!(!board.accepts_mino(4, BOARD_HEIGHT as i8));
}

#[test]
fn test_markers_only_stick_to_blocks() {
    let mut board = Board::new();
    assert!(!board.set_marker(0, 19, ItemKind::Bomb));

    board.set(0, 19, block());
    assert!(board.set_marker(0, 19, ItemKind::Bomb));
    assert_eq!(board.get(0, 19).and_then(|c| c.marker()), Some(ItemKind::Bomb));
}

#[test]
fn test_clear_single_row_shifts_everything_above() {
    let mut board = Board::from_rows(&["#.........", ".#........", "##########"]);

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[19]);
    assert!(board.is_occupied(0, 18));
    assert!(board.is_occupied(1, 19));
    assert_eq!(board.occupied_count(), 2);
}

#[test]
fn test_clear_non_adjacent_rows() {
    let mut board = Board::new();
    for y in [3, 7, 12] {
        fill_row(&mut board, y);
    }
    // One witness block in each band between the full rows.
    board.set(0, 2, block());
    board.set(1, 6, block());
    board.set(2, 11, block());
    board.set(3, 19, block());

    let cleared = board.clear_full_rows();
    assert_eq!(cleared.as_slice(), &[12, 7, 3]);

    // Each block falls by the number of cleared rows beneath it.
    assert!(board.is_occupied(0, 5));
    assert!(board.is_occupied(1, 8));
    assert!(board.is_occupied(2, 12));
    assert!(board.is_occupied(3, 19));
    assert_eq!(board.occupied_count(), 4);
    for y in 0..3 {
        assert!((0..BOARD_WIDTH as i8).all(|x| !board.is_occupied(x, y)));
    }
}

#[test]
fn test_clear_four_rows_to_perfect_clear() {
    let mut board = Board::from_rows(&["##########"; 4]);
    assert_eq!(board.clear_full_rows().len(), 4);
    assert!(board.is_empty());
}

#[test]
fn test_markers_travel_with_cleared_rows() {
    let mut board = Board::from_rows(&["*.........", "##########"]);
    board.clear_full_rows();
    assert_eq!(board.get(0, 19).and_then(|c| c.marker()), Some(ItemKind::LineClear));
    assert_eq!(board.rows_with_marker(ItemKind::LineClear).as_slice(), &[19]);
}

#[test]
fn test_gravity_compacts_columns_independently() {
    let mut board = Board::from_rows(&["#.#.......", "..........", ".#........", "..........", "#........."]);
    board.apply_gravity();

    assert_eq!(
        board.render().lines().skip(18).collect::<Vec<_>>(),
        vec!["#.........", "###......."]
    );
    assert_eq!(board.occupied_count(), 4);
}

#[test]
fn test_render_round_trips_from_rows() {
    let rows = ["..........", "*#.......#", "##########"];
    let board = Board::from_rows(&rows);
    let rendered = board.render();
    let tail: Vec<&str> = rendered.lines().skip(17).collect();
    assert_eq!(tail, rows);
}
