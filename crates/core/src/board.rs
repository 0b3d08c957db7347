//! Board module - manages the game grid
//!
//! The board is a 10x20 grid of [`Cell`]s stored in a flat row-major array.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Pieces may hang above the board (negative y) while falling; only in-bounds cells are
//! ever written.

use arrayvec::ArrayVec;

use crate::types::{BlockColor, ItemKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Row indices removed by one clear pass (never more than the board height)
pub type ClearedRows = ArrayVec<u8, { BOARD_HEIGHT as usize }>;

/// A single board cell
///
/// An empty cell carries neither color nor marker; the constructors keep it that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    color: Option<BlockColor>,
    marker: Option<ItemKind>,
}

impl Cell {
    /// The empty cell
    pub const EMPTY: Cell = Cell {
        color: None,
        marker: None,
    };

    /// An occupied cell with the given color and no marker
    pub fn filled(color: BlockColor) -> Self {
        Self {
            color: Some(color),
            marker: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.color.is_some()
    }

    pub fn color(&self) -> Option<BlockColor> {
        self.color
    }

    pub fn marker(&self) -> Option<ItemKind> {
        self.marker
    }

    /// Attach an item marker. Empty cells stay unmarked.
    pub fn with_marker(self, marker: ItemKind) -> Self {
        if self.is_occupied() {
            Self {
                marker: Some(marker),
                ..self
            }
        } else {
            self
        }
    }
}

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [Cell::EMPTY; BOARD_SIZE],
        }
    }

    /// Build a board from text rows aligned to the bottom edge
    ///
    /// `.` and ` ` are empty, `*` is a LINE_CLEAR-marked block, anything else is a gray
    /// block. Rows longer than the board are truncated; missing rows on top stay empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_core::Board;
    ///
    /// let board = Board::from_rows(&["#########."]);
    /// assert!(board.is_occupied(0, 19));
    /// assert!(!board.is_occupied(9, 19));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::new();
        let height = BOARD_HEIGHT as usize;
        let skip = rows.len().saturating_sub(height);
        let top = height - (rows.len() - skip);

        for (i, row) in rows.iter().skip(skip).enumerate() {
            let y = (top + i) as i8;
            for (x, ch) in row.chars().take(BOARD_WIDTH as usize).enumerate() {
                let cell = match ch {
                    '.' | ' ' => continue,
                    '*' => Cell::filled(BlockColor::Gray).with_marker(ItemKind::LineClear),
                    _ => Cell::filled(BlockColor::Gray),
                };
                board.set(x as i8, y, cell);
            }
        }
        board
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Empty the cell at (x, y), dropping any marker
    /// Returns true if the cell was occupied
    pub fn clear_cell(&mut self, x: i8, y: i8) -> bool {
        match Self::index(x, y) {
            Some(idx) if self.cells[idx].is_occupied() => {
                self.cells[idx] = Cell::EMPTY;
                true
            }
            _ => false,
        }
    }

    /// Attach an item marker to an occupied cell
    /// Returns false if the cell is empty or out of bounds
    pub fn set_marker(&mut self, x: i8, y: i8, marker: ItemKind) -> bool {
        match Self::index(x, y) {
            Some(idx) if self.cells[idx].is_occupied() => {
                self.cells[idx] = self.cells[idx].with_marker(marker);
                true
            }
            _ => false,
        }
    }

    /// Check if position is valid (within bounds and empty)
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(cell) if !cell.is_occupied())
    }

    /// Check if a falling mino may occupy (x, y)
    ///
    /// Same as [`Board::is_valid`] except that rows above the board are allowed.
    pub fn accepts_mino(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        y < 0 || self.is_valid(x, y)
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(cell) if cell.is_occupied())
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        Self::index(x, y).is_none()
    }

    fn row(&self, y: usize) -> &[Cell] {
        let width = BOARD_WIDTH as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        y < BOARD_HEIGHT as usize && self.row(y).iter().all(Cell::is_occupied)
    }

    /// Whether no cell on the board is occupied (perfect clear)
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_occupied())
    }

    /// Number of occupied cells on the board
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_occupied()).count()
    }

    /// Rows (bottom to top) in which every column is occupied
    pub fn full_rows(&self) -> ClearedRows {
        (0..BOARD_HEIGHT as usize)
            .rev()
            .filter(|&y| self.is_row_full(y))
            .map(|y| y as u8)
            .collect()
    }

    /// Rows (bottom to top) holding at least one cell marked with `marker`
    pub fn rows_with_marker(&self, marker: ItemKind) -> ClearedRows {
        (0..BOARD_HEIGHT as usize)
            .rev()
            .filter(|&y| self.row(y).iter().any(|cell| cell.marker() == Some(marker)))
            .map(|y| y as u8)
            .collect()
    }

    /// Remove the given rows and compact the rest downwards
    ///
    /// Surviving rows are read bottom-to-top and rewritten bottom-to-top, so their relative
    /// order is preserved no matter how many rows go at once. Vacated rows at the top are
    /// emptied. Returns the number of occupied cells removed.
    pub fn remove_rows(&mut self, rows: &[u8]) -> usize {
        if rows.is_empty() {
            return 0;
        }

        let width = BOARD_WIDTH as usize;
        let mut removed_cells = 0;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if rows.contains(&(read_y as u8)) {
                removed_cells += self.row(read_y).iter().filter(|c| c.is_occupied()).count();
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = Cell::EMPTY;
        }

        removed_cells
    }

    /// Clear all full rows and return the row indices that were cleared (bottom to top)
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let rows = self.full_rows();
        self.remove_rows(&rows);
        rows
    }

    /// Settle every column independently
    ///
    /// Occupied cells in each column drop to the lowest free slots while keeping their
    /// top-to-bottom order. Markers travel with their cells.
    pub fn apply_gravity(&mut self) {
        for x in 0..BOARD_WIDTH as i8 {
            let mut write_y = BOARD_HEIGHT as i8 - 1;
            for read_y in (0..BOARD_HEIGHT as i8).rev() {
                let Some(cell) = self.get(x, read_y) else {
                    continue;
                };
                if !cell.is_occupied() {
                    continue;
                }
                if write_y != read_y {
                    self.set(x, write_y, cell);
                    self.set(x, read_y, Cell::EMPTY);
                }
                write_y -= 1;
            }
        }
    }

    /// Write piece cells into the board
    ///
    /// Cells above the board are skipped; callers decide beforehand whether such a lock
    /// is legal.
    pub fn write_cells(&mut self, cells: &[(i8, i8)], color: BlockColor) {
        for &(x, y) in cells {
            self.set(x, y, Cell::filled(color));
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Render the board as text, one line per row (`.` empty, `#` block, `*` marked block)
    pub fn render(&self) -> String {
        let width = BOARD_WIDTH as usize;
        let mut out = String::with_capacity((width + 1) * BOARD_HEIGHT as usize);
        for y in 0..BOARD_HEIGHT as usize {
            for cell in self.row(y) {
                out.push(match (cell.is_occupied(), cell.marker()) {
                    (false, _) => '.',
                    (true, Some(_)) => '*',
                    (true, None) => '#',
                });
            }
            out.push('\n');
        }
        out
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [Cell::EMPTY; BOARD_SIZE];
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray() -> Cell {
        Cell::filled(BlockColor::Gray)
    }

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_marker_never_lands_on_empty_cell() {
        assert_eq!(Cell::EMPTY.with_marker(ItemKind::Bomb), Cell::EMPTY);

        let mut board = Board::new();
        assert!(!board.set_marker(3, 3, ItemKind::Bomb));
        board.set(3, 3, gray());
        assert!(board.set_marker(3, 3, ItemKind::Bomb));
        assert_eq!(board.get(3, 3).and_then(|c| c.marker()), Some(ItemKind::Bomb));

        assert!(board.clear_cell(3, 3));
        assert_eq!(board.get(3, 3), Some(Cell::EMPTY));
    }

    #[test]
    fn test_accepts_mino_above_board() {
        let board = Board::new();
        assert!(board.accepts_mino(4, -2));
        assert!(!board.accepts_mino(-1, -2));
        assert!(!board.accepts_mino(4, 20));
        assert!(!board.is_valid(4, -1));
    }

    #[test]
    fn test_clear_full_rows_shifts_rows_above() {
        let mut board = Board::from_rows(&["#.........", "##########", ".........#"]);

        let cleared = board.clear_full_rows();

        assert_eq!(cleared.as_slice(), &[18]);
        assert!(!board.is_occupied(0, 19));
        assert!(board.is_occupied(9, 19));
        assert!(board.is_occupied(0, 18));
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn test_remove_rows_keeps_relative_order() {
        let mut board = Board::new();
        for y in 0..BOARD_HEIGHT as i8 {
            // Tag each row by the column of its single block.
            board.set(y % 10, y, gray());
        }
        for y in [3i8, 7, 12] {
            for x in 0..BOARD_WIDTH as i8 {
                board.set(x, y, gray());
            }
        }

        let removed = board.remove_rows(&[3, 7, 12]);
        assert_eq!(removed, 30);

        let survivors: Vec<i8> = (0..BOARD_HEIGHT as i8)
            .filter(|&y| y != 3 && y != 7 && y != 12)
            .collect();
        for (i, src_y) in survivors.iter().enumerate() {
            let dst_y = 3 + i as i8;
            assert!(board.is_occupied(src_y % 10, dst_y), "row {src_y} -> {dst_y}");
        }
        for y in 0..3 {
            assert!((0..10).all(|x| !board.is_occupied(x, y)));
        }
    }

    #[test]
    fn test_apply_gravity_compacts_columns() {
        let mut board = Board::from_rows(&["#.", "..", "#.", "..", ".#"]);
        board.set_marker(0, 15, ItemKind::Bomb);

        board.apply_gravity();

        assert!(board.is_occupied(0, 19));
        assert!(board.is_occupied(0, 18));
        assert!(board.is_occupied(1, 19));
        assert_eq!(board.occupied_count(), 3);
        assert_eq!(board.get(0, 18).and_then(|c| c.marker()), Some(ItemKind::Bomb));
    }

    #[test]
    fn test_rows_with_marker() {
        let board = Board::from_rows(&["..*.......", "##########", "#*........"]);
        assert_eq!(board.rows_with_marker(ItemKind::LineClear).as_slice(), &[19, 17]);
        assert!(board.rows_with_marker(ItemKind::Bomb).is_empty());
    }

    #[test]
    fn test_render_marks_blocks() {
        let board = Board::from_rows(&["#*"]);
        let text = board.render();
        assert!(text.ends_with("#*........\n"));
        assert_eq!(text.lines().count(), BOARD_HEIGHT as usize);
    }
}
