use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::GameError,
    game::Word,
    models::{BoardSquare, Position, Tile},
    utils::LetterDictionary,
};

/// Default edge length of a board
pub const DEFAULT_BOARD_SIZE: usize = 6;

/// Layout character for a disabled square
pub const DISABLED_CELL: char = '#';
/// Layout character for an enabled square without a seeded tile
pub const BLANK_CELL: char = '.';

/// Square grid of board squares, stored row-major.
///
/// Gravity pulls tiles toward the bottom row. Disabled squares split a column
/// into independent segments that tiles never cross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    squares: Vec<BoardSquare>,
    #[serde(skip)]
    selected_word: Option<Word>,
}

impl Board {
    /// Create an empty board with every square enabled
    pub fn new(size: usize) -> Self {
        let squares = (0..size * size)
            .map(|idx| BoardSquare::new(Position::new(idx / size, idx % size), true))
            .collect();

        Self {
            size,
            squares,
            selected_word: None,
        }
    }

    /// Build a board from layout rows.
    ///
    /// `#` marks a disabled square, `.` an enabled blank square and any letter
    /// an enabled square seeded with that tile. Every row must be as long as
    /// the number of rows.
    pub fn from_layout<S: AsRef<str>>(
        rows: &[S],
        letters: &LetterDictionary,
    ) -> Result<Self, GameError> {
        let size = rows.len();
        let mut board = Self::new(size);

        for (row, line) in rows.iter().enumerate() {
            let cells: Vec<char> = line.as_ref().chars().collect();
            if cells.len() != size {
                return Err(GameError::MalformedLayout(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    cells.len(),
                    size
                )));
            }

            for (col, cell) in cells.into_iter().enumerate() {
                let square = &mut board.squares[row * size + col];
                match cell {
                    DISABLED_CELL => *square = BoardSquare::new(Position::new(row, col), false),
                    BLANK_CELL => {}
                    c if c.is_ascii_alphabetic() => square.set_tile(Some(letters.tile(c))),
                    other => {
                        return Err(GameError::MalformedLayout(format!(
                            "unexpected character '{}' at row {}, col {}",
                            other, row, col
                        )))
                    }
                }
            }
        }

        Ok(board)
    }

    /// Render the board back into layout rows
    pub fn layout(&self) -> Vec<String> {
        self.squares
            .chunks(self.size.max(1))
            .map(|row| {
                row.iter()
                    .map(|square| {
                        if !square.is_enabled() {
                            DISABLED_CELL
                        } else {
                            square.tile().map_or(BLANK_CELL, Tile::letter)
                        }
                    })
                    .collect()
            })
            .collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn squares(&self) -> &[BoardSquare] {
        &self.squares
    }

    /// Look up a square by column and row
    pub fn board_square(&self, col: usize, row: usize) -> Result<&BoardSquare, GameError> {
        let idx = self.index(Position::new(row, col))?;
        Ok(&self.squares[idx])
    }

    pub fn square_at(&self, position: Position) -> Result<&BoardSquare, GameError> {
        self.board_square(position.col, position.row)
    }

    fn square_at_mut(&mut self, position: Position) -> Result<&mut BoardSquare, GameError> {
        let idx = self.index(position)?;
        Ok(&mut self.squares[idx])
    }

    fn index(&self, position: Position) -> Result<usize, GameError> {
        if position.row >= self.size || position.col >= self.size {
            return Err(GameError::OutOfBounds {
                row: position.row,
                col: position.col,
                size: self.size,
            });
        }
        Ok(position.row * self.size + position.col)
    }

    pub fn selected_word(&self) -> Option<&Word> {
        self.selected_word.as_ref()
    }

    /// Replace the current selection, keeping each square's selected flag in sync
    pub fn set_selected_word(&mut self, word: Option<Word>) {
        for square in &mut self.squares {
            square.set_selected(false);
        }

        if let Some(word) = &word {
            for position in word.board_squares() {
                if let Ok(square) = self.square_at_mut(*position) {
                    square.set_selected(true);
                }
            }
        }

        self.selected_word = word;
    }

    pub fn set_tile(&mut self, position: Position, tile: Option<Tile>) -> Result<(), GameError> {
        self.square_at_mut(position)?.set_tile(tile);
        Ok(())
    }

    /// Take the tiles of every square in `word` off the board
    pub fn remove_tiles(&mut self, word: &Word) -> Result<Vec<Tile>, GameError> {
        let mut removed = Vec::with_capacity(word.len());
        for position in word.board_squares() {
            if let Some(tile) = self.square_at_mut(*position)?.take_tile() {
                removed.push(tile);
            }
        }
        Ok(removed)
    }

    /// Let tiles fall toward the bottom of each column.
    ///
    /// Each column is handled as a set of segments separated by disabled
    /// squares; within a segment tiles keep their relative order and the empty
    /// slots end up at the top.
    pub fn apply_gravity(&mut self) {
        for col in 0..self.size {
            let mut segment_end = self.size;
            for row in (0..=self.size).rev() {
                let at_barrier = row == 0 || !self.squares[(row - 1) * self.size + col].is_enabled();
                if !at_barrier {
                    continue;
                }
                // Enabled rows `row..segment_end` form one segment
                self.settle_segment(col, row, segment_end);
                segment_end = row.saturating_sub(1);
            }
        }
    }

    fn settle_segment(&mut self, col: usize, start: usize, end: usize) {
        if start >= end {
            return;
        }

        let tiles: Vec<Tile> = (start..end)
            .filter_map(|row| self.squares[row * self.size + col].take_tile())
            .collect();

        let first_filled = end - tiles.len();
        for (offset, tile) in tiles.into_iter().enumerate() {
            self.squares[(first_filled + offset) * self.size + col].set_tile(Some(tile));
        }
    }

    /// Give every enabled, empty square a freshly sampled tile.
    ///
    /// Returns the positions that were filled.
    pub fn fill_empty_squares(
        &mut self,
        letters: &LetterDictionary,
        rng: &mut impl Rng,
    ) -> Vec<Position> {
        let mut filled = Vec::new();
        for square in &mut self.squares {
            if square.is_enabled() && square.is_empty() {
                square.set_tile(Some(letters.random_tile(rng)));
                filled.push(square.position());
            }
        }
        filled
    }

    /// Structural consistency of the grid
    pub fn is_valid(&self) -> bool {
        if self.size == 0 || self.squares.len() != self.size * self.size {
            return false;
        }

        let consistent = self.squares.iter().enumerate().all(|(idx, square)| {
            square.position() == Position::new(idx / self.size, idx % self.size)
                && (square.is_enabled() || square.is_empty())
        });

        consistent && self.squares.iter().any(BoardSquare::is_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn board(rows: &[&str]) -> Board {
        Board::from_layout(rows, &LetterDictionary::new()).unwrap()
    }

    #[test]
    fn test_layout_roundtrip() {
        let rows = ["CA#", ".T.", "#.S"];
        assert_eq!(board(&rows).layout(), rows);
    }

    #[test]
    fn test_non_square_layout_rejected() {
        let result = Board::from_layout(&["ABC", "AB"], &LetterDictionary::new());
        assert!(matches!(result, Err(GameError::MalformedLayout(_))));
    }

    #[test]
    fn test_board_square_out_of_bounds() {
        let board = Board::new(DEFAULT_BOARD_SIZE);
        assert!(board.board_square(5, 5).is_ok());
        assert_eq!(
            board.board_square(6, 0),
            Err(GameError::OutOfBounds { row: 0, col: 6, size: 6 })
        );
        assert!(board.board_square(0, 6).is_err());
    }

    #[test]
    fn test_board_square_uses_col_row_order() {
        let board = board(&["AB", "CD"]);
        let square = board.board_square(1, 0).unwrap();
        assert_eq!(square.tile().map(Tile::letter), Some('B'));
        assert_eq!(square.row(), 0);
        assert_eq!(square.col(), 1);
    }

    #[test]
    fn test_gravity_compacts_column_preserving_order() {
        let mut single = board(&["A..", ".B.", "C.."]);
        single.set_tile(Position::new(2, 0), None).unwrap();
        single.apply_gravity();
        assert_eq!(single.layout(), vec!["...", "...", "AB."]);

        let mut stacked = board(&["X..", "Y..", "..."]);
        stacked.apply_gravity();
        assert_eq!(stacked.layout(), vec!["...", "X..", "Y.."]);
    }

    #[test]
    fn test_gravity_stops_at_disabled_square() {
        let mut blocked = board(&["A..", "#..", "..."]);
        blocked.apply_gravity();
        assert_eq!(blocked.layout(), vec!["A..", "#..", "..."]);

        let mut split = board(&["A....", ".....", "#....", "B....", "....."]);
        split.apply_gravity();
        assert_eq!(
            split.layout(),
            vec![".....", "A....", "#....", ".....", "B...."]
        );
    }

    #[test]
    fn test_gravity_leaves_no_gap_under_tiles() {
        let letters = LetterDictionary::new();
        let mut rng = StdRng::seed_from_u64(42);
        let mut board = Board::from_layout(
            &["......", "..#...", "......", "#.....", "......", "...#.."],
            &letters,
        )
        .unwrap();
        board.fill_empty_squares(&letters, &mut rng);

        // Punch holes in a fixed pattern
        for (row, col) in [(0, 0), (2, 0), (4, 1), (5, 1), (1, 3), (4, 3), (0, 5), (5, 5)] {
            board.set_tile(Position::new(row, col), None).unwrap();
        }
        board.apply_gravity();

        for col in 0..board.size() {
            for row in 0..board.size() - 1 {
                let upper = board.board_square(col, row).unwrap();
                let lower = board.board_square(col, row + 1).unwrap();
                if upper.is_enabled() && lower.is_enabled() && lower.is_empty() {
                    assert!(upper.is_empty(), "tile left floating at ({}, {})", row, col);
                }
            }
        }
    }

    #[test]
    fn test_fill_never_overwrites_and_fills_all_enabled() {
        let letters = LetterDictionary::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = board(&["Z.#", "...", "#.Q"]);

        let filled = board.fill_empty_squares(&letters, &mut rng);

        assert_eq!(filled.len(), 5);
        assert_eq!(board.board_square(0, 0).unwrap().tile().map(Tile::letter), Some('Z'));
        assert_eq!(board.board_square(2, 2).unwrap().tile().map(Tile::letter), Some('Q'));
        assert!(board
            .squares()
            .iter()
            .all(|s| s.is_enabled() != s.is_empty()));
    }

    #[test]
    fn test_fill_is_deterministic_for_seed() {
        let letters = LetterDictionary::new();
        let mut a = Board::new(DEFAULT_BOARD_SIZE);
        let mut b = Board::new(DEFAULT_BOARD_SIZE);
        a.fill_empty_squares(&letters, &mut StdRng::seed_from_u64(11));
        b.fill_empty_squares(&letters, &mut StdRng::seed_from_u64(11));
        assert_eq!(a.layout(), b.layout());
    }

    #[test]
    fn test_selection_flags_follow_selected_word() {
        let mut board = board(&["AB", "CD"]);
        let mut word = Word::new();
        assert!(word.try_push(Position::new(0, 0)));
        assert!(word.try_push(Position::new(1, 1)));

        board.set_selected_word(Some(word));
        assert!(board.board_square(0, 0).unwrap().is_selected());
        assert!(board.board_square(1, 1).unwrap().is_selected());
        assert!(!board.board_square(1, 0).unwrap().is_selected());

        board.set_selected_word(None);
        assert!(board.squares().iter().all(|s| !s.is_selected()));
        assert!(board.selected_word().is_none());
    }

    #[test]
    fn test_validity() {
        assert!(Board::new(DEFAULT_BOARD_SIZE).is_valid());
        assert!(!Board::new(0).is_valid());
        assert!(!board(&["##", "##"]).is_valid());
    }
}
