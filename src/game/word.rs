use serde::{Deserialize, Serialize};

use crate::{game::Board, game::Scorer, models::Position};

/// Ordered selection of board positions.
///
/// Every position is adjacent to the one before it and none repeats. Only
/// positions are stored, so the word stays meaningful while the board moves
/// tiles around.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    positions: Vec<Position>,
}

impl Word {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a word on a single square
    pub fn starting_at(position: Position) -> Self {
        Self {
            positions: vec![position],
        }
    }

    /// Append `position` if it continues a valid path.
    ///
    /// Returns false, leaving the word untouched, when the position is already
    /// part of the word or not adjacent to the last square.
    pub fn try_push(&mut self, position: Position) -> bool {
        if self.positions.contains(&position) {
            return false;
        }
        if let Some(last) = self.positions.last() {
            if !last.is_adjacent(&position) {
                return false;
            }
        }
        self.positions.push(position);
        true
    }

    pub fn board_squares(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Letters of the selected tiles in selection order.
    ///
    /// `None` if a square is off the board or has no tile.
    pub fn generate_string(&self, board: &Board) -> Option<String> {
        self.positions
            .iter()
            .map(|pos| {
                board
                    .square_at(*pos)
                    .ok()
                    .and_then(|square| square.tile())
                    .map(|tile| tile.letter())
            })
            .collect()
    }

    /// Score of the word on `board`
    pub fn calculate_score(&self, board: &Board) -> u32 {
        Scorer::calculate_score(board, &self.positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::LetterDictionary;

    fn path(cells: &[(usize, usize)]) -> Word {
        let mut word = Word::new();
        for (row, col) in cells {
            assert!(word.try_push(Position::new(*row, *col)));
        }
        word
    }

    #[test]
    fn test_rejects_non_adjacent_and_repeats() {
        let mut word = Word::starting_at(Position::new(0, 0));
        assert!(!word.try_push(Position::new(0, 2)));
        assert!(word.try_push(Position::new(1, 1)));
        assert!(!word.try_push(Position::new(0, 0)));
        assert_eq!(word.len(), 2);
    }

    #[test]
    fn test_generate_string_in_selection_order() {
        let board = Board::from_layout(&["CAT", "...", "..."], &LetterDictionary::new()).unwrap();
        let word = path(&[(0, 2), (0, 1), (0, 0)]);
        assert_eq!(word.generate_string(&board).as_deref(), Some("TAC"));
    }

    #[test]
    fn test_generate_string_fails_on_empty_square() {
        let board = Board::from_layout(&["CA.", "...", "..."], &LetterDictionary::new()).unwrap();
        let word = path(&[(0, 0), (0, 1), (0, 2)]);
        assert_eq!(word.generate_string(&board), None);
    }

    #[test]
    fn test_calculate_score() {
        let board = Board::from_layout(&["CAT", "...", "..."], &LetterDictionary::new()).unwrap();
        let word = path(&[(0, 0), (0, 1), (0, 2)]);
        // C(3) + A(1) + T(1)
        assert_eq!(word.calculate_score(&board), 5);
    }
}
