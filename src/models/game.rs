use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Check if two positions are adjacent (including diagonals)
    pub fn is_adjacent(&self, other: &Position) -> bool {
        let row_diff = self.row.abs_diff(other.row);
        let col_diff = self.col.abs_diff(other.col);

        row_diff <= 1 && col_diff <= 1 && (row_diff + col_diff > 0)
    }
}

/// A letter on the board together with its point value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    letter: char,
    points: u32,
}

impl Tile {
    pub fn new(letter: char, points: u32) -> Self {
        Self { letter, points }
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn points(&self) -> u32 {
        self.points
    }
}

/// One cell of the board.
///
/// A disabled square is a permanent hole: it never holds a tile and cannot be
/// selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSquare {
    position: Position,
    enabled: bool,
    selected: bool,
    tile: Option<Tile>,
}

impl BoardSquare {
    pub fn new(position: Position, enabled: bool) -> Self {
        Self {
            position,
            enabled,
            selected: false,
            tile: None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn row(&self) -> usize {
        self.position.row
    }

    pub fn col(&self) -> usize {
        self.position.col
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn tile(&self) -> Option<&Tile> {
        self.tile.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
    }

    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Place a tile, ignored on disabled squares
    pub(crate) fn set_tile(&mut self, tile: Option<Tile>) {
        if self.enabled {
            self.tile = tile;
        }
    }

    pub(crate) fn take_tile(&mut self) -> Option<Tile> {
        self.tile.take()
    }
}

/// A score threshold; obtained once the score reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Star {
    pub threshold: u32,
}

impl Star {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn is_obtained(&self, score: u32) -> bool {
        score >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacent_positions() {
        let pos1 = Position { row: 0, col: 0 };
        let pos2 = Position { row: 0, col: 1 };
        let pos3 = Position { row: 1, col: 1 };
        let pos4 = Position { row: 2, col: 2 };

        assert!(pos1.is_adjacent(&pos2));
        assert!(pos2.is_adjacent(&pos3));
        assert!(pos1.is_adjacent(&pos3));
        assert!(!pos1.is_adjacent(&pos4));
        assert!(!pos1.is_adjacent(&pos1));
    }

    #[test]
    fn test_disabled_square_rejects_tiles() {
        let mut square = BoardSquare::new(Position::new(0, 0), false);
        square.set_tile(Some(Tile::new('A', 1)));
        assert!(square.is_empty());
    }

    #[test]
    fn test_star_threshold_inclusive() {
        let star = Star::new(10);
        assert!(!star.is_obtained(9));
        assert!(star.is_obtained(10));
        assert!(star.is_obtained(11));
    }
}
