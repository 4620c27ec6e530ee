use crate::{
    game::Board,
    models::{Position, Star},
};

/// Words of this length or longer earn the flat bonus
pub const LONG_WORD_LENGTH: usize = 6;
/// Flat bonus for long words
pub const LONG_WORD_BONUS: u32 = 10;

pub struct Scorer;

impl Scorer {
    /// Calculate the score for a word given its positions on the board.
    ///
    /// Scoring rules:
    /// - Each tile contributes its letter value
    /// - +10 flat bonus for words with 6 or more letters
    /// - Positions without a tile contribute nothing
    pub fn calculate_score(board: &Board, positions: &[Position]) -> u32 {
        let letter_total: u32 = positions
            .iter()
            .filter_map(|pos| board.square_at(*pos).ok())
            .filter_map(|square| square.tile())
            .map(|tile| tile.points())
            .sum();

        letter_total + Self::length_bonus(positions.len())
    }

    /// Number of stars reached by `score`, each star checked on its own
    pub fn star_count(stars: &[Star], score: u32) -> usize {
        stars.iter().filter(|star| star.is_obtained(score)).count()
    }

    /// Calculate bonus points based on word length
    fn length_bonus(length: usize) -> u32 {
        if length >= LONG_WORD_LENGTH {
            LONG_WORD_BONUS
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::LetterDictionary;

    #[test]
    fn test_length_bonus() {
        assert_eq!(Scorer::length_bonus(3), 0);
        assert_eq!(Scorer::length_bonus(5), 0);
        assert_eq!(Scorer::length_bonus(6), 10);
        assert_eq!(Scorer::length_bonus(8), 10);
    }

    #[test]
    fn test_basic_score_calculation() {
        let board = Board::from_layout(&["HE", ".."], &LetterDictionary::new()).unwrap();
        let positions = vec![Position::new(0, 0), Position::new(0, 1)];

        // H(4) + E(1), no length bonus for 2 letters
        assert_eq!(Scorer::calculate_score(&board, &positions), 5);
    }

    #[test]
    fn test_long_word_bonus() {
        let board = Board::from_layout(
            &["SPELLS", "......", "......", "......", "......", "......"],
            &LetterDictionary::new(),
        )
        .unwrap();
        let positions: Vec<Position> = (0..6).map(|col| Position::new(0, col)).collect();

        // S(1) + P(3) + E(1) + L(1) + L(1) + S(1) = 8, plus 10 for six letters
        assert_eq!(Scorer::calculate_score(&board, &positions), 18);
    }

    #[test]
    fn test_star_count() {
        let stars = [Star::new(10), Star::new(50), Star::new(100)];
        assert_eq!(Scorer::star_count(&stars, 0), 0);
        assert_eq!(Scorer::star_count(&stars, 10), 1);
        assert_eq!(Scorer::star_count(&stars, 60), 2);
        assert_eq!(Scorer::star_count(&stars, 100), 3);
    }
}
