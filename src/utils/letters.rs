use std::collections::HashMap;

use once_cell::sync::Lazy;
use rand::Rng;

use crate::models::Tile;

/// Letter values similar to Scrabble scoring
pub static LETTER_VALUES: Lazy<HashMap<char, u32>> = Lazy::new(|| {
    let mut map = HashMap::new();

    // 1 point letters
    for ch in ['A', 'E', 'I', 'O', 'U', 'L', 'N', 'R', 'S', 'T'] {
        map.insert(ch, 1);
    }

    // 2 points
    for ch in ['D', 'G'] {
        map.insert(ch, 2);
    }

    // 3 points
    for ch in ['B', 'C', 'M', 'P'] {
        map.insert(ch, 3);
    }

    // 4 points
    for ch in ['F', 'H', 'V', 'W', 'Y'] {
        map.insert(ch, 4);
    }

    // 5 points
    map.insert('K', 5);

    // 8 points
    for ch in ['J', 'X'] {
        map.insert(ch, 8);
    }

    // 10 points
    for ch in ['Q', 'Z'] {
        map.insert(ch, 10);
    }

    map
});

/// Letter frequency distribution for English (approximate)
pub static LETTER_DISTRIBUTION: Lazy<Vec<(char, f32)>> = Lazy::new(|| {
    vec![
        ('E', 12.70),
        ('T', 9.05),
        ('A', 8.16),
        ('O', 7.50),
        ('I', 6.96),
        ('N', 6.74),
        ('S', 6.32),
        ('H', 6.09),
        ('R', 5.98),
        ('D', 4.25),
        ('L', 4.02),
        ('C', 2.78),
        ('U', 2.75),
        ('M', 2.40),
        ('W', 2.36),
        ('F', 2.22),
        ('G', 2.01),
        ('Y', 1.97),
        ('P', 1.92),
        ('B', 1.49),
        ('V', 0.97),
        ('K', 0.77),
        ('J', 0.15),
        ('X', 0.15),
        ('Q', 0.09),
        ('Z', 0.07),
    ]
});

/// Weighted letter source shared by the initial board fill and every refill,
/// so tile density stays the same for the whole level.
#[derive(Debug, Clone)]
pub struct LetterDictionary {
    cumulative: Vec<(char, f32)>,
    total: f32,
}

impl LetterDictionary {
    pub fn new() -> Self {
        let mut running = 0.0;
        let cumulative: Vec<(char, f32)> = LETTER_DISTRIBUTION
            .iter()
            .map(|(ch, freq)| {
                running += freq;
                (*ch, running)
            })
            .collect();

        Self {
            total: running,
            cumulative,
        }
    }

    /// Get the point value for a letter
    pub fn score(&self, letter: char) -> u32 {
        let upper = letter.to_ascii_uppercase();
        *LETTER_VALUES.get(&upper).unwrap_or(&1)
    }

    /// Sample a letter from the frequency table
    pub fn random_letter(&self, rng: &mut impl Rng) -> char {
        let random_value = rng.random::<f32>() * self.total;

        for (letter, cumulative) in &self.cumulative {
            if random_value <= *cumulative {
                return *letter;
            }
        }

        'E' // Fallback
    }

    /// Build a tile for `letter` carrying its score.
    pub fn tile(&self, letter: char) -> Tile {
        let letter = letter.to_ascii_uppercase();
        Tile::new(letter, self.score(letter))
    }

    pub fn random_tile(&self, rng: &mut impl Rng) -> Tile {
        let letter = self.random_letter(rng);
        self.tile(letter)
    }
}

impl Default for LetterDictionary {
    fn default() -> Self {
        Self::new()
    }
}
