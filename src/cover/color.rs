//! Colors of secondary items and their compact wire spelling

use crate::error::ModelError;
use crate::nurikabe::IslandId;

/// Symbols used for island codes and for level digits
pub const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The value a row assigns to a secondary item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    /// `0`: empty, unowned, not in the tree, flag clear
    Off,
    /// `1`: filled, flag set
    On,
    /// A tree depth or sea level
    Level(usize),
    /// The island owning a cell
    Island(IslandId),
}

/// Single-character code of an island
pub fn island_code(id: IslandId) -> char {
    char::from(ALPHABET[id % ALPHABET.len()])
}

/// Fixed-width base-52 spellings of the levels `0..=limit`, built once.
///
/// Level zero spells as `a` (or `aa`, ...), so a level never collides with
/// the `0`/`1` colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    limit: usize,
    width: usize,
    codes: Vec<String>,
}

impl Palette {
    pub fn new(limit: usize) -> Self {
        let radix = ALPHABET.len();
        let mut width = 1;
        let mut capacity = radix;
        while capacity <= limit {
            width += 1;
            capacity *= radix;
        }

        let codes = (0..=limit)
            .map(|level| {
                let mut digits = vec![ALPHABET[0]; width];
                let mut rest = level;
                for digit in digits.iter_mut().rev() {
                    *digit = ALPHABET[rest % radix];
                    rest /= radix;
                }
                digits.into_iter().map(char::from).collect()
            })
            .collect();

        Self { limit, width, codes }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn code(&self, level: usize) -> Result<&str, ModelError> {
        self.codes
            .get(level)
            .map(String::as_str)
            .ok_or(ModelError::LevelOutOfRange { level, limit: self.limit })
    }
}
