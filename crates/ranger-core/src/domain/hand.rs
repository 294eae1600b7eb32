//! Hand catalog: the 169 canonical starting hands.
//!
//! Hands are laid out on the usual 13x13 grid: rows and columns run over the
//! ranks from Ace down to Deuce, pairs sit on the diagonal, suited hands above
//! it and offsuit hands below it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Card rank, ordered from Ace (index 0) to Deuce (index 12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Ace,
    King,
    Queen,
    Jack,
    Ten,
    Nine,
    Eight,
    Seven,
    Six,
    Five,
    Four,
    Three,
    Two,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::King,
        Rank::Queen,
        Rank::Jack,
        Rank::Ten,
        Rank::Nine,
        Rank::Eight,
        Rank::Seven,
        Rank::Six,
        Rank::Five,
        Rank::Four,
        Rank::Three,
        Rank::Two,
    ];

    /// Position on the grid axis (Ace = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn symbol(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::King => 'K',
            Rank::Queen => 'Q',
            Rank::Jack => 'J',
            Rank::Ten => 'T',
            Rank::Nine => '9',
            Rank::Eight => '8',
            Rank::Seven => '7',
            Rank::Six => '6',
            Rank::Five => '5',
            Rank::Four => '4',
            Rank::Three => '3',
            Rank::Two => '2',
        }
    }

    pub fn from_symbol(c: char) -> Option<Rank> {
        Rank::ALL
            .into_iter()
            .find(|rank| rank.symbol() == c.to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandKind {
    Pair,
    Suited,
    Offsuit,
}

/// One of the 169 starting hands.
///
/// `high` is always the stronger (or equal) rank. Construct through
/// [`Hand::at`], [`Hand::all`] or parsing; every value is one of the 169.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hand {
    high: Rank,
    low: Rank,
    kind: HandKind,
}

/// Number of canonical hands.
pub const HAND_COUNT: usize = 169;

/// Number of concrete two-card combinations over all hands.
pub const COMBO_COUNT: u32 = 1326;

impl Hand {
    /// The hand at grid cell (`row`, `col`). Returns `None` outside 13x13.
    pub fn at(row: usize, col: usize) -> Option<Hand> {
        let (r1, r2) = (*Rank::ALL.get(row)?, *Rank::ALL.get(col)?);
        let hand = match row.cmp(&col) {
            std::cmp::Ordering::Equal => Hand {
                high: r1,
                low: r1,
                kind: HandKind::Pair,
            },
            std::cmp::Ordering::Less => Hand {
                high: r1,
                low: r2,
                kind: HandKind::Suited,
            },
            std::cmp::Ordering::Greater => Hand {
                high: r2,
                low: r1,
                kind: HandKind::Offsuit,
            },
        };
        Some(hand)
    }

    /// All 169 hands in canonical (row-major grid) order.
    pub fn all() -> impl Iterator<Item = Hand> {
        (0..13).flat_map(|row| (0..13).filter_map(move |col| Hand::at(row, col)))
    }

    /// (row, col) of this hand on the grid.
    pub fn grid_position(&self) -> (usize, usize) {
        match self.kind {
            HandKind::Pair | HandKind::Suited => (self.high.index(), self.low.index()),
            HandKind::Offsuit => (self.low.index(), self.high.index()),
        }
    }

    /// Index into [`Hand::all`].
    pub fn ordinal(&self) -> usize {
        let (row, col) = self.grid_position();
        row * 13 + col
    }

    pub fn high(&self) -> Rank {
        self.high
    }

    pub fn low(&self) -> Rank {
        self.low
    }

    pub fn kind(&self) -> HandKind {
        self.kind
    }

    /// Concrete card combinations this hand stands for.
    pub fn combos(&self) -> u32 {
        match self.kind {
            HandKind::Pair => 6,
            HandKind::Suited => 4,
            HandKind::Offsuit => 12,
        }
    }
}

impl PartialOrd for Hand {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hand {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.high.symbol(), self.low.symbol())?;
        match self.kind {
            HandKind::Pair => Ok(()),
            HandKind::Suited => f.write_str("s"),
            HandKind::Offsuit => f.write_str("o"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hand label '{0}'")]
pub struct ParseHandError(pub String);

impl FromStr for Hand {
    type Err = ParseHandError;

    /// Parses `AA`, `AKs`, `72o`. Rank order may be given either way round
    /// (`KAs` == `AKs`); a non-pair needs its suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseHandError(s.to_string());
        let mut chars = s.trim().chars();
        let r1 = chars.next().and_then(Rank::from_symbol).ok_or_else(err)?;
        let r2 = chars.next().and_then(Rank::from_symbol).ok_or_else(err)?;
        let suffix = chars.next();
        if chars.next().is_some() {
            return Err(err());
        }
        let (high, low) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };
        let (row, col) = match (high == low, suffix) {
            (true, None) => (high.index(), high.index()),
            (false, Some('s' | 'S')) => (high.index(), low.index()),
            (false, Some('o' | 'O')) => (low.index(), high.index()),
            _ => return Err(err()),
        };
        Hand::at(row, col).ok_or_else(err)
    }
}

impl Serialize for Hand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_169_distinct_hands() {
        let hands: Vec<Hand> = Hand::all().collect();
        assert_eq!(hands.len(), HAND_COUNT);
        let labels: HashSet<String> = hands.iter().map(|h| h.to_string()).collect();
        assert_eq!(labels.len(), HAND_COUNT);
    }

    #[test]
    fn catalog_counts_by_kind() {
        let count = |kind| Hand::all().filter(|h| h.kind() == kind).count();
        assert_eq!(count(HandKind::Pair), 13);
        assert_eq!(count(HandKind::Suited), 78);
        assert_eq!(count(HandKind::Offsuit), 78);
        assert_eq!(Hand::all().map(|h| h.combos()).sum::<u32>(), COMBO_COUNT);
    }

    #[test]
    fn canonical_order_starts_on_the_top_row() {
        let labels: Vec<String> = Hand::all().take(3).map(|h| h.to_string()).collect();
        assert_eq!(labels, vec!["AA", "AKs", "AQs"]);
        assert_eq!(Hand::all().nth(13).unwrap().to_string(), "AKo");
        assert_eq!(Hand::all().last().unwrap().to_string(), "22");
    }

    #[rstest]
    #[case::pair("AA", 0, 0)]
    #[case::suited("AKs", 0, 1)]
    #[case::offsuit("AKo", 1, 0)]
    #[case::low_offsuit("72o", 12, 7)]
    #[case::low_pair("22", 12, 12)]
    fn grid_position_matches_layout(#[case] label: &str, #[case] row: usize, #[case] col: usize) {
        let hand: Hand = label.parse().unwrap();
        assert_eq!(hand.grid_position(), (row, col));
        assert_eq!(Hand::at(row, col), Some(hand));
        assert_eq!(hand.to_string(), label);
    }

    #[rstest]
    #[case::reversed("KAs", "AKs")]
    #[case::lowercase("aks", "AKs")]
    #[case::padded(" 72o ", "72o")]
    fn parsing_normalizes(#[case] input: &str, #[case] expected: &str) {
        let hand: Hand = input.parse().unwrap();
        assert_eq!(hand.to_string(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::suited_pair("AAs")]
    #[case::missing_suffix("AK")]
    #[case::bad_rank("AXs")]
    #[case::bad_suffix("AKx")]
    #[case::too_long("AKso")]
    fn parsing_rejects_malformed(#[case] input: &str) {
        assert!(input.parse::<Hand>().is_err());
    }

    #[test]
    fn serializes_as_label() {
        let hand: Hand = "T9s".parse().unwrap();
        assert_eq!(serde_json::to_string(&hand).unwrap(), "\"T9s\"");
        let back: Hand = serde_json::from_str("\"T9s\"").unwrap();
        assert_eq!(back, hand);
    }

    #[test]
    fn out_of_grid_is_none() {
        assert_eq!(Hand::at(13, 0), None);
        assert_eq!(Hand::at(0, 13), None);
    }
}
