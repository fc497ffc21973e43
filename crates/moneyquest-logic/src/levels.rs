//! The level map: ten lessons unlocked one after another.
//!
//! Level 1 is always open; every later level opens once the one before it
//! is complete.
//!
//! ```
//! use std::collections::BTreeSet;
//! use moneyquest_logic::levels::{is_unlocked, next_playable};
//!
//! let completed: BTreeSet<u32> = [1, 2].into_iter().collect();
//! assert!(is_unlocked(3, &completed));
//! assert!(!is_unlocked(4, &completed));
//! assert_eq!(next_playable(&completed), Some(3));
//! ```

use std::collections::BTreeSet;

/// Number of levels on the map.
pub const LEVEL_COUNT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub id: u32,
    pub title: &'static str,
}

const LEVELS: [LevelInfo; LEVEL_COUNT as usize] = [
    LevelInfo { id: 1, title: "Saving vs Spending" },
    LevelInfo { id: 2, title: "Needs vs Wants" },
    LevelInfo { id: 3, title: "Good vs Bad Loans" },
    LevelInfo { id: 4, title: "Avoiding Scams" },
    LevelInfo { id: 5, title: "Banking Basics" },
    LevelInfo { id: 6, title: "Investment Intro" },
    LevelInfo { id: 7, title: "Budget Planning" },
    LevelInfo { id: 8, title: "Emergency Fund" },
    LevelInfo { id: 9, title: "Credit Cards" },
    LevelInfo { id: 10, title: "Final Challenge" },
];

/// All levels in map order.
pub fn levels() -> &'static [LevelInfo] {
    &LEVELS
}

pub fn level_info(level: u32) -> Option<&'static LevelInfo> {
    LEVELS.iter().find(|l| l.id == level)
}

pub fn is_completed(level: u32, completed: &BTreeSet<u32>) -> bool {
    completed.contains(&level)
}

/// Whether `level` can be played given the completed set.
pub fn is_unlocked(level: u32, completed: &BTreeSet<u32>) -> bool {
    match level {
        1 => true,
        2..=LEVEL_COUNT => completed.contains(&(level - 1)),
        _ => false,
    }
}

/// First unlocked level not yet completed, or `None` once the map is done.
pub fn next_playable(completed: &BTreeSet<u32>) -> Option<u32> {
    (1..=LEVEL_COUNT).find(|&l| is_unlocked(l, completed) && !is_completed(l, completed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u32]) -> BTreeSet<u32> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_level_one_always_unlocked() {
        assert!(is_unlocked(1, &BTreeSet::new()));
    }

    #[test]
    fn test_unlock_requires_previous() {
        let completed = set(&[1, 3]);
        assert!(is_unlocked(2, &completed));
        assert!(!is_unlocked(3, &completed));
        assert!(is_unlocked(4, &completed));
    }

    #[test]
    fn test_out_of_range_locked() {
        let all = set(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert!(!is_unlocked(0, &all));
        assert!(!is_unlocked(11, &all));
    }

    #[test]
    fn test_next_playable() {
        assert_eq!(next_playable(&BTreeSet::new()), Some(1));
        assert_eq!(next_playable(&set(&[1, 2, 3])), Some(4));
        let all: BTreeSet<u32> = (1..=LEVEL_COUNT).collect();
        assert_eq!(next_playable(&all), None);
    }

    #[test]
    fn test_level_titles() {
        assert_eq!(levels().len(), LEVEL_COUNT as usize);
        assert_eq!(level_info(1).unwrap().title, "Saving vs Spending");
        assert_eq!(level_info(10).unwrap().title, "Final Challenge");
        assert!(level_info(0).is_none());
        for (i, l) in levels().iter().enumerate() {
            assert_eq!(l.id, i as u32 + 1);
        }
    }
}
