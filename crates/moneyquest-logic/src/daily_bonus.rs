//! Daily bonus prize wheel.
//!
//! Once per calendar day the player may spin for coins. Prizes are drawn
//! with probability proportional to their weight; the big prizes are rare.
//! The claim bookkeeping lives in
//! [`ProgressStore::claim_daily_bonus`](crate::store::ProgressStore::claim_daily_bonus).

use chrono::NaiveDate;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prize {
    pub coins: u32,
    pub weight: u32,
}

/// Wheel segments in display order.
pub const PRIZES: [Prize; 6] = [
    Prize { coins: 5, weight: 30 },
    Prize { coins: 10, weight: 25 },
    Prize { coins: 15, weight: 20 },
    Prize { coins: 25, weight: 15 },
    Prize { coins: 50, weight: 8 },
    Prize { coins: 100, weight: 2 },
];

const CLAIM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Dates written by the browser build (`Date.toDateString()`).
const LEGACY_CLAIM_DATE_FORMAT: &str = "%a %b %d %Y";

pub fn total_weight() -> u32 {
    PRIZES.iter().map(|p| p.weight).sum()
}

/// Map a roll in `0..total_weight()` to its segment.
fn prize_for_roll(mut roll: u32) -> Prize {
    for prize in PRIZES {
        if roll < prize.weight {
            return prize;
        }
        roll -= prize.weight;
    }
    PRIZES[PRIZES.len() - 1]
}

/// Spin the wheel once.
pub fn spin<R: Rng + ?Sized>(rng: &mut R) -> Prize {
    prize_for_roll(rng.gen_range(0..total_weight()))
}

pub fn format_claim_date(date: NaiveDate) -> String {
    date.format(CLAIM_DATE_FORMAT).to_string()
}

/// Parse a stored claim date in either the current or the legacy format.
pub fn parse_claim_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, CLAIM_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, LEGACY_CLAIM_DATE_FORMAT))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_total_weight() {
        assert_eq!(total_weight(), 100);
    }

    #[test]
    fn test_roll_boundaries() {
        assert_eq!(prize_for_roll(0).coins, 5);
        assert_eq!(prize_for_roll(29).coins, 5);
        assert_eq!(prize_for_roll(30).coins, 10);
        assert_eq!(prize_for_roll(97).coins, 50);
        assert_eq!(prize_for_roll(98).coins, 100);
        assert_eq!(prize_for_roll(99).coins, 100);
    }

    #[test]
    fn test_spin_distribution() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut small = 0;
        let mut jackpot = 0;
        let spins = 10_000;
        for _ in 0..spins {
            match spin(&mut rng).coins {
                5 => small += 1,
                100 => jackpot += 1,
                _ => {}
            }
        }
        // 30% and 2% expected
        assert!((2_500..3_500).contains(&small), "small = {}", small);
        assert!((50..400).contains(&jackpot), "jackpot = {}", jackpot);
    }

    #[test]
    fn test_spin_only_yields_listed_prizes() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let p = spin(&mut rng);
            assert!(PRIZES.contains(&p));
        }
    }

    #[test]
    fn test_claim_date_formats() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(format_claim_date(date), "2026-10-18");
        assert_eq!(parse_claim_date("2026-10-18"), Some(date));
        assert_eq!(parse_claim_date("Sun Oct 18 2026"), Some(date));
        assert_eq!(parse_claim_date("yesterday"), None);
    }
}
