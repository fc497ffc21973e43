//! Reward rules for levels and challenges.

use serde::{Deserialize, Serialize};

/// Badge granted for a strong challenge score.
pub const SMART_SAVER_BADGE: &str = "Smart Saver";

/// Minimum challenge score that earns [`SMART_SAVER_BADGE`].
pub const SMART_SAVER_THRESHOLD: u32 = 80;

/// Coins paid for completing a level: `level * 5 + 10`.
pub fn level_coin_reward(level: u32) -> u32 {
    level.saturating_mul(5).saturating_add(10)
}

/// What a single level completion paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOutcome {
    pub coins_earned: u32,
    pub stars_earned: u32,
    /// False when the level was already marked complete.
    pub first_completion: bool,
}

/// Rewards handed to the store when a challenge ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRewards {
    pub coins: u32,
    pub trust_tokens: u32,
    pub badge: Option<String>,
}

impl ChallengeRewards {
    pub fn new(coins: u32, trust_tokens: u32) -> Self {
        Self {
            coins,
            trust_tokens,
            badge: None,
        }
    }

    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = Some(badge.into());
        self
    }

    /// Convert a final challenge score into rewards.
    ///
    /// Two coins per point, one trust token per ten points, and the
    /// Smart Saver badge at 80 or above.
    ///
    /// ```
    /// use moneyquest_logic::rewards::ChallengeRewards;
    ///
    /// let r = ChallengeRewards::from_score(85);
    /// assert_eq!(r.coins, 170);
    /// assert_eq!(r.trust_tokens, 8);
    /// assert_eq!(r.badge.as_deref(), Some("Smart Saver"));
    /// ```
    pub fn from_score(score: u32) -> Self {
        let rewards = Self::new(score.saturating_mul(2), score / 10);
        if score >= SMART_SAVER_THRESHOLD {
            rewards.with_badge(SMART_SAVER_BADGE)
        } else {
            rewards
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_coin_reward() {
        assert_eq!(level_coin_reward(1), 15);
        assert_eq!(level_coin_reward(3), 25);
        assert_eq!(level_coin_reward(10), 60);
    }

    #[test]
    fn test_level_coin_reward_saturates() {
        assert_eq!(level_coin_reward(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_from_score_below_threshold() {
        let r = ChallengeRewards::from_score(79);
        assert_eq!(r.coins, 158);
        assert_eq!(r.trust_tokens, 7);
        assert_eq!(r.badge, None);
    }

    #[test]
    fn test_from_score_zero() {
        assert_eq!(ChallengeRewards::from_score(0), ChallengeRewards::default());
    }

    #[test]
    fn test_from_score_at_threshold() {
        let r = ChallengeRewards::from_score(SMART_SAVER_THRESHOLD);
        assert_eq!(r.badge.as_deref(), Some(SMART_SAVER_BADGE));
    }
}
