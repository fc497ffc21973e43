//! The progress store: the one owner of a player's [`PlayerProgress`].
//!
//! Every screen of the game reads the snapshot through
//! [`ProgressStore::progress`] and changes it only through the operations
//! below. Each operation builds the next snapshot, swaps it in, and writes it
//! to storage before returning, so the in-memory and persisted copies never
//! disagree after a call completes.
//!
//! Storage failures are logged and otherwise ignored: gameplay continues in
//! memory for the rest of the session.
//!
//! ```
//! use moneyquest_logic::rewards::ChallengeRewards;
//! use moneyquest_logic::storage::MemoryStorage;
//! use moneyquest_logic::store::ProgressStore;
//!
//! let mut store = ProgressStore::new(MemoryStorage::new());
//! store.complete_level(3, 3);
//! store.complete_challenge(1, ChallengeRewards::new(100, 5).with_badge("Smart Saver"));
//!
//! let p = store.progress();
//! assert_eq!(p.coins, 125);
//! assert_eq!(p.stars, 3);
//! assert_eq!(p.current_level, 4);
//! assert!(p.has_badge("Smart Saver"));
//! ```

use std::io::{Read, Write};

use chrono::NaiveDate;
use rand::Rng;

use crate::avatar::AvatarItem;
use crate::config::StoreConfig;
use crate::daily_bonus::{self, Prize};
use crate::persistence::{self, SaveError};
use crate::progress::{decode_record, encode_record, EquipSlot, PlayerProgress};
use crate::rewards::{level_coin_reward, ChallengeRewards, LevelOutcome};
use crate::storage::KeyValueStore;

/// Result of [`ProgressStore::buy_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchase {
    Bought,
    AlreadyOwned,
    InsufficientFunds,
}

/// Holds the current snapshot and keeps storage in step with it.
pub struct ProgressStore<S: KeyValueStore> {
    storage: S,
    config: StoreConfig,
    progress: PlayerProgress,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Open a store with the default configuration.
    pub fn new(storage: S) -> Self {
        Self::open(storage, StoreConfig::default())
    }

    /// Open a store, loading the persisted snapshot or starting fresh.
    ///
    /// A missing, unreadable, or newer-version record starts from the
    /// default snapshot. The bad record is left in place until the first
    /// mutation overwrites it.
    pub fn open(storage: S, config: StoreConfig) -> Self {
        let progress = load_snapshot(&storage, &config.storage_key);
        Self {
            storage,
            config,
            progress,
        }
    }

    /// Current snapshot.
    pub fn progress(&self) -> &PlayerProgress {
        &self.progress
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Apply `f` to a copy of the snapshot, then swap it in and persist.
    ///
    /// Nothing is written when `f` leaves the snapshot unchanged.
    fn update<T>(&mut self, f: impl FnOnce(&mut PlayerProgress) -> T) -> T {
        let mut next = self.progress.clone();
        let out = f(&mut next);
        if next != self.progress {
            self.progress = next;
            self.persist();
        }
        out
    }

    fn persist(&self) {
        let record = match encode_record(&self.progress) {
            Ok(record) => record,
            Err(e) => {
                log::error!("Failed to encode progress: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.save(&self.config.storage_key, &record) {
            log::error!(
                "Failed to persist progress under {:?}: {}",
                self.config.storage_key,
                e
            );
        }
    }

    // ========================================================================
    // CURRENCY
    // ========================================================================

    pub fn add_coins(&mut self, amount: u32) {
        log::debug!("add_coins {}", amount);
        self.update(|p| p.coins = p.coins.saturating_add(amount));
    }

    /// Deduct `amount` if the player can afford it.
    ///
    /// Returns false and leaves the balance untouched otherwise.
    #[must_use = "a failed spend leaves the balance unchanged"]
    pub fn spend_coins(&mut self, amount: u32) -> bool {
        let spent = self.update(|p| match p.coins.checked_sub(amount) {
            Some(rest) => {
                p.coins = rest;
                true
            }
            None => false,
        });
        if spent {
            log::debug!("spend_coins {}", amount);
        } else {
            log::debug!(
                "spend_coins {} refused: balance {}",
                amount,
                self.progress.coins
            );
        }
        spent
    }

    pub fn add_stars(&mut self, amount: u32) {
        log::debug!("add_stars {}", amount);
        self.update(|p| p.stars = p.stars.saturating_add(amount));
    }

    pub fn add_trust_tokens(&mut self, amount: u32) {
        log::debug!("add_trust_tokens {}", amount);
        self.update(|p| p.trust_tokens = p.trust_tokens.saturating_add(amount));
    }

    // ========================================================================
    // ACHIEVEMENTS
    // ========================================================================

    /// Grant a badge. Re-awarding an earned badge does nothing.
    pub fn award_badge(&mut self, name: &str) {
        let added = self.update(|p| p.earned_badges.insert(name.to_string()));
        if added {
            log::info!("Badge earned: {}", name);
        }
    }

    /// Mark a level complete and pay its rewards.
    ///
    /// The completion mark is idempotent. Coins (`level * 5 + 10`) and
    /// `stars_earned` are paid on every call unless
    /// [`StoreConfig::repeat_level_rewards`] is off, in which case replays
    /// pay nothing.
    pub fn complete_level(&mut self, level: u32, stars_earned: u32) -> LevelOutcome {
        let repeat_rewards = self.config.repeat_level_rewards;
        let outcome = self.update(|p| {
            let first_completion = p.completed_levels.insert(level);
            let (coins_earned, stars_earned) = if first_completion || repeat_rewards {
                (level_coin_reward(level), stars_earned)
            } else {
                (0, 0)
            };
            p.coins = p.coins.saturating_add(coins_earned);
            p.stars = p.stars.saturating_add(stars_earned);
            p.current_level = p.current_level.max(level.saturating_add(1));
            LevelOutcome {
                coins_earned,
                stars_earned,
                first_completion,
            }
        });
        log::info!(
            "Level {} complete (+{} coins, +{} stars, first={})",
            level,
            outcome.coins_earned,
            outcome.stars_earned,
            outcome.first_completion
        );
        outcome
    }

    /// Mark a challenge complete and apply its rewards.
    ///
    /// Coins and trust tokens are added on every call; the completion mark
    /// and the badge are only ever recorded once.
    pub fn complete_challenge(&mut self, challenge_id: u32, rewards: ChallengeRewards) {
        log::info!(
            "Challenge {} complete (+{} coins, +{} trust tokens, badge={:?})",
            challenge_id,
            rewards.coins,
            rewards.trust_tokens,
            rewards.badge
        );
        self.update(|p| {
            p.completed_challenges.insert(challenge_id);
            p.coins = p.coins.saturating_add(rewards.coins);
            p.trust_tokens = p.trust_tokens.saturating_add(rewards.trust_tokens);
            if let Some(badge) = rewards.badge {
                p.earned_badges.insert(badge);
            }
        });
    }

    // ========================================================================
    // AVATAR
    // ========================================================================

    /// Buy a cosmetic item.
    ///
    /// Does nothing if the item is already owned or unaffordable. The result
    /// tells which; callers that pre-check affordability may ignore it.
    pub fn buy_item(&mut self, item_id: &str, cost: u32) -> Purchase {
        let result = self.update(|p| {
            if p.owns(item_id) {
                return Purchase::AlreadyOwned;
            }
            match p.coins.checked_sub(cost) {
                Some(rest) => {
                    p.coins = rest;
                    p.owned_items.insert(item_id.to_string());
                    Purchase::Bought
                }
                None => Purchase::InsufficientFunds,
            }
        });
        log::debug!("buy_item {} for {}: {:?}", item_id, cost, result);
        result
    }

    /// Buy a catalog item at its listed price.
    pub fn purchase(&mut self, item: &AvatarItem) -> Purchase {
        self.buy_item(item.id, item.cost)
    }

    /// Wear `item_id` in `slot`, replacing whatever was there.
    ///
    /// Ownership is not checked unless
    /// [`StoreConfig::enforce_equip_ownership`] is set. Returns whether the
    /// slot now holds the item.
    pub fn equip_item(&mut self, item_id: &str, slot: EquipSlot) -> bool {
        if self.config.enforce_equip_ownership && !self.progress.owns(item_id) {
            log::warn!("Refusing to equip unowned item {} in {}", item_id, slot);
            return false;
        }
        self.update(|p| {
            p.equipped_items.set(slot, Some(item_id.to_string()));
        });
        log::debug!("equip_item {} in {}", item_id, slot);
        true
    }

    /// Wear a catalog item in its own slot.
    pub fn wear(&mut self, item: &AvatarItem) -> bool {
        self.equip_item(item.id, item.slot)
    }

    /// Empty a slot. Returns the item that was removed.
    pub fn unequip_slot(&mut self, slot: EquipSlot) -> Option<String> {
        self.update(|p| p.equipped_items.set(slot, None))
    }

    // ========================================================================
    // DAILY BONUS
    // ========================================================================

    fn last_daily_bonus(&self) -> Option<NaiveDate> {
        match self.storage.load(&self.config.daily_bonus_key) {
            Ok(Some(raw)) => {
                let date = daily_bonus::parse_claim_date(&raw);
                if date.is_none() {
                    log::warn!("Ignoring unreadable daily bonus date {:?}", raw);
                }
                date
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to read daily bonus date: {}", e);
                None
            }
        }
    }

    pub fn can_claim_daily_bonus(&self, today: NaiveDate) -> bool {
        self.last_daily_bonus() != Some(today)
    }

    /// Spin the daily wheel and pay out, at most once per `today`.
    ///
    /// The claim date is kept outside the snapshot, so
    /// [`reset_progress`](Self::reset_progress) does not grant another spin.
    pub fn claim_daily_bonus<R: Rng + ?Sized>(
        &mut self,
        today: NaiveDate,
        rng: &mut R,
    ) -> Option<Prize> {
        if !self.can_claim_daily_bonus(today) {
            log::debug!("Daily bonus already claimed for {}", today);
            return None;
        }
        let prize = daily_bonus::spin(rng);
        self.add_coins(prize.coins);
        if let Err(e) = self.storage.save(
            &self.config.daily_bonus_key,
            &daily_bonus::format_claim_date(today),
        ) {
            log::error!("Failed to record daily bonus claim: {}", e);
        }
        log::info!("Daily bonus for {}: {} coins", today, prize.coins);
        Some(prize)
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Wipe all progress back to the starting snapshot.
    pub fn reset_progress(&mut self) {
        log::info!("Resetting progress");
        self.progress = PlayerProgress::default();
        self.persist();
    }

    /// Write the current snapshot as a binary save file.
    pub fn export_to<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_progress(writer, &self.progress)
    }

    /// Replace the current snapshot with one read from a save file.
    ///
    /// `current_level` keeps the higher of the two pointers so an older save
    /// never locks levels again. On error the current snapshot is kept.
    pub fn import_from<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let mut progress = persistence::load_progress(reader)?;
        progress.current_level = progress.current_level.max(self.progress.current_level);
        log::info!("Imported progress ({} coins)", progress.coins);
        self.progress = progress;
        self.persist();
        Ok(())
    }
}

/// Load the snapshot under `key`, falling back to the default.
fn load_snapshot<S: KeyValueStore>(storage: &S, key: &str) -> PlayerProgress {
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            log::info!("No saved progress under {:?}, starting fresh", key);
            return PlayerProgress::default();
        }
        Err(e) => {
            log::warn!("Failed to read saved progress: {}; starting fresh", e);
            return PlayerProgress::default();
        }
    };
    match decode_record(&raw) {
        Ok(progress) => {
            log::info!(
                "Loaded progress: {} coins, {} stars, level {}",
                progress.coins,
                progress.stars,
                progress.current_level
            );
            progress
        }
        Err(e) => {
            log::warn!("Discarding saved progress: {}", e);
            PlayerProgress::default()
        }
    }
}
