//! The player progress snapshot and its persisted record format.
//!
//! [`PlayerProgress`] is the whole accumulated state of one player: coins,
//! stars, trust tokens, completion marks, badges, and avatar cosmetics.
//! It is persisted as one JSON record with camelCase field names and a
//! `version` field.
//!
//! # Record versions
//!
//! | Version | Shape |
//! |---------|-------|
//! | 1 | Browser build: no `version`, no challenge or badge fields |
//! | 2 | Adds `version`, `trustTokens`, `completedChallenges`, `earnedBadges` |
//!
//! Missing fields take their zero value, so a version 1 record loads as-is.
//!
//! ```
//! use moneyquest_logic::progress::{decode_record, PlayerProgress};
//!
//! let legacy = r#"{"coins": 40, "stars": 6, "completedLevels": [1, 2], "currentLevel": 3}"#;
//! let progress = decode_record(legacy).unwrap();
//! assert_eq!(progress.coins, 40);
//! assert_eq!(progress.trust_tokens, 0);
//! assert_eq!(progress.current_level, 3);
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current record version written by [`encode_record`].
pub const PROGRESS_VERSION: u32 = 2;

/// Records written before versioning was introduced.
const LEGACY_VERSION: u32 = 1;

/// Avatar slot a cosmetic item is worn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipSlot {
    Hat,
    Shirt,
    Accessory,
}

impl EquipSlot {
    /// All slots in display order.
    pub const ALL: [EquipSlot; 3] = [EquipSlot::Hat, EquipSlot::Shirt, EquipSlot::Accessory];

    pub fn as_str(self) -> &'static str {
        match self {
            EquipSlot::Hat => "hat",
            EquipSlot::Shirt => "shirt",
            EquipSlot::Accessory => "accessory",
        }
    }
}

impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slot name that is not one of `hat`, `shirt`, `accessory`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown equip slot: {0:?}")]
pub struct UnknownSlot(pub String);

impl FromStr for EquipSlot {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hat" => Ok(EquipSlot::Hat),
            "shirt" => Ok(EquipSlot::Shirt),
            "accessory" => Ok(EquipSlot::Accessory),
            other => Err(UnknownSlot(other.to_string())),
        }
    }
}

/// Currently worn cosmetics, one optional item per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquippedItems {
    pub hat: Option<String>,
    pub shirt: Option<String>,
    pub accessory: Option<String>,
}

impl EquippedItems {
    /// Item worn in a slot, if any.
    pub fn get(&self, slot: EquipSlot) -> Option<&str> {
        match slot {
            EquipSlot::Hat => self.hat.as_deref(),
            EquipSlot::Shirt => self.shirt.as_deref(),
            EquipSlot::Accessory => self.accessory.as_deref(),
        }
    }

    /// Replace the item in a slot, returning the previous one.
    pub fn set(&mut self, slot: EquipSlot, item: Option<String>) -> Option<String> {
        let entry = match slot {
            EquipSlot::Hat => &mut self.hat,
            EquipSlot::Shirt => &mut self.shirt,
            EquipSlot::Accessory => &mut self.accessory,
        };
        std::mem::replace(entry, item)
    }

    /// Occupied slots with their items.
    pub fn iter(&self) -> impl Iterator<Item = (EquipSlot, &str)> + '_ {
        EquipSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|item| (slot, item)))
    }

    /// True if `item_id` is worn in any slot.
    pub fn contains(&self, item_id: &str) -> bool {
        self.iter().any(|(_, item)| item == item_id)
    }
}

/// Complete accumulated state of one player.
///
/// The collection fields are ordered sets, so duplicates cannot exist even
/// when a persisted record carried them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProgress {
    /// Spendable currency.
    pub coins: u32,
    /// Cumulative skill rating, never spent.
    pub stars: u32,
    /// Secondary currency earned from challenges.
    pub trust_tokens: u32,
    /// Legacy per-level completion marks.
    pub completed_levels: BTreeSet<u32>,
    /// Per-challenge completion marks.
    pub completed_challenges: BTreeSet<u32>,
    pub earned_badges: BTreeSet<String>,
    /// Highest unlocked level (starts at 1, never decreases).
    pub current_level: u32,
    pub owned_items: BTreeSet<String>,
    pub equipped_items: EquippedItems,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            coins: 0,
            stars: 0,
            trust_tokens: 0,
            completed_levels: BTreeSet::new(),
            completed_challenges: BTreeSet::new(),
            earned_badges: BTreeSet::new(),
            current_level: 1,
            owned_items: BTreeSet::new(),
            equipped_items: EquippedItems::default(),
        }
    }
}

impl PlayerProgress {
    pub fn has_completed_level(&self, level: u32) -> bool {
        self.completed_levels.contains(&level)
    }

    pub fn has_completed_challenge(&self, challenge_id: u32) -> bool {
        self.completed_challenges.contains(&challenge_id)
    }

    pub fn has_badge(&self, name: &str) -> bool {
        self.earned_badges.contains(name)
    }

    pub fn owns(&self, item_id: &str) -> bool {
        self.owned_items.contains(item_id)
    }

    /// Completion marks the level map should display.
    ///
    /// Challenge marks win once any exist; older saves only carry level
    /// marks, so those are used until the first challenge is completed.
    pub fn completed_units(&self) -> &BTreeSet<u32> {
        if self.completed_challenges.is_empty() {
            &self.completed_levels
        } else {
            &self.completed_challenges
        }
    }

    /// Equipped items that are not in `owned_items`.
    pub fn unowned_equipped(&self) -> Vec<(EquipSlot, &str)> {
        self.equipped_items
            .iter()
            .filter(|(_, item)| !self.owns(item))
            .collect()
    }

    /// Bring a freshly decoded snapshot back inside its invariants.
    fn normalize(mut self) -> Self {
        if self.current_level == 0 {
            self.current_level = 1;
        }
        self
    }
}

/// Errors decoding a persisted progress record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed progress record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("progress record version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

fn legacy_version() -> u32 {
    LEGACY_VERSION
}

#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default = "legacy_version")]
    version: u32,
    #[serde(flatten)]
    progress: PlayerProgress,
}

#[derive(Serialize)]
struct StoredRecordRef<'a> {
    version: u32,
    #[serde(flatten)]
    progress: &'a PlayerProgress,
}

/// Serialize a snapshot as the current record version.
pub fn encode_record(progress: &PlayerProgress) -> Result<String, serde_json::Error> {
    serde_json::to_string(&StoredRecordRef {
        version: PROGRESS_VERSION,
        progress,
    })
}

/// Parse a persisted record, upgrading older versions.
pub fn decode_record(json: &str) -> Result<PlayerProgress, RecordError> {
    let record: StoredRecord = serde_json::from_str(json)?;
    if record.version > PROGRESS_VERSION {
        return Err(RecordError::UnsupportedVersion {
            found: record.version,
            supported: PROGRESS_VERSION,
        });
    }
    Ok(record.progress.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_snapshot() {
        let p = PlayerProgress::default();
        assert_eq!(p.coins, 0);
        assert_eq!(p.stars, 0);
        assert_eq!(p.trust_tokens, 0);
        assert_eq!(p.current_level, 1);
        assert!(p.completed_levels.is_empty());
        assert!(p.completed_challenges.is_empty());
        assert!(p.earned_badges.is_empty());
        assert!(p.owned_items.is_empty());
        assert_eq!(p.equipped_items, EquippedItems::default());
    }

    #[test]
    fn test_record_roundtrip() {
        let mut p = PlayerProgress::default();
        p.coins = 55;
        p.trust_tokens = 3;
        p.completed_levels.insert(2);
        p.earned_badges.insert("Smart Saver".into());
        p.owned_items.insert("hat_2".into());
        p.equipped_items.hat = Some("hat_2".into());

        let json = encode_record(&p).unwrap();
        assert_eq!(decode_record(&json).unwrap(), p);
    }

    #[test]
    fn test_record_is_camel_case_and_versioned() {
        let json = encode_record(&PlayerProgress::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], PROGRESS_VERSION);
        assert_eq!(value["currentLevel"], 1);
        assert!(value.get("trustTokens").is_some());
        assert!(value.get("equippedItems").is_some());
    }

    #[test]
    fn test_legacy_record_defaults_missing_fields() {
        let json = r#"{
            "coins": 35,
            "stars": 3,
            "completedLevels": [1],
            "currentLevel": 2,
            "ownedItems": ["hat_2"],
            "equippedItems": {"hat": "hat_2"}
        }"#;
        let p = decode_record(json).unwrap();
        assert_eq!(p.coins, 35);
        assert_eq!(p.trust_tokens, 0);
        assert!(p.completed_challenges.is_empty());
        assert!(p.earned_badges.is_empty());
        assert_eq!(p.equipped_items.get(EquipSlot::Hat), Some("hat_2"));
        assert_eq!(p.equipped_items.get(EquipSlot::Shirt), None);
    }

    #[test]
    fn test_duplicates_collapse_on_load() {
        let json = r#"{"completedLevels": [1, 1, 2], "ownedItems": ["acc_1", "acc_1"]}"#;
        let p = decode_record(json).unwrap();
        assert_eq!(p.completed_levels.len(), 2);
        assert_eq!(p.owned_items.len(), 1);
    }

    #[test]
    fn test_zero_current_level_normalized() {
        let p = decode_record(r#"{"currentLevel": 0}"#).unwrap();
        assert_eq!(p.current_level, 1);
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = decode_record(r#"{"version": 99, "coins": 10}"#).unwrap_err();
        assert!(matches!(
            err,
            RecordError::UnsupportedVersion { found: 99, .. }
        ));
    }

    #[test]
    fn test_negative_coins_is_malformed() {
        assert!(matches!(
            decode_record(r#"{"coins": -5}"#),
            Err(RecordError::Json(_))
        ));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let p = decode_record(r#"{"coins": 7, "theme": "dark"}"#).unwrap();
        assert_eq!(p.coins, 7);
    }

    #[test]
    fn test_slot_parse() {
        assert_eq!("hat".parse::<EquipSlot>().unwrap(), EquipSlot::Hat);
        assert_eq!("accessory".parse::<EquipSlot>().unwrap(), EquipSlot::Accessory);
        assert_eq!(
            "shoes".parse::<EquipSlot>().unwrap_err(),
            UnknownSlot("shoes".into())
        );
        for slot in EquipSlot::ALL {
            assert_eq!(slot.as_str().parse::<EquipSlot>().unwrap(), slot);
        }
    }

    #[test]
    fn test_completed_units_prefers_challenges() {
        let mut p = PlayerProgress::default();
        p.completed_levels.extend([1, 2, 3]);
        assert_eq!(p.completed_units(), &p.completed_levels);
        p.completed_challenges.insert(1);
        assert_eq!(p.completed_units().len(), 1);
    }

    #[test]
    fn test_unowned_equipped() {
        let mut p = PlayerProgress::default();
        p.owned_items.insert("hat_1".into());
        p.equipped_items.hat = Some("hat_1".into());
        p.equipped_items.shirt = Some("shirt_3".into());
        assert_eq!(p.unowned_equipped(), vec![(EquipSlot::Shirt, "shirt_3")]);
    }
}
