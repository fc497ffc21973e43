//! Progress and reward bookkeeping for Money Quest.
//!
//! This crate holds everything about a player's progress that is
//! independent of the UI: the persisted snapshot, the store that mutates it,
//! and the reward, level, shop, and daily bonus rules that feed it. Screens
//! own a [`store::ProgressStore`] (or borrow one) and call its operations;
//! nothing here is global.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`avatar`] | Cosmetic shop catalog (9 items, 3 slots) |
//! | [`config`] | Store configuration and its JSON loader |
//! | [`daily_bonus`] | Weighted once-a-day prize wheel |
//! | [`levels`] | Level titles and unlock chain |
//! | [`persistence`] | Versioned binary save files (bincode) |
//! | [`progress`] | [`PlayerProgress`](progress::PlayerProgress) snapshot and JSON record versions |
//! | [`rewards`] | Level coin formula, challenge score rewards |
//! | [`storage`] | Key-value persistence trait, memory and file backends |
//! | [`store`] | The progress store and all mutation operations |

pub mod avatar;
pub mod config;
pub mod daily_bonus;
pub mod levels;
pub mod persistence;
pub mod progress;
pub mod rewards;
pub mod storage;
pub mod store;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::config::StoreConfig;
    pub use crate::progress::{EquipSlot, PlayerProgress};
    pub use crate::rewards::ChallengeRewards;
    pub use crate::storage::{FileStorage, KeyValueStore, MemoryStorage};
    pub use crate::store::{ProgressStore, Purchase};
}
