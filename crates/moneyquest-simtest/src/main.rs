//! Money Quest Headless Session Harness
//!
//! Drives the progress store through scripted play sessions without any UI
//! and checks the bookkeeping after each step.
//!
//! Usage:
//!   cargo run -p moneyquest-simtest
//!   cargo run -p moneyquest-simtest -- --verbose
//!   cargo run -p moneyquest-simtest -- --storage ./storage.json --config ./moneyquest.json

use std::path::PathBuf;

use chrono::NaiveDate;
use moneyquest_logic::avatar::{catalog, find_item};
use moneyquest_logic::daily_bonus::{self, PRIZES};
use moneyquest_logic::levels::{self, LEVEL_COUNT};
use moneyquest_logic::prelude::*;
use moneyquest_logic::rewards::{level_coin_reward, SMART_SAVER_BADGE};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Options ─────────────────────────────────────────────────────────────

struct HarnessOptions {
    verbose: bool,
    storage_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    seed: u64,
}

impl HarnessOptions {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut opts = Self {
            verbose: false,
            storage_path: None,
            config_path: None,
            seed: 42,
        };
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--verbose" | "-v" => {
                    opts.verbose = true;
                    i += 1;
                }
                "--storage" | "-s" if i + 1 < args.len() => {
                    opts.storage_path = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                }
                "--config" | "-c" if i + 1 < args.len() => {
                    opts.config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                }
                "--seed" if i + 1 < args.len() => {
                    opts.seed = args[i + 1].parse().unwrap_or(opts.seed);
                    i += 2;
                }
                _ => i += 1,
            }
        }
        opts
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

fn main() {
    let opts = HarnessOptions::from_args();
    println!("=== Money Quest Session Harness ===\n");

    let config = match &opts.config_path {
        Some(path) => match StoreConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Cannot load config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => StoreConfig::default(),
    };

    let mut results = Vec::new();

    // 1. Currency rules
    results.extend(validate_currency(&config, opts.verbose));

    // 2. Level map and completion rewards
    results.extend(validate_levels(&config, opts.verbose));

    // 3. Challenge rewards and badges
    results.extend(validate_challenges(&config, opts.verbose));

    // 4. Avatar shop
    results.extend(validate_shop(&config, opts.verbose));

    // 5. Daily bonus wheel
    results.extend(validate_daily_bonus(&config, opts.seed, opts.verbose));

    // 6. Persistence across restart
    results.extend(validate_restart(&config, opts.storage_path.as_ref(), opts.verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn memory_store(config: &StoreConfig) -> ProgressStore<MemoryStorage> {
    ProgressStore::open(MemoryStorage::new(), config.clone())
}

// ── 1. Currency ─────────────────────────────────────────────────────────

fn validate_currency(config: &StoreConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Currency ---");
    let mut results = Vec::new();
    let mut store = memory_store(config);

    store.add_coins(40);
    results.push(check(
        "add_coins",
        store.progress().coins == 40,
        format!("balance {}", store.progress().coins),
    ));

    let refused = !store.spend_coins(41);
    results.push(check(
        "overspend_refused",
        refused && store.progress().coins == 40,
        format!("balance after refused spend {}", store.progress().coins),
    ));

    let spent = store.spend_coins(40);
    results.push(check(
        "exact_spend",
        spent && store.progress().coins == 0,
        format!("balance after exact spend {}", store.progress().coins),
    ));

    store.add_stars(3);
    store.add_trust_tokens(2);
    results.push(check(
        "stars_and_tokens",
        store.progress().stars == 3 && store.progress().trust_tokens == 2,
        format!(
            "stars {}, trust tokens {}",
            store.progress().stars,
            store.progress().trust_tokens
        ),
    ));

    if verbose {
        println!("  {:?}", store.progress());
    }
    results
}

// ── 2. Levels ───────────────────────────────────────────────────────────

fn validate_levels(config: &StoreConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Levels ---");
    let mut results = Vec::new();
    let mut store = memory_store(config);

    let mut expected_coins = 0u32;
    let mut locked_violation = None;
    while let Some(level) = levels::next_playable(store.progress().completed_units()) {
        if !levels::is_unlocked(level, store.progress().completed_units()) {
            locked_violation = Some(level);
            break;
        }
        let outcome = store.complete_level(level, 3);
        expected_coins += outcome.coins_earned;
        if verbose {
            let title = levels::level_info(level).map_or("?", |l| l.title);
            println!(
                "  level {:>2} {:<20} +{} coins",
                level, title, outcome.coins_earned
            );
        }
    }
    results.push(check(
        "map_completes_in_order",
        locked_violation.is_none() && store.progress().completed_levels.len() == LEVEL_COUNT as usize,
        format!(
            "{} levels completed, locked violation {:?}",
            store.progress().completed_levels.len(),
            locked_violation
        ),
    ));

    let formula_total: u32 = (1..=LEVEL_COUNT).map(level_coin_reward).sum();
    results.push(check(
        "level_coin_formula",
        expected_coins == formula_total && store.progress().coins == formula_total,
        format!("paid {}, formula {}", store.progress().coins, formula_total),
    ));

    results.push(check(
        "current_level_pointer",
        store.progress().current_level == LEVEL_COUNT + 1,
        format!("current level {}", store.progress().current_level),
    ));

    let before = store.progress().coins;
    let replay = store.complete_level(1, 3);
    let replay_ok = if config.repeat_level_rewards {
        store.progress().coins == before + level_coin_reward(1)
    } else {
        store.progress().coins == before
    };
    results.push(check(
        "replay_rewards_policy",
        replay_ok && !replay.first_completion,
        format!(
            "repeat rewards {}, replay paid {}",
            config.repeat_level_rewards, replay.coins_earned
        ),
    ));

    results
}

// ── 3. Challenges ───────────────────────────────────────────────────────

fn validate_challenges(config: &StoreConfig, _verbose: bool) -> Vec<TestResult> {
    println!("--- Challenges ---");
    let mut results = Vec::new();
    let mut store = memory_store(config);

    store.complete_challenge(1, ChallengeRewards::new(100, 5).with_badge(SMART_SAVER_BADGE));
    let p = store.progress();
    results.push(check(
        "challenge_rewards",
        p.coins == 100
            && p.trust_tokens == 5
            && p.has_completed_challenge(1)
            && p.has_badge(SMART_SAVER_BADGE),
        format!(
            "coins {}, tokens {}, badges {:?}",
            p.coins, p.trust_tokens, p.earned_badges
        ),
    ));

    store.complete_challenge(1, ChallengeRewards::from_score(50));
    let p = store.progress();
    results.push(check(
        "challenge_repeat",
        p.completed_challenges.len() == 1 && p.earned_badges.len() == 1 && p.coins == 200,
        format!("marks {}, coins {}", p.completed_challenges.len(), p.coins),
    ));

    store.award_badge(SMART_SAVER_BADGE);
    results.push(check(
        "badge_idempotent",
        store.progress().earned_badges.len() == 1,
        format!("badges {:?}", store.progress().earned_badges),
    ));

    results
}

// ── 4. Shop ─────────────────────────────────────────────────────────────

fn validate_shop(config: &StoreConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Avatar Shop ---");
    let mut results = Vec::new();
    let mut store = memory_store(config);

    let total_cost: u32 = catalog().iter().map(|i| i.cost).sum();
    store.add_coins(total_cost - 1);

    let mut refused = Vec::new();
    for item in catalog() {
        let outcome = store.purchase(item);
        if verbose {
            println!("  {:<8} {:<13} {:>3} → {:?}", item.id, item.name, item.cost, outcome);
        }
        if outcome != Purchase::Bought {
            refused.push(item.id);
        }
    }
    results.push(check(
        "shop_budget",
        refused.len() == 1 && store.progress().owned_items.len() == catalog().len() - 1,
        format!("refused {:?}, balance {}", refused, store.progress().coins),
    ));

    let first_owned = catalog().iter().find(|i| store.progress().owns(i.id));
    let resale = first_owned.map(|i| store.purchase(i));
    results.push(check(
        "no_double_purchase",
        resale == Some(Purchase::AlreadyOwned),
        format!("second purchase {:?}", resale),
    ));

    let mut equipped_all = true;
    for slot in EquipSlot::ALL {
        if let Some(item) = catalog()
            .iter()
            .find(|i| i.slot == slot && store.progress().owns(i.id))
        {
            equipped_all &= store.wear(item);
        }
    }
    results.push(check(
        "equip_owned",
        equipped_all && store.progress().unowned_equipped().is_empty(),
        format!("equipped {:?}", store.progress().equipped_items),
    ));

    let unowned = refused.first().and_then(|id| find_item(id));
    if let Some(item) = unowned {
        let worn = store.wear(item);
        results.push(check(
            "equip_unowned_policy",
            worn != config.enforce_equip_ownership,
            format!(
                "enforce {}, wore unowned {}",
                config.enforce_equip_ownership, worn
            ),
        ));
    }

    results
}

// ── 5. Daily Bonus ──────────────────────────────────────────────────────

fn validate_daily_bonus(config: &StoreConfig, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Daily Bonus ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);

    let spins = 20_000;
    let mut counts = [0u32; PRIZES.len()];
    for _ in 0..spins {
        let prize = daily_bonus::spin(&mut rng);
        if let Some(idx) = PRIZES.iter().position(|p| *p == prize) {
            counts[idx] += 1;
        }
    }
    let total_weight = daily_bonus::total_weight() as f64;
    let mut worst_error = 0.0f64;
    for (prize, count) in PRIZES.iter().zip(counts) {
        let expected = prize.weight as f64 / total_weight;
        let observed = count as f64 / spins as f64;
        worst_error = worst_error.max((expected - observed).abs());
        if verbose {
            println!(
                "  {:>3} coins: expected {:.3}, observed {:.3}",
                prize.coins, expected, observed
            );
        }
    }
    results.push(check(
        "wheel_weights",
        worst_error < 0.02,
        format!("worst deviation {:.4}", worst_error),
    ));

    let mut store = memory_store(config);
    let Some(today) = NaiveDate::from_ymd_opt(2026, 10, 18) else {
        return results;
    };
    let first = store.claim_daily_bonus(today, &mut rng);
    let second = store.claim_daily_bonus(today, &mut rng);
    let tomorrow = today.succ_opt().and_then(|d| store.claim_daily_bonus(d, &mut rng));
    results.push(check(
        "once_per_day",
        first.is_some() && second.is_none() && tomorrow.is_some(),
        format!(
            "first {:?}, same day {:?}, next day {:?}",
            first.map(|p| p.coins),
            second.map(|p| p.coins),
            tomorrow.map(|p| p.coins)
        ),
    ));

    results
}

// ── 6. Restart ──────────────────────────────────────────────────────────

fn validate_restart(
    config: &StoreConfig,
    storage_path: Option<&PathBuf>,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let scratch = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(e) => {
            results.push(check("scratch_dir", false, format!("tempdir: {}", e)));
            return results;
        }
    };
    let path = storage_path
        .cloned()
        .unwrap_or_else(|| scratch.path().join("storage.json"));

    let open = |path: &PathBuf| -> Result<ProgressStore<FileStorage>, String> {
        FileStorage::open(path)
            .map(|s| ProgressStore::open(s, config.clone()))
            .map_err(|e| e.to_string())
    };

    let before = match open(&path) {
        Ok(mut store) => {
            store.complete_level(1, 3);
            store.complete_challenge(1, ChallengeRewards::from_score(90));
            if let Some(hat) = find_item("hat_2") {
                store.purchase(hat);
                store.wear(hat);
            }
            store.progress().clone()
        }
        Err(e) => {
            results.push(check("open_storage", false, e));
            return results;
        }
    };

    match open(&path) {
        Ok(mut store) => {
            results.push(check(
                "restart_roundtrip",
                store.progress() == &before,
                format!("reloaded {} coins from {}", store.progress().coins, path.display()),
            ));

            let mut save = Vec::new();
            let exported = store.export_to(&mut save).is_ok();
            store.reset_progress();
            let reset_ok = store.progress() == &PlayerProgress::default();
            let imported = store.import_from(&save[..]).is_ok();
            results.push(check(
                "export_reset_import",
                exported && reset_ok && imported && store.progress() == &before,
                format!("save file {} bytes", save.len()),
            ));
            if verbose {
                println!("  {:?}", store.progress());
            }
        }
        Err(e) => results.push(check("reopen_storage", false, e)),
    }

    results
}
