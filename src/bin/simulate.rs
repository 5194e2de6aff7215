//! Headless progression simulator.
//!
//! Replays a daily study habit through the same `Session` the terminal app
//! uses, with a manually advanced clock and in-memory storage, and reports
//! how XP, streak and ranks develop.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --days N          Days to simulate (default: 120)
//!   --start DATE      First day, YYYY-MM-DD (default: 2026-01-05)
//!   --seed N          RNG seed (default: 42)
//!   --skip P          Chance to skip a whole day (default: 0.1)
//!   --forget P        Chance to leave an accepted quest unfinished (default: 0.05)
//!   --quests N        Daily quests attempted per day (default: all)
//!   --side N          Side quest completions attempted per day (default: 1)
//!   --no-boss         Never fight the weekly boss
//!   --verbose         Print every event
//!   --json            Print the summary as JSON
//!   --quiet           Only the final summary line

use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use projekt_rpg::catalog::builtin_catalog;
use projekt_rpg::core::boss::{can_defeat_boss, current_boss, week_progress};
use projekt_rpg::core::progression::{can_unlock_next_rank, xp_multiplier};
use projekt_rpg::core::quests::available_side_quests;
use projekt_rpg::core::{Command, FixedClock, Session, TrackerEvent};
use projekt_rpg::utils::persistence::MemoryStore;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::str::FromStr;

const MINUTES_PER_QUEST: i64 = 25;

// ── CLI Configuration ────────────────────────────────────────────────

struct SimConfig {
    days: u32,
    start: NaiveDate,
    seed: u64,
    skip_chance: f64,
    forget_chance: f64,
    quests_per_day: Option<usize>,
    side_per_day: u32,
    fight_boss: bool,
    verbose: bool,
    json: bool,
    quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            days: 120,
            start: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap_or_default(),
            seed: 42,
            skip_chance: 0.1,
            forget_chance: 0.05,
            quests_per_day: None,
            side_per_day: 1,
            fight_boss: true,
            verbose: false,
            json: false,
            quiet: false,
        }
    }
}

fn parse_value<T: FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match args.get(i).and_then(|raw| raw.parse().ok()) {
        Some(value) => value,
        None => {
            eprintln!("{flag} requires a valid value");
            print_usage();
            std::process::exit(1);
        }
    }
}

fn parse_args() -> SimConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimConfig::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" => {
                i += 1;
                config.days = parse_value(&args, i, "--days");
            }
            "--start" => {
                i += 1;
                config.start = parse_value(&args, i, "--start");
            }
            "--seed" => {
                i += 1;
                config.seed = parse_value(&args, i, "--seed");
            }
            "--skip" => {
                i += 1;
                config.skip_chance = parse_value::<f64>(&args, i, "--skip").clamp(0.0, 1.0);
            }
            "--forget" => {
                i += 1;
                config.forget_chance = parse_value::<f64>(&args, i, "--forget").clamp(0.0, 1.0);
            }
            "--quests" => {
                i += 1;
                config.quests_per_day = Some(parse_value(&args, i, "--quests"));
            }
            "--side" => {
                i += 1;
                config.side_per_day = parse_value(&args, i, "--side");
            }
            "--no-boss" => config.fight_boss = false,
            "--verbose" => config.verbose = true,
            "--json" => config.json = true,
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    config
}

fn print_usage() {
    eprintln!(
        "Projekt RPG Progression Simulator\n\
         \n\
         Usage: simulate [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --days N        Days to simulate (default: 120)\n\
         \x20 --start DATE    First day, YYYY-MM-DD (default: 2026-01-05)\n\
         \x20 --seed N        RNG seed (default: 42)\n\
         \x20 --skip P        Chance to skip a whole day (default: 0.1)\n\
         \x20 --forget P      Chance to leave a quest unfinished (default: 0.05)\n\
         \x20 --quests N      Daily quests attempted per day (default: all)\n\
         \x20 --side N        Side quest completions per day (default: 1)\n\
         \x20 --no-boss       Never fight the weekly boss\n\
         \x20 --verbose       Print every event\n\
         \x20 --json          Print the summary as JSON\n\
         \x20 --quiet         Only the final summary line\n\
         \x20 --help, -h      Show this help"
    );
}

// ── Simulation Statistics ────────────────────────────────────────────

#[derive(Debug, Default, Serialize)]
struct SimStats {
    days_simulated: u32,
    days_skipped: u32,
    quests_completed: u64,
    quests_failed: u64,
    side_quests_completed: u64,
    bosses_defeated: u64,
    xp_from_quests: u64,
    xp_from_bosses: u64,
    xp_lost_to_penalties: u64,
    longest_streak: u32,
    /// (rank id, day number) for every unlock
    rank_unlocks: Vec<(String, u32)>,
    final_xp: u64,
    final_rank: String,
    final_streak: u32,
}

impl SimStats {
    fn process_events(&mut self, day: u32, events: &[TrackerEvent]) {
        for event in events {
            match event {
                TrackerEvent::QuestCompleted { xp_awarded, .. } => {
                    self.quests_completed += 1;
                    self.xp_from_quests += xp_awarded;
                }
                TrackerEvent::SideQuestCompleted { xp_awarded, .. } => {
                    self.side_quests_completed += 1;
                    self.xp_from_quests += xp_awarded;
                }
                TrackerEvent::QuestFailed { penalty, .. } => {
                    self.quests_failed += 1;
                    self.xp_lost_to_penalties += penalty;
                }
                TrackerEvent::BossDefeated { xp_awarded, .. } => {
                    self.bosses_defeated += 1;
                    self.xp_from_bosses += xp_awarded;
                }
                TrackerEvent::RankUnlocked { rank_id, .. } => {
                    self.rank_unlocks.push((rank_id.clone(), day));
                }
                TrackerEvent::DayRolledOver { streak, .. } => {
                    self.longest_streak = self.longest_streak.max(*streak);
                }
                _ => {}
            }
        }
    }
}

// ── Core Simulation Loop ─────────────────────────────────────────────

type SimSession = Session<MemoryStore, FixedClock>;

fn run_day(
    session: &mut SimSession,
    clock: &FixedClock,
    config: &SimConfig,
    rng: &mut ChaCha8Rng,
) -> Vec<TrackerEvent> {
    let mut events = Vec::new();

    let daily_ids: Vec<String> = session
        .catalog()
        .daily_quests
        .iter()
        .take(config.quests_per_day.unwrap_or(usize::MAX))
        .map(|q| q.id.clone())
        .collect();

    for id in daily_ids {
        events.extend(session.execute(Command::AcceptQuest(id.clone())));
        clock.advance_ms(MINUTES_PER_QUEST * 60_000);
        events.extend(session.tick());
        if !rng.gen_bool(config.forget_chance) {
            events.extend(session.execute(Command::CompleteQuest(id)));
        }
    }

    for _ in 0..config.side_per_day {
        let Some(id) = available_side_quests(session.state(), session.catalog())
            .last()
            .map(|q| q.id.clone())
        else {
            break;
        };
        events.extend(session.execute(Command::CompleteSideQuest(id)));
    }

    while can_unlock_next_rank(session.state(), session.catalog()) {
        let unlocked = session.execute(Command::UnlockNextRank);
        if unlocked.is_empty() {
            break;
        }
        events.extend(unlocked);
    }

    if config.fight_boss && session.now().weekday() == Weekday::Fri {
        events.extend(try_boss(session));
    }

    events
}

/// Checks off the boss tasks and fights if the player studied on enough
/// days. Runs on Friday, the last full day under one week identifier.
fn try_boss(session: &mut SimSession) -> Vec<TrackerEvent> {
    let Some(min_dailies) = current_boss(session.state(), session.catalog()).map(|b| b.min_dailies)
    else {
        return Vec::new();
    };
    let active_days = session.state().daily.weekly_active_days + u32::from(session.state().daily.xp_gained > 0);
    if active_days < min_dailies {
        return Vec::new();
    }

    let now = session.now();
    let open: Vec<usize> = week_progress(session.state(), &now)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter(|(_, done)| !**done)
        .map(|(i, _)| i)
        .collect();

    let mut events = Vec::new();
    for index in open {
        events.extend(session.execute(Command::ToggleBossTask(index)));
    }
    if can_defeat_boss(session.state(), session.catalog(), &now) {
        events.extend(session.execute(Command::DefeatBoss));
    }
    events
}

fn run_simulation(config: &SimConfig) -> SimStats {
    let day_start = |offset: u32| {
        let date = config.start + chrono::Duration::days(i64::from(offset));
        DateTime::parse_from_rfc3339(&format!("{}T08:00:00+00:00", date))
    };
    let clock = match day_start(0) {
        Ok(start) => FixedClock::new(start),
        Err(e) => {
            eprintln!("Invalid start date: {e}");
            std::process::exit(1);
        }
    };

    let (mut session, opening) = Session::open(MemoryStore::new(), clock.clone(), builtin_catalog());
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut stats = SimStats::default();
    stats.process_events(0, &opening);

    for day in 0..=config.days {
        if let Ok(next) = day_start(day) {
            clock.set(next);
        }
        let mut events = session.tick();

        // The extra pass only closes the final day
        if day < config.days {
            if rng.gen_bool(config.skip_chance) {
                stats.days_skipped += 1;
            } else {
                events.extend(run_day(&mut session, &clock, config, &mut rng));
            }
            stats.days_simulated += 1;
        }

        stats.process_events(day + 1, &events);
        if config.verbose {
            print_day_events(day + 1, &events);
        }
    }

    let state = session.state();
    stats.final_xp = state.player.xp;
    stats.final_rank = state.player.current_rank.clone();
    stats.final_streak = state.player.streak;
    stats
}

// ── Output ───────────────────────────────────────────────────────────

fn print_day_events(day: u32, events: &[TrackerEvent]) {
    for event in events {
        println!("[day {:>3}] {}", day, event.message());
    }
}

fn print_summary(config: &SimConfig, stats: &SimStats) {
    println!("═══ Simulation: {} days from {} (seed {}) ═══", config.days, config.start, config.seed);
    println!(
        "Days active:       {} ({} skipped)",
        stats.days_simulated - stats.days_skipped,
        stats.days_skipped
    );
    println!(
        "Quests:            {} daily and {} side completed, {} failed",
        stats.quests_completed,
        stats.side_quests_completed,
        stats.quests_failed
    );
    println!(
        "XP:                {} from quests, {} from bosses, -{} penalties",
        stats.xp_from_quests, stats.xp_from_bosses, stats.xp_lost_to_penalties
    );
    println!("Bosses defeated:   {}", stats.bosses_defeated);
    println!("Longest streak:    {} days", stats.longest_streak);
    for (rank, day) in &stats.rank_unlocks {
        println!("Rank {:<4} unlocked on day {}", rank, day);
    }
    println!(
        "Final:             {} XP, rank {}, streak {} (x{})",
        stats.final_xp,
        stats.final_rank,
        stats.final_streak,
        xp_multiplier(stats.final_streak)
    );
}

fn main() {
    let config = parse_args();
    let stats = run_simulation(&config);

    if config.json {
        match serde_json::to_string_pretty(&stats) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to encode summary: {e}");
                std::process::exit(1);
            }
        }
    } else if config.quiet {
        println!(
            "days={} xp={} rank={} streak={} bosses={}",
            config.days, stats.final_xp, stats.final_rank, stats.longest_streak, stats.bosses_defeated
        );
    } else {
        print_summary(&config, &stats);
    }
}
