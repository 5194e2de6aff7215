use super::constants::DAILY_TIME_BANK_MS;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Long-lived player progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Player {
    pub xp: u64,
    pub current_rank: String,
    /// Always a prefix of the catalog's rank order.
    pub unlocked_ranks: Vec<String>,
    /// Main quest checkboxes keyed by `"<rank>-<index>"`
    pub main_quest_progress: BTreeMap<String, bool>,
    /// Consecutive days that closed with XP gained
    pub streak: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            xp: 0,
            current_rank: "b1".to_string(),
            unlocked_ranks: vec!["b1".to_string()],
            main_quest_progress: BTreeMap::new(),
            streak: 0,
        }
    }
}

/// Per-day bookkeeping, cleared by the daily reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyState {
    pub completed_quests: BTreeMap<String, bool>,
    pub side_quest_usage: BTreeMap<String, u32>,
    /// Last calendar day the daily reset ran for (None before first run)
    pub last_day: Option<NaiveDate>,
    pub weekly_active_days: u32,
    pub time_bank_ms: u64,
    /// Epoch ms of the last enforcement tick
    pub last_time_tick: i64,
    pub xp_gained: u64,
    /// XP gained per closed day, oldest first
    pub xp_history: BTreeMap<NaiveDate, u64>,
}

impl Default for DailyState {
    fn default() -> Self {
        Self {
            completed_quests: BTreeMap::new(),
            side_quest_usage: BTreeMap::new(),
            last_day: None,
            weekly_active_days: 0,
            time_bank_ms: DAILY_TIME_BANK_MS,
            last_time_tick: 0,
            xp_gained: 0,
            xp_history: BTreeMap::new(),
        }
    }
}

/// Timer attached to a daily quest while it is being worked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveQuestTimer {
    /// Epoch ms when the quest was accepted
    pub start: i64,
    /// Epoch ms of the end of the acceptance day
    pub day_deadline: i64,
    pub failed: bool,
    /// Set before XP is credited so a second completion is a no-op
    #[serde(default)]
    pub accounted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestTimers {
    pub active_timed: BTreeMap<String, ActiveQuestTimer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    pub expanded_quests: BTreeMap<String, bool>,
}

/// One defeated weekly boss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossRecord {
    pub week: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossState {
    /// Task checkboxes per week identifier. Never pruned.
    pub weekly_progress: BTreeMap<String, Vec<bool>>,
    pub last_boss_week: Option<String>,
    /// Most recent week identifier seen by the weekly reset
    pub last_seen_week: Option<String>,
    pub history: Vec<BossRecord>,
}

/// Complete tracker snapshot. This is what gets persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    pub player: Player,
    pub daily: DailyState,
    pub quests: QuestTimers,
    pub ui: UiState,
    pub bosses: BossState,
}

impl TrackerState {
    /// Fresh state whose enforcement clock starts at `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        let mut state = Self::default();
        state.daily.last_time_tick = now_ms;
        state
    }

    /// True while at least one accepted quest is still running.
    pub fn has_running_timer(&self) -> bool {
        self.quests.active_timed.values().any(|t| !t.failed)
    }

    /// The last `days` closed days with their XP, oldest first.
    pub fn recent_xp_history(&self, days: usize) -> Vec<(NaiveDate, u64)> {
        let skip = self.daily.xp_history.len().saturating_sub(days);
        self.daily
            .xp_history
            .iter()
            .skip(skip)
            .map(|(day, xp)| (*day, *xp))
            .collect()
    }

    /// Subtracts a penalty, flooring XP at zero. Returns the amount removed.
    pub fn deduct_xp(&mut self, amount: u64) -> u64 {
        let removed = amount.min(self.player.xp);
        self.player.xp -= removed;
        removed
    }
}
