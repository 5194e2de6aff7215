//! Quest, rank and boss definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A daily quest: timed, completable once per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: String,
    pub title: String,
    pub xp: u64,
    #[serde(default)]
    pub description: String,
}

/// A side quest: no timer, capped per day, optionally gated by rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideQuestDef {
    pub id: String,
    pub title: String,
    pub xp: u64,
    /// Minimum rank required to see and complete the quest
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// One tier of the rank ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankDef {
    pub id: String,
    pub name: String,
    pub min_xp: u64,
    /// XP needed to attempt the next rank's trial
    pub max_xp: u64,
}

/// The weekly boss checklist attached to a rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossDef {
    pub id: String,
    pub title: String,
    pub xp: u64,
    /// Active days per week the boss expects
    #[serde(default)]
    pub min_dailies: u32,
    pub tasks: Vec<String>,
}

/// Read-only content the engine works against. Loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub daily_quests: Vec<QuestDef>,
    #[serde(default)]
    pub side_quests: Vec<SideQuestDef>,
    /// Ordered from lowest to highest
    pub ranks: Vec<RankDef>,
    /// Trial text keyed by the rank it unlocks
    #[serde(default)]
    pub rank_trials: BTreeMap<String, String>,
    #[serde(default)]
    pub weekly_bosses: BTreeMap<String, BossDef>,
    #[serde(default)]
    pub main_quests: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    pub fn daily_quest(&self, id: &str) -> Option<&QuestDef> {
        self.daily_quests.iter().find(|q| q.id == id)
    }

    pub fn side_quest(&self, id: &str) -> Option<&SideQuestDef> {
        self.side_quests.iter().find(|q| q.id == id)
    }

    pub fn rank(&self, id: &str) -> Option<&RankDef> {
        self.ranks.iter().find(|r| r.id == id)
    }

    pub fn rank_index(&self, id: &str) -> Option<usize> {
        self.ranks.iter().position(|r| r.id == id)
    }

    pub fn first_rank(&self) -> Option<&RankDef> {
        self.ranks.first()
    }

    /// The rank following `id`, if any.
    pub fn rank_after(&self, id: &str) -> Option<&RankDef> {
        self.rank_index(id).and_then(|i| self.ranks.get(i + 1))
    }

    pub fn rank_trial(&self, id: &str) -> Option<&str> {
        self.rank_trials.get(id).map(String::as_str)
    }

    pub fn boss_for(&self, rank_id: &str) -> Option<&BossDef> {
        self.weekly_bosses.get(rank_id)
    }

    pub fn main_quests_for(&self, rank_id: &str) -> &[String] {
        self.main_quests
            .get(rank_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
