//! Outcomes reported by engine operations.
//!
//! Every command and tick returns the events it produced, in order. An empty
//! list means the operation was a no-op (a guard rejected it or nothing was
//! due). The presentation layer uses these for its activity log; the engine
//! never depends on how they are shown.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    // ── Daily quests ────────────────────────────────────────────
    /// A daily quest timer was started.
    QuestAccepted { quest_id: String, deadline: i64 },

    /// A daily quest was completed and XP credited.
    QuestCompleted {
        quest_id: String,
        xp_awarded: u64,
        multiplier: f64,
    },

    /// A running quest failed (deadline passed or day rolled over).
    QuestFailed { quest_id: String, penalty: u64 },

    // ── Side quests ─────────────────────────────────────────────
    SideQuestCompleted {
        quest_id: String,
        xp_awarded: u64,
        uses_today: u32,
    },

    // ── Time accounting ─────────────────────────────────────────
    /// The daily reset closed a day and opened `today`.
    DayRolledOver {
        closed_day: Option<NaiveDate>,
        xp_archived: u64,
        streak: u32,
        today: NaiveDate,
    },

    /// A new week identifier was observed.
    WeekStarted { week: String },

    /// The boss defeat lock from a previous week was lifted.
    BossLockCleared { previous_week: String },

    /// The time bank just ran out.
    TimeBankExhausted,

    // ── Progression ─────────────────────────────────────────────
    RankUnlocked { rank_id: String, rank_name: String },

    MainQuestToggled { key: String, done: bool },

    // ── Weekly boss ─────────────────────────────────────────────
    /// The boss checklist for a week was created.
    WeekRecordCreated { week: String, tasks: usize },

    BossTaskToggled {
        week: String,
        index: usize,
        done: bool,
    },

    BossDefeated {
        week: String,
        title: String,
        xp_awarded: u64,
    },

    // ── Presentation ────────────────────────────────────────────
    QuestDetailsToggled { quest_id: String, expanded: bool },
}

impl TrackerEvent {
    /// One-line description for logs and the activity panel.
    pub fn message(&self) -> String {
        match self {
            TrackerEvent::QuestAccepted { quest_id, .. } => {
                format!("Quest accepted: {}", quest_id)
            }
            TrackerEvent::QuestCompleted {
                quest_id,
                xp_awarded,
                multiplier,
            } => format!(
                "Quest completed: {} (+{} XP, x{})",
                quest_id, xp_awarded, multiplier
            ),
            TrackerEvent::QuestFailed { quest_id, penalty } => {
                format!("Quest failed: {} (-{} XP)", quest_id, penalty)
            }
            TrackerEvent::SideQuestCompleted {
                quest_id,
                xp_awarded,
                uses_today,
            } => format!(
                "Side quest completed: {} (+{} XP, {} today)",
                quest_id, xp_awarded, uses_today
            ),
            TrackerEvent::DayRolledOver {
                closed_day,
                xp_archived,
                streak,
                today,
            } => match closed_day {
                Some(day) => format!(
                    "New day {}: archived {} XP for {}, streak {}",
                    today, xp_archived, day, streak
                ),
                None => format!("First day {}", today),
            },
            TrackerEvent::WeekStarted { week } => format!("New week {}", week),
            TrackerEvent::BossLockCleared { previous_week } => {
                format!("Boss from {} can be fought again", previous_week)
            }
            TrackerEvent::TimeBankExhausted => "Time bank exhausted".to_string(),
            TrackerEvent::RankUnlocked { rank_name, .. } => {
                format!("Rank unlocked: {}", rank_name)
            }
            TrackerEvent::MainQuestToggled { key, done } => {
                format!("Main quest {} {}", key, if *done { "done" } else { "reopened" })
            }
            TrackerEvent::WeekRecordCreated { week, tasks } => {
                format!("Boss checklist for {} ({} tasks)", week, tasks)
            }
            TrackerEvent::BossTaskToggled { week, index, done } => format!(
                "Boss task {} for {} {}",
                index + 1,
                week,
                if *done { "checked" } else { "unchecked" }
            ),
            TrackerEvent::BossDefeated {
                week,
                title,
                xp_awarded,
            } => format!("Boss defeated: {} [{}] (+{} XP)", title, week, xp_awarded),
            TrackerEvent::QuestDetailsToggled { quest_id, expanded } => format!(
                "Details {} for {}",
                if *expanded { "shown" } else { "hidden" },
                quest_id
            ),
        }
    }

    /// Whether the event changes XP, rank or failure state. Used to pick a
    /// log level and to highlight entries in the activity panel.
    pub fn is_notable(&self) -> bool {
        matches!(
            self,
            TrackerEvent::QuestCompleted { .. }
                | TrackerEvent::QuestFailed { .. }
                | TrackerEvent::SideQuestCompleted { .. }
                | TrackerEvent::DayRolledOver { .. }
                | TrackerEvent::TimeBankExhausted
                | TrackerEvent::RankUnlocked { .. }
                | TrackerEvent::BossDefeated { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let event = TrackerEvent::QuestFailed {
            quest_id: "reading".to_string(),
            penalty: 5,
        };
        assert_eq!(event.message(), "Quest failed: reading (-5 XP)");

        let event = TrackerEvent::BossTaskToggled {
            week: "2026-W43".to_string(),
            index: 0,
            done: true,
        };
        assert_eq!(event.message(), "Boss task 1 for 2026-W43 checked");
    }

    #[test]
    fn test_first_day_message() {
        let event = TrackerEvent::DayRolledOver {
            closed_day: None,
            xp_archived: 0,
            streak: 0,
            today: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        };
        assert_eq!(event.message(), "First day 2026-10-18");
    }

    #[test]
    fn test_notable_events() {
        assert!(TrackerEvent::TimeBankExhausted.is_notable());
        assert!(!TrackerEvent::WeekStarted {
            week: "2026-W43".to_string()
        }
        .is_notable());
    }
}
