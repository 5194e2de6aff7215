//! Built-in German study catalog.

use super::types::{BossDef, Catalog, QuestDef, RankDef, SideQuestDef};
use std::collections::BTreeMap;

/// Returns the catalog shipped with the binary.
pub fn builtin_catalog() -> Catalog {
    Catalog {
        daily_quests: daily_quests(),
        side_quests: side_quests(),
        ranks: ranks(),
        rank_trials: rank_trials(),
        weekly_bosses: weekly_bosses(),
        main_quests: main_quests(),
    }
}

fn quest(id: &str, title: &str, xp: u64, description: &str) -> QuestDef {
    QuestDef {
        id: id.to_string(),
        title: title.to_string(),
        xp,
        description: description.to_string(),
    }
}

fn side_quest(id: &str, title: &str, xp: u64, rank: &str, description: &str) -> SideQuestDef {
    SideQuestDef {
        id: id.to_string(),
        title: title.to_string(),
        xp,
        rank: Some(rank.to_string()),
        description: description.to_string(),
    }
}

fn daily_quests() -> Vec<QuestDef> {
    vec![
        quest(
            "reading",
            "Reading",
            10,
            "Read at least 10–15 minutes of German text.",
        ),
        quest(
            "listening",
            "Listening",
            10,
            "Listen to German audio/video for 15 minutes.",
        ),
        quest("writing", "Writing", 15, "Write 120–200 words in German."),
        quest(
            "speaking",
            "Speaking",
            25,
            "Speak in any topic in German for 2 minutes.",
        ),
    ]
}

fn side_quests() -> Vec<SideQuestDef> {
    vec![
        side_quest(
            "focus",
            "Deep Focus (40 min)",
            20,
            "b1",
            "Listen to German audio for 40 minutes from DW news.\n(session 1: 20 min, session 2: 20 min)",
        ),
        side_quest(
            "lecture",
            "Watch German Lecture (40 min)",
            25,
            "b2",
            "Watch any German lectures on science topics for 40 minutes.",
        ),
        side_quest(
            "summary",
            "Summarize an Article (40 min = Listen 20 min + Write summary 20 min)",
            25,
            "c1",
            "Read or listen to any topic for 20 minutes and summarize it within 20 minutes.",
        ),
    ]
}

fn ranks() -> Vec<RankDef> {
    [("b1", "B1", 0, 1000), ("b2", "B2", 1000, 2500), ("c1", "C1", 2500, 4000)]
        .into_iter()
        .map(|(id, name, min_xp, max_xp)| RankDef {
            id: id.to_string(),
            name: name.to_string(),
            min_xp,
            max_xp,
        })
        .collect()
}

fn rank_trials() -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "b2".to_string(),
            "Speak for 10 minutes on one topic without notes.".to_string(),
        ),
        (
            "c1".to_string(),
            "Explain a complex topic for 15 minutes and write a summary.".to_string(),
        ),
    ])
}

fn boss(id: &str, title: &str, xp: u64, min_dailies: u32, tasks: [&str; 5]) -> BossDef {
    BossDef {
        id: id.to_string(),
        title: title.to_string(),
        xp,
        min_dailies,
        tasks: tasks.iter().map(|t| t.to_string()).collect(),
    }
}

fn weekly_bosses() -> BTreeMap<String, BossDef> {
    BTreeMap::from([
        (
            "b1".to_string(),
            boss(
                "boss-b1",
                "B1 Core Dungeon",
                100,
                5,
                [
                    "Study German on 5 different days",
                    "Read one full article or chapter",
                    "Write 150–200 words in German",
                    "Speak German for 30 minutes total",
                    "Review and correct mistakes",
                ],
            ),
        ),
        (
            "b2".to_string(),
            boss(
                "boss-b2",
                "B2 Core Dungeon",
                150,
                6,
                [
                    "Study German on 6 different days",
                    "Read two long-form texts",
                    "Write a 300-word structured text",
                    "Speak German for 45 minutes total",
                    "Summarize one complex topic orally",
                ],
            ),
        ),
        (
            "c1".to_string(),
            boss(
                "boss-c1",
                "C1 Mastery Dungeon",
                200,
                7,
                [
                    "Study German every day this week",
                    "Read an academic or advanced text",
                    "Write a 400+ word essay",
                    "Speak German for 60 minutes total",
                    "Explain a complex topic clearly",
                ],
            ),
        ),
    ])
}

fn main_quests() -> BTreeMap<String, Vec<String>> {
    let board = |items: [&str; 3]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    BTreeMap::from([
        (
            "b1".to_string(),
            board([
                "Complete all daily quests at least once",
                "Reach 1000 XP",
                "Defeat the B1 weekly boss",
            ]),
        ),
        (
            "b2".to_string(),
            board([
                "Write 3 structured texts",
                "Speak German for 30 minutes without notes",
                "Defeat the B2 weekly boss",
            ]),
        ),
        (
            "c1".to_string(),
            board([
                "Write a 400+ word essay",
                "Explain a complex topic fluently",
                "Defeat the C1 mastery dungeon",
            ]),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rank_ladder() {
        let catalog = builtin_catalog();
        let ids: Vec<&str> = catalog.ranks.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2", "c1"]);

        // Each rank starts where the previous one ends
        for pair in catalog.ranks.windows(2) {
            assert_eq!(pair[0].max_xp, pair[1].min_xp);
        }
    }

    #[test]
    fn test_every_rank_has_boss_and_main_quests() {
        let catalog = builtin_catalog();
        for rank in &catalog.ranks {
            let boss = catalog.boss_for(&rank.id).expect("boss missing");
            assert_eq!(boss.tasks.len(), 5);
            assert_eq!(catalog.main_quests_for(&rank.id).len(), 3);
        }
    }

    #[test]
    fn test_trials_exist_for_every_rank_after_the_first() {
        let catalog = builtin_catalog();
        for rank in catalog.ranks.iter().skip(1) {
            assert!(catalog.rank_trial(&rank.id).is_some());
        }
        assert!(catalog.rank_trial("b1").is_none());
    }

    #[test]
    fn test_side_quests_gated_by_known_ranks() {
        let catalog = builtin_catalog();
        for quest in &catalog.side_quests {
            let rank = quest.rank.as_deref().unwrap();
            assert!(catalog.rank(rank).is_some(), "{} names unknown rank", quest.id);
        }
    }
}
