// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 1000;
pub const INPUT_POLL_MS: u64 = 50;
pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;

// Daily time bank
pub const DAILY_TIME_BANK_MS: u64 = DAY_MS as u64;

// Quests
pub const FAILURE_PENALTY_XP: u64 = 5;
pub const SIDE_QUEST_DAILY_CAP: u32 = 2;

// Streak multiplier: thresholds in consecutive active days
pub const STREAK_TIER_1_DAYS: u32 = 3;
pub const STREAK_TIER_1_MULTIPLIER: f64 = 1.2;
pub const STREAK_TIER_2_DAYS: u32 = 7;
pub const STREAK_TIER_2_MULTIPLIER: f64 = 1.5;

// Display
pub const XP_HISTORY_DISPLAY_DAYS: usize = 6;

// Persistence
pub const STATE_KEY: &str = "projektRPG";
pub const DATA_DIR_NAME: &str = ".projekt-rpg";
pub const DATA_DIR_ENV: &str = "PROJEKT_RPG_HOME";
pub const CATALOG_FILE_NAME: &str = "catalog.json";
pub const LOG_FILE_NAME: &str = "projekt-rpg.log";
