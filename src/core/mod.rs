//! Tracker engine: state, time rules and the commands that change them.

pub mod boss;
pub mod constants;
pub mod events;
pub mod game_state;
pub mod progression;
pub mod quests;
pub mod reset;
pub mod save;
pub mod session;
pub mod time;
pub mod timers;

pub use events::TrackerEvent;
pub use game_state::TrackerState;
pub use session::{Command, Session};
pub use time::{Clock, FixedClock, SystemClock};
