//! Projekt RPG - a gamified German study tracker.
//!
//! This module exposes the tracker engine for the terminal app, the
//! simulator and tests.

pub mod catalog;
pub mod core;
pub mod utils;

pub use catalog::Catalog;
pub use core::{Command, Session, TrackerEvent, TrackerState};
