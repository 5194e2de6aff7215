//! Utility modules: persistence, logging, build info.

pub mod build_info;
pub mod logging;
pub mod persistence;
