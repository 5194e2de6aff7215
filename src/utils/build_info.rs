//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `projekt-rpg <date> (<commit>)`, as printed by `--version`.
pub fn version_line() -> String {
    format!("projekt-rpg {} ({})", BUILD_DATE, BUILD_COMMIT)
}
