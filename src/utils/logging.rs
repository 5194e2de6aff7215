//! Log setup for the terminal app.
//!
//! The TUI owns stdout/stderr, so records go to a file in the data
//! directory. `RUST_LOG` overrides the default `info` level.

use crate::core::constants::LOG_FILE_NAME;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE_NAME)
}

/// Append log records to `<data_dir>/projekt-rpg.log`.
///
/// Calling it twice is harmless: the second logger is rejected and the
/// first stays active.
pub fn init_file_logger(data_dir: &Path) -> io::Result<PathBuf> {
    let path = log_path(data_dir);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init();
    Ok(path)
}

/// Log to stderr, for the non-interactive commands.
pub fn init_stderr_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_created_in_data_dir() {
        let dir = std::env::temp_dir().join(format!("projekt-rpg-log-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let path = init_file_logger(&dir).unwrap();

        assert!(path.exists());
        assert!(path.ends_with(LOG_FILE_NAME));
        std::fs::remove_dir_all(dir).ok();
    }
}
