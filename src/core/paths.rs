//! Shared path helpers: home resolution and `~` expansion.

use std::env;
use std::path::{Path, PathBuf};

/// Application directory name used under `~/.config` and `~/.local/share`.
pub const APP_DIR: &str = "incident-deck";

/// Resolve the user's home directory from `$HOME`.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Home directory, or `/tmp` when `$HOME` is unset (CI, service accounts).
#[must_use]
pub fn home_or_tmp() -> PathBuf {
    home_dir().unwrap_or_else(|| PathBuf::from("/tmp"))
}

/// `~/.config/incident-deck`.
#[must_use]
pub fn config_dir() -> PathBuf {
    home_or_tmp().join(".config").join(APP_DIR)
}

/// `~/.local/share/incident-deck`.
#[must_use]
pub fn data_dir() -> PathBuf {
    home_or_tmp().join(".local").join("share").join(APP_DIR)
}

/// Expand a leading `~/` against `home`. Other paths are returned unchanged.
#[must_use]
pub fn expand_tilde_with(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Expand a leading `~/` against `$HOME`.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    expand_tilde_with(path, home_dir().as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_prefix_expands_against_home() {
        let home = Path::new("/home/op");
        assert_eq!(
            expand_tilde_with(Path::new("~/logs/a.jsonl"), Some(home)),
            PathBuf::from("/home/op/logs/a.jsonl")
        );
        assert_eq!(
            expand_tilde_with(Path::new("~"), Some(home)),
            PathBuf::from("/home/op")
        );
    }

    #[test]
    fn non_tilde_paths_are_untouched() {
        let home = Path::new("/home/op");
        assert_eq!(
            expand_tilde_with(Path::new("/var/log/x"), Some(home)),
            PathBuf::from("/var/log/x")
        );
        assert_eq!(
            expand_tilde_with(Path::new("rel/~x"), Some(home)),
            PathBuf::from("rel/~x")
        );
    }

    #[test]
    fn missing_home_leaves_path_as_is() {
        assert_eq!(
            expand_tilde_with(Path::new("~/x"), None),
            PathBuf::from("~/x")
        );
    }

    #[test]
    fn app_dirs_end_with_app_name() {
        assert!(config_dir().ends_with(APP_DIR));
        assert!(data_dir().ends_with(APP_DIR));
    }
}
