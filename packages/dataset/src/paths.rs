//! Where the dataset lives on disk.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the dataset location.
pub const DATASET_ENV_VAR: &str = "SHOOTINGS_MAP_DATA";

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`.
///
/// # Panics
///
/// Panics if the project root cannot be resolved.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .to_path_buf()
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the default dataset file, `data/shootings.csv`.
#[must_use]
pub fn default_dataset_path() -> PathBuf {
    data_dir().join("shootings.csv")
}

/// Resolves the dataset path: an explicit path wins, then
/// [`DATASET_ENV_VAR`], then [`default_dataset_path`].
#[must_use]
pub fn resolve_dataset_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    std::env::var(DATASET_ENV_VAR)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map_or_else(default_dataset_path, PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = Path::new("/tmp/other.csv");
        assert_eq!(resolve_dataset_path(Some(path)), path);
    }

    #[test]
    fn default_path_is_under_data_dir() {
        let path = default_dataset_path();
        assert!(path.starts_with(data_dir()));
        assert_eq!(path.file_name().unwrap(), "shootings.csv");
    }
}
