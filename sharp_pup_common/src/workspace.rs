// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "pup.ron";

/// Find pup.ron in `start` or the closest ancestor directory
pub fn find_workspace_pup_ron(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_config_in_parent_directory() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("src").join("Orders");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "[]").unwrap();

        let found = find_workspace_pup_ron(&nested).expect("config should be found");
        assert_eq!(found, temp.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn nearest_config_wins() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("inner");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "[]").unwrap();
        fs::write(nested.join(CONFIG_FILE_NAME), "[]").unwrap();

        assert_eq!(
            find_workspace_pup_ron(&nested),
            Some(nested.join(CONFIG_FILE_NAME))
        );
    }
}
