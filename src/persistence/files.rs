use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the planner data directory, local or in $HOME
pub const PLANNER_DIR_NAME: &str = ".dayplanner";

/// Get the planner directory - checks for local .dayplanner first, then falls back to global ~/.dayplanner
pub fn get_planner_dir() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;

    if let Some(local_dir) = find_local_planner(&current_dir) {
        return Ok(local_dir);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(PLANNER_DIR_NAME))
}

/// Find local .dayplanner directory by walking up the directory tree
fn find_local_planner(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;

    loop {
        let planner_dir = current.join(PLANNER_DIR_NAME);
        if planner_dir.is_dir() {
            return Some(planner_dir);
        }

        current = current.parent()?;
    }
}

/// Ensure the planner directory exists
pub fn ensure_planner_dir() -> Result<PathBuf> {
    let dir = get_planner_dir()?;
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(dir)
}

/// Initialize a local .dayplanner directory in the current directory
pub fn init_local_planner() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Could not determine current directory")?;
    let planner_dir = current_dir.join(PLANNER_DIR_NAME);

    if planner_dir.exists() {
        anyhow::bail!("Planner directory already exists: {}", planner_dir.display());
    }

    fs::create_dir_all(&planner_dir)
        .with_context(|| format!("Failed to create directory: {}", planner_dir.display()))?;

    Ok(planner_dir)
}

/// Path to config.json (user preferences)
pub fn config_file() -> Result<PathBuf> {
    Ok(ensure_planner_dir()?.join("config.json"))
}

/// Path to meta.json (last selected date)
pub fn meta_file() -> Result<PathBuf> {
    Ok(ensure_planner_dir()?.join("meta.json"))
}

/// Path to the log file
pub fn log_file() -> Result<PathBuf> {
    Ok(ensure_planner_dir()?.join("dayplanner.log"))
}

/// Path to the task storage file, named by the config
pub fn storage_file(file_name: &str) -> Result<PathBuf> {
    Ok(ensure_planner_dir()?.join(file_name))
}

/// Default output path of a monthly report (report-YYYY-MM.md)
pub fn report_file(month: &str) -> Result<PathBuf> {
    Ok(ensure_planner_dir()?.join(format!("report-{}.md", month)))
}

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .context("File path has no parent directory")?;

    let mut temp_file = NamedTempFile::new_in(dir)
        .context("Failed to create temporary file")?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to sync temporary file")?;

    temp_file
        .persist(path)
        .with_context(|| format!("Failed to persist file: {}", path.display()))?;

    Ok(())
}

/// Read file content, return empty string if file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(String::new());
    }
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_local_planner_walks_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let planner = temp_dir.path().join(PLANNER_DIR_NAME);
        fs::create_dir_all(&planner).unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_local_planner(&nested), Some(planner));
    }

    #[test]
    fn test_find_local_planner_ignores_plain_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(PLANNER_DIR_NAME), "not a dir").unwrap();

        let found = find_local_planner(temp_dir.path());
        assert_ne!(found, Some(temp_dir.path().join(PLANNER_DIR_NAME)));
    }

    #[test]
    fn test_atomic_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("test.json");

        atomic_write(&test_file, "{}").unwrap();
        assert_eq!(read_file(&test_file).unwrap(), "{}");

        atomic_write(&test_file, "[1]").unwrap();
        assert_eq!(read_file(&test_file).unwrap(), "[1]");
    }

    #[test]
    fn test_atomic_write_missing_dir_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("missing").join("test.json");

        assert!(atomic_write(&test_file, "{}").is_err());
        assert!(!test_file.exists());
    }

    #[test]
    fn test_read_nonexistent_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let test_file = temp_dir.path().join("nonexistent.json");

        assert_eq!(read_file(&test_file).unwrap(), "");
    }
}
