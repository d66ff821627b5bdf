//! Configuration file persistence for Inkpad
//!
//! This module handles loading and saving configuration files to
//! platform-specific directories with robust error handling and
//! graceful fallback to defaults.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
const APP_NAME: &str = "inkpad";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Suffix of the backup file used during atomic writes
const BACKUP_SUFFIX: &str = "bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// Returns the appropriate directory based on the operating system:
/// - **Windows**: `%APPDATA%\inkpad\`
/// - **macOS**: `~/Library/Application Support/inkpad/`
/// - **Linux**: `~/.config/inkpad/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined
/// (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the configuration file.
///
/// This combines `get_config_dir()` with the config file name.
pub fn get_config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Ensure the parent directory of `path` exists, creating it if necessary.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(());
    };

    if !dir.exists() {
        debug!("Creating config directory: {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load configuration from the default config file location.
///
/// If the file doesn't exist or is corrupted, this falls back to defaults.
///
/// # Behavior
///
/// 1. If the config file exists and is valid JSON, load and sanitize it
/// 2. If the config file doesn't exist, return default settings
/// 3. If the config file is corrupted/invalid, log a warning and return defaults
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load configuration from an explicit path.
///
/// A missing or empty file yields default settings; unreadable or invalid
/// files are errors so callers can decide whether to fall back.
pub fn load_config_from(config_path: &Path) -> Result<Settings> {
    // Check if config file exists
    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Settings::default());
    }

    debug!("Loading config from: {}", config_path.display());

    // Read the file contents
    let contents = fs::read_to_string(config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    // Handle empty file
    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    // Parse and sanitize
    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!(
        "Configuration loaded successfully from {}",
        config_path.display()
    );
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save configuration to the default config file location.
///
/// # Errors
///
/// - `Error::ConfigDirNotFound`: Config directory cannot be determined
/// - `Error::ConfigSave`: Failed to write the config file
pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(settings, &get_config_file_path()?)
}

/// Save configuration to an explicit path.
///
/// This performs an atomic write by:
/// 1. Writing to a backup file next to the target
/// 2. Replacing the original file with the backup
pub fn save_config_to(settings: &Settings, config_path: &Path) -> Result<()> {
    ensure_parent_dir(config_path)?;
    let backup_path = config_path.with_extension(BACKUP_SUFFIX);

    debug!("Saving config to: {}", config_path.display());

    // Serialize to pretty JSON
    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    // Write to backup file first (atomic write pattern)
    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    // Replace original with backup
    fs::rename(&backup_path, config_path).map_err(|e| Error::ConfigSave {
        path: config_path.to_path_buf(),
        source: Box::new(e),
    })?;

    info!(
        "Configuration saved successfully to {}",
        config_path.display()
    );
    Ok(())
}

/// Write a default configuration file, returning where it was written.
///
/// Uses `config_path` when given, the platform location otherwise. An
/// existing file is only replaced when `force` is set.
pub fn init_config(config_path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => get_config_file_path()?,
    };

    if path.exists() && !force {
        return Err(Error::invalid_argument(
            "config",
            format!("'{}' already exists (use --force to replace it)", path.display()),
        ));
    }

    let settings = Settings::default();
    match config_path {
        Some(path) => save_config_to(&settings, path)?,
        None => save_config(&settings)?,
    }
    Ok(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModifierPreference;
    use tempfile::TempDir;

    /// Helper to create a test environment with a temporary config directory.
    struct TestEnv {
        _temp_dir: TempDir,
        config_file: PathBuf,
    }

    impl TestEnv {
        fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let config_file = temp_dir.path().join(APP_NAME).join(CONFIG_FILE_NAME);
            Self {
                _temp_dir: temp_dir,
                config_file,
            }
        }

        fn write_config(&self, content: &str) {
            fs::create_dir_all(self.config_file.parent().unwrap())
                .expect("Failed to create config dir");
            fs::write(&self.config_file, content).expect("Failed to write config");
        }

        fn read_config(&self) -> String {
            fs::read_to_string(&self.config_file).expect("Failed to read config")
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Platform directory tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_config_file_path_uses_app_dir() {
        // Some CI sandboxes have no config dir at all
        if let Ok(path) = get_config_file_path() {
            assert!(path.ends_with(Path::new(APP_NAME).join(CONFIG_FILE_NAME)));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Load tests with temp directory
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let env = TestEnv::new();
        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let env = TestEnv::new();
        env.write_config("  \n");
        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_partial_config_uses_defaults_for_missing() {
        let env = TestEnv::new();
        env.write_config(r#"{"primary_modifier": "meta"}"#);

        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings.primary_modifier, ModifierPreference::Meta);
        assert_eq!(settings.undo_history_limit, 100);
    }

    #[test]
    fn test_load_corrupted_config_returns_error() {
        let env = TestEnv::new();
        env.write_config("{ invalid json }");

        let result = load_config_from(&env.config_file);
        assert!(matches!(result, Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_corrupted_config_degrades_to_defaults() {
        let env = TestEnv::new();
        env.write_config("{ invalid json }");

        let settings = load_config_from(&env.config_file)
            .unwrap_or_warn_default(Settings::default(), "test");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_config_sanitizes_values() {
        let env = TestEnv::new();
        env.write_config(r#"{"undo_history_limit": 0}"#);

        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings.undo_history_limit, Settings::MIN_UNDO_HISTORY);
    }

    #[test]
    fn test_config_with_unknown_fields_ignored() {
        let env = TestEnv::new();
        env.write_config(r#"{"primary_modifier": "control", "future_feature": true}"#);

        let settings = load_config_from(&env.config_file).unwrap();
        assert_eq!(settings.primary_modifier, ModifierPreference::Control);
    }

    #[test]
    fn test_config_with_wrong_types() {
        let env = TestEnv::new();
        env.write_config(r#"{"undo_history_limit": "lots"}"#);

        assert!(load_config_from(&env.config_file).is_err());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Save tests with temp directory
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_save_creates_directory_and_valid_json() {
        let env = TestEnv::new();
        let settings = Settings {
            primary_modifier: ModifierPreference::Control,
            undo_history_limit: 25,
            ..Settings::default()
        };

        save_config_to(&settings, &env.config_file).unwrap();

        let loaded: Settings = serde_json::from_str(&env.read_config()).unwrap();
        assert_eq!(loaded, settings);
        // The backup file is renamed away
        assert!(!env.config_file.with_extension(BACKUP_SUFFIX).exists());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let env = TestEnv::new();
        let mut original = Settings::default();
        original
            .language_aliases
            .insert("zsh".to_string(), "bash".to_string());
        original.preview.hard_breaks = true;

        save_config_to(&original, &env.config_file).unwrap();
        let loaded = load_config_from(&env.config_file).unwrap();

        assert_eq!(original, loaded);
    }

    #[test]
    fn test_init_config_writes_defaults() {
        let env = TestEnv::new();
        let written = init_config(Some(&env.config_file), false).unwrap();
        assert_eq!(written, env.config_file);
        assert_eq!(load_config_from(&env.config_file).unwrap(), Settings::default());
    }

    #[test]
    fn test_init_config_keeps_existing_file_without_force() {
        let env = TestEnv::new();
        env.write_config(r#"{"undo_history_limit": 5}"#);

        let result = init_config(Some(&env.config_file), false);
        assert!(matches!(result, Err(Error::InvalidArgument { .. })));
        assert_eq!(load_config_from(&env.config_file).unwrap().undo_history_limit, 5);

        init_config(Some(&env.config_file), true).unwrap();
        assert_eq!(load_config_from(&env.config_file).unwrap().undo_history_limit, 100);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let env = TestEnv::new();
        env.write_config(r#"{"undo_history_limit": 5}"#);

        save_config_to(&Settings::default(), &env.config_file).unwrap();
        let loaded = load_config_from(&env.config_file).unwrap();
        assert_eq!(loaded.undo_history_limit, 100);
    }
}
