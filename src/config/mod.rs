use crate::dialogs::DialogSequence;
use crate::session::{Session, properties};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;

/// Configuration manager for loading and saving the embedded UI YAML file.
///
/// Manages one file, `EmbedUI.yaml`, holding what a setup author declares
/// about the custom UI: the dialog flows, the window title, and debug
/// switches. Missing file means defaults, never an error.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    ui_config_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the specified configuration directory.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            ui_config_path: config_dir.join("EmbedUI.yaml"),
            config_dir,
        })
    }

    /// Load the UI configuration, or defaults if the file doesn't exist.
    pub fn load_ui_config(&self) -> Result<UiConfig> {
        if !self.ui_config_path.exists() {
            tracing::warn!(
                "UI config file not found at {}, using defaults",
                self.ui_config_path
            );
            return Ok(UiConfig::default());
        }

        let file_contents = fs::read_to_string(&self.ui_config_path)
            .with_context(|| format!("Failed to read UI config: {}", self.ui_config_path))?;

        let config: UiConfig = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse UI config: {}", self.ui_config_path))?;

        tracing::info!("Loaded UI config from {}", self.ui_config_path);
        Ok(config)
    }

    /// Save the UI configuration file.
    pub fn save_ui_config(&self, config: &UiConfig) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(config).context("Failed to serialize UI config to YAML")?;

        fs::write(&self.ui_config_path, yaml_string)
            .with_context(|| format!("Failed to write UI config: {}", self.ui_config_path))?;

        tracing::info!("Saved UI config to {}", self.ui_config_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}

/// UI configuration from EmbedUI.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(rename = "UI_Settings")]
    pub ui_settings: UiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(rename = "Window Title", default = "default_window_title")]
    pub window_title: String,

    #[serde(rename = "Install Dialogs", default)]
    pub install_dialogs: Vec<String>,

    #[serde(rename = "Repair Dialogs", default)]
    pub repair_dialogs: Vec<String>,

    #[serde(rename = "Keep Engine Window", default)]
    pub keep_engine_window: bool,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            install_dialogs: vec![
                "WelcomeDlg".to_string(),
                "LicenceDlg".to_string(),
                "InstallDirDlg".to_string(),
                "ProgressDlg".to_string(),
                "ExitDlg".to_string(),
            ],
            repair_dialogs: vec![
                "MaintenanceTypeDlg".to_string(),
                "ProgressDlg".to_string(),
                "ExitDlg".to_string(),
            ],
            keep_engine_window: false,
            debug_mode: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            ui_settings: UiSettings::default(),
        }
    }
}

fn default_window_title() -> String {
    "Setup".to_string()
}

impl UiConfig {
    /// Stage the dialog sequences into session properties.
    ///
    /// This is the step the package compiler performs before the orchestrator
    /// runs: the two delimited sequence properties must be in the session by
    /// the time `initialize` reads them.
    pub fn apply_to_session(&self, session: &dyn Session) {
        session.set(
            properties::INSTALL_SEQUENCE,
            &DialogSequence::from_ids(self.ui_settings.install_dialogs.iter().cloned()).serialize(),
        );
        session.set(
            properties::REPAIR_SEQUENCE,
            &DialogSequence::from_ids(self.ui_settings.repair_dialogs.iter().cloned()).serialize(),
        );

        tracing::debug!(
            install = self.ui_settings.install_dialogs.len(),
            repair = self.ui_settings.repair_dialogs.len(),
            "dialog sequences staged into session properties"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::PropertySession;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_create_config_manager() {
        let (_manager, _temp_dir) = create_test_config_manager();
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();

        let config = manager.load_ui_config().unwrap();
        assert_eq!(config.ui_settings.window_title, "Setup");
        assert_eq!(config.ui_settings.install_dialogs.len(), 5);
    }

    #[test]
    fn test_load_save_round_trip() {
        let (manager, _temp_dir) = create_test_config_manager();

        let mut config = UiConfig::default();
        config.ui_settings.window_title = "Demo Product Setup".to_string();
        config.ui_settings.install_dialogs = vec!["OnlyDlg".to_string()];
        manager.save_ui_config(&config).unwrap();

        let loaded = manager.load_ui_config().unwrap();
        assert_eq!(loaded.ui_settings.window_title, "Demo Product Setup");
        assert_eq!(loaded.ui_settings.install_dialogs, vec!["OnlyDlg"]);
    }

    #[test]
    fn test_apply_to_session() {
        let config = UiConfig::default();
        let session = PropertySession::new();

        config.apply_to_session(&session);

        let raw = session.get(properties::INSTALL_SEQUENCE).unwrap();
        assert_eq!(
            raw,
            "WelcomeDlg,LicenceDlg,InstallDirDlg,ProgressDlg,ExitDlg"
        );
        assert_eq!(
            session.get(properties::REPAIR_SEQUENCE).as_deref(),
            Some("MaintenanceTypeDlg,ProgressDlg,ExitDlg")
        );
    }
}
