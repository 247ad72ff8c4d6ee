//! The application session: the loaded dataset and the active settings.
//!
//! Both are owned here and swapped wholesale. Loading a dataset replaces
//! the previous one; resetting settings replaces the whole document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serial_label_core::{Dataset, LabelSettings, MatchResult, lookup};
use serial_label_settings::{merge_settings_file, save_settings_file};
use tracing::{info, warn};

/// File name used when `--settings` is not given.
pub(crate) const DEFAULT_SETTINGS_FILE: &str = "label_settings.json";

#[derive(Debug)]
pub(crate) struct Session {
    dataset: Option<Dataset>,
    settings: LabelSettings,
    settings_path: PathBuf,
}

impl Session {
    /// Start a session with the settings stored at `settings_path`.
    ///
    /// Keys with bad values keep their defaults and are reported one by
    /// one. An unreadable or non-object file is reported and the defaults
    /// are used instead.
    pub(crate) fn open(settings_path: impl Into<PathBuf>) -> Self {
        let settings_path = settings_path.into();
        let settings = match merge_settings_file(&settings_path) {
            Ok(merged) => {
                for rejected in &merged.rejected {
                    warn!(
                        path = %settings_path.display(),
                        key = %rejected.key,
                        reason = %rejected.reason,
                        "ignoring settings key, keeping its default"
                    );
                }
                merged.settings
            }
            Err(e) => {
                warn!(path = %settings_path.display(), error = %e, "using default settings");
                LabelSettings::default()
            }
        };
        Self {
            dataset: None,
            settings,
            settings_path,
        }
    }

    /// Replace the loaded dataset with the one at `path`.
    pub(crate) fn load_dataset(&mut self, path: &Path) -> Result<&Dataset> {
        let dataset = Dataset::load_path(path)
            .with_context(|| format!("failed to load dataset {}", path.display()))?;
        info!(path = %path.display(), rows = dataset.len(), "dataset loaded");
        Ok(self.dataset.insert(dataset))
    }

    pub(crate) fn dataset(&self) -> Result<&Dataset> {
        self.dataset
            .as_ref()
            .ok_or_else(|| anyhow!("no dataset loaded (pass --data)"))
    }

    pub(crate) fn settings(&self) -> &LabelSettings {
        &self.settings
    }

    pub(crate) fn settings_mut(&mut self) -> &mut LabelSettings {
        &mut self.settings
    }

    pub(crate) fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Replace the settings with the defaults and persist them.
    pub(crate) fn reset_settings(&mut self) -> Result<()> {
        self.settings = LabelSettings::default();
        self.save_settings()
    }

    pub(crate) fn save_settings(&self) -> Result<()> {
        save_settings_file(&self.settings, &self.settings_path)
            .with_context(|| format!("failed to save {}", self.settings_path.display()))
    }

    /// Look `serial` up in the loaded dataset.
    pub(crate) fn lookup(&self, serial: &str) -> Result<MatchResult<'_>> {
        let dataset = self.dataset()?;
        Ok(lookup(dataset, serial)?)
    }
}
