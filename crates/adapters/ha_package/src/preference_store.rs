//! JSON file implementation of [`PreferenceStore`].

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use locmode_app::ports::PreferenceStore;
use locmode_app::preferences::Preferences;
use locmode_domain::error::LocModeError;

use crate::error::PackageFsError;

const FILE_NAME: &str = "ui_config.json";

/// Preferences saved as pretty-printed JSON in the add-on data directory.
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    /// Store preferences in `ui_config.json` under `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(FILE_NAME),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn load(&self) -> impl Future<Output = Result<Preferences, LocModeError>> + Send {
        let path = self.path.clone();
        async move {
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "no saved preferences");
                    return Ok(Preferences::default());
                }
                Err(err) => {
                    tracing::warn!(%err, path = %path.display(), "unreadable preferences, using defaults");
                    return Ok(Preferences::default());
                }
            };
            Ok(serde_json::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!(%err, path = %path.display(), "malformed preferences, using defaults");
                Preferences::default()
            }))
        }
    }

    fn save(
        &self,
        preferences: Preferences,
    ) -> impl Future<Output = Result<(), LocModeError>> + Send {
        let path = self.path.clone();
        async move {
            let content = serde_json::to_string_pretty(&preferences).map_err(PackageFsError::from)?;
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| PackageFsError::Write {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
            tokio::fs::write(&path, content)
                .await
                .map_err(|source| PackageFsError::Write {
                    path: path.clone(),
                    source,
                })?;
            tracing::debug!(path = %path.display(), "preferences written");
            Ok(())
        }
    }
}
