//! [`HostConfig`] backed by the Home Assistant configuration directory.

use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;

use locmode_app::ports::HostConfig;
use locmode_domain::error::{LocModeError, PreconditionError};

use crate::error::PackageFsError;

/// Marker whose presence in `configuration.yaml` means packages are loaded.
const PACKAGES_SENTINEL: &str = "packages:";

/// The Home Assistant configuration directory (`/config` in an add-on).
#[derive(Debug, Clone)]
pub struct HaConfigDir {
    root: PathBuf,
}

impl HaConfigDir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl HostConfig for HaConfigDir {
    fn ensure_packages_enabled(&self) -> impl Future<Output = Result<(), LocModeError>> + Send {
        let root = self.root.clone();
        async move {
            let path = root.join("configuration.yaml");
            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    return Err(
                        PreconditionError::ConfigurationMissing(root.display().to_string()).into(),
                    );
                }
                Err(source) => return Err(PackageFsError::Read { path, source }.into()),
            };
            if text.contains(PACKAGES_SENTINEL) {
                Ok(())
            } else {
                Err(PreconditionError::PackagesDisabled.into())
            }
        }
    }
}
