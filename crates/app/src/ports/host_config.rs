//! Host configuration port: read-only view of the Home Assistant setup.

use std::future::Future;

use locmode_domain::error::LocModeError;

/// The Home Assistant installation a package is written for.
pub trait HostConfig {
    /// Check that the host loads packages at all.
    ///
    /// Returns [`LocModeError::MissingPrecondition`] when it does not.
    fn ensure_packages_enabled(&self) -> impl Future<Output = Result<(), LocModeError>> + Send;
}
