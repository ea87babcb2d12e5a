//! Package sink port: serialization and delivery of the compiled document.

use std::future::Future;
use std::path::PathBuf;

use locmode_domain::document::CompiledDocument;
use locmode_domain::error::LocModeError;

/// Renders a [`CompiledDocument`] and writes it where the host picks it up.
pub trait PackageSink {
    /// Render the document to its on-disk text form.
    ///
    /// # Errors
    ///
    /// Returns [`LocModeError::Io`] if the document cannot be serialized.
    fn render(&self, document: &CompiledDocument) -> Result<String, LocModeError>;

    /// Write `content` to `relative_path`, creating parent directories.
    /// Returns the full path written.
    fn write(
        &self,
        relative_path: String,
        content: String,
    ) -> impl Future<Output = Result<PathBuf, LocModeError>> + Send;
}
