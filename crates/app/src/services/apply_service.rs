//! Apply service: resolve preferences, compile, render and write the package.

use std::fmt;
use std::path::PathBuf;

use locmode_domain::classifier::classify;
use locmode_domain::compiler::{Variant, compile};
use locmode_domain::document::CompiledDocument;
use locmode_domain::error::LocModeError;
use locmode_domain::mode::Mode;

use crate::ports::{HostConfig, PackageSink, PreferenceStore};
use crate::preferences::{Preferences, Resolved, Warning};

/// A rendered package that has not been written.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Path relative to the host configuration directory.
    pub package_path: String,
    pub content: String,
    pub rule_count: usize,
    pub warnings: Vec<Warning>,
}

/// Result of a successful [`ApplyService::apply`].
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub path: PathBuf,
    pub rule_count: usize,
    pub warnings: Vec<Warning>,
}

impl fmt::Display for ApplyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} ({} rules). Restart Home Assistant if this is the first package; \
             otherwise reload automations, and restart if new helpers do not appear.",
            self.path.display(),
            self.rule_count
        )
    }
}

/// Application service turning saved preferences into a written package.
pub struct ApplyService<S, H, P> {
    store: S,
    host: H,
    sink: P,
    options: Preferences,
    variant: Variant,
}

impl<S, H, P> ApplyService<S, H, P>
where
    S: PreferenceStore,
    H: HostConfig,
    P: PackageSink,
{
    /// Create a new service with empty add-on options.
    pub fn new(store: S, host: H, sink: P, variant: Variant) -> Self {
        Self {
            store,
            host,
            sink,
            options: Preferences::default(),
            variant,
        }
    }

    /// Add-on options the saved preferences are layered over.
    #[must_use]
    pub fn with_options(mut self, options: Preferences) -> Self {
        self.options = options;
        self
    }

    /// Load the saved preferences, layer them over the options and resolve.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the preference store, or a validation
    /// error naming the offending field.
    #[tracing::instrument(skip(self), fields(variant = %self.variant))]
    pub async fn resolve(&self) -> Result<Resolved, LocModeError> {
        let user = self.store.load().await?;
        let resolved = user.merged_over(self.options.clone()).resolve(self.variant)?;
        for warning in &resolved.warnings {
            tracing::warn!(%warning, "preference ignored");
        }
        Ok(resolved)
    }

    /// Compile and render the package without touching the host.
    ///
    /// # Errors
    ///
    /// Same as [`ApplyService::resolve`], plus compilation errors such as
    /// [`LocModeError::DuplicateHelper`].
    #[tracing::instrument(skip(self))]
    pub async fn preview(&self) -> Result<Rendered, LocModeError> {
        let resolved = self.resolve().await?;
        let document = compile_resolved(&resolved)?;
        let content = self.sink.render(&document)?;
        tracing::debug!(
            rules = document.automations().len(),
            bytes = content.len(),
            "package rendered"
        );
        Ok(Rendered {
            package_path: resolved.package_path,
            content,
            rule_count: document.automations().len(),
            warnings: resolved.warnings,
        })
    }

    /// Check that the host accepts packages.
    ///
    /// # Errors
    ///
    /// Returns [`LocModeError::MissingPrecondition`] with the reason.
    #[tracing::instrument(skip(self))]
    pub async fn check(&self) -> Result<(), LocModeError> {
        self.host.ensure_packages_enabled().await
    }

    /// Check the host, compile and write the package.
    ///
    /// Nothing is written unless the precondition holds and compilation
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`LocModeError::MissingPrecondition`], any error from
    /// [`ApplyService::preview`], or [`LocModeError::Io`] from the sink.
    #[tracing::instrument(skip(self))]
    pub async fn apply(&self) -> Result<ApplyOutcome, LocModeError> {
        self.check().await?;
        let rendered = self.preview().await?;
        let path = self
            .sink
            .write(rendered.package_path, rendered.content)
            .await?;
        tracing::info!(path = %path.display(), rules = rendered.rule_count, "package written");
        Ok(ApplyOutcome {
            path,
            rule_count: rendered.rule_count,
            warnings: rendered.warnings,
        })
    }

    /// Validate `preferences` against the options and save them.
    ///
    /// The saved document is the user layer only; options are not copied
    /// into it.
    ///
    /// # Errors
    ///
    /// Returns the validation or compilation error that `apply` would hit,
    /// in which case nothing is saved, or a storage error.
    #[tracing::instrument(skip(self, preferences))]
    pub async fn configure(&self, preferences: Preferences) -> Result<Vec<Warning>, LocModeError> {
        let resolved = preferences
            .clone()
            .merged_over(self.options.clone())
            .resolve(self.variant)?;
        compile_resolved(&resolved)?;
        self.store.save(preferences).await?;
        tracing::info!("preferences saved");
        Ok(resolved.warnings)
    }

    /// Classify a tracker value with the configured zone rules.
    ///
    /// # Errors
    ///
    /// Same as [`ApplyService::resolve`].
    #[tracing::instrument(skip(self))]
    pub async fn classify(&self, location_value: &str) -> Result<Mode, LocModeError> {
        let resolved = self.resolve().await?;
        Ok(classify(location_value, &resolved.rules))
    }
}

fn compile_resolved(resolved: &Resolved) -> Result<CompiledDocument, LocModeError> {
    compile(
        &resolved.config,
        &resolved.rules,
        resolved.dwell,
        &resolved.lighting,
        resolved.flourish_enabled,
    )
}
