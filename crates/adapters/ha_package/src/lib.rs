//! # locmode-adapter-ha-package
//!
//! Filesystem adapter for a Home Assistant installation.
//!
//! ## Responsibilities
//! - Implement the port traits defined in `locmode-app::ports`:
//!   - [`JsonPreferenceStore`]: `ui_config.json` in the add-on data directory
//!   - [`HaConfigDir`]: the `packages:` precondition on `configuration.yaml`
//!   - [`YamlPackageWriter`]: render the compiled document as a YAML package
//!     Home Assistant's YAML 1.1 loader reads back unchanged, and write it
//!     under the configuration directory
//! - Map IO and serialization failures into `LocModeError::Io`
//!
//! ## Dependency rule
//! Depends on `locmode-app` (for port traits) and `locmode-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod host_config;
mod package_writer;
mod preference_store;
mod yaml11;

pub use error::PackageFsError;
pub use host_config::HaConfigDir;
pub use package_writer::YamlPackageWriter;
pub use preference_store::JsonPreferenceStore;
