//! # locmode-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `PreferenceStore`: load and save the user's preference document
//!   - `HostConfig`: check that the host accepts generated packages
//!   - `PackageSink`: render and write the compiled document
//! - Define the **preference schema** and resolve it into compiler inputs
//! - Define the **driving/inbound** use-case: `ApplyService` (preview, check,
//!   apply, configure, classify)
//!
//! ## Dependency rule
//! Depends on `locmode-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod preferences;
pub mod services;
