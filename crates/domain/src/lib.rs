//! # locmode-domain
//!
//! Pure domain model for the location-mode rule compiler.
//!
//! ## Responsibilities
//! - Foundational types: entity references, error conventions, durations
//! - Define **Modes** (the discrete classification of where the household is)
//! - Define **Zone rules** and the precedence-ordered **classifier**
//! - Define the **dwell debouncer** state machine that suppresses mode churn
//! - Define **lighting directives** (color, brightness, effect) per mode
//! - Define the declarative **automation** vocabulary (trigger → condition → action)
//! - **Compile** all of the above into a deterministic package document
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod entity_ref;
pub mod error;
pub mod time;

pub mod automation;
pub mod classifier;
pub mod compiler;
pub mod document;
pub mod dwell;
pub mod lighting;
pub mod mode;
pub mod zone;
