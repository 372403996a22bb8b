//! Ecosystem externality simulation engine.
//!
//! Validates a configured ecosystem, then walks extraction or restoration
//! one unit per step, propagating damage or recovery through the agent
//! interaction graph and attaching carbon and resilience accounting where
//! the resource is configured for them. Every run is a deterministic pure
//! computation over immutable inputs; independent runs share no state.

pub mod carbon;
pub mod cascade;
pub mod engine;
pub mod maturation;
pub mod resilience;
pub mod validate;

pub use cascade::{propagate, CascadeMode, CascadeOutcome, CascadeParams};
pub use engine::{run_extraction, run_extraction_with, run_restoration, run_restoration_with};
pub use validate::{probe_curve, validate_ecosystem, CurveViolation, ValidationError};
