//! Shared data model for the ecosystem externality simulator.
//!
//! This crate contains pure data structures and curve evaluation with no
//! simulation logic. It is a dependency for all other crates in the
//! workspace.

pub mod agent;
pub mod curve;
pub mod resource;
pub mod result;
pub mod step;

// Re-export curve types
pub use curve::{
    DamageCurve, RecoveryCurve, SuccessionCurve, SuccessionPhase, DEFAULT_EXPONENTIAL_BASE,
    DEFAULT_RECOVERY_LAG, DEFAULT_STEEPNESS,
};

// Re-export resource types
pub use resource::{CarbonProfile, Resource, ResilienceConfig};

// Re-export agent and graph types
pub use agent::{Agent, Ecosystem, InteractionEdge, InteractionKind, TrophicLevel};

// Re-export step records
pub use step::{
    AgentEffect, CarbonLedger, MaturationStep, ResilienceReading, ResilienceZone, RestorationStep,
    SimulationStep,
};

// Re-export result types
pub use result::{
    MaturationSummary, RestorationCost, RestorationResult, SimulationResult,
};
