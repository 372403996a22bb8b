//! Agents, the interaction graph, and the assembled ecosystem.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::curve::{DamageCurve, SuccessionCurve};
use crate::resource::Resource;

/// Position in the energy-transfer hierarchy. Higher consumers are more
/// sensitive to damage at the base of the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrophicLevel {
    /// Abiotic service (water cycle, soil structure), exempt from
    /// trophic amplification.
    Abiotic,
    Producer,
    PrimaryConsumer,
    SecondaryConsumer,
    TertiaryConsumer,
}

impl TrophicLevel {
    /// Numeric level used by the amplification rule.
    pub fn level(&self) -> i8 {
        match self {
            TrophicLevel::Abiotic => -1,
            TrophicLevel::Producer => 0,
            TrophicLevel::PrimaryConsumer => 1,
            TrophicLevel::SecondaryConsumer => 2,
            TrophicLevel::TertiaryConsumer => 3,
        }
    }

    /// Whether the amplification rule applies at all.
    pub fn amplified(&self) -> bool {
        self.level() >= 1
    }
}

impl Default for TrophicLevel {
    fn default() -> Self {
        TrophicLevel::Abiotic
    }
}

impl fmt::Display for TrophicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrophicLevel::Abiotic => write!(f, "abiotic"),
            TrophicLevel::Producer => write!(f, "producer"),
            TrophicLevel::PrimaryConsumer => write!(f, "primary consumer"),
            TrophicLevel::SecondaryConsumer => write!(f, "secondary consumer"),
            TrophicLevel::TertiaryConsumer => write!(f, "tertiary consumer"),
        }
    }
}

/// An entity that depends on the resource and suffers when it is depleted.
///
/// Monetary cost at depletion level d:
/// `cost = effective_damage(d) * dependency_weight * monetary_rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    /// This agent's share of total ecosystem damage, in (0, 1]. All agents
    /// in an ecosystem must sum to 1.0.
    pub dependency_weight: f64,
    pub damage_curve: DamageCurve,
    /// Total monetary cost in euros at maximum damage.
    pub monetary_rate: f64,
    /// What damage means for this agent, for reporting.
    pub description: String,
    #[serde(default)]
    pub trophic_level: TrophicLevel,
    /// Health threshold below which this agent's collapse doubles its
    /// outgoing cascade strengths. `None` means not a keystone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keystone_threshold: Option<f64>,
    /// Overrides the ecosystem succession curve during the maturation pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub succession_curve: Option<SuccessionCurve>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        dependency_weight: f64,
        damage_curve: DamageCurve,
        monetary_rate: f64,
        description: impl Into<String>,
    ) -> Self {
        Agent {
            name: name.into(),
            dependency_weight,
            damage_curve,
            monetary_rate,
            description: description.into(),
            trophic_level: TrophicLevel::Abiotic,
            keystone_threshold: None,
            succession_curve: None,
        }
    }

    pub fn with_trophic_level(mut self, level: TrophicLevel) -> Self {
        self.trophic_level = level;
        self
    }

    pub fn with_keystone_threshold(mut self, threshold: f64) -> Self {
        self.keystone_threshold = Some(threshold);
        self
    }

    pub fn with_succession_curve(mut self, curve: SuccessionCurve) -> Self {
        self.succession_curve = Some(curve);
        self
    }

    pub fn is_keystone(&self) -> bool {
        self.keystone_threshold.is_some()
    }
}

/// Category of a directed agent-to-agent dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Dependency,
    Trophic,
    Keystone,
    Competition,
}

/// A directed, weighted dependency between two agents: damage at the source
/// spills over to the target in proportion to the strength.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEdge {
    pub source: String,
    pub target: String,
    /// Spillover fraction in (0, 1].
    pub strength: f64,
    pub kind: InteractionKind,
    pub description: String,
}

impl InteractionEdge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        strength: f64,
        kind: InteractionKind,
        description: impl Into<String>,
    ) -> Self {
        InteractionEdge {
            source: source.into(),
            target: target.into(),
            strength,
            kind,
            description: description.into(),
        }
    }
}

/// A resource bound to an ordered list of agents and a directed interaction
/// graph. Agent order is significant for deterministic output only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ecosystem {
    pub name: String,
    pub resource: Resource,
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub interactions: Vec<InteractionEdge>,
    /// Default succession curve for the restoration maturation pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub succession: Option<SuccessionCurve>,
}

impl Ecosystem {
    pub fn new(name: impl Into<String>, resource: Resource, agents: Vec<Agent>) -> Self {
        Ecosystem {
            name: name.into(),
            resource,
            agents,
            interactions: Vec::new(),
            succession: None,
        }
    }

    pub fn with_interactions(mut self, interactions: Vec<InteractionEdge>) -> Self {
        self.interactions = interactions;
        self
    }

    pub fn with_succession(mut self, curve: SuccessionCurve) -> Self {
        self.succession = Some(curve);
        self
    }

    /// Index of the named agent, if present.
    pub fn agent_index(&self, name: &str) -> Option<usize> {
        self.agents.iter().position(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ecosystem() -> Ecosystem {
        let resource = Resource::new("Oak Valley Forest", 10_000, 0.3, 100.0);
        let curve = DamageCurve::logistic(0.3);
        let agents = vec![
            Agent::new("Human Communities", 0.4, curve, 750_000.0, "health costs"),
            Agent::new("Animal Populations", 0.6, curve, 1_167_000.0, "habitat loss")
                .with_trophic_level(TrophicLevel::PrimaryConsumer),
        ];
        Ecosystem::new("Oak Valley Forest", resource, agents)
    }

    #[test]
    fn test_trophic_level_numeric_values() {
        assert_eq!(TrophicLevel::Abiotic.level(), -1);
        assert_eq!(TrophicLevel::Producer.level(), 0);
        assert_eq!(TrophicLevel::TertiaryConsumer.level(), 3);
        assert!(!TrophicLevel::Producer.amplified());
        assert!(TrophicLevel::PrimaryConsumer.amplified());
    }

    #[test]
    fn test_agent_defaults_to_abiotic_non_keystone() {
        let agent = Agent::new("x", 1.0, DamageCurve::logistic(0.3), 1.0, "");
        assert_eq!(agent.trophic_level, TrophicLevel::Abiotic);
        assert!(!agent.is_keystone());
    }

    #[test]
    fn test_agent_index_lookup() {
        let eco = sample_ecosystem();
        assert_eq!(eco.agent_index("Animal Populations"), Some(1));
        assert_eq!(eco.agent_index("missing"), None);
    }

    #[test]
    fn test_ecosystem_serde_round_trip() {
        let eco = sample_ecosystem().with_interactions(vec![InteractionEdge::new(
            "Animal Populations",
            "Human Communities",
            0.25,
            InteractionKind::Dependency,
            "pollination spillover",
        )]);
        let json = serde_json::to_string(&eco).unwrap();
        let back: Ecosystem = serde_json::from_str(&json).unwrap();
        assert_eq!(eco, back);
    }
}
