//! Costa Brava Posidonia seagrass meadow, a marine case with inverted
//! economics.
//!
//! In the forest cases private revenue recurs and the externality is a
//! one-time hit. Here it is the other way round: destroying a hectare
//! yields a one-time development gain (EUR 2,500/ha) while the externality
//! is an annual recurring loss, about EUR 5.83M per year at full damage
//! against EUR 12.5M of one-time revenue. Posidonia regrows at 1-6 cm per
//! year, so damage is effectively permanent on human timescales; the safe
//! threshold (20%) is the lowest of the presets and the succession curve
//! the slowest. The meadow itself is the keystone foundation species, and
//! blue carbon uses an exponential curve because the sediment matte stores
//! millennia of carbon that releases without a plateau.

use eco_model::{
    Agent, CarbonProfile, DamageCurve, Ecosystem, InteractionEdge, InteractionKind,
    ResilienceConfig, Resource, RestorationCost, SuccessionCurve, TrophicLevel,
};

pub const DEFAULT_TOTAL_HECTARES: u32 = 5_000;
pub const DEFAULT_THRESHOLD: f64 = 0.20;
pub const DEFAULT_REVENUE_PER_HECTARE: f64 = 2_500.0;

/// Note appended to reports to flag the annual-versus-one-time asymmetry.
pub const ANNUAL_EXTERNALITY_NOTE: &str = "\n  !! MARINE EXTERNALITY NOTE: these costs are ANNUAL. They recur every year\n     the damage persists. Posidonia recovers at 1-6 cm/year, so damage is\n     effectively permanent on human timescales. The one-time private revenue\n     is offset within roughly two years of annual service losses.\n";

/// Seagrass succession, the slowest of the presets. Decades to
/// re-establish even under active transplanting.
pub fn succession() -> SuccessionCurve {
    SuccessionCurve {
        maturation_delay: 5.0,
        pioneer_end_year: 20.0,
        intermediate_end_year: 50.0,
        climax_approach_year: 120.0,
        pioneer_service: 0.02,
        intermediate_service: 0.25,
    }
}

/// Blue carbon per hectare. The sediment matte holds far more carbon than
/// living biomass but only a small fraction releases on destruction.
pub fn carbon() -> CarbonProfile {
    CarbonProfile {
        stored_carbon_tonnes: 130.0,
        annual_absorption_tonnes: 5.9,
        soil_carbon_tonnes: 2_600.0,
        soil_release_fraction: 0.05,
        carbon_price_per_tonne: 80.0,
        remaining_lifetime_years: 100.0,
        absorption_curve: None,
    }
}

pub fn resilience() -> ResilienceConfig {
    ResilienceConfig {
        warning_zone_width: 0.15,
        irreversibility_flag_ratio: 0.40,
        ..ResilienceConfig::default()
    }
}

/// Specialist diving makes per-hectare restoration an order of magnitude
/// more expensive than tree planting.
pub fn restoration_cost() -> RestorationCost {
    RestorationCost::new(50_000.0, 5_000.0, 30)
}

/// Builds the Posidonia meadow ecosystem with 11 agents and a 16-edge
/// marine dependency web.
pub fn build(total_hectares: u32, threshold: f64, revenue_per_hectare: f64) -> Ecosystem {
    let resource = Resource::new(
        "Costa Brava Posidonia Meadow",
        total_hectares,
        threshold,
        revenue_per_hectare,
    )
    .with_carbon(carbon())
    .with_resilience(resilience());

    let logistic = DamageCurve::logistic(threshold);

    let agents = vec![
        Agent::new(
            "Posidonia Meadow",
            0.10,
            logistic,
            8_000_000.0,
            "Meadow integrity, self-reinforcing fragmentation and turbidity feedback loop",
        )
        .with_trophic_level(TrophicLevel::Producer)
        .with_keystone_threshold(0.3),
        Agent::new(
            "Coralligenous & Red Coral",
            0.10,
            logistic,
            6_000_000.0,
            "Centuries-old biogenic reef habitat, irreplaceable on human timescales",
        )
        .with_trophic_level(TrophicLevel::Producer),
        Agent::new(
            "Epiphytes & Algae",
            0.07,
            logistic,
            3_571_000.0,
            "Primary productivity, oxygen production, base of the food web",
        )
        .with_trophic_level(TrophicLevel::Producer),
        Agent::new(
            "Marine Invertebrates",
            0.09,
            logistic,
            3_889_000.0,
            "Sponges, urchins, octopus, shellfish, filter feeders with urchin barren risk",
        )
        .with_trophic_level(TrophicLevel::PrimaryConsumer),
        Agent::new(
            "Fish Populations",
            0.14,
            logistic,
            5_000_000.0,
            "Nursery and feeding habitat for artisanal fisheries, the Medes Islands model",
        )
        .with_trophic_level(TrophicLevel::SecondaryConsumer),
        Agent::new(
            "Marine Megafauna",
            0.04,
            logistic,
            5_000_000.0,
            "Dolphins, sea turtles, cetaceans, ecotourism flagships with K-strategy vulnerability",
        )
        .with_trophic_level(TrophicLevel::TertiaryConsumer),
        Agent::new(
            "Seabirds",
            0.05,
            logistic,
            3_600_000.0,
            "Fish-dependent breeders and the migratory corridor",
        )
        .with_trophic_level(TrophicLevel::SecondaryConsumer),
        Agent::new(
            "Coastal Protection",
            0.13,
            logistic,
            6_923_000.0,
            "Wave attenuation, beach erosion prevention, sediment stabilization",
        ),
        Agent::new(
            "Water Quality",
            0.11,
            logistic,
            5_909_000.0,
            "Nutrient filtration, pathogen reduction, bathing water standards",
        ),
        Agent::new(
            "Blue Carbon",
            0.09,
            DamageCurve::exponential(threshold),
            5_556_000.0,
            "Millennia of stored matte carbon, exponential release once disturbed",
        ),
        Agent::new(
            "Human Communities",
            0.08,
            logistic,
            8_750_000.0,
            "Dive and beach tourism, artisanal fishing, coastal property",
        ),
    ];

    let dep = InteractionKind::Dependency;
    let trophic = InteractionKind::Trophic;
    let keystone = InteractionKind::Keystone;

    let interactions = vec![
        // Foundation species collapse cascades everywhere.
        InteractionEdge::new("Posidonia Meadow", "Coralligenous & Red Coral", 0.30, keystone,
            "Meadow loss drives sedimentation that suffocates coralligenous reefs"),
        InteractionEdge::new("Posidonia Meadow", "Epiphytes & Algae", 0.35, keystone,
            "Substrate loss collapses the epiphytic community"),
        InteractionEdge::new("Posidonia Meadow", "Coastal Protection", 0.40, keystone,
            "Meadow loss directly removes wave attenuation and beach protection"),
        InteractionEdge::new("Posidonia Meadow", "Water Quality", 0.30, dep,
            "Lost filtration capacity raises turbidity and eutrophication"),
        InteractionEdge::new("Coralligenous & Red Coral", "Marine Invertebrates", 0.25, dep,
            "Reef habitat loss displaces invertebrate communities"),
        InteractionEdge::new("Coralligenous & Red Coral", "Fish Populations", 0.20, dep,
            "Reef nursery loss reduces fish recruitment"),
        InteractionEdge::new("Epiphytes & Algae", "Marine Invertebrates", 0.20, trophic,
            "Primary productivity loss reduces grazer food supply"),
        InteractionEdge::new("Marine Invertebrates", "Fish Populations", 0.25, trophic,
            "Invertebrate decline reduces fish food supply"),
        InteractionEdge::new("Fish Populations", "Marine Megafauna", 0.35, trophic,
            "Fish decline starves apex marine predators"),
        InteractionEdge::new("Fish Populations", "Seabirds", 0.30, trophic,
            "Fish decline causes breeding failure in seabird colonies"),
        InteractionEdge::new("Posidonia Meadow", "Blue Carbon", 0.35, dep,
            "Meadow loss releases millennia of stored matte carbon"),
        InteractionEdge::new("Marine Invertebrates", "Water Quality", 0.15, dep,
            "Filter feeder loss reduces water purification capacity"),
        InteractionEdge::new("Water Quality", "Coralligenous & Red Coral", 0.15, dep,
            "Degraded water quality stresses sensitive coral formations"),
        InteractionEdge::new("Coastal Protection", "Human Communities", 0.25, dep,
            "Beach erosion destroys tourism infrastructure"),
        InteractionEdge::new("Fish Populations", "Human Communities", 0.20, dep,
            "Fish decline collapses the artisanal fishing economy"),
        InteractionEdge::new("Water Quality", "Human Communities", 0.15, dep,
            "Degraded water triggers beach closures and tourism loss"),
    ];

    Ecosystem::new("Costa Brava Posidonia Meadow", resource, agents)
        .with_interactions(interactions)
        .with_succession(succession())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_sim::{run_extraction, validate_ecosystem};

    fn default_build() -> Ecosystem {
        build(DEFAULT_TOTAL_HECTARES, DEFAULT_THRESHOLD, DEFAULT_REVENUE_PER_HECTARE)
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f64 = default_build().agents.iter().map(|a| a.dependency_weight).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_preset_validates_cleanly() {
        assert!(validate_ecosystem(&default_build()).is_ok());
    }

    #[test]
    fn test_meadow_is_the_only_keystone() {
        let eco = default_build();
        let keystones: Vec<&str> = eco
            .agents
            .iter()
            .filter(|a| a.is_keystone())
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(keystones, vec!["Posidonia Meadow"]);
        assert_eq!(eco.interactions.len(), 16);
    }

    #[test]
    fn test_full_destruction_annual_externality() {
        let result = run_extraction(&default_build(), DEFAULT_TOTAL_HECTARES).unwrap();
        // Weighted rate sum is 5.83M/yr against a one-time 12.5M of revenue.
        assert!((result.total_externality_cost - 5_830_000.0).abs() < 10_000.0);
        assert!((result.total_private_revenue - 12_500_000.0).abs() < 1.0);
    }

    #[test]
    fn test_slower_succession_than_forest() {
        let marine = succession();
        let forest = crate::cases::forest::succession();
        assert!(marine.years_to_service(0.5) > forest.years_to_service(0.5));
        assert!(marine.years_to_service(0.9) > forest.years_to_service(0.9));
    }
}
