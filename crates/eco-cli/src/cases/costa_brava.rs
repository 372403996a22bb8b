//! Costa Brava holm oak forest, a Mediterranean case with a full trophic
//! web.
//!
//! Eleven agents and seventeen interaction edges, from the mycorrhizal
//! underground network to apex raptors and the coastal tourism economy.
//! The safe threshold (25%) is lower than a temperate forest's because
//! summer drought slows regeneration and canopy loss feeds fire risk. The
//! mycorrhizal network and the pollinator guild are keystones; carbon uses
//! an exponential curve because atmospheric CO2 accumulates without a
//! plateau. Rates are calibrated so full destruction imposes about 5.8x
//! its timber revenue in externalities.

use eco_model::{
    Agent, CarbonProfile, DamageCurve, Ecosystem, InteractionEdge, InteractionKind,
    ResilienceConfig, Resource, RestorationCost, SuccessionCurve, TrophicLevel,
};

pub const DEFAULT_TOTAL_TREES: u32 = 10_000;
pub const DEFAULT_THRESHOLD: f64 = 0.25;
pub const DEFAULT_TREE_VALUE: f64 = 60.0;

/// Mediterranean succession, slower than temperate forest due to drought
/// stress and fire risk.
pub fn succession() -> SuccessionCurve {
    SuccessionCurve {
        maturation_delay: 3.0,
        pioneer_end_year: 12.0,
        intermediate_end_year: 35.0,
        climax_approach_year: 80.0,
        pioneer_service: 0.03,
        intermediate_service: 0.30,
    }
}

pub fn carbon() -> CarbonProfile {
    CarbonProfile {
        stored_carbon_tonnes: 0.5,
        annual_absorption_tonnes: 0.018,
        soil_carbon_tonnes: 0.35,
        soil_release_fraction: 0.25,
        carbon_price_per_tonne: 80.0,
        remaining_lifetime_years: 50.0,
        absorption_curve: None,
    }
}

pub fn resilience() -> ResilienceConfig {
    ResilienceConfig {
        warning_zone_width: 0.12,
        ..ResilienceConfig::default()
    }
}

pub fn restoration_cost() -> RestorationCost {
    RestorationCost::new(80.0, 15.0, 15)
}

/// Builds the Costa Brava holm oak ecosystem with 11 agents and the full
/// 17-edge dependency web.
pub fn build(total_trees: u32, threshold: f64, tree_value: f64) -> Ecosystem {
    let resource = Resource::new("Costa Brava Holm Oak Forest", total_trees, threshold, tree_value)
        .with_carbon(carbon())
        .with_resilience(resilience());

    let logistic = DamageCurve::logistic(threshold);

    let agents = vec![
        Agent::new(
            "Mycorrhizal Fungi",
            0.13,
            logistic,
            3_077_000.0,
            "Keystone underground network, nutrient and water transport for all tree regeneration",
        )
        .with_trophic_level(TrophicLevel::Producer)
        .with_keystone_threshold(0.3),
        Agent::new(
            "Soil Microbiome",
            0.10,
            logistic,
            3_500_000.0,
            "Soil microbiome and biocrusts, nitrogen fixation, carbon storage, erosion prevention",
        ),
        Agent::new(
            "Canopy Trees",
            0.12,
            logistic,
            2_500_000.0,
            "Remaining canopy trees, self-reinforcing decline from microclimate loss",
        )
        .with_trophic_level(TrophicLevel::Producer),
        Agent::new(
            "Understory & Matorral",
            0.08,
            logistic,
            1_875_000.0,
            "Understory shrubs and aromatic plants, microclimate collapse and biodiversity loss",
        )
        .with_trophic_level(TrophicLevel::Producer),
        Agent::new(
            "Pollinators & Insects",
            0.10,
            logistic,
            3_500_000.0,
            "Keystone pollination services, base of the animal food web",
        )
        .with_trophic_level(TrophicLevel::PrimaryConsumer)
        .with_keystone_threshold(0.4),
        Agent::new(
            "Forest Birds",
            0.08,
            logistic,
            2_500_000.0,
            "Nesting and migratory stopover habitat, seed dispersal, insect control, ecotourism",
        )
        .with_trophic_level(TrophicLevel::PrimaryConsumer),
        Agent::new(
            "Forest Mammals",
            0.07,
            logistic,
            2_571_000.0,
            "Habitat displacement, predator-prey disruption, human-wildlife conflict",
        )
        .with_trophic_level(TrophicLevel::PrimaryConsumer),
        Agent::new(
            "Raptors & Apex Predators",
            0.04,
            logistic,
            3_000_000.0,
            "Apex trophic control, carrion processing, extreme K-strategy vulnerability",
        )
        .with_trophic_level(TrophicLevel::TertiaryConsumer),
        Agent::new(
            "Watershed & Water Cycle",
            0.12,
            logistic,
            4_167_000.0,
            "Aquifer recharge, flood control, drought buffering for water and tourism supply",
        ),
        Agent::new(
            "Carbon & Climate",
            0.10,
            DamageCurve::exponential(threshold),
            4_500_000.0,
            "CO2 release, lost sequestration, fire risk amplification without plateau",
        ),
        Agent::new(
            "Human Communities",
            0.06,
            logistic,
            8_333_000.0,
            "Water, fire protection, tourism economy, traditional livelihoods",
        ),
    ];

    let dep = InteractionKind::Dependency;
    let trophic = InteractionKind::Trophic;
    let keystone = InteractionKind::Keystone;

    let interactions = vec![
        // The mycorrhizal network is the backbone; its collapse cascades
        // into every biological agent.
        InteractionEdge::new("Mycorrhizal Fungi", "Canopy Trees", 0.35, keystone,
            "Mycorrhizal collapse cuts nutrient and water supply to remaining trees"),
        InteractionEdge::new("Mycorrhizal Fungi", "Understory & Matorral", 0.25, dep,
            "Understory plants lose mycorrhizal nutrient access"),
        InteractionEdge::new("Mycorrhizal Fungi", "Soil Microbiome", 0.30, dep,
            "Mycorrhizal network supports bacterial communities and nutrient cycling"),
        InteractionEdge::new("Pollinators & Insects", "Understory & Matorral", 0.30, keystone,
            "Pollinator loss collapses plant reproduction"),
        InteractionEdge::new("Pollinators & Insects", "Forest Birds", 0.20, trophic,
            "Insect decline reduces food for insectivorous birds"),
        InteractionEdge::new("Canopy Trees", "Understory & Matorral", 0.25, dep,
            "Canopy loss removes shade, understory heat and drought stress"),
        InteractionEdge::new("Canopy Trees", "Soil Microbiome", 0.20, dep,
            "Canopy loss exposes soil to UV and drying, biocrust collapse"),
        InteractionEdge::new("Canopy Trees", "Watershed & Water Cycle", 0.30, dep,
            "Root loss reduces water infiltration and aquifer recharge"),
        InteractionEdge::new("Forest Mammals", "Raptors & Apex Predators", 0.30, trophic,
            "Prey decline starves apex predators"),
        InteractionEdge::new("Forest Birds", "Raptors & Apex Predators", 0.20, trophic,
            "Bird decline reduces prey for raptors"),
        InteractionEdge::new("Understory & Matorral", "Forest Mammals", 0.25, dep,
            "Vegetation loss reduces food and cover for herbivores"),
        InteractionEdge::new("Understory & Matorral", "Pollinators & Insects", 0.20, dep,
            "Understory flowering loss reduces pollinator food sources"),
        InteractionEdge::new("Soil Microbiome", "Canopy Trees", 0.15, dep,
            "Soil health decline reduces tree nutrient availability"),
        InteractionEdge::new("Soil Microbiome", "Watershed & Water Cycle", 0.20, dep,
            "Soil degradation reduces water retention capacity"),
        InteractionEdge::new("Canopy Trees", "Carbon & Climate", 0.35, dep,
            "Tree loss directly reduces carbon sequestration capacity"),
        InteractionEdge::new("Watershed & Water Cycle", "Human Communities", 0.25, dep,
            "Water quality decline affects human health and tourism"),
        InteractionEdge::new("Carbon & Climate", "Human Communities", 0.10, dep,
            "Climate regulation loss increases fire risk and heat stress"),
    ];

    Ecosystem::new("Costa Brava Holm Oak Forest", resource, agents)
        .with_interactions(interactions)
        .with_succession(succession())
}
