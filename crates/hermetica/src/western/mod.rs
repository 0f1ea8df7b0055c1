pub mod condition;
pub mod dignities;
pub mod health;
pub mod lots;
pub mod profections;
pub mod rulers;

pub use condition::{analyze_sect, condition_score, ConditionDetail, ScoredPlanet, SectAnalysis};
pub use dignities::{
    score_dignities, score_planet, Contribution, DignityRanking, DignityScore, DignityTable,
    DignityWeights, EssentialDignity, PlanetDignities, ScoreFactor, TriplicityRulers,
};
pub use health::{health_correspondences, HealthCorrespondence, HealthEntry, HealthLookup, HealthPlacement};
pub use lots::{compute_lots, Lot, LotFormula, LotInputs, LotKind};
pub use profections::{age_at, profect, profect_years, profected_house, profection_timeline, ProfectionResult};
pub use rulers::{modern_ruler, ruler_of_house, sign_ruler, traditional_ruler};
