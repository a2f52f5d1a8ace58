//! IDECICLO scoring: form ratings, network tiering and the weighted city index.
//!
//! Every function here is pure. Diagnostics are returned as an
//! [`IdecicloBreakdown`] rather than logged, so callers decide what to report.

mod aggregate;
mod network;
mod rating;

pub use aggregate::IdecicloClassification;
pub use network::{
    group_by_network, network_weight, tier_for, NetworkBucket, NetworkGroups,
    ALIMENTADORA_WEIGHT, ESTRUTURAL_WEIGHT, LOCAL_WEIGHT,
};
pub use rating::{contribute, rate, rate_form, FormRating};

use super::domain::{Form, FormId, NetworkTier, Segment, SegmentId};
use serde::{Deserialize, Serialize};

/// Index of a city's cycling network in `[0, 1]`.
pub fn calculate_ideciclo(segments: &[Segment], forms: &[Form]) -> f64 {
    calculate_ideciclo_detailed(segments, forms).index
}

/// Same computation as [`calculate_ideciclo`], keeping every intermediate value.
pub fn calculate_ideciclo_detailed(segments: &[Segment], forms: &[Form]) -> IdecicloBreakdown {
    let groups = group_by_network(segments, forms);
    aggregate::aggregate(&groups)
}

pub fn ideciclo_classification(index: f64) -> IdecicloClassification {
    IdecicloClassification::from_index(index)
}

/// Human readable label for a classification letter; unknown letters read "Não avaliado".
pub fn ideciclo_description(label: &str) -> &'static str {
    IdecicloClassification::from_label(label)
        .map(IdecicloClassification::description)
        .unwrap_or(aggregate::UNRATED_DESCRIPTION)
}

/// Per-segment audit line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentScore {
    pub segment_id: SegmentId,
    pub form_id: FormId,
    pub tier: NetworkTier,
    pub length: f64,
    pub rating: f64,
    pub criteria_considered: usize,
    pub contribution: f64,
}

/// Attendance rate (GAM) of one tier and its share of the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkBreakdown {
    pub tier: NetworkTier,
    pub weight: f64,
    pub segment_count: usize,
    pub total_length: f64,
    pub evaluated_length: f64,
    pub attendance_rate: f64,
    pub weighted_score: f64,
}

/// Full scoring trail for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdecicloBreakdown {
    pub index: f64,
    pub classification: IdecicloClassification,
    pub networks: Vec<NetworkBreakdown>,
    pub segments: Vec<SegmentScore>,
    pub unevaluated_segments: Vec<SegmentId>,
}

impl IdecicloBreakdown {
    pub fn network(&self, tier: NetworkTier) -> Option<&NetworkBreakdown> {
        self.networks.iter().find(|network| network.tier == tier)
    }

    pub fn description(&self) -> &'static str {
        self.classification.description()
    }
}
